//! cellspan CLI - merge-preserving table conversion

#[cfg(feature = "cli")]
use cellspan::{
    check_tables, convert_document, detect_format, format_diagnostics, parse_tables,
    rewrite_table_blocks, roundtrip_report, ConversionError, ConversionOutput, DocumentOptions,
    ErrorPolicy, Format, Host, WriteOptions,
};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "cellspan")]
#[command(version)]
#[command(about = "cellspan - merge-preserving table conversion between HWPX, AsciiDoc, HTML and ODF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug details (grid sizes, inferred spans) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert every table of a file
    Convert {
        /// Input file path (reads from stdin if not provided)
        input: Option<String>,

        /// Source format (detected from the extension or content if omitted)
        #[arg(short, long, value_enum)]
        from: Option<FormatArg>,

        /// Target format
        #[arg(short, long, value_enum)]
        to: FormatArg,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,

        /// Leave failing tables out and report them instead of aborting
        #[arg(long)]
        skip_errors: bool,

        /// Write HWPX cell addresses without hp:cellSpan
        #[arg(long)]
        address_only: bool,
    },

    /// Round-trip every table through another format and report divergences
    Validate {
        /// Input file path
        input: Option<String>,

        /// Source format
        #[arg(short, long, value_enum)]
        from: Option<FormatArg>,

        /// Intermediate format
        #[arg(long, value_enum)]
        via: FormatArg,

        /// Write HWPX cell addresses without hp:cellSpan
        #[arg(long)]
        address_only: bool,
    },

    /// Check tables for structural problems without converting
    Check {
        /// Input file to check
        input: Option<String>,

        /// Source format
        #[arg(short, long, value_enum)]
        from: Option<FormatArg>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Convert the AsciiDoc table blocks of an Org or AsciiDoc document in place
    Blocks {
        /// Input document
        input: Option<String>,

        /// Host document kind
        #[arg(long, value_enum, default_value_t = HostArg::Org)]
        host: HostArg,

        /// Target format of the tables
        #[arg(short, long, value_enum, default_value_t = FormatArg::Html)]
        to: FormatArg,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Leave failing blocks unchanged and report them instead of aborting
        #[arg(long)]
        skip_errors: bool,
    },

    /// Show version and format info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// HWPX section XML
    Hwpx,
    /// AsciiDoc |=== table
    Asciidoc,
    /// HTML <table>
    Html,
    /// OpenDocument table:table
    Odf,
}

#[cfg(feature = "cli")]
impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Hwpx => Format::Hwpx,
            FormatArg::Asciidoc => Format::AsciiDoc,
            FormatArg::Html => Format::Html,
            FormatArg::Odf => Format::Odf,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum HostArg {
    Org,
    Asciidoc,
}

#[cfg(feature = "cli")]
impl From<HostArg> for Host {
    fn from(arg: HostArg) -> Self {
        match arg {
            HostArg::Org => Host::Org,
            HostArg::Asciidoc => Host::AsciiDoc,
        }
    }
}

/// Plain stderr logger
#[cfg(feature = "cli")]
struct StderrLogger;

#[cfg(feature = "cli")]
impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level().as_str().to_lowercase(), record.args());
        }
    }

    fn flush(&self) {}
}

#[cfg(feature = "cli")]
static LOGGER: StderrLogger = StderrLogger;

#[cfg(feature = "cli")]
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            output,
            skip_errors,
            address_only,
        } => {
            let (content, filename) = read_input(input)?;
            let from = resolve_format(from, filename.as_deref(), &content);
            let options = DocumentOptions {
                policy: policy(skip_errors),
                write: write_options(address_only),
            };
            let result = or_exit(convert_document(&content, from, to.into(), &options));
            report_warnings(&result);
            write_output(output.as_deref(), &result.content)?;
        }

        Commands::Validate {
            input,
            from,
            via,
            address_only,
        } => {
            let (content, filename) = read_input(input)?;
            let from = resolve_format(from, filename.as_deref(), &content);
            let via = Format::from(via);
            let tables = or_exit(parse_tables(&content, from));
            let options = write_options(address_only);

            let mut failed = 0;
            for (index, table) in tables.iter().enumerate() {
                let report = roundtrip_report(table, via, &options);
                if report.is_ok() {
                    match report.merges {
                        Some(merges) => println!("table {}: ok ({})", index, merges),
                        None => println!("table {}: ok", index),
                    }
                } else {
                    failed += 1;
                    for diff in &report.diffs {
                        println!("table {}: {}", index, diff);
                    }
                }
            }
            println!(
                "{} of {} tables round-trip {} -> {} -> {} cleanly",
                tables.len() - failed,
                tables.len(),
                from,
                via,
                from
            );
            if failed > 0 || tables.is_empty() {
                std::process::exit(1);
            }
        }

        Commands::Check {
            input,
            from,
            no_color,
        } => {
            let (content, filename) = read_input(input)?;
            let from = resolve_format(from, filename.as_deref(), &content);
            let result = check_tables(&content, from);
            println!("{}", format_diagnostics(&result, !no_color));
            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Blocks {
            input,
            host,
            to,
            output,
            skip_errors,
        } => {
            let (content, _) = read_input(input)?;
            let options = DocumentOptions {
                policy: policy(skip_errors),
                write: WriteOptions::default(),
            };
            let result = or_exit(rewrite_table_blocks(&content, host.into(), to.into(), &options));
            report_warnings(&result);
            write_output(output.as_deref(), &result.content)?;
        }

        Commands::Info => {
            println!("cellspan - merge-preserving table conversion");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Formats:");
            println!("  hwpx      HWPX section XML (hp:tbl, hp:cellAddr, hp:cellSpan)");
            println!("  asciidoc  AsciiDoc tables with span shorthand (2+|, .3+|, 2.3+|)");
            println!("  html      HTML tables with colspan/rowspan");
            println!("  odf       OpenDocument tables with covered cells");
            println!();
            println!("Features:");
            println!("  - Span inference from HWPX cell addresses");
            println!("  - Round-trip validation with itemized diffs");
            println!("  - Table blocks in Org and AsciiDoc documents");
            println!("  - Structural checks before conversion");
            println!();
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(input: Option<String>) -> io::Result<(String, Option<String>)> {
    match input {
        Some(path) => Ok((fs::read_to_string(&path)?, Some(path))),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok((buffer, None))
        }
    }
}

/// Explicit flag, then file extension, then content
#[cfg(feature = "cli")]
fn resolve_format(arg: Option<FormatArg>, filename: Option<&str>, content: &str) -> Format {
    if let Some(arg) = arg {
        return arg.into();
    }
    let detected = filename
        .and_then(Format::from_extension)
        .or_else(|| detect_format(content));
    match detected {
        Some(format) => {
            log::debug!("input detected as {}", format);
            format
        }
        None => {
            eprintln!("Error: could not detect the input format; pass --from");
            std::process::exit(2);
        }
    }
}

#[cfg(feature = "cli")]
fn policy(skip_errors: bool) -> ErrorPolicy {
    if skip_errors {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::Abort
    }
}

#[cfg(feature = "cli")]
fn write_options(address_only: bool) -> WriteOptions {
    if address_only {
        WriteOptions::address_only()
    } else {
        WriteOptions::default()
    }
}

#[cfg(feature = "cli")]
fn or_exit<T>(result: Result<T, ConversionError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "cli")]
fn report_warnings(output: &ConversionOutput) {
    for warning in &output.warnings {
        eprintln!("⚠ {}", warning);
    }
}

#[cfg(feature = "cli")]
fn write_output(path: Option<&str>, content: &str) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            file.write_all(content.as_bytes())?;
            eprintln!("✓ Output written to: {}", path);
        }
        None => {
            io::stdout().write_all(content.as_bytes())?;
        }
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install cellspan --features cli");
    eprintln!("  cellspan convert [INPUT] --from hwpx --to asciidoc");
}
