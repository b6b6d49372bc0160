//! Canonical Grid Model
//!
//! Every table, whatever format it came from, is resolved into one [`Grid`]:
//! a dense slot map in which each slot is either the origin of a physical
//! cell or covered by the span of one.
//!
//! # Architecture
//!
//! ```text
//! Source AST -> GridBuilder (occupancy map) -> Grid -> Serializer
//!                    ^
//!                    |  positional placement
//!              Merge inference (HWPX addresses)
//! ```
//!
//! The builder is the only place where coverage is checked. Serializers trust
//! a finished grid. Tables larger than [`MAX_DIMENSION`] per axis or
//! [`MAX_SLOTS`] in total are refused before anything is allocated.

mod builder;
mod cell;
mod model;


pub use builder::{GridBuilder, MAX_DIMENSION, MAX_SLOTS};
pub use cell::{Cell, CellId, Span};
pub use model::{Grid, GridSlot, MergeStats};
