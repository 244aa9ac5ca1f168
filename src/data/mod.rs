//! Columnar frame abstraction consumed by the FTRL kernel.
//!
//! The kernel reads tabular data through [`Frame`]: named, typed columns of
//! equal length. Numeric columns are dense [`ndarray`] arrays; string columns
//! store offset/length pairs into one shared byte buffer ([`StrColumn`]).
//!
//! # Logical Types
//!
//! Each column exposes a [`LogicalType`]. The kernel consumes boolean,
//! integer, real, and string columns; other logical types surface as an
//! unsupported-type error during encoding rather than being silently skipped.

mod column;
mod frame;

pub use column::{Column, LogicalType, StrColumn};
pub use frame::{Frame, FrameBuilder, FrameError};
