//! ftrl: FTRL-Proximal online learning over hashed tabular features.
//!
//! Native Rust implementation of the FTRL-Proximal ("Follow The Regularized
//! Leader") online learner for binary classification, with feature hashing
//! (including pairwise interaction hashing) and lock-free parallel training.
//!
//! # Key Types
//!
//! - [`Ftrl`] / [`FtrlParams`] - The model with train/predict entry points
//! - [`Frame`] / [`FrameBuilder`] - Columnar input data
//! - [`HashKind`] - Feature hashing algorithm selector
//! - [`ProgressObserver`] / [`TrainingLogger`] - Training progress stream
//!
//! # Training
//!
//! Build a [`Frame`] whose last column is the boolean label, construct the
//! model with [`Ftrl::new`], then call [`Ftrl::train`]. Predictions come back
//! as a one-column probability frame from [`Ftrl::predict`].
//!
//! # Concurrency
//!
//! Rows are partitioned across a fixed worker pool by a strided assignment.
//! Weight updates follow the Hogwild pattern: the shared `n`/`z` accumulators
//! are updated without mutual exclusion, racing benignly on relaxed atomics.
//! See the [`model`] module for details.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod encode;
pub mod hash;
pub mod model;
pub mod testing;
pub mod training;
pub mod utils;

mod error;
mod inference;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// The model and its configuration
pub use model::{Ftrl, FtrlParams};

// Errors
pub use error::FtrlError;

// Data types (for preparing training data)
pub use data::{Column, Frame, FrameBuilder, FrameError, LogicalType, StrColumn};

// Hashing
pub use hash::HashKind;

// Training types (report, progress stream, logging)
pub use training::{
    CollectingObserver, NullObserver, ProgressEvent, ProgressObserver, TrainingLogger,
    TrainingReport, Verbosity,
};

// Shared utilities
pub use utils::{Parallelism, run_with_threads};
