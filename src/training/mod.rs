//! Training infrastructure.
//!
//! - [`TrainingReport`]: per-epoch loss totals returned by training
//! - [`ProgressEvent`] / [`ProgressObserver`]: observable progress stream
//! - [`TrainingLogger`], [`Verbosity`]: console observer
//!
//! The training driver itself lives in [`trainer`] and is reached through
//! [`Ftrl::train`](crate::Ftrl::train).

mod logger;
mod progress;
mod trainer;

pub use logger::{TrainingLogger, Verbosity};
pub use progress::{CollectingObserver, NullObserver, ProgressEvent, ProgressObserver};
pub use trainer::{TrainingReport, log_loss};

pub(crate) use trainer::run_training;
