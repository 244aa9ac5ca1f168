//! Console observer for training progress.

use super::progress::{ProgressEvent, ProgressObserver};

/// Verbosity level for training output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output.
    Silent,
    /// Per-cadence rows and epoch totals.
    #[default]
    Info,
}

/// [`ProgressObserver`] that prints progress to stdout.
///
/// Reproduces the report lines of the original console kernel; attach it via
/// [`Ftrl::train_observed`](crate::Ftrl::train_observed) to watch long runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrainingLogger {
    verbosity: Verbosity,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl ProgressObserver for TrainingLogger {
    fn on_event(&self, event: &ProgressEvent) {
        if self.verbosity < Verbosity::Info {
            return;
        }
        match *event {
            ProgressEvent::TrainRow {
                epoch,
                rows_seen,
                prediction,
                loss,
                mean_loss,
            } => {
                println!(
                    "Training epoch: {epoch}\t row: {rows_seen}\t prediction: {prediction:.6}\t \
                     loss: {loss:.6}\t average loss: {mean_loss:.6}"
                );
            }
            ProgressEvent::EpochEnd { epoch, total_loss } => {
                println!("Epoch {epoch} done\t total loss: {total_loss:.6}");
            }
            ProgressEvent::PredictRow {
                rows_seen,
                prediction,
            } => {
                println!("Testing row: {rows_seen}\t prediction: {prediction:.6}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_logger_emits_nothing() {
        // Smoke test: a silent logger must not panic on any event kind.
        let logger = TrainingLogger::new(Verbosity::Silent);
        logger.on_event(&ProgressEvent::EpochEnd {
            epoch: 0,
            total_loss: 0.0,
        });
    }

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Silent < Verbosity::Info);
        assert_eq!(Verbosity::default(), Verbosity::Info);
    }
}
