//! Observable progress stream for the training and prediction drivers.
//!
//! The drivers emit [`ProgressEvent`]s at a fixed row-count cadence instead
//! of printing to the console directly; any [`ProgressObserver`] can attach.
//! Observers are invoked from worker threads and must be `Sync`.

use std::sync::Mutex;

/// One progress notification from a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A training worker passed the report cadence.
    TrainRow {
        epoch: usize,
        /// Global row id of the reporting row, 1-based.
        rows_seen: usize,
        /// Prediction for that row.
        prediction: f64,
        /// Log-loss of that row.
        loss: f64,
        /// Running epoch loss divided by `rows_seen`. Approximate while
        /// other workers are still mid-flight.
        mean_loss: f64,
    },

    /// An epoch finished; `total_loss` covers every row exactly once.
    EpochEnd { epoch: usize, total_loss: f64 },

    /// A prediction worker passed the report cadence.
    PredictRow {
        /// Global row id of the reporting row, 1-based.
        rows_seen: usize,
        prediction: f64,
    },
}

/// Receiver for driver progress events.
///
/// Called concurrently from worker threads; implementations must be `Sync`
/// and should be cheap, since they run inside the row loop.
pub trait ProgressObserver: Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Observer that discards everything. The default for the plain
/// `train`/`predict` entry points.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Observer that records every event, for tests and audits.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far, in arrival order.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().expect("observer mutex poisoned").clone()
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.events.lock().expect("observer mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressObserver for CollectingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        self.events
            .lock()
            .expect("observer mutex poisoned")
            .push(event.clone());
    }
}
