//! FTRL-Proximal model state and the predict/update equations.
//!
//! The model keeps two per-bucket accumulators of length `d`:
//!
//! - `n`: cumulative squared gradient, zero-initialized;
//! - `z`: accumulated gradient proxy, initialized to independent uniform
//!   values in `[0, 1)` from a PRNG seeded at construction. Zero-initializing
//!   `z` is the textbook choice; the random init is a deliberate departure
//!   this implementation preserves, since downstream numerical output
//!   depends on it.
//!
//! The effective weight `w` is never stored: it is recomputed from `n` and
//! `z` on every prediction (proximal sparsification), so it is always a pure
//! function of the current accumulators.
//!
//! # Hogwild updates
//!
//! During parallel training, workers read and write `n` and `z` without
//! mutual exclusion. Both arrays are stored as relaxed atomics holding f64
//! bit patterns: concurrent updates to the same bucket may lose increments,
//! which is the accepted approximation of asynchronous stochastic
//! optimization, but no access is undefined behavior.

use std::sync::atomic::AtomicU64;

use rand::prelude::*;

use crate::data::Frame;
use crate::error::FtrlError;
use crate::hash::{ByteHasher, HashKind};
use crate::training::{NullObserver, ProgressObserver, TrainingReport};
use crate::utils::{load_f64, store_f64};
use crate::{inference, training};

// =============================================================================
// Parameters
// =============================================================================

/// FTRL-Proximal construction parameters.
///
/// The learning hyperparameters carry no defaults and must be supplied
/// explicitly; only the execution knobs (`n_threads`, `report_every`) have
/// conventional values filled in by [`FtrlParams::new`].
#[derive(Clone, Debug)]
pub struct FtrlParams {
    /// Learning-rate schedule numerator (alpha).
    pub a: f64,
    /// Learning-rate schedule offset (beta).
    pub b: f64,
    /// L1 regularization strength.
    pub l1: f64,
    /// L2 regularization strength.
    pub l2: f64,
    /// Hash-space size: number of weight buckets.
    pub d: u64,
    /// Number of full training passes over the data.
    pub n_epochs: usize,
    /// Enable pairwise feature interactions.
    pub inter: bool,
    /// Byte-hash algorithm for feature hashing.
    pub hash_kind: HashKind,
    /// Seed for both the hashers and the `z` initialization.
    pub seed: u32,
    /// Worker threads: `0` = all available cores, `1` = sequential.
    pub n_threads: usize,
    /// Emit a progress event every this many rows; `0` disables them.
    pub report_every: usize,
}

impl FtrlParams {
    /// Assemble parameters, filling in the execution defaults
    /// (`n_threads = 0`, `report_every = 10_000`).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        a: f64,
        b: f64,
        l1: f64,
        l2: f64,
        d: u64,
        n_epochs: usize,
        inter: bool,
        hash_kind: HashKind,
        seed: u32,
    ) -> Self {
        Self {
            a,
            b,
            l1,
            l2,
            d,
            n_epochs,
            inter,
            hash_kind,
            seed,
            n_threads: 0,
            report_every: 10_000,
        }
    }

    fn validate(&self) -> Result<(), FtrlError> {
        let invalid = |name: &'static str, reason: String| FtrlError::InvalidParameter {
            name,
            reason,
        };

        if self.d == 0 {
            return Err(invalid("d", "hash space must hold at least one bucket".into()));
        }
        if self.d > usize::MAX as u64 {
            return Err(invalid("d", format!("{} buckets are not addressable", self.d)));
        }
        if !(self.a.is_finite() && self.a > 0.0) {
            return Err(invalid("a", format!("must be finite and positive, got {}", self.a)));
        }
        for (name, value) in [("b", self.b), ("l1", self.l1), ("l2", self.l2)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Model
// =============================================================================

/// FTRL-Proximal online learner over hashed tabular features.
///
/// # Example
///
/// ```
/// use ftrl::{Frame, Ftrl, FtrlParams, HashKind};
///
/// let train = Frame::builder()
///     .bool_column("active", vec![true, false, true, false])
///     .int_column("visits", vec![9, 1, 8, 0])
///     .bool_column("label", vec![true, false, true, false])
///     .build()
///     .unwrap();
///
/// let params = FtrlParams::new(0.1, 1.0, 0.0, 1.0, 1000, 3, false, HashKind::Murmur2, 1);
/// let mut model = Ftrl::new(params).unwrap();
/// let report = model.train(&train).unwrap();
/// assert_eq!(report.epoch_losses.len(), 3);
/// ```
#[derive(Debug)]
pub struct Ftrl {
    params: FtrlParams,
    /// Per-bucket cumulative squared gradient (f64 bits).
    n: Vec<AtomicU64>,
    /// Per-bucket accumulated gradient proxy (f64 bits).
    z: Vec<AtomicU64>,
    /// Column count of the training frame, label included. Recorded by the
    /// first `train` call and used to reject mismatched prediction frames.
    n_features: Option<usize>,
}

impl Ftrl {
    /// Validate parameters and initialize the model state.
    ///
    /// `n` starts at zero; `z` is filled with independent uniform values in
    /// `[0, 1)` from a PRNG seeded with `params.seed`.
    pub fn new(params: FtrlParams) -> Result<Self, FtrlError> {
        params.validate()?;
        let d = params.d as usize;

        let mut rng = StdRng::seed_from_u64(u64::from(params.seed));
        let n = (0..d).map(|_| AtomicU64::new(0f64.to_bits())).collect();
        let z = (0..d)
            .map(|_| AtomicU64::new(rng.r#gen::<f64>().to_bits()))
            .collect();

        Ok(Self {
            params,
            n,
            z,
            n_features: None,
        })
    }

    /// Construction parameters.
    pub fn params(&self) -> &FtrlParams {
        &self.params
    }

    /// Byte hasher configured from the model's hash kind and seed.
    pub(crate) fn hasher(&self) -> ByteHasher {
        ByteHasher::new(self.params.hash_kind, self.params.seed)
    }

    /// Training-frame column count recorded by the first `train` call.
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    // =========================================================================
    // Predict / Update Equations
    // =========================================================================

    /// Predict the positive-class probability for one encoded row.
    ///
    /// For every referenced bucket the effective weight is recomputed from
    /// the current accumulators: zero while `|z[i]| <= l1`, otherwise the
    /// proximal closed form. Each weight is recorded in `w` (slot-aligned
    /// with `x`) so the subsequent [`update_row`](Self::update_row) uses
    /// exactly the weights this prediction saw. Duplicate bucket references
    /// contribute once per occurrence.
    pub fn predict_row(&self, x: &[u64], w: &mut [f64]) -> f64 {
        debug_assert_eq!(x.len(), w.len());

        let FtrlParams { a, b, l1, l2, .. } = self.params;
        let mut wtx = 0.0;
        for (slot, &bucket) in x.iter().enumerate() {
            let i = bucket as usize;
            let zi = load_f64(&self.z[i]);
            let wi = if zi.abs() <= l1 {
                0.0
            } else {
                let ni = load_f64(&self.n[i]);
                (sign(zi) * l1 - zi) / ((b + ni.sqrt()) / a + l2)
            };
            w[slot] = wi;
            wtx += wi;
        }
        sigmoid(wtx)
    }

    /// Apply the FTRL update for one row.
    ///
    /// `p` is the prediction returned by the immediately preceding
    /// [`predict_row`](Self::predict_row) and `w` the weights it recorded;
    /// threading them through keeps the update consistent with the state the
    /// prediction observed.
    pub fn update_row(&self, x: &[u64], w: &[f64], p: f64, y: bool) {
        debug_assert_eq!(x.len(), w.len());

        let g = p - f64::from(u8::from(y));
        let gg = g * g;
        for (slot, &bucket) in x.iter().enumerate() {
            let i = bucket as usize;
            let ni = load_f64(&self.n[i]);
            let sigma = ((ni + gg).sqrt() - ni.sqrt()) / self.params.a;
            store_f64(&self.z[i], load_f64(&self.z[i]) + g - sigma * w[slot]);
            store_f64(&self.n[i], ni + gg);
        }
    }

    /// Current effective weight of one bucket.
    ///
    /// Recomputed from `n` and `z` on demand; the model never caches it.
    pub fn weight(&self, bucket: u64) -> f64 {
        let i = bucket as usize;
        let zi = load_f64(&self.z[i]);
        if zi.abs() <= self.params.l1 {
            0.0
        } else {
            let ni = load_f64(&self.n[i]);
            (sign(zi) * self.params.l1 - zi)
                / ((self.params.b + ni.sqrt()) / self.params.a + self.params.l2)
        }
    }

    /// Current `(n, z)` accumulators of one bucket.
    pub fn bucket_state(&self, bucket: u64) -> (f64, f64) {
        let i = bucket as usize;
        (load_f64(&self.n[i]), load_f64(&self.z[i]))
    }

    // =========================================================================
    // Host Entry Points
    // =========================================================================

    /// Train on a frame whose last column is the boolean label.
    ///
    /// Runs `n_epochs` full passes; epochs are strictly sequential, rows
    /// within an epoch are processed by parallel workers. Returns the
    /// per-epoch total log-loss.
    pub fn train(&mut self, frame: &Frame) -> Result<TrainingReport, FtrlError> {
        self.train_observed(frame, &NullObserver)
    }

    /// [`train`](Self::train) with a progress observer receiving events at
    /// the configured `report_every` cadence.
    pub fn train_observed(
        &mut self,
        frame: &Frame,
        observer: &dyn ProgressObserver,
    ) -> Result<TrainingReport, FtrlError> {
        if frame.n_cols() == 0 {
            return Err(FtrlError::MissingLabel);
        }
        self.n_features = Some(frame.n_cols());
        training::run_training(self, frame, observer)
    }

    /// Predict probabilities for a feature-only frame.
    ///
    /// Returns a one-column real frame named `target` with one row per input
    /// row. Calling this twice with no intervening training yields
    /// bit-identical output.
    pub fn predict(&self, frame: &Frame) -> Result<Frame, FtrlError> {
        self.predict_observed(frame, &NullObserver)
    }

    /// [`predict`](Self::predict) with a progress observer.
    pub fn predict_observed(
        &self,
        frame: &Frame,
        observer: &dyn ProgressObserver,
    ) -> Result<Frame, FtrlError> {
        if let Some(n_features) = self.n_features {
            let expected = n_features - 1;
            if frame.n_cols() != expected {
                return Err(FtrlError::FeatureCountMismatch {
                    expected,
                    got: frame.n_cols(),
                });
            }
        }
        inference::run_prediction(self, frame, observer)
    }

    /// Train on `train` and immediately predict `test`: the combined
    /// entry point of the original host interface.
    pub fn fit_predict(&mut self, train: &Frame, test: &Frame) -> Result<Frame, FtrlError> {
        self.train(train)?;
        self.predict(test)
    }
}

// =============================================================================
// Scalar Helpers
// =============================================================================

/// Logistic function.
#[inline]
pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sign with `sign(0) = 0`, as the proximal closed form requires.
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
