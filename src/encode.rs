//! Row encoding: one table row to a fixed-length array of bucket indices.
//!
//! Every encoded row has the layout
//!
//! ```text
//! [ bias | feature buckets .. | interaction buckets .. ]
//! ```
//!
//! Slot 0 is the always-active bias bucket (index 0). Each feature column
//! contributes one bucket: a per-type value hash, wrapping-added to the hash
//! of the column name so that identical values in different columns land in
//! different buckets, reduced modulo the hash-space size `d`. When pairwise
//! interactions are enabled, every unordered column pair `(i, j)` with
//! `i < j`, enumerated in lexicographic order, contributes one further
//! bucket: the hash of the concatenated decimal representations of the two
//! feature bucket indices.
//!
//! Collisions between distinct features are expected and accepted; this is
//! feature hashing into a bounded space, not a perfect map.

use std::fmt::Write as _;

use ndarray::Array1;

use crate::data::{Column, Frame, StrColumn};
use crate::error::FtrlError;
use crate::hash::{ByteHasher, hash_f64};

// =============================================================================
// Per-Worker Scratch
// =============================================================================

/// Reusable per-worker buffers for encoding and prediction.
///
/// Owned exclusively by one worker; never shared.
#[derive(Debug, Clone)]
pub struct RowScratch {
    /// Bucket indices for the current row.
    pub(crate) x: Vec<u64>,
    /// Effective weights computed by the most recent predict for `x`.
    pub(crate) w: Vec<f64>,
    /// Decimal-concatenation buffer for interaction hashing.
    pair: String,
}

impl RowScratch {
    /// Allocate scratch for rows of `n_slots` buckets.
    pub fn new(n_slots: usize) -> Self {
        Self {
            x: vec![0; n_slots],
            w: vec![0.0; n_slots],
            pair: String::with_capacity(40),
        }
    }

    /// Bucket indices of the most recently encoded row.
    pub fn buckets(&self) -> &[u64] {
        &self.x
    }
}

// =============================================================================
// Feature Sources
// =============================================================================

/// Tagged accessor for one feature column, validated once per driver run.
///
/// Building these up front replaces a per-row type switch and makes the hot
/// encode loop infallible.
#[derive(Debug)]
enum FeatureSource<'a> {
    Bool(&'a Array1<bool>),
    Int(&'a Array1<i32>),
    Real(&'a Array1<f64>),
    Str(&'a StrColumn),
}

impl FeatureSource<'_> {
    /// Raw 64-bit value hash for `row`, before name folding and bucketing.
    #[inline]
    fn value_hash(&self, row: usize, hasher: &ByteHasher) -> u64 {
        match self {
            FeatureSource::Bool(values) => u64::from(values[row]),
            // Sign-extending cast: negative ints keep their two's-complement
            // pattern, matching the original kernel.
            FeatureSource::Int(values) => values[row] as i64 as u64,
            FeatureSource::Real(values) => hash_f64(values[row]),
            FeatureSource::Str(values) => hasher.hash_bytes(values.value(row)),
        }
    }
}

// =============================================================================
// Row Encoder
// =============================================================================

/// Encodes frame rows into bucket indices in `[0, d)`.
#[derive(Debug)]
pub struct RowEncoder<'a> {
    features: Vec<FeatureSource<'a>>,
    name_hashes: Vec<u64>,
    hasher: ByteHasher,
    d: u64,
    inter: bool,
}

impl<'a> RowEncoder<'a> {
    /// Validate the first `n_feature_cols` columns of `frame` and prepare
    /// per-column accessors and name hashes.
    ///
    /// Fails with [`FtrlError::UnsupportedColumnType`] if any feature column
    /// has a logical type outside {bool, int, real, str}; nothing is encoded
    /// in that case.
    pub fn new(
        frame: &'a Frame,
        n_feature_cols: usize,
        hasher: ByteHasher,
        d: u64,
        inter: bool,
    ) -> Result<Self, FtrlError> {
        let mut features = Vec::with_capacity(n_feature_cols);
        let mut name_hashes = Vec::with_capacity(n_feature_cols);

        for col in 0..n_feature_cols {
            let source = match frame.column(col) {
                Column::Bool(values) => FeatureSource::Bool(values),
                Column::Int(values) => FeatureSource::Int(values),
                Column::Real(values) => FeatureSource::Real(values),
                Column::Str(values) => FeatureSource::Str(values),
                other => {
                    return Err(FtrlError::UnsupportedColumnType {
                        name: frame.name(col).to_string(),
                        ltype: other.logical_type(),
                    });
                }
            };
            features.push(source);
            name_hashes.push(hasher.hash_bytes(frame.name(col).as_bytes()));
        }

        Ok(Self {
            features,
            name_hashes,
            hasher,
            d,
            inter,
        })
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Number of pairwise interaction slots.
    pub fn n_interactions(&self) -> usize {
        if self.inter {
            let k = self.features.len();
            k * k.saturating_sub(1) / 2
        } else {
            0
        }
    }

    /// Total slots per encoded row: bias + features + interactions.
    pub fn n_slots(&self) -> usize {
        1 + self.n_features() + self.n_interactions()
    }

    /// Encode `row` into `scratch.x`.
    ///
    /// `scratch` must have been created with [`RowScratch::new`] for this
    /// encoder's [`n_slots`](Self::n_slots).
    pub fn encode_into(&self, row: usize, scratch: &mut RowScratch) {
        debug_assert_eq!(scratch.x.len(), self.n_slots());

        let k = self.features.len();
        scratch.x[0] = 0; // bias bucket

        for (col, source) in self.features.iter().enumerate() {
            let value = source.value_hash(row, &self.hasher);
            scratch.x[col + 1] = value.wrapping_add(self.name_hashes[col]) % self.d;
        }

        if self.inter {
            let mut slot = 1 + k;
            for i in 0..k {
                for j in (i + 1)..k {
                    scratch.pair.clear();
                    // Infallible: writing integers into a String
                    let _ = write!(scratch.pair, "{}{}", scratch.x[i + 1], scratch.x[j + 1]);
                    scratch.x[slot] = self.hasher.hash_bytes(scratch.pair.as_bytes()) % self.d;
                    slot += 1;
                }
            }
        }
    }
}
