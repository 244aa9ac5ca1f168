//! Error taxonomy for model construction, training, and prediction.

use crate::data::LogicalType;

/// Errors surfaced by the FTRL kernel.
///
/// There are no retries anywhere: every failure is immediately fatal for the
/// call that raised it. Construction failures leave no usable model; encoding
/// failures abort the call before any row of the offending frame is
/// processed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FtrlError {
    /// A construction parameter is malformed (for example `d = 0`).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// A feature column has a logical type the encoder cannot hash.
    #[error("unsupported column type `{ltype}` for feature column `{name}`")]
    UnsupportedColumnType { name: String, ltype: LogicalType },

    /// A training frame carried no columns at all.
    #[error("training frame has no columns; expected a boolean label as the last column")]
    MissingLabel,

    /// The last column of a training frame is not boolean.
    #[error("label column `{name}` must be boolean, got `{ltype}`")]
    LabelNotBoolean { name: String, ltype: LogicalType },

    /// A prediction frame does not match the trained feature layout.
    #[error("frame has {got} feature columns, but the model was trained with {expected}")]
    FeatureCountMismatch { expected: usize, got: usize },
}
