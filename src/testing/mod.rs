//! Deterministic synthetic frames for tests and benchmarks.

use rand::prelude::*;

use crate::data::{Frame, StrColumn};

/// Generate a linearly separable binary training set.
///
/// Columns: `[bool_feature, int_feature, bool_label]`. The label equals the
/// boolean feature, and the integer feature lands in `5..10` for positive
/// rows and `0..5` for negative ones, so a linear model can separate the
/// classes perfectly.
pub fn separable_train_frame(rows: usize, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut flags = Vec::with_capacity(rows);
    let mut counts = Vec::with_capacity(rows);
    let mut labels = Vec::with_capacity(rows);
    for _ in 0..rows {
        let label = rng.r#gen::<bool>();
        let count = if label {
            rng.gen_range(5..10)
        } else {
            rng.gen_range(0..5)
        };
        flags.push(label);
        counts.push(count);
        labels.push(label);
    }

    Frame::builder()
        .bool_column("bool_feature", flags)
        .int_column("int_feature", counts)
        .bool_column("bool_label", labels)
        .build()
        .expect("synthetic frame columns are equal-length by construction")
}

/// Feature-only view of [`separable_train_frame`]: same generator, same
/// seed, label column omitted.
pub fn separable_feature_frame(rows: usize, seed: u64) -> Frame {
    let train = separable_train_frame(rows, seed);
    Frame::builder()
        .column("bool_feature", train.column(0).clone())
        .column("int_feature", train.column(1).clone())
        .build()
        .expect("synthetic frame columns are equal-length by construction")
}

/// Labels of [`separable_train_frame`] for the same `(rows, seed)`.
pub fn separable_labels(rows: usize, seed: u64) -> Vec<bool> {
    let train = separable_train_frame(rows, seed);
    train
        .column(2)
        .as_bool()
        .expect("label column is boolean by construction")
        .iter()
        .copied()
        .collect()
}

/// Generate a frame exercising all four supported column types, with a noisy
/// boolean label appended.
pub fn mixed_type_train_frame(rows: usize, seed: u64) -> Frame {
    const TAGS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];
    let mut rng = StdRng::seed_from_u64(seed);

    let mut flags = Vec::with_capacity(rows);
    let mut counts = Vec::with_capacity(rows);
    let mut scores = Vec::with_capacity(rows);
    let mut tags = StrColumn::new();
    let mut labels = Vec::with_capacity(rows);

    for _ in 0..rows {
        let label = rng.r#gen::<bool>();
        flags.push(rng.r#gen::<bool>());
        counts.push(rng.gen_range(-100..100));
        scores.push(rng.r#gen::<f64>() + if label { 0.5 } else { -0.5 });
        tags.push(TAGS[rng.gen_range(0..TAGS.len())]);
        labels.push(label);
    }

    Frame::builder()
        .bool_column("flag", flags)
        .int_column("count", counts)
        .real_column("score", scores)
        .str_column("tag", tags)
        .bool_column("label", labels)
        .build()
        .expect("synthetic frame columns are equal-length by construction")
}
