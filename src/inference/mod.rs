//! Prediction driver: label-free scoring into a result frame.
//!
//! Uses the same strided row partitioning as training, but only predicts.
//! Every worker writes its probabilities into the result buffer by row id,
//! so the output is deterministic regardless of worker scheduling and two
//! runs on the same state are bit-identical.

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array1;

use crate::data::Frame;
use crate::encode::{RowEncoder, RowScratch};
use crate::error::FtrlError;
use crate::model::Ftrl;
use crate::training::{ProgressEvent, ProgressObserver};
use crate::utils::run_with_threads;

/// Name of the single column in the result frame.
const TARGET_COLUMN: &str = "target";

/// Score every row of `frame`, returning a one-column probability frame.
pub(crate) fn run_prediction(
    model: &Ftrl,
    frame: &Frame,
    observer: &dyn ProgressObserver,
) -> Result<Frame, FtrlError> {
    let params = model.params();
    let encoder = RowEncoder::new(
        frame,
        frame.n_cols(),
        model.hasher(),
        params.d,
        params.inter,
    )?;

    let n_rows = frame.n_rows();
    let report_every = params.report_every;
    let n_slots = encoder.n_slots();

    // Slots are written once each by exactly one worker; atomics only make
    // the strided sharing expressible without locks.
    let out: Vec<AtomicU64> = (0..n_rows).map(|_| AtomicU64::new(0)).collect();

    run_with_threads(params.n_threads, |parallelism| {
        let n_workers = parallelism.n_workers();
        parallelism.maybe_par_for_each_init(
            0..n_workers,
            || RowScratch::new(n_slots),
            |scratch, worker| {
                let mut row = worker;
                while row < n_rows {
                    encoder.encode_into(row, scratch);
                    let p = model.predict_row(&scratch.x, &mut scratch.w);
                    out[row].store(p.to_bits(), Ordering::Relaxed);

                    if report_every > 0 && (row + 1) % report_every == 0 {
                        observer.on_event(&ProgressEvent::PredictRow {
                            rows_seen: row + 1,
                            prediction: p,
                        });
                    }
                    row += n_workers;
                }
            },
        );
    });

    let values: Vec<f64> = out
        .iter()
        .map(|cell| f64::from_bits(cell.load(Ordering::Relaxed)))
        .collect();
    Ok(Frame::single_real(TARGET_COLUMN, Array1::from(values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, LogicalType};
    use crate::hash::HashKind;
    use crate::model::FtrlParams;
    use crate::training::CollectingObserver;

    fn feature_frame() -> Frame {
        Frame::builder()
            .bool_column("flag", vec![true, false, true])
            .int_column("count", vec![3, 1, 4])
            .build()
            .unwrap()
    }

    fn model() -> Ftrl {
        Ftrl::new(FtrlParams::new(
            0.1,
            1.0,
            0.0,
            1.0,
            500,
            1,
            false,
            HashKind::Murmur2,
            7,
        ))
        .unwrap()
    }

    #[test]
    fn result_frame_shape() {
        let model = model();
        let result = model.predict(&feature_frame()).unwrap();
        assert_eq!(result.n_cols(), 1);
        assert_eq!(result.n_rows(), 3);
        assert_eq!(result.name(0), "target");
        assert_eq!(result.logical_type(0), LogicalType::Real);
    }

    #[test]
    fn probabilities_are_open_unit_interval() {
        let model = model();
        let result = model.predict(&feature_frame()).unwrap();
        let values = result.column(0).as_real().unwrap();
        for &p in values {
            assert!(p > 0.0 && p < 1.0);
        }
    }

    #[test]
    fn prediction_is_idempotent() {
        let model = model();
        let frame = feature_frame();
        let first = model.predict(&frame).unwrap();
        let second = model.predict(&frame).unwrap();
        let a = first.column(0).as_real().unwrap();
        let b = second.column(0).as_real().unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn unsupported_feature_type_fails_whole_call() {
        let frame = Frame::builder()
            .int_column("count", vec![1])
            .column("when", Column::DateTime(Array1::from(vec![5i64])))
            .build()
            .unwrap();
        assert!(matches!(
            model().predict(&frame).unwrap_err(),
            FtrlError::UnsupportedColumnType { .. }
        ));
    }

    #[test]
    fn predict_reports_at_cadence() {
        let mut params = FtrlParams::new(0.1, 1.0, 0.0, 1.0, 500, 1, false, HashKind::Murmur2, 7);
        params.report_every = 1;
        params.n_threads = 1;
        let model = Ftrl::new(params).unwrap();

        let observer = CollectingObserver::new();
        model
            .predict_observed(&feature_frame(), &observer)
            .unwrap();
        let rows = observer
            .events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::PredictRow { .. }))
            .count();
        assert_eq!(rows, 3);
    }
}
