//! Bounded worker pool over a shared segment queue.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::SegmentError;
use crate::segmenter::ScnRange;
use crate::source::{ChangeRecord, ConnectionFactory};

use super::segment;

/// Records processed and wall time for one successful segment.
#[derive(Debug, Clone, Copy)]
pub(super) struct SegmentOutcome {
    pub records: u64,
    pub elapsed: Duration,
}

pub(super) type SegmentResult = Result<SegmentOutcome, SegmentError>;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs every segment on at most `workers` threads and returns each segment's result
/// keyed by its index in `segments`, in completion order. A failing or panicking
/// segment never stops its siblings. Blocks until all segments finished.
pub(super) fn run_bounded<F, C>(
    factory: &F,
    setup_sql: &str,
    segments: &[ScnRange],
    workers: usize,
    batch_size: usize,
    callback: &C,
) -> Vec<(usize, SegmentResult)>
where
    F: ConnectionFactory,
    C: Fn(&[ChangeRecord]) -> anyhow::Result<()> + Sync,
{
    let count = segments.len();
    if count == 0 {
        return Vec::new();
    }
    let work: Mutex<VecDeque<usize>> = Mutex::new((0..count).collect());
    let num_workers = workers.clamp(1, count);

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            scope.spawn(move || loop {
                let next = work
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();
                let Some(index) = next else {
                    break;
                };
                let seg = &segments[index];
                let started = Instant::now();
                let res = panic::catch_unwind(AssertUnwindSafe(|| {
                    segment::process_one_segment(factory, setup_sql, seg, batch_size, callback)
                }))
                .unwrap_or_else(|payload| Err(SegmentError::Panicked(panic_message(&*payload))))
                .map(|records| SegmentOutcome {
                    records,
                    elapsed: started.elapsed(),
                });
                if tx.send((index, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        let mut completed = 0usize;
        let mut results = Vec::with_capacity(count);
        for (index, res) in rx {
            let seg = &segments[index];
            match &res {
                Ok(outcome) => {
                    completed += 1;
                    tracing::info!(
                        "segment done ({}/{}): {} -> {} records in {:.2}s",
                        completed,
                        count,
                        seg,
                        outcome.records,
                        outcome.elapsed.as_secs_f64()
                    );
                }
                Err(e) => tracing::error!("segment failed {}: {}", seg, e),
            }
            results.push((index, res));
        }
        results
    })
}
