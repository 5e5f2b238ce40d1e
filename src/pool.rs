//! Bounded-parallelism transcode pool.
//!
//! # Design
//!
//! Tasks fan out over rayon's global pool, sized once at startup from
//! `[processing] max_workers`. Each worker runs under
//! `std::panic::catch_unwind`, so a panicking codec poisons only its own
//! photo: the panic surfaces as an ordinary per-file failure next to decode
//! and write errors while every other task completes. There are no retries;
//! a failed photo stays out of the manifest, which makes the next run pick
//! it up again (no entry → reprocess).
//!
//! The worker is injected as a closure so pool behavior is testable without
//! real image codecs behind it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;

use rayon::prelude::*;

use crate::imaging::ImagingError;
use crate::transcode::{TranscodeFailure, TranscodeSuccess, TranscodeTask};

/// Progress events emitted as tasks complete, in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Transcoded { filename: String },
    Failed { filename: String, reason: String },
}

/// Everything a batch produced, partitioned by outcome.
///
/// Within each list, entries keep the order of the input tasks.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub successes: Vec<TranscodeSuccess>,
    pub failures: Vec<TranscodeFailure>,
}

/// Run all tasks in parallel, isolating failures per task.
///
/// Events are best-effort: a dropped receiver just means nobody is
/// listening, never an error.
pub fn run_batch<W>(
    tasks: &[TranscodeTask],
    worker: W,
    events: Option<Sender<RunEvent>>,
) -> BatchOutcome
where
    W: Fn(&TranscodeTask) -> Result<TranscodeSuccess, ImagingError> + Sync,
{
    let results: Vec<Result<TranscodeSuccess, TranscodeFailure>> = tasks
        .par_iter()
        .map_with(events, |events, task| {
            let outcome = run_isolated(task, &worker);
            if let Some(tx) = events {
                let _ = tx.send(match &outcome {
                    Ok(s) => RunEvent::Transcoded {
                        filename: s.filename.clone(),
                    },
                    Err(f) => RunEvent::Failed {
                        filename: f.filename.clone(),
                        reason: f.error.clone(),
                    },
                });
            }
            outcome
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for result in results {
        match result {
            Ok(s) => outcome.successes.push(s),
            Err(f) => outcome.failures.push(f),
        }
    }
    outcome
}

/// Run one task, converting both `Err` and a panic into a failure value.
fn run_isolated<W>(task: &TranscodeTask, worker: &W) -> Result<TranscodeSuccess, TranscodeFailure>
where
    W: Fn(&TranscodeTask) -> Result<TranscodeSuccess, ImagingError> + Sync,
{
    match panic::catch_unwind(AssertUnwindSafe(|| worker(task))) {
        Ok(Ok(success)) => Ok(success),
        Ok(Err(e)) => Err(TranscodeFailure {
            filename: task.filename.clone(),
            error: e.to_string(),
        }),
        Err(payload) => Err(TranscodeFailure {
            filename: task.filename.clone(),
            error: panic_message(payload),
        }),
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".to_string()
    }
}
