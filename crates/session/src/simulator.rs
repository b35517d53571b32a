//! Timer-driven upload simulation.
//!
//! Each upload runs as its own tokio task. On every tick it advances a
//! [`ProgressSimulation`] by a random increment and sends the new
//! percentage back to the session as an [`Action`]. At 100% the timer is
//! dropped and, after a fixed delay, the queue entry is completed and the new
//! video is added in one batch. Tasks never touch [`AppState`](vidbench_core::entities::AppState)
//! directly; they only enqueue messages.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use vidbench_core::actions::Action;
use vidbench_core::progress::ProgressSimulation;
use vidbench_core::types::EntityId;
use vidbench_core::workbench::UploadPlan;

use crate::config::SessionConfig;

/// Messages flowing from upload tasks into the session queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueMessage {
    /// A state update to apply.
    Apply(Action),
    /// The task for this upload has exited; no more messages will follow.
    Settled { upload_id: EntityId },
}

/// Timing and randomness for simulated uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub tick: Duration,
    pub completion_delay: Duration,
    pub max_step: f64,
    pub rng_seed: Option<u64>,
}

impl From<&SessionConfig> for SimulatorConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            tick: config.upload_tick,
            completion_delay: config.completion_delay,
            max_step: config.max_step,
            rng_seed: config.rng_seed,
        }
    }
}

struct UploadTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the running upload tasks.
pub struct UploadSimulator {
    config: SimulatorConfig,
    cancel: CancellationToken,
    tasks: HashMap<EntityId, UploadTask>,
    started: u64,
}

impl UploadSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            tasks: HashMap::new(),
            started: 0,
        }
    }

    /// Spawn the progress task for `upload_id`. Must be called inside a
    /// tokio runtime.
    pub fn start(
        &mut self,
        upload_id: EntityId,
        plan: UploadPlan,
        tx: mpsc::UnboundedSender<QueueMessage>,
    ) {
        let rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.started)),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        self.started += 1;

        let cancel = self.cancel.child_token();
        let handle = tokio::spawn(run_upload(
            upload_id.clone(),
            plan,
            tx,
            self.config.clone(),
            rng,
            cancel.clone(),
        ));

        tracing::debug!(upload_id = %upload_id, "Upload task spawned");
        self.tasks.insert(upload_id, UploadTask { cancel, handle });
    }

    /// Stop one upload. Returns `false` if it is not running.
    pub fn cancel(&mut self, upload_id: &str) -> bool {
        match self.tasks.get(upload_id) {
            Some(task) => {
                task.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Forget a task once its `Settled` message has been received.
    pub fn settle(&mut self, upload_id: &str) {
        self.tasks.remove(upload_id);
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_active(&self, upload_id: &str) -> bool {
        self.tasks.contains_key(upload_id)
    }

    /// Cancel every task and abort any that are still scheduled.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        for (upload_id, task) in self.tasks.drain() {
            if !task.handle.is_finished() {
                tracing::debug!(upload_id = %upload_id, "Aborting upload task");
                task.handle.abort();
            }
        }
    }
}

impl Drop for UploadSimulator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_upload(
    upload_id: EntityId,
    plan: UploadPlan,
    tx: mpsc::UnboundedSender<QueueMessage>,
    config: SimulatorConfig,
    mut rng: StdRng,
    cancel: CancellationToken,
) {
    let finished = drive_upload(&upload_id, &plan, &tx, &config, &mut rng, &cancel).await;
    if finished {
        tracing::info!(upload_id = %upload_id, filename = %plan.final_name(), "Upload complete");
    } else {
        tracing::info!(upload_id = %upload_id, "Upload cancelled");
    }
    let _ = tx.send(QueueMessage::Settled { upload_id });
}

/// Returns `true` when the upload ran to completion.
async fn drive_upload(
    upload_id: &EntityId,
    plan: &UploadPlan,
    tx: &mpsc::UnboundedSender<QueueMessage>,
    config: &SimulatorConfig,
    rng: &mut StdRng,
    cancel: &CancellationToken,
) -> bool {
    let send = |action: Action| tx.send(QueueMessage::Apply(action)).is_ok();

    let mut progress = ProgressSimulation::new(config.max_step);
    let mut ticker = interval_at(Instant::now() + config.tick, config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !progress.is_complete() {
        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = ticker.tick() => {
                // (0, max_step]
                let increment = progress.max_step() - rng.random_range(0.0..progress.max_step());
                let percent = progress.advance(increment);
                tracing::trace!(upload_id = %upload_id, percent, "Upload progress");
                if !send(Action::UpdateUploadProgress {
                    id: upload_id.clone(),
                    progress: percent,
                }) {
                    return false;
                }
            }
        }
    }
    drop(ticker);

    tokio::select! {
        _ = cancel.cancelled() => return false,
        _ = tokio::time::sleep(config.completion_delay) => {}
    }

    // Completion and the new video land together, so a queue entry is never
    // `Completed` without its video.
    let now = Utc::now();
    send(Action::CompleteUpload(upload_id.clone()))
        && send(Action::AddVideo(plan.completed_video(now)))
        && send(Action::AddNotification(plan.completed_notification(now)))
}
