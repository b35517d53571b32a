//! A single in-memory workbench session.
//!
//! [`Session`] is the only owner of [`AppState`]. User intents are applied
//! synchronously through [`Session::dispatch`]; upload tasks enqueue
//! messages that are applied when the session processes its queue. Either
//! way each action goes through [`reduce`] exactly once, so there is no
//! concurrent mutation.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use vidbench_core::actions::Action;
use vidbench_core::entities::{AppState, UploadItem};
use vidbench_core::readiness::{self, DeliveryReadiness};
use vidbench_core::reducer::{reduce, Outcome};
use vidbench_core::versioning::ConflictMode;
use vidbench_core::workbench::{self, Confirm, SelectedFile, UploadPlan};

use crate::config::SessionConfig;
use crate::events::{EventBus, WorkbenchEvent};
use crate::simulator::{QueueMessage, SimulatorConfig, UploadSimulator};

pub struct Session {
    state: AppState,
    tx: mpsc::UnboundedSender<QueueMessage>,
    rx: mpsc::UnboundedReceiver<QueueMessage>,
    bus: Arc<EventBus>,
    simulator: UploadSimulator,
}

impl Session {
    pub fn new(state: AppState, config: &SessionConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            tx,
            rx,
            bus: Arc::new(EventBus::default()),
            simulator: UploadSimulator::new(SimulatorConfig::from(config)),
        }
    }

    /// Publish to a shared bus instead of a private one.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = bus;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(mut self) -> AppState {
        self.simulator.shutdown();
        std::mem::take(&mut self.state)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkbenchEvent> {
        self.bus.subscribe()
    }

    /// Apply one action and publish it if it changed anything.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let event = WorkbenchEvent::from_action(&action);
        let outcome = reduce(&mut self.state, action);

        match outcome {
            Outcome::Applied => {
                tracing::debug!(action = %event.event_type, "Action applied");
                self.bus.publish(event);
            }
            Outcome::Ignored => {
                tracing::debug!(action = %event.event_type, "Action ignored");
            }
        }
        outcome
    }

    // -- Uploads -------------------------------------------------------------

    /// Resolve a picked file against the selected project.
    pub fn prepare_upload(&self, file: SelectedFile) -> Option<UploadPlan> {
        let plan = workbench::prepare_upload(&self.state, file)?;
        tracing::info!(
            file = %plan.file.name,
            is_new_series = plan.resolution.is_new_series,
            next_version = plan.resolution.next_version,
            "Upload resolved",
        );
        Some(plan)
    }

    /// Enqueue the upload and spawn its progress task.
    pub fn start_upload(&mut self, plan: UploadPlan) -> Option<UploadItem> {
        let Some((item, action)) = workbench::begin_upload(&self.state, &plan) else {
            tracing::warn!(project_id = %plan.project_id, "Upload target project missing");
            return None;
        };
        if !self.dispatch(action).is_applied() {
            return None;
        }

        tracing::info!(
            upload_id = %item.id,
            filename = %item.filename,
            project = %item.target_project_name,
            "Upload started",
        );
        self.simulator.start(item.id.clone(), plan, self.tx.clone());
        Some(item)
    }

    /// Prepare and start in one step, optionally overriding the disposition
    /// and change log.
    pub fn upload(
        &mut self,
        file: SelectedFile,
        mode: Option<ConflictMode>,
        change_log: Option<String>,
    ) -> Option<UploadItem> {
        let mut plan = self.prepare_upload(file)?;
        if let Some(mode) = mode {
            plan = plan.with_mode(mode);
        }
        if let Some(change_log) = change_log {
            plan = plan.with_change_log(change_log);
        }
        self.start_upload(plan)
    }

    /// Stop a running upload. Its queue entry keeps the last progress value.
    pub fn cancel_upload(&mut self, upload_id: &str) -> bool {
        self.simulator.cancel(upload_id)
    }

    pub fn active_uploads(&self) -> usize {
        self.simulator.active_count()
    }

    // -- Transitions ---------------------------------------------------------

    pub fn finalize(&mut self, project_id: &str, confirm: &mut impl Confirm) -> Outcome {
        match workbench::finalize_project(&self.state, project_id, confirm) {
            Some(action) => self.dispatch(action),
            None => {
                tracing::info!(project_id, "Finalize declined");
                Outcome::Ignored
            }
        }
    }

    pub fn complete_delivery(&mut self, project_id: &str, confirm: &mut impl Confirm) -> Outcome {
        match workbench::complete_delivery(&self.state, project_id, confirm) {
            Some(action) => self.dispatch(action),
            None => {
                tracing::info!(project_id, "Complete delivery declined");
                Outcome::Ignored
            }
        }
    }

    /// Readiness report for a project's delivery, if one exists.
    pub fn delivery_readiness(&self, project_id: &str) -> Option<DeliveryReadiness> {
        let delivery = self.state.delivery(project_id)?;
        Some(readiness::evaluate_delivery(
            delivery,
            self.state.project_videos(project_id),
        ))
    }

    // -- Queue ---------------------------------------------------------------

    fn handle(&mut self, message: QueueMessage) {
        match message {
            QueueMessage::Apply(action) => {
                self.dispatch(action);
            }
            QueueMessage::Settled { upload_id } => {
                self.simulator.settle(&upload_id);
                tracing::debug!(upload_id = %upload_id, "Upload task settled");
            }
        }
    }

    /// Wait for and apply the next queued message.
    ///
    /// Returns `false` only if the queue is closed, which cannot happen
    /// while the session holds its own sender.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.handle(message);
                true
            }
            None => false,
        }
    }

    /// Apply everything already queued without waiting. Returns the count.
    pub fn drain_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message);
            count += 1;
        }
        count
    }

    /// Process the queue until every upload task has settled.
    pub async fn run_until_idle(&mut self) {
        while self.simulator.active_count() > 0 {
            if !self.process_next().await {
                break;
            }
        }
        self.drain_pending();
    }

    /// Cancel all upload tasks.
    pub fn shutdown(&mut self) {
        let active = self.simulator.active_count();
        self.simulator.shutdown();
        self.drain_pending();
        tracing::info!(active, "Session shut down");
    }
}
