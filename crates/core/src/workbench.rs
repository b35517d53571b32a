//! Workbench controller: turns user intents into [`Action`]s.
//!
//! Every function here reads state and returns the action to dispatch, or
//! `None` when the intent is declined (missing target, wrong status, or a
//! refused confirmation). Nothing is mutated directly.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::entities::{
    AppState, ChecklistField, MediaType, Notification, NotificationKind, ProjectStatus,
    UploadItem, UploadStatus, Video, VideoStatus,
};
use crate::readiness;
use crate::types::{
    new_id, EntityId, Timestamp, NOTIFICATION_ID_PREFIX, UPLOAD_ID_PREFIX, VIDEO_ID_PREFIX,
};
use crate::versioning::{self, ConflictMode, VersionResolution};

/// Duration recorded on simulated uploads.
pub const PLACEHOLDER_DURATION: &str = "00:00:00";

/// Resolution recorded on simulated uploads.
pub const PLACEHOLDER_RESOLUTION: &str = "1920x1080";

/// Change log used when the uploader leaves it blank.
pub const DEFAULT_CHANGE_LOG: &str = "Uploaded new file";

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

/// An irreversible transition awaiting the user's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConfirmPrompt {
    FinalizeProject { project_name: String },
    CompleteDelivery { project_name: String },
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        match self {
            Self::FinalizeProject { project_name } => format!(
                "Finalize {project_name}? This locks the project and moves it to delivery."
            ),
            Self::CompleteDelivery { project_name } => format!(
                "Complete delivery of {project_name}? This formally delivers the project."
            ),
        }
    }
}

/// Asks the user to confirm an irreversible transition.
pub trait Confirm {
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ConfirmPrompt) -> bool,
{
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool {
        self(prompt)
    }
}

// ---------------------------------------------------------------------------
// Upload planning
// ---------------------------------------------------------------------------

/// A file picked by the user. Bytes are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// The upload configuration dialog: resolution plus the user's choices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadPlan {
    pub project_id: EntityId,
    pub project_name: String,
    pub file: SelectedFile,
    pub resolution: VersionResolution,
    pub mode: ConflictMode,
    pub change_log: String,
}

impl UploadPlan {
    /// Override the proposed disposition.
    pub fn with_mode(mut self, mode: ConflictMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_change_log(mut self, change_log: impl Into<String>) -> Self {
        self.change_log = change_log.into();
        self
    }

    pub fn final_name(&self) -> String {
        self.resolution.name_for(self.mode)
    }

    pub fn final_version(&self) -> u32 {
        self.resolution.version_for(self.mode)
    }

    /// Queue entry for this upload, with a fresh id.
    pub fn upload_item(&self) -> UploadItem {
        UploadItem {
            id: new_id(UPLOAD_ID_PREFIX),
            filename: self.final_name(),
            progress: 0,
            status: UploadStatus::Uploading,
            target_project_name: self.project_name.clone(),
        }
    }

    /// The video materialised once the simulated transfer finishes.
    pub fn completed_video(&self, completed_at: Timestamp) -> Video {
        let change_log = self.change_log.trim();
        Video {
            id: new_id(VIDEO_ID_PREFIX),
            project_id: self.project_id.clone(),
            name: self.final_name(),
            media_type: MediaType::Video,
            url: String::new(),
            version: self.final_version(),
            upload_time: completed_at,
            is_case_file: false,
            is_main_delivery: false,
            size_bytes: self.file.size_bytes,
            duration: Some(PLACEHOLDER_DURATION.to_string()),
            resolution: Some(PLACEHOLDER_RESOLUTION.to_string()),
            status: VideoStatus::Initial,
            change_log: Some(if change_log.is_empty() {
                DEFAULT_CHANGE_LOG.to_string()
            } else {
                change_log.to_string()
            }),
            tags: Vec::new(),
        }
    }

    /// Success notice posted after the video lands.
    pub fn completed_notification(&self, at: Timestamp) -> Notification {
        Notification {
            id: new_id(NOTIFICATION_ID_PREFIX),
            kind: NotificationKind::Success,
            title: "Upload complete".to_string(),
            message: format!("{} added to {}", self.final_name(), self.project_name),
            time: at,
        }
    }
}

/// Resolve a picked file against the selected project's videos.
///
/// Declines when no project is selected.
pub fn prepare_upload(state: &AppState, file: SelectedFile) -> Option<UploadPlan> {
    let project = state.selected_project()?;
    let resolution = versioning::resolve(&file.name, state.project_videos(&project.id));
    let mode = resolution.default_mode();

    Some(UploadPlan {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        file,
        resolution,
        mode,
        change_log: String::new(),
    })
}

/// Commit a plan: returns the queue entry and the action that enqueues it.
///
/// Declines if the target project has disappeared since planning.
pub fn begin_upload(state: &AppState, plan: &UploadPlan) -> Option<(UploadItem, Action)> {
    state.project(&plan.project_id)?;
    let item = plan.upload_item();
    let action = Action::AddUpload(item.clone());
    Some((item, action))
}

// ---------------------------------------------------------------------------
// Project transitions
// ---------------------------------------------------------------------------

/// Only `active` projects can be finalized.
pub fn can_finalize(state: &AppState, project_id: &str) -> bool {
    state
        .project(project_id)
        .is_some_and(|p| p.status == ProjectStatus::Active)
}

/// `finalized` projects whose checklist is ready can complete delivery.
pub fn can_complete_delivery(state: &AppState, project_id: &str) -> bool {
    let Some(project) = state.project(project_id) else {
        return false;
    };
    if project.status != ProjectStatus::Finalized {
        return false;
    }
    state
        .delivery(project_id)
        .is_some_and(|d| readiness::is_ready(d, state.project_videos(project_id)))
}

/// Manual checkpoint; does not check video completeness.
pub fn finalize_project(
    state: &AppState,
    project_id: &str,
    confirm: &mut impl Confirm,
) -> Option<Action> {
    if !can_finalize(state, project_id) {
        return None;
    }
    let project = state.project(project_id)?;
    let prompt = ConfirmPrompt::FinalizeProject {
        project_name: project.name.clone(),
    };
    confirm
        .confirm(&prompt)
        .then(|| Action::FinalizeProject(project.id.clone()))
}

pub fn complete_delivery(
    state: &AppState,
    project_id: &str,
    confirm: &mut impl Confirm,
) -> Option<Action> {
    if !can_complete_delivery(state, project_id) {
        return None;
    }
    let project = state.project(project_id)?;
    let prompt = ConfirmPrompt::CompleteDelivery {
        project_name: project.name.clone(),
    };
    confirm
        .confirm(&prompt)
        .then(|| Action::CompleteDelivery(project.id.clone()))
}

// ---------------------------------------------------------------------------
// Field mutations (only the checklist is gated, on delivery)
// ---------------------------------------------------------------------------

pub fn toggle_main_delivery(state: &AppState, video_id: &str) -> Option<Action> {
    let video = state.video(video_id)?;
    Some(Action::ToggleMainDelivery(video.id.clone()))
}

pub fn toggle_case_file(state: &AppState, video_id: &str) -> Option<Action> {
    let video = state.video(video_id)?;
    Some(Action::ToggleCaseFile(video.id.clone()))
}

pub fn update_tags(state: &AppState, video_id: &str, tags: Vec<String>) -> Option<Action> {
    let video = state.video(video_id)?;
    Some(Action::UpdateVideoTags {
        video_id: video.id.clone(),
        tags,
    })
}

/// Declines once the project is delivered; the checklist is sealed then.
pub fn set_checklist(
    state: &AppState,
    project_id: &str,
    field: ChecklistField,
    value: bool,
) -> Option<Action> {
    let project = state.project(project_id)?;
    if project.status == ProjectStatus::Delivered {
        return None;
    }
    let delivery = state.delivery(project_id)?;
    Some(Action::UpdateDeliveryChecklist {
        project_id: delivery.project_id.clone(),
        field,
        value,
    })
}
