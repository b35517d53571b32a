//! Entity store records: projects, videos, delivery checklists, the upload
//! queue and notifications.
//!
//! These are plain data. Behaviour lives in [`crate::reducer`] and the
//! evaluation modules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

pub const PROJECT_STATUS_ACTIVE: &str = "active";
pub const PROJECT_STATUS_FINALIZED: &str = "finalized";
pub const PROJECT_STATUS_DELIVERED: &str = "delivered";
pub const PROJECT_STATUS_ARCHIVED: &str = "archived";

pub const VALID_PROJECT_STATUSES: &[&str] = &[
    PROJECT_STATUS_ACTIVE,
    PROJECT_STATUS_FINALIZED,
    PROJECT_STATUS_DELIVERED,
    PROJECT_STATUS_ARCHIVED,
];

/// Lifecycle of a project: `active -> finalized -> delivered`.
///
/// `archived` is assigned externally and never produced by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Finalized,
    Delivered,
    Archived,
}

impl ProjectStatus {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            PROJECT_STATUS_ACTIVE => Ok(Self::Active),
            PROJECT_STATUS_FINALIZED => Ok(Self::Finalized),
            PROJECT_STATUS_DELIVERED => Ok(Self::Delivered),
            PROJECT_STATUS_ARCHIVED => Ok(Self::Archived),
            _ => Err(CoreError::unknown("project status", s, VALID_PROJECT_STATUSES)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => PROJECT_STATUS_ACTIVE,
            Self::Finalized => PROJECT_STATUS_FINALIZED,
            Self::Delivered => PROJECT_STATUS_DELIVERED,
            Self::Archived => PROJECT_STATUS_ARCHIVED,
        }
    }
}

pub const VIDEO_STATUS_INITIAL: &str = "initial";
pub const VIDEO_STATUS_ANNOTATED: &str = "annotated";
pub const VIDEO_STATUS_APPROVED: &str = "approved";

pub const VALID_VIDEO_STATUSES: &[&str] = &[
    VIDEO_STATUS_INITIAL,
    VIDEO_STATUS_ANNOTATED,
    VIDEO_STATUS_APPROVED,
];

/// Review status of a single video revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    #[default]
    Initial,
    Annotated,
    Approved,
}

impl VideoStatus {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            VIDEO_STATUS_INITIAL => Ok(Self::Initial),
            VIDEO_STATUS_ANNOTATED => Ok(Self::Annotated),
            VIDEO_STATUS_APPROVED => Ok(Self::Approved),
            _ => Err(CoreError::unknown("video status", s, VALID_VIDEO_STATUSES)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => VIDEO_STATUS_INITIAL,
            Self::Annotated => VIDEO_STATUS_ANNOTATED,
            Self::Approved => VIDEO_STATUS_APPROVED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Video,
    Image,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploading,
    Completed,
    /// Never produced by the simulator; kept so a real transfer backend can
    /// report failures through the same queue.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Alert,
}

/// Top-level workbench module the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    #[default]
    Library,
    Review,
    Delivery,
    Showcase,
    Settings,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    /// Format: `YYMM_Name`.
    pub name: String,
    pub client: String,
    pub lead: String,
    pub post_lead: String,
    pub group: String,
    pub status: ProjectStatus,
    pub created_date: Timestamp,
    /// Team members visible to this project.
    #[serde(default)]
    pub team: Vec<String>,
}

/// One uploaded file revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: EntityId,
    pub project_id: EntityId,
    /// Stored filename, `v{version}_{base_name}` for uploads.
    pub name: String,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub url: String,
    pub version: u32,
    pub upload_time: Timestamp,
    /// Marked for showcase packaging.
    #[serde(default)]
    pub is_case_file: bool,
    /// Primary deliverable shown in external contexts.
    #[serde(default)]
    pub is_main_delivery: bool,
    pub size_bytes: u64,
    pub duration: Option<String>,
    pub resolution: Option<String>,
    #[serde(default)]
    pub status: VideoStatus,
    pub change_log: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Delivery checklist for one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryData {
    pub project_id: EntityId,
    #[serde(default)]
    pub has_clean_feed: bool,
    #[serde(default)]
    pub has_music_auth: bool,
    #[serde(default)]
    pub has_metadata: bool,
    #[serde(default)]
    pub has_tech_review: bool,
    /// Font, music and footage copyright risk confirmed.
    #[serde(default)]
    pub has_copyright_check: bool,
    #[serde(default)]
    pub has_script: bool,
    #[serde(default)]
    pub has_copyright_files: bool,
    /// Alternate resolution renders (optional).
    #[serde(default)]
    pub has_multi_resolution: bool,
    pub package_link: Option<String>,
    pub sent_date: Option<Timestamp>,
}

impl DeliveryData {
    /// A fresh checklist with every flag unset.
    pub fn new(project_id: impl Into<EntityId>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    pub fn flag(&self, field: ChecklistField) -> bool {
        match field {
            ChecklistField::CleanFeed => self.has_clean_feed,
            ChecklistField::MusicAuth => self.has_music_auth,
            ChecklistField::Metadata => self.has_metadata,
            ChecklistField::TechReview => self.has_tech_review,
            ChecklistField::CopyrightCheck => self.has_copyright_check,
            ChecklistField::Script => self.has_script,
            ChecklistField::CopyrightFiles => self.has_copyright_files,
            ChecklistField::MultiResolution => self.has_multi_resolution,
        }
    }

    pub fn set_flag(&mut self, field: ChecklistField, value: bool) {
        let slot = match field {
            ChecklistField::CleanFeed => &mut self.has_clean_feed,
            ChecklistField::MusicAuth => &mut self.has_music_auth,
            ChecklistField::Metadata => &mut self.has_metadata,
            ChecklistField::TechReview => &mut self.has_tech_review,
            ChecklistField::CopyrightCheck => &mut self.has_copyright_check,
            ChecklistField::Script => &mut self.has_script,
            ChecklistField::CopyrightFiles => &mut self.has_copyright_files,
            ChecklistField::MultiResolution => &mut self.has_multi_resolution,
        };
        *slot = value;
    }
}

/// A boolean flag on [`DeliveryData`]. Serializes as the record's field
/// name, e.g. `"has_clean_feed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecklistField {
    #[serde(rename = "has_clean_feed")]
    CleanFeed,
    #[serde(rename = "has_music_auth")]
    MusicAuth,
    #[serde(rename = "has_metadata")]
    Metadata,
    #[serde(rename = "has_tech_review")]
    TechReview,
    #[serde(rename = "has_copyright_check")]
    CopyrightCheck,
    #[serde(rename = "has_script")]
    Script,
    #[serde(rename = "has_copyright_files")]
    CopyrightFiles,
    #[serde(rename = "has_multi_resolution")]
    MultiResolution,
}

impl ChecklistField {
    pub const ALL: [ChecklistField; 8] = [
        Self::CleanFeed,
        Self::MusicAuth,
        Self::Metadata,
        Self::TechReview,
        Self::CopyrightCheck,
        Self::Script,
        Self::CopyrightFiles,
        Self::MultiResolution,
    ];
}

/// One in-flight simulated upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadItem {
    pub id: EntityId,
    pub filename: String,
    /// Percentage, 0..=100.
    pub progress: u8,
    pub status: UploadStatus,
    pub target_project_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub time: Timestamp,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The whole in-memory entity store for one session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub active_module: Module,
    pub projects: Vec<Project>,
    pub videos: Vec<Video>,
    pub deliveries: Vec<DeliveryData>,
    /// Video ids selected for showcase packaging, in display order.
    pub cart: Vec<EntityId>,
    pub upload_queue: Vec<UploadItem>,
    pub notifications: Vec<Notification>,
    pub selected_project_id: Option<EntityId>,
    pub selected_video_id: Option<EntityId>,
    pub search_term: String,
    pub active_tag: String,
}

impl AppState {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn video(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn delivery(&self, project_id: &str) -> Option<&DeliveryData> {
        self.deliveries.iter().find(|d| d.project_id == project_id)
    }

    pub fn upload(&self, id: &str) -> Option<&UploadItem> {
        self.upload_queue.iter().find(|u| u.id == id)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    /// Videos belonging to a project, in collection order.
    pub fn project_videos(&self, project_id: &str) -> Vec<&Video> {
        self.videos
            .iter()
            .filter(|v| v.project_id == project_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_status_round_trips_through_str() {
        for s in VALID_PROJECT_STATUSES {
            assert_eq!(ProjectStatus::from_str_value(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn project_status_rejects_unknown() {
        let err = ProjectStatus::from_str_value("shipped").unwrap_err();
        assert!(err.to_string().contains("shipped"));
        assert!(err.to_string().contains("finalized"));
    }

    #[test]
    fn video_status_from_str() {
        assert_eq!(
            VideoStatus::from_str_value("annotated").unwrap(),
            VideoStatus::Annotated
        );
        assert!(VideoStatus::from_str_value("Approved").is_err());
    }

    #[test]
    fn checklist_field_serializes_as_record_key() {
        for field in ChecklistField::ALL {
            let mut delivery = DeliveryData::new("p1");
            delivery.set_flag(field, true);
            let record = serde_json::to_value(&delivery).unwrap();
            let key = serde_json::to_value(field).unwrap();
            assert_eq!(record[key.as_str().unwrap()], true);
        }
        assert!(serde_json::from_str::<ChecklistField>(r#""tech_review""#).is_err());
    }

    #[test]
    fn set_flag_touches_only_one_field() {
        let mut d = DeliveryData::new("p1");
        d.set_flag(ChecklistField::TechReview, true);
        for field in ChecklistField::ALL {
            assert_eq!(d.flag(field), field == ChecklistField::TechReview);
        }
    }

    #[test]
    fn state_deserializes_with_missing_fields() {
        let state: AppState = serde_json::from_str(r#"{"search_term": "ad"}"#).unwrap();
        assert_eq!(state.search_term, "ad");
        assert!(state.projects.is_empty());
        assert_eq!(state.active_module, Module::Library);
    }
}
