//! Discrete state updates applied by [`crate::reducer::reduce`].
//!
//! Every mutation of [`crate::entities::AppState`], whether from the user
//! or from an upload timer, is expressed as one of these.

use serde::{Deserialize, Serialize};

use crate::entities::{
    ChecklistField, Module, Notification, Project, UploadItem, Video, VideoStatus,
};
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    SetModule(Module),
    SelectProject(EntityId),
    SelectVideo(Option<EntityId>),
    AddProject(Project),
    UpdateProject(Project),
    AddVideo(Video),
    /// Review -> delivery. Only applies to `active` projects.
    FinalizeProject(EntityId),
    /// Delivery -> delivered. Only applies to finalized, ready projects.
    CompleteDelivery(EntityId),
    UpdateDeliveryChecklist {
        project_id: EntityId,
        field: ChecklistField,
        value: bool,
    },
    SetPackageLink {
        project_id: EntityId,
        link: Option<String>,
    },
    ToggleCaseFile(EntityId),
    ToggleMainDelivery(EntityId),
    UpdateVideoTags {
        video_id: EntityId,
        tags: Vec<String>,
    },
    UpdateVideoStatus {
        video_id: EntityId,
        status: VideoStatus,
    },
    ToggleCartItem(EntityId),
    ReorderCart {
        from: usize,
        to: usize,
    },
    ClearCart,
    SetSearch(String),
    SetTag(String),
    AddUpload(UploadItem),
    UpdateUploadProgress {
        id: EntityId,
        progress: u8,
    },
    CompleteUpload(EntityId),
    AddNotification(Notification),
    ClearNotifications,
}

impl Action {
    /// Stable snake_case name, used for logging and events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetModule(_) => "set_module",
            Self::SelectProject(_) => "select_project",
            Self::SelectVideo(_) => "select_video",
            Self::AddProject(_) => "add_project",
            Self::UpdateProject(_) => "update_project",
            Self::AddVideo(_) => "add_video",
            Self::FinalizeProject(_) => "finalize_project",
            Self::CompleteDelivery(_) => "complete_delivery",
            Self::UpdateDeliveryChecklist { .. } => "update_delivery_checklist",
            Self::SetPackageLink { .. } => "set_package_link",
            Self::ToggleCaseFile(_) => "toggle_case_file",
            Self::ToggleMainDelivery(_) => "toggle_main_delivery",
            Self::UpdateVideoTags { .. } => "update_video_tags",
            Self::UpdateVideoStatus { .. } => "update_video_status",
            Self::ToggleCartItem(_) => "toggle_cart_item",
            Self::ReorderCart { .. } => "reorder_cart",
            Self::ClearCart => "clear_cart",
            Self::SetSearch(_) => "set_search",
            Self::SetTag(_) => "set_tag",
            Self::AddUpload(_) => "add_upload",
            Self::UpdateUploadProgress { .. } => "update_upload_progress",
            Self::CompleteUpload(_) => "complete_upload",
            Self::AddNotification(_) => "add_notification",
            Self::ClearNotifications => "clear_notifications",
        }
    }

    /// Project directly named by the action, if any.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::SelectProject(id) | Self::FinalizeProject(id) | Self::CompleteDelivery(id) => {
                Some(id.as_str())
            }
            Self::AddProject(p) | Self::UpdateProject(p) => Some(p.id.as_str()),
            Self::AddVideo(v) => Some(v.project_id.as_str()),
            Self::UpdateDeliveryChecklist { project_id, .. }
            | Self::SetPackageLink { project_id, .. } => Some(project_id.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_and_payload() {
        let json = serde_json::to_value(Action::FinalizeProject("p1".into())).unwrap();
        assert_eq!(json["type"], "finalize_project");
        assert_eq!(json["payload"], "p1");
    }

    #[test]
    fn checklist_action_from_json() {
        let action: Action = serde_json::from_str(
            r#"{"type":"update_delivery_checklist","payload":{"project_id":"p1","field":"has_tech_review","value":true}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::UpdateDeliveryChecklist {
                project_id: "p1".into(),
                field: ChecklistField::TechReview,
                value: true,
            }
        );
        assert_eq!(action.kind(), "update_delivery_checklist");
        assert_eq!(action.project_id(), Some("p1"));
    }

    #[test]
    fn unit_variant_has_no_project() {
        assert_eq!(Action::ClearCart.project_id(), None);
        assert_eq!(Action::ClearCart.kind(), "clear_cart");
    }
}
