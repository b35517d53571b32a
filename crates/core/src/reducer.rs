//! The state reducer: `(state, action) -> state`.
//!
//! Actions naming an absent project, video, delivery or upload are no-ops
//! and report [`Outcome::Ignored`]. Nothing here panics or returns an error.

use serde::Serialize;

use crate::actions::Action;
use crate::entities::{AppState, DeliveryData, ProjectStatus, UploadStatus};
use crate::progress::PROGRESS_COMPLETE;
use crate::readiness;
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Ignored,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl From<bool> for Outcome {
    fn from(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::Ignored
        }
    }
}

/// Apply `action` using the current wall clock for any timestamps.
pub fn reduce(state: &mut AppState, action: Action) -> Outcome {
    reduce_at(state, action, chrono::Utc::now())
}

/// Apply `action`, stamping time-dependent fields with `now`.
pub fn reduce_at(state: &mut AppState, action: Action, now: Timestamp) -> Outcome {
    let applied = match action {
        Action::SetModule(module) => {
            state.active_module = module;
            true
        }
        Action::SelectProject(id) => {
            if state.project(&id).is_none() {
                return Outcome::Ignored;
            }
            state.selected_project_id = Some(id);
            state.selected_video_id = None;
            true
        }
        Action::SelectVideo(None) => {
            state.selected_video_id = None;
            true
        }
        Action::SelectVideo(Some(id)) => {
            if state.video(&id).is_none() {
                return Outcome::Ignored;
            }
            state.selected_video_id = Some(id);
            true
        }
        Action::AddProject(project) => {
            if state.project(&project.id).is_some() {
                return Outcome::Ignored;
            }
            state.projects.push(project);
            true
        }
        Action::UpdateProject(project) => {
            match state.projects.iter_mut().find(|p| p.id == project.id) {
                Some(slot) => {
                    *slot = project;
                    true
                }
                None => false,
            }
        }
        Action::AddVideo(video) => {
            if state.project(&video.project_id).is_none() || state.video(&video.id).is_some() {
                return Outcome::Ignored;
            }
            // Newest first.
            state.videos.insert(0, video);
            true
        }
        Action::FinalizeProject(id) => finalize_project(state, &id),
        Action::CompleteDelivery(id) => complete_delivery(state, &id, now),
        Action::UpdateDeliveryChecklist {
            project_id,
            field,
            value,
        } => match open_delivery_mut(state, &project_id) {
            Some(delivery) => {
                delivery.set_flag(field, value);
                true
            }
            None => false,
        },
        Action::SetPackageLink { project_id, link } => match open_delivery_mut(state, &project_id) {
            Some(delivery) => {
                delivery.package_link = link.filter(|l| !l.trim().is_empty());
                true
            }
            None => false,
        },
        Action::ToggleCaseFile(id) => match state.videos.iter_mut().find(|v| v.id == id) {
            Some(video) => {
                video.is_case_file = !video.is_case_file;
                true
            }
            None => false,
        },
        Action::ToggleMainDelivery(id) => match state.videos.iter_mut().find(|v| v.id == id) {
            Some(video) => {
                video.is_main_delivery = !video.is_main_delivery;
                true
            }
            None => false,
        },
        Action::UpdateVideoTags { video_id, tags } => {
            match state.videos.iter_mut().find(|v| v.id == video_id) {
                Some(video) => {
                    video.tags = normalize_tags(tags);
                    true
                }
                None => false,
            }
        }
        Action::UpdateVideoStatus { video_id, status } => {
            match state.videos.iter_mut().find(|v| v.id == video_id) {
                Some(video) => {
                    video.status = status;
                    true
                }
                None => false,
            }
        }
        Action::ToggleCartItem(id) => {
            if let Some(pos) = state.cart.iter().position(|c| *c == id) {
                state.cart.remove(pos);
                true
            } else if state.video(&id).is_some() {
                state.cart.push(id);
                true
            } else {
                false
            }
        }
        Action::ReorderCart { from, to } => {
            if from >= state.cart.len() {
                return Outcome::Ignored;
            }
            let item = state.cart.remove(from);
            let to = to.min(state.cart.len());
            state.cart.insert(to, item);
            true
        }
        Action::ClearCart => {
            state.cart.clear();
            true
        }
        Action::SetSearch(term) => {
            state.search_term = term;
            true
        }
        Action::SetTag(tag) => {
            state.active_tag = tag;
            true
        }
        Action::AddUpload(item) => {
            if state.upload(&item.id).is_some() {
                return Outcome::Ignored;
            }
            state.upload_queue.push(item);
            true
        }
        Action::UpdateUploadProgress { id, progress } => {
            match state.upload_queue.iter_mut().find(|u| u.id == id) {
                Some(item) if item.status == UploadStatus::Uploading => {
                    item.progress = progress.min(PROGRESS_COMPLETE);
                    true
                }
                _ => false,
            }
        }
        Action::CompleteUpload(id) => match state.upload_queue.iter_mut().find(|u| u.id == id) {
            Some(item) => {
                item.progress = PROGRESS_COMPLETE;
                item.status = UploadStatus::Completed;
                true
            }
            None => false,
        },
        Action::AddNotification(notification) => {
            state.notifications.insert(0, notification);
            true
        }
        Action::ClearNotifications => {
            state.notifications.clear();
            true
        }
    };

    applied.into()
}

fn delivery_mut<'a>(state: &'a mut AppState, project_id: &str) -> Option<&'a mut DeliveryData> {
    state
        .deliveries
        .iter_mut()
        .find(|d| d.project_id == project_id)
}

/// The checklist of a project that has not been delivered yet.
fn open_delivery_mut<'a>(state: &'a mut AppState, project_id: &str) -> Option<&'a mut DeliveryData> {
    let delivered = state
        .project(project_id)
        .is_some_and(|p| p.status == ProjectStatus::Delivered);
    if delivered {
        return None;
    }
    delivery_mut(state, project_id)
}

/// `active -> finalized`. Opens the delivery checklist if none exists yet.
fn finalize_project(state: &mut AppState, id: &str) -> bool {
    let Some(project) = state.projects.iter_mut().find(|p| p.id == id) else {
        return false;
    };
    if project.status != ProjectStatus::Active {
        return false;
    }
    project.status = ProjectStatus::Finalized;

    if state.delivery(id).is_none() {
        state.deliveries.push(DeliveryData::new(id));
    }
    true
}

/// `finalized -> delivered`, only when the checklist is ready.
fn complete_delivery(state: &mut AppState, id: &str, now: Timestamp) -> bool {
    let Some(project) = state.project(id) else {
        return false;
    };
    if project.status != ProjectStatus::Finalized {
        return false;
    }
    let Some(delivery) = state.delivery(id) else {
        return false;
    };
    if !readiness::is_ready(delivery, state.videos.iter().filter(|v| v.project_id == id)) {
        return false;
    }

    if let Some(delivery) = delivery_mut(state, id) {
        delivery.sent_date = Some(now);
    }
    if let Some(project) = state.projects.iter_mut().find(|p| p.id == id) {
        project.status = ProjectStatus::Delivered;
    }
    true
}

/// Trim, drop empties and de-duplicate while keeping first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
