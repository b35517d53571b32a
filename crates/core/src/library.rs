//! Library browsing and showcase cart queries.

use crate::entities::{AppState, Video};

/// Tag catalogue offered when tagging delivery files.
pub const AVAILABLE_TAGS: &[&str] = &[
    "ai_generated",
    "3d",
    "viral_ad",
    "narrative",
    "documentary",
    "commercial",
    "social_media",
    "brand",
];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Human-readable size, e.g. `"12.5 MB"`.
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / BYTES_PER_MB)
}

/// Videos visible in the library for the current selection and filters.
///
/// Scoped to the selected project when one is selected. The search term is
/// a case-insensitive substring match on the name; an empty active tag does
/// not filter.
pub fn filter_videos(state: &AppState) -> Vec<&Video> {
    let needle = state.search_term.trim().to_lowercase();
    let tag = state.active_tag.trim();

    state
        .videos
        .iter()
        .filter(|v| match &state.selected_project_id {
            Some(pid) => v.project_id == *pid,
            None => true,
        })
        .filter(|v| needle.is_empty() || v.name.to_lowercase().contains(&needle))
        .filter(|v| tag.is_empty() || v.tags.iter().any(|t| t == tag))
        .collect()
}

/// Cart contents in cart order. Ids that no longer resolve are skipped.
pub fn cart_items(state: &AppState) -> Vec<&Video> {
    state.cart.iter().filter_map(|id| state.video(id)).collect()
}

/// Videos marked for showcase across all projects.
pub fn case_files(state: &AppState) -> Vec<&Video> {
    state.videos.iter().filter(|v| v.is_case_file).collect()
}
