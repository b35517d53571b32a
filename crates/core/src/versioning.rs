//! Version series detection for uploaded files.
//!
//! Stored video names carry a `v{N}_` prefix. Within a project, all videos
//! whose names are equal once that prefix is stripped form a *series*.
//! When a new file is selected, [`resolve`] decides whether it continues an
//! existing series and which version number it should receive.
//!
//! ```
//! use vidbench_core::versioning::{strip_version_prefix, versioned_name};
//!
//! assert_eq!(strip_version_prefix("v3_ad.mp4"), "ad.mp4");
//! assert_eq!(strip_version_prefix("ad.mp4"), "ad.mp4");
//! assert_eq!(versioned_name(4, "v3_ad.mp4"), "v4_ad.mp4");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::entities::Video;
use crate::error::CoreError;

/// Lowercase `v`, one or more ASCII digits, one underscore, at the start.
const VERSION_PREFIX_PATTERN: &str = r"^v[0-9]+_";

static VERSION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_PREFIX_PATTERN).expect("valid regex"));

/// Strip one leading `v{N}_` prefix, if present.
pub fn strip_version_prefix(name: &str) -> &str {
    match VERSION_PREFIX_RE.find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    }
}

/// Build the stored name `v{version}_{base}`. Any existing prefix on `name`
/// is removed first so names are never double-prefixed.
pub fn versioned_name(version: u32, name: &str) -> String {
    format!("v{version}_{}", strip_version_prefix(name))
}

// ---------------------------------------------------------------------------
// Conflict mode
// ---------------------------------------------------------------------------

pub const CONFLICT_MODE_ITERATE: &str = "iterate";
pub const CONFLICT_MODE_NEW: &str = "new";

pub const VALID_CONFLICT_MODES: &[&str] = &[CONFLICT_MODE_ITERATE, CONFLICT_MODE_NEW];

/// How an upload is committed relative to a matching series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictMode {
    /// Continue the matched series with the next version number.
    Iterate,
    /// Start over at version 1.
    New,
}

impl ConflictMode {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            CONFLICT_MODE_ITERATE => Ok(Self::Iterate),
            CONFLICT_MODE_NEW => Ok(Self::New),
            _ => Err(CoreError::unknown("conflict mode", s, VALID_CONFLICT_MODES)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iterate => CONFLICT_MODE_ITERATE,
            Self::New => CONFLICT_MODE_NEW,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of matching a candidate file name against a project's videos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionResolution {
    pub is_new_series: bool,
    /// Candidate name with any version prefix stripped.
    pub base_name: String,
    pub next_version: u32,
    /// First series member in collection order.
    pub matched_series_video: Option<Video>,
}

impl VersionResolution {
    /// The disposition proposed before the user overrides anything.
    pub fn default_mode(&self) -> ConflictMode {
        if self.is_new_series {
            ConflictMode::New
        } else {
            ConflictMode::Iterate
        }
    }

    /// Version assigned when committing with `mode`.
    pub fn version_for(&self, mode: ConflictMode) -> u32 {
        match mode {
            ConflictMode::Iterate => self.next_version,
            ConflictMode::New => 1,
        }
    }

    /// Stored name when committing with `mode`.
    pub fn name_for(&self, mode: ConflictMode) -> String {
        versioned_name(self.version_for(mode), &self.base_name)
    }
}

/// Resolve the series and next version for `candidate_file_name`.
///
/// `existing_videos` must be the target project's videos. The scan is linear
/// in collection order; the first member found is reported as the match.
/// The next version is `max(0, series versions) + 1`, so gaps are preserved
/// (`{1, 2, 4}` yields 5). It saturates at `u32::MAX`.
pub fn resolve<'a, I>(candidate_file_name: &str, existing_videos: I) -> VersionResolution
where
    I: IntoIterator<Item = &'a Video>,
{
    let base_name = strip_version_prefix(candidate_file_name);

    let mut matched: Option<&Video> = None;
    let mut max_version = 0u32;

    for video in existing_videos {
        if strip_version_prefix(&video.name) != base_name {
            continue;
        }
        if matched.is_none() {
            matched = Some(video);
        }
        max_version = max_version.max(video.version);
    }

    match matched {
        None => VersionResolution {
            is_new_series: true,
            base_name: base_name.to_string(),
            next_version: 1,
            matched_series_video: None,
        },
        Some(video) => VersionResolution {
            is_new_series: false,
            base_name: base_name.to_string(),
            next_version: max_version.saturating_add(1),
            matched_series_video: Some(video.clone()),
        },
    }
}

/// All members of the series `base_name`, newest version first.
pub fn series<'a, I>(base_name: &str, videos: I) -> Vec<&'a Video>
where
    I: IntoIterator<Item = &'a Video>,
{
    let base_name = strip_version_prefix(base_name);
    let mut members: Vec<&Video> = videos
        .into_iter()
        .filter(|v| strip_version_prefix(&v.name) == base_name)
        .collect();
    members.sort_by(|a, b| b.version.cmp(&a.version));
    members
}

/// `max(all versions, 0) + 1` across every video given, regardless of series.
pub fn next_project_version_hint<'a, I>(videos: I) -> u32
where
    I: IntoIterator<Item = &'a Video>,
{
    videos
        .into_iter()
        .map(|v| v.version)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entities::{MediaType, VideoStatus};

    fn video(id: &str, name: &str, version: u32) -> Video {
        Video {
            id: id.to_string(),
            project_id: "p1".to_string(),
            name: name.to_string(),
            media_type: MediaType::Video,
            url: String::new(),
            version,
            upload_time: Utc::now(),
            is_case_file: false,
            is_main_delivery: false,
            size_bytes: 0,
            duration: None,
            resolution: None,
            status: VideoStatus::Initial,
            change_log: None,
            tags: Vec::new(),
        }
    }

    // -- strip_version_prefix ------------------------------------------------

    #[test]
    fn strips_single_digit_prefix() {
        assert_eq!(strip_version_prefix("v1_ad.mp4"), "ad.mp4");
    }

    #[test]
    fn strips_multi_digit_prefix() {
        assert_eq!(strip_version_prefix("v120_ad.mp4"), "ad.mp4");
    }

    #[test]
    fn strips_only_once() {
        assert_eq!(strip_version_prefix("v2_v1_ad.mp4"), "v1_ad.mp4");
    }

    #[test]
    fn leaves_uppercase_v_alone() {
        assert_eq!(strip_version_prefix("V2_ad.mp4"), "V2_ad.mp4");
    }

    #[test]
    fn requires_digits_and_underscore() {
        assert_eq!(strip_version_prefix("v_ad.mp4"), "v_ad.mp4");
        assert_eq!(strip_version_prefix("v2ad.mp4"), "v2ad.mp4");
        assert_eq!(strip_version_prefix("video_v2_ad.mp4"), "video_v2_ad.mp4");
    }

    #[test]
    fn non_ascii_digits_are_not_a_prefix() {
        assert_eq!(strip_version_prefix("v\u{0661}_ad.mp4"), "v\u{0661}_ad.mp4");
        assert_eq!(strip_version_prefix("v\u{0968}_ad.mp4"), "v\u{0968}_ad.mp4");
    }

    #[test]
    fn versioned_name_does_not_double_prefix() {
        assert_eq!(versioned_name(1, "teaser.mp4"), "v1_teaser.mp4");
        assert_eq!(versioned_name(5, "v3_ad.mp4"), "v5_ad.mp4");
    }

    // -- resolve -------------------------------------------------------------

    #[test]
    fn empty_project_starts_new_series() {
        let r = resolve("ad.mp4", &[]);
        assert!(r.is_new_series);
        assert_eq!(r.next_version, 1);
        assert_eq!(r.base_name, "ad.mp4");
        assert!(r.matched_series_video.is_none());
    }

    #[test]
    fn next_version_is_max_plus_one_not_gap_fill() {
        let videos = vec![
            video("a", "v1_ad.mp4", 1),
            video("b", "v2_ad.mp4", 2),
            video("c", "v4_ad.mp4", 4),
        ];
        let r = resolve("ad.mp4", &videos);
        assert!(!r.is_new_series);
        assert_eq!(r.next_version, 5);
    }

    #[test]
    fn prefixed_candidate_matches_same_series() {
        let videos = vec![video("a", "v1_ad.mp4", 1), video("b", "v2_ad.mp4", 2)];
        let plain = resolve("ad.mp4", &videos);
        let prefixed = resolve("v3_ad.mp4", &videos);
        assert_eq!(plain, prefixed);
    }

    #[test]
    fn first_match_in_collection_order_wins() {
        let videos = vec![
            video("late", "v7_ad.mp4", 7),
            video("early", "v1_ad.mp4", 1),
        ];
        let r = resolve("ad.mp4", &videos);
        assert_eq!(r.matched_series_video.unwrap().id, "late");
        assert_eq!(r.next_version, 8);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let videos = vec![video("a", "v1_Ad.mp4", 1)];
        assert!(resolve("ad.mp4", &videos).is_new_series);
    }

    #[test]
    fn other_series_do_not_affect_version() {
        let videos = vec![video("a", "v9_teaser.mp4", 9), video("b", "v1_ad.mp4", 1)];
        assert_eq!(resolve("ad.mp4", &videos).next_version, 2);
    }

    #[test]
    fn unprefixed_existing_name_still_matches() {
        let videos = vec![video("a", "ad.mp4", 1)];
        let r = resolve("v1_ad.mp4", &videos);
        assert!(!r.is_new_series);
        assert_eq!(r.next_version, 2);
    }

    #[test]
    fn mode_override_resets_to_v1() {
        let videos = vec![video("a", "v2_ad.mp4", 2)];
        let r = resolve("ad.mp4", &videos);
        assert_eq!(r.default_mode(), ConflictMode::Iterate);
        assert_eq!(r.name_for(ConflictMode::Iterate), "v3_ad.mp4");
        assert_eq!(r.version_for(ConflictMode::New), 1);
        assert_eq!(r.name_for(ConflictMode::New), "v1_ad.mp4");
    }

    #[test]
    fn new_series_defaults_to_new_mode() {
        assert_eq!(resolve("x.mp4", &[]).default_mode(), ConflictMode::New);
    }

    // -- series / hint -------------------------------------------------------

    #[test]
    fn series_is_sorted_newest_first() {
        let videos = vec![
            video("a", "v1_ad.mp4", 1),
            video("t", "v1_teaser.mp4", 1),
            video("c", "v4_ad.mp4", 4),
            video("b", "v2_ad.mp4", 2),
        ];
        let ids: Vec<&str> = series("v2_ad.mp4", &videos)
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn project_hint_spans_all_series() {
        let videos = vec![video("a", "v1_ad.mp4", 1), video("t", "v6_teaser.mp4", 6)];
        assert_eq!(next_project_version_hint(&videos), 7);
        assert_eq!(next_project_version_hint(&[]), 1);
    }

    #[test]
    fn max_version_saturates() {
        let videos = vec![video("a", "v4294967295_ad.mp4", u32::MAX)];
        let resolution = resolve("ad.mp4", &videos);
        assert!(!resolution.is_new_series);
        assert_eq!(resolution.next_version, u32::MAX);
        assert_eq!(next_project_version_hint(&videos), u32::MAX);
    }

    #[test]
    fn conflict_mode_parses() {
        assert_eq!(
            ConflictMode::from_str_value("iterate").unwrap(),
            ConflictMode::Iterate
        );
        assert!(ConflictMode::from_str_value("merge").is_err());
    }
}
