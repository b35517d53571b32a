//! Initial session state: a JSON seed file or the built-in demo project.

use std::path::Path;

use chrono::{Duration, Utc};
use vidbench_core::entities::{
    AppState, MediaType, Project, ProjectStatus, Video, VideoStatus,
};

use crate::error::SessionError;

/// Read an [`AppState`] from a JSON file. Missing fields take defaults.
pub async fn load_seed(path: &Path) -> Result<AppState, SessionError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SessionError::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;

    let state: AppState =
        serde_json::from_str(&raw).map_err(|source| SessionError::SeedParse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        path = %path.display(),
        projects = state.projects.len(),
        videos = state.videos.len(),
        "Seed state loaded",
    );
    Ok(state)
}

/// One active project, `2406_Acme`, with two revisions of `ad.mp4`.
pub fn demo_state() -> AppState {
    let now = Utc::now();
    let project = Project {
        id: "p_acme".into(),
        name: "2406_Acme".into(),
        client: "Acme".into(),
        lead: "Dana".into(),
        post_lead: "Lee".into(),
        group: "Commercials".into(),
        status: ProjectStatus::Active,
        created_date: now - Duration::days(14),
        team: vec!["Dana".into(), "Lee".into(), "Sam".into()],
    };

    let revision = |id: &str, version: u32, days_ago: i64| Video {
        id: id.into(),
        project_id: project.id.clone(),
        name: format!("v{version}_ad.mp4"),
        media_type: MediaType::Video,
        url: String::new(),
        version,
        upload_time: now - Duration::days(days_ago),
        is_case_file: false,
        is_main_delivery: false,
        size_bytes: 48 * 1024 * 1024,
        duration: Some("00:00:30".into()),
        resolution: Some("1920x1080".into()),
        status: if version == 1 {
            VideoStatus::Annotated
        } else {
            VideoStatus::Initial
        },
        change_log: Some(if version == 1 {
            "First cut".into()
        } else {
            "Music swap".into()
        }),
        tags: vec!["commercial".into()],
    };

    // Newest first, matching how uploads are stored.
    let videos = vec![revision("v_acme_ad_2", 2, 2), revision("v_acme_ad_1", 1, 7)];

    AppState {
        selected_project_id: Some(project.id.clone()),
        projects: vec![project],
        videos,
        ..AppState::default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn demo_state_has_ad_series() {
        let state = demo_state();
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.videos[0].name, "v2_ad.mp4");
        assert_eq!(state.selected_project_id.as_deref(), Some("p_acme"));
    }

    #[tokio::test]
    async fn loads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&demo_state()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let state = load_seed(file.path()).await.unwrap();
        assert_eq!(state.projects[0].name, "2406_Acme");
        assert_eq!(state.videos.len(), 2);
    }

    #[tokio::test]
    async fn missing_seed_file_is_io_error() {
        let err = load_seed(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert_matches!(err, SessionError::SeedIo { .. });
    }

    #[tokio::test]
    async fn malformed_seed_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_seed(file.path()).await.unwrap_err();
        assert_matches!(err, SessionError::SeedParse { .. });
    }
}
