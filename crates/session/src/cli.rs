//! Command-line argument parsing for the session binary.
//!
//! Usage: `vidbench-session <project_id> <file>[:size_bytes[:mode]]...`

use vidbench_core::entities::UploadItem;
use vidbench_core::library::format_size_mb;
use vidbench_core::versioning::ConflictMode;
use vidbench_core::workbench::SelectedFile;

use crate::error::SessionError;
use crate::session::Session;

/// Size assumed when an upload argument gives none.
pub const DEFAULT_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// One file to upload, with an optional disposition override.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file: SelectedFile,
    pub mode: Option<ConflictMode>,
}

impl UploadRequest {
    /// Parse `name[:size_bytes[:iterate|new]]`.
    pub fn parse(arg: &str) -> Result<Self, SessionError> {
        let mut parts = arg.split(':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(SessionError::Argument(format!("empty file name in '{arg}'")));
        }

        let size_bytes = match parts.next() {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                SessionError::Argument(format!("invalid size '{raw}' in '{arg}': {e}"))
            })?,
            None => DEFAULT_FILE_SIZE_BYTES,
        };

        let mode = parts
            .next()
            .map(|raw| ConflictMode::from_str_value(raw.trim()))
            .transpose()?;

        if parts.next().is_some() {
            return Err(SessionError::Argument(format!(
                "too many ':' separated fields in '{arg}'"
            )));
        }

        Ok(Self {
            file: SelectedFile::new(name, size_bytes),
            mode,
        })
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub project_id: String,
    pub uploads: Vec<UploadRequest>,
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let project_id = args.next().ok_or_else(|| {
            SessionError::Argument(
                "usage: vidbench-session <project_id> <file>[:size_bytes[:mode]]...".into(),
            )
        })?;
        let uploads = args
            .map(|a| UploadRequest::parse(&a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            project_id,
            uploads,
        })
    }
}

/// Upload each request in turn against the selected project.
///
/// Every upload settles before the next is resolved, so repeating a name
/// keeps iterating its series instead of reusing one version number.
pub async fn run_uploads(session: &mut Session, uploads: Vec<UploadRequest>) -> Vec<UploadItem> {
    let mut started = Vec::with_capacity(uploads.len());
    for request in uploads {
        tracing::info!(
            file = %request.file.name,
            size = %format_size_mb(request.file.size_bytes),
            "Queueing upload",
        );
        let Some(item) = session.upload(request.file, request.mode, None) else {
            continue;
        };
        session.run_until_idle().await;
        started.push(item);
    }
    started
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn name_only_uses_default_size() {
        let req = UploadRequest::parse("ad.mp4").unwrap();
        assert_eq!(req.file, SelectedFile::new("ad.mp4", DEFAULT_FILE_SIZE_BYTES));
        assert_eq!(req.mode, None);
    }

    #[test]
    fn size_and_mode() {
        let req = UploadRequest::parse("v3_ad.mp4:2048:new").unwrap();
        assert_eq!(req.file.size_bytes, 2048);
        assert_eq!(req.mode, Some(ConflictMode::New));
    }

    #[test]
    fn bad_mode_is_core_error() {
        let err = UploadRequest::parse("ad.mp4:1:merge").unwrap_err();
        assert_matches!(err, SessionError::Core(_));
    }

    #[test]
    fn bad_size_and_empty_name() {
        assert_matches!(
            UploadRequest::parse("ad.mp4:big"),
            Err(SessionError::Argument(_))
        );
        assert_matches!(UploadRequest::parse(":12"), Err(SessionError::Argument(_)));
        assert_matches!(
            UploadRequest::parse("a:1:new:x"),
            Err(SessionError::Argument(_))
        );
    }

    #[test]
    fn args_require_project() {
        assert!(Args::parse(Vec::<String>::new()).is_err());
        let args = Args::parse(vec!["p1".to_string(), "ad.mp4".to_string()]).unwrap();
        assert_eq!(args.project_id, "p1");
        assert_eq!(args.uploads.len(), 1);
    }
}
