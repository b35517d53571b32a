#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown {kind} value '{value}'. Must be one of: {allowed}")]
    UnknownValue {
        kind: &'static str,
        value: String,
        allowed: String,
    },
}

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: &str, allowed: &[&str]) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
            allowed: allowed.join(", "),
        }
    }
}
