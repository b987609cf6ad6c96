use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigMissingKey,
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    SourceNotFound,
    SourceDecodeFailed,
    InputMalformed,

    ArtifactMissing,
    ArtifactEmpty,

    GitCommandFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigMissingKey => "config.missing_key",
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::SourceNotFound => "source.not_found",
            ErrorCode::SourceDecodeFailed => "source.decode_failed",
            ErrorCode::InputMalformed => "input.malformed",

            ErrorCode::ArtifactMissing => "artifact.missing",
            ErrorCode::ArtifactEmpty => "artifact.empty",

            ErrorCode::GitCommandFailed => "git.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }

    /// Per-entry and per-file failures that must not abort a batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::SourceNotFound | ErrorCode::InputMalformed | ErrorCode::SourceDecodeFailed
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMissingKeyDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePathDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MalformedInputDetails {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDetails {
    pub artifact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid argument: {}", problem),
            details,
        )
    }

    /// A file that did not exist at the snapshot revision.
    pub fn source_not_found(path: impl Into<String>, revision: Option<String>) -> Self {
        let path = path.into();
        let message = match &revision {
            Some(rev) => format!("'{}' does not exist at {}", path, rev),
            None => format!("'{}' does not exist", path),
        };
        Self::new(
            ErrorCode::SourceNotFound,
            message,
            to_details(SourcePathDetails { path, revision }),
        )
    }

    pub fn source_decode_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::SourceDecodeFailed,
            format!("Cannot read '{}' as UTF-8 text: {}", path, error.into()),
            to_details(SourcePathDetails {
                path,
                revision: None,
            }),
        )
    }

    pub fn input_malformed(
        source: impl Into<String>,
        line: Option<usize>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        Self::new(
            ErrorCode::InputMalformed,
            format!("Malformed input: {}", problem),
            to_details(MalformedInputDetails {
                source: source.into(),
                line,
                problem,
            }),
        )
    }

    pub fn artifact_missing(artifact: impl Into<String>) -> Self {
        let artifact = artifact.into();
        Self::new(
            ErrorCode::ArtifactMissing,
            format!("Required artifact not found: {}", artifact),
            to_details(ArtifactDetails {
                artifact,
                problem: None,
            }),
        )
    }

    pub fn artifact_empty(artifact: impl Into<String>, problem: impl Into<String>) -> Self {
        let artifact = artifact.into();
        let problem = problem.into();
        Self::new(
            ErrorCode::ArtifactEmpty,
            format!("Artifact yields no usable entries: {} ({})", artifact, problem),
            to_details(ArtifactDetails {
                artifact,
                problem: Some(problem),
            }),
        )
    }

    pub fn git_command_failed(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GitCommandFailed,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn config_missing_key(key: impl Into<String>, path: Option<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::ConfigMissingKey,
            format!("Missing required configuration key '{}'", key),
            to_details(ConfigMissingKeyDetails { key, path }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ConfigInvalidJson,
            format!("Invalid JSON in {}: {}", path, err),
            to_details(ConfigInvalidJsonDetails {
                path,
                error: err.to_string(),
            }),
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let problem = problem.into();
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid configuration value for '{}': {}", key, problem),
            to_details(ConfigInvalidValueDetails {
                key,
                value,
                problem,
            }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(ctx) => format!("IO error ({}): {}", ctx, error),
            None => format!("IO error: {}", error),
        };
        Self::new(
            ErrorCode::InternalIoError,
            message,
            to_details(InternalIoErrorDetails { error, context }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalJsonErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(
            ErrorCode::InternalUnexpected,
            format!("Unexpected error: {}", error),
            serde_json::json!({ "error": error }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
