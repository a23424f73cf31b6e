//! Shared client utilities and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use rescan_config::ConfigError;
use serde::Deserialize;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let subject = match &err {
            ConfigError::Io { path, .. } => Some(path.display().to_string()),
            ConfigError::Parse { path, .. } => path.as_ref().map(|path| path.display().to_string()),
            ConfigError::InvalidField {
                section,
                field,
                reason,
                ..
            } => Some(format!("{section}.{field} ({reason})")),
            ConfigError::DuplicateTrigger { name } => Some(format!("trigger '{name}'")),
            ConfigError::InvalidRewrite { trigger, .. } => Some(format!("trigger '{trigger}'")),
            ConfigError::InvalidVerbosity { value } => Some(format!("'{value}'")),
        };
        let operational = matches!(err, ConfigError::Io { .. });
        let chain = format!("{:#}", anyhow::Error::from(err));
        let message = subject.map_or_else(|| chain.clone(), |subject| format!("{subject}: {chain}"));
        if operational {
            Self::Failure(anyhow!(message))
        } else {
            Self::Validation(message)
        }
    }
}

/// Build the HTTP client used by network commands.
pub(crate) fn build_client(timeout_secs: u64, request_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(request_id)
        .map_err(|_| CliError::failure(anyhow!("request identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

#[derive(Deserialize)]
struct Problem {
    title: String,
    #[serde(default)]
    detail: Option<String>,
}

/// Translate a non-success response into a CLI error.
pub(crate) async fn classify_failure(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let problem = serde_json::from_slice::<Problem>(&bytes).ok();
    let message = problem.map_or_else(
        || format!("request failed with status {status}"),
        |problem| {
            let detail = problem.detail.unwrap_or(problem.title);
            format!("{detail} (status {status})")
        },
    );

    if matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
        CliError::validation(message)
    } else {
        CliError::failure(anyhow!(message))
    }
}
