use crate::session::SessionError;
use console::style;
use ragflow_client::ApiError;
use ragflow_core::RagflowError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }

    /// Machine-readable form used in `--json` mode
    pub fn to_json(&self) -> serde_json::Value {
        let mut output = serde_json::json!({
            "status": "error",
            "message": self.message,
        });
        if let Some(ref context) = self.context {
            output["context"] = serde_json::Value::String(context.clone());
        }
        output
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a server that does not answer
pub fn server_unreachable(error: &str) -> CliError {
    CliError::new("Cannot reach the RAGFlow server")
        .with_context(format!("The server did not answer or refused the request.\n\nError: {}", error))
        .with_suggestion("Check that RAGFlow is running: ragflow-search health")
        .with_suggestion("Point to another server: --url http://host:9380 or RAGFLOW_BASE_URL")
        .with_suggestion("Raise the timeout for slow servers: --timeout 60")
        .with_help("Run: ragflow-search config")
}

/// Create error for a missing API key
pub fn api_key_missing() -> CliError {
    CliError::new("No API key configured")
        .with_context("Every RAGFlow API request needs a bearer token.")
        .with_suggestion("Pass it on the command line: --api-key <key>")
        .with_suggestion("Or set RAGFLOW_API_KEY")
        .with_suggestion("Or add to ragflow.toml:\n  api_key = \"ragflow-...\"")
        .with_help("Run: ragflow-search config")
}

/// Create error for a search without datasets
pub fn no_dataset_selected() -> CliError {
    CliError::new("No dataset selected")
        .with_context("A search needs at least one dataset.")
        .with_suggestion("List the available datasets: ragflow-search datasets")
        .with_suggestion("Pick one with: --dataset <id>")
        .with_help("Run: ragflow-search search --help")
}

/// Create error for an empty dataset listing
pub fn no_datasets() -> CliError {
    CliError::new("No datasets found")
        .with_context("The server lists no datasets for this API key.")
        .with_suggestion("Create a dataset in the RAGFlow web UI")
        .with_suggestion("Check that the API key belongs to the right tenant")
        .with_help("Run: ragflow-search datasets")
}

/// Create error for a request the server rejected or that failed in transit
pub fn api_error(error: &ApiError) -> CliError {
    let message = error.message();

    if message.starts_with("Connection error") {
        return server_unreachable(message);
    }

    let error = CliError::new(message.to_string());
    if message.contains("HTTP 401") || message.contains("Authentication") || message.contains("authorization") {
        error
            .with_suggestion("Check the API key: ragflow-search config")
            .with_suggestion("Create a new key under the RAGFlow user settings")
    } else {
        error.with_help("Run with RUST_LOG=debug to see the requests")
    }
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check ragflow.toml for syntax errors")
        .with_suggestion("Or check the RAGFLOW_* environment variables")
        .with_help("Run: ragflow-search config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };

    if let Some(session_error) = error.downcast_ref::<SessionError>() {
        return match session_error {
            SessionError::NoDatasetSelected => no_dataset_selected(),
            SessionError::Api(api) => api_error(api),
            other => CliError::new(other.to_string()),
        };
    }

    if let Some(config_error) = error.downcast_ref::<RagflowError>() {
        return match config_error {
            RagflowError::ConfigMissing { key } if key == "api_key" => api_key_missing(),
            RagflowError::ConfigInvalid { key, reason } => invalid_config(key, reason),
            RagflowError::Api(api) => api_error(api),
            RagflowError::Io(_) => CliError::new(format!("{:#}", error))
                .with_suggestion("Check the path given to --config or RAGFLOW_CONFIG"),
            other => CliError::new(other.to_string()),
        };
    }

    if let Some(api) = error.downcast_ref::<ApiError>() {
        return api_error(api);
    }

    CliError::new(format!("{:#}", error))
}

/// Print a failed command's error in the selected output format
pub fn report(error: anyhow::Error, json: bool) {
    let error = from_anyhow(error);

    if json {
        let output = error.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
        );
    } else {
        error.display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_missing_api_key_gets_suggestions() {
        let error = anyhow::Error::new(RagflowError::ConfigMissing { key: "api_key".to_string() });
        let cli_error = from_anyhow(error);

        assert_eq!(cli_error.message, "No API key configured");
        assert!(cli_error.suggestions.iter().any(|s| s.contains("RAGFLOW_API_KEY")));
    }

    #[test]
    fn test_api_error_behind_context() {
        let error: anyhow::Result<()> =
            Err(ApiError::rejected("No authorization.")).context("Failed to list datasets");
        let cli_error = from_anyhow(error.unwrap_err());

        assert_eq!(cli_error.message, "API Error: No authorization.");
        assert!(!cli_error.suggestions.is_empty());
    }

    #[test]
    fn test_connection_error_is_unreachable() {
        let cli_error = api_error(&ApiError::connection("HTTP 502 for url: http://kb/api/v1/datasets"));
        assert_eq!(cli_error.message, "Cannot reach the RAGFlow server");
    }

    #[test]
    fn test_session_errors() {
        let cli_error = from_anyhow(SessionError::NoDatasetSelected.into());
        assert_eq!(cli_error.message, "No dataset selected");
    }

    #[test]
    fn test_unreadable_config_file_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let error: anyhow::Result<()> =
            Err(RagflowError::Io(io)).context("Failed to load configuration file missing.toml");
        let cli_error = from_anyhow(error.unwrap_err());

        assert_eq!(
            cli_error.message,
            "Failed to load configuration file missing.toml: IO error: No such file or directory"
        );
        assert!(cli_error.suggestions.iter().any(|s| s.contains("--config")));
    }

    #[test]
    fn test_json_form() {
        let json = CliError::new("boom").to_json();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");
        assert!(json.get("context").is_none());
    }
}
