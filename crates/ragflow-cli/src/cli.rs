use clap::{Parser, Subcommand};
use ragflow_core::config::{self, CliConfigOverrides};
use std::path::PathBuf;

/// RAGFlow Search - semantic chunk search over a RAGFlow server
#[derive(Parser, Debug)]
#[command(name = "ragflow-search")]
#[command(about = "Semantic chunk search over a RAGFlow server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a config file (defaults to $RAGFLOW_CONFIG, then ./ragflow.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// RAGFlow server URL (e.g., http://localhost:9380)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API key used as bearer token
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Connection settings given on the command line
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            base_url: self.url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the server is reachable
    Health,

    /// List datasets visible to the API key
    Datasets,

    /// Search datasets for chunks similar to a query
    Search(SearchArgs),

    /// Show the knowledge-graph mind map of a dataset
    MindMap(MindMapArgs),

    /// Ask a chat assistant for an answer
    Summary(SummaryArgs),

    /// Connect, pick datasets and search in a guided session
    Interactive,

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// The query text
    pub query: String,

    /// Dataset ID to search (repeatable; defaults to the first listed dataset)
    #[arg(long = "dataset", short = 'd', value_name = "ID")]
    pub datasets: Vec<String>,

    /// Restrict the search to a document ID (repeatable)
    #[arg(long = "document", value_name = "ID")]
    pub documents: Vec<String>,

    /// Number of chunks to return (1-50)
    #[arg(long, short = 'k', value_parser = parse_top_k)]
    pub top_k: Option<usize>,

    /// Minimum similarity (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    /// Weight of vector similarity against term similarity (0.0-1.0)
    #[arg(long, value_parser = parse_vector_weight)]
    pub vector_weight: Option<f64>,

    /// Show raw content instead of highlighted matches
    #[arg(long)]
    pub no_highlight: bool,

    /// Enable keyword extraction
    #[arg(long)]
    pub keyword: bool,

    /// Use the knowledge graph during retrieval
    #[arg(long)]
    pub kg: bool,

    /// Rerank model ID
    #[arg(long, value_name = "MODEL_ID")]
    pub rerank: Option<String>,

    /// Chat assistant ID used to generate an AI summary
    #[arg(long, value_name = "ASSISTANT_ID")]
    pub assistant: Option<String>,

    /// Also fetch the mind map of the first dataset
    #[arg(long)]
    pub mind_map: bool,

    /// Print full chunk text and details instead of a table
    #[arg(long)]
    pub full: bool,
}

#[derive(Parser, Debug)]
pub struct MindMapArgs {
    /// Dataset ID
    pub dataset: String,
}

#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// Chat assistant ID
    pub assistant: String,

    /// Question to ask
    pub question: String,

    /// Continue an existing chat session instead of opening a new one
    #[arg(long, value_name = "SESSION_ID")]
    pub session: Option<String>,
}

fn parse_top_k(s: &str) -> Result<usize, String> {
    config::parse_top_k(s).map_err(|e| e.to_string())
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    config::parse_unit_interval("threshold", s).map_err(|e| e.to_string())
}

fn parse_vector_weight(s: &str) -> Result<f64, String> {
    config::parse_unit_interval("vector_weight", s).map_err(|e| e.to_string())
}

fn parse_timeout(s: &str) -> Result<u64, String> {
    config::parse_timeout(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args() {
        let cli = Cli::parse_from([
            "ragflow-search",
            "--url",
            "http://kb:9380",
            "search",
            "what is rust",
            "-d",
            "ds1",
            "-d",
            "ds2",
            "-k",
            "7",
            "--threshold",
            "0.4",
            "--rerank",
            "bge",
        ]);

        assert_eq!(cli.url.as_deref(), Some("http://kb:9380"));
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "what is rust");
                assert_eq!(args.datasets, vec!["ds1", "ds2"]);
                assert_eq!(args.top_k, Some(7));
                assert_eq!(args.threshold, Some(0.4));
                assert_eq!(args.rerank.as_deref(), Some("bge"));
                assert!(!args.no_highlight);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(Cli::try_parse_from(["ragflow-search", "search", "q", "-k", "0"]).is_err());
        assert!(Cli::try_parse_from(["ragflow-search", "search", "q", "-k", "51"]).is_err());
        assert!(Cli::try_parse_from(["ragflow-search", "search", "q", "--threshold", "1.2"]).is_err());
        assert!(Cli::try_parse_from(["ragflow-search", "--timeout", "0", "health"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ragflow-search", "datasets", "--json", "--api-key", "k"]);
        assert!(cli.json);
        assert_eq!(cli.overrides().api_key.as_deref(), Some("k"));
    }
}
