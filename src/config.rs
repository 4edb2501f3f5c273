//! Configuration management with YAML support
//!
//! Every field defaults to the fixed path or limit the batch jobs have always
//! used, so running without a config file behaves exactly like the plain
//! scripts.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub split: SplitConfig,

    #[serde(default)]
    pub truncate: TruncateConfig,

    #[serde(default)]
    pub titles: TitlesConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Splitter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_split_input")]
    pub input: String,

    #[serde(default = "default_split_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunk files are named `<file_prefix>_NNN.json`
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

/// Chunk truncator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncateConfig {
    #[serde(default = "default_chunk_001")]
    pub input: String,

    #[serde(default = "default_truncate_output")]
    pub output: String,

    #[serde(default = "default_truncate_count")]
    pub count: usize,
}

/// Title indexer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlesConfig {
    #[serde(default = "default_titles_input")]
    pub input: String,

    #[serde(default = "default_titles_output")]
    pub output: String,
}

/// Plaintext extractor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_chunk_001")]
    pub input: String,

    #[serde(default = "default_extract_output")]
    pub output: String,

    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,

    /// Character budget per conversation, counted in Unicode scalar values
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_truncation_marker")]
    pub truncation_marker: String,

    #[serde(default)]
    pub node_order: NodeOrder,
}

/// How the extractor walks a conversation's mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeOrder {
    /// Iteration order of the mapping object as it appears in the export
    #[default]
    Mapping,
    /// Follow `current_node` back through `parent` links
    Thread,
}

// Default value functions
fn default_split_input() -> String {
    "conversations.json".to_string()
}

fn default_split_output_dir() -> String {
    "split_out".to_string()
}

fn default_chunk_size() -> usize {
    250
}

fn default_file_prefix() -> String {
    "conversations_chunk".to_string()
}

fn default_chunk_001() -> String {
    "split_out/conversations_chunk_001.json".to_string()
}

fn default_truncate_output() -> String {
    "split_out/conversations_chunk_001_first50.json".to_string()
}

fn default_truncate_count() -> usize {
    50
}

fn default_titles_input() -> String {
    "split_out/conversations_chunk_003.json".to_string()
}

fn default_titles_output() -> String {
    "chunk003_titles.csv".to_string()
}

fn default_extract_output() -> String {
    "beginning_plaintext.txt".to_string()
}

fn default_max_conversations() -> usize {
    5
}

fn default_max_chars() -> usize {
    20_000
}

fn default_truncation_marker() -> String {
    "[TEXT GEKÜRZT]".to_string()
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input: default_split_input(),
            output_dir: default_split_output_dir(),
            chunk_size: default_chunk_size(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl Default for TruncateConfig {
    fn default() -> Self {
        Self {
            input: default_chunk_001(),
            output: default_truncate_output(),
            count: default_truncate_count(),
        }
    }
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self {
            input: default_titles_input(),
            output: default_titles_output(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: default_chunk_001(),
            output: default_extract_output(),
            max_conversations: default_max_conversations(),
            max_chars: default_max_chars(),
            truncation_marker: default_truncation_marker(),
            node_order: NodeOrder::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./convslice.yaml (current directory)
    /// 3. ~/.config/convslice/convslice.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "convslice.yaml".to_string(),
            shellexpand::tilde("~/.config/convslice/convslice.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)
                    .with_context(|| format!("reading config `{}`", search_path))?;
                let config: Config = serde_yaml::from_str(&content)
                    .with_context(|| format!("parsing config `{}`", search_path))?;
                tracing::debug!(path = %search_path, "loaded config");
                config.validate()?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Reject settings no command can run with
    pub fn validate(&self) -> Result<()> {
        if self.split.chunk_size == 0 {
            bail!("split.chunk_size must be greater than zero");
        }
        Ok(())
    }
}

/// Expand `~` in a configured path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
