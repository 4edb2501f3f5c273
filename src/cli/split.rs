//! Split command implementation

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::{expand_path, SplitConfig};
use crate::export::{read_conversations, write_conversations, Conversation};

/// One chunk file written by the splitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub path: PathBuf,
    pub count: usize,
}

/// Stable sort, oldest first; missing or unparseable `create_time` sorts as 0.0
pub fn sort_by_create_time(conversations: &mut [Value]) {
    conversations.sort_by(|a, b| {
        Conversation::new(a)
            .sort_key()
            .total_cmp(&Conversation::new(b).sort_key())
    });
}

/// File name of the chunk at 1-based `index`
pub fn chunk_file_name(prefix: &str, index: usize) -> String {
    format!("{}_{:03}.json", prefix, index)
}

pub fn run(config: &SplitConfig) -> Result<Vec<ChunkFile>> {
    if config.chunk_size == 0 {
        bail!("split.chunk_size must be greater than zero");
    }
    let input = expand_path(&config.input);
    let output_dir = expand_path(&config.output_dir);

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating `{}`", output_dir.display()))?;

    let mut conversations = read_conversations(&input)?;
    sort_by_create_time(&mut conversations);
    tracing::debug!(
        total = conversations.len(),
        chunk_size = config.chunk_size,
        "sorted conversations"
    );

    let mut written = Vec::new();
    for (i, chunk) in conversations.chunks(config.chunk_size).enumerate() {
        let path = output_dir.join(chunk_file_name(&config.file_prefix, i + 1));
        write_conversations(&path, chunk)?;
        println!("Wrote {}  ({} conversations)", path.display(), chunk.len());
        written.push(ChunkFile {
            path,
            count: chunk.len(),
        });
    }

    if written.is_empty() {
        println!("No conversations in {}, nothing written", input.display());
    }

    Ok(written)
}
