//! Truncate command implementation

use anyhow::Result;

use crate::config::{expand_path, TruncateConfig};
use crate::export::{read_conversations, write_conversations};

/// Write the first `count` conversations of a chunk, unchanged.
///
/// Short input is not an error; whatever is available gets written.
pub fn run(config: &TruncateConfig) -> Result<usize> {
    let input = expand_path(&config.input);
    let output = expand_path(&config.output);

    let conversations = read_conversations(&input)?;
    let prefix = &conversations[..config.count.min(conversations.len())];
    if prefix.len() < config.count {
        tracing::debug!(
            available = conversations.len(),
            requested = config.count,
            "input shorter than requested prefix"
        );
    }

    write_conversations(&output, prefix)?;
    println!("Wrote {} with {} conversations", output.display(), prefix.len());
    Ok(prefix.len())
}
