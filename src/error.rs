//! Typed errors for malformed export files.
//!
//! Internal propagation uses `anyhow`; these are the failures worth naming.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The file parsed as JSON but is not a list of conversations.
    #[error("expected top-level JSON array in `{}`, found {found}", path.display())]
    NotAnArray { path: PathBuf, found: &'static str },
}
