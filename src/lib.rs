//! convslice - slice exported AI conversation archives into workable pieces
//!
//! Four one-shot batch jobs over a ChatGPT-style `conversations.json`:
//! split it into time-ordered chunks, keep a prefix of a chunk, index a
//! chunk's titles as CSV, and extract a plaintext transcript excerpt.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;

pub use config::Config;
pub use error::ExportError;
pub use export::{read_conversations, write_conversations, Conversation};
