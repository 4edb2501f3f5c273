//! Conversation export schema and file I/O
//!
//! Conversations are kept as raw `serde_json::Value`s so chunk files can be
//! written back verbatim (object key order is preserved). The borrowed views
//! below give typed access to the handful of fields the commands read:
//!
//! ```text
//! [{ "title": ..., "create_time": ..., "current_node": ...,
//!    "mapping": { "<id>": { "parent": ..., "message": {
//!        "author": { "role": ... }, "create_time": ...,
//!        "content": { "parts": [...] } } } } }]
//! ```

mod thread;

pub use thread::ordered_nodes;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, TimeZone};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ExportError;

/// Read a JSON file whose top level must be an array of conversations
pub fn read_conversations(path: &Path) -> Result<Vec<Value>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading `{}`", path.display()))?;
    let json: Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing `{}`", path.display()))?;

    match json {
        Value::Array(items) => {
            tracing::debug!(path = %path.display(), count = items.len(), "loaded conversations");
            Ok(items)
        }
        other => Err(ExportError::NotAnArray {
            path: path.to_path_buf(),
            found: json_kind(&other),
        }
        .into()),
    }
}

/// Write conversations as one compact JSON array, non-ASCII text left unescaped
pub fn write_conversations(path: &Path, conversations: &[Value]) -> Result<()> {
    let encoded = serde_json::to_string(conversations)
        .with_context(|| format!("encoding `{}`", path.display()))?;
    fs::write(path, encoded).with_context(|| format!("writing `{}`", path.display()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Coerce a loosely typed timestamp to seconds since the epoch.
///
/// Numbers pass through, strings are parsed after trimming, booleans count
/// as 1 or 0. Anything else is treated as missing.
pub fn coerce_timestamp(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM` in the given timezone.
///
/// Fractions are rounded to the microsecond, ties to even. Returns `None`
/// for non-finite values and for dates outside years 1..=9999.
pub fn format_timestamp_in<Tz>(timestamp: f64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if !timestamp.is_finite() {
        return None;
    }
    let mut secs = timestamp.floor();
    if secs < i64::MIN as f64 || secs >= i64::MAX as f64 {
        return None;
    }
    let mut micros = ((timestamp - secs) * 1e6).round_ties_even();
    if micros >= 1e6 {
        secs += 1.0;
        micros -= 1e6;
    }
    let utc = DateTime::from_timestamp(secs as i64, micros as u32 * 1_000)?;
    let local = utc.with_timezone(tz);
    if !(1..=9999).contains(&local.year()) {
        return None;
    }
    Some(local.format("%Y-%m-%d %H:%M").to_string())
}

/// Read-only view of one conversation record
#[derive(Debug, Clone, Copy)]
pub struct Conversation<'a>(&'a Value);

impl<'a> Conversation<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// The `title` field, `None` when absent or null
    pub fn title(&self) -> Option<&'a Value> {
        self.0.get("title").filter(|v| !v.is_null())
    }

    /// `create_time` coerced to seconds, `None` when missing or unparseable
    pub fn create_time(&self) -> Option<f64> {
        coerce_timestamp(self.0.get("create_time"))
    }

    /// Sort key used when splitting: missing timestamps sort as 0.0
    pub fn sort_key(&self) -> f64 {
        self.create_time().unwrap_or(0.0)
    }

    pub fn current_node(&self) -> Option<&'a str> {
        self.0.get("current_node").and_then(Value::as_str)
    }

    /// The message graph, `None` when absent or not an object
    pub fn mapping(&self) -> Option<&'a Map<String, Value>> {
        self.0.get("mapping").and_then(Value::as_object)
    }
}

/// One entry of a conversation's mapping
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(&'a Value);

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn parent(&self) -> Option<&'a str> {
        self.0.get("parent").and_then(Value::as_str)
    }

    /// The node's message; null or empty messages count as absent
    pub fn message(&self) -> Option<Message<'a>> {
        match self.0.get("message")? {
            Value::Null => None,
            Value::Object(map) if map.is_empty() => None,
            other => Some(Message(other)),
        }
    }
}

/// A message attached to a node
#[derive(Debug, Clone, Copy)]
pub struct Message<'a>(&'a Value);

impl<'a> Message<'a> {
    /// `author.role`, or `"unknown"`
    pub fn role(&self) -> &'a str {
        self.0
            .get("author")
            .and_then(|author| author.get("role"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }

    pub fn create_time(&self) -> Option<f64> {
        coerce_timestamp(self.0.get("create_time"))
    }

    /// String fragments of `content.parts`; other part kinds are skipped
    pub fn text_parts(&self) -> impl Iterator<Item = &'a str> {
        self.0
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }
}
