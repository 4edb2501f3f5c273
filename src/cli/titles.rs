//! Titles command implementation

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::config::{expand_path, TitlesConfig};
use crate::export::{format_timestamp_in, read_conversations, Conversation};

/// One line of the title index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRow {
    pub nr: usize,
    pub datetime: String,
    pub title: String,
}

/// Build one row per conversation, numbered from 1 in input order.
///
/// Timestamps that are missing or cannot be formatted leave the datetime
/// field empty rather than failing the run.
pub fn title_rows<Tz>(conversations: &[Value], tz: &Tz) -> Vec<TitleRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    conversations
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let conversation = Conversation::new(value);
            let datetime = conversation
                .create_time()
                .and_then(|ts| format_timestamp_in(ts, tz));
            if datetime.is_none() && value.get("create_time").is_some_and(|v| !v.is_null()) {
                tracing::warn!(nr = i + 1, "unusable create_time, leaving datetime empty");
            }
            let title = conversation
                .title()
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();

            TitleRow {
                nr: i + 1,
                datetime: datetime.unwrap_or_default(),
                title: title.to_string(),
            }
        })
        .collect()
}

/// Write rows as `;`-separated CSV with a `nr;datetime;title` header
pub fn write_csv(path: &Path, rows: &[TitleRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("creating `{}`", path.display()))?;

    writer.write_record(["nr", "datetime", "title"])?;
    for row in rows {
        let nr = row.nr.to_string();
        writer.write_record([nr.as_str(), row.datetime.as_str(), row.title.as_str()])?;
    }
    writer
        .flush()
        .with_context(|| format!("writing `{}`", path.display()))?;
    Ok(())
}

pub fn run(config: &TitlesConfig) -> Result<usize> {
    let input = expand_path(&config.input);
    let output = expand_path(&config.output);

    let conversations = read_conversations(&input)?;
    let rows = title_rows(&conversations, &Local);
    write_csv(&output, &rows)?;

    println!("Wrote {} with {} rows", output.display(), rows.len());
    Ok(rows.len())
}
