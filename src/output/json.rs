//! JSON output formatting

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::scan::{FileRecord, Group};
use crate::size::format_size;

use super::config::OutputConfig;

#[derive(Debug, Serialize)]
pub struct JsonFile {
    pub path: String,
    pub size: u64,
    pub size_human: String,
    /// RFC 3339, local time zone.
    pub modified: String,
    pub modified_epoch: i64,
    pub extension: String,
    pub is_symlink: bool,
}

impl JsonFile {
    pub fn new(record: &FileRecord, config: &OutputConfig, root: &Path) -> Self {
        Self {
            path: config
                .display_path(record.path(), root)
                .to_string_lossy()
                .to_string(),
            size: record.size(),
            size_human: format_size(record.size()),
            modified: DateTime::<Local>::from(record.modified()).to_rfc3339(),
            modified_epoch: record.modified_secs(),
            extension: record.extension().to_string(),
            is_symlink: record.is_symlink(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonGroup {
    pub group: String,
    pub total_size: u64,
    pub total_size_human: String,
    pub file_count: u64,
    pub files: Vec<JsonFile>,
}

#[derive(Debug, Serialize)]
struct JsonReport<T> {
    root: String,
    cancelled: bool,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Serialize)]
struct RankedBody {
    files: Vec<JsonFile>,
}

#[derive(Debug, Serialize)]
struct GroupedBody {
    groups: Vec<JsonGroup>,
}

fn write_report<W: Write, T: Serialize>(
    out: &mut W,
    root: &Path,
    cancelled: bool,
    body: T,
) -> io::Result<()> {
    let report = JsonReport {
        root: root.to_string_lossy().to_string(),
        cancelled,
        body,
    };
    serde_json::to_writer_pretty(&mut *out, &report).map_err(io::Error::other)?;
    writeln!(out)
}

/// Write ranked files as a pretty-printed JSON document.
pub fn write_json_ranked<W: Write>(
    out: &mut W,
    records: &[FileRecord],
    root: &Path,
    cancelled: bool,
    config: &OutputConfig,
) -> io::Result<()> {
    let files = records
        .iter()
        .map(|r| JsonFile::new(r, config, root))
        .collect();
    write_report(out, root, cancelled, RankedBody { files })
}

/// Write groups as a pretty-printed JSON document.
pub fn write_json_grouped<W: Write>(
    out: &mut W,
    groups: &[Group],
    root: &Path,
    cancelled: bool,
    config: &OutputConfig,
) -> io::Result<()> {
    let groups = groups
        .iter()
        .map(|g| JsonGroup {
            group: g.label().into_owned(),
            total_size: g.total_size,
            total_size_human: format_size(g.total_size),
            file_count: g.file_count,
            files: g
                .records
                .iter()
                .map(|r| JsonFile::new(r, config, root))
                .collect(),
        })
        .collect();
    write_report(out, root, cancelled, GroupedBody { groups })
}
