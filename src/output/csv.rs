//! CSV output

use std::io::{self, Write};
use std::path::Path;

use crate::scan::{FileRecord, Group};

use super::config::OutputConfig;
use super::table::format_modified;

const HEADER: [&str; 5] = ["path", "size", "modified", "extension", "is_symlink"];

fn record_fields(record: &FileRecord, config: &OutputConfig, root: &Path) -> [String; 5] {
    [
        config
            .display_path(record.path(), root)
            .to_string_lossy()
            .to_string(),
        record.size().to_string(),
        format_modified(record.modified()),
        record.extension().to_string(),
        record.is_symlink().to_string(),
    ]
}

/// Write ranked files as CSV with a header row.
pub fn write_csv_ranked<W: Write>(
    out: W,
    records: &[FileRecord],
    root: &Path,
    config: &OutputConfig,
) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(record_fields(record, config, root))?;
    }
    writer.flush()
}

/// Write grouped files as CSV; the first column is the group key.
pub fn write_csv_grouped<W: Write>(
    out: W,
    groups: &[Group],
    root: &Path,
    config: &OutputConfig,
) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(std::iter::once("group").chain(HEADER))?;
    for group in groups {
        let label = group.label();
        for record in &group.records {
            let fields = record_fields(record, config, root);
            writer.write_record(
                std::iter::once(label.as_ref()).chain(fields.iter().map(String::as_str)),
            )?;
        }
    }
    writer.flush()
}
