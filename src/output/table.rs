//! Plain-text table output with optional color

use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::scan::{FileRecord, Group};
use crate::size::format_size;

use super::config::OutputConfig;

const RULE_WIDTH: usize = 80;

/// Local timestamp as shown in the Modified column.
pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Writes ranked files and groups as aligned text.
pub struct TableFormatter<'a> {
    config: &'a OutputConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(config: &'a OutputConfig) -> Self {
        Self { config }
    }

    pub fn write_ranked<W: WriteColor>(
        &self,
        out: &mut W,
        records: &[FileRecord],
        root: &Path,
    ) -> io::Result<()> {
        if records.is_empty() {
            return writeln!(out, "No files found.");
        }

        let total: u64 = records.iter().map(FileRecord::size).sum();
        writeln!(
            out,
            "Found {} large files (Total: {})",
            records.len(),
            format_size(total)
        )?;
        writeln!(out)?;
        self.write_rows(out, records, root)
    }

    pub fn write_grouped<W: WriteColor>(
        &self,
        out: &mut W,
        groups: &[Group],
        root: &Path,
    ) -> io::Result<()> {
        if groups.iter().all(|g| g.records.is_empty()) {
            return writeln!(out, "No files found.");
        }

        let mut heading = ColorSpec::new();
        heading.set_bold(true).set_fg(Some(Color::Cyan));

        for group in groups.iter().filter(|g| !g.records.is_empty()) {
            writeln!(out)?;
            writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
            write!(out, "Group: ")?;
            out.set_color(&heading)?;
            write!(out, "{}", group.label())?;
            out.reset()?;
            writeln!(out)?;
            writeln!(
                out,
                "Total: {} ({} files)",
                format_size(group.total_size),
                group.file_count
            )?;
            writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
            writeln!(out)?;
            self.write_rows(out, &group.records, root)?;
        }
        Ok(())
    }

    fn write_rows<W: WriteColor>(
        &self,
        out: &mut W,
        records: &[FileRecord],
        root: &Path,
    ) -> io::Result<()> {
        let mut bold = ColorSpec::new();
        bold.set_bold(true);
        out.set_color(&bold)?;
        write!(out, "{:<12} {:<20} File", "Size", "Modified")?;
        out.reset()?;
        writeln!(out)?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

        let mut size_color = ColorSpec::new();
        size_color.set_fg(Some(Color::Yellow));
        let mut link_color = ColorSpec::new();
        link_color.set_fg(Some(Color::Magenta));

        for record in records {
            out.set_color(&size_color)?;
            write!(out, "{:<12}", format_size(record.size()))?;
            out.reset()?;
            write!(out, " {:<20} ", format_modified(record.modified()))?;

            let path = self.config.display_path(record.path(), root);
            if record.is_symlink() {
                out.set_color(&link_color)?;
                write!(out, "{}", path.display())?;
                out.reset()?;
            } else {
                write!(out, "{}", path.display())?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
