//! Spreadsheet export of a [`CommentTable`].
//!
//! One `.xlsx` file per run, named after the sanitised video title and
//! written into a single output directory that is created on demand.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::TubeError;
use crate::models::{CommentTable, FlatRow, Truncation, COLUMNS};

pub const EXPORT_EXTENSION: &str = "xlsx";

/// Longest file stem written, in bytes.
pub const MAX_STEM_BYTES: usize = 200;

const SHEET_NAME: &str = "Comments";

static RESERVED_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// What an export run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub video_id: String,
    pub title: String,
    /// Data rows written, header excluded.
    pub row_count: usize,
    pub comment_count: usize,
    pub reply_count: usize,
    pub filename: String,
    pub path: PathBuf,
    pub truncations: Vec<Truncation>,
}

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize_filename(name: &str) -> String {
    RESERVED_CHARS_RE.replace_all(name, "_").into_owned()
}

/// File name for a video's export: sanitised title plus extension. Falls back
/// to `fallback` when the title is blank. The stem is cut to
/// [`MAX_STEM_BYTES`] on a char boundary so the name fits common 255-byte
/// filesystem limits.
pub fn export_filename(title: &str, fallback: &str) -> String {
    let stem = sanitize_filename(title.trim());
    let stem = truncate_at_char_boundary(&stem, MAX_STEM_BYTES).trim_end();
    let stem = if stem.is_empty() { fallback } else { stem };
    format!("{}.{}", stem, EXPORT_EXTENSION)
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Write the table to `path` as a single-sheet workbook.
///
/// Likes and reply counts are written as numbers; every other populated cell
/// is text. Cells a row leaves empty are not written at all.
pub fn write_workbook(table: &CommentTable, path: &Path) -> Result<(), TubeError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let r = u32::try_from(idx + 1)
            .map_err(|_| TubeError::Export("too many rows for one worksheet".to_string()))?;
        match row {
            FlatRow::Comment(c) => {
                sheet.write_string(r, 0, &c.author)?;
                sheet.write_string(r, 1, &c.text)?;
                sheet.write_string(r, 2, &c.published_at)?;
                sheet.write_number(r, 3, c.like_count as f64)?;
                sheet.write_number(r, 4, c.reply_count as f64)?;
            }
            FlatRow::Reply(reply) => {
                sheet.write_string(r, 5, &reply.author)?;
                sheet.write_string(r, 6, &reply.text)?;
                sheet.write_string(r, 7, &reply.published_at)?;
                sheet.write_string(r, 8, &reply.updated_at)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Export `table` into `output_dir`, creating the directory if needed.
pub fn export_table(
    table: &CommentTable,
    title: &str,
    output_dir: &Path,
) -> Result<ExportSummary, TubeError> {
    std::fs::create_dir_all(output_dir)?;

    let filename = export_filename(title, table.video_id.as_str());
    let path = output_dir.join(&filename);
    write_workbook(table, &path)?;

    let summary = ExportSummary {
        video_id: table.video_id.to_string(),
        title: title.to_string(),
        row_count: table.rows.len(),
        comment_count: table.comment_count(),
        reply_count: table.reply_count(),
        filename,
        path,
        truncations: table.truncations.clone(),
    };
    info!(
        path = %summary.path.display(),
        rows = summary.row_count,
        "Exported comment table"
    );
    Ok(summary)
}
