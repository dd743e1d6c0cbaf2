use crate::cli::OutputFormat;
use crate::commands::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tubethreads_core::models::TruncationScope;
use tubethreads_core::{ExportSummary, COLUMNS};

/// Longest cell shown in a preview table before it is cut with an ellipsis.
const PREVIEW_CELL_CHARS: usize = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    VideoTitle {
        video_id: String,
        title: String,
    },
    Export {
        summary: ExportSummary,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        preview: Vec<Vec<String>>,
    },
    ChannelClass {
        channel_id: String,
        official: bool,
    },
    ConfigInfo(Value),
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Text => {
            format_text_output(data)?;
        }
        OutputFormat::Pretty => {
            format_pretty_output(data)?;
        }
    }
    Ok(())
}

fn format_text_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::VideoTitle { title, .. } => println!("{}", title),
        OutputData::Export { summary, preview } => {
            println!("{}\t{}", summary.row_count, summary.path.display());
            for row in preview {
                println!("{}", row.join("\t"));
            }
        }
        OutputData::ChannelClass { official, .. } => println!("{}", official),
        OutputData::ConfigInfo(config) => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}

fn format_pretty_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::VideoTitle { video_id, title } => {
            println!("{} {}", title.bold(), format!("({})", video_id).dimmed());
        }
        OutputData::Export { summary, preview } => {
            println!("{} {}", "Exported".green().bold(), summary.title.bold());
            println!("  {:<10} {}", "File:".cyan(), summary.path.display());
            println!(
                "  {:<10} {} ({} comments, {} replies)",
                "Rows:".cyan(),
                summary.row_count,
                summary.comment_count,
                summary.reply_count
            );
            if !summary.truncations.is_empty() {
                println!();
                println!(
                    "{} {} pagination loop(s) stopped early on an upstream error; the export is partial.",
                    "Warning:".yellow().bold(),
                    summary.truncations.len()
                );
                for t in &summary.truncations {
                    let scope = match &t.scope {
                        TruncationScope::Comments => "comments".to_string(),
                        TruncationScope::Replies { parent_id } => format!("replies of {}", parent_id),
                    };
                    println!(
                        "  {} page {} -> HTTP {}",
                        scope.dimmed(),
                        t.page_index + 1,
                        t.status
                    );
                }
            }
            if !preview.is_empty() {
                println!();
                println!("{}", preview_table(preview));
            }
        }
        OutputData::ChannelClass {
            channel_id,
            official,
        } => {
            if *official {
                println!("{} is an {} channel", channel_id.bold(), "official".green());
            } else {
                println!("{} is {} an official channel", channel_id.bold(), "not".yellow());
            }
        }
        OutputData::ConfigInfo(config) => {
            println!("{}", "Settings".bold().cyan());
            if let Some(map) = config.as_object() {
                for (key, value) in map {
                    let shown = match value {
                        Value::String(s) => s.clone(),
                        Value::Null => "-".to_string(),
                        other => other.to_string(),
                    };
                    println!("  {:<22} {}", format!("{}:", key).cyan(), shown);
                }
            }
        }
    }
    Ok(())
}

pub fn preview_table(rows: &[Vec<String>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(COLUMNS.to_vec());
    for row in rows {
        table.add_row(row.iter().map(|cell| truncate_cell(cell)).collect::<Vec<_>>());
    }
    table
}

fn truncate_cell(text: &str) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    if flat.chars().count() <= PREVIEW_CELL_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CELL_CHARS - 1).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_cells() {
        let long = "x".repeat(100);
        let cut = truncate_cell(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CELL_CHARS);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate_cell("line\nbreak"), "line break");
    }

    #[test]
    fn preview_has_all_columns() {
        let rows = vec![vec![
            "alice".to_string(),
            "hi".to_string(),
            "2024".to_string(),
            "1".to_string(),
            "0".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]];
        let rendered = preview_table(&rows).to_string();
        assert!(rendered.contains("Reply Author"));
        assert!(rendered.contains("alice"));
    }
}
