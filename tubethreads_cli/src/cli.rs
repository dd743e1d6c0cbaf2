use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tubethreads")]
#[command(about = "Export every comment and reply of a YouTube video to a spreadsheet")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  export YOUTUBE_API_KEY=...
  tubethreads title \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\"
  tubethreads comments \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\"
  tubethreads comments <url> --preview 10 --concurrency 4

\x1b[1;36mConfiguration:\x1b[0m
  tubethreads config show                 Show effective settings
  ~/.config/tubethreads/config.toml       Optional settings file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to <config dir>/tubethreads/config.toml)
    #[arg(long, global = true, env = "TUBETHREADS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose output (-v for debug logs, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a video's title
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tubethreads title \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\"
  tubethreads title <url> --output json")]
    Title {
        /// Canonical watch URL (youtube.com/watch?v=...)
        url: String,
    },

    /// Collect all comments and replies and export them as .xlsx
    ///
    /// Each top-level comment becomes one row, followed by one row per reply.
    /// The file is named after the video title.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  tubethreads comments <url>
  tubethreads comments <url> --output-dir exports --preview 20
  tubethreads comments <url> --concurrency 8 --fail-fast")]
    Comments {
        /// Canonical watch URL (youtube.com/watch?v=...)
        url: String,
        /// Directory for the exported workbook (overrides settings)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
        /// Fetch reply threads for this many comments at once
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Fail on the first upstream error instead of exporting partial data
        #[arg(long)]
        fail_fast: bool,
        /// Print the first N rows after exporting
        #[arg(short, long, value_name = "N")]
        preview: Option<usize>,
    },

    /// Check whether a channel is a show or a regular channel
    Channel {
        /// Channel ID (UC...)
        id: String,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Show effective settings after file and environment overrides
    Show,
    /// Print the default settings file location
    Path,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text output
    Text,
}
