use crate::cli::Cli;
use crate::commands::{build_service, load_settings, spinner, CommandError, Result};
use crate::output::{format_output, OutputData};
use std::path::PathBuf;
use tracing::debug;
use tubethreads_core::{CollectOptions, FailurePolicy};

pub struct CommentsArgs {
    pub url: String,
    pub output_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub fail_fast: bool,
    pub preview: Option<usize>,
}

pub async fn run(cli: &Cli, args: CommentsArgs) -> Result<()> {
    let settings = load_settings(cli)?;
    let options = collect_options(settings.collect_options(), &args)?;
    let service = build_service(&settings)?.with_options(options);
    debug!(?options, output_dir = ?args.output_dir, "Starting comment export");

    let progress = spinner("Fetching comments and replies...");
    let fetched = service.fetch_comments(&args.url).await;
    let comments = match fetched {
        Ok(comments) => comments,
        Err(e) => {
            progress.finish_and_clear();
            return Err(e.into());
        }
    };
    progress.set_message(format!(
        "Writing {} rows for \"{}\"...",
        comments.table.rows.len(),
        comments.title
    ));
    let exported = service.export(&comments, args.output_dir.as_deref()).await;
    progress.finish_and_clear();
    let summary = exported?;

    let preview = args
        .preview
        .map(|n| {
            comments
                .table
                .rows
                .iter()
                .take(n)
                .map(|row| row.to_record().to_vec())
                .collect()
        })
        .unwrap_or_default();

    format_output(&OutputData::Export { summary, preview }, &cli.output)
}

fn collect_options(mut options: CollectOptions, args: &CommentsArgs) -> Result<CollectOptions> {
    if let Some(n) = args.concurrency {
        if n == 0 {
            return Err(CommandError::InvalidArgument(
                "--concurrency must be at least 1".to_string(),
            ));
        }
        options.reply_concurrency = n;
    }
    if args.fail_fast {
        options.failure_policy = FailurePolicy::Abort;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(concurrency: Option<usize>, fail_fast: bool) -> CommentsArgs {
        CommentsArgs {
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            output_dir: None,
            concurrency,
            fail_fast,
            preview: None,
        }
    }

    #[test]
    fn flags_override_settings() {
        let options = collect_options(CollectOptions::default(), &args(Some(6), true)).unwrap();
        assert_eq!(options.reply_concurrency, 6);
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn settings_kept_without_flags() {
        let base = CollectOptions {
            failure_policy: FailurePolicy::Truncate,
            reply_concurrency: 3,
        };
        assert_eq!(collect_options(base, &args(None, false)).unwrap(), base);
    }

    #[test]
    fn zero_concurrency_rejected() {
        assert!(collect_options(CollectOptions::default(), &args(Some(0), false)).is_err());
    }
}
