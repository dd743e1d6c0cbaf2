use crate::cli::Cli;
use crate::commands::{build_service, load_settings, spinner, Result};
use crate::output::{format_output, OutputData};
use tubethreads_core::service::parse_watch_url;

pub async fn run(cli: &Cli, url: &str) -> Result<()> {
    let video_id = parse_watch_url(url)?;
    let settings = load_settings(cli)?;
    let service = build_service(&settings)?;

    let progress = spinner("Looking up video title...");
    let result = service.title_for_video(&video_id).await;
    progress.finish_and_clear();
    let title = result?;

    let output_data = OutputData::VideoTitle {
        video_id: video_id.to_string(),
        title,
    };
    format_output(&output_data, &cli.output)
}
