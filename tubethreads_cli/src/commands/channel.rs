use crate::cli::Cli;
use crate::commands::{build_service, load_settings, Result};
use crate::output::{format_output, OutputData};

pub async fn run(cli: &Cli, channel_id: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let service = build_service(&settings)?;

    let official = service.classify_channel(channel_id).await?;
    let output_data = OutputData::ChannelClass {
        channel_id: channel_id.trim().to_string(),
        official,
    };
    format_output(&output_data, &cli.output)
}
