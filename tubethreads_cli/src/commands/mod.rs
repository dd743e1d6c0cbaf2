pub mod channel;
pub mod comments;
pub mod config;
pub mod title;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use thiserror::Error;
use tubethreads_core::{CommentService, Settings};

use crate::cli::Cli;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Core(#[from] tubethreads_core::TubeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

pub fn build_service(settings: &Settings) -> Result<CommentService> {
    Ok(CommentService::from_settings(settings)?)
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
