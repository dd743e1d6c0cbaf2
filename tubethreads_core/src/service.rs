//! The request-facing boundary: everything a caller needs, keyed by watch URL.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::error::TubeError;
use crate::export::{export_table, ExportSummary};
use crate::models::CommentTable;
use crate::pagination::{collect_comment_table, CollectOptions};
use crate::settings::Settings;
use crate::transport::{ApiTransport, HttpTransport};
use crate::video_id::{extract_video_id, VideoId};
use crate::youtube::YouTubeClient;

/// A video's title together with its flattened comment table.
#[derive(Debug, Clone)]
pub struct VideoComments {
    pub video_id: VideoId,
    pub title: String,
    pub table: CommentTable,
}

#[derive(Clone)]
pub struct CommentService {
    client: YouTubeClient,
    options: CollectOptions,
    output_dir: PathBuf,
}

impl CommentService {
    pub fn new(client: YouTubeClient, options: CollectOptions, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            options,
            output_dir: output_dir.into(),
        }
    }

    /// Build a service over HTTP. Fails when no API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, TubeError> {
        let api_key = settings.require_api_key()?;
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new(
            &settings.api_base,
            api_key,
            settings.request_timeout(),
        )?);
        let client = YouTubeClient::new(transport).with_page_size(settings.page_size);
        Ok(Self::new(
            client,
            settings.collect_options(),
            settings.output_dir.clone(),
        ))
    }

    pub fn with_options(mut self, options: CollectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn client(&self) -> &YouTubeClient {
        &self.client
    }

    /// Title of the video behind `url`.
    ///
    /// `InvalidInput` when no ID can be extracted (nothing is fetched);
    /// `ResourceNotFound` when the API returns no metadata for it.
    pub async fn video_title(&self, url: &str) -> Result<String, TubeError> {
        let video_id = parse_watch_url(url)?;
        self.title_for_video(&video_id).await
    }

    /// Title plus every comment and reply of the video behind `url`.
    pub async fn fetch_comments(&self, url: &str) -> Result<VideoComments, TubeError> {
        let video_id = parse_watch_url(url)?;
        let title = self.title_for_video(&video_id).await?;
        let table = collect_comment_table(&self.client, &video_id, &self.options).await?;
        Ok(VideoComments {
            video_id,
            title,
            table,
        })
    }

    /// Write already collected comments to a workbook in `output_dir`, or in
    /// the configured directory when `None`.
    pub async fn export(
        &self,
        comments: &VideoComments,
        output_dir: Option<&Path>,
    ) -> Result<ExportSummary, TubeError> {
        let dir = output_dir.unwrap_or(&self.output_dir).to_path_buf();
        let table = comments.table.clone();
        let title = comments.title.clone();
        tokio::task::spawn_blocking(move || export_table(&table, &title, &dir))
            .await
            .map_err(|e| TubeError::Export(format!("export task failed: {}", e)))?
    }

    /// Fetch, flatten and export in one go. The summary carries the data row
    /// count and the generated file name.
    pub async fn export_comments(
        &self,
        url: &str,
        output_dir: Option<&Path>,
    ) -> Result<ExportSummary, TubeError> {
        let comments = self.fetch_comments(url).await?;
        self.export(&comments, output_dir).await
    }

    /// Whether `channel_id` declares itself a show or a regular channel.
    pub async fn classify_channel(&self, channel_id: &str) -> Result<bool, TubeError> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Err(TubeError::InvalidInput("channel ID is empty".to_string()));
        }
        self.client.is_official_channel(channel_id).await
    }

    /// Title of an already extracted video; `ResourceNotFound` when the API
    /// returns no metadata.
    pub async fn title_for_video(&self, video_id: &VideoId) -> Result<String, TubeError> {
        match self.client.fetch_video_title(video_id).await? {
            Some(title) => Ok(title),
            None => {
                info!(%video_id, "No title available");
                Err(TubeError::ResourceNotFound(format!(
                    "no metadata for video {}",
                    video_id
                )))
            }
        }
    }
}

/// Extract the video ID from a watch URL, or `InvalidInput`.
pub fn parse_watch_url(url: &str) -> Result<VideoId, TubeError> {
    extract_video_id(url).ok_or_else(|| {
        TubeError::InvalidInput(format!("no video ID found in '{}'", url.trim()))
    })
}
