// src/youtube/mod.rs
//
// Page-level fetchers for the YouTube Data API v3.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::TubeError;
use crate::models::{Comment, Page, PageFetch, Reply, UpstreamFailure};
use crate::transport::{ApiResponse, ApiTransport};
use crate::video_id::VideoId;

mod types;
pub use types::{
    ChannelItem, ChannelSnippet, CommentResource, CommentSnippet, CommentThreadItem,
    CommentThreadSnippet, ListResponse, VideoItem, VideoSnippet,
};

/// Largest page the list endpoints will return.
pub const MAX_PAGE_SIZE: u32 = 100;

const VIDEOS_ENDPOINT: &str = "videos";
const COMMENT_THREADS_ENDPOINT: &str = "commentThreads";
const COMMENTS_ENDPOINT: &str = "comments";
const CHANNELS_ENDPOINT: &str = "channels";

/// Channel types treated as "official" by [`YouTubeClient::is_official_channel`].
const OFFICIAL_CHANNEL_TYPES: &[&str] = &["show", "channel"];

/// Stateless client over an [`ApiTransport`]. Every call is independent; the
/// only state threaded between calls is the continuation token the caller
/// passes back in.
#[derive(Clone)]
pub struct YouTubeClient {
    transport: Arc<dyn ApiTransport>,
    page_size: u32,
}

impl YouTubeClient {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Override the page size, clamped to `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Look up a video's title.
    ///
    /// Returns `Ok(None)` when the API answers non-200 or knows no such
    /// video. Transport failures and malformed 200 bodies are errors.
    pub async fn fetch_video_title(&self, video_id: &VideoId) -> Result<Option<String>, TubeError> {
        let params = [
            ("part", "snippet".to_string()),
            ("id", video_id.to_string()),
        ];
        let resp = self.transport.get(VIDEOS_ENDPOINT, &params).await?;

        if !resp.is_ok() {
            tracing::error!(
                status = resp.status,
                body = %resp.body_excerpt(),
                "Error while accessing the videos endpoint"
            );
            return Ok(None);
        }

        let list: ListResponse<VideoItem> = decode(VIDEOS_ENDPOINT, resp)?;
        let title = list.items.into_iter().next().map(|item| item.snippet.title);
        match &title {
            Some(t) => info!(%video_id, title = %t, "Retrieved video title"),
            None => warn!(%video_id, "No video metadata returned"),
        }
        Ok(title)
    }

    /// Fetch one page of top-level comment threads.
    pub async fn fetch_comment_page(
        &self,
        video_id: &VideoId,
        page_token: Option<&str>,
    ) -> Result<PageFetch<Comment>, TubeError> {
        let mut params = vec![
            ("part", "snippet,replies".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", self.page_size.to_string()),
            ("textFormat", "plainText".to_string()),
        ];
        push_token(&mut params, page_token);

        let resp = self.transport.get(COMMENT_THREADS_ENDPOINT, &params).await?;
        if !resp.is_ok() {
            return Ok(failed(COMMENT_THREADS_ENDPOINT, video_id.as_str(), resp));
        }

        let list: ListResponse<CommentThreadItem> = decode(COMMENT_THREADS_ENDPOINT, resp)?;
        let page = Page {
            items: list.items.into_iter().map(Comment::from).collect(),
            next_page_token: list.next_page_token,
        };
        debug!(
            %video_id,
            items = page.items.len(),
            has_next = !page.is_last(),
            "Fetched comment page"
        );
        Ok(PageFetch::Page(page))
    }

    /// Fetch one page of replies to a top-level comment.
    pub async fn fetch_reply_page(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> Result<PageFetch<Reply>, TubeError> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("parentId", parent_id.to_string()),
            ("maxResults", self.page_size.to_string()),
            ("textFormat", "plainText".to_string()),
        ];
        push_token(&mut params, page_token);

        let resp = self.transport.get(COMMENTS_ENDPOINT, &params).await?;
        if !resp.is_ok() {
            return Ok(failed(COMMENTS_ENDPOINT, parent_id, resp));
        }

        let list: ListResponse<CommentResource> = decode(COMMENTS_ENDPOINT, resp)?;
        let page = Page {
            items: list.items.into_iter().map(Reply::from).collect(),
            next_page_token: list.next_page_token,
        };
        debug!(
            parent_id,
            items = page.items.len(),
            has_next = !page.is_last(),
            "Fetched reply page"
        );
        Ok(PageFetch::Page(page))
    }

    /// Whether a channel declares itself as a show or a regular channel.
    ///
    /// Any non-200 answer or an empty result set reads as `false`. The declared
    /// type comes from `snippet.type` when present, otherwise from the
    /// resource `kind` (`youtube#channel` → `channel`).
    pub async fn is_official_channel(&self, channel_id: &str) -> Result<bool, TubeError> {
        let params = [
            ("part", "snippet".to_string()),
            ("id", channel_id.to_string()),
        ];
        let resp = self.transport.get(CHANNELS_ENDPOINT, &params).await?;
        if !resp.is_ok() {
            warn!(
                channel_id,
                status = resp.status,
                "Channel lookup failed; treating as not official"
            );
            return Ok(false);
        }

        let list: ListResponse<ChannelItem> = decode(CHANNELS_ENDPOINT, resp)?;
        let Some(item) = list.items.into_iter().next() else {
            return Ok(false);
        };

        let declared = declared_channel_type(&item);
        debug!(channel_id, declared = %declared, "Classified channel");
        Ok(OFFICIAL_CHANNEL_TYPES.contains(&declared.as_str()))
    }
}

fn declared_channel_type(item: &ChannelItem) -> String {
    if let Some(t) = item.snippet.as_ref().and_then(|s| s.channel_type.as_deref()) {
        return t.to_lowercase();
    }
    item.kind
        .strip_prefix("youtube#")
        .unwrap_or(&item.kind)
        .to_lowercase()
}

fn push_token(params: &mut Vec<(&'static str, String)>, page_token: Option<&str>) {
    if let Some(token) = page_token.filter(|t| !t.is_empty()) {
        params.push(("pageToken", token.to_string()));
    }
}

fn failed<T>(endpoint: &str, subject: &str, resp: ApiResponse) -> PageFetch<T> {
    let body = resp.body_excerpt();
    warn!(
        endpoint,
        subject,
        status = resp.status,
        body = %body,
        "Page request failed; treating as end of data"
    );
    PageFetch::Failed(UpstreamFailure {
        status: resp.status,
        body,
    })
}

fn decode<T: DeserializeOwned>(endpoint: &str, resp: ApiResponse) -> Result<T, TubeError> {
    serde_json::from_value(resp.body)
        .map_err(|e| TubeError::ParseError(format!("{} response: {}", endpoint, e)))
}
