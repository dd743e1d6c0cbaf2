use serde::{Deserialize, Serialize};

use crate::models::{Comment, Reply};

/// Common envelope of every list endpoint in the Data API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// An item from `videos?part=snippet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoItem {
    #[serde(default)]
    pub id: Option<String>,
    pub snippet: VideoSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

/// An item from `commentThreads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThreadItem {
    #[serde(default)]
    pub id: String,
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: CommentResource,
    /// Missing on some threads; read as zero.
    #[serde(default)]
    pub total_reply_count: Option<u64>,
}

/// A `comment` resource, used both for top-level comments and replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResource {
    #[serde(default)]
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentSnippet {
    pub author_display_name: String,
    pub text_display: String,
    pub published_at: String,
    pub updated_at: String,
    pub like_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// An item from `channels?part=snippet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelItem {
    /// Resource kind, e.g. `youtube#channel`.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelSnippet {
    pub title: String,
    /// Declared channel type when the API reports one (`show`, `channel`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
}

impl From<CommentThreadItem> for Comment {
    fn from(thread: CommentThreadItem) -> Self {
        let top = thread.snippet.top_level_comment;
        // Threads always carry a top-level comment ID; fall back to the thread
        // ID, which the API keeps identical, if it was omitted.
        let id = if top.id.is_empty() { thread.id } else { top.id };
        Comment {
            id,
            author: top.snippet.author_display_name,
            text: top.snippet.text_display,
            published_at: top.snippet.published_at,
            like_count: top.snippet.like_count,
            reply_count: thread.snippet.total_reply_count.unwrap_or(0),
        }
    }
}

impl From<CommentResource> for Reply {
    fn from(resource: CommentResource) -> Self {
        let s = resource.snippet;
        Reply {
            author: s.author_display_name,
            text: s.text_display,
            published_at: s.published_at,
            updated_at: s.updated_at,
        }
    }
}
