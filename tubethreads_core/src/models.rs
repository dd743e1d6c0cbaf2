//! Records produced while walking a video's comment threads.
//!
//! Everything here is transient: built during one export run, flattened into
//! a [`CommentTable`], handed to the writer and dropped.

use serde::{Deserialize, Serialize};

use crate::video_id::VideoId;

/// Column headers of the flattened table, in positional order.
pub const COLUMNS: [&str; 9] = [
    "Name",
    "Comment",
    "Time",
    "Likes",
    "Reply Count",
    "Reply Author",
    "Reply",
    "Published",
    "Updated",
];

/// A top-level comment attached directly to the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub published_at: String,
    pub like_count: u64,
    pub reply_count: u64,
}

/// A reply to a top-level comment. Its own ID is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub author: String,
    pub text: String,
    pub published_at: String,
    pub updated_at: String,
}

/// One page of results plus the token for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
        }
    }

    /// The continuation token, treating an empty string as absent.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_last(&self) -> bool {
        self.continuation().is_none()
    }
}

/// A non-success answer from the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub status: u16,
    pub body: String,
}

/// Outcome of a single page request that reached the API.
///
/// Transport errors are reported through `Result` instead; this type only
/// separates "the API answered with data" from "the API answered with an
/// error status", so callers can decide whether to stop, abort or carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetch<T> {
    Page(Page<T>),
    Failed(UpstreamFailure),
}

impl<T> PageFetch<T> {
    /// Collapse to the lenient reading: a failure is an empty final page.
    pub fn into_page_or_empty(self) -> Page<T> {
        match self {
            PageFetch::Page(page) => page,
            PageFetch::Failed(_) => Page::empty(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageFetch::Failed(_))
    }
}

/// Which pagination loop was cut short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum TruncationScope {
    Comments,
    Replies { parent_id: String },
}

/// Record of a loop that stopped early because the API answered non-200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    #[serde(flatten)]
    pub scope: TruncationScope,
    /// Zero-based index of the page that failed within its loop.
    pub page_index: usize,
    pub status: u16,
}

/// A single exported row: one comment or one reply, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlatRow {
    Comment(Comment),
    Reply(Reply),
}

impl FlatRow {
    pub fn is_reply(&self) -> bool {
        matches!(self, FlatRow::Reply(_))
    }

    /// Positional string form matching [`COLUMNS`]. Unused cells are empty.
    pub fn to_record(&self) -> [String; 9] {
        match self {
            FlatRow::Comment(c) => [
                c.author.clone(),
                c.text.clone(),
                c.published_at.clone(),
                c.like_count.to_string(),
                c.reply_count.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            FlatRow::Reply(r) => [
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                r.author.clone(),
                r.text.clone(),
                r.published_at.clone(),
                r.updated_at.clone(),
            ],
        }
    }
}

impl From<Comment> for FlatRow {
    fn from(comment: Comment) -> Self {
        FlatRow::Comment(comment)
    }
}

impl From<Reply> for FlatRow {
    fn from(reply: Reply) -> Self {
        FlatRow::Reply(reply)
    }
}

/// The flattened result of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentTable {
    pub video_id: VideoId,
    pub rows: Vec<FlatRow>,
    /// Loops that ended because of an upstream error rather than a final
    /// page. Empty when every loop ran to its natural end.
    pub truncations: Vec<Truncation>,
}

impl CommentTable {
    pub fn new(video_id: VideoId) -> Self {
        Self {
            video_id,
            rows: Vec::new(),
            truncations: Vec::new(),
        }
    }

    pub fn comment_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_reply()).count()
    }

    pub fn reply_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_reply()).count()
    }

    pub fn is_truncated(&self) -> bool {
        !self.truncations.is_empty()
    }

    /// Header followed by every row in positional string form.
    pub fn records(&self) -> Vec<[String; 9]> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(COLUMNS.map(String::from));
        out.extend(self.rows.iter().map(FlatRow::to_record));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment {
            id: "Ugx1".to_string(),
            author: "alice".to_string(),
            text: "first!".to_string(),
            published_at: "2024-01-02T03:04:05Z".to_string(),
            like_count: 7,
            reply_count: 1,
        }
    }

    fn reply() -> Reply {
        Reply {
            author: "bob".to_string(),
            text: "second".to_string(),
            published_at: "2024-01-03T00:00:00Z".to_string(),
            updated_at: "2024-01-04T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn comment_row_fills_first_five_cells() {
        let record = FlatRow::from(comment()).to_record();
        assert_eq!(record[0], "alice");
        assert_eq!(record[3], "7");
        assert_eq!(record[4], "1");
        assert!(record[5..].iter().all(String::is_empty));
    }

    #[test]
    fn reply_row_fills_last_four_cells() {
        let record = FlatRow::from(reply()).to_record();
        assert!(record[..5].iter().all(String::is_empty));
        assert_eq!(record[5], "bob");
        assert_eq!(record[8], "2024-01-04T00:00:00Z");
    }

    #[test]
    fn records_start_with_header() {
        let mut table = CommentTable::new(VideoId::new("dQw4w9WgXcQ").unwrap());
        table.rows.push(comment().into());
        table.rows.push(reply().into());

        let records = table.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0][0], "Name");
        assert_eq!(records[0][4], "Reply Count");
        assert_eq!(table.comment_count(), 1);
        assert_eq!(table.reply_count(), 1);
    }

    #[test]
    fn empty_token_counts_as_last_page() {
        let page: Page<Reply> = Page {
            items: vec![],
            next_page_token: Some(String::new()),
        };
        assert!(page.is_last());
        assert_eq!(page.continuation(), None);
    }

    #[test]
    fn failed_fetch_reads_as_empty_page() {
        let fetch: PageFetch<Comment> = PageFetch::Failed(UpstreamFailure {
            status: 500,
            body: String::new(),
        });
        assert!(fetch.is_failed());
        assert_eq!(fetch.into_page_or_empty(), Page::empty());
    }
}
