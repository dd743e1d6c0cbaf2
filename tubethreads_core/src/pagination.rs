//! Walks every comment page of a video, and every reply page of each comment
//! that has replies, into one ordered [`CommentTable`].
//!
//! Row order: each comment's row is followed directly by its replies, in the
//! order their pages were fetched, before the next comment's row.
//!
//! A loop only continues while the API hands back a non-empty continuation
//! token. The fetchers never invent one, so the walk ends either when the API
//! runs out of pages or when a request fails.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::TubeError;
use crate::models::{
    Comment, CommentTable, FlatRow, PageFetch, Reply, Truncation, TruncationScope, UpstreamFailure,
};
use crate::video_id::VideoId;
use crate::youtube::YouTubeClient;

/// What to do when a page request comes back non-200.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop that loop, keep what was collected and record a [`Truncation`].
    #[default]
    Truncate,
    /// Fail the whole run with [`TubeError::Upstream`].
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    pub failure_policy: FailurePolicy,
    /// Number of comments whose reply threads are fetched at once. `1` walks
    /// them strictly one after another.
    pub reply_concurrency: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Truncate,
            reply_concurrency: 1,
        }
    }
}

/// Replies gathered for one comment.
#[derive(Debug, Default)]
struct ReplyThread {
    replies: Vec<Reply>,
    truncation: Option<Truncation>,
}

/// Collect every comment and reply of a video into a flat table.
///
/// Transport errors (DNS, connect, timeout, bad JSON) always abort the run.
/// Non-200 answers follow `options.failure_policy`.
pub async fn collect_comment_table(
    client: &YouTubeClient,
    video_id: &VideoId,
    options: &CollectOptions,
) -> Result<CommentTable, TubeError> {
    let mut table = CommentTable::new(video_id.clone());
    let mut token: Option<String> = None;
    let mut page_index = 0usize;

    loop {
        let fetch = client
            .fetch_comment_page(video_id, token.as_deref())
            .await?;

        let page = match fetch {
            PageFetch::Page(page) => page,
            PageFetch::Failed(failure) => {
                let truncation = on_failure(
                    options.failure_policy,
                    TruncationScope::Comments,
                    page_index,
                    failure,
                )?;
                table.truncations.push(truncation);
                break;
            }
        };

        let next = page.continuation().map(str::to_string);
        append_comments(client, page.items, options, &mut table).await?;

        match next {
            Some(t) => {
                token = Some(t);
                page_index += 1;
            }
            None => break,
        }
    }

    info!(
        %video_id,
        comment_pages = page_index + 1,
        comments = table.comment_count(),
        replies = table.reply_count(),
        truncated = table.is_truncated(),
        "Collected comment table"
    );
    Ok(table)
}

async fn append_comments(
    client: &YouTubeClient,
    comments: Vec<Comment>,
    options: &CollectOptions,
    table: &mut CommentTable,
) -> Result<(), TubeError> {
    let policy = options.failure_policy;

    let threads: Vec<ReplyThread> = if options.reply_concurrency <= 1 {
        let mut threads = Vec::with_capacity(comments.len());
        for comment in &comments {
            threads.push(fetch_reply_thread(client, comment, policy).await?);
        }
        threads
    } else {
        // `buffered` yields results in input order, so rows line up with
        // their comments no matter which reply thread finishes first.
        stream::iter(
            comments
                .iter()
                .map(|comment| fetch_reply_thread(client, comment, policy)),
        )
        .buffered(options.reply_concurrency)
        .try_collect()
        .await?
    };

    for (comment, thread) in comments.into_iter().zip(threads) {
        table.rows.push(FlatRow::Comment(comment));
        table
            .rows
            .extend(thread.replies.into_iter().map(FlatRow::Reply));
        if let Some(truncation) = thread.truncation {
            table.truncations.push(truncation);
        }
    }
    Ok(())
}

/// Page through all replies of one comment.
///
/// A comment reporting zero replies is never fetched, even if the count is
/// stale and replies exist upstream.
async fn fetch_reply_thread(
    client: &YouTubeClient,
    comment: &Comment,
    policy: FailurePolicy,
) -> Result<ReplyThread, TubeError> {
    let mut thread = ReplyThread::default();
    if comment.reply_count == 0 {
        return Ok(thread);
    }

    let mut token: Option<String> = None;
    let mut page_index = 0usize;
    loop {
        match client
            .fetch_reply_page(&comment.id, token.as_deref())
            .await?
        {
            PageFetch::Page(page) => {
                let next = page.continuation().map(str::to_string);
                thread.replies.extend(page.items);
                match next {
                    Some(t) => {
                        token = Some(t);
                        page_index += 1;
                    }
                    None => break,
                }
            }
            PageFetch::Failed(failure) => {
                let scope = TruncationScope::Replies {
                    parent_id: comment.id.clone(),
                };
                thread.truncation = Some(on_failure(policy, scope, page_index, failure)?);
                break;
            }
        }
    }
    Ok(thread)
}

fn on_failure(
    policy: FailurePolicy,
    scope: TruncationScope,
    page_index: usize,
    failure: UpstreamFailure,
) -> Result<Truncation, TubeError> {
    match policy {
        FailurePolicy::Abort => Err(TubeError::Upstream {
            status: failure.status,
            body: failure.body,
        }),
        FailurePolicy::Truncate => {
            warn!(
                ?scope,
                page_index,
                status = failure.status,
                "Pagination truncated by upstream error"
            );
            Ok(Truncation {
                scope,
                page_index,
                status: failure.status,
            })
        }
    }
}
