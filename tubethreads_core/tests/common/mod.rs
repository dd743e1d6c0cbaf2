#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tubethreads_core::{ApiResponse, ApiTransport, TubeError, YouTubeClient};

pub const VIDEO: &str = "dQw4w9WgXcQ";
pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

enum Scripted {
    Respond(ApiResponse, Option<Duration>),
    Disconnect,
}

/// In-memory transport answering from a fixed script.
///
/// Requests are keyed by `endpoint`, the subject (`videoId`, `parentId` or
/// `id`) and the page token; anything unscripted panics so stray fetches
/// fail the test.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

fn key(endpoint: &str, subject: &str, token: Option<&str>) -> String {
    format!("{}|{}|{}", endpoint, subject, token.unwrap_or(""))
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, endpoint: &str, subject: &str, token: Option<&str>, status: u16, body: Value) -> Self {
        self.routes.insert(
            key(endpoint, subject, token),
            Scripted::Respond(ApiResponse::new(status, body), None),
        );
        self
    }

    pub fn respond_slowly(
        mut self,
        endpoint: &str,
        subject: &str,
        token: Option<&str>,
        body: Value,
        delay: Duration,
    ) -> Self {
        self.routes.insert(
            key(endpoint, subject, token),
            Scripted::Respond(ApiResponse::new(200, body), Some(delay)),
        );
        self
    }

    pub fn disconnect(mut self, endpoint: &str, subject: &str, token: Option<&str>) -> Self {
        self.routes
            .insert(key(endpoint, subject, token), Scripted::Disconnect);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Sorted query parameters of every request sent to `endpoint`, in call order.
    pub fn params_sent_to(&self, endpoint: &str) -> Vec<Vec<(String, String)>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        let prefix = format!("{}|", endpoint);
        self.calls().iter().filter(|c| c.starts_with(&prefix)).count()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<ApiResponse, TubeError> {
        let lookup = |name: &str| {
            params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
        };
        let subject = lookup("videoId")
            .or_else(|| lookup("parentId"))
            .or_else(|| lookup("id"))
            .unwrap_or("");
        let k = key(endpoint, subject, lookup("pageToken"));
        self.calls.lock().unwrap().push(k.clone());
        let mut sent: Vec<(String, String)> = params
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        sent.sort();
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.to_string(), sent));

        match self.routes.get(&k) {
            Some(Scripted::Respond(resp, delay)) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(*delay).await;
                }
                Ok(resp.clone())
            }
            Some(Scripted::Disconnect) => Err(TubeError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
            None => panic!("unscripted request: {}", k),
        }
    }
}

pub fn client(transport: &Arc<ScriptedTransport>) -> YouTubeClient {
    YouTubeClient::new(transport.clone())
}

/// A `commentThreads` page. Each entry is `(comment id, total reply count)`.
pub fn comment_page(comments: &[(&str, u64)], next: Option<&str>) -> Value {
    let items: Vec<Value> = comments
        .iter()
        .map(|(id, replies)| {
            json!({
                "kind": "youtube#commentThread",
                "id": id,
                "snippet": {
                    "videoId": VIDEO,
                    "totalReplyCount": replies,
                    "topLevelComment": {
                        "id": id,
                        "snippet": {
                            "authorDisplayName": format!("author of {}", id),
                            "textDisplay": format!("text of {}", id),
                            "publishedAt": "2024-01-01T00:00:00Z",
                            "updatedAt": "2024-01-01T00:00:00Z",
                            "likeCount": 7
                        }
                    }
                }
            })
        })
        .collect();
    with_token(json!({ "kind": "youtube#commentThreadListResponse", "items": items }), next)
}

/// A `comments` page of replies to `parent`, named `<parent>.<n>`.
pub fn reply_page(parent: &str, names: &[&str], next: Option<&str>) -> Value {
    let items: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "kind": "youtube#comment",
                "id": format!("{}.{}", parent, name),
                "snippet": {
                    "authorDisplayName": format!("replier {}", name),
                    "textDisplay": format!("reply {}", name),
                    "parentId": parent,
                    "publishedAt": "2024-01-02T00:00:00Z",
                    "updatedAt": "2024-01-03T00:00:00Z",
                    "likeCount": 0
                }
            })
        })
        .collect();
    with_token(json!({ "kind": "youtube#commentListResponse", "items": items }), next)
}

pub fn video_page(title: &str) -> Value {
    json!({
        "kind": "youtube#videoListResponse",
        "items": [{ "id": VIDEO, "snippet": { "title": title, "channelId": "UCxyz" } }]
    })
}

pub fn empty_list() -> Value {
    json!({ "kind": "youtube#videoListResponse", "items": [] })
}

pub fn api_error(status: u16, reason: &str) -> Value {
    json!({ "error": { "code": status, "message": reason, "errors": [{ "reason": reason }] } })
}

/// Owned, sorted parameter list for comparing against [`ScriptedTransport::params_sent_to`].
pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    out.sort();
    out
}

fn with_token(mut body: Value, next: Option<&str>) -> Value {
    if let Some(token) = next {
        body["nextPageToken"] = json!(token);
    }
    body
}
