// src/lib.rs
//! Collects every comment and reply of a YouTube video through the Data API
//! and exports them as one flat spreadsheet.
pub mod error;
pub mod export;
pub mod models;
pub mod pagination;
pub mod service;
pub mod settings;
pub mod transport;
pub mod video_id;
pub mod youtube;

pub use error::TubeError;
pub use export::{ExportSummary, EXPORT_EXTENSION};
pub use models::{Comment, CommentTable, FlatRow, Page, PageFetch, Reply, Truncation, COLUMNS};
pub use pagination::{collect_comment_table, CollectOptions, FailurePolicy};
pub use service::{CommentService, VideoComments};
pub use settings::Settings;
pub use transport::{ApiResponse, ApiTransport, HttpTransport};
pub use video_id::{extract_video_id, VideoId};
pub use youtube::YouTubeClient;
