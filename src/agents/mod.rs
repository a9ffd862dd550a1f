//! Agent System
//!
//! The two steps between an uploaded file and an answer:
//!
//! - **File Upload Agent**: extracts plain text from PDFs and spreadsheets
//! - **Reply Agent**: chunks the text and queries the model once per chunk
//!
//! ## Pipeline Overview
//!
//! ```text
//! Uploaded file
//!      │
//!      ▼
//! ┌─────────────┐
//! │ File Upload │  → Document context (plain text)
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Chunker   │  → Ordered chunks
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Reply     │  → One model call per chunk (sequential),
//! │   Agent     │    replies joined with spaces
//! └─────────────┘
//!      │
//!      ▼
//!  Chat transcript
//! ```

pub mod file_upload;
pub mod reply;

pub use file_upload::FileUploadAgent;
pub use reply::{Reply, ReplyAgent, ReplyMode};
