//! Posting and company snapshots plus the directory collaborator.
//!
//! Reports denormalize the posting and company at generation time, so the
//! structs here are value snapshots rather than live storage handles. The
//! actual posting store lives outside this crate behind [`PostingDirectory`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingId(pub i64);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a posting as tracked by the recruitment platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingStage {
    Draft,
    Published,
    InProcess,
    Closed,
    Archived,
}

impl PostingStage {
    pub fn label(&self) -> &'static str {
        match self {
            PostingStage::Draft => "draft",
            PostingStage::Published => "published",
            PostingStage::InProcess => "in process",
            PostingStage::Closed => "closed",
            PostingStage::Archived => "archived",
        }
    }

    /// Ranking reports are only meaningful once candidates are being
    /// evaluated, so reporting is limited to these two stages.
    pub fn allows_reporting(&self) -> bool {
        matches!(self, PostingStage::InProcess | PostingStage::Closed)
    }
}

/// Posting fields frozen into a report at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingSnapshot {
    pub id: PostingId,
    pub title: String,
    pub stage: PostingStage,
    pub location: String,
    pub required_skills: Vec<String>,
    pub description: String,
}

/// Company fields frozen into a report at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub name: String,
    pub industry: String,
    pub contact_email: String,
}

/// A posting together with its owning company, as returned by the directory.
#[derive(Debug, Clone)]
pub struct PostingRecord {
    pub posting: PostingSnapshot,
    pub company: CompanySnapshot,
}

/// Read access to the posting store, which lives outside this crate.
pub trait PostingDirectory: Send + Sync {
    fn posting(&self, id: PostingId) -> Result<Option<PostingRecord>, DirectoryError>;
}

/// Error raised by the posting directory collaborator.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("posting directory unavailable: {0}")]
    Unavailable(String),
}
