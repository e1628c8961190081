//! Generation DTOs - requests, transient batch results, and run reports

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ports::outbound::WriteResult;
use crate::domain::entities::{ItemRecord, ItemType};
use crate::domain::value_objects::{Preset, RunId};

/// A request to generate `count` items of one type
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub item_type: ItemType,
    pub count: usize,
    pub preset: Preset,
}

impl GenerationRequest {
    pub fn new(item_type: ItemType, count: usize, preset: Preset) -> Self {
        Self {
            item_type,
            count,
            preset,
        }
    }
}

/// Items accepted by the orchestrator for one request.
///
/// Never persisted; consumed by the catalog writer.
#[derive(Debug, Clone, Default)]
pub struct GenerationBatchResult {
    pub requested: usize,
    pub items: Vec<ItemRecord>,
    /// Items proposed or asked for but not accepted: malformed responses,
    /// abandoned batches, missing required fields, duplicate ids
    pub rejected: usize,
    pub batches_attempted: usize,
    pub cancelled: bool,
}

impl GenerationBatchResult {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Default::default()
        }
    }

    pub fn accepted(&self) -> usize {
        self.items.len()
    }

    pub fn remaining(&self) -> usize {
        self.requested.saturating_sub(self.items.len())
    }

    pub fn status(&self) -> RunStatus {
        if self.cancelled {
            RunStatus::Cancelled
        } else if self.items.is_empty() && self.requested > 0 {
            RunStatus::NoItemsAccepted
        } else if self.remaining() == 0 {
            RunStatus::FullSuccess
        } else {
            RunStatus::PartialSuccess
        }
    }
}

/// Terminal status of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    FullSuccess,
    PartialSuccess,
    NoItemsAccepted,
    Cancelled,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FullSuccess => "full success",
            Self::PartialSuccess => "partial success",
            Self::NoItemsAccepted => "no items accepted",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// What a finished run reports back to its caller
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: RunId,
    pub item_type: String,
    pub requested: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub batches_attempted: usize,
    pub status: RunStatus,
    /// Items parked by an earlier failed write and merged by this run
    pub recovered: usize,
    /// `None` when nothing was written
    pub write: Option<WriteResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl GenerationReport {
    pub fn from_result(
        run_id: RunId,
        item_type: ItemType,
        result: &GenerationBatchResult,
        recovered: usize,
        write: Option<WriteResult>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            item_type: item_type.type_name().to_string(),
            requested: result.requested,
            accepted: result.accepted(),
            rejected: result.rejected,
            batches_attempted: result.batches_attempted,
            status: result.status(),
            recovered,
            write,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
