pub mod files;

pub use files::*;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::calendar::{CalendarEntry, PlannedContent};
use crate::error::Result;

/// Trait for writing content plans
#[async_trait]
pub trait OutputWriter: Send + Sync {
    /// Write one planned post; returns the path written
    async fn write_planned(&self, planned: &PlannedContent) -> Result<PathBuf>;

    /// Write the calendar overview for a niche; returns the path written
    async fn write_calendar(&self, niche: &str, entries: &[CalendarEntry]) -> Result<PathBuf>;
}
