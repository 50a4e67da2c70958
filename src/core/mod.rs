pub mod detector;
pub mod diff;
pub mod keywords;
pub mod monitor;
pub mod notification;

pub use crate::domain::model::{ChangeReport, ChangeSpan, KeywordCounts, Snapshot};
pub use crate::domain::ports::{ContentFetcher, Notifier, SnapshotStore};
pub use crate::utils::error::Result;
