use crate::domain::model::{ChangeReport, Snapshot};
use crate::utils::error::{FetchFailure, Result};
use async_trait::async_trait;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// 取得網頁並回傳正規化後的可見文字
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchFailure>;
}

pub trait SnapshotStore: Send + Sync {
    fn key_for(&self, url: &str) -> String;
    fn ensure_ready(&self) -> impl std::future::Future<Output = Result<()>> + Send;
    fn load(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<Snapshot>>> + Send;
    fn save(
        &self,
        key: &str,
        snapshot: &Snapshot,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_unreachable(
        &self,
        recipients: &[String],
        url: &str,
        status_code: u16,
    ) -> Result<()>;

    async fn notify_changed(
        &self,
        recipients: &[String],
        url: &str,
        report: &ChangeReport,
    ) -> Result<()>;
}
