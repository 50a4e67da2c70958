use crate::core::detector::ChangeDetector;
use crate::domain::model::{RunSummary, SiteOutcome, Snapshot};
use crate::domain::ports::{ContentFetcher, Notifier, SnapshotStore};
use crate::utils::error::{ErrorCategory, Result};
use rand::Rng;
use std::time::Duration;

/// Random pause taken once before a pass starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolitenessDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for PolitenessDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}

impl PolitenessDelay {
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// 在 [min, max] 之間均勻取樣
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

pub struct SiteMonitor<F: ContentFetcher, S: SnapshotStore, N: Notifier> {
    fetcher: F,
    store: S,
    notifier: N,
    detector: ChangeDetector,
    delay: PolitenessDelay,
}

impl<F: ContentFetcher, S: SnapshotStore, N: Notifier> SiteMonitor<F, S, N> {
    pub fn new(fetcher: F, store: S, notifier: N) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            detector: ChangeDetector::default(),
            delay: PolitenessDelay::default(),
        }
    }

    pub fn with_detector(mut self, detector: ChangeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_delay(mut self, delay: PolitenessDelay) -> Self {
        self.delay = delay;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Runs one monitoring pass over `urls`, strictly in order.
    ///
    /// Unreachable sites are reported by email and skipped. A storage failure
    /// marks only that site as failed. Delivery and configuration errors abort
    /// the pass.
    pub async fn run(&self, urls: &[String], recipients: &[String]) -> Result<RunSummary> {
        let delay = self.delay.sample();
        if !delay.is_zero() {
            tracing::debug!("⏳ Waiting {:.2}s before starting", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }

        self.store.ensure_ready().await?;

        tracing::info!("🔍 Checking {} website(s)", urls.len());
        let mut summary = RunSummary::default();

        for url in urls {
            let outcome = match self.check_site(url, recipients).await {
                Ok(outcome) => outcome,
                Err(e) if e.category() == ErrorCategory::Storage => {
                    tracing::error!("❌ Snapshot storage failed for {}: {}", url, e);
                    SiteOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
                Err(e) => return Err(e),
            };
            summary.record(url, outcome);
        }

        tracing::info!(
            "✅ Pass finished: {} changed, {} unreachable, {} failed, {} total",
            summary.changed(),
            summary.unreachable(),
            summary.failed(),
            urls.len()
        );

        Ok(summary)
    }

    async fn check_site(&self, url: &str, recipients: &[String]) -> Result<SiteOutcome> {
        let text = match self.fetcher.fetch(url).await {
            Ok(text) => text,
            Err(failure) => {
                tracing::warn!("⚠️ {}", failure);
                self.notifier
                    .notify_unreachable(recipients, url, failure.status_code)
                    .await?;
                return Ok(SiteOutcome::Unreachable {
                    status_code: failure.status_code,
                });
            }
        };

        let key = self.store.key_for(url);
        let Some(previous) = self.store.load(&key).await? else {
            tracing::info!("📥 First snapshot for {}", url);
            self.store.save(&key, &Snapshot::new(url, text)).await?;
            return Ok(SiteOutcome::Baseline);
        };

        let report = self.detector.evaluate(&previous.text, &text);
        if !report.significant {
            tracing::debug!(
                "No significant change for {} ({} -> {} words)",
                url,
                report.old_word_count,
                report.new_word_count
            );
            return Ok(SiteOutcome::Unchanged);
        }

        tracing::info!(
            "🔔 The website {} has been updated ({} -> {} words)",
            url,
            report.old_word_count,
            report.new_word_count
        );
        self.notifier.notify_changed(recipients, url, &report).await?;
        self.store.save(&key, &Snapshot::new(url, text)).await?;

        Ok(SiteOutcome::Changed)
    }
}
