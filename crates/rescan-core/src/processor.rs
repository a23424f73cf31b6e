//! Dispatch seam between triggers and the downstream rescan pipeline.
//!
//! # Design
//! - Triggers hold an `Arc<dyn ScanProcessor>` and never see the concrete
//!   downstream type.
//! - Implementations must tolerate concurrent calls; the bound is `Send + Sync`.
//! - [`ScanQueue`] forwards requests to a consumer task without batching,
//!   deduplication or retries.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::CoreError;
use crate::model::ScanRequest;

/// Downstream capability that accepts scan requests.
#[async_trait]
pub trait ScanProcessor: Send + Sync {
    /// Accept ownership of `scan`; an error means the scan was not taken.
    async fn process(&self, scan: ScanRequest) -> anyhow::Result<()>;
}

/// Adapts a plain closure into a [`ScanProcessor`].
#[derive(Clone)]
pub struct ProcessorFn<F> {
    func: F,
}

impl<F> ProcessorFn<F>
where
    F: Fn(ScanRequest) -> anyhow::Result<()> + Send + Sync,
{
    /// Wrap `func`.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> ScanProcessor for ProcessorFn<F>
where
    F: Fn(ScanRequest) -> anyhow::Result<()> + Send + Sync,
{
    async fn process(&self, scan: ScanRequest) -> anyhow::Result<()> {
        (self.func)(scan)
    }
}

/// Receiving half of a [`ScanQueue`].
pub type ScanReceiver = mpsc::UnboundedReceiver<ScanRequest>;

/// Processor that hands scans to a consumer task over a channel.
#[derive(Clone, Debug)]
pub struct ScanQueue {
    sender: mpsc::UnboundedSender<ScanRequest>,
}

impl ScanQueue {
    /// Create a queue and the receiver its consumer drains.
    #[must_use]
    pub fn new() -> (Self, ScanReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ScanProcessor for ScanQueue {
    async fn process(&self, scan: ScanRequest) -> anyhow::Result<()> {
        let folder = scan.folder.clone();
        self.sender
            .send(scan)
            .map_err(|_| CoreError::QueueClosed {
                folder: folder.clone(),
            })?;
        debug!(folder = %folder, "scan queued");
        Ok(())
    }
}
