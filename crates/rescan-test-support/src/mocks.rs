//! Fake processors that record what triggers dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use rescan_core::{ScanProcessor, ScanRequest};

/// Processor that accepts every scan and keeps a copy.
#[derive(Clone, Default)]
pub struct RecordingProcessor {
    scans: Arc<Mutex<Vec<ScanRequest>>>,
}

impl RecordingProcessor {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans received so far, in arrival order.
    #[must_use]
    pub fn scans(&self) -> Vec<ScanRequest> {
        self.scans
            .lock()
            .map(|scans| scans.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ScanProcessor for RecordingProcessor {
    async fn process(&self, scan: ScanRequest) -> anyhow::Result<()> {
        self.scans
            .lock()
            .map_err(|_| anyhow!("recording processor poisoned"))?
            .push(scan);
        Ok(())
    }
}

/// Processor that rejects every scan with a fixed message.
#[derive(Clone)]
pub struct FailingProcessor {
    message: &'static str,
    calls: Arc<AtomicUsize>,
}

impl FailingProcessor {
    /// Create a processor failing with `message`.
    #[must_use]
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of dispatch attempts observed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanProcessor for FailingProcessor {
    async fn process(&self, _scan: ScanRequest) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!(self.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixed_instant;

    fn scan() -> ScanRequest {
        ScanRequest {
            folder: "/mnt/a".into(),
            priority: 1,
            analyze: true,
            time: fixed_instant(),
        }
    }

    #[tokio::test]
    async fn recording_processor_keeps_scans() {
        let processor = RecordingProcessor::new();
        processor.process(scan()).await.unwrap();
        assert_eq!(processor.scans(), vec![scan()]);
    }

    #[tokio::test]
    async fn failing_processor_counts_attempts() {
        let processor = FailingProcessor::new("downstream unavailable");
        let err = processor.process(scan()).await.unwrap_err();
        assert_eq!(err.to_string(), "downstream unavailable");
        assert_eq!(processor.calls(), 1);
    }
}
