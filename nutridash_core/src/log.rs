//! Append-only in-memory log of extraction records.
//!
//! Every appended record is also pushed onto an unbounded delivery queue so
//! live subscribers (the WebSocket hub) see it without polling the log.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::debug;

use crate::ExtractedRecord;

/// Receiving half of the delivery queue.
pub type DeliveryReceiver = mpsc::UnboundedReceiver<ExtractedRecord>;

struct Inner {
    records: RwLock<VecDeque<ExtractedRecord>>,
    /// Zero means unbounded.
    capacity: usize,
    appended: AtomicU64,
    delivery: mpsc::UnboundedSender<ExtractedRecord>,
    delivery_closed: AtomicBool,
}

/// Shared handle to the record log. Cloning is cheap.
#[derive(Clone)]
pub struct RecordLog {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RecordLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLog")
            .field("len", &self.len())
            .field("capacity", &self.inner.capacity)
            .field("total_appended", &self.total_appended())
            .finish()
    }
}

impl RecordLog {
    /// Create an unbounded log and its delivery queue.
    #[must_use]
    pub fn unbounded() -> (Self, DeliveryReceiver) {
        Self::with_capacity(0)
    }

    /// Create a log that retains at most `capacity` records (`0` keeps
    /// everything) and its delivery queue.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> (Self, DeliveryReceiver) {
        let (delivery, rx) = mpsc::unbounded_channel();
        let log = Self {
            inner: Arc::new(Inner {
                records: RwLock::new(VecDeque::new()),
                capacity,
                appended: AtomicU64::new(0),
                delivery,
                delivery_closed: AtomicBool::new(false),
            }),
        };
        (log, rx)
    }

    /// A log with no live subscribers. The delivery queue is closed from
    /// the start, so appended records are only retained in the log.
    #[must_use]
    pub fn detached(capacity: usize) -> Self {
        let (log, _) = Self::with_capacity(capacity);
        log
    }

    /// Whether a delivery receiver is still attached.
    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        !self.inner.delivery.is_closed()
    }

    /// Append a record and publish it to the delivery queue.
    pub fn append(&self, record: ExtractedRecord) {
        {
            let mut records = self
                .inner
                .records
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if self.inner.capacity > 0 && records.len() >= self.inner.capacity {
                records.pop_front();
            }
            records.push_back(record.clone());
            self.inner.appended.fetch_add(1, Ordering::SeqCst);
        }

        if self.inner.delivery.send(record).is_err()
            && !self.inner.delivery_closed.swap(true, Ordering::Relaxed)
        {
            debug!("Delivery queue has no receiver, records are only kept in the log");
        }
    }

    /// Copy of all retained records, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ExtractedRecord> {
        self.read(|records| records.iter().cloned().collect())
    }

    /// The `n` most recent records, newest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<ExtractedRecord> {
        self.read(|records| records.iter().rev().take(n).cloned().collect())
    }

    /// Number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read(VecDeque::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records ever appended. Never decreases.
    #[must_use]
    pub fn total_appended(&self) -> u64 {
        self.inner.appended.load(Ordering::SeqCst)
    }

    fn read<T>(&self, f: impl FnOnce(&VecDeque<ExtractedRecord>) -> T) -> T {
        let records = self
            .inner
            .records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Extractor;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn record(text: &str) -> ExtractedRecord {
        Extractor::with_defaults()
            .expect("default patterns should compile")
            .extract_text(text)
    }

    #[test]
    fn test_append_keeps_order() {
        let (log, _rx) = RecordLog::unbounded();
        log.append(record("first"));
        log.append(record("second"));

        let texts: Vec<_> = log.snapshot().into_iter().map(|r| r.raw_message).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.total_appended(), 2);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let (log, _rx) = RecordLog::unbounded();
        for text in ["a", "b", "c"] {
            log.append(record(text));
        }
        let texts: Vec<_> = log.recent(2).into_iter().map(|r| r.raw_message).collect();
        assert_eq!(texts, vec!["c", "b"]);
    }

    #[test]
    fn test_length_never_decreases() {
        let (log, _rx) = RecordLog::unbounded();
        let mut last = 0;
        for i in 0..50 {
            log.append(record(&format!("message {i}")));
            let total = log.total_appended();
            assert!(total > last);
            assert_eq!(log.len() as u64, total);
            last = total;
        }
    }

    #[test]
    fn test_capacity_drops_oldest_but_total_keeps_counting() {
        let (log, _rx) = RecordLog::with_capacity(2);
        for text in ["a", "b", "c"] {
            log.append(record(text));
        }
        let texts: Vec<_> = log.snapshot().into_iter().map(|r| r.raw_message).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert_eq!(log.total_appended(), 3);
    }

    #[tokio::test]
    async fn test_append_publishes_to_delivery_queue() {
        let (log, mut rx) = RecordLog::unbounded();
        let rec = record("I have an apple, 95 calories");
        log.append(rec.clone());
        assert_eq!(rx.recv().await, Some(rec));
    }

    #[test]
    fn test_append_survives_dropped_receiver() {
        let (log, rx) = RecordLog::unbounded();
        drop(rx);
        log.append(record("nobody listening"));
        log.append(record("still nobody"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_detached_log_queues_nothing() {
        let log = RecordLog::detached(1);
        assert!(!log.has_subscriber());

        for i in 0..1000 {
            log.append(record(&format!("I have a snack {i}")));
        }
        assert_eq!(log.len(), 1);
        assert_eq!(log.total_appended(), 1000);
        assert!(!log.has_subscriber());
    }

    #[test]
    fn test_held_receiver_accumulates_until_drained() {
        let (log, mut rx) = RecordLog::with_capacity(1);
        assert!(log.has_subscriber());
        for text in ["a", "b", "c"] {
            log.append(record(text));
        }
        assert_eq!(log.len(), 1);
        assert_eq!(rx.len(), 3);

        while rx.try_recv().is_ok() {}
        assert!(rx.is_empty());
        drop(rx);
        assert!(!log.has_subscriber());
    }

    #[test]
    fn test_concurrent_appends() {
        let (log, _rx) = RecordLog::unbounded();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        log.append(record(&format!("thread {t} message {i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().is_ok());
        }
        assert_eq!(log.total_appended(), 100);
        assert_eq!(log.len(), 100);
    }
}
