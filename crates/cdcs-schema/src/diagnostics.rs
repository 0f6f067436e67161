//! Reporting of columns whose native type is not in the classification table
//!
//! An unrecognized type is not an error: the column is still emitted as a
//! `string` field. The sink only observes it.

use crate::types::FieldDescriptor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Receiver for classification anomalies
pub trait DiagnosticSink: Send + Sync {
    /// Called with the raw native type and the descriptor that was produced for it
    fn unrecognized_type(&self, raw_type: &str, field: &FieldDescriptor);
}

/// Emits a `tracing` warning per anomaly
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn unrecognized_type(&self, raw_type: &str, field: &FieldDescriptor) {
        tracing::warn!(
            field = %field.name,
            native_type = %raw_type,
            real_type = %field.native_type,
            logical_type = %field.logical_type,
            length = field.length,
            "Unknown column type, treating it as string"
        );
    }
}

/// Discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn unrecognized_type(&self, _raw_type: &str, _field: &FieldDescriptor) {}
}

/// One reported anomaly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedType {
    pub raw_type: String,
    pub field: FieldDescriptor,
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<UnrecognizedType>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far
    pub fn events(&self) -> Vec<UnrecognizedType> {
        self.lock().clone()
    }

    /// Remove and return the reports received so far
    pub fn take(&self) -> Vec<UnrecognizedType> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<UnrecognizedType>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for RecordingSink {
    fn unrecognized_type(&self, raw_type: &str, field: &FieldDescriptor) {
        self.lock().push(UnrecognizedType {
            raw_type: raw_type.to_string(),
            field: field.clone(),
        });
    }
}

/// Counts reports and forwards them to another sink
pub struct CountingSink<'a> {
    inner: &'a dyn DiagnosticSink,
    count: AtomicUsize,
}

impl<'a> CountingSink<'a> {
    pub fn new(inner: &'a dyn DiagnosticSink) -> Self {
        Self {
            inner,
            count: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for CountingSink<'_> {
    fn unrecognized_type(&self, raw_type: &str, field: &FieldDescriptor) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.inner.unrecognized_type(raw_type, field);
    }
}
