//! Admission-side atomic counters: the `BackpressureController` that gates
//! how many requests are in flight, and the read-only snapshot external
//! collaborators can expose as a diagnostics route or Prometheus exporter.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
// (none)

struct Counters {
    queued: AtomicUsize,
    rejected: AtomicUsize,
    total: AtomicUsize,
    successful: AtomicUsize,
    error: AtomicUsize,
    current_ccu: AtomicUsize,
}

/// Gates admission at `normal_capacity` and tracks the counters the spec's
/// invariants 5-7 are stated over.
///
/// Cheap to clone: every clone shares the same atomics.
#[derive(Clone)]
pub struct BackpressureController {
    normal_capacity: usize,
    queue_capacity: usize,
    workers: usize,
    counters: Arc<Counters>,
}

/// RAII handle returned by [`BackpressureController::try_acquire`]; dropping
/// it releases the `current_ccu` slot it holds.
pub struct CapacitySlot {
    controller: BackpressureController,
}

impl Drop for CapacitySlot {
    fn drop(&mut self) {
        self.controller.counters.current_ccu.fetch_sub(1, Ordering::SeqCst);
    }
}

impl BackpressureController {
    /// Create a controller sized to `normal_capacity`, reporting `workers`
    /// and `queue_capacity` in its snapshot.
    pub fn new(normal_capacity: usize, workers: usize, queue_capacity: usize) -> Self {
        Self {
            normal_capacity,
            queue_capacity,
            workers,
            counters: Arc::new(Counters {
                queued: AtomicUsize::new(0),
                rejected: AtomicUsize::new(0),
                total: AtomicUsize::new(0),
                successful: AtomicUsize::new(0),
                error: AtomicUsize::new(0),
                current_ccu: AtomicUsize::new(0),
            }),
        }
    }

    /// Attempt to acquire one of `normal_capacity` admission slots.
    /// Non-blocking: returns `None` immediately if the server is already at
    /// `normal_capacity`.
    pub fn try_acquire(&self) -> Option<CapacitySlot> {
        loop {
            let current = self.counters.current_ccu.load(Ordering::SeqCst);
            if current >= self.normal_capacity {
                self.counters.rejected.fetch_add(1, Ordering::SeqCst);
                return None;
            }
            if self
                .counters
                .current_ccu
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return Some(CapacitySlot { controller: self.clone() });
            }
        }
    }

    /// Record that a request entered the admission queue.
    pub fn record_queued(&self) {
        self.counters.queued.fetch_add(1, Ordering::SeqCst);
    }

    /// Record that a request left the admission queue (picked up by a
    /// worker, or rejected after queueing).
    pub fn record_dequeued(&self) {
        self.counters.queued.fetch_sub(1, Ordering::SeqCst);
    }

    /// Record rejection at the queue-full admission step (distinct from the
    /// capacity-exceeded rejection `try_acquire` already counted).
    pub fn record_queue_full_rejection(&self) {
        self.counters.rejected.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a completed request, classifying its status into the
    /// `successful` (2xx) or `error` (5xx) counter.
    pub fn record_completed(&self, status_is_success: bool) {
        self.counters.total.fetch_add(1, Ordering::SeqCst);
        if status_is_success {
            self.counters.successful.fetch_add(1, Ordering::SeqCst);
        } else {
            self.counters.error.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Current number of requests buffered in the admission queue.
    pub fn queued(&self) -> usize {
        self.counters.queued.load(Ordering::SeqCst)
    }

    /// Current number of admitted-but-not-yet-completed requests.
    pub fn current_ccu(&self) -> usize {
        self.counters.current_ccu.load(Ordering::SeqCst)
    }

    /// Snapshot every counter into a `Serialize`-able struct.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let queued = self.queued();
        let current_ccu = self.current_ccu();
        MetricsSnapshot {
            queued_requests: queued,
            rejected_requests: self.counters.rejected.load(Ordering::SeqCst),
            queue_capacity: self.queue_capacity,
            workers: self.workers,
            queue_utilization: utilization(queued, self.queue_capacity),
            normal_ccu: self.normal_capacity,
            current_ccu,
            ccu_utilization: utilization(current_ccu, self.normal_capacity),
            total_requests: self.counters.total.load(Ordering::SeqCst),
            successful_requests: self.counters.successful.load(Ordering::SeqCst),
            error_requests: self.counters.error.load(Ordering::SeqCst),
        }
    }
}

fn utilization(value: usize, capacity: usize) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    (value as f64 / capacity as f64).min(1.0)
}

/// Read-only snapshot of the admission-path counters.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSnapshot {
    pub queued_requests: usize,
    pub rejected_requests: usize,
    pub queue_capacity: usize,
    pub workers: usize,
    pub queue_utilization: f64,
    pub normal_ccu: usize,
    pub current_ccu: usize,
    pub ccu_utilization: f64,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub error_requests: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_acquire_respects_normal_capacity() {
        let controller = BackpressureController::new(2, 50, 100);
        let a = controller.try_acquire().unwrap();
        let b = controller.try_acquire().unwrap();
        assert!(controller.try_acquire().is_none());
        drop(a);
        assert!(controller.try_acquire().is_some());
        drop(b);
    }

    #[test]
    fn dropping_a_slot_releases_capacity() {
        let controller = BackpressureController::new(1, 50, 100);
        {
            let _slot = controller.try_acquire().unwrap();
            assert_eq!(controller.current_ccu(), 1);
        }
        assert_eq!(controller.current_ccu(), 0);
    }

    #[test]
    fn snapshot_reports_utilization() {
        let controller = BackpressureController::new(4, 50, 100);
        let _slot = controller.try_acquire().unwrap();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.current_ccu, 1);
        assert_eq!(snapshot.ccu_utilization, 0.25);
    }

    #[test]
    fn completed_requests_classify_by_status() {
        let controller = BackpressureController::new(4, 50, 100);
        controller.record_completed(true);
        controller.record_completed(false);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.successful_requests, 1);
        assert_eq!(snapshot.error_requests, 1);
    }

    #[test]
    fn rejections_increment_monotonically() {
        let controller = BackpressureController::new(1, 50, 100);
        let _slot = controller.try_acquire().unwrap();
        controller.try_acquire();
        controller.try_acquire();
        assert_eq!(controller.snapshot().rejected_requests, 2);
    }
}
