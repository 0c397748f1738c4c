//! Prometheus-compatible operation metrics for flagbase.
//!
//! Tracks per-resource, per-operation request counters and an error counter
//! using lock-free `AtomicU64` fields. Both transports record into the same
//! [`OperationMetrics`]; the HTTP `/metrics` endpoint renders it with
//! [`OperationMetrics::to_prometheus`].

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Resource kinds served by flagbase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Item,
    Feature,
}

impl Resource {
    fn label(self) -> &'static str {
        match self {
            Resource::Item => "item",
            Resource::Feature => "feature",
        }
    }
}

/// The five CRUD operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl Operation {
    const ALL: [Operation; 5] = [
        Operation::Create,
        Operation::Get,
        Operation::List,
        Operation::Update,
        Operation::Delete,
    ];

    fn label(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Lock-free operation counters shared by the HTTP and gRPC transports.
pub struct OperationMetrics {
    item_ops: [AtomicU64; 5],
    feature_ops: [AtomicU64; 5],
    error_count: AtomicU64,
    start_time: Instant,
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationMetrics {
    pub fn new() -> Self {
        Self {
            item_ops: Default::default(),
            feature_ops: Default::default(),
            error_count: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Count one request, successful or not.
    #[inline]
    pub fn record(&self, resource: Resource, op: Operation) {
        self.counter(resource, op).fetch_add(1, Ordering::Relaxed);
    }

    /// Count one failed request.
    #[inline]
    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, resource: Resource, op: Operation) -> u64 {
        self.counter(resource, op).load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    fn counter(&self, resource: Resource, op: Operation) -> &AtomicU64 {
        let slot = op as usize;
        match resource {
            Resource::Item => &self.item_ops[slot],
            Resource::Feature => &self.feature_ops[slot],
        }
    }

    /// Render all counters in Prometheus text exposition format.
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();

        out.push_str("# HELP flagbase_requests_total Requests handled, by resource and operation.\n");
        out.push_str("# TYPE flagbase_requests_total counter\n");
        for resource in [Resource::Item, Resource::Feature] {
            for op in Operation::ALL {
                let _ = writeln!(
                    out,
                    "flagbase_requests_total{{resource=\"{}\",op=\"{}\"}} {}",
                    resource.label(),
                    op.label(),
                    self.count(resource, op)
                );
            }
        }

        out.push_str("# HELP flagbase_errors_total Requests that ended in an error status.\n");
        out.push_str("# TYPE flagbase_errors_total counter\n");
        let _ = writeln!(out, "flagbase_errors_total {}", self.errors());

        out.push_str("# HELP flagbase_uptime_seconds Seconds since the process started.\n");
        out.push_str("# TYPE flagbase_uptime_seconds gauge\n");
        let _ = writeln!(
            out,
            "flagbase_uptime_seconds {}",
            self.start_time.elapsed().as_secs()
        );

        out
    }
}
