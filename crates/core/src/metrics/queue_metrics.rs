use crate::metrics::MetricsRegistry;
use prometheus::{GaugeVec, IntCounterVec, Opts};

/// Queue and worker counters/gauges, registered once per process.
///
/// Mirrors the monitor surface described for the work queue: depth,
/// in-progress count and DLQ depth per queue name, plus job outcome
/// counters by kind and terminal status.
#[derive(Clone)]
pub struct QueueMetrics {
    pub depth: GaugeVec,
    pub in_progress: GaugeVec,
    pub dlq_depth: GaugeVec,
    pub jobs_total: IntCounterVec,
}

impl QueueMetrics {
    pub fn register(registry: &MetricsRegistry) -> Result<Self, prometheus::Error> {
        let depth = GaugeVec::new(
            Opts::new("queue_depth", "Current pending job count"),
            &["queue"],
        )?;
        let in_progress = GaugeVec::new(
            Opts::new("queue_in_progress", "Jobs currently claimed by a worker"),
            &["queue"],
        )?;
        let dlq_depth = GaugeVec::new(
            Opts::new("queue_dlq_depth", "Jobs parked in the dead-letter set"),
            &["queue"],
        )?;
        let jobs_total = IntCounterVec::new(
            Opts::new("jobs_total", "Completed jobs by kind and outcome"),
            &["kind", "outcome"],
        )?;

        registry.register(depth.clone())?;
        registry.register(in_progress.clone())?;
        registry.register(dlq_depth.clone())?;
        registry.register(jobs_total.clone())?;

        Ok(Self {
            depth,
            in_progress,
            dlq_depth,
            jobs_total,
        })
    }

    /// True when any queue is over the advisory depth/DLQ warning thresholds.
    pub fn has_warnings(&self, depth_threshold: f64) -> bool {
        self.depth
            .with_label_values(&["default"])
            .get()
            > depth_threshold
            || self.dlq_depth.with_label_values(&["default"]).get() > 0.0
    }
}
