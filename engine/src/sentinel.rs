//! Scroll sentinel observation.
//!
//! A single marker element sits after the last rendered article; each time it
//! crosses into view the consumer should load more content. Crossing
//! detection is edge-triggered: staying visible emits nothing.

use lector_types::ElementId;

use crate::intersection::{IntersectionConfig, IntersectionEntry};

/// The sentinel counts as visible at a quarter of its rows.
pub const SENTINEL_VISIBILITY_THRESHOLD: f64 = 0.25;

/// Rows of early-trigger margin around the viewport, so loading starts
/// slightly before the sentinel is strictly visible.
pub const SENTINEL_MARGIN_ROWS: usize = 3;

/// Watches the loading sentinel and reports load-more crossings.
#[derive(Debug)]
pub struct SentinelWatcher {
    config: IntersectionConfig,
    observed: Option<ElementId>,
    intersecting: bool,
}

impl SentinelWatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: IntersectionConfig::new_unchecked(
                SENTINEL_VISIBILITY_THRESHOLD,
                SENTINEL_MARGIN_ROWS,
            ),
            observed: None,
            intersecting: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> IntersectionConfig {
        self.config
    }

    /// Begin observing `element`. Only one sentinel is observed at a time:
    /// attaching a different element detaches the previous one and resets
    /// crossing state. Re-attaching the current element is a no-op.
    pub fn attach(&mut self, element: ElementId) {
        if self.observed == Some(element) {
            return;
        }
        self.observed = Some(element);
        self.intersecting = false;
    }

    /// Stop observing `element`. No-op unless it is the observed sentinel.
    pub fn detach(&mut self, element: ElementId) {
        if self.observed == Some(element) {
            self.observed = None;
            self.intersecting = false;
        }
    }

    /// Process one observation batch; returns the number of crossings into
    /// view (one load-more each). Entries for other elements are ignored.
    pub fn observe(&mut self, entries: &[IntersectionEntry]) -> usize {
        let Some(observed) = self.observed else {
            return 0;
        };

        let mut crossings = 0;
        for entry in entries {
            if entry.element != observed {
                continue;
            }
            let now_intersecting = self.config.intersects(entry.ratio);
            if now_intersecting && !self.intersecting {
                crossings += 1;
            }
            self.intersecting = now_intersecting;
        }
        crossings
    }

    #[must_use]
    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed == Some(element)
    }
}

impl Default for SentinelWatcher {
    fn default() -> Self {
        Self::new()
    }
}
