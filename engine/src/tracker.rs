//! Per-paragraph visibility observation.
//!
//! The tracker maps element handles to paragraph keys and turns raw
//! intersection ratios into enter/leave transitions. It never touches the
//! timer table itself; the controller applies the emitted transitions.

use std::collections::{HashMap, HashSet};

use lector_types::{ElementId, ParagraphKey, TimerTransition, VisibilityEdge};

use crate::intersection::{IntersectionConfig, IntersectionEntry};

/// A paragraph counts as visible when at least this fraction of its rows is
/// inside the viewport.
pub const PARAGRAPH_VISIBILITY_THRESHOLD: f64 = 0.75;

/// Observes registered paragraph elements and emits visibility transitions.
#[derive(Debug)]
pub struct VisibilityTracker {
    config: IntersectionConfig,
    registry: HashMap<ElementId, ParagraphKey>,
    intersecting: HashSet<ElementId>,
}

impl VisibilityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: IntersectionConfig::new_unchecked(PARAGRAPH_VISIBILITY_THRESHOLD, 0),
            registry: HashMap::new(),
            intersecting: HashSet::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> IntersectionConfig {
        self.config
    }

    /// Register `element` as the rendered block for `key`.
    ///
    /// Idempotent: re-attaching an already-observed element updates the key
    /// mapping and keeps its intersecting state.
    pub fn attach(&mut self, element: ElementId, key: ParagraphKey) {
        self.registry.insert(element, key);
    }

    /// Stop observing `element`. No-op for unknown elements.
    ///
    /// If the element was intersecting, a synthetic leave is returned so the
    /// open interval can be flushed.
    pub fn detach(&mut self, element: ElementId) -> Option<TimerTransition> {
        let key = self.registry.remove(&element)?;
        if self.intersecting.remove(&element) {
            Some(TimerTransition::new(key, VisibilityEdge::Leave))
        } else {
            None
        }
    }

    /// Process one observation batch, emitting a transition for every element
    /// whose intersecting state changed. Entries for unregistered elements
    /// are ignored.
    pub fn observe(&mut self, entries: &[IntersectionEntry]) -> Vec<TimerTransition> {
        let mut transitions = Vec::new();
        for entry in entries {
            let Some(&key) = self.registry.get(&entry.element) else {
                continue;
            };

            let now_intersecting = self.config.intersects(entry.ratio);
            let was_intersecting = self.intersecting.contains(&entry.element);
            if now_intersecting == was_intersecting {
                continue;
            }

            if now_intersecting {
                self.intersecting.insert(entry.element);
                transitions.push(TimerTransition::new(key, VisibilityEdge::Enter));
            } else {
                self.intersecting.remove(&entry.element);
                transitions.push(TimerTransition::new(key, VisibilityEdge::Leave));
            }
        }
        transitions
    }

    /// Detach every element, flushing all open intervals. Teardown path.
    pub fn detach_all(&mut self) -> Vec<TimerTransition> {
        let mut transitions = Vec::new();
        for (element, key) in self.registry.drain() {
            if self.intersecting.remove(&element) {
                transitions.push(TimerTransition::new(key, VisibilityEdge::Leave));
            }
        }
        self.intersecting.clear();
        transitions
    }

    /// Number of currently observed elements.
    #[must_use]
    pub fn observed(&self) -> usize {
        self.registry.len()
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::VisibilityTracker;
    use crate::intersection::IntersectionEntry;
    use lector_types::{ArticleId, ElementId, ParagraphKey, VisibilityEdge};

    fn key(index: usize) -> ParagraphKey {
        ParagraphKey::new(ArticleId::generate(), index)
    }

    fn entry(element: ElementId, ratio: f64) -> IntersectionEntry {
        IntersectionEntry { element, ratio }
    }

    #[test]
    fn crossing_above_threshold_emits_enter() {
        let mut tracker = VisibilityTracker::new();
        let element = ElementId::new(1);
        let k = key(0);
        tracker.attach(element, k);

        let transitions = tracker.observe(&[entry(element, 0.8)]);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].key, k);
        assert_eq!(transitions[0].edge, VisibilityEdge::Enter);
    }

    #[test]
    fn staying_above_threshold_emits_nothing() {
        let mut tracker = VisibilityTracker::new();
        let element = ElementId::new(1);
        tracker.attach(element, key(0));

        tracker.observe(&[entry(element, 1.0)]);
        let transitions = tracker.observe(&[entry(element, 0.9)]);
        assert!(transitions.is_empty());
    }

    #[test]
    fn dropping_below_threshold_emits_leave() {
        let mut tracker = VisibilityTracker::new();
        let element = ElementId::new(1);
        let k = key(0);
        tracker.attach(element, k);

        tracker.observe(&[entry(element, 1.0)]);
        let transitions = tracker.observe(&[entry(element, 0.5)]);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].edge, VisibilityEdge::Leave);
    }

    #[test]
    fn partially_visible_below_threshold_is_not_active() {
        let mut tracker = VisibilityTracker::new();
        let element = ElementId::new(1);
        tracker.attach(element, key(0));

        let transitions = tracker.observe(&[entry(element, 0.74)]);
        assert!(transitions.is_empty());
    }

    #[test]
    fn batch_with_multiple_keys_emits_one_transition_each() {
        let mut tracker = VisibilityTracker::new();
        let (ea, eb) = (ElementId::new(1), ElementId::new(2));
        let (ka, kb) = (key(0), key(1));
        tracker.attach(ea, ka);
        tracker.attach(eb, kb);

        let transitions = tracker.observe(&[entry(ea, 1.0), entry(eb, 0.9)]);
        assert_eq!(transitions.len(), 2);
        assert!(transitions.iter().any(|t| t.key == ka));
        assert!(transitions.iter().any(|t| t.key == kb));
    }

    #[test]
    fn unregistered_elements_are_ignored() {
        let mut tracker = VisibilityTracker::new();
        let transitions = tracker.observe(&[entry(ElementId::new(99), 1.0)]);
        assert!(transitions.is_empty());
    }

    #[test]
    fn detach_of_never_attached_element_is_a_no_op() {
        let mut tracker = VisibilityTracker::new();
        assert!(tracker.detach(ElementId::new(99)).is_none());
        assert_eq!(tracker.observed(), 0);
    }

    #[test]
    fn double_attach_keeps_intersecting_state() {
        let mut tracker = VisibilityTracker::new();
        let element = ElementId::new(1);
        let k = key(0);
        tracker.attach(element, k);
        tracker.observe(&[entry(element, 1.0)]);

        tracker.attach(element, k);
        assert_eq!(tracker.observed(), 1);
        // Still intersecting: no duplicate enter.
        let transitions = tracker.observe(&[entry(element, 1.0)]);
        assert!(transitions.is_empty());
    }

    #[test]
    fn detach_while_intersecting_flushes_with_a_leave() {
        let mut tracker = VisibilityTracker::new();
        let element = ElementId::new(1);
        let k = key(0);
        tracker.attach(element, k);
        tracker.observe(&[entry(element, 1.0)]);

        let flush = tracker.detach(element).unwrap();
        assert_eq!(flush.key, k);
        assert_eq!(flush.edge, VisibilityEdge::Leave);
        assert_eq!(tracker.observed(), 0);
    }

    #[test]
    fn detach_all_flushes_only_intersecting_elements() {
        let mut tracker = VisibilityTracker::new();
        let (ea, eb) = (ElementId::new(1), ElementId::new(2));
        tracker.attach(ea, key(0));
        tracker.attach(eb, key(1));
        tracker.observe(&[entry(ea, 1.0), entry(eb, 0.1)]);

        let transitions = tracker.detach_all();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].edge, VisibilityEdge::Leave);
        assert_eq!(tracker.observed(), 0);
    }
}
