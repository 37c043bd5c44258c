//! Per-paragraph dwell timers.
//!
//! A [`TimerRecord`] accumulates how long its paragraph has been visible.
//! Records are owned centrally in a [`TimerTable`] keyed by [`ParagraphKey`]
//! and mutated only by applying [`TimerTransition`] batches; the display
//! layer queries elapsed time without mutating anything.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::ids::ParagraphKey;

/// A visibility threshold crossing for one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEdge {
    /// Paragraph crossed into view (above threshold).
    Enter,
    /// Paragraph crossed out of view (below threshold).
    Leave,
}

/// One timer update, emitted by the visibility tracker and applied by the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTransition {
    pub key: ParagraphKey,
    pub edge: VisibilityEdge,
}

impl TimerTransition {
    #[must_use]
    pub fn new(key: ParagraphKey, edge: VisibilityEdge) -> Self {
        Self { key, edge }
    }
}

/// Accumulated viewing time for one paragraph.
///
/// Invariant: `active_since` is `Some` exactly while the paragraph is
/// intersecting the viewport above its threshold. The open interval is not
/// folded into `accumulated` until the matching leave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerRecord {
    accumulated: Duration,
    active_since: Option<Instant>,
}

impl TimerRecord {
    /// Open an active interval at `now`.
    pub fn enter(&mut self, now: Instant) {
        self.active_since = Some(now);
    }

    /// Close the active interval at `now`, folding it into the total.
    ///
    /// No-op when no interval is open.
    pub fn leave(&mut self, now: Instant) {
        if let Some(since) = self.active_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    /// Total viewing time as of `now`. Pure: includes the open interval (if
    /// any) without closing it.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.active_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    /// Time from closed intervals only.
    #[must_use]
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }
}

/// All per-paragraph timers, keyed by paragraph.
///
/// Records are created lazily on first reference and never evicted; the feed
/// is append-only, so the table grows for the lifetime of the session.
#[derive(Debug, Default)]
pub struct TimerTable {
    records: HashMap<ParagraphKey, TimerRecord>,
}

impl TimerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a batch of transitions at `now`.
    ///
    /// Every transition is applied to its own key, in batch order; updates to
    /// different keys in the same batch are all preserved.
    pub fn apply(&mut self, transitions: &[TimerTransition], now: Instant) {
        for transition in transitions {
            let record = self.records.entry(transition.key).or_default();
            match transition.edge {
                VisibilityEdge::Enter => record.enter(now),
                VisibilityEdge::Leave => record.leave(now),
            }
        }
    }

    /// Snapshot of the record for `key` (zero/inactive if never referenced).
    #[must_use]
    pub fn record(&self, key: &ParagraphKey) -> TimerRecord {
        self.records.get(key).copied().unwrap_or_default()
    }

    /// Displayed elapsed time for `key` as of `now`. Pure.
    #[must_use]
    pub fn elapsed(&self, key: &ParagraphKey, now: Instant) -> Duration {
        self.record(key).elapsed(now)
    }

    #[must_use]
    pub fn is_active(&self, key: &ParagraphKey) -> bool {
        self.record(key).is_active()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of paragraphs with an open interval.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.records.values().filter(|r| r.is_active()).count()
    }
}
