//! Core engine for Lector - feed state and visibility orchestration.
//!
//! This crate contains the App state machine without TUI dependencies. The
//! TUI publishes geometry (layout width, viewport rows, scroll position) and
//! the App turns it into intersection batches for the two watchers, applying
//! their events to the state it owns: the article vec and the timer table.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use lector_types::{Article, ElementId, ParagraphKey, TimerTable};

mod config;
mod feed;
mod intersection;
mod layout;
mod sentinel;
mod tracker;

pub use config::{AppConfig, ConfigError, LectorConfig, config_path};
pub use feed::ContentFeed;
pub use intersection::{
    IntersectionConfig, IntersectionEntry, InvalidThreshold, RowSpan, Viewport, intersection_ratio,
};
pub use layout::{BADGE_GUTTER_COLS, FeedLayout, FeedRow, ParagraphSpan};
pub use sentinel::{SENTINEL_MARGIN_ROWS, SENTINEL_VISIBILITY_THRESHOLD, SentinelWatcher};
pub use tracker::{PARAGRAPH_VISIBILITY_THRESHOLD, VisibilityTracker};

#[cfg(test)]
mod tests;

/// Display-refresh cadence when the config does not override it.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// UI options derived from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

/// Application state.
///
/// Owns the article sequence and the timer table exclusively; the watchers
/// only emit events, and all mutation funnels through [`App::observe`],
/// [`App::shutdown`] and the scroll methods.
pub struct App {
    feed: ContentFeed,
    articles: Vec<Article>,
    timers: TimerTable,
    tracker: VisibilityTracker,
    sentinel: SentinelWatcher,
    sentinel_element: ElementId,
    /// Registry of mounted paragraph elements, one per paragraph key.
    elements: HashMap<ParagraphKey, ElementId>,
    next_element: u64,
    /// Cached layout for `last_width`; dropped whenever the feed grows.
    layout: Option<FeedLayout>,
    last_width: u16,
    viewport_rows: usize,
    scroll_top: usize,
    tick: usize,
    tick_interval: Duration,
    ui_options: UiOptions,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(config: Option<LectorConfig>) -> Self {
        Self::with_feed(config, ContentFeed::new())
    }

    /// Build with an explicit feed, e.g. a seeded one for deterministic runs.
    #[must_use]
    pub fn with_feed(config: Option<LectorConfig>, feed: ContentFeed) -> Self {
        let app_config = config.as_ref().and_then(|cfg| cfg.app.as_ref());

        let tick_interval = match app_config.and_then(|app| app.tick_interval_ms) {
            Some(0) => {
                tracing::warn!("tick_interval_ms must be positive; using default");
                DEFAULT_TICK_INTERVAL
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TICK_INTERVAL,
        };

        let ui_options = UiOptions {
            ascii_only: app_config.is_some_and(|app| app.ascii_only),
            high_contrast: app_config.is_some_and(|app| app.high_contrast),
        };

        let mut next_element = 0u64;
        let sentinel_element = ElementId::new(next_element);
        next_element += 1;

        let mut sentinel = SentinelWatcher::new();
        sentinel.attach(sentinel_element);

        Self {
            feed,
            articles: Vec::new(),
            timers: TimerTable::new(),
            tracker: VisibilityTracker::new(),
            sentinel,
            sentinel_element,
            elements: HashMap::new(),
            next_element,
            layout: None,
            last_width: 0,
            viewport_rows: 0,
            scroll_top: 0,
            tick: 0,
            tick_interval,
            ui_options,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Display-refresh tick. Bumps the frame counter so spinners advance;
    /// elapsed times are always recomputed from timestamps at render, so the
    /// tick never touches timer records.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    #[must_use]
    pub fn timers(&self) -> &TimerTable {
        &self.timers
    }

    /// Number of paragraph elements currently observed.
    #[must_use]
    pub fn tracked_paragraphs(&self) -> usize {
        self.tracker.observed()
    }

    /// Number of paragraphs currently being read (open interval).
    #[must_use]
    pub fn reading_count(&self) -> usize {
        self.timers.active_count()
    }

    /// Rebuild the cached layout if `width` changed or the feed grew.
    pub fn ensure_layout(&mut self, width: u16) {
        let stale = self
            .layout
            .as_ref()
            .map_or(true, |layout| layout.width() != width);
        if stale {
            self.last_width = width;
            self.rebuild_layout();
        }
    }

    #[must_use]
    pub fn layout(&self) -> Option<&FeedLayout> {
        self.layout.as_ref()
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.clamp_scroll();
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport {
            top: self.scroll_top,
            rows: self.viewport_rows,
        }
    }

    #[must_use]
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_top = self.scroll_top.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_top = self.scroll_top.saturating_add(rows).min(self.scroll_max());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_rows());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_rows());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_top = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.scroll_max();
    }

    /// Jump to an absolute row offset, clamped to the scroll range.
    pub fn scroll_to(&mut self, top: usize) {
        self.scroll_top = top.min(self.scroll_max());
    }

    /// Deliver the current frame's intersection batch to both watchers and
    /// apply their events: timer transitions to the table, load-more
    /// crossings as article appends.
    ///
    /// No-op until a frame has published geometry (mount race tolerated).
    pub fn observe(&mut self, now: Instant) {
        if self.layout.is_none() {
            if self.last_width == 0 {
                return;
            }
            self.rebuild_layout();
        }
        if self.viewport_rows == 0 {
            return;
        }

        let viewport = self.viewport();
        let tracker_margin = self.tracker.config().margin_rows();
        let sentinel_margin = self.sentinel.config().margin_rows();

        let (entries, sentinel_entry) = {
            let Some(layout) = self.layout.as_ref() else {
                return;
            };
            let entries: Vec<IntersectionEntry> = layout
                .paragraphs()
                .iter()
                .map(|span| IntersectionEntry {
                    element: span.element,
                    ratio: intersection_ratio(span.span(), viewport, tracker_margin),
                })
                .collect();
            let sentinel_entry = IntersectionEntry {
                element: self.sentinel_element,
                ratio: intersection_ratio(layout.sentinel_span(), viewport, sentinel_margin),
            };
            (entries, sentinel_entry)
        };

        let transitions = self.tracker.observe(&entries);
        if !transitions.is_empty() {
            tracing::trace!(count = transitions.len(), "visibility transitions");
            self.timers.apply(&transitions, now);
        }

        let crossings = self.sentinel.observe(&[sentinel_entry]);
        for _ in 0..crossings {
            self.append_article();
        }
    }

    /// Teardown: detach every observed element, flushing open intervals, and
    /// release the sentinel.
    pub fn shutdown(&mut self, now: Instant) {
        let transitions = self.tracker.detach_all();
        self.timers.apply(&transitions, now);
        self.sentinel.detach(self.sentinel_element);
        tracing::debug!(flushed = transitions.len(), "observers released");
    }

    fn append_article(&mut self) {
        let article = self.feed.append();
        for index in 0..article.paragraphs().len() {
            let key = article.paragraph_key(index);
            let element = self.alloc_element();
            self.elements.insert(key, element);
            self.tracker.attach(element, key);
        }
        tracing::debug!(article = %article.id(), total = self.articles.len() + 1, "appended article");
        self.articles.push(article);
        self.layout = None;
    }

    fn alloc_element(&mut self) -> ElementId {
        let element = ElementId::new(self.next_element);
        self.next_element += 1;
        element
    }

    fn rebuild_layout(&mut self) {
        self.layout = Some(FeedLayout::build(
            &self.articles,
            &self.elements,
            self.last_width,
        ));
        self.clamp_scroll();
    }

    fn page_rows(&self) -> usize {
        self.viewport_rows.saturating_sub(1).max(1)
    }

    fn scroll_max(&self) -> usize {
        self.layout
            .as_ref()
            .map_or(0, |layout| layout.total_rows().saturating_sub(self.viewport_rows))
    }

    fn clamp_scroll(&mut self) {
        let max = self.scroll_max();
        if self.scroll_top > max {
            self.scroll_top = max;
        }
    }
}
