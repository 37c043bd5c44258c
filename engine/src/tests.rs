//! Unit tests for the engine crate.

use std::time::{Duration, Instant};

use lector_types::PARAGRAPHS_PER_ARTICLE;

use super::{App, ContentFeed, ParagraphSpan};

fn test_app() -> App {
    App::with_feed(None, ContentFeed::seeded(5))
}

fn at(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}

fn mount(app: &mut App, width: u16, rows: usize) {
    app.set_viewport_rows(rows);
    app.ensure_layout(width);
}

/// Rebuild the layout after an append invalidated it (the TUI does this
/// every frame).
fn settle(app: &mut App) {
    app.ensure_layout(80);
}

fn paragraph_span(app: &App, index: usize) -> ParagraphSpan {
    app.layout().expect("layout built").paragraphs()[index]
}

#[test]
fn starts_empty() {
    let mut app = test_app();
    assert!(app.articles().is_empty());
    assert!(app.timers().is_empty());

    mount(&mut app, 80, 10);
    // Empty feed lays out as just the sentinel row.
    assert_eq!(app.layout().unwrap().total_rows(), 1);
}

#[test]
fn observe_before_mount_is_a_no_op() {
    let mut app = test_app();
    app.observe(Instant::now());
    assert!(app.articles().is_empty());
}

#[test]
fn observe_with_empty_viewport_is_a_no_op() {
    let mut app = test_app();
    app.ensure_layout(80);
    app.set_viewport_rows(0);
    app.observe(Instant::now());
    assert!(app.articles().is_empty());
}

#[test]
fn sentinel_crossing_appends_exactly_one_article() {
    let mut app = test_app();
    let base = Instant::now();

    mount(&mut app, 80, 10);
    app.observe(at(base, 0));

    assert_eq!(app.articles().len(), 1);
    assert_eq!(app.articles()[0].paragraphs().len(), PARAGRAPHS_PER_ARTICLE);
    // Every new paragraph was attached to the tracker.
    assert_eq!(app.tracked_paragraphs(), PARAGRAPHS_PER_ARTICLE);
}

#[test]
fn three_separated_crossings_grow_the_feed_to_three() {
    let mut app = test_app();
    let base = Instant::now();

    mount(&mut app, 80, 10);
    for round in 0..3u64 {
        settle(&mut app);
        app.scroll_to_top();
        app.observe(at(base, round * 1_000));
        settle(&mut app);
        app.scroll_to_bottom();
        app.observe(at(base, round * 1_000 + 500));
    }

    assert_eq!(app.articles().len(), 3);
    let ids: Vec<_> = app.articles().iter().map(|a| a.id()).collect();
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
    for article in app.articles() {
        assert_eq!(article.paragraphs().len(), PARAGRAPHS_PER_ARTICLE);
    }
}

#[test]
fn paragraph_dwell_time_accumulates_across_visits() {
    let mut app = test_app();
    let base = Instant::now();

    mount(&mut app, 80, 10);
    app.observe(at(base, 0));
    settle(&mut app);

    // The last paragraph is far below the mount viewport, so it starts
    // inactive regardless of how tall the generated paragraphs are.
    let span = paragraph_span(&app, PARAGRAPHS_PER_ARTICLE - 1);
    assert!(!app.timers().is_active(&span.key));

    // Enter at t=1000: position the viewport exactly over the paragraph.
    app.set_viewport_rows(span.rows);
    app.scroll_to(span.top);
    app.observe(at(base, 1_000));
    assert!(app.timers().is_active(&span.key));
    assert_eq!(
        app.timers().elapsed(&span.key, at(base, 2_200)),
        Duration::from_millis(1_200)
    );

    // Leave at t=3500: scroll back to the top.
    settle(&mut app);
    app.scroll_to_top();
    app.observe(at(base, 3_500));
    assert!(!app.timers().is_active(&span.key));
    assert_eq!(
        app.timers().record(&span.key).accumulated(),
        Duration::from_millis(2_500)
    );

    // Re-enter at t=5000, query mid-interval at t=6200: 2500 + 1200.
    settle(&mut app);
    app.scroll_to(span.top);
    app.observe(at(base, 5_000));
    assert_eq!(
        app.timers().elapsed(&span.key, at(base, 6_200)),
        Duration::from_millis(3_700)
    );
}

#[test]
fn batched_flush_keeps_per_key_durations_independent() {
    let mut app = test_app();
    let base = Instant::now();

    // Trigger the first append through a one-row viewport so no paragraph
    // activates before we position things deliberately.
    mount(&mut app, 80, 1);
    app.observe(at(base, 0));
    settle(&mut app);

    let first = paragraph_span(&app, 0);
    let second = paragraph_span(&app, 1);

    // First paragraph enters alone at t=0.
    app.set_viewport_rows(first.rows);
    app.scroll_to(first.top);
    app.observe(at(base, 0));
    assert!(app.timers().is_active(&first.key));
    assert!(!app.timers().is_active(&second.key));

    // Widen the viewport so the second paragraph enters at t=1000.
    settle(&mut app);
    app.set_viewport_rows(second.top + second.rows - first.top);
    app.scroll_to(first.top);
    app.observe(at(base, 1_000));
    assert!(app.timers().is_active(&second.key));

    // Teardown flushes both in one batch; each keeps its own duration.
    app.shutdown(at(base, 4_000));
    assert_eq!(
        app.timers().record(&first.key).accumulated(),
        Duration::from_millis(4_000)
    );
    assert_eq!(
        app.timers().record(&second.key).accumulated(),
        Duration::from_millis(3_000)
    );
    assert!(!app.timers().is_active(&first.key));
    assert!(!app.timers().is_active(&second.key));
    assert_eq!(app.tracked_paragraphs(), 0);
}

#[test]
fn tick_never_mutates_timer_records() {
    let mut app = test_app();
    let base = Instant::now();

    mount(&mut app, 80, 10);
    app.observe(at(base, 0));
    settle(&mut app);

    let span = paragraph_span(&app, 0);
    app.set_viewport_rows(span.rows);
    app.scroll_to(span.top);
    app.observe(at(base, 100));
    let before = app.timers().record(&span.key);

    app.tick();
    app.tick();
    app.tick();

    assert_eq!(app.timers().record(&span.key), before);
    assert_eq!(app.tick_count(), 3);
}

#[test]
fn shutdown_releases_the_sentinel() {
    let mut app = test_app();
    let base = Instant::now();

    mount(&mut app, 80, 10);
    app.observe(at(base, 0));
    assert_eq!(app.articles().len(), 1);

    app.shutdown(at(base, 500));

    // Further crossings are ignored: the watcher no longer observes anything.
    settle(&mut app);
    app.scroll_to_bottom();
    app.observe(at(base, 1_000));
    assert_eq!(app.articles().len(), 1);
}

#[test]
fn timers_persist_after_paragraphs_scroll_far_away() {
    let mut app = test_app();
    let base = Instant::now();

    mount(&mut app, 80, 10);
    app.observe(at(base, 0));
    settle(&mut app);

    let span = paragraph_span(&app, 0);
    app.set_viewport_rows(span.rows);
    app.scroll_to(span.top);
    app.observe(at(base, 0));
    settle(&mut app);
    app.scroll_to_bottom();
    app.observe(at(base, 2_000));

    // Record survives with its accumulated total even though the paragraph
    // left the viewport long ago.
    assert!(!app.timers().is_active(&span.key));
    assert_eq!(
        app.timers().record(&span.key).accumulated(),
        Duration::from_millis(2_000)
    );
}
