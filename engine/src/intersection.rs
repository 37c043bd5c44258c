//! Viewport intersection geometry.
//!
//! The terminal analogue of a viewport-intersection primitive: elements are
//! row spans in the flattened feed buffer, the viewport is the visible row
//! range, and the intersection ratio is the fraction of an element's rows
//! that fall inside the (margin-extended) viewport.

use thiserror::Error;

use lector_types::ElementId;

/// Threshold ratio and viewport margin for one observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionConfig {
    threshold: f64,
    margin_rows: usize,
}

#[derive(Debug, Error)]
#[error("intersection threshold must be a ratio within 0.0..=1.0, got {0}")]
pub struct InvalidThreshold(f64);

impl IntersectionConfig {
    pub fn new(threshold: f64, margin_rows: usize) -> Result<Self, InvalidThreshold> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            margin_rows,
        })
    }

    /// For the built-in observer constants, which are known-valid ratios.
    pub(crate) const fn new_unchecked(threshold: f64, margin_rows: usize) -> Self {
        Self {
            threshold,
            margin_rows,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn margin_rows(&self) -> usize {
        self.margin_rows
    }

    /// Whether `ratio` counts as intersecting for this observer.
    #[must_use]
    pub fn intersects(&self, ratio: f64) -> bool {
        ratio >= self.threshold
    }
}

/// Visible row range of the feed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row (offset from the top of the buffer).
    pub top: usize,
    /// Number of visible rows.
    pub rows: usize,
}

/// Row range an element occupies in the feed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub top: usize,
    pub rows: usize,
}

/// Fraction of `span` inside `viewport` extended by `margin_rows` on both
/// ends. Zero-height spans never intersect.
#[must_use]
pub fn intersection_ratio(span: RowSpan, viewport: Viewport, margin_rows: usize) -> f64 {
    if span.rows == 0 {
        return 0.0;
    }

    let view_top = viewport.top.saturating_sub(margin_rows);
    let view_bottom = viewport.top + viewport.rows + margin_rows;
    let span_bottom = span.top + span.rows;

    let overlap = span_bottom
        .min(view_bottom)
        .saturating_sub(span.top.max(view_top));
    overlap as f64 / span.rows as f64
}

/// One observation delivered to a watcher: an element and its current ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    pub ratio: f64,
}
