//! Feed layout: the flattened row buffer the viewport scrolls over.
//!
//! Rendering and visibility observation must agree on geometry, so both are
//! driven by the same layout: every paragraph's wrapped row span and the
//! sentinel row are computed here, from plain text and a width. No ratatui
//! types; the TUI layer styles these rows as-is.

use std::collections::HashMap;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use lector_types::{Article, ElementId, ParagraphKey};

use crate::intersection::RowSpan;

/// Fixed-width left column for a paragraph's elapsed-time badge. Sized so
/// the text column stays stable while the badge ticks.
pub const BADGE_GUTTER_COLS: u16 = 8;

/// One row of the rendered feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRow {
    Blank,
    /// Article title; `article` indexes the controller's article vec.
    Title { article: usize },
    /// One wrapped line of a paragraph. `first` marks the line carrying the
    /// timer badge.
    ParagraphLine {
        key: ParagraphKey,
        text: String,
        first: bool,
    },
    /// The one-row loading marker after the last article.
    Sentinel,
}

/// Row range of one paragraph element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphSpan {
    pub element: ElementId,
    pub key: ParagraphKey,
    pub top: usize,
    pub rows: usize,
}

impl ParagraphSpan {
    #[must_use]
    pub fn span(&self) -> RowSpan {
        RowSpan {
            top: self.top,
            rows: self.rows,
        }
    }
}

/// The flattened feed at one width.
#[derive(Debug)]
pub struct FeedLayout {
    width: u16,
    rows: Vec<FeedRow>,
    paragraphs: Vec<ParagraphSpan>,
    sentinel_top: usize,
}

impl FeedLayout {
    /// Lay out every article followed by the sentinel row. Paragraphs whose
    /// element handle is missing from `elements` are still rendered; they
    /// just get no observable span.
    #[must_use]
    pub fn build(
        articles: &[Article],
        elements: &HashMap<ParagraphKey, ElementId>,
        width: u16,
    ) -> Self {
        let text_cols = usize::from(width)
            .saturating_sub(usize::from(BADGE_GUTTER_COLS))
            .max(1);

        let mut rows = Vec::new();
        let mut paragraphs = Vec::new();

        for (article_index, article) in articles.iter().enumerate() {
            rows.push(FeedRow::Title {
                article: article_index,
            });
            rows.push(FeedRow::Blank);

            for (paragraph_index, text) in article.paragraphs().iter().enumerate() {
                let key = article.paragraph_key(paragraph_index);
                let lines = wrap(text, text_cols);
                let top = rows.len();

                if let Some(&element) = elements.get(&key) {
                    paragraphs.push(ParagraphSpan {
                        element,
                        key,
                        top,
                        rows: lines.len(),
                    });
                }

                for (line_index, line) in lines.into_iter().enumerate() {
                    rows.push(FeedRow::ParagraphLine {
                        key,
                        text: line,
                        first: line_index == 0,
                    });
                }
                rows.push(FeedRow::Blank);
            }
        }

        let sentinel_top = rows.len();
        rows.push(FeedRow::Sentinel);

        Self {
            width,
            rows,
            paragraphs,
            sentinel_top,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn rows(&self) -> &[FeedRow] {
        &self.rows
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn paragraphs(&self) -> &[ParagraphSpan] {
        &self.paragraphs
    }

    #[must_use]
    pub fn sentinel_top(&self) -> usize {
        self.sentinel_top
    }

    #[must_use]
    pub fn sentinel_span(&self) -> RowSpan {
        RowSpan {
            top: self.sentinel_top,
            rows: 1,
        }
    }
}

/// Greedy word wrap by display width. Words wider than `width` are split
/// hard. Always yields at least one line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let mut piece = String::new();
            let mut piece_width = 0usize;
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if piece_width + ch_width > width && !piece.is_empty() {
                    lines.push(std::mem::take(&mut piece));
                    piece_width = 0;
                }
                piece.push(ch);
                piece_width += ch_width;
            }
            current = piece;
            current_width = piece_width;
            continue;
        }

        let needed = if current.is_empty() {
            word_width
        } else {
            word_width + 1
        };
        if current_width + needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
