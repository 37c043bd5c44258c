//! Synthetic article generation.
//!
//! The feed is the only producer of articles. `append` is synchronous and
//! infallible; the caller owns the returned article.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use lector_types::{Article, ArticleId, PARAGRAPHS_PER_ARTICLE};

const TITLE_WORDS: usize = 5;
const MIN_SENTENCES: usize = 4;
const MAX_SENTENCES: usize = 7;
const MIN_SENTENCE_WORDS: usize = 8;
const MAX_SENTENCE_WORDS: usize = 14;

const WORDS: &[&str] = &[
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "tempor",
    "incididunt",
    "labore",
    "dolore",
    "magna",
    "aliqua",
    "enim",
    "minim",
    "veniam",
    "quis",
    "nostrud",
    "exercitation",
    "ullamco",
    "laboris",
    "nisi",
    "aliquip",
    "commodo",
    "consequat",
    "duis",
    "aute",
    "irure",
    "reprehenderit",
    "voluptate",
    "velit",
    "esse",
    "cillum",
    "fugiat",
    "nulla",
    "pariatur",
    "excepteur",
    "sint",
    "occaecat",
    "cupidatat",
    "proident",
    "sunt",
    "culpa",
    "officia",
    "deserunt",
    "mollit",
    "anim",
    "laborum",
];

/// Generates articles on demand.
pub struct ContentFeed {
    rng: StdRng,
}

impl ContentFeed {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic generation for tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Construct one new article with a fresh unique identifier.
    pub fn append(&mut self) -> Article {
        let title = self.title();
        let paragraphs = (0..PARAGRAPHS_PER_ARTICLE)
            .map(|_| self.paragraph())
            .collect();
        Article::new(ArticleId::generate(), title, paragraphs)
    }

    fn word(&mut self) -> &'static str {
        WORDS[self.rng.random_range(0..WORDS.len())]
    }

    fn title(&mut self) -> String {
        let words: Vec<&str> = (0..TITLE_WORDS).map(|_| self.word()).collect();
        capitalize(&words.join(" "))
    }

    fn sentence(&mut self) -> String {
        let count = self.rng.random_range(MIN_SENTENCE_WORDS..=MAX_SENTENCE_WORDS);
        let words: Vec<&str> = (0..count).map(|_| self.word()).collect();
        let mut sentence = capitalize(&words.join(" "));
        sentence.push('.');
        sentence
    }

    fn paragraph(&mut self) -> String {
        let count = self.rng.random_range(MIN_SENTENCES..=MAX_SENTENCES);
        let sentences: Vec<String> = (0..count).map(|_| self.sentence()).collect();
        sentences.join(" ")
    }
}

impl Default for ContentFeed {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::ContentFeed;
    use lector_types::PARAGRAPHS_PER_ARTICLE;

    #[test]
    fn append_produces_the_fixed_paragraph_count() {
        let mut feed = ContentFeed::seeded(7);
        let article = feed.append();
        assert_eq!(article.paragraphs().len(), PARAGRAPHS_PER_ARTICLE);
        assert!(!article.title().is_empty());
        assert!(article.paragraphs().iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn appended_articles_have_distinct_ids() {
        let mut feed = ContentFeed::seeded(7);
        let a = feed.append();
        let b = feed.append();
        let c = feed.append();
        assert_ne!(a.id(), b.id());
        assert_ne!(b.id(), c.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let mut first = ContentFeed::seeded(42);
        let mut second = ContentFeed::seeded(42);
        assert_eq!(first.append().title(), second.append().title());
    }

    #[test]
    fn sentences_are_capitalized_and_terminated() {
        let mut feed = ContentFeed::seeded(3);
        let article = feed.append();
        for paragraph in article.paragraphs() {
            assert!(paragraph.starts_with(char::is_uppercase));
            assert!(paragraph.ends_with('.'));
        }
    }
}
