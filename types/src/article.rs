use crate::ids::{ArticleId, ParagraphKey};

/// Number of paragraphs every generated article carries.
pub const PARAGRAPHS_PER_ARTICLE: usize = 6;

/// One generated article. Immutable once created; the feed only grows and
/// never removes articles.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Article {
    id: ArticleId,
    title: String,
    paragraphs: Vec<String>,
}

impl Article {
    #[must_use]
    pub fn new(id: ArticleId, title: String, paragraphs: Vec<String>) -> Self {
        debug_assert_eq!(paragraphs.len(), PARAGRAPHS_PER_ARTICLE);
        Self {
            id,
            title,
            paragraphs,
        }
    }

    #[must_use]
    pub fn id(&self) -> ArticleId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Key for the paragraph at `index` within this article.
    #[must_use]
    pub fn paragraph_key(&self, index: usize) -> ParagraphKey {
        ParagraphKey::new(self.id, index)
    }
}
