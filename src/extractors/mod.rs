use crate::error::ExtractError;
use crate::model::Recipe;
use scraper::Html;

mod json_ld;

pub use self::json_ld::JsonLdExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    /// Parses `html` leniently; broken markup still yields a best-effort tree.
    pub fn new(html: &str, url: impl Into<String>) -> Self {
        ParsingContext {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ExtractError>;
}

/// Extract the first schema.org Recipe embedded in `html`.
///
/// `url` is recorded as the recipe's source. Fails with
/// [`ExtractError::NotFound`] when no JSON-LD block holds a Recipe entity.
pub fn extract_recipe(html: &str, url: &str) -> Result<Recipe, ExtractError> {
    let context = ParsingContext::new(html, url);
    JsonLdExtractor.parse(&context)
}
