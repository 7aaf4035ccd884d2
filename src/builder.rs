use std::time::Duration;

use crate::error::ImportError;
use crate::extractors::extract_recipe;
use crate::fetchers::{Fetcher, RequestFetcher, DEFAULT_USER_AGENT};
use crate::model::Recipe;
use crate::pipelines;
use crate::store::RecipeStore;

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Fetch the page from a URL
    Url(String),
    /// Use markup that was already downloaded from `url`
    Html { html: String, url: String },
}

/// Represents what to do with the extracted recipe
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputMode {
    /// Save the recipe to the store (default)
    #[default]
    Save,
    /// Return the Recipe without saving it
    Recipe,
}

/// Result of a recipe import operation
#[derive(Debug, Clone)]
pub enum ImportResult {
    /// Recipe saved under `id`
    Saved { id: i64, recipe: Recipe },
    /// Recipe extracted but not saved
    Recipe(Recipe),
}

/// Builder for configuring and executing recipe imports
#[derive(Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    mode: OutputMode,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    fetcher: Option<Box<dyn Fetcher>>,
    store: Option<RecipeStore>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use wolfgang::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to a page that was already downloaded
    ///
    /// `url` is recorded as the recipe's source.
    pub fn html(mut self, html: impl Into<String>, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Html {
            html: html.into(),
            url: url.into(),
        });
        self
    }

    /// Return the Recipe instead of saving it
    ///
    /// # Example
    /// ```
    /// use wolfgang::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .extract_only();
    /// ```
    pub fn extract_only(mut self) -> Self {
        self.mode = OutputMode::Recipe;
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the user agent for HTTP requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom page fetcher instead of the HTTP client
    ///
    /// Timeout and user agent settings do not apply to a custom fetcher.
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Store that receives the recipe in save mode
    pub fn store(mut self, store: RecipeStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build and execute the recipe import operation
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - No input source was specified
    /// - Save mode was requested without a store
    /// - The page cannot be fetched or holds no recipe
    /// - The store rejects the recipe (e.g. its URL is already saved)
    pub async fn build(self) -> Result<ImportResult, ImportError> {
        let source = self.source.ok_or_else(|| {
            ImportError::BuilderError(
                "No input source specified. Use .url() or .html()".to_string(),
            )
        })?;

        let store = match (self.mode, self.store) {
            (OutputMode::Save, None) => {
                return Err(ImportError::BuilderError(
                    "No store specified. Use .store() or .extract_only()".to_string(),
                ))
            }
            (_, store) => store,
        };

        let recipe = match source {
            InputSource::Url(url) => match self.fetcher {
                Some(fetcher) => pipelines::url::process(fetcher.as_ref(), &url).await?,
                None => {
                    let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
                    let fetcher = RequestFetcher::with_user_agent(self.timeout, user_agent)?;
                    pipelines::url::process(&fetcher, &url).await?
                }
            },
            InputSource::Html { html, url } => extract_recipe(&html, &url)?,
        };

        match (self.mode, store) {
            (OutputMode::Save, Some(store)) => {
                let id = store.add_recipe(recipe.clone()).await?;
                Ok(ImportResult::Saved { id, recipe })
            }
            _ => Ok(ImportResult::Recipe(recipe)),
        }
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use wolfgang::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}
