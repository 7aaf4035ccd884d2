pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod pipelines;
pub mod store;

use std::time::Duration;

pub use builder::{ImportResult, InputSource, OutputMode, RecipeImporter, RecipeImporterBuilder};
pub use error::{ExtractError, ImportError, RecordError, StoreError};
pub use extractors::extract_recipe;
pub use fetchers::{Fetcher, RequestFetcher};
pub use model::{Recipe, ShoppingItem, StoredRecipe};
pub use pipelines::file::{
    export_recipes, export_to_file, import_from_file, import_recipes, shopping_list_text,
    ImportReport, RecordFailure,
};
pub use store::RecipeStore;

/// Fetch a page and extract its recipe without saving it.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = wolfgang::fetch_recipe("https://example.com/recipe").await?;
/// println!("{}", recipe.name);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_recipe(url: &str) -> Result<Recipe, ExtractError> {
    fetch_recipe_with_timeout(url, None).await
}

/// Like [`fetch_recipe`] with a custom request timeout (30 seconds if `None`).
pub async fn fetch_recipe_with_timeout(
    url: &str,
    timeout: Option<Duration>,
) -> Result<Recipe, ExtractError> {
    let fetcher = RequestFetcher::new(timeout)?;
    pipelines::url::process(&fetcher, url).await
}

/// Fetch a page, extract its recipe and save it, returning the new id.
pub async fn import_from_url(store: &RecipeStore, url: &str) -> Result<i64, ImportError> {
    let fetcher = RequestFetcher::new(None)?;
    pipelines::url::save(&fetcher, store, url).await
}
