use log::info;

use crate::error::{ExtractError, ImportError};
use crate::extractors::extract_recipe;
use crate::fetchers::Fetcher;
use crate::model::Recipe;
use crate::store::RecipeStore;

/// Download `url` and extract its recipe.
///
/// Transport failures surface as [`ExtractError::Fetch`] before the page is
/// parsed; pages without a recipe as [`ExtractError::NotFound`].
pub async fn process<F>(fetcher: &F, url: &str) -> Result<Recipe, ExtractError>
where
    F: Fetcher + ?Sized,
{
    let html = fetcher.fetch(url).await?;
    extract_recipe(&html, url)
}

/// Download, extract and store the recipe at `url`, returning its new id.
pub async fn save<F>(fetcher: &F, store: &RecipeStore, url: &str) -> Result<i64, ImportError>
where
    F: Fetcher + ?Sized,
{
    let recipe = process(fetcher, url).await?;
    let name = recipe.name.clone();
    let id = store.add_recipe(recipe).await?;
    info!("Saved \"{}\" as recipe {}", name, id);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use async_trait::async_trait;

    struct StaticPage(&'static str);

    #[async_trait]
    impl Fetcher for StaticPage {
        async fn fetch(&self, _url: &str) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    #[async_trait]
    impl Fetcher for Offline {
        async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
            Err(ExtractError::Fetch(format!("{url} is unreachable")))
        }
    }

    const PAGE: &str = r#"<html><head><script type="application/ld+json">
        {"@type": "Recipe", "name": "Soup", "recipeIngredient": ["1 onion"]}
        </script></head></html>"#;

    #[tokio::test]
    async fn test_save_then_duplicate() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        let id = save(&StaticPage(PAGE), &store, "http://x/soup").await.unwrap();
        assert_eq!(store.get_recipe(id).await.unwrap().recipe.name, "Soup");

        let err = save(&StaticPage(PAGE), &store, "http://x/soup")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Store(StoreError::Duplicate { .. })));
        assert_eq!(store.recipe_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_reported_before_parsing() {
        let err = process(&Offline, "http://x/soup").await.unwrap_err();
        assert!(matches!(err, ExtractError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_page_without_recipe() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        let err = save(&StaticPage("<html></html>"), &store, "http://x/none")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Extract(ExtractError::NotFound)));
        assert_eq!(store.recipe_count().await.unwrap(), 0);
    }
}
