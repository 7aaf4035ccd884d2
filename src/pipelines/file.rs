use std::path::Path;

use log::{info, warn};
use serde_json::Value;

use crate::error::{ImportError, RecordError, StoreError};
use crate::model::{Recipe, UNTITLED_RECIPE};
use crate::store::RecipeStore;

/// Outcome of importing a recipe file.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Number of records in the file, whatever became of them
    pub attempted: usize,
    pub imported: usize,
    pub failures: Vec<RecordFailure>,
}

#[derive(Debug)]
pub struct RecordFailure {
    /// Position of the record in the file
    pub index: usize,
    pub name: Option<String>,
    pub error: RecordError,
}

impl RecordFailure {
    pub fn is_duplicate(&self) -> bool {
        matches!(self.error, RecordError::Store(StoreError::Duplicate { .. }))
    }
}

/// All stored recipes as a pretty-printed JSON array.
pub async fn export_recipes(store: &RecipeStore) -> Result<String, StoreError> {
    let recipes = store.get_recipes().await?;
    info!("Exporting {} recipes", recipes.len());
    Ok(serde_json::to_string_pretty(&recipes)?)
}

/// Import a JSON array of recipes.
///
/// Records are handled one at a time: `id` and `dateAdded` are ignored, and a
/// record that is malformed or whose URL is already stored is reported in
/// [`ImportReport::failures`] without stopping the rest of the import.
pub async fn import_recipes(store: &RecipeStore, json: &str) -> Result<ImportReport, ImportError> {
    let records: Vec<Value> = match serde_json::from_str(json) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            return Err(ImportError::InvalidFormat(
                "expected a JSON array of recipes".to_string(),
            ))
        }
        Err(e) => return Err(ImportError::InvalidFormat(e.to_string())),
    };

    let mut report = ImportReport {
        attempted: records.len(),
        ..Default::default()
    };

    for (index, record) in records.into_iter().enumerate() {
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let outcome = match serde_json::from_value::<Recipe>(record) {
            Ok(mut recipe) => {
                if recipe.name.is_empty() {
                    recipe.name = UNTITLED_RECIPE.to_string();
                }
                store.add_recipe(recipe).await.map_err(RecordError::from)
            }
            Err(e) => Err(RecordError::from(e)),
        };

        match outcome {
            Ok(_) => report.imported += 1,
            Err(error) => {
                warn!(
                    "Failed to import recipe {} ({}): {}",
                    index,
                    name.as_deref().unwrap_or("unnamed"),
                    error
                );
                report.failures.push(RecordFailure { index, name, error });
            }
        }
    }

    info!(
        "Imported {} of {} recipes",
        report.imported, report.attempted
    );
    Ok(report)
}

/// Write every stored recipe to `path` as a JSON array.
pub async fn export_to_file(
    store: &RecipeStore,
    path: impl AsRef<Path>,
) -> Result<(), ImportError> {
    let json = export_recipes(store).await?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Import the recipe array stored in `path`.
pub async fn import_from_file(
    store: &RecipeStore,
    path: impl AsRef<Path>,
) -> Result<ImportReport, ImportError> {
    let json = tokio::fs::read_to_string(path).await?;
    import_recipes(store, &json).await
}

/// Unchecked shopping items, one `• item` per line, or `None` if there are none.
pub async fn shopping_list_text(store: &RecipeStore) -> Result<Option<String>, StoreError> {
    let lines: Vec<String> = store
        .get_shopping_list()
        .await?
        .into_iter()
        .filter(|item| !item.checked)
        .map(|item| format!("• {}", item.text))
        .collect();

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_import_rejects_non_array() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        for input in [r#"{"name": "Soup"}"#, "not json"] {
            let err = import_recipes(&store, input).await.unwrap_err();
            assert!(matches!(err, ImportError::InvalidFormat(_)));
        }
    }

    #[tokio::test]
    async fn test_import_names_blank_record() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        let json = r#"[{"name": "", "url": "http://x/blank"}]"#;

        let report = import_recipes(&store, json).await.unwrap();
        assert_eq!(report.imported, 1);
        let stored = store.get_recipes().await.unwrap();
        assert_eq!(stored[0].recipe.name, UNTITLED_RECIPE);
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");

        let source = RecipeStore::open_in_memory().await.unwrap();
        source.add_recipe(Recipe::untitled("http://x/soup")).await.unwrap();
        export_to_file(&source, &path).await.unwrap();

        let target = RecipeStore::open_in_memory().await.unwrap();
        let report = import_from_file(&target, &path).await.unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(target.recipe_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_import_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecipeStore::open_in_memory().await.unwrap();

        let err = import_from_file(&store, dir.path().join("missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }

    #[tokio::test]
    async fn test_shopping_list_text_skips_checked() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        assert_eq!(shopping_list_text(&store).await.unwrap(), None);

        store
            .add_to_shopping(vec!["eggs".to_string(), "milk".to_string(), "flour".to_string()])
            .await
            .unwrap();
        let items = store.get_shopping_list().await.unwrap();
        store.update_shopping_item(items[1].id, true).await.unwrap();

        assert_eq!(
            shopping_list_text(&store).await.unwrap().as_deref(),
            Some("• eggs\n• flour")
        );
    }
}
