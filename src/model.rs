use serde::{Deserialize, Serialize};

/// Name used when the page does not provide one.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// A normalized recipe as produced by an extractor.
///
/// Field names follow schema.org casing on the wire so exported files can be
/// read back without a mapping layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    /// Source URL, unique across a store.
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub total_time: String,
    #[serde(default)]
    pub recipe_yield: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// An otherwise empty recipe with the placeholder name.
    pub fn untitled(url: impl Into<String>) -> Self {
        Recipe {
            name: UNTITLED_RECIPE.to_string(),
            url: url.into(),
            description: String::new(),
            image: String::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            total_time: String::new(),
            recipe_yield: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }
}

/// A recipe as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecipe {
    pub id: i64,
    /// Milliseconds since the Unix epoch, set on insertion.
    pub date_added: i64,
    #[serde(flatten)]
    pub recipe: Recipe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub text: String,
    pub checked: bool,
}

/// Newest first, the order recipe lists are presented in.
pub fn sort_newest_first(recipes: &mut [StoredRecipe]) {
    recipes.sort_by(|a, b| {
        b.date_added
            .cmp(&a.date_added)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_recipe_serializes_flat_camel_case() {
        let stored = StoredRecipe {
            id: 3,
            date_added: 1_700_000_000_000,
            recipe: Recipe {
                prep_time: "PT10M".to_string(),
                recipe_yield: "4".to_string(),
                ..Recipe::untitled("http://x/soup")
            },
        };

        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["dateAdded"], 1_700_000_000_000i64);
        assert_eq!(value["url"], "http://x/soup");
        assert_eq!(value["prepTime"], "PT10M");
        assert_eq!(value["recipeYield"], "4");
        assert_eq!(value["name"], UNTITLED_RECIPE);
        assert!(value.get("recipe").is_none());
    }

    #[test]
    fn test_recipe_deserialize_defaults_optional_fields() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"name": "Soup", "url": "http://x/soup"}"#).unwrap();
        assert_eq!(recipe.name, "Soup");
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.total_time, "");
    }

    #[test]
    fn test_sort_newest_first() {
        let mut recipes = vec![
            StoredRecipe {
                id: 1,
                date_added: 10,
                recipe: Recipe::untitled("a"),
            },
            StoredRecipe {
                id: 2,
                date_added: 30,
                recipe: Recipe::untitled("b"),
            },
            StoredRecipe {
                id: 3,
                date_added: 30,
                recipe: Recipe::untitled("c"),
            },
        ];
        sort_newest_first(&mut recipes);
        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
