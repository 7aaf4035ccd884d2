use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use super::schema::SCHEMA;
use crate::error::StoreError;
use crate::model::{Recipe, ShoppingItem, StoredRecipe};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const RECIPE_COLUMNS: &str = "id, name, url, description, image, prep_time, cook_time, \
                              total_time, recipe_yield, ingredients, instructions, date_added";

/// Handle to the local recipe database.
///
/// Every call is executed on the connection's own thread, so calls made
/// through one handle (or its clones) never interleave.
#[derive(Clone)]
pub struct RecipeStore {
    conn: Connection,
}

impl RecipeStore {
    /// Open (creating on first use) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_owned();
        info!("Opening recipe store at {}", path.display());
        let conn = Connection::open(path)
            .await
            .map_err(StoreError::Unavailable)?;
        Self::init(conn).await
    }

    /// A private database that disappears when the last handle is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(StoreError::Unavailable)?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(StoreError::Unavailable)?;

        Ok(Self { conn })
    }

    // Recipe operations

    /// Insert `recipe`, stamping it with the current time. Returns the new id.
    pub async fn add_recipe(&self, recipe: Recipe) -> Result<i64, StoreError> {
        let ingredients = serde_json::to_string(&recipe.ingredients)?;
        let instructions = serde_json::to_string(&recipe.instructions)?;
        let date_added = Utc::now().timestamp_millis();
        let url = recipe.url.clone();

        let result = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO recipes (name, url, description, image, prep_time, cook_time,
                                           total_time, recipe_yield, ingredients, instructions, date_added)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
                    params![
                        recipe.name,
                        recipe.url,
                        recipe.description,
                        recipe.image,
                        recipe.prep_time,
                        recipe.cook_time,
                        recipe.total_time,
                        recipe.recipe_yield,
                        ingredients,
                        instructions,
                        date_added,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await;

        match result {
            Ok(id) => {
                debug!("Stored recipe {} from {}", id, url);
                Ok(id)
            }
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate { url }),
            Err(e) => Err(e.into()),
        }
    }

    /// All recipes, newest first.
    pub async fn get_recipes(&self) -> Result<Vec<StoredRecipe>, StoreError> {
        let recipes = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY date_added DESC, id DESC"
                ))?;
                let recipes = stmt
                    .query_map([], recipe_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(recipes)
            })
            .await?;
        Ok(recipes)
    }

    pub async fn get_recipe(&self, id: i64) -> Result<StoredRecipe, StoreError> {
        let recipe = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1"))?;
                let recipe = stmt
                    .query_row(params![id], recipe_from_row)
                    .optional()?;
                Ok(recipe)
            })
            .await?;
        recipe.ok_or(StoreError::NotFound { id })
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete_recipe(&self, id: i64) -> Result<(), StoreError> {
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn recipe_count(&self) -> Result<i64, StoreError> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    // Shopping list operations

    /// Add one unchecked item per entry, all or nothing.
    pub async fn add_to_shopping(&self, items: Vec<String>) -> Result<(), StoreError> {
        let count = items.len();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt =
                        tx.prepare("INSERT INTO shopping (text, checked) VALUES (?1, 0)")?;
                    for item in &items {
                        stmt.execute(params![item])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await?;
        debug!("Added {} items to the shopping list", count);
        Ok(())
    }

    /// Add every ingredient of a stored recipe to the shopping list.
    pub async fn add_recipe_to_shopping(&self, recipe_id: i64) -> Result<usize, StoreError> {
        let recipe = self.get_recipe(recipe_id).await?;
        let count = recipe.recipe.ingredients.len();
        self.add_to_shopping(recipe.recipe.ingredients).await?;
        Ok(count)
    }

    /// Items in insertion order.
    pub async fn get_shopping_list(&self) -> Result<Vec<ShoppingItem>, StoreError> {
        let items = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, text, checked FROM shopping ORDER BY id")?;
                let items = stmt
                    .query_map([], shopping_item_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;
        Ok(items)
    }

    pub async fn update_shopping_item(&self, id: i64, checked: bool) -> Result<(), StoreError> {
        let updated = self
            .conn
            .call(move |conn| {
                let updated = conn.execute(
                    "UPDATE shopping SET checked = ?1 WHERE id = ?2",
                    params![checked, id],
                )?;
                Ok(updated)
            })
            .await?;

        if updated == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete_shopping_item(&self, id: i64) -> Result<(), StoreError> {
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM shopping WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn clear_shopping(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| {
                conn.execute("DELETE FROM shopping", [])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Empty both tables in one transaction.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM recipes", [])?;
                tx.execute("DELETE FROM shopping", [])?;
                tx.commit()?;
                Ok(())
            })
            .await?;
        info!("Cleared all recipes and shopping items");
        Ok(())
    }
}

fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
    matches!(
        err,
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn json_list(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn recipe_from_row(row: &Row) -> rusqlite::Result<StoredRecipe> {
    Ok(StoredRecipe {
        id: row.get(0)?,
        date_added: row.get(11)?,
        recipe: Recipe {
            name: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            image: row.get(4)?,
            prep_time: row.get(5)?,
            cook_time: row.get(6)?,
            total_time: row.get(7)?,
            recipe_yield: row.get(8)?,
            ingredients: json_list(row, 9)?,
            instructions: json_list(row, 10)?,
        },
    })
}

fn shopping_item_from_row(row: &Row) -> rusqlite::Result<ShoppingItem> {
    Ok(ShoppingItem {
        id: row.get(0)?,
        text: row.get(1)?,
        checked: row.get(2)?,
    })
}
