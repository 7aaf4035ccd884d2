mod repository;
mod schema;

pub use self::repository::RecipeStore;
