use std::env;
use std::process::ExitCode;

use log::error;

use wolfgang::config::Settings;
use wolfgang::model::sort_newest_first;
use wolfgang::{
    export_to_file, import_from_file, pipelines, shopping_list_text, ImportError, RecipeStore,
    RequestFetcher, StoreError,
};

const USAGE: &str = "Usage: wolfgang <command> [argument]

Commands:
  add <url>             Fetch a recipe page and save its recipe
  list                  List saved recipes, newest first
  show <id>             Show one saved recipe
  delete <id>           Delete a saved recipe
  shop <id>             Add a recipe's ingredients to the shopping list
  shopping              Show the shopping list
  check <item-id>       Tick a shopping list item
  uncheck <item-id>     Untick a shopping list item
  remove-item <item-id> Remove one shopping list item
  share-shopping        Print the unticked items as a plain list
  clear-shopping        Empty the shopping list
  export <file>         Write all recipes to a JSON file
  import <file>         Read recipes from a JSON file
  clear-all             Delete all recipes and shopping list items";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    };
    let argument = args.get(1).map(String::as_str);

    match run(command, argument).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &str, argument: Option<&str>) -> Result<ExitCode, ImportError> {
    let settings = Settings::load()?;
    let store = RecipeStore::open(&settings.database_path).await?;

    match (command, argument) {
        ("add", Some(url)) => {
            let fetcher = RequestFetcher::from_settings(&settings.fetch)?;
            match pipelines::url::save(&fetcher, &store, url).await {
                Ok(id) => print_recipe(&store, id).await?,
                Err(ImportError::Extract(e)) => {
                    error!("{}", e);
                    eprintln!("{}", e.user_message());
                    return Ok(ExitCode::FAILURE);
                }
                Err(ImportError::Store(StoreError::Duplicate { url })) => {
                    eprintln!("A recipe from {url} is already saved");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e),
            }
        }
        ("list", None) => {
            let mut recipes = store.get_recipes().await?;
            if recipes.is_empty() {
                println!("No saved recipes yet.");
            }
            sort_newest_first(&mut recipes);
            for stored in recipes {
                let recipe = &stored.recipe;
                let mut meta = Vec::new();
                if !recipe.total_time.is_empty() {
                    meta.push(format!("time {}", recipe.total_time));
                }
                if !recipe.recipe_yield.is_empty() {
                    meta.push(format!("serves {}", recipe.recipe_yield));
                }
                println!("{:>4}  {}  {}", stored.id, recipe.name, meta.join(", "));
            }
        }
        ("show", Some(id)) => print_recipe(&store, parse_id(id)?).await?,
        ("delete", Some(id)) => store.delete_recipe(parse_id(id)?).await?,
        ("shop", Some(id)) => {
            let count = store.add_recipe_to_shopping(parse_id(id)?).await?;
            println!("Added {count} ingredients to the shopping list");
        }
        ("shopping", None) => {
            let items = store.get_shopping_list().await?;
            if items.is_empty() {
                println!("Your shopping list is empty");
            }
            for item in items {
                let mark = if item.checked { "x" } else { " " };
                println!("{:>4}  [{}] {}", item.id, mark, item.text);
            }
        }
        ("check", Some(id)) => store.update_shopping_item(parse_id(id)?, true).await?,
        ("uncheck", Some(id)) => store.update_shopping_item(parse_id(id)?, false).await?,
        ("remove-item", Some(id)) => store.delete_shopping_item(parse_id(id)?).await?,
        ("share-shopping", None) => match shopping_list_text(&store).await? {
            Some(text) => println!("{text}"),
            None => println!("No items to export"),
        },
        ("clear-shopping", None) => store.clear_shopping().await?,
        ("export", Some(path)) => {
            export_to_file(&store, path).await?;
            println!("Exported recipes to {path}");
        }
        ("import", Some(path)) => {
            let report = import_from_file(&store, path).await?;
            for failure in &report.failures {
                eprintln!("Skipped record {}: {}", failure.index, failure.error);
            }
            println!("Imported {} recipes!", report.attempted);
        }
        ("clear-all", None) => {
            store.clear_all().await?;
            println!("All data cleared");
        }
        _ => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::from(2));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_id(raw: &str) -> Result<i64, ImportError> {
    raw.parse()
        .map_err(|_| ImportError::BuilderError(format!("Invalid id: {raw}")))
}

async fn print_recipe(store: &RecipeStore, id: i64) -> Result<(), StoreError> {
    let stored = store.get_recipe(id).await?;
    let recipe = &stored.recipe;

    println!("{} (#{})", recipe.name, stored.id);
    for (label, value) in [
        ("Prep", &recipe.prep_time),
        ("Cook", &recipe.cook_time),
        ("Total", &recipe.total_time),
        ("Servings", &recipe.recipe_yield),
    ] {
        if !value.is_empty() {
            println!("{label}: {value}");
        }
    }
    println!("Original recipe: {}", recipe.url);
    if !recipe.description.is_empty() {
        println!("\n{}", recipe.description);
    }

    println!("\nIngredients");
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }
    println!("\nInstructions");
    for (n, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", n + 1, step);
    }
    Ok(())
}
