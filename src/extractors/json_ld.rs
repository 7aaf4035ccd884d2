use super::{Extractor, ParsingContext};
use crate::error::ExtractError;
use crate::model::{Recipe, UNTITLED_RECIPE};
use log::{debug, warn};
use scraper::{Html, Selector};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{Number, Value};
use std::sync::LazyLock;

const JSON_LD_MEDIA_TYPE: &str = "application/ld+json";

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("static selector is valid"));

pub struct JsonLdExtractor;

/// The shapes a decoded JSON-LD value can take while searching for a recipe.
enum Node<'a> {
    Sequence(&'a [Value]),
    Recipe(&'a Value),
    Graph(&'a Value),
    Unknown,
}

impl<'a> Node<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Node::Sequence(items),
            Value::Object(map) => {
                if map.get("@type").and_then(Value::as_str) == Some("Recipe") {
                    Node::Recipe(value)
                } else if let Some(graph) = map.get("@graph").filter(|g| !g.is_null()) {
                    Node::Graph(graph)
                } else {
                    Node::Unknown
                }
            }
            _ => Node::Unknown,
        }
    }
}

/// Depth-first search for the first Recipe entity, in document order.
fn find_recipe(value: &Value) -> Option<&Value> {
    match Node::classify(value) {
        Node::Sequence(items) => items.iter().find_map(find_recipe),
        Node::Recipe(entity) => Some(entity),
        Node::Graph(graph) => find_recipe(graph),
        Node::Unknown => None,
    }
}

fn is_json_ld(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .map(|t| t.trim().eq_ignore_ascii_case(JSON_LD_MEDIA_TYPE))
        .unwrap_or(false)
}

/// Text of every JSON-LD script, in document order.
fn json_ld_blocks(document: &Html) -> Vec<String> {
    document
        .select(&SCRIPT_SELECTOR)
        .filter(|script| script.value().attr("type").is_some_and(is_json_ld))
        .map(|script| script.text().collect())
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct JsonLdRecipe {
    name: Option<TextValue>,
    description: Option<TextValue>,
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<OneOrMany<TextValue>>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<OneOrMany<TextValue>>,
    #[serde(rename = "prepTime")]
    prep_time: Option<TextValue>,
    #[serde(rename = "cookTime")]
    cook_time: Option<TextValue>,
    #[serde(rename = "totalTime")]
    total_time: Option<TextValue>,
}

/// Anything string-like. Other shapes are accepted and ignored so a single
/// odd field never rejects the whole recipe.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    String(String),
    Number(Number),
    Other(IgnoredAny),
}

impl TextValue {
    fn into_text(self) -> Option<String> {
        match self {
            TextValue::String(s) => Some(s),
            TextValue::Number(n) => Some(n.to_string()),
            TextValue::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageEntry {
    String(String),
    Object(ImageObject),
    Other(IgnoredAny),
}

impl ImageEntry {
    fn into_url(self) -> Option<String> {
        match self {
            ImageEntry::String(url) => Some(url),
            ImageEntry::Object(obj) => Some(obj.url),
            ImageEntry::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageEntry>),
    Object(ImageObject),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionEntry>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionEntry {
    String(String),
    // Kept ahead of `Object`, which would otherwise accept arrays positionally
    Nested(Vec<IgnoredAny>),
    Object(InstructionObject),
    Other(IgnoredAny),
}

/// A keyed instruction entry: a HowToStep, a HowToSection, or anything
/// else carrying `text`.
#[derive(Debug, Deserialize)]
struct InstructionObject {
    #[serde(rename = "@type")]
    kind: Option<TextValue>,
    text: Option<TextValue>,
    #[serde(rename = "itemListElement")]
    item_list_element: Option<OneOrMany<SectionItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SectionItem {
    Nested(Vec<IgnoredAny>),
    Object { text: Option<TextValue> },
    Other(IgnoredAny),
}

impl SectionItem {
    fn into_text(self) -> Option<String> {
        match self {
            SectionItem::Object { text } => non_empty(text),
            SectionItem::Nested(_) | SectionItem::Other(_) => None,
        }
    }
}

impl InstructionObject {
    fn is_type(&self, expected: &str) -> bool {
        matches!(&self.kind, Some(TextValue::String(kind)) if kind == expected)
    }

    /// Own `text` wins; otherwise a HowToSection contributes its items' text.
    /// Items are not searched any deeper than one level.
    fn push_steps(self, steps: &mut Vec<String>) {
        let is_section = self.is_type("HowToSection");
        if let Some(text) = non_empty(self.text) {
            steps.push(text);
        } else if is_section {
            steps.extend(
                self.item_list_element
                    .into_iter()
                    .flat_map(OneOrMany::into_vec)
                    .filter_map(SectionItem::into_text),
            );
        }
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn non_empty(value: Option<TextValue>) -> Option<String> {
    value
        .and_then(TextValue::into_text)
        .filter(|text| !text.is_empty())
}

fn text_or_empty(value: Option<TextValue>) -> String {
    non_empty(value).unwrap_or_default()
}

impl JsonLdRecipe {
    fn into_recipe(self, url: &str) -> Recipe {
        let image = match self.image {
            Some(ImageType::String(url)) => url,
            Some(ImageType::Multiple(images)) => images
                .into_iter()
                .next()
                .and_then(ImageEntry::into_url)
                .unwrap_or_default(),
            Some(ImageType::Object(obj)) => obj.url,
            Some(ImageType::Other(_)) | None => String::new(),
        };

        let ingredients = match self.recipe_ingredient {
            Some(OneOrMany::Many(items)) => {
                items.into_iter().filter_map(TextValue::into_text).collect()
            }
            Some(OneOrMany::One(item)) => non_empty(Some(item)).into_iter().collect(),
            None => Vec::new(),
        };

        let instructions = match self.recipe_instructions {
            Some(RecipeInstructions::String(text)) if !text.is_empty() => vec![text],
            Some(RecipeInstructions::Multiple(entries)) => {
                let mut steps = Vec::new();
                for entry in entries {
                    match entry {
                        InstructionEntry::String(text) => steps.push(text),
                        InstructionEntry::Object(obj) => obj.push_steps(&mut steps),
                        InstructionEntry::Nested(_) | InstructionEntry::Other(_) => {}
                    }
                }
                steps
            }
            _ => Vec::new(),
        };

        // Only the first string-like entry of a list such as ["4", "4 servings"]
        let recipe_yield = match self.recipe_yield {
            Some(OneOrMany::Many(items)) => items
                .into_iter()
                .find_map(|item| non_empty(Some(item)))
                .unwrap_or_default(),
            Some(OneOrMany::One(item)) => text_or_empty(Some(item)),
            None => String::new(),
        };

        Recipe {
            name: non_empty(self.name).unwrap_or_else(|| UNTITLED_RECIPE.to_string()),
            url: url.to_string(),
            description: text_or_empty(self.description),
            image,
            prep_time: text_or_empty(self.prep_time),
            cook_time: text_or_empty(self.cook_time),
            total_time: text_or_empty(self.total_time),
            recipe_yield,
            ingredients,
            instructions,
        }
    }
}

fn normalize(entity: &Value, url: &str) -> Recipe {
    // Every field tolerates any shape, so this only fails on a non-object.
    let raw = JsonLdRecipe::deserialize(entity).unwrap_or_else(|e| {
        warn!("JsonLdExtractor: Could not read recipe fields: {}", e);
        JsonLdRecipe::default()
    });
    raw.into_recipe(url)
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ExtractError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let blocks = json_ld_blocks(&context.document);
        debug!("JsonLdExtractor: Found {} JSON-LD script tags", blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let json_ld = match serde_json::from_str::<Value>(block) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    warn!("JsonLdExtractor: Skipping JSON-LD block {}: {}", index, e);
                    continue;
                }
            };

            match find_recipe(&json_ld) {
                Some(entity) => {
                    debug!("JsonLdExtractor: Found recipe in JSON-LD block {}", index);
                    return Ok(normalize(entity, &context.url));
                }
                None => debug!("JsonLdExtractor: No recipe in JSON-LD block {}", index),
            }
        }

        debug!("JsonLdExtractor: No valid recipe found in any JSON-LD script");
        Err(ExtractError::NotFound)
    }
}
