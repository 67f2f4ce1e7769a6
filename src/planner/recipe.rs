//! Recipe records and the recipe catalog
//!
//! The catalog is owned by whoever stores the recipes; plan generation only
//! reads it. Usage counters change exclusively through
//! [`RecipeCatalog::commit_usage`], which callers invoke after accepting a plan.

use crate::error::{HearthError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Ingredient name as written in the recipe
    pub name: String,

    /// Amount in `unit`
    #[serde(default)]
    pub quantity: f64,

    /// Unit label (may be empty for countables)
    #[serde(default)]
    pub unit: String,

    /// Free-text notes, e.g. a unit conversion trail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Ingredient {
    /// Build an ingredient without notes
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            notes: None,
        }
    }
}

/// A recipe from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Category tags; a single string in the source document becomes one tag
    #[serde(default, deserialize_with = "one_or_many")]
    pub category: Vec<String>,

    /// Total cooking time in minutes
    #[serde(default, alias = "cookingTime")]
    pub cooking_time_minutes: u32,

    /// Ordered ingredient list
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,

    /// Favorite flag, subject to the weekly favorite quota
    #[serde(default)]
    pub favorite: bool,

    /// Last date the recipe was cooked
    #[serde(default, alias = "lastUsed")]
    pub last_used_date: Option<NaiveDate>,

    /// How many committed plans used this recipe
    #[serde(default)]
    pub times_used: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(many) => many,
    })
}

impl Recipe {
    /// Minimal recipe, mostly useful for tests and fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Vec::new(),
            cooking_time_minutes: 30,
            ingredients: Vec::new(),
            favorite: false,
            last_used_date: None,
            times_used: 0,
        }
    }

    /// Set category tags
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set cooking time
    pub fn with_cooking_time(mut self, minutes: u32) -> Self {
        self.cooking_time_minutes = minutes;
        self
    }

    /// Append an ingredient
    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Mark as favorite, optionally with a last-used date
    pub fn as_favorite(mut self, last_used: Option<NaiveDate>) -> Self {
        self.favorite = true;
        self.last_used_date = last_used;
        self
    }

    /// Case-insensitive category membership
    pub fn has_category(&self, category: &str) -> bool {
        self.category.iter().any(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Record that a recipe was cooked on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub recipe_id: String,
    pub date: NaiveDate,
}

/// The set of recipes the planner chooses from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// Wrap a list of recipes
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Load a catalog from a JSON array file
    ///
    /// # Errors
    ///
    /// Returns `HearthError::Config` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HearthError::Config(format!(
                "Failed to read recipe catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        let catalog: Self = serde_json::from_str(&contents).map_err(|e| {
            HearthError::Config(format!(
                "Failed to parse recipe catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!("Loaded {} recipes from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Write the catalog back as a pretty-printed JSON array
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// All recipes in catalog order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Look a recipe up by id
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Number of recipes
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True when the catalog holds no recipes
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Favorite-flagged recipes
    pub fn favorites(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(|r| r.favorite)
    }

    /// Apply usage records produced by an accepted plan
    ///
    /// Each record increments `times_used` and moves `last_used_date` forward
    /// (never backward). Records naming unknown recipes are skipped.
    ///
    /// # Returns
    ///
    /// The number of records applied
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use hearth::planner::{Recipe, RecipeCatalog, UsageRecord};
    ///
    /// let mut catalog = RecipeCatalog::new(vec![Recipe::new("1", "Stir Fry")]);
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// let applied = catalog.commit_usage(&[
    ///     UsageRecord { recipe_id: "1".into(), date },
    ///     UsageRecord { recipe_id: "missing".into(), date },
    /// ]);
    /// assert_eq!(applied, 1);
    /// assert_eq!(catalog.get("1").unwrap().times_used, 1);
    /// assert_eq!(catalog.get("1").unwrap().last_used_date, Some(date));
    /// ```
    pub fn commit_usage(&mut self, records: &[UsageRecord]) -> usize {
        let mut applied = 0;
        for record in records {
            let Some(recipe) = self.recipes.iter_mut().find(|r| r.id == record.recipe_id) else {
                tracing::warn!("Skipping usage for unknown recipe {}", record.recipe_id);
                continue;
            };
            recipe.times_used += 1;
            recipe.last_used_date = Some(match recipe.last_used_date {
                Some(previous) if previous > record.date => previous,
                _ => record.date,
            });
            applied += 1;
        }
        applied
    }
}
