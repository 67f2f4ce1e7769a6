//! Grocery list aggregation for a weekly plan

use crate::error::Result;
use crate::matching::PatternList;
use crate::planner::assigner::WeeklyPlan;
use crate::planner::recipe::Ingredient;
use crate::planner::rules::Weekday;
use crate::planner::units::{promote_metric, to_metric_base};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Category for items no rule matches
pub const OTHER_CATEGORY: &str = "Other";

/// Ordered category rules; the first matching rule wins
const CATEGORY_RULES: [(&str, &str); 9] = [
    (
        "Fruits & Vegetables",
        "(apple|banana|orange|lemon|lime|grape|berry|melon|pineapple|mango|avocado|tomato|potato|onion|garlic|carrot|lettuce|spinach|broccoli|cauliflower|capsicum|zucchini|cucumber|celery|mushroom|herb|basil|parsley|coriander|mint|ginger)",
    ),
    (
        "Meat & Seafood",
        "(beef|chicken|pork|lamb|turkey|duck|fish|salmon|tuna|prawn|shrimp|crab|lobster|meat|mince|steak|bacon|sausage|ham|prosciutto)",
    ),
    (
        "Dairy & Eggs",
        "(milk|cheese|butter|cream|yogurt|yoghurt|parmesan|cheddar|mozzarella|feta|brie|camembert|ricotta|egg)",
    ),
    (
        "Dry Goods",
        "(flour|sugar|salt|pepper|spice|herb dried|pasta|rice|noodle|bean|lentil|chickpea|oat|quinoa|couscous|breadcrumb|cereal|muesli)",
    ),
    (
        "Canned & Jarred",
        "(canned|tin|jar|passata|tomato paste|beans canned|tuna canned|corn canned|peas canned|olive|pickle|relish|sauce bottled|jam|honey|syrup)",
    ),
    (
        "Sauces & Condiments",
        "(soy sauce|worcestershire|oyster sauce|fish sauce|vinegar|oil|olive oil|ketchup|mayonnaise|mustard|bbq sauce|hot sauce|chilli sauce|dressing)",
    ),
    (
        "Baking",
        "(baking powder|baking soda|yeast|vanilla|cocoa|chocolate|chips|nuts|almond|walnut|pecan|hazelnut|seed|sesame|chia|flax)",
    ),
    (
        "Beverages",
        "(water|juice|soda|soft drink|beer|wine|spirit|coffee|tea|milk alternative)",
    ),
    (
        "Frozen",
        "(frozen|ice cream|peas frozen|berries frozen|vegetable mix frozen)",
    ),
];

/// One aggregated line of the grocery list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    /// Display name, as first seen in the plan
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    /// Plan days that need this item, in plan order
    pub from_days: Vec<Weekday>,
    #[serde(default)]
    pub checked: bool,
}

/// Aggregated grocery list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    /// Items in first-seen order
    pub items: Vec<GroceryItem>,
    /// Items grouped by category name
    pub categorized: BTreeMap<String, Vec<GroceryItem>>,
    pub total_items: usize,
}

impl GroceryList {
    /// Find an item by name and unit, case-insensitively
    pub fn find(&self, name: &str, unit: &str) -> Option<&GroceryItem> {
        let wanted = aggregation_key(name, unit);
        self.items
            .iter()
            .find(|item| aggregation_key(&item.name, &item.unit) == wanted)
    }
}

/// Assigns grocery categories by keyword rules
#[derive(Debug, Clone)]
pub struct GroceryCategorizer {
    rules: PatternList<&'static str>,
}

impl GroceryCategorizer {
    /// Compile the built-in category rules
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: PatternList::new(CATEGORY_RULES.to_vec())?,
        })
    }

    /// Category for an item name, `"Other"` when nothing matches
    pub fn categorize(&self, item_name: &str) -> &'static str {
        self.rules
            .first_match(item_name)
            .copied()
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Category names in evaluation order, `"Other"` last
    pub fn categories(&self) -> Vec<&'static str> {
        self.rules
            .labels()
            .copied()
            .chain(std::iter::once(OTHER_CATEGORY))
            .collect()
    }

    /// Aggregate the ingredients of every dinner day in `plan`
    ///
    /// Quantities are summed per case-insensitive `(name, unit)` pair. With
    /// `metric` set, ingredients are reduced to `ml`, `g` or `cm` before
    /// aggregation so that `2 cups` and `500 ml` of the same item land on one
    /// line; totals are rounded and moved to `L` or `kg` after summing.
    pub fn build(&self, plan: &WeeklyPlan, metric: bool) -> GroceryList {
        let mut items: Vec<GroceryItem> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for day in plan.days() {
            let Some(recipe) = &day.recipe else {
                continue;
            };
            for ingredient in &recipe.ingredients {
                let ingredient: Ingredient = if metric {
                    to_metric_base(ingredient)
                } else {
                    ingredient.clone()
                };
                let key = aggregation_key(&ingredient.name, &ingredient.unit);

                match index.get(&key) {
                    Some(&position) => {
                        let item = &mut items[position];
                        item.quantity += ingredient.quantity;
                        if !item.from_days.contains(&day.day) {
                            item.from_days.push(day.day);
                        }
                    }
                    None => {
                        index.insert(key, items.len());
                        items.push(GroceryItem {
                            category: self.categorize(&ingredient.name).to_string(),
                            name: ingredient.name.trim().to_string(),
                            quantity: ingredient.quantity,
                            unit: ingredient.unit,
                            from_days: vec![day.day],
                            checked: false,
                        });
                    }
                }
            }
        }

        if metric {
            for item in &mut items {
                let (quantity, unit) = promote_metric(item.quantity, &item.unit);
                item.quantity = quantity;
                item.unit = unit;
            }
        }

        let mut categorized: BTreeMap<String, Vec<GroceryItem>> = BTreeMap::new();
        for item in &items {
            categorized
                .entry(item.category.clone())
                .or_default()
                .push(item.clone());
        }

        tracing::debug!(
            "Grocery list: {} items in {} categories",
            items.len(),
            categorized.len()
        );

        GroceryList {
            total_items: items.len(),
            items,
            categorized,
        }
    }
}

/// Aggregate a plan into a grocery list with the built-in categories
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hearth::planner::{build_grocery_list, generate_weekly_plan, Ingredient, PlannerRules, Recipe};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let catalog = vec![Recipe::new("1", "Salad")
///     .with_categories(["salad"])
///     .with_ingredient(Ingredient::new("Tomato", 2.0, "piece"))];
/// let rules = PlannerRules { avoid_repeat_categories: false, ..Default::default() };
/// let start = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let plan = generate_weekly_plan(&catalog, &rules, start, &mut StdRng::seed_from_u64(1)).unwrap();
/// let list = build_grocery_list(&plan, false).unwrap();
/// assert_eq!(list.total_items, 1);
/// assert_eq!(list.items[0].quantity, 10.0);
/// assert_eq!(list.items[0].category, "Fruits & Vegetables");
/// ```
pub fn build_grocery_list(plan: &WeeklyPlan, metric: bool) -> Result<GroceryList> {
    Ok(GroceryCategorizer::new()?.build(plan, metric))
}

fn aggregation_key(name: &str, unit: &str) -> (String, String) {
    (name.trim().to_lowercase(), unit.trim().to_lowercase())
}
