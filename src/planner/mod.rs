//! Weekly dinner planning
//!
//! This module contains:
//! - Recipe records and the catalog they live in
//! - Planner rules (takeaway days, cooking time, category diversity, favorites)
//! - Plan generation with recorded fallback tiers
//! - Manual swaps, grocery aggregation and metric conversion

pub mod assigner;
pub mod grocery;
pub mod recipe;
pub mod rules;
pub mod swap;
pub mod units;

pub use assigner::{
    generate_weekly_plan, week_start, FallbackTier, MealKind, PlanDay, WeeklyPlan, TAKEAWAY_NOTE,
};
pub use grocery::{build_grocery_list, GroceryCategorizer, GroceryItem, GroceryList};
pub use recipe::{Ingredient, Recipe, RecipeCatalog, UsageRecord};
pub use rules::{CookingTimeLimits, FavoriteRules, PlannerRules, Weekday};
pub use swap::{apply_swap, swap_options};
pub use units::{promote_metric, to_metric, to_metric_base};
