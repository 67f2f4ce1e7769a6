//! Manual recipe swaps on an existing plan

use crate::error::{HearthError, Result};
use crate::planner::assigner::{FallbackTier, PlanDay, WeeklyPlan};
use crate::planner::recipe::{Recipe, RecipeCatalog};
use crate::planner::rules::{PlannerRules, Weekday};
use std::collections::HashSet;

fn dinner_day_index(plan: &WeeklyPlan, day: Weekday) -> Result<usize> {
    let index = plan
        .days()
        .iter()
        .position(|d| d.day == day)
        .ok_or_else(|| HearthError::InvalidPlanDay(format!("{} is not in the plan", day)))?;

    if !plan.days()[index].is_dinner() {
        return Err(HearthError::InvalidPlanDay(format!(
            "{} is a takeaway day and has no recipe to swap",
            day
        ))
        .into());
    }
    Ok(index)
}

/// Catalog recipes that could replace the dinner on `day`
///
/// Recipes already used anywhere in the plan are excluded.
///
/// # Errors
///
/// Returns `HearthError::InvalidPlanDay` if `day` is missing or a takeaway day
pub fn swap_options<'c>(
    plan: &WeeklyPlan,
    catalog: &'c RecipeCatalog,
    day: Weekday,
) -> Result<Vec<&'c Recipe>> {
    dinner_day_index(plan, day)?;

    let in_plan: HashSet<&str> = plan
        .days()
        .iter()
        .filter_map(|d| d.recipe.as_ref().map(|r| r.id.as_str()))
        .collect();

    Ok(catalog
        .recipes()
        .iter()
        .filter(|r| !in_plan.contains(r.id.as_str()))
        .collect())
}

/// Replace the dinner on `day` with the catalog recipe `recipe_id`
///
/// The swap always goes ahead and the day is annotated with the recipe it
/// replaced. The new recipe is then checked against `rules` and the day
/// records the tier it actually satisfies: `Strict` only when no rule is
/// broken, `RelaxedCategories` when it only clashes with the diversity
/// window, `AnyRecipe` otherwise.
///
/// # Errors
///
/// Returns `HearthError::InvalidPlanDay` if `day` cannot hold a recipe and
/// `HearthError::UnknownRecipe` if `recipe_id` is not in the catalog
pub fn apply_swap<'p>(
    plan: &'p mut WeeklyPlan,
    catalog: &RecipeCatalog,
    rules: &PlannerRules,
    day: Weekday,
    recipe_id: &str,
) -> Result<&'p PlanDay> {
    let index = dinner_day_index(plan, day)?;
    let replacement = catalog
        .get(recipe_id)
        .ok_or_else(|| HearthError::UnknownRecipe(recipe_id.to_string()))?
        .clone();

    let entry = &mut plan.days_mut()[index];
    let previous = entry
        .recipe
        .as_ref()
        .map(|r| r.name.clone())
        .unwrap_or_default();

    tracing::info!("Swapping {} on {} for {}", previous, day, replacement.name);

    entry.is_favorite = replacement.favorite;
    entry.recipe = Some(replacement);
    entry.note = Some(format!("Swapped from {}", previous));

    let tier = swap_tier(plan, index, rules);
    if tier != FallbackTier::Strict {
        tracing::warn!("Swap on {} breaks planner rules; recorded tier {:?}", day, tier);
    }
    plan.days_mut()[index].fallback_tier = tier;

    Ok(&plan.days()[index])
}

/// Tier satisfied by the dinner at `index` given the rest of the plan
fn swap_tier(plan: &WeeklyPlan, index: usize, rules: &PlannerRules) -> FallbackTier {
    let days = plan.days();
    let Some(recipe) = days[index].recipe.as_ref() else {
        return FallbackTier::Strict;
    };

    let fits_time = recipe.cooking_time_minutes <= rules.max_cooking_for(days[index].day);
    let fits_favorites = !recipe.favorite || favorite_rules_hold(plan, index, rules);

    // Dinners sharing a diversity window with this day; takeaways reset it
    let before = days[..index]
        .iter()
        .rev()
        .map_while(|d| d.recipe.as_ref())
        .take(rules.diversity_days);
    let after = days[index + 1..]
        .iter()
        .map_while(|d| d.recipe.as_ref())
        .take(rules.diversity_days);
    let window_conflict = before
        .chain(after)
        .any(|other| rules.categories_conflict(&recipe.category, &other.category));

    let adjacent = [
        index.checked_sub(1).and_then(|i| days[i].recipe.as_ref()),
        days.get(index + 1).and_then(|d| d.recipe.as_ref()),
    ];
    let repeats_neighbor = adjacent.iter().flatten().any(|other| {
        recipe
            .category
            .iter()
            .any(|c| other.category.iter().any(|o| o.eq_ignore_ascii_case(c)))
    });

    if fits_time && fits_favorites && !window_conflict {
        FallbackTier::Strict
    } else if fits_time && fits_favorites && !repeats_neighbor {
        FallbackTier::RelaxedCategories
    } else {
        FallbackTier::AnyRecipe
    }
}

/// Weekly quota and spacing for a favorite placed at `index`
fn favorite_rules_hold(plan: &WeeklyPlan, index: usize, rules: &PlannerRules) -> bool {
    let days = plan.days();
    let Some(recipe) = days[index].recipe.as_ref() else {
        return true;
    };
    let date = days[index].date;
    let min_gap = i64::from(rules.favorites.min_days_between);

    if plan.favorite_count() > rules.favorites.max_per_week {
        return false;
    }

    let last_used_ok = recipe
        .last_used_date
        .map_or(true, |last| (date - last).num_days() >= min_gap);
    let spaced_in_plan = days.iter().enumerate().all(|(i, other)| {
        i == index
            || other.recipe.as_ref().map_or(true, |r| r.id != recipe.id)
            || (date - other.date).num_days().abs() >= min_gap
    });

    last_used_ok && spaced_in_plan
}
