use crate::commands::store_from_config;
use crate::config::Config;
use crate::error::{HearthError, Result};
use crate::planner::{
    apply_swap, generate_weekly_plan, swap_options, FallbackTier, GroceryCategorizer,
    RecipeCatalog, Weekday, WeeklyPlan,
};
use crate::storage::{load_document, store_document, DocumentStore};
use chrono::NaiveDate;
use colored::Colorize;
use prettytable::{format, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Store key of the current weekly plan
pub const PLAN_KEY: &str = "meal-plan";

/// Load the saved plan
///
/// # Errors
///
/// Returns `HearthError::Storage` when no plan has been generated yet
pub fn load_saved_plan(store: &dyn DocumentStore) -> Result<WeeklyPlan> {
    load_document(store, PLAN_KEY)?.ok_or_else(|| {
        HearthError::Storage("No saved meal plan found; run `hearth plan` first".to_string())
            .into()
    })
}

/// Generate, save and print a weekly plan
pub fn run_plan(
    config: &Config,
    start: Option<NaiveDate>,
    seed: Option<u64>,
    commit: bool,
    json: bool,
) -> Result<()> {
    let mut catalog = RecipeCatalog::load(&config.planner.catalog_path)?;
    let store = store_from_config(config)?;

    let mut rng = match seed.or(config.planner.seed) {
        Some(seed) => {
            tracing::debug!("Using plan seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };
    let start = start.unwrap_or_else(|| chrono::Local::now().date_naive());

    let plan = generate_weekly_plan(catalog.recipes(), &config.planner.rules, start, &mut rng)?;
    store_document(store.as_ref(), PLAN_KEY, &plan)?;
    tracing::info!("Saved plan starting {:?}", plan.start_date());

    if commit {
        let applied = catalog.commit_usage(&plan.usage());
        catalog.save(&config.planner.catalog_path)?;
        tracing::info!("Recorded usage for {} dinners", applied);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
        if commit {
            println!("{}", "Recipe usage recorded in the catalog.".green());
        }
    }
    Ok(())
}

fn print_plan(plan: &WeeklyPlan) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "Day".bold(),
        "Date".bold(),
        "Dinner".bold(),
        "Minutes".bold(),
        "Notes".bold()
    ]);

    for day in plan.days() {
        let (dinner, minutes) = match &day.recipe {
            Some(recipe) => {
                let name = if day.is_favorite {
                    format!("{} ★", recipe.name).yellow().to_string()
                } else {
                    recipe.name.clone()
                };
                (name, recipe.cooking_time_minutes.to_string())
            }
            None => ("Takeaway".dimmed().to_string(), "-".to_string()),
        };

        let mut notes = Vec::new();
        if day.fallback_tier != FallbackTier::Strict {
            notes.push(format!("relaxed rules ({})", day.fallback_tier.level()));
        }
        if let Some(note) = &day.note {
            notes.push(note.clone());
        }

        table.add_row(prettytable::row![
            day.day.label(),
            day.date.format("%Y-%m-%d").to_string(),
            dinner,
            minutes,
            notes.join("; ")
        ]);
    }

    println!("\nWeekly plan:");
    table.printstd();
    if plan.used_fallback_tier() != FallbackTier::Strict {
        println!(
            "{}",
            "Some days could not satisfy every rule; see notes.".yellow()
        );
    }
    println!();
}

/// Print the grocery list for the saved plan
pub fn run_groceries(config: &Config, metric: bool, json: bool) -> Result<()> {
    let store = store_from_config(config)?;
    let plan = load_saved_plan(store.as_ref())?;
    let categorizer = GroceryCategorizer::new()?;
    let list = categorizer.build(&plan, metric);

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.items.is_empty() {
        println!("{}", "The saved plan has no ingredients.".yellow());
        return Ok(());
    }

    println!("\nGrocery list ({} items):", list.total_items);
    for category in categorizer.categories() {
        let Some(items) = list.categorized.get(category) else {
            continue;
        };
        println!("\n{}", category.bold());
        for item in items {
            let amount = if item.unit.is_empty() {
                format!("{}", item.quantity)
            } else {
                format!("{} {}", item.quantity, item.unit)
            };
            println!("  [ ] {} - {}", item.name, amount.cyan());
        }
    }
    println!();
    Ok(())
}

/// List swap candidates for a day, or swap in a recipe and save the plan
pub fn run_swap(config: &Config, day: Weekday, recipe_id: Option<&str>) -> Result<()> {
    let store = store_from_config(config)?;
    let mut plan = load_saved_plan(store.as_ref())?;
    let catalog = RecipeCatalog::load(&config.planner.catalog_path)?;

    let Some(recipe_id) = recipe_id else {
        let options = swap_options(&plan, &catalog, day)?;
        if options.is_empty() {
            println!("{}", "Every catalog recipe is already in the plan.".yellow());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row![
            "ID".bold(),
            "Recipe".bold(),
            "Category".bold(),
            "Minutes".bold()
        ]);
        for recipe in options {
            table.add_row(prettytable::row![
                recipe.id.cyan(),
                recipe.name,
                recipe.category.join(", "),
                recipe.cooking_time_minutes
            ]);
        }
        println!("\nSwap options for {}:", day);
        table.printstd();
        println!(
            "Use {} to swap.",
            format!("hearth swap {} --recipe <ID>", day).cyan()
        );
        println!();
        return Ok(());
    };

    let swapped = apply_swap(&mut plan, &catalog, &config.planner.rules, day, recipe_id)?;
    let name = swapped
        .recipe
        .as_ref()
        .map(|r| r.name.clone())
        .unwrap_or_default();
    let tier = swapped.fallback_tier;
    store_document(store.as_ref(), PLAN_KEY, &plan)?;
    println!("{}", format!("{} is now {}", day, name).green());
    if tier != FallbackTier::Strict {
        println!(
            "{}",
            format!("This swap breaks some planner rules (tier {}).", tier.level()).yellow()
        );
    }
    Ok(())
}
