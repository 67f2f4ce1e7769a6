//! Imperial to metric ingredient conversion

use crate::planner::recipe::Ingredient;

/// Metric base a unit converts into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    Millilitres,
    Grams,
    Centimetres,
}

/// Conversion factor for a lowercase unit label
fn factor(unit: &str) -> Option<(f64, Base)> {
    let entry = match unit {
        "cup" | "cups" => (250.0, Base::Millilitres),
        "tbsp" | "tablespoon" | "tablespoons" => (15.0, Base::Millilitres),
        "tsp" | "teaspoon" | "teaspoons" => (5.0, Base::Millilitres),
        "fl oz" | "fl. oz" | "fluid ounce" | "fluid ounces" => (30.0, Base::Millilitres),
        "pint" | "pints" => (473.0, Base::Millilitres),
        "quart" | "quarts" => (946.0, Base::Millilitres),
        "gallon" | "gallons" => (3785.0, Base::Millilitres),
        "lb" | "lbs" | "pound" | "pounds" => (454.0, Base::Grams),
        "oz" | "ounce" | "ounces" => (28.0, Base::Grams),
        "inch" | "inches" | "in" => (2.54, Base::Centimetres),
        _ => return None,
    };
    Some(entry)
}

/// Scale from an already-metric unit to its base
fn metric_factor(unit: &str) -> Option<(f64, Base)> {
    let entry = match unit {
        "ml" | "millilitre" | "millilitres" | "milliliter" | "milliliters" => {
            (1.0, Base::Millilitres)
        }
        "l" | "litre" | "litres" | "liter" | "liters" => (1000.0, Base::Millilitres),
        "g" | "gram" | "grams" => (1.0, Base::Grams),
        "kg" | "kilogram" | "kilograms" => (1000.0, Base::Grams),
        "cm" => (1.0, Base::Centimetres),
        _ => return None,
    };
    Some(entry)
}

impl Base {
    fn label(self) -> &'static str {
        match self {
            Base::Millilitres => "ml",
            Base::Grams => "g",
            Base::Centimetres => "cm",
        }
    }

    fn from_label(unit: &str) -> Option<Self> {
        match unit {
            "ml" => Some(Base::Millilitres),
            "g" => Some(Base::Grams),
            "cm" => Some(Base::Centimetres),
            _ => None,
        }
    }
}

/// Whether `unit` is one [`to_metric`] would convert
pub fn is_imperial(unit: &str) -> bool {
    factor(unit.trim().to_lowercase().as_str()).is_some()
}

/// Convert an ingredient to metric units
///
/// Volumes become `ml` (or `L` from one litre up), weights `g` (or `kg`),
/// lengths `cm`. Small units are rounded to whole numbers, large ones to two
/// decimals. The original amount is kept in `notes`. Ingredients in units
/// that are already metric, or unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use hearth::planner::{to_metric, Ingredient};
///
/// let flour = to_metric(&Ingredient::new("flour", 2.0, "cups"));
/// assert_eq!(flour.quantity, 500.0);
/// assert_eq!(flour.unit, "ml");
/// assert_eq!(flour.notes.as_deref(), Some("2 cups"));
///
/// let beef = to_metric(&Ingredient::new("beef", 3.0, "lb"));
/// assert_eq!(beef.unit, "kg");
/// assert_eq!(beef.quantity, 1.36);
/// ```
pub fn to_metric(ingredient: &Ingredient) -> Ingredient {
    if !is_imperial(&ingredient.unit) {
        return ingredient.clone();
    }
    let base = to_metric_base(ingredient);
    let (quantity, unit) = promote_metric(base.quantity, &base.unit);
    Ingredient {
        quantity,
        unit,
        ..base
    }
}

/// Convert an ingredient to an unrounded `ml`, `g` or `cm` amount
///
/// Imperial units are converted and keep their original amount in `notes`;
/// `L` and `kg` are scaled down to `ml` and `g`. Anything else is returned
/// unchanged. Amounts in base units can be summed and then passed to
/// [`promote_metric`] for display.
pub fn to_metric_base(ingredient: &Ingredient) -> Ingredient {
    let unit = ingredient.unit.trim().to_lowercase();
    if let Some((multiplier, base)) = factor(&unit) {
        return Ingredient {
            name: ingredient.name.clone(),
            quantity: ingredient.quantity * multiplier,
            unit: base.label().to_string(),
            notes: Some(format!("{} {}", ingredient.quantity, ingredient.unit)),
        };
    }
    match metric_factor(&unit) {
        Some((multiplier, base)) => Ingredient {
            quantity: ingredient.quantity * multiplier,
            unit: base.label().to_string(),
            ..ingredient.clone()
        },
        None => ingredient.clone(),
    }
}

/// Round a base-unit amount for display, moving to `L` or `kg` from 1000 up
///
/// Units other than `ml`, `g` and `cm` are returned as given.
pub fn promote_metric(amount: f64, unit: &str) -> (f64, String) {
    let (quantity, unit) = match Base::from_label(unit) {
        Some(Base::Millilitres) if amount >= 1000.0 => (round_to(amount / 1000.0, 2), "L"),
        Some(Base::Millilitres) => (amount.round(), "ml"),
        Some(Base::Grams) if amount >= 1000.0 => (round_to(amount / 1000.0, 2), "kg"),
        Some(Base::Grams) => (amount.round(), "g"),
        Some(Base::Centimetres) => (round_to(amount, 1), "cm"),
        None => (amount, unit),
    };
    (quantity, unit.to_string())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
