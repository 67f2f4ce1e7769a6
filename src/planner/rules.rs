//! Planner rule configuration
//!
//! Rules are plain data deserialized from the `planner.rules` section of the
//! configuration file. Every field has a default matching the household
//! conventions the planner was built around: dinners only, Friday and
//! Saturday are takeaway nights, no pasta after rice (or pasta after pasta),
//! and at most two favorites a week.

use crate::error::{HearthError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week as used in plans and rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days, Monday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Lowercase label, e.g. `"friday"`
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Saturday and Sunday
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// The following day, wrapping Sunday to Monday
    pub fn succ(self) -> Weekday {
        Self::from(chrono::Weekday::from(self).succ())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = HearthError;

    /// Accepts full names and three-letter abbreviations, any case
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.label() == lowered || day.label()[..3] == lowered)
            .ok_or_else(|| HearthError::InvalidPlanDay(format!("Unknown weekday: {}", s)))
    }
}

/// Maximum cooking time per class of day, in minutes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookingTimeLimits {
    /// Monday to Friday
    #[serde(default = "default_weekday_minutes")]
    pub weekday: u32,

    /// Saturday and Sunday
    #[serde(default = "default_weekend_minutes")]
    pub weekend: u32,
}

fn default_weekday_minutes() -> u32 {
    60
}

fn default_weekend_minutes() -> u32 {
    120
}

impl Default for CookingTimeLimits {
    fn default() -> Self {
        Self {
            weekday: default_weekday_minutes(),
            weekend: default_weekend_minutes(),
        }
    }
}

/// Limits on favorite-flagged recipes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteRules {
    /// Maximum favorites per generated week
    #[serde(default = "default_max_favorites")]
    pub max_per_week: usize,

    /// Minimum days between two uses of the same favorite
    #[serde(default = "default_min_days_between")]
    pub min_days_between: u32,
}

fn default_max_favorites() -> usize {
    2
}

fn default_min_days_between() -> u32 {
    7
}

impl Default for FavoriteRules {
    fn default() -> Self {
        Self {
            max_per_week: default_max_favorites(),
            min_days_between: default_min_days_between(),
        }
    }
}

/// Complete rule set for weekly plan generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannerRules {
    /// Day the plan starts on
    #[serde(default = "default_first_day")]
    pub first_day: Weekday,

    /// Days that are always takeaway
    #[serde(default = "default_takeaway_days")]
    pub takeaway_days: Vec<Weekday>,

    /// Cooking time limits
    #[serde(default)]
    pub max_cooking_minutes: CookingTimeLimits,

    /// Category pairs that may not fall inside the same diversity window
    #[serde(default = "default_exclusive_categories")]
    pub exclusive_categories: Vec<[String; 2]>,

    /// Treat a repeated category inside the diversity window as a conflict
    #[serde(default = "default_avoid_repeat_categories")]
    pub avoid_repeat_categories: bool,

    /// Number of most recent dinner days checked for category conflicts
    #[serde(default = "default_diversity_days")]
    pub diversity_days: usize,

    /// Favorite quota and spacing
    #[serde(default)]
    pub favorites: FavoriteRules,
}

fn default_first_day() -> Weekday {
    Weekday::Monday
}

fn default_takeaway_days() -> Vec<Weekday> {
    vec![Weekday::Friday, Weekday::Saturday]
}

fn default_exclusive_categories() -> Vec<[String; 2]> {
    vec![["pasta".to_string(), "rice".to_string()]]
}

fn default_avoid_repeat_categories() -> bool {
    true
}

fn default_diversity_days() -> usize {
    3
}

impl Default for PlannerRules {
    fn default() -> Self {
        Self {
            first_day: default_first_day(),
            takeaway_days: default_takeaway_days(),
            max_cooking_minutes: CookingTimeLimits::default(),
            exclusive_categories: default_exclusive_categories(),
            avoid_repeat_categories: default_avoid_repeat_categories(),
            diversity_days: default_diversity_days(),
            favorites: FavoriteRules::default(),
        }
    }
}

impl PlannerRules {
    /// Whether `day` is configured as a takeaway night
    pub fn is_takeaway(&self, day: Weekday) -> bool {
        self.takeaway_days.contains(&day)
    }

    /// Cooking time ceiling for `day`
    pub fn max_cooking_for(&self, day: Weekday) -> u32 {
        if day.is_weekend() {
            self.max_cooking_minutes.weekend
        } else {
            self.max_cooking_minutes.weekday
        }
    }

    /// Whether two single categories conflict under these rules
    ///
    /// Comparison is case-insensitive and pairs are symmetric.
    pub fn category_pair_conflicts(&self, a: &str, b: &str) -> bool {
        if self.avoid_repeat_categories && a.eq_ignore_ascii_case(b) {
            return true;
        }
        self.exclusive_categories.iter().any(|[x, y]| {
            (x.eq_ignore_ascii_case(a) && y.eq_ignore_ascii_case(b))
                || (x.eq_ignore_ascii_case(b) && y.eq_ignore_ascii_case(a))
        })
    }

    /// Whether any category of `a` conflicts with any category of `b`
    ///
    /// # Examples
    ///
    /// ```
    /// use hearth::planner::PlannerRules;
    ///
    /// let rules = PlannerRules::default();
    /// let pasta = vec!["Pasta".to_string()];
    /// let rice = vec!["rice".to_string(), "asian".to_string()];
    /// let seafood = vec!["seafood".to_string()];
    /// assert!(rules.categories_conflict(&pasta, &rice));
    /// assert!(rules.categories_conflict(&pasta, &pasta));
    /// assert!(!rules.categories_conflict(&pasta, &seafood));
    /// ```
    pub fn categories_conflict(&self, a: &[String], b: &[String]) -> bool {
        a.iter()
            .any(|x| b.iter().any(|y| self.category_pair_conflicts(x, y)))
    }

    /// Validate ranges and names
    ///
    /// # Errors
    ///
    /// Returns `HearthError::Config` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if self.max_cooking_minutes.weekday == 0 || self.max_cooking_minutes.weekend == 0 {
            return Err(HearthError::Config(
                "planner.rules.max_cooking_minutes must be greater than 0".to_string(),
            )
            .into());
        }

        if self.favorites.max_per_week > 7 {
            return Err(HearthError::Config(
                "planner.rules.favorites.max_per_week must be at most 7".to_string(),
            )
            .into());
        }

        if self.diversity_days > 7 {
            return Err(HearthError::Config(
                "planner.rules.diversity_days must be at most 7".to_string(),
            )
            .into());
        }

        if self
            .exclusive_categories
            .iter()
            .any(|[a, b]| a.trim().is_empty() || b.trim().is_empty())
        {
            return Err(HearthError::Config(
                "planner.rules.exclusive_categories cannot contain empty names".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
