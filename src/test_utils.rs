//! Test utilities for Hearth
//!
//! Temporary directories, fixture documents and assertion helpers shared by
//! unit tests.

use crate::config::{Config, StorageBackend};
use crate::planner::{Ingredient, Recipe, RecipeCatalog};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error's display text contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Session-manager document with home, work and admin contexts
pub fn session_manager_json() -> String {
    r#"{
  "sessions": {
    "home": {
      "name": "Home Bot",
      "persona": "Family assistant",
      "topics": ["recipe", "shopping list", "dinner", "meal plan", "groceries"],
      "telegramAccount": "hearth_home_bot"
    },
    "work": {
      "name": "Work Bot",
      "persona": "Business assistant",
      "topics": ["project", "client", "meeting", "invoice"]
    },
    "admin": {
      "name": "Admin Bot",
      "persona": "Technical assistant",
      "topics": ["server", "backup", "deploy"]
    }
  },
  "sessionMapping": {
    "agent:main:telegram:home:dm:1": "home",
    "agent:main:telegram:work:dm:1": "work",
    "agent:main:telegram:admin:dm:1": "admin"
  },
  "autoSwitchPatterns": {
    "home": ["milk", "chicken"],
    "admin": ["system", "config"]
  }
}"#
    .to_string()
}

/// Six recipes across distinct categories, one favorite
pub fn sample_catalog() -> RecipeCatalog {
    RecipeCatalog::new(vec![
        Recipe::new("1", "Spaghetti Bolognese")
            .with_categories(["pasta"])
            .with_ingredient(Ingredient::new("Spaghetti", 400.0, "g"))
            .with_ingredient(Ingredient::new("Beef mince", 500.0, "g")),
        Recipe::new("2", "Chicken Fried Rice")
            .with_categories(["rice"])
            .with_ingredient(Ingredient::new("Rice", 300.0, "g"))
            .with_ingredient(Ingredient::new("Chicken thighs", 400.0, "g")),
        Recipe::new("3", "Baked Salmon")
            .with_categories(["seafood"])
            .with_ingredient(Ingredient::new("Salmon fillet", 2.0, "piece")),
        Recipe::new("4", "Veggie Curry")
            .with_categories(["curry"])
            .with_ingredient(Ingredient::new("Tomato", 2.0, "piece")),
        Recipe::new("5", "Beef Tacos")
            .with_categories(["mexican"])
            .with_ingredient(Ingredient::new("Tomato", 2.0, "piece")),
        Recipe::new("6", "Sunday Roast")
            .with_categories(["roast"])
            .with_cooking_time(110)
            .as_favorite(None),
    ])
}

/// Configuration rooted in `dir` with fixtures written to disk
pub fn test_config(dir: &TempDir) -> Config {
    let sessions = create_test_file(dir, "session-manager.json", &session_manager_json());
    let recipes = dir.path().join("recipes.json");
    sample_catalog()
        .save(&recipes)
        .expect("Failed to write recipe fixture");

    let mut config = Config::default();
    config.routing.session_manager_path = sessions;
    config.planner.catalog_path = recipes;
    config.storage.backend = StorageBackend::Json;
    config.storage.data_dir = Some(dir.path().join("data"));
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HearthError;
    use crate::routing::ContextRegistry;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(HearthError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_fixtures_are_consistent() {
        let dir = temp_dir();
        let config = test_config(&dir);
        assert!(config.validate().is_ok());
        let registry = ContextRegistry::load(&config.routing.session_manager_path).unwrap();
        assert_eq!(registry.contexts().len(), 3);
        let catalog = RecipeCatalog::load(&config.planner.catalog_path).unwrap();
        assert_eq!(catalog.len(), 6);
    }
}
