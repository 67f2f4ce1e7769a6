use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(dead_code)]
pub const SESSION_MANAGER: &str = r#"{
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
}"#;

#[allow(dead_code)]
pub const RECIPES: &str = r#"[
  {"id": "1", "name": "Spaghetti Bolognese", "category": "pasta", "cookingTime": 45,
   "ingredients": [{"name": "Spaghetti", "quantity": 400, "unit": "g"},
                   {"name": "Tomato", "quantity": 2, "unit": "piece"}],
   "favorite": true},
  {"id": "2", "name": "Chicken Fried Rice", "category": "rice", "cookingTime": 30,
   "ingredients": [{"name": "Rice", "quantity": 300, "unit": "g"},
                   {"name": "Chicken thighs", "quantity": 400, "unit": "g"}]},
  {"id": "3", "name": "Baked Salmon", "category": "seafood", "cookingTime": 40,
   "ingredients": [{"name": "Salmon fillet", "quantity": 2, "unit": "piece"}]},
  {"id": "4", "name": "Veggie Curry", "category": "curry", "cookingTime": 35,
   "ingredients": [{"name": "Tomato", "quantity": 2, "unit": "piece"},
                   {"name": "Coconut milk", "quantity": 1, "unit": "cup"}]},
  {"id": "5", "name": "Beef Tacos", "category": "mexican", "cookingTime": 25,
   "ingredients": [{"name": "Tomato", "quantity": 2, "unit": "piece"},
                   {"name": "Beef mince", "quantity": 500, "unit": "g"}],
   "favorite": true}
]"#;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Temporary workspace with fixtures and a config file pointing at them
#[allow(dead_code)]
pub fn temp_workspace() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let sessions = write(temp_dir.path(), "session-manager.json", SESSION_MANAGER);
    let recipes = write(temp_dir.path(), "recipes.json", RECIPES);
    let data_dir = temp_dir.path().join("data");

    let config = format!(
        r#"
routing:
  session_manager_path: {}
  context_history_limit: 3
  central_history_limit: 5

planner:
  catalog_path: {}

storage:
  backend: json
  data_dir: {}

logging:
  level: warn
"#,
        sessions.display(),
        recipes.display(),
        data_dir.display()
    );
    let config_path = write(temp_dir.path(), "config.yaml", &config);
    (temp_dir, config_path)
}

#[allow(dead_code)]
fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}
