use crate::error::Result;
use crate::meals::MealGroups;
use crate::model::{DailyLogEntry, DietItem, Food};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    pub name: String,
    #[serde(default)]
    pub meals: MealGroups<DietItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub meals: MealGroups<DailyLogEntry>,
}

/// Everything an editing session works on: the food catalog, one diet and
/// one day of the consumption log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub foods: Vec<Food>,
    pub diet: DietPlan,
    pub daily_log: DailyLog,
}

impl DietPlan {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meals: MealGroups::new(),
        }
    }
}

impl DailyLog {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            meals: MealGroups::new(),
        }
    }
}

impl Document {
    #[must_use]
    pub fn new(diet: DietPlan, daily_log: DailyLog) -> Self {
        Self {
            foods: Vec::new(),
            diet,
            daily_log,
        }
    }

    #[must_use]
    pub fn food(&self, id: i64) -> Option<&Food> {
        self.foods.iter().find(|food| food.id == id)
    }

    /// Label shown for a log entry, falling back to the raw food id.
    #[must_use]
    pub fn food_label(&self, food_id: i64) -> String {
        self.food(food_id)
            .map_or_else(|| format!("food #{food_id}"), |food| food.name.clone())
    }

    /// Loads a document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (e.g., file not found, permission denied)
    /// - The content is not a valid JSON document
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let document = serde_json::from_str(&content)?;
        Ok(document)
    }

    /// Saves the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document cannot be serialized
    /// - The file cannot be written to disk (e.g., permission denied, disk full)
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Document {
        let bread = Food::new(1, "Bread");
        let mut diet = DietPlan::new("Cutting");
        diet.meals.push("Breakfast", DietItem::new(10, &bread, 50.0));
        let mut log = DailyLog::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        log.meals.push("Breakfast", DailyLogEntry::new(20, 1, 50.0));

        let mut document = Document::new(diet, log);
        document.foods.push(bread);
        document
    }

    #[test]
    fn test_food_lookup_and_labels() {
        let mut document = sample();
        document.foods.push(Food::new(2, "Milk"));

        assert_eq!(document.food(2).map(|food| food.name.as_str()), Some("Milk"));
        assert!(document.food(3).is_none());
        assert_eq!(document.food_label(1), "Bread");
        assert_eq!(document.food_label(2), "Milk");
        assert_eq!(document.food_label(3), "food #3");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.json");
        let document = sample();

        document.save(&path).unwrap();
        let loaded = Document::load(&path).unwrap();

        assert_eq!(loaded, document);
    }

    #[test]
    fn test_load_minimal_json() {
        let json = r#"{
            "diet": { "name": "Empty" },
            "daily_log": { "date": "2024-05-01" }
        }"#;
        let document: Document = serde_json::from_str(json).unwrap();

        assert!(document.foods.is_empty());
        assert!(document.diet.meals.is_empty());
        assert_eq!(document.daily_log.date.to_string(), "2024-05-01");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Document::load(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(crate::NutrackError::Io(_))));
    }
}
