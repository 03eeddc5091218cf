use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Records stored in a meal group are addressed by a stable row id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Composition of a food-database row, per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbohydrates: f64,
    #[serde(default)]
    pub fat: f64,
}

/// One planned portion inside a diet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietItem {
    pub id: i64,
    pub food_id: i64,
    pub food_label: String,
    /// Grams.
    pub quantity: f64,
    #[serde(default)]
    pub time: Option<NaiveTime>,
}

/// One line of the daily consumption log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub id: i64,
    pub food_id: i64,
    pub quantity: f64,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub consumed: bool,
}

impl Identified for DietItem {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for DailyLogEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Food {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            calories: 0.0,
            protein: 0.0,
            carbohydrates: 0.0,
            fat: 0.0,
        }
    }
}

impl DietItem {
    #[must_use]
    pub fn new(id: i64, food: &Food, quantity: f64) -> Self {
        Self {
            id,
            food_id: food.id,
            food_label: food.name.clone(),
            quantity,
            time: None,
        }
    }
}

impl DailyLogEntry {
    #[must_use]
    pub const fn new(id: i64, food_id: i64, quantity: f64) -> Self {
        Self {
            id,
            food_id,
            quantity,
            time: None,
            consumed: false,
        }
    }
}
