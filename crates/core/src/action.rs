use crate::error::NutrackError;
use crate::model::{DailyLogEntry, DietItem, Food};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used to render action descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "en")]
    English,
}

impl Locale {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Portuguese => "pt",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = NutrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pt" | "pt-br" | "portuguese" => Ok(Self::Portuguese),
            "en" | "en-us" | "english" => Ok(Self::English),
            other => Err(NutrackError::InvalidConfig(format!("unsupported locale '{other}'"))),
        }
    }
}

/// A diet item together with the slot it occupied when it was removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedDietItem {
    pub item: DietItem,
    pub meal_type: String,
    pub index: usize,
}

/// One reversible edit, captured before the edit touched any data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndoableAction {
    DeleteDietItem {
        item: DietItem,
        meal_type: String,
        index: usize,
    },
    /// Entries are in removal order; reinserting them back to front restores
    /// the original layout.
    DeleteMultipleDietItems {
        items: Vec<PlacedDietItem>,
    },
    MoveDietItem {
        item: DietItem,
        from_meal_type: String,
        from_index: usize,
        to_meal_type: String,
        to_index: usize,
    },
    UpdateDietItemPortion {
        item_id: i64,
        old_quantity: f64,
        new_quantity: f64,
        food_label: String,
    },
    UpdateDietItemTime {
        item_id: i64,
        old_time: Option<NaiveTime>,
        new_time: Option<NaiveTime>,
        food_label: String,
    },
    DeleteDailyLog {
        entry: DailyLogEntry,
        food: Food,
        meal_type: String,
        index: usize,
    },
    ToggleDailyLogConsumed {
        entry_id: i64,
        previous_value: bool,
        food_label: String,
    },
}

impl UndoableAction {
    /// Description in the default locale.
    #[must_use]
    pub fn description(&self) -> String {
        self.describe(Locale::default())
    }

    #[must_use]
    pub fn describe(&self, locale: Locale) -> String {
        match (self, locale) {
            (Self::DeleteDietItem { item, .. }, Locale::Portuguese) => format!("Remover {}", item.food_label),
            (Self::DeleteDietItem { item, .. }, Locale::English) => format!("Remove {}", item.food_label),
            (Self::DeleteMultipleDietItems { items }, Locale::Portuguese) => format!("Remover {} itens", items.len()),
            (Self::DeleteMultipleDietItems { items }, Locale::English) => format!("Remove {} items", items.len()),
            (Self::MoveDietItem { item, .. }, Locale::Portuguese) => format!("Mover {}", item.food_label),
            (Self::MoveDietItem { item, .. }, Locale::English) => format!("Move {}", item.food_label),
            (Self::UpdateDietItemPortion { food_label, .. }, Locale::Portuguese) => {
                format!("Alterar porção de {food_label}")
            }
            (Self::UpdateDietItemPortion { food_label, .. }, Locale::English) => {
                format!("Change portion of {food_label}")
            }
            (Self::UpdateDietItemTime { food_label, .. }, Locale::Portuguese) => {
                format!("Alterar horário de {food_label}")
            }
            (Self::UpdateDietItemTime { food_label, .. }, Locale::English) => format!("Change time of {food_label}"),
            (Self::DeleteDailyLog { food, .. }, Locale::Portuguese) => format!("Remover {} do diário", food.name),
            (Self::DeleteDailyLog { food, .. }, Locale::English) => format!("Remove {} from log", food.name),
            (
                Self::ToggleDailyLogConsumed {
                    previous_value,
                    food_label,
                    ..
                },
                Locale::Portuguese,
            ) => {
                if *previous_value {
                    format!("Desmarcar {food_label}")
                } else {
                    format!("Marcar {food_label} como consumido")
                }
            }
            (
                Self::ToggleDailyLogConsumed {
                    previous_value,
                    food_label,
                    ..
                },
                Locale::English,
            ) => {
                if *previous_value {
                    format!("Unmark {food_label}")
                } else {
                    format!("Mark {food_label} as consumed")
                }
            }
        }
    }
}

impl fmt::Display for UndoableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn bread_item() -> DietItem {
        DietItem::new(1, &Food::new(5, "Bread"), 100.0)
    }

    #[test]
    fn test_portion_description_in_portuguese() {
        let action = UndoableAction::UpdateDietItemPortion {
            item_id: 1,
            old_quantity: 100.0,
            new_quantity: 150.0,
            food_label: "Bread".to_string(),
        };

        assert_eq!(action.description(), "Alterar porção de Bread");
        assert_eq!(action.describe(Locale::English), "Change portion of Bread");
        assert_eq!(action.to_string(), "Alterar porção de Bread");
    }

    #[test]
    fn test_delete_and_move_descriptions() {
        let delete = UndoableAction::DeleteDietItem {
            item: bread_item(),
            meal_type: "Breakfast".to_string(),
            index: 0,
        };
        let moved = UndoableAction::MoveDietItem {
            item: bread_item(),
            from_meal_type: "Breakfast".to_string(),
            from_index: 0,
            to_meal_type: "Lunch".to_string(),
            to_index: 2,
        };

        assert_eq!(delete.description(), "Remover Bread");
        assert_eq!(delete.describe(Locale::English), "Remove Bread");
        assert_eq!(moved.description(), "Mover Bread");
        assert_eq!(moved.describe(Locale::English), "Move Bread");
    }

    #[test]
    fn test_batch_description_counts_items() {
        let empty = UndoableAction::DeleteMultipleDietItems { items: vec![] };
        let two = UndoableAction::DeleteMultipleDietItems {
            items: vec![
                PlacedDietItem {
                    item: bread_item(),
                    meal_type: "Breakfast".to_string(),
                    index: 0,
                },
                PlacedDietItem {
                    item: bread_item(),
                    meal_type: "Lunch".to_string(),
                    index: 1,
                },
            ],
        };

        assert_eq!(empty.description(), "Remover 0 itens");
        assert_eq!(two.describe(Locale::English), "Remove 2 items");
    }

    #[test]
    fn test_daily_log_descriptions() {
        let delete = UndoableAction::DeleteDailyLog {
            entry: DailyLogEntry::new(3, 5, 80.0),
            food: Food::new(5, "Bread"),
            meal_type: "Lunch".to_string(),
            index: 0,
        };
        let mark = UndoableAction::ToggleDailyLogConsumed {
            entry_id: 3,
            previous_value: false,
            food_label: "Bread".to_string(),
        };
        let unmark = UndoableAction::ToggleDailyLogConsumed {
            entry_id: 3,
            previous_value: true,
            food_label: "Bread".to_string(),
        };

        assert_eq!(delete.description(), "Remover Bread do diário");
        assert_eq!(delete.describe(Locale::English), "Remove Bread from log");
        assert_eq!(mark.description(), "Marcar Bread como consumido");
        assert_eq!(mark.describe(Locale::English), "Mark Bread as consumed");
        assert_eq!(unmark.description(), "Desmarcar Bread");
        assert_eq!(unmark.describe(Locale::English), "Unmark Bread");
    }

    #[test]
    fn test_time_description() {
        let action = UndoableAction::UpdateDietItemTime {
            item_id: 1,
            old_time: None,
            new_time: NaiveTime::from_hms_opt(8, 30, 0),
            food_label: "Bread".to_string(),
        };

        assert_eq!(action.description(), "Alterar horário de Bread");
        assert_eq!(action.describe(Locale::English), "Change time of Bread");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("pt".parse::<Locale>().unwrap(), Locale::Portuguese);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::English);
        assert_eq!("english".parse::<Locale>().unwrap(), Locale::English);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default().to_string(), "pt");
    }

    #[test]
    fn test_action_is_tagged_in_json() {
        let action = UndoableAction::ToggleDailyLogConsumed {
            entry_id: 9,
            previous_value: true,
            food_label: "Milk".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["kind"], "toggle_daily_log_consumed");
        assert_eq!(json["entry_id"], 9);
    }
}
