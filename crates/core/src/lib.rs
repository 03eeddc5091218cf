pub mod action;
pub mod config;
pub mod document;
pub mod error;
pub mod meals;
pub mod model;
pub mod session;
pub mod undo_manager;

pub use action::{Locale, PlacedDietItem, UndoableAction};
pub use config::NutrackConfig;
pub use document::{DailyLog, DietPlan, Document};
pub use error::{NutrackError, Result};
pub use meals::MealGroups;
pub use model::{DailyLogEntry, DietItem, Food, Identified};
pub use session::PlannerSession;
pub use undo_manager::{DEFAULT_MAX_STACK_SIZE, UndoManager, UndoState};
