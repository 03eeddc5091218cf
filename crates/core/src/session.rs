use crate::action::{PlacedDietItem, UndoableAction};
use crate::document::Document;
use crate::error::{NutrackError, Result};
use crate::model::Food;
use crate::undo_manager::UndoManager;
use chrono::NaiveTime;
use std::num::NonZeroUsize;
use tracing::{debug, warn};
use uuid::Uuid;

/// One editing scope over a [`Document`], with its own undo history.
///
/// Every edit captures an [`UndoableAction`] snapshot, applies the change and
/// records the action. Undo and redo drive the manager's pop/confirm
/// protocol and do the actual data work here.
#[derive(Debug)]
pub struct PlannerSession {
    id: Uuid,
    document: Document,
    history: UndoManager,
}

impl PlannerSession {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self::with_history(document, UndoManager::default())
    }

    #[must_use]
    pub fn with_max_history(document: Document, max_history: NonZeroUsize) -> Self {
        Self::with_history(document, UndoManager::new(max_history))
    }

    fn with_history(document: Document, history: UndoManager) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, max_history = history.max_stack_size().get(), "Session opened");
        Self { id, document, history }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    #[must_use]
    pub const fn history(&self) -> &UndoManager {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Removes a diet item.
    ///
    /// # Errors
    ///
    /// Returns `DietItemNotFound` if no meal holds `item_id`.
    pub fn delete_diet_item(&mut self, item_id: i64) -> Result<()> {
        let (item, meal_type, index) = self
            .document
            .diet
            .meals
            .take(item_id)
            .ok_or(NutrackError::DietItemNotFound(item_id))?;

        self.record(UndoableAction::DeleteDietItem { item, meal_type, index });
        Ok(())
    }

    /// Removes several diet items as one undoable step.
    ///
    /// Positions are captured as each item is removed, so the batch reverses
    /// cleanly when reinserted back to front.
    ///
    /// # Errors
    ///
    /// Returns `DietItemNotFound` for the first id that is missing (or
    /// repeated). The diet is left untouched in that case.
    pub fn delete_diet_items(&mut self, item_ids: &[i64]) -> Result<()> {
        let mut items = Vec::with_capacity(item_ids.len());

        for &item_id in item_ids {
            if let Some((item, meal_type, index)) = self.document.diet.meals.take(item_id) {
                items.push(PlacedDietItem { item, meal_type, index });
            } else {
                self.reinsert_batch(items);
                return Err(NutrackError::DietItemNotFound(item_id));
            }
        }

        self.record(UndoableAction::DeleteMultipleDietItems { items });
        Ok(())
    }

    /// Moves a diet item into `to_meal_type` at `to_index` (clamped).
    ///
    /// # Errors
    ///
    /// Returns `DietItemNotFound` if no meal holds `item_id`.
    pub fn move_diet_item(&mut self, item_id: i64, to_meal_type: &str, to_index: usize) -> Result<()> {
        let (item, from_meal_type, from_index) = self
            .document
            .diet
            .meals
            .take(item_id)
            .ok_or(NutrackError::DietItemNotFound(item_id))?;

        let to_index = self.document.diet.meals.insert(to_meal_type, to_index, item.clone());

        self.record(UndoableAction::MoveDietItem {
            item,
            from_meal_type,
            from_index,
            to_meal_type: to_meal_type.to_string(),
            to_index,
        });
        Ok(())
    }

    /// Changes the portion of a diet item, in grams.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for non-finite or non-positive quantities and
    /// `DietItemNotFound` if the item does not exist.
    pub fn update_portion(&mut self, item_id: i64, new_quantity: f64) -> Result<()> {
        if !new_quantity.is_finite() || new_quantity <= 0.0 {
            return Err(NutrackError::InvalidQuantity(new_quantity));
        }

        let item = self
            .document
            .diet
            .meals
            .get_mut(item_id)
            .ok_or(NutrackError::DietItemNotFound(item_id))?;
        let old_quantity = item.quantity;
        item.quantity = new_quantity;
        let food_label = item.food_label.clone();

        self.record(UndoableAction::UpdateDietItemPortion {
            item_id,
            old_quantity,
            new_quantity,
            food_label,
        });
        Ok(())
    }

    /// Changes (or clears) the scheduled time of a diet item.
    ///
    /// # Errors
    ///
    /// Returns `DietItemNotFound` if the item does not exist.
    pub fn update_time(&mut self, item_id: i64, new_time: Option<NaiveTime>) -> Result<()> {
        let item = self
            .document
            .diet
            .meals
            .get_mut(item_id)
            .ok_or(NutrackError::DietItemNotFound(item_id))?;
        let old_time = std::mem::replace(&mut item.time, new_time);
        let food_label = item.food_label.clone();

        self.record(UndoableAction::UpdateDietItemTime {
            item_id,
            old_time,
            new_time,
            food_label,
        });
        Ok(())
    }

    /// Removes an entry from the daily log.
    ///
    /// The food snapshot only describes the action. The catalog is never
    /// edited here, and undo does not add to it either.
    ///
    /// # Errors
    ///
    /// Returns `LogEntryNotFound` if no meal holds `entry_id`.
    pub fn delete_log_entry(&mut self, entry_id: i64) -> Result<()> {
        let (entry, meal_type, index) = self
            .document
            .daily_log
            .meals
            .take(entry_id)
            .ok_or(NutrackError::LogEntryNotFound(entry_id))?;

        let food = self
            .document
            .food(entry.food_id)
            .cloned()
            .unwrap_or_else(|| Food::new(entry.food_id, self.document.food_label(entry.food_id)));

        self.record(UndoableAction::DeleteDailyLog {
            entry,
            food,
            meal_type,
            index,
        });
        Ok(())
    }

    /// Flips the consumed flag of a daily log entry.
    ///
    /// # Errors
    ///
    /// Returns `LogEntryNotFound` if the entry does not exist.
    pub fn toggle_consumed(&mut self, entry_id: i64) -> Result<()> {
        let food_label = self
            .document
            .daily_log
            .meals
            .get(entry_id)
            .map(|entry| self.document.food_label(entry.food_id))
            .ok_or(NutrackError::LogEntryNotFound(entry_id))?;

        let entry = self
            .document
            .daily_log
            .meals
            .get_mut(entry_id)
            .ok_or(NutrackError::LogEntryNotFound(entry_id))?;
        let previous_value = entry.consumed;
        entry.consumed = !previous_value;

        self.record(UndoableAction::ToggleDailyLogConsumed {
            entry_id,
            previous_value,
            food_label,
        });
        Ok(())
    }

    /// Reverses the newest recorded action.
    ///
    /// Returns the action that was undone, or `None` when there is nothing to
    /// undo.
    ///
    /// # Errors
    ///
    /// Returns an error if the document no longer matches the action (for
    /// example the item it refers to is gone). The action is then dropped
    /// from the history.
    pub fn undo(&mut self) -> Result<Option<UndoableAction>> {
        let Some(action) = self.history.pop_undo() else {
            return Ok(None);
        };

        if let Err(error) = self.revert(&action) {
            warn!(session = %self.id, action = %action, %error, "Undo failed, action dropped");
            return Err(error);
        }

        debug!(session = %self.id, action = %action, "Undo");
        self.history.confirm_undo(action.clone());
        Ok(Some(action))
    }

    /// Reapplies the newest undone action.
    ///
    /// # Errors
    ///
    /// Returns an error if the document no longer matches the action. The
    /// action is then dropped from the history.
    pub fn redo(&mut self) -> Result<Option<UndoableAction>> {
        let Some(action) = self.history.pop_redo() else {
            return Ok(None);
        };

        if let Err(error) = self.reapply(&action) {
            warn!(session = %self.id, action = %action, %error, "Redo failed, action dropped");
            return Err(error);
        }

        debug!(session = %self.id, action = %action, "Redo");
        self.history.confirm_redo(action.clone());
        Ok(Some(action))
    }

    fn record(&mut self, action: UndoableAction) {
        debug!(session = %self.id, action = %action, "Edit");
        self.history.record_action(action);
    }

    fn reinsert_batch(&mut self, items: Vec<PlacedDietItem>) {
        for placed in items.into_iter().rev() {
            self.document.diet.meals.insert(&placed.meal_type, placed.index, placed.item);
        }
    }

    fn revert(&mut self, action: &UndoableAction) -> Result<()> {
        let meals = &mut self.document.diet.meals;

        match action {
            UndoableAction::DeleteDietItem { item, meal_type, index } => {
                meals.insert(meal_type, *index, item.clone());
            }
            UndoableAction::DeleteMultipleDietItems { items } => {
                self.reinsert_batch(items.clone());
            }
            UndoableAction::MoveDietItem {
                item,
                from_meal_type,
                from_index,
                ..
            } => {
                let (current, _, _) = meals.take(item.id).ok_or(NutrackError::DietItemNotFound(item.id))?;
                meals.insert(from_meal_type, *from_index, current);
            }
            UndoableAction::UpdateDietItemPortion {
                item_id, old_quantity, ..
            } => {
                let item = meals.get_mut(*item_id).ok_or(NutrackError::DietItemNotFound(*item_id))?;
                item.quantity = *old_quantity;
            }
            UndoableAction::UpdateDietItemTime { item_id, old_time, .. } => {
                let item = meals.get_mut(*item_id).ok_or(NutrackError::DietItemNotFound(*item_id))?;
                item.time = *old_time;
            }
            UndoableAction::DeleteDailyLog {
                entry, meal_type, index, ..
            } => {
                self.document.daily_log.meals.insert(meal_type, *index, entry.clone());
            }
            UndoableAction::ToggleDailyLogConsumed {
                entry_id,
                previous_value,
                ..
            } => {
                let entry = self
                    .document
                    .daily_log
                    .meals
                    .get_mut(*entry_id)
                    .ok_or(NutrackError::LogEntryNotFound(*entry_id))?;
                entry.consumed = *previous_value;
            }
        }
        Ok(())
    }

    fn reapply(&mut self, action: &UndoableAction) -> Result<()> {
        let meals = &mut self.document.diet.meals;

        match action {
            UndoableAction::DeleteDietItem { item, .. } => {
                meals.take(item.id).ok_or(NutrackError::DietItemNotFound(item.id))?;
            }
            UndoableAction::DeleteMultipleDietItems { items } => {
                if let Some(missing) = items.iter().find(|placed| meals.get(placed.item.id).is_none()) {
                    return Err(NutrackError::DietItemNotFound(missing.item.id));
                }
                for placed in items {
                    meals.take(placed.item.id);
                }
            }
            UndoableAction::MoveDietItem {
                item,
                to_meal_type,
                to_index,
                ..
            } => {
                let (current, _, _) = meals.take(item.id).ok_or(NutrackError::DietItemNotFound(item.id))?;
                meals.insert(to_meal_type, *to_index, current);
            }
            UndoableAction::UpdateDietItemPortion {
                item_id, new_quantity, ..
            } => {
                let item = meals.get_mut(*item_id).ok_or(NutrackError::DietItemNotFound(*item_id))?;
                item.quantity = *new_quantity;
            }
            UndoableAction::UpdateDietItemTime { item_id, new_time, .. } => {
                let item = meals.get_mut(*item_id).ok_or(NutrackError::DietItemNotFound(*item_id))?;
                item.time = *new_time;
            }
            UndoableAction::DeleteDailyLog { entry, .. } => {
                self.document
                    .daily_log
                    .meals
                    .take(entry.id)
                    .ok_or(NutrackError::LogEntryNotFound(entry.id))?;
            }
            UndoableAction::ToggleDailyLogConsumed {
                entry_id,
                previous_value,
                ..
            } => {
                let entry = self
                    .document
                    .daily_log
                    .meals
                    .get_mut(*entry_id)
                    .ok_or(NutrackError::LogEntryNotFound(*entry_id))?;
                entry.consumed = !*previous_value;
            }
        }
        Ok(())
    }
}
