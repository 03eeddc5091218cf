use crate::model::Identified;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Records grouped by meal type ("Breakfast", "Lunch", ...).
///
/// Groups keep insertion order. A group whose last record is removed keeps
/// its slot but is hidden from iteration, serialization and equality, so
/// reinserting into it restores the original group order.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MealGroups<T> {
    groups: IndexMap<String, Vec<T>>,
}

impl<T> Default for MealGroups<T> {
    fn default() -> Self {
        Self { groups: IndexMap::new() }
    }
}

impl<T> MealGroups<T> {
    /// Non-empty groups in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.groups
            .iter()
            .filter(|(_, group)| !group.is_empty())
            .map(|(meal_type, group)| (meal_type.as_str(), group.as_slice()))
    }

    pub fn meal_types(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(meal_type, _)| meal_type)
    }
}

impl<T: PartialEq> PartialEq for MealGroups<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Serialize> Serialize for MealGroups<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<T: Identified> MealGroups<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` at `index` within `meal_type`, clamping the index to
    /// the group length. Returns the position actually used.
    pub fn insert(&mut self, meal_type: &str, index: usize, record: T) -> usize {
        let group = self.groups.entry(meal_type.to_string()).or_default();
        let index = index.min(group.len());
        group.insert(index, record);
        index
    }

    /// Appends `record` to the end of `meal_type`.
    pub fn push(&mut self, meal_type: &str, record: T) -> usize {
        self.insert(meal_type, usize::MAX, record)
    }

    pub fn remove(&mut self, meal_type: &str, index: usize) -> Option<T> {
        let group = self.groups.get_mut(meal_type)?;
        if index >= group.len() {
            return None;
        }
        Some(group.remove(index))
    }

    /// Finds the meal type and position currently holding `id`.
    #[must_use]
    pub fn locate(&self, id: i64) -> Option<(String, usize)> {
        self.groups.iter().find_map(|(meal_type, group)| {
            group
                .iter()
                .position(|record| record.id() == id)
                .map(|index| (meal_type.clone(), index))
        })
    }

    /// Removes the record with `id`, returning it with its former position.
    pub fn take(&mut self, id: i64) -> Option<(T, String, usize)> {
        let (meal_type, index) = self.locate(id)?;
        self.remove(&meal_type, index).map(|record| (record, meal_type, index))
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&T> {
        self.groups.values().flatten().find(|record| record.id() == id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.groups.values_mut().flatten().find(|record| record.id() == id)
    }

    #[must_use]
    pub fn group(&self, meal_type: &str) -> &[T] {
        self.groups.get(meal_type).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::model::{DietItem, Food};

    fn item(id: i64, name: &str) -> DietItem {
        DietItem::new(id, &Food::new(id * 10, name), 100.0)
    }

    fn ids(groups: &MealGroups<DietItem>, meal_type: &str) -> Vec<i64> {
        groups.group(meal_type).iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut groups = MealGroups::new();
        groups.push("Breakfast", item(1, "Bread"));
        let used = groups.insert("Breakfast", 42, item(2, "Butter"));

        assert_eq!(used, 1);
        assert_eq!(ids(&groups, "Breakfast"), vec![1, 2]);
    }

    #[test]
    fn test_insert_at_front() {
        let mut groups = MealGroups::new();
        groups.push("Lunch", item(1, "Rice"));
        groups.push("Lunch", item(2, "Beans"));
        groups.insert("Lunch", 0, item(3, "Salad"));

        assert_eq!(ids(&groups, "Lunch"), vec![3, 1, 2]);
    }

    #[test]
    fn test_locate_and_take() {
        let mut groups = MealGroups::new();
        groups.push("Breakfast", item(1, "Bread"));
        groups.push("Lunch", item(2, "Rice"));
        groups.push("Lunch", item(3, "Beans"));

        assert_eq!(groups.locate(3), Some(("Lunch".to_string(), 1)));
        assert_eq!(groups.locate(99), None);

        let (taken, meal_type, index) = groups.take(2).unwrap();
        assert_eq!(taken.food_label, "Rice");
        assert_eq!(meal_type, "Lunch");
        assert_eq!(index, 0);
        assert_eq!(ids(&groups, "Lunch"), vec![3]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_empty_group_is_hidden() {
        let mut groups = MealGroups::new();
        groups.push("Snack", item(1, "Apple"));
        assert!(groups.remove("Snack", 0).is_some());

        assert!(groups.is_empty());
        assert_eq!(groups.meal_types().count(), 0);
        assert!(groups.group("Snack").is_empty());
        assert_eq!(serde_json::to_string(&groups).unwrap(), "{}");
        assert_eq!(groups, MealGroups::new());
    }

    #[test]
    fn test_emptied_group_keeps_its_slot() {
        let mut groups = MealGroups::new();
        groups.push("Breakfast", item(1, "Bread"));
        groups.push("Lunch", item(2, "Rice"));

        let (bread, meal_type, index) = groups.take(1).unwrap();
        assert_eq!(groups.meal_types().collect::<Vec<_>>(), vec!["Lunch"]);

        groups.insert(&meal_type, index, bread);
        assert_eq!(groups.meal_types().collect::<Vec<_>>(), vec!["Breakfast", "Lunch"]);
    }

    #[test]
    fn test_equality_depends_on_group_order() {
        let mut first = MealGroups::new();
        first.push("Breakfast", item(1, "Bread"));
        first.push("Lunch", item(2, "Rice"));

        let mut second = MealGroups::new();
        second.push("Lunch", item(2, "Rice"));
        second.push("Breakfast", item(1, "Bread"));

        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut groups = MealGroups::new();
        groups.push("Dinner", item(1, "Soup"));

        assert!(groups.remove("Dinner", 1).is_none());
        assert!(groups.remove("Brunch", 0).is_none());
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_get_mut_updates_record() {
        let mut groups = MealGroups::new();
        groups.push("Dinner", item(7, "Soup"));
        groups.get_mut(7).unwrap().quantity = 250.0;

        assert!((groups.get(7).unwrap().quantity - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut groups = MealGroups::new();
        groups.push("Breakfast", item(1, "Bread"));

        let json = serde_json::to_value(&groups).unwrap();
        assert!(json.get("Breakfast").unwrap().is_array());

        let back: MealGroups<DietItem> = serde_json::from_value(json).unwrap();
        assert_eq!(back, groups);
    }
}
