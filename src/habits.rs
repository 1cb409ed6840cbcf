use crate::models::{Category, Habit};
use crate::storage::{HabitPersistence, StorageError};
use tracing::{info, warn};

/// Ordered habit list backed by an injected persistence port.
///
/// Every successful mutation is followed by a full `save` of the list.
#[derive(Debug)]
pub struct HabitStore<P> {
    habits: Vec<Habit>,
    storage: P,
}

impl<P: HabitPersistence> HabitStore<P> {
    pub fn open(storage: P) -> Self {
        let habits = storage.load();
        Self { habits, storage }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: u64) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut P {
        &mut self.storage
    }

    /// Flips today's `completed` flag. Returns `None` when no habit has `id`.
    pub fn toggle(&mut self, id: u64) -> Result<Option<Habit>, StorageError> {
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id == id) else {
            return Ok(None);
        };
        habit.completed = !habit.completed;
        let updated = habit.clone();

        self.storage.save(&self.habits)?;
        Ok(Some(updated))
    }

    /// Appends a habit with an empty week. Blank names, unknown categories
    /// and an exhausted id space are rejected with `None` and nothing is saved.
    pub fn add(&mut self, name: &str, category: &str) -> Result<Option<Habit>, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let Ok(category) = category.parse::<Category>() else {
            return Ok(None);
        };

        let Some(id) = self.next_id() else {
            warn!("no habit id left after {}", u64::MAX);
            return Ok(None);
        };

        let habit = Habit::new(id, name, category);
        self.habits.push(habit.clone());
        self.storage.save(&self.habits)?;

        info!(id = habit.id, category = %habit.category, "habit added");
        Ok(Some(habit))
    }

    pub fn remove(&mut self, id: u64) -> Result<Option<Habit>, StorageError> {
        let Some(index) = self.habits.iter().position(|habit| habit.id == id) else {
            return Ok(None);
        };
        let removed = self.habits.remove(index);
        self.storage.save(&self.habits)?;

        info!(id, "habit removed");
        Ok(Some(removed))
    }

    fn next_id(&self) -> Option<u64> {
        match self.habits.iter().map(|habit| habit.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekData;
    use crate::storage::{LocalStorage, MemoryPersistence};

    fn seeded() -> HabitStore<MemoryPersistence> {
        let mut meditate = Habit::new(3, "Meditate", Category::Mindfulness);
        meditate.week_data = WeekData::new([true, false, true, false, true, false, false]);
        let walk = Habit::new(7, "Walk", Category::Fitness);
        HabitStore::open(MemoryPersistence::with_habits(vec![meditate, walk]))
    }

    #[test]
    fn first_habit_gets_id_one() {
        let mut store = HabitStore::open(MemoryPersistence::default());
        let habit = store.add("Drink water", "Health").unwrap().unwrap();
        assert_eq!(habit.id, 1);
        assert_eq!(habit.week_data, WeekData::default());
        assert!(!habit.completed);
        assert_eq!(store.storage().saves, 1);
    }

    #[test]
    fn new_id_is_one_past_the_largest() {
        let mut store = seeded();
        let habit = store.add("  Journal  ", "Learning").unwrap().unwrap();
        assert_eq!(habit.id, 8);
        assert_eq!(habit.name, "Journal");
        assert_eq!(store.habits().len(), 3);
    }

    #[test]
    fn blank_name_or_unknown_category_is_ignored() {
        let mut store = seeded();
        let before = store.habits().to_vec();

        assert_eq!(store.add("   ", "Health").unwrap(), None);
        assert_eq!(store.add("Nap", "Leisure").unwrap(), None);
        assert_eq!(store.add("Nap", "").unwrap(), None);

        assert_eq!(store.habits(), before.as_slice());
        assert_eq!(store.storage().saves, 0);
    }

    #[test]
    fn add_is_rejected_once_ids_run_out() {
        let last = Habit::new(u64::MAX, "Last", Category::Health);
        let mut store = HabitStore::open(MemoryPersistence::with_habits(vec![last]));
        let before = store.habits().to_vec();

        assert_eq!(store.add("Next", "Sleep").unwrap(), None);
        assert_eq!(store.habits(), before.as_slice());
        assert_eq!(store.storage().saves, 0);
    }

    #[test]
    fn toggle_flips_only_the_matching_habit() {
        let mut store = seeded();
        let before = store.habits().to_vec();

        let toggled = store.toggle(3).unwrap().unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.week_data, before[0].week_data);
        assert_eq!(store.habits()[1], before[1]);

        store.toggle(3).unwrap();
        assert_eq!(store.habits(), before.as_slice());
    }

    #[test]
    fn toggle_unknown_id_is_a_no_op() {
        let mut store = seeded();
        assert_eq!(store.toggle(99).unwrap(), None);
        assert_eq!(store.storage().saves, 0);
    }

    #[test]
    fn remove_drops_the_record() {
        let mut store = seeded();
        let removed = store.remove(3).unwrap().unwrap();
        assert_eq!(removed.name, "Meditate");
        assert!(store.get(3).is_none());
        assert_eq!(store.remove(3).unwrap(), None);
    }

    #[test]
    fn mutations_are_written_to_local_storage() {
        let mut store = HabitStore::open(LocalStorage::default());
        store.add("Sleep by 11", "Sleep").unwrap();
        store.toggle(1).unwrap();

        let reopened = HabitStore::open(store.storage().clone());
        assert_eq!(reopened.habits().len(), 1);
        assert!(reopened.habits()[0].completed);
    }
}
