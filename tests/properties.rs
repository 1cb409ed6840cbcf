use habit_tracker::habits::HabitStore;
use habit_tracker::models::{Category, Habit, WeekData};
use habit_tracker::stats::{category_distribution, overall_progress, today_progress, weekly_trend};
use habit_tracker::storage::MemoryPersistence;

use proptest::prelude::*;

fn category() -> impl Strategy<Value = Category> {
    proptest::sample::select(Category::ALL.to_vec())
}

/// Habit lists with distinct, unevenly spaced ids.
fn habits() -> impl Strategy<Value = Vec<Habit>> {
    prop::collection::vec(
        (
            1u64..4,
            "[A-Za-z][A-Za-z ]{0,11}",
            category(),
            any::<[bool; 7]>(),
            any::<bool>(),
        ),
        0..16,
    )
    .prop_map(|rows| {
        let mut id = 0;
        rows.into_iter()
            .map(|(gap, name, category, days, completed)| {
                id += gap;
                let mut habit = Habit::new(id, name, category);
                habit.week_data = WeekData::new(days);
                habit.completed = completed;
                habit
            })
            .collect()
    })
}

// =========================================================================
// Statistics
// =========================================================================

proptest! {
    #[test]
    fn given_any_habits_when_progress_computed_then_within_percent_range(habits in habits()) {
        let overall = overall_progress(&habits);
        let today = today_progress(&habits);
        prop_assert!(overall <= 100);
        prop_assert!(today <= 100);
        if habits.is_empty() {
            prop_assert_eq!(overall, 0);
            prop_assert_eq!(today, 0);
        }
    }

    #[test]
    fn given_any_habits_when_distributed_then_counts_sum_to_len(habits in habits()) {
        let counts = category_distribution(&habits);
        let total: usize = counts.iter().map(|entry| entry.count).sum();
        prop_assert_eq!(total, habits.len());
        prop_assert!(counts.iter().all(|entry| entry.count > 0));
    }

    #[test]
    fn given_any_habits_when_trend_computed_then_each_day_at_most_len(habits in habits()) {
        let trend = weekly_trend(&habits);
        prop_assert!(trend.iter().all(|done| *done <= habits.len()));
    }
}

// =========================================================================
// Habit store
// =========================================================================

proptest! {
    #[test]
    fn given_any_habit_when_toggled_twice_then_list_restored(
        habits in habits().prop_filter("needs a habit", |habits| !habits.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let id = habits[pick.index(habits.len())].id;
        let mut store = HabitStore::open(MemoryPersistence::with_habits(habits.clone()));

        prop_assert!(store.toggle(id).unwrap().is_some());
        prop_assert!(store.toggle(id).unwrap().is_some());
        prop_assert_eq!(store.habits(), habits.as_slice());
    }

    #[test]
    fn given_blank_name_when_added_then_nothing_changes(
        habits in habits(),
        name in r"\s{0,5}",
        category in category(),
    ) {
        let mut store = HabitStore::open(MemoryPersistence::with_habits(habits.clone()));

        prop_assert_eq!(store.add(&name, category.name()).unwrap(), None);
        prop_assert_eq!(store.habits(), habits.as_slice());
        prop_assert_eq!(store.storage().saves, 0);
    }

    #[test]
    fn given_unknown_category_when_added_then_nothing_changes(
        habits in habits(),
        category in "[a-z]{0,12}",
    ) {
        let mut store = HabitStore::open(MemoryPersistence::with_habits(habits.clone()));

        prop_assert_eq!(store.add("Stretch", &category).unwrap(), None);
        prop_assert_eq!(store.habits(), habits.as_slice());
        prop_assert_eq!(store.storage().saves, 0);
    }

    #[test]
    fn given_valid_habit_when_added_then_id_is_one_past_the_largest(
        habits in habits(),
        name in "[A-Za-z]{1,12}",
        category in category(),
    ) {
        let expected = habits.iter().map(|habit| habit.id).max().map_or(1, |max| max + 1);
        let mut store = HabitStore::open(MemoryPersistence::with_habits(habits.clone()));

        let added = store.add(&name, category.name()).unwrap();
        prop_assert!(added.is_some());
        let added = added.unwrap();
        prop_assert_eq!(added.id, expected);
        prop_assert_eq!(store.habits().len(), habits.len() + 1);
        prop_assert_eq!(store.storage().saves, 1);
    }
}
