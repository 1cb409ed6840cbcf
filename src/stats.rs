use crate::models::{Category, Habit, WEEKDAY_LABELS, weekday_index};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Serialize;

const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitRate {
    pub id: u64,
    pub name: String,
    pub rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_habits: usize,
    pub total_completions: usize,
    pub average_completion: u8,
    pub perfect_days: usize,
    pub today_progress: u8,
}

/// Labels and values ready for a chart; `colors` is empty when the series
/// uses a single color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Sunday-first grid.
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub today: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub summary: Summary,
    pub category_chart: ChartData,
    pub trend_chart: ChartData,
    pub completion_chart: ChartData,
    pub calendar: Option<MonthCalendar>,
    pub selected_date: String,
    pub selected_habits: Vec<Habit>,
}

/// `round(100 * part / whole)` with halves rounded up; 0 for an empty whole.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = (part * 100 + whole / 2) / whole;
    rounded.min(100) as u8
}

pub fn total_completions(habits: &[Habit]) -> usize {
    habits
        .iter()
        .map(|habit| habit.week_data.completed_count())
        .sum()
}

pub fn overall_progress(habits: &[Habit]) -> u8 {
    percentage(total_completions(habits), habits.len() * DAYS_PER_WEEK)
}

pub fn today_progress(habits: &[Habit]) -> u8 {
    let done = habits.iter().filter(|habit| habit.completed).count();
    percentage(done, habits.len())
}

/// Habit count per category, in first-seen order.
pub fn category_distribution(habits: &[Habit]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for habit in habits {
        match counts.iter_mut().find(|entry| entry.category == habit.category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: habit.category,
                count: 1,
            }),
        }
    }
    counts
}

pub fn weekly_trend(habits: &[Habit]) -> [usize; DAYS_PER_WEEK] {
    let mut trend = [0; DAYS_PER_WEEK];
    for habit in habits {
        for (slot, done) in trend.iter_mut().zip(habit.week_data.days()) {
            if *done {
                *slot += 1;
            }
        }
    }
    trend
}

pub fn completion_rates(habits: &[Habit]) -> Vec<HabitRate> {
    habits
        .iter()
        .map(|habit| HabitRate {
            id: habit.id,
            name: habit.name.clone(),
            rate: percentage(habit.week_data.completed_count(), DAYS_PER_WEEK),
        })
        .collect()
}

/// Weekday slots where every habit is done. An empty list has none.
pub fn perfect_days(habits: &[Habit]) -> usize {
    if habits.is_empty() {
        return 0;
    }
    (0..DAYS_PER_WEEK)
        .filter(|day| habits.iter().all(|habit| habit.week_data.get(*day)))
        .count()
}

pub fn summary(habits: &[Habit]) -> Summary {
    Summary {
        total_habits: habits.len(),
        total_completions: total_completions(habits),
        average_completion: overall_progress(habits),
        perfect_days: perfect_days(habits),
        today_progress: today_progress(habits),
    }
}

pub fn category_chart(habits: &[Habit]) -> ChartData {
    let distribution = category_distribution(habits);
    ChartData {
        labels: distribution
            .iter()
            .map(|entry| entry.category.name().to_string())
            .collect(),
        values: distribution.iter().map(|entry| entry.count).collect(),
        colors: distribution
            .iter()
            .map(|entry| entry.category.color())
            .collect(),
    }
}

pub fn trend_chart(habits: &[Habit]) -> ChartData {
    ChartData {
        labels: WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect(),
        values: weekly_trend(habits).to_vec(),
        colors: Vec::new(),
    }
}

pub fn completion_chart(habits: &[Habit]) -> ChartData {
    let rates = completion_rates(habits);
    ChartData {
        labels: rates.iter().map(|rate| rate.name.clone()).collect(),
        values: rates.iter().map(|rate| usize::from(rate.rate)).collect(),
        colors: Vec::new(),
    }
}

/// Grid layout for the month containing the 1st of `year`/`month`.
/// Returns `None` for an out-of-range month.
pub fn month_calendar(year: i32, month: u32, today: NaiveDate) -> Option<MonthCalendar> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    let days_in_month = (next - first).num_days() as u32;
    let today = (today.year() == year && today.month() == month).then(|| today.day());

    Some(MonthCalendar {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days_in_month,
        today,
    })
}

/// Habits whose history slot for the weekday of `date` is set.
pub fn habits_for_date(habits: &[Habit], date: NaiveDate) -> Vec<&Habit> {
    let slot = weekday_index(date.weekday());
    habits
        .iter()
        .filter(|habit| habit.week_data.get(slot))
        .collect()
}

pub fn build_stats(habits: &[Habit]) -> StatsResponse {
    let today = Local::now().date_naive();
    build_stats_at(today, today, habits)
}

pub fn build_stats_at(today: NaiveDate, selected: NaiveDate, habits: &[Habit]) -> StatsResponse {
    StatsResponse {
        summary: summary(habits),
        category_chart: category_chart(habits),
        trend_chart: trend_chart(habits),
        completion_chart: completion_chart(habits),
        calendar: month_calendar(selected.year(), selected.month(), today),
        selected_date: selected.to_string(),
        selected_habits: habits_for_date(habits, selected)
            .into_iter()
            .cloned()
            .collect(),
    }
}
