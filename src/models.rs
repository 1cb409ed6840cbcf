use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Day-of-week labels in storage order. Index 0 is Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn weekday_index(day: Weekday) -> usize {
    day.num_days_from_sunday() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Health,
    Mindfulness,
    Productivity,
    Learning,
    Fitness,
    Sleep,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Health,
        Category::Mindfulness,
        Category::Productivity,
        Category::Learning,
        Category::Fitness,
        Category::Sleep,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Mindfulness => "Mindfulness",
            Category::Productivity => "Productivity",
            Category::Learning => "Learning",
            Category::Fitness => "Fitness",
            Category::Sleep => "Sleep",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Health => "💪",
            Category::Mindfulness => "🧘",
            Category::Productivity => "📈",
            Category::Learning => "📚",
            Category::Fitness => "🏃",
            Category::Sleep => "😴",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Category::Health => "#4CAF50",
            Category::Mindfulness => "#9C27B0",
            Category::Productivity => "#2196F3",
            Category::Learning => "#FF9800",
            Category::Fitness => "#F44336",
            Category::Sleep => "#673AB7",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.name() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Completion history, one slot per weekday in [`WEEKDAY_LABELS`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekData([bool; 7]);

impl WeekData {
    pub fn new(days: [bool; 7]) -> Self {
        Self(days)
    }

    pub fn days(&self) -> &[bool; 7] {
        &self.0
    }

    pub fn get(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|done| **done).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: u64,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub week_data: WeekData,
    #[serde(default)]
    pub completed: bool,
}

impl Habit {
    pub fn new(id: u64, name: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            week_data: WeekData::default(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub bio: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewHabitRequest {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_known_names_only() {
        assert_eq!("Sleep".parse::<Category>(), Ok(Category::Sleep));
        assert_eq!(" Health ".parse::<Category>(), Ok(Category::Health));
        assert!("health".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn habit_without_week_data_defaults_to_empty_week() {
        let habit: Habit = serde_json::from_str(
            r#"{"id":4,"name":"Read","category":"Learning","icon":"📚","completed":true}"#,
        )
        .unwrap();
        assert_eq!(habit.week_data, WeekData::default());
        assert!(habit.completed);
    }

    #[test]
    fn week_data_must_have_seven_slots() {
        let short = serde_json::from_str::<WeekData>("[true,false]");
        assert!(short.is_err());

        let full: WeekData =
            serde_json::from_str("[true,false,true,false,true,false,false]").unwrap();
        assert_eq!(full.completed_count(), 3);
    }

    #[test]
    fn habit_serializes_week_data_in_camel_case() {
        let habit = Habit::new(1, "Walk", Category::Fitness);
        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(value["weekData"].as_array().map(Vec::len), Some(7));
        assert_eq!(value["category"], "Fitness");
    }

    #[test]
    fn weekday_index_is_sunday_first() {
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Sat), 6);
        assert_eq!(WEEKDAY_LABELS[weekday_index(Weekday::Wed)], "Wed");
    }
}
