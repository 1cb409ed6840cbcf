use crate::models::{Category, Habit, User, WEEKDAY_LABELS};
use crate::stats::{ChartData, MonthCalendar, StatsResponse, today_progress, weekly_trend};
use crate::view::View;
use chrono::{Months, NaiveDate};
use maud::{DOCTYPE, Markup, PreEscaped, Render, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    Register,
}

impl LoginMode {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("register") => LoginMode::Register,
            _ => LoginMode::SignIn,
        }
    }
}

pub fn render_login(mode: LoginMode, error: Option<&str>) -> String {
    let (heading, button, mode_value) = match mode {
        LoginMode::SignIn => ("Welcome back", "Sign in", "login"),
        LoginMode::Register => ("Create your account", "Sign up", "register"),
    };

    let body = html! {
        section class="card narrow" {
            h1 { (heading) }
            form method="post" action="/login" class="stack" {
                input type="hidden" name="mode" value=(mode_value);
                @if mode == LoginMode::Register {
                    label for="username" { "Username" }
                    input id="username" name="username" type="text" required;
                    label for="full_name" { "Full name" }
                    input id="full_name" name="full_name" type="text" required;
                }
                label for="email" { "Email" }
                input id="email" name="email" type="email" required;
                label for="password" { "Password" }
                input id="password" name="password" type="password" required;
                (ErrorBlock(error))
                button type="submit" { (button) }
            }
            p class="hint" {
                @match mode {
                    LoginMode::SignIn => {
                        "Don't have an account? "
                        a href="/login?mode=register" { "Sign up" }
                    }
                    LoginMode::Register => {
                        "Already have an account? "
                        a href="/login" { "Sign in" }
                    }
                }
            }
        }
    };

    page("Sign in", None, body)
}

pub fn render_dashboard(user: &User, habits: &[Habit], error: Option<&str>) -> String {
    let progress = today_progress(habits);
    let trend = weekly_trend(habits);

    let body = html! {
        section class="card" {
            p class="greeting" { "Hello, " strong { "@" (user.username) } "!" }
            form method="post" action="/habits" class="inline" {
                input name="name" type="text" placeholder="Add a habit...";
                select name="category" {
                    option value="" { "Select category" }
                    @for category in Category::ALL {
                        option value=(category.name()) { (category.icon()) " " (category.name()) }
                    }
                }
                button type="submit" { "Add Habit" }
            }
            (ErrorBlock(error))
        }
        section class="card" {
            div class="progress-header" {
                span { "Progress:" }
                span { (progress) "% complete" }
            }
            div class="bar-track" {
                div class="bar-fill" style=(format!("width: {progress}%")) {}
            }
        }
        section class="card" {
            h2 { "Today's Habits" }
            ul class="habits" {
                @for habit in habits {
                    li class=(if habit.completed { "habit completed" } else { "habit" }) {
                        form method="post" action=(format!("/habits/{}/toggle", habit.id)) {
                            button type="submit" class="check"
                                aria-pressed=(if habit.completed { "true" } else { "false" }) {
                                @if habit.completed { "✓" }
                            }
                        }
                        span class="habit-name" { (habit.category.icon()) " " (habit.name) }
                    }
                }
                @if habits.is_empty() {
                    li class="empty" { "No habits yet. Add one above." }
                }
            }
        }
        section class="card" {
            h2 { "Last 7 Days Activity" }
            @for (label, count) in WEEKDAY_LABELS.iter().zip(trend) {
                (BarRow { label, value: count, scale: habits.len(), unit: "", color: None })
            }
        }
    };

    page("Dashboard", Some(View::Dashboard), body)
}

pub fn render_statistics(stats: &StatsResponse) -> String {
    let summary = &stats.summary;

    let body = html! {
        section class="card" {
            h1 { "Statistics & Analytics" }
            p class="hint" { "Track your progress and insights" }
        }
        section class="cards" {
            div class="stat" { span class="value" { (summary.total_habits) } span class="label" { "Total Habits" } }
            div class="stat" { span class="value" { (summary.total_completions) } span class="label" { "Total Completions" } }
            div class="stat" { span class="value" { (summary.average_completion) "%" } span class="label" { "Average Completion" } }
            div class="stat" { span class="value" { (summary.perfect_days) } span class="label" { "Perfect Days" } }
        }
        section class="card" {
            h2 { "Habits by Category" }
            @if stats.category_chart.values.is_empty() {
                p class="hint" { "No habits to display" }
            } @else {
                (bar_chart(&stats.category_chart, summary.total_habits, ""))
            }
        }
        section class="card" {
            h2 { "Weekly Completion Trend" }
            (bar_chart(&stats.trend_chart, summary.total_habits, ""))
        }
        section class="card" {
            h2 { "Completion Rate by Habit" }
            (bar_chart(&stats.completion_chart, 100, "%"))
        }
        section class="card" {
            @if let Some(calendar) = &stats.calendar {
                (CalendarGrid { calendar, selected: &stats.selected_date })
            }
            h3 { "Habits on " (stats.selected_date) }
            ul class="habits" {
                @for habit in &stats.selected_habits {
                    li { (habit.category.icon()) " " (habit.name) }
                }
                @if stats.selected_habits.is_empty() {
                    li class="empty" { "No habits completed on this day." }
                }
            }
        }
    };

    page("Statistics", Some(View::Statistics), body)
}

pub fn render_profile(user: &User, notice: Option<&str>, error: Option<&str>) -> String {
    let full_name = user.full_name.as_deref().unwrap_or_default();
    let bio = user.bio.as_deref().unwrap_or_default();
    let avatar = user.avatar.as_deref().unwrap_or_default();
    let joined = user.created_at.as_deref().unwrap_or("unknown");

    let body = html! {
        section class="card" {
            h1 { "@" (user.username) }
            p class="hint" { (user.email) " · joined " (joined) }
            @if let Some(notice) = notice {
                div class="notice" { (notice) }
            }
            (ErrorBlock(error))
        }
        section class="card" {
            h2 { "Edit profile" }
            form method="post" action="/profile" class="stack" {
                label for="full_name" { "Full name" }
                input id="full_name" name="full_name" type="text" value=(full_name);
                label for="bio" { "Bio" }
                textarea id="bio" name="bio" { (bio) }
                label for="avatar" { "Avatar URL" }
                input id="avatar" name="avatar" type="url" value=(avatar);
                button type="submit" { "Save" }
            }
        }
        section class="card" {
            h2 { "Change password" }
            form method="post" action="/profile/password" class="stack" {
                label for="current_password" { "Current password" }
                input id="current_password" name="current_password" type="password" required;
                label for="new_password" { "New password" }
                input id="new_password" name="new_password" type="password" required;
                label for="confirm_password" { "Confirm new password" }
                input id="confirm_password" name="confirm_password" type="password" required;
                button type="submit" { "Change password" }
            }
        }
    };

    page("Profile", Some(View::Profile), body)
}

struct ErrorBlock<'a>(Option<&'a str>);

impl Render for ErrorBlock<'_> {
    fn render(&self) -> Markup {
        html! {
            @if let Some(error) = self.0 {
                div class="error" { (error) }
            }
        }
    }
}

struct BarRow<'a> {
    label: &'a str,
    value: usize,
    scale: usize,
    unit: &'a str,
    color: Option<&'a str>,
}

impl Render for BarRow<'_> {
    fn render(&self) -> Markup {
        let mut style = format!("width: {:.0}%", share(self.value, self.scale));
        if let Some(color) = self.color {
            style.push_str("; background: ");
            style.push_str(color);
        }
        html! {
            div class="bar-row" {
                span class="bar-label" { (self.label) }
                div class="bar-track" { div class="bar-fill" style=(style) {} }
                span class="bar-value" { (self.value) (self.unit) }
            }
        }
    }
}

fn bar_chart(chart: &ChartData, scale: usize, unit: &str) -> Markup {
    html! {
        @for (index, (label, value)) in chart.labels.iter().zip(&chart.values).enumerate() {
            (BarRow {
                label,
                value: *value,
                scale,
                unit,
                color: chart.colors.get(index).copied(),
            })
        }
    }
}

/// Sunday-first month grid with links that select a day.
struct CalendarGrid<'a> {
    calendar: &'a MonthCalendar,
    selected: &'a str,
}

impl Render for CalendarGrid<'_> {
    fn render(&self) -> Markup {
        let calendar = self.calendar;
        let Some(first) = NaiveDate::from_ymd_opt(calendar.year, calendar.month, 1) else {
            return html! {};
        };
        let prev = first.checked_sub_months(Months::new(1));
        let next = first.checked_add_months(Months::new(1));

        html! {
            div class="calendar-header" {
                @if let Some(prev) = prev {
                    a href=(month_link(prev)) { "←" }
                }
                h2 { (first.format("%B %Y").to_string()) }
                @if let Some(next) = next {
                    a href=(month_link(next)) { "→" }
                }
            }
            div class="calendar" {
                @for label in WEEKDAY_LABELS {
                    span class="weekday" { (label) }
                }
                @for _ in 0..calendar.leading_blanks {
                    span class="day blank" {}
                }
                @for day in 1..=calendar.days_in_month {
                    a class=(day_class(calendar, day, self.selected))
                        href=(format!("/statistics?year={}&month={}&day={day}", calendar.year, calendar.month)) {
                        (day)
                    }
                }
            }
        }
    }
}

fn month_link(date: NaiveDate) -> String {
    format!("/statistics?year={}&month={}", date.format("%Y"), date.format("%-m"))
}

fn day_class(calendar: &MonthCalendar, day: u32, selected: &str) -> String {
    let date = format!("{:04}-{:02}-{:02}", calendar.year, calendar.month, day);
    let mut class = String::from("day");
    if calendar.today == Some(day) {
        class.push_str(" today");
    }
    if date == selected {
        class.push_str(" selected");
    }
    class
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).min(100.0)
}

struct Nav {
    active: View,
}

impl Render for Nav {
    fn render(&self) -> Markup {
        html! {
            nav {
                @for (view, label) in [
                    (View::Dashboard, "Dashboard"),
                    (View::Statistics, "Statistics"),
                    (View::Profile, "Profile"),
                ] {
                    a class=(if view == self.active { "active" } else { "" }) href=(view.path()) { (label) }
                }
                form method="post" action="/logout" {
                    button type="submit" class="link" { "Log out" }
                }
            }
        }
    }
}

fn page(title: &str, active: Option<View>, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · MindTrack" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    span class="brand" { "MindTrack - Wellness Tracker" }
                    @if let Some(active) = active {
                        (Nav { active })
                    }
                }
                main { (body) }
            }
        }
    }
    .into_string()
}

const STYLE: &str = r#"
    :root {
      --bg: #f4f5fb;
      --ink: #2b2a35;
      --muted: #77738a;
      --accent: #667eea;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(63, 71, 140, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg), #e9e4fb);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      padding: 18px 28px;
      background: var(--accent);
      color: white;
    }

    header .brand {
      font-weight: 700;
      font-size: 1.3rem;
    }

    nav {
      display: flex;
      gap: 14px;
      align-items: center;
    }

    nav a {
      color: white;
      text-decoration: none;
      opacity: 0.8;
    }

    nav a.active {
      opacity: 1;
      font-weight: 600;
    }

    main {
      width: min(880px, 100%);
      margin: 0 auto;
      padding: 28px 18px 48px;
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .card.narrow {
      max-width: 420px;
      margin: 40px auto;
      width: 100%;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 18px;
      display: grid;
      gap: 6px;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 700;
      color: var(--accent);
    }

    .stat .label,
    .hint {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .stack {
      display: grid;
      gap: 10px;
    }

    .inline {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
    }

    input,
    select,
    textarea {
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid #d8d6e6;
      font: inherit;
    }

    .inline input {
      flex: 1;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      background: var(--accent);
      color: white;
      font-weight: 600;
      cursor: pointer;
    }

    button.link {
      background: transparent;
      padding: 0;
      font-weight: 400;
    }

    .error {
      color: #c62828;
      background: #fdecea;
      padding: 10px 12px;
      border-radius: 10px;
    }

    .notice {
      color: #2e7d32;
      background: #e8f5e9;
      padding: 10px 12px;
      border-radius: 10px;
    }

    .habits {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 10px;
    }

    .habit {
      display: flex;
      align-items: center;
      gap: 12px;
    }

    .habit form {
      margin: 0;
    }

    .check {
      width: 28px;
      height: 28px;
      padding: 0;
      border-radius: 8px;
      background: white;
      border: 2px solid var(--accent);
      color: var(--accent);
    }

    .habit.completed .habit-name {
      text-decoration: line-through;
      color: var(--muted);
    }

    .progress-header {
      display: flex;
      justify-content: space-between;
      margin-bottom: 8px;
    }

    .bar-row {
      display: grid;
      grid-template-columns: 110px 1fr 48px;
      gap: 10px;
      align-items: center;
      margin: 6px 0;
    }

    .bar-track {
      background: #eceaf6;
      border-radius: 999px;
      height: 12px;
      overflow: hidden;
    }

    .bar-fill {
      background: var(--accent);
      height: 100%;
    }

    .bar-value {
      text-align: right;
    }

    .calendar-header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .calendar {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
      text-align: center;
    }

    .calendar .weekday {
      color: var(--muted);
      font-size: 0.8rem;
    }

    .calendar .day {
      padding: 8px 0;
      border-radius: 8px;
      color: var(--ink);
      text-decoration: none;
    }

    .calendar .day.today {
      border: 2px solid var(--accent);
    }

    .calendar .day.selected {
      background: var(--accent);
      color: white;
    }
"#;
