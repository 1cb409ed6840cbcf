use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/logout", post(handlers::logout))
        .route("/dashboard", get(handlers::dashboard))
        .route("/habits", post(handlers::add_habit))
        .route("/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/statistics", get(handlers::statistics))
        .route("/profile", get(handlers::profile).post(handlers::update_profile))
        .route("/profile/password", post(handlers::change_password))
        .route("/api/session", get(handlers::get_session))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit_json))
        .route("/api/habits/:id", delete(handlers::delete_habit))
        .route("/api/stats", get(handlers::get_stats))
        .fallback(handlers::index)
        .with_state(state)
}
