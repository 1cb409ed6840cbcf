use crate::errors::AppError;
use crate::models::{
    Habit, NewHabitRequest, PasswordChange, ProfileUpdate, RegisterRequest, SessionResponse,
};
use crate::session::{AuthState, Session};
use crate::state::{AppState, ClientStore};
use crate::stats::{StatsResponse, build_stats, build_stats_at};
use crate::storage::persist_storage;
use crate::ui::{LoginMode, render_dashboard, render_login, render_profile, render_statistics};
use crate::view::{View, ViewEvent, transition};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use tracing::info;

const INVALID_HABIT: &str = "Please enter a habit name and choose a category";
const PASSWORD_MISMATCH: &str = "New passwords do not match";

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub mode: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct HabitForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// Runs the navigation guard for `target`: the signed-in state, or a
/// redirect to wherever the view machine sends the visitor instead.
fn guard(store: &ClientStore, target: View) -> Result<AuthState, Redirect> {
    let auth = Session::current(store.storage());
    let next = transition(target, &auth, ViewEvent::Navigate(target));
    if next == target {
        Ok(auth)
    } else {
        Err(Redirect::to(next.path()))
    }
}

fn require_auth(store: &ClientStore) -> Result<AuthState, AppError> {
    let auth = Session::current(store.storage());
    if auth.is_authenticated() {
        Ok(auth)
    } else {
        Err(AppError::unauthorized())
    }
}

async fn persist(state: &AppState, store: &ClientStore) -> Result<(), AppError> {
    persist_storage(&state.data_path, store.storage()).await?;
    Ok(())
}

pub async fn index(State(state): State<AppState>) -> Redirect {
    let store = state.store.lock().await;
    let auth = Session::current(store.storage());
    let next = transition(View::Login, &auth, ViewEvent::Navigate(View::Dashboard));
    Redirect::to(next.path())
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let mode = LoginMode::from_param(query.mode.as_deref());
    Html(render_login(mode, None))
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let mode = LoginMode::from_param(form.mode.as_deref());
    let result = match mode {
        LoginMode::SignIn => state.api.login(&form.email, &form.password).await,
        LoginMode::Register => {
            let fields = RegisterRequest {
                username: form.username,
                email: form.email,
                password: form.password,
                full_name: form.full_name,
            };
            state.api.register(&fields).await
        }
    };

    let auth = match result {
        Ok(auth) => auth,
        Err(err) => {
            let status = match err.status() {
                Some(code) => StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                None => StatusCode::BAD_GATEWAY,
            };
            let page = render_login(mode, Some(&err.to_string()));
            return Ok((status, Html(page)).into_response());
        }
    };

    let mut store = state.store.lock().await;
    Session::sign_in(store.storage_mut(), auth)?;
    persist(&state, &store).await?;

    let current = Session::current(store.storage());
    let next = transition(View::Login, &current, ViewEvent::SignedIn);
    Ok(Redirect::to(next.path()).into_response())
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let mut store = state.store.lock().await;
    Session::sign_out(store.storage_mut());
    persist(&state, &store).await?;

    let current = Session::current(store.storage());
    let next = transition(View::Dashboard, &current, ViewEvent::SignedOut);
    Ok(Redirect::to(next.path()))
}

pub async fn dashboard(State(state): State<AppState>) -> Response {
    let store = state.store.lock().await;
    let auth = match guard(&store, View::Dashboard) {
        Ok(auth) => auth,
        Err(redirect) => return redirect.into_response(),
    };
    let Some(user) = auth.user() else {
        return Redirect::to(View::Login.path()).into_response();
    };
    Html(render_dashboard(user, store.habits(), None)).into_response()
}

pub async fn add_habit(
    State(state): State<AppState>,
    Form(form): Form<HabitForm>,
) -> Result<Response, AppError> {
    let mut store = state.store.lock().await;
    let auth = match guard(&store, View::Dashboard) {
        Ok(auth) => auth,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    if store.add(&form.name, &form.category)?.is_none() {
        let page = match auth.user() {
            Some(user) => render_dashboard(user, store.habits(), Some(INVALID_HABIT)),
            None => return Ok(Redirect::to(View::Login.path()).into_response()),
        };
        return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
    }

    persist(&state, &store).await?;
    Ok(Redirect::to(View::Dashboard.path()).into_response())
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    let mut store = state.store.lock().await;
    if let Err(redirect) = guard(&store, View::Dashboard) {
        return Ok(redirect);
    }

    if store.toggle(id)?.is_some() {
        persist(&state, &store).await?;
    }
    Ok(Redirect::to(View::Dashboard.path()))
}

pub async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Response {
    let store = state.store.lock().await;
    if let Err(redirect) = guard(&store, View::Statistics) {
        return redirect.into_response();
    }

    let today = Local::now().date_naive();
    let selected = selected_date(&query, today);
    let stats = build_stats_at(today, selected, store.habits());
    Html(render_statistics(&stats)).into_response()
}

/// The calendar day the statistics screen focuses on. Without a `day`, a
/// month other than the current one selects its 1st.
fn selected_date(query: &CalendarQuery, today: NaiveDate) -> NaiveDate {
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    let day = query.day.unwrap_or_else(|| {
        if year == today.year() && month == today.month() {
            today.day()
        } else {
            1
        }
    });
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
}

pub async fn profile(State(state): State<AppState>) -> Response {
    let auth = {
        let store = state.store.lock().await;
        match guard(&store, View::Profile) {
            Ok(auth) => auth,
            Err(redirect) => return redirect.into_response(),
        }
    };
    let AuthState::Authenticated { token, user } = auth else {
        return Redirect::to(View::Login.path()).into_response();
    };

    match state.api.get_profile(&token).await {
        Ok(fresh) => Html(render_profile(&fresh, None, None)).into_response(),
        Err(err) => Html(render_profile(&user, None, Some(&err.to_string()))).into_response(),
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Form(update): Form<ProfileUpdate>,
) -> Result<Response, AppError> {
    let auth = {
        let store = state.store.lock().await;
        match guard(&store, View::Profile) {
            Ok(auth) => auth,
            Err(redirect) => return Ok(redirect.into_response()),
        }
    };
    let AuthState::Authenticated { token, user } = auth else {
        return Ok(Redirect::to(View::Login.path()).into_response());
    };

    match state.api.update_profile(&token, &update).await {
        Ok(updated) => {
            let mut store = state.store.lock().await;
            Session::replace_user(store.storage_mut(), &updated)?;
            persist(&state, &store).await?;
            info!(user = %updated.username, "profile updated");
            let page = render_profile(&updated, Some("Profile updated successfully!"), None);
            Ok(Html(page).into_response())
        }
        Err(err) => {
            let page = render_profile(&user, None, Some(&err.to_string()));
            Ok(Html(page).into_response())
        }
    }
}

pub async fn change_password(
    State(state): State<AppState>,
    Form(form): Form<PasswordForm>,
) -> Response {
    let auth = {
        let store = state.store.lock().await;
        match guard(&store, View::Profile) {
            Ok(auth) => auth,
            Err(redirect) => return redirect.into_response(),
        }
    };
    let AuthState::Authenticated { token, user } = auth else {
        return Redirect::to(View::Login.path()).into_response();
    };

    if form.new_password != form.confirm_password {
        let page = render_profile(&user, None, Some(PASSWORD_MISMATCH));
        return (StatusCode::BAD_REQUEST, Html(page)).into_response();
    }

    let change = PasswordChange {
        current_password: form.current_password,
        new_password: form.new_password,
    };
    let page = match state.api.change_password(&token, &change).await {
        Ok(()) => render_profile(&user, Some("Password changed successfully!"), None),
        Err(err) => render_profile(&user, None, Some(&err.to_string())),
    };
    Html(page).into_response()
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let store = state.store.lock().await;
    let auth = Session::current(store.storage());
    Json(SessionResponse {
        authenticated: auth.is_authenticated(),
        user: auth.user().cloned(),
    })
}

pub async fn list_habits(State(state): State<AppState>) -> Result<Json<Vec<Habit>>, AppError> {
    let store = state.store.lock().await;
    require_auth(&store)?;
    Ok(Json(store.habits().to_vec()))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let mut store = state.store.lock().await;
    require_auth(&store)?;

    let habit = store
        .add(&payload.name, &payload.category)?
        .ok_or_else(|| AppError::bad_request(INVALID_HABIT))?;
    persist(&state, &store).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn toggle_habit_json(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Habit>, AppError> {
    let mut store = state.store.lock().await;
    require_auth(&store)?;

    let habit = store
        .toggle(id)?
        .ok_or_else(|| AppError::not_found(format!("no habit with id {id}")))?;
    persist(&state, &store).await?;
    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Habit>, AppError> {
    let mut store = state.store.lock().await;
    require_auth(&store)?;

    let habit = store
        .remove(id)?
        .ok_or_else(|| AppError::not_found(format!("no habit with id {id}")))?;
    persist(&state, &store).await?;
    Ok(Json(habit))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let store = state.store.lock().await;
    require_auth(&store)?;
    Ok(Json(build_stats(store.habits())))
}
