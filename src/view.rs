use crate::session::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
    Statistics,
    Profile,
}

impl View {
    pub fn path(self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Dashboard => "/dashboard",
            View::Statistics => "/statistics",
            View::Profile => "/profile",
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, View::Login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Navigate(View),
    SignedIn,
    SignedOut,
}

/// Decides the screen to show after `event`. Guards are re-evaluated on
/// every call; nothing about the previous auth state is cached.
pub fn transition(current: View, auth: &AuthState, event: ViewEvent) -> View {
    match event {
        ViewEvent::SignedOut => View::Login,
        ViewEvent::SignedIn if auth.is_authenticated() => View::Dashboard,
        ViewEvent::SignedIn => current,
        ViewEvent::Navigate(target) if target.requires_auth() && !auth.is_authenticated() => {
            View::Login
        }
        ViewEvent::Navigate(target) => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn signed_in() -> AuthState {
        AuthState::Authenticated {
            token: "t".into(),
            user: User {
                id: 1,
                username: "sam".into(),
                email: "sam@example.com".into(),
                full_name: None,
                bio: None,
                avatar: None,
                created_at: None,
            },
        }
    }

    #[test]
    fn anonymous_visitors_land_on_login() {
        for target in [View::Dashboard, View::Statistics, View::Profile] {
            let next = transition(View::Login, &AuthState::Anonymous, ViewEvent::Navigate(target));
            assert_eq!(next, View::Login);
        }
    }

    #[test]
    fn signed_in_users_reach_every_view() {
        let auth = signed_in();
        for target in [View::Login, View::Dashboard, View::Statistics, View::Profile] {
            assert_eq!(
                transition(View::Dashboard, &auth, ViewEvent::Navigate(target)),
                target
            );
        }
    }

    #[test]
    fn sign_in_and_out_move_between_login_and_dashboard() {
        assert_eq!(
            transition(View::Login, &signed_in(), ViewEvent::SignedIn),
            View::Dashboard
        );
        assert_eq!(
            transition(View::Login, &AuthState::Anonymous, ViewEvent::SignedIn),
            View::Login
        );
        assert_eq!(
            transition(View::Profile, &AuthState::Anonymous, ViewEvent::SignedOut),
            View::Login
        );
    }
}
