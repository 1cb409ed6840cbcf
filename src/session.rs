use crate::models::{AuthResponse, User};
use crate::storage::{LocalStorage, StorageError, TOKEN_KEY, USER_KEY};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated { token: String, user: User },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated { user, .. } => Some(user),
            AuthState::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated { token, .. } => Some(token),
            AuthState::Anonymous => None,
        }
    }
}

/// Reads and writes the `token`/`user` pair in client storage.
///
/// The token is never validated locally; any present token with a parseable
/// user counts as signed in.
pub struct Session;

impl Session {
    pub fn current(storage: &LocalStorage) -> AuthState {
        let Some(token) = storage.get_item(TOKEN_KEY) else {
            return AuthState::Anonymous;
        };
        let user = storage
            .get_item(USER_KEY)
            .and_then(|raw| serde_json::from_str::<User>(raw).ok());

        match user {
            Some(user) => AuthState::Authenticated {
                token: token.to_string(),
                user,
            },
            None => AuthState::Anonymous,
        }
    }

    pub fn sign_in(storage: &mut LocalStorage, auth: AuthResponse) -> Result<(), StorageError> {
        let user = encode_user(&auth.user)?;
        storage.set_item(TOKEN_KEY, auth.token);
        storage.set_item(USER_KEY, user);
        info!(user = %auth.user.username, "signed in");
        Ok(())
    }

    pub fn sign_out(storage: &mut LocalStorage) {
        storage.remove_item(TOKEN_KEY);
        storage.remove_item(USER_KEY);
        info!("signed out");
    }

    pub fn replace_user(storage: &mut LocalStorage, user: &User) -> Result<(), StorageError> {
        storage.set_item(USER_KEY, encode_user(user)?);
        Ok(())
    }
}

fn encode_user(user: &User) -> Result<String, StorageError> {
    serde_json::to_string(user).map_err(|source| StorageError::Serialize {
        key: USER_KEY,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "ada".into(),
            email: "ada@example.com".into(),
            full_name: Some("Ada L".into()),
            bio: None,
            avatar: None,
            created_at: None,
        }
    }

    #[test]
    fn empty_storage_is_anonymous() {
        assert_eq!(Session::current(&LocalStorage::default()), AuthState::Anonymous);
    }

    #[test]
    fn sign_in_then_out() {
        let mut storage = LocalStorage::default();
        Session::sign_in(
            &mut storage,
            AuthResponse {
                token: "t-1".into(),
                user: user(),
            },
        )
        .unwrap();

        let state = Session::current(&storage);
        assert!(state.is_authenticated());
        assert_eq!(state.token(), Some("t-1"));
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("ada"));

        Session::sign_out(&mut storage);
        assert_eq!(Session::current(&storage), AuthState::Anonymous);
        assert!(storage.get_item(TOKEN_KEY).is_none());
        assert!(storage.get_item(USER_KEY).is_none());
    }

    #[test]
    fn token_without_user_is_anonymous() {
        let mut storage = LocalStorage::default();
        storage.set_item(TOKEN_KEY, "t-1");
        assert_eq!(Session::current(&storage), AuthState::Anonymous);

        storage.set_item(USER_KEY, "not a user");
        assert_eq!(Session::current(&storage), AuthState::Anonymous);
    }

    #[test]
    fn replace_user_keeps_token() {
        let mut storage = LocalStorage::default();
        Session::sign_in(
            &mut storage,
            AuthResponse {
                token: "t-1".into(),
                user: user(),
            },
        )
        .unwrap();

        let mut edited = user();
        edited.bio = Some("mathematician".into());
        Session::replace_user(&mut storage, &edited).unwrap();

        let state = Session::current(&storage);
        assert_eq!(state.token(), Some("t-1"));
        assert_eq!(state.user(), Some(&edited));
    }
}
