//! Synthetic sign-in for local UI work.

use crate::{AuthError, AuthState, AuthStore, AuthUser, Role, UserProfile};
use lectern_catalog::ids::UserId;

/// Toggles a fixed FAKE-role user without talking to the backend.
pub struct FakeAuth;

impl FakeAuth {
    /// The user injected when fake authentication is switched on.
    pub fn user() -> AuthUser {
        AuthUser::new(
            UserProfile {
                id: Some(UserId::new(1)),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "john.doe@gmail.com".to_string(),
            },
            Role::Fake,
        )
    }

    /// Sign the fake user in, or reset to signed out.
    pub fn set_authenticated(store: &mut AuthStore, authenticated: bool) -> Result<(), AuthError> {
        let state = if authenticated {
            tracing::warn!("fake authentication enabled");
            AuthState {
                user: Some(Self::user()),
            }
        } else {
            AuthState::default()
        };
        store.replace_state(state)
    }
}
