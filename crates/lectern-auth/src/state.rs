//! Durable authentication state.

use crate::{AccessToken, AuthError, AuthUser, Role, UserProfile};
use lectern_store::{Cache, Persisted};
use serde::{Deserialize, Serialize};

/// Cache key of the signed-in user.
pub const AUTH_KEY: &str = "auth";
/// Cache key of the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Where the UI goes after signing out.
pub const LANDING_ROUTE: &str = "/home";

/// Persisted authentication state.
///
/// Authentication is derived from the presence of a user, so the two can
/// never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub user: Option<AuthUser>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// A navigation request produced by a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
}

/// Auth store over the `auth` and `access_token` slots.
#[derive(Debug)]
pub struct AuthStore {
    state: Persisted<AuthState>,
    token: Persisted<Option<AccessToken>>,
}

impl AuthStore {
    /// Bind to `cache` without reading it.
    pub fn new(cache: Cache) -> Self {
        Self {
            state: Persisted::new(cache.clone(), AUTH_KEY),
            token: Persisted::new(cache, ACCESS_TOKEN_KEY),
        }
    }

    /// Bind to `cache` and load both slots.
    pub fn load(cache: Cache) -> Self {
        let mut store = Self::new(cache);
        store.rehydrate();
        store
    }

    pub fn rehydrate(&mut self) {
        self.state.rehydrate();
        self.token.rehydrate();
    }

    pub fn hydrated(&self) -> bool {
        self.state.hydrated() && self.token.hydrated()
    }

    /// Full state, once hydrated.
    pub fn state(&self) -> Option<&AuthState> {
        self.state.get()
    }

    /// Signed-in user. `None` until hydrated.
    pub fn user(&self) -> Option<&AuthUser> {
        self.state.get().and_then(|s| s.user.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Whether the signed-in user may use the management screens.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.role.grants_admin())
    }

    /// Fail unless an administrator is signed in.
    pub fn require_admin(&self) -> Result<&AuthUser, AuthError> {
        let user = self.user().ok_or(AuthError::NotAuthenticated)?;
        if user.role.grants_admin() {
            Ok(user)
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }

    /// Record the signed-in user together with their role.
    pub fn set_user(&mut self, profile: UserProfile, role: Role) -> Result<(), AuthError> {
        let user = AuthUser::new(profile, role);
        tracing::info!(user_id = ?user.id(), role = %role, "signed in");
        self.state.update(|s| s.user = Some(user))?;
        Ok(())
    }

    /// Replace the profile fields of the signed-in user, keeping the role.
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<(), AuthError> {
        let role = self.user().ok_or(AuthError::NotAuthenticated)?.role;
        self.state.update(|s| s.user = Some(AuthUser::new(profile, role)))?;
        Ok(())
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.get().and_then(Option::as_ref)
    }

    pub fn store_token(&mut self, token: AccessToken) -> Result<(), AuthError> {
        self.token.update(|t| *t = Some(token))?;
        Ok(())
    }

    /// Drop the user and token and send the UI to the landing route.
    ///
    /// Both slots are emptied in memory even when removing a durable copy
    /// fails; the first storage error is returned afterwards.
    pub fn sign_out(&mut self) -> Result<Redirect, AuthError> {
        let token = self.token.clear();
        let state = self.state.clear();
        token?;
        state?;
        tracing::info!("signed out");
        Ok(Redirect { to: LANDING_ROUTE })
    }

    /// Write an arbitrary state. Used by development tooling.
    #[cfg(feature = "fake-auth")]
    pub(crate) fn replace_state(&mut self, state: AuthState) -> Result<(), AuthError> {
        self.state.update(|s| *s = state)?;
        Ok(())
    }
}
