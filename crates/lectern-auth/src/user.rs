//! User types.

use lectern_catalog::ids::UserId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::AuthError;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Regular reader.
    #[default]
    User,
    /// Library staff; manages books and orders.
    Librarian,
    /// Administrator.
    Admin,
    /// Synthetic role for local UI work.
    #[cfg(feature = "fake-auth")]
    Fake,
}

impl Role {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Librarian => "LIBRARIAN",
            Role::Admin => "ADMIN",
            #[cfg(feature = "fake-auth")]
            Role::Fake => "FAKE",
        }
    }

    /// Whether the role may use the management screens.
    pub fn grants_admin(&self) -> bool {
        match self {
            Role::User => false,
            Role::Librarian | Role::Admin => true,
            #[cfg(feature = "fake-auth")]
            Role::Fake => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            // The backend calls regular users readers.
            "USER" | "READER" => Ok(Role::User),
            "LIBRARIAN" => Ok(Role::Librarian),
            "ADMIN" => Ok(Role::Admin),
            #[cfg(feature = "fake-auth")]
            "FAKE" => Ok(Role::Fake),
            _ => Err(AuthError::UnknownRole(s.to_string())),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user without a role.
///
/// `users/me` omits the id for readers, so it is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<UserId>,
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    pub email: String,
}

impl UserProfile {
    /// Display name.
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub role: Role,
}

impl AuthUser {
    pub fn new(profile: UserProfile, role: Role) -> Self {
        Self { profile, role }
    }

    pub fn id(&self) -> Option<UserId> {
        self.profile.id
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn display_name(&self) -> String {
        self.profile.full_name()
    }
}

/// A user as returned by `users/me` and the administrator user list.
///
/// The role is absent on some backend revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<UserId>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserRecord {
    /// Split into the profile and the reported role.
    pub fn into_parts(self) -> (UserProfile, Option<Role>) {
        (
            UserProfile {
                id: self.id,
                first_name: self.first_name,
                last_name: self.last_name.unwrap_or_default(),
                email: self.email,
            },
            self.role,
        )
    }
}
