//! Author reference data.

use crate::ids::AuthorId;
use serde::{Deserialize, Serialize};

/// A book author. Owned by the backend; the client only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: AuthorId,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Author {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "F. Last", as shown in cart listings.
    pub fn short_name(&self) -> String {
        match self.first_name.chars().next() {
            Some(initial) => format!("{}. {}", initial, self.last_name),
            None => self.last_name.clone(),
        }
    }
}
