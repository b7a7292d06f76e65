//! `users` collection profile

use crate::ids::UserId;
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile document stored under `users/{uid}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Document id, equal to the account uid
    #[serde(skip)]
    pub uid: Option<UserId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Sabha an admin or user is scoped to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pradeshika_sabha: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Create new profile
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role, created_at: DateTime<Utc>) -> Self {
        Self {
            uid: None,
            email: email.into(),
            role,
            pradeshika_sabha: None,
            created_at: Some(created_at),
        }
    }

    /// With sabha scope
    #[must_use]
    pub fn with_sabha(mut self, sabha: impl Into<String>) -> Self {
        let sabha = sabha.into();
        self.pradeshika_sabha = (!sabha.trim().is_empty()).then_some(sabha);
        self
    }

    /// With document id
    #[must_use]
    pub fn with_uid(mut self, uid: UserId) -> Self {
        self.uid = Some(uid);
        self
    }
}
