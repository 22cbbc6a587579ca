use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A registered storefront customer. `email` is the business key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Body of a registration request. Only `email` is required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Whether a registration created a new record or merged into an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl RegisterUserInput {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: Some(email.into()), ..Default::default() }
    }

    /// The trimmed email, or a validation error when it is absent or blank.
    pub fn email(&self) -> Result<&str, ModelError> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ModelError::Validation("email is required".into()))
    }

    pub fn into_user(self, id: String, created_at: DateTime<Utc>) -> Result<User, ModelError> {
        let email = self.email()?.to_string();
        Ok(User {
            id,
            name: self.name.unwrap_or_default(),
            email,
            phone: self.phone.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            created_at,
        })
    }
}

impl User {
    /// Copy non-empty profile fields from a re-registration. Email and id never change.
    pub fn merge_profile(&mut self, input: &RegisterUserInput) {
        if let Some(name) = non_empty(&input.name) {
            self.name = name.to_string();
        }
        if let Some(phone) = non_empty(&input.phone) {
            self.phone = phone.to_string();
        }
        if let Some(address) = non_empty(&input.address) {
            self.address = address.to_string();
        }
    }
}

/// Emails match ignoring surrounding whitespace, so records written with padding
/// still resolve.
fn same_email(stored: &str, wanted: &str) -> bool {
    stored.trim() == wanted.trim()
}

pub fn find_by_email<'a>(users: &'a [User], email: &str) -> Option<&'a User> {
    users.iter().find(|u| same_email(&u.email, email))
}

pub fn find_by_id<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    users.iter().find(|u| u.id == id)
}

/// Register into an in-memory collection: merge into the user with the same email,
/// or append a new one built with `make_id`. The caller persists `users` afterwards.
pub fn upsert_by_email<F>(
    users: &mut Vec<User>,
    input: RegisterUserInput,
    make_id: F,
    now: DateTime<Utc>,
) -> Result<(User, Upsert), ModelError>
where
    F: FnOnce() -> String,
{
    let email = input.email()?.to_string();
    if let Some(existing) = users.iter_mut().find(|u| same_email(&u.email, &email)) {
        existing.merge_profile(&input);
        return Ok((existing.clone(), Upsert::Updated));
    }
    let user = input.into_user(make_id(), now)?;
    users.push(user.clone());
    Ok((user, Upsert::Created))
}
