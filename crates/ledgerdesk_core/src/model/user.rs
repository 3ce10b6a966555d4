//! Dashboard user model.
//!
//! # Responsibility
//! - Define the user read model and the create/update form drafts.
//!
//! # Invariants
//! - Password material never appears on `UserRecord`.
//! - `NewUser` carries raw form input until `validate()` passes.

use crate::model::record::StoreRecord;
use crate::model::validation::{check_email, check_text, FieldErrors, ValidationError};
use serde::{Deserialize, Serialize};

pub const USER_NAME_MIN_CHARS: usize = 3;
pub const USER_NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 50;

/// User row as listed in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl StoreRecord for UserRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Raw input of the create-user form.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl NewUser {
    /// Checks field shapes. Password equality is checked separately so the
    /// caller can report it with its own message.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, "email", &self.email);
        check_password(
            &mut errors,
            "password",
            &self.password,
            "Please enter a password.",
        );
        check_password(
            &mut errors,
            "confirm_password",
            &self.confirm_password,
            "Please confirm your password.",
        );
        errors.into_result()
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

// Passwords stay out of debug output.
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Raw input of the edit-user form. Passwords are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

fn check_name(errors: &mut FieldErrors, value: &str) {
    check_text(
        errors,
        "name",
        "Name",
        value,
        "Please enter a name.",
        USER_NAME_MIN_CHARS,
        USER_NAME_MAX_CHARS,
    );
}

fn check_password(errors: &mut FieldErrors, field: &str, value: &str, missing: &str) {
    if value.is_empty() {
        errors.add(field, missing);
        return;
    }
    let count = value.chars().count();
    if count < PASSWORD_MIN_CHARS {
        errors.add(
            field,
            format!("Password must contain at least {PASSWORD_MIN_CHARS} characters."),
        );
    }
    if count > PASSWORD_MAX_CHARS {
        errors.add(
            field,
            format!("Password must contain at most {PASSWORD_MAX_CHARS} characters."),
        );
    }
}
