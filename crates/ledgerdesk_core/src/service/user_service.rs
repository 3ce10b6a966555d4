//! User management use-cases.
//!
//! # Responsibility
//! - Validate user forms and persist users with hashed passwords.
//! - Provide paged, filtered user listings.
//!
//! # Invariants
//! - Plain-text passwords are hashed before reaching the repository.
//! - Mismatched confirmation reports only `confirm_password`.

use crate::model::user::{NewUser, UserRecord, UserUpdate};
use crate::model::validation::FieldErrors;
use crate::repo::user_repo::UserRepository;
use crate::repo::{ListQuery, RepoError};
use crate::service::password::hash_password;
use crate::service::{page_count, ActionResult, ServiceError, ServiceResult, DEFAULT_ITEMS_PER_PAGE};
use log::{error, info, warn};

const ENTITY: &str = "user";

/// User Data Service over a repository implementation.
pub struct UserService<R: UserRepository> {
    repo: R,
    items_per_page: u32,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_page_size(repo, DEFAULT_ITEMS_PER_PAGE)
    }

    pub fn with_page_size(repo: R, items_per_page: u32) -> Self {
        Self {
            repo,
            items_per_page: items_per_page.max(1),
        }
    }

    /// Creates a user from the create-user form.
    pub fn create_user(&self, draft: &NewUser) -> ActionResult {
        if let Err(err) = draft.validate() {
            return ActionResult::invalid(
                err.into_field_errors(),
                "Missing Fields. Failed to Add User.",
            );
        }
        if !draft.passwords_match() {
            return ActionResult::invalid(
                FieldErrors::single("confirm_password", "Passwords do not match."),
                "Passwords do not match. Failed to Add User.",
            );
        }

        let user = UserRecord {
            id: String::new(),
            name: draft.name.clone(),
            email: draft.email.clone(),
        };
        let password_hash = match hash_password(&draft.password) {
            Ok(hash) => hash,
            Err(err) => {
                error!("event=user_create module=service status=error error_code=hash_failed error={err}");
                return ActionResult::failed("Database Error: Failed to Add User.");
            }
        };
        match self.repo.create_user(&user, &password_hash) {
            Ok(id) => {
                info!("event=user_create module=service status=ok id={id}");
                ActionResult::ok("Added User.")
            }
            Err(err) => {
                error!("event=user_create module=service status=error error={err}");
                ActionResult::failed("Database Error: Failed to Add User.")
            }
        }
    }

    /// Rewrites name and email of an existing user.
    pub fn update_user(&self, update: &UserUpdate) -> ActionResult {
        if let Err(err) = update.validate() {
            return ActionResult::invalid(
                err.into_field_errors(),
                "Missing Fields. Failed to Update User.",
            );
        }

        let user = UserRecord {
            id: update.id.clone(),
            name: update.name.clone(),
            email: update.email.clone(),
        };
        match self.repo.update_user(&user) {
            Ok(()) => {
                info!("event=user_update module=service status=ok id={}", user.id);
                ActionResult::ok("Updated User.")
            }
            Err(RepoError::NotFound(id)) => {
                warn!("event=user_update module=service status=error id={id} error_code=not_found");
                ActionResult::failed("User not found. Failed to Update User.")
            }
            Err(err) => {
                error!(
                    "event=user_update module=service status=error id={} error={err}",
                    user.id
                );
                ActionResult::failed("Database Error: Failed to Update User.")
            }
        }
    }

    pub fn delete_user(&self, id: &str) -> ActionResult {
        match self.repo.delete_user(id) {
            Ok(()) | Err(RepoError::NotFound(_)) => {
                info!("event=user_delete module=service status=ok id={id}");
                ActionResult::ok("Deleted User.")
            }
            Err(err) => {
                error!("event=user_delete module=service status=error id={id} error={err}");
                ActionResult::failed("Database Error: Failed to Delete User.")
            }
        }
    }

    /// Loads one user or signals not-found.
    pub fn get_user(&self, id: &str) -> ServiceResult<UserRecord> {
        self.repo
            .get_user(id)
            .map_err(ServiceError::fetch(ENTITY))?
            .ok_or_else(|| ServiceError::NotFound {
                entity: ENTITY,
                id: id.to_string(),
            })
    }

    /// One page of users whose name or email matches `query`.
    pub fn list_users(&self, query: &str, page: u32) -> ServiceResult<Vec<UserRecord>> {
        self.repo
            .list_users(&ListQuery::page(query, page, self.items_per_page))
            .map_err(ServiceError::fetch(ENTITY))
    }

    pub fn user_pages(&self, query: &str) -> ServiceResult<u32> {
        let total = self
            .repo
            .count_users(&ListQuery::matching(query))
            .map_err(ServiceError::fetch(ENTITY))?;
        Ok(page_count(total, self.items_per_page))
    }

    /// Every user, unpaged.
    pub fn all_users(&self) -> ServiceResult<Vec<UserRecord>> {
        self.repo
            .list_users(&ListQuery::default())
            .map_err(ServiceError::fetch(ENTITY))
    }
}
