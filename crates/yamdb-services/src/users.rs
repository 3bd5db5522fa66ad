use std::sync::Arc;

use log::info;
use uuid::Uuid;
use yamdb_core::error::{AppError, Result};
use yamdb_core::models::{Role, User};
use yamdb_core::traits::UserRepo;
use yamdb_core::validation::FieldRules;

use crate::checked;

pub struct UserService {
    repo: Arc<dyn UserRepo>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    /// Validates and stores a new account. The stored email is the
    /// normalized one.
    pub async fn register(&self, mut user: User) -> Result<User> {
        checked("user", user.full_clean())?;
        self.repo.create_user(user.clone()).await?;
        info!("registered user `{}` as {}", user.username(), user.role);
        Ok(user)
    }

    pub async fn change_role(&self, id: Uuid, role: Role) -> Result<User> {
        let mut user = self
            .repo
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))?;
        user.role = role;
        self.repo.update_user(user.clone()).await?;
        info!("user `{}` is now {}", user.username(), role);
        Ok(user)
    }
}
