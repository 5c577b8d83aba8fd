//! User service - account administration and self-service profile changes.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewUser, Password, User, UserChanges, UserRole, PASSWORD_POLICY_MESSAGE};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Account created by an admin, with an explicit role
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub default_phone: Option<String>,
    pub role: UserRole,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: i32) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    async fn create_user(&self, account: NewAccount) -> AppResult<User>;

    /// Admin edit of any account, role included
    async fn update_user(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Caller edits their own profile; the role never changes this way
    async fn update_profile(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    async fn delete_user(&self, id: i32) -> AppResult<()>;

    async fn change_password(
        &self,
        id: i32,
        old_password: String,
        new_password: String,
    ) -> AppResult<()>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i32>) -> AppResult<()> {
        match self.uow.users().find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(AppError::conflict("Email is already taken"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("user")
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn create_user(&self, account: NewAccount) -> AppResult<User> {
        self.ensure_email_free(&account.email, None).await?;

        let password_hash = Password::new(&account.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                first_name: account.first_name,
                last_name: account.last_name,
                email: account.email,
                default_phone: account.default_phone,
                role: account.role,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        if let Some(email) = &changes.email {
            self.ensure_email_free(email, Some(id)).await?;
        }
        self.uow.users().update(id, changes).await
    }

    async fn update_profile(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        self.update_user(
            id,
            UserChanges {
                role: None,
                ..changes
            },
        )
        .await
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.uow.users().delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn change_password(
        &self,
        id: i32,
        old_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self.get_user(id).await?;
        let stored = Password::from_hash(user.password_hash);

        if !stored.verify(&old_password) {
            return Err(AppError::InvalidCredentials);
        }
        if stored.verify(&new_password) {
            return Err(AppError::invalid_field(
                "newPassword",
                "New password must be different than old password",
            ));
        }

        Password::check_strength(&new_password)
            .map_err(|_| AppError::invalid_field("newPassword", PASSWORD_POLICY_MESSAGE))?;
        let password_hash = Password::new(&new_password)?.into_string();

        self.uow.users().update_password(id, password_hash).await
    }
}
