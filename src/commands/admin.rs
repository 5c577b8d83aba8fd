//! Admin command - Bootstraps administrator accounts.
//!
//! Every user-management route needs an admin caller, so the first one is
//! created from the command line.

use std::sync::Arc;

use crate::cli::args::{AdminAction, AdminArgs, CreateAdminArgs};
use crate::config::Config;
use crate::domain::UserRole;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{NewAccount, UserManager, UserService};

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let users = UserManager::new(Arc::new(Persistence::new(db.get_connection())));

    match args.action {
        AdminAction::Create(create) => create_admin(&users, create).await,
    }
}

async fn create_admin(users: &dyn UserService, args: CreateAdminArgs) -> AppResult<()> {
    let role = if args.regular {
        UserRole::Admin
    } else {
        UserRole::SuperAdmin
    };

    let user = users
        .create_user(NewAccount {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            password: args.password,
            default_phone: None,
            role,
        })
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, role = %user.role, "Admin account created");
    println!("Created {} account {} (id {})", user.role, user.email, user.id);
    Ok(())
}
