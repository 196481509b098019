//! Admin account management.

use shopdex_api::db::{UserRepository, create_pool};

use super::CommandError;

/// Grant the admin role to a registered account by subject.
///
/// The account must already exist (i.e., have registered through the API);
/// promotion also approves the account.
///
/// # Errors
///
/// Returns `CommandError` if the subject is unknown or the database
/// operation fails.
pub async fn grant(subject: &str) -> Result<(), CommandError> {
    let database_url = super::database_url()?;
    let pool = create_pool(&database_url).await?;

    let user = UserRepository::new(&pool).grant_admin(subject).await?;

    tracing::info!(user_id = %user.id, subject, "admin role granted");
    Ok(())
}
