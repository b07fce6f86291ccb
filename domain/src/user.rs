use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::jwt::TokenKeys;
use crate::users::Model;
use entity::Id;
pub use entity_api::user::find_by_id;
use entity_api::user;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;

/// Registers a new user account. The email must not already be taken;
/// the password is hashed before it is stored.
pub async fn register(db: &DatabaseConnection, user_model: Model) -> Result<Model, Error> {
    if user::find_by_email(db, &user_model.email).await?.is_some() {
        debug!("Registration rejected, email already taken");
        return Err(Error::new(DomainErrorKind::Internal(
            InternalErrorKind::Entity(EntityErrorKind::Invalid),
        )));
    }

    Ok(user::create(db, user_model).await?)
}

/// Authenticates a user by email and password and issues an access token.
///
/// A missing account and a wrong password produce the same error so the
/// response does not reveal which one failed.
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<(String, Model), Error> {
    let user = user::find_by_email(db, email).await?.ok_or_else(|| {
        debug!("Login rejected, no account for the given email");
        Error::new(DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::Unauthenticated,
        )))
    })?;

    user::verify_password(password, &user.password).await?;

    let token = TokenKeys::from_config(config)?.issue(&user)?;

    Ok((token, user))
}

/// Loads the profile of the authenticated user.
pub async fn profile(db: &DatabaseConnection, user_id: Id) -> Result<Model, Error> {
    Ok(user::find_by_id(db, user_id).await?)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_model() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            email: "researcher@university.edu".to_string(),
            password: entity_api::user::generate_hash("a strong password".to_string()),
            full_name: "Ada Lovelace".to_string(),
            institution: None,
            research_field: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn register_rejects_a_taken_email() {
        let existing = user_model();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing.clone()]])
            .into_connection();

        let result = register(&db, existing).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid))
        );
    }

    #[tokio::test]
    async fn login_rejects_an_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let config = Config::default();
        let result = login(&db, &config, "nobody@university.edu", "whatever").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Unauthenticated))
        );
    }

    #[tokio::test]
    async fn login_rejects_a_wrong_password() {
        let user = user_model();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user]])
            .into_connection();

        let config = Config::default();
        let result = login(&db, &config, "researcher@university.edu", "wrong password").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Unauthenticated))
        );
    }
}
