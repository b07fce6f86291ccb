use super::error::{EntityApiErrorKind, Error};
use crate::query::{with_timeout, SINGLE_OP_TIMEOUT};
use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use password_auth;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};

pub async fn create(db: &DatabaseConnection, user_model: Model) -> Result<Model, Error> {
    debug!(
        "New User Model to be inserted: {:?}",
        user_model.email.as_str()
    );

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        email: Set(user_model.email),
        password: Set(generate_hash(user_model.password)),
        full_name: Set(user_model.full_name),
        institution: Set(user_model.institution),
        research_field: Set(user_model.research_field),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    with_timeout(SINGLE_OP_TIMEOUT, user_active_model.insert(db)).await
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, Error> {
    with_timeout(
        SINGLE_OP_TIMEOUT,
        Entity::find().filter(Column::Email.eq(email)).one(db),
    )
    .await
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    with_timeout(SINGLE_OP_TIMEOUT, Entity::find_by_id(id).one(db))
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}
