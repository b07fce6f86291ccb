use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct LoginParams {
    pub(crate) email: String,
    pub(crate) password: String,
}
