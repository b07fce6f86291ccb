use domain::{Id, IntoUpdateMap, UpdateMap};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct RecommendParams {
    #[schema(value_type = Option<String>)]
    pub(crate) upload_id: Option<Id>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RefineParams {
    pub(crate) instructions: String,
}

/// Only the status and the researcher's notes are caller-editable; results
/// and summaries are owned by the processing pipeline.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) status: Option<String>,
    pub(crate) notes: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(status) = self.status {
            update_map.insert(
                "status".to_string(),
                Some(Value::String(Some(Box::new(status)))),
            );
        }
        if let Some(notes) = self.notes {
            update_map.insert(
                "user_feedback".to_string(),
                Some(Value::String(Some(Box::new(notes)))),
            );
        }

        update_map
    }
}
