use crate::error::Error;
use crate::query::{with_timeout, SINGLE_OP_TIMEOUT};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, Value,
};
use std::collections::HashMap;

/// Updates an existing record in the database using a map of column names to values.
///
/// Only the fields present in the map are touched; every other field keeps its
/// stored value. Two concurrent updates to the same record resolve per field,
/// last writer wins. There is no version check.
pub async fn update<A, C>(
    db: &DatabaseConnection,
    mut active_model: A,
    update_map: UpdateMap,
) -> Result<<A::Entity as EntityTrait>::Model, Error>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ColumnTrait,
    A::Entity: EntityTrait<Column = C>,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    for column in C::iter() {
        if let Some(value) = update_map.get(&column.to_string()) {
            active_model.set(column, value.clone());
        }
    }
    with_timeout(SINGLE_OP_TIMEOUT, active_model.update(db)).await
}

/// A map structure that holds column names and their corresponding values for updates.
///
/// This structure provides a flexible way to specify which fields should be updated
/// and their new values. It's designed to work with SeaORM's Value type and supports
/// optional values to handle nullable fields.
#[derive(Default)]
pub struct UpdateMap {
    map: HashMap<String, Option<Value>>,
}

impl UpdateMap {
    /// Creates a new empty UpdateMap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value from the map by its key.
    ///
    /// Returns an Option containing a reference to the Value if it exists,
    /// or None if the key is not found or the value is None.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).and_then(|opt| opt.as_ref())
    }

    /// Removes a key-value pair from the map.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key).and_then(|opt| opt)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key already exists, the value will be overwritten.
    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A trait that allows types to be converted into an UpdateMap.
///
/// This trait provides a way to convert various types into an UpdateMap,
/// making it easier to create update maps from different data structures.
pub trait IntoUpdateMap {
    /// Converts the implementing type into an UpdateMap.
    fn into_update_map(self) -> UpdateMap;
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::{analyses, analysis_status::AnalysisStatus, Id};
    use sea_orm::{ActiveValue::Unchanged, DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn update_only_touches_mapped_fields() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let stored = analyses::Model {
            id: Id::new_v4(),
            project_id: Id::new_v4(),
            upload_id: None,
            iteration: 1,
            status: AnalysisStatus::Completed,
            recommendations: Default::default(),
            selected_methods: Default::default(),
            results: Default::default(),
            figures: Default::default(),
            summary: Some("original summary".to_string()),
            user_feedback: None,
            error_message: None,
            created_at: now.into(),
            completed_at: None,
            updated_at: now.into(),
        };

        let mut returned = stored.clone();
        returned.user_feedback = Some("looks right".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![returned.clone()]])
            .into_connection();

        let mut active: analyses::ActiveModel = stored.clone().into();
        active.id = Unchanged(stored.id);

        let mut update_map = UpdateMap::new();
        update_map.insert(
            "user_feedback".to_string(),
            Some(Value::String(Some(Box::new("looks right".to_string())))),
        );

        let updated = update::<analyses::ActiveModel, analyses::Column>(&db, active, update_map)
            .await?;

        assert_eq!(updated.user_feedback, Some("looks right".to_string()));
        // Untouched fields keep their stored values
        assert_eq!(updated.summary, stored.summary);
        assert_eq!(updated.status, stored.status);

        Ok(())
    }
}
