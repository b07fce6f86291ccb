use crate::{error::Error, QueryFilterMap};
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::future::Future;
use std::time::Duration;

/// Deadline for operations returning a single record or writing one.
pub(crate) const SINGLE_OP_TIMEOUT: Duration = Duration::from_secs(10);
/// Deadline for operations returning many records.
pub(crate) const MANY_OP_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for count operations.
const COUNT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounds a database future with a deadline. An elapsed deadline surfaces as
/// a `ConnectionError` so the caller cannot distinguish it from an outage,
/// which is the intended behavior for a saturated pool.
pub(crate) async fn with_timeout<F, T>(limit: Duration, operation: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, sea_orm::DbErr>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => Ok(result?),
        Err(_elapsed) => Err(Error::timed_out()),
    }
}

/// Sort instruction applied to a find-many query. Entries are applied in
/// order, so the first field is the primary sort key.
#[derive(Debug, Clone)]
pub struct QuerySort {
    pub field: String,
    pub order: Order,
}

/// Find all records of an entity by the given query filter map.
pub async fn find_by<E, C>(
    db: &DatabaseConnection,
    query_filter_map: QueryFilterMap,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait,
    C: ColumnTrait + IntoEnumIterator,
{
    let query = filtered_query::<E, C>(query_filter_map);

    with_timeout(MANY_OP_TIMEOUT, query.all(db)).await
}

/// Find all records of an entity by the given query filter map, sorted by
/// the given sort instructions.
pub async fn find_by_sorted<E, C>(
    db: &DatabaseConnection,
    query_filter_map: QueryFilterMap,
    sorts: Vec<QuerySort>,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = filtered_query::<E, C>(query_filter_map);

    for sort in sorts {
        // Only sort by columns that actually exist on the entity.
        if let Some(column) = C::iter().find(|c| c.to_string() == sort.field) {
            query = query.order_by(column, sort.order.clone());
        } else {
            return Err(Error {
                source: None,
                error_kind: crate::error::EntityApiErrorKind::InvalidQueryTerm,
            });
        }
    }

    with_timeout(MANY_OP_TIMEOUT, query.all(db)).await
}

/// Find a single record of an entity by the given query filter map.
/// An empty result set is a `RecordNotFound` error, never a default record.
pub async fn find_one_by<E, C>(
    db: &DatabaseConnection,
    query_filter_map: QueryFilterMap,
) -> Result<E::Model, Error>
where
    E: EntityTrait,
    C: ColumnTrait + IntoEnumIterator,
{
    let query = filtered_query::<E, C>(query_filter_map);

    with_timeout(SINGLE_OP_TIMEOUT, query.one(db))
        .await?
        .ok_or_else(Error::record_not_found)
}

/// Count records of an entity matching the given query filter map.
pub async fn count_by<E, C>(
    db: &DatabaseConnection,
    query_filter_map: QueryFilterMap,
) -> Result<u64, Error>
where
    E: EntityTrait,
    E::Model: sea_orm::FromQueryResult + Send + Sync,
    C: ColumnTrait + IntoEnumIterator,
{
    let query = filtered_query::<E, C>(query_filter_map);

    with_timeout(COUNT_OP_TIMEOUT, query.count(db)).await
}

fn filtered_query<E, C>(query_filter_map: QueryFilterMap) -> sea_orm::Select<E>
where
    E: EntityTrait,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    query
}
