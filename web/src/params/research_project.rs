use sea_orm::Value;
use serde::Deserialize;
use utoipa::IntoParams;

use domain::{IntoQueryFilterMap, QueryFilterMap};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) status: Option<String>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "status".to_string(),
            self.status
                .map(|status| Value::String(Some(Box::new(status)))),
        );

        query_filter_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_params_without_a_status_produce_no_filter() {
        let params = IndexParams { status: None };
        let query_filter_map = params.into_query_filter_map();
        assert!(query_filter_map.get("status").is_none());
    }

    #[test]
    fn index_params_with_a_status_filter_on_it() {
        let params = IndexParams {
            status: Some("active".to_string()),
        };
        let query_filter_map = params.into_query_filter_map();
        assert_eq!(
            query_filter_map.get("status"),
            Some(Value::String(Some(Box::new("active".to_string()))))
        );
    }
}
