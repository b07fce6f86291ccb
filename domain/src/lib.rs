//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters within the domain layer, while encapsulating
//! the underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    IntoQueryFilterMap, QueryFilterMap,
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    analyses, analysis_payloads, analysis_status, data_summary, query::QuerySort,
    research_projects, research_variables, uploads, users, Id,
};

pub mod analysis;
pub mod error;
pub mod export;
pub mod jwt;
pub mod research_project;
pub mod upload;
pub mod user;

pub mod gateway;
