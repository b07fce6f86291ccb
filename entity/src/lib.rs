use uuid::Uuid;

// Core entities
pub mod analyses;
pub mod research_projects;
pub mod uploads;
pub mod users;

// Status enums
pub mod analysis_status;
pub mod project_status;

// JSON column value types
pub mod analysis_payloads;
pub mod data_summary;
pub mod research_variables;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
