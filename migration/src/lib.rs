pub use sea_orm_migration::prelude::*;

mod m20250815_101500_create_schema_and_users;
mod m20250815_103000_create_projects_uploads_analyses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250815_101500_create_schema_and_users::Migration),
            Box::new(m20250815_103000_create_projects_uploads_analyses::Migration),
        ]
    }
}
