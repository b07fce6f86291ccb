use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create research_projects table
        let create_projects_sql = r#"
            CREATE TABLE IF NOT EXISTS resana.research_projects (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL
                    REFERENCES resana.users(id) ON DELETE CASCADE,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                research_type VARCHAR(100) NOT NULL,
                hypothesis TEXT NOT NULL,
                variables JSONB NOT NULL DEFAULT '{}'::jsonb,
                status resana.project_status NOT NULL DEFAULT 'draft',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_projects_sql)
            .await?;

        // Create uploads table
        let create_uploads_sql = r#"
            CREATE TABLE IF NOT EXISTS resana.uploads (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                project_id UUID NOT NULL
                    REFERENCES resana.research_projects(id) ON DELETE CASCADE,
                file_name VARCHAR(255) NOT NULL,
                file_type VARCHAR(100) NOT NULL,
                file_size BIGINT NOT NULL,
                storage_url TEXT NOT NULL,
                data_summary JSONB NOT NULL DEFAULT '{}'::jsonb,
                uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_uploads_sql)
            .await?;

        // Create analyses table
        let create_analyses_sql = r#"
            CREATE TABLE IF NOT EXISTS resana.analyses (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                project_id UUID NOT NULL
                    REFERENCES resana.research_projects(id) ON DELETE CASCADE,
                upload_id UUID
                    REFERENCES resana.uploads(id) ON DELETE SET NULL,
                iteration INTEGER NOT NULL DEFAULT 1,
                status resana.analysis_status NOT NULL DEFAULT 'pending',
                recommendations JSONB NOT NULL DEFAULT '[]'::jsonb,
                selected_methods JSONB NOT NULL DEFAULT '[]'::jsonb,
                results JSONB NOT NULL DEFAULT '[]'::jsonb,
                figures JSONB NOT NULL DEFAULT '[]'::jsonb,
                summary TEXT,
                user_feedback TEXT,
                error_message TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                completed_at TIMESTAMPTZ,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_analyses_sql)
            .await?;

        // Indexes for the common listing queries
        manager
            .create_index(
                Index::create()
                    .name("research_projects_user_id")
                    .table((Alias::new("resana"), Alias::new("research_projects")))
                    .col(Alias::new("user_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uploads_project_id")
                    .table((Alias::new("resana"), Alias::new("uploads")))
                    .col(Alias::new("project_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uploads_uploaded_at")
                    .table((Alias::new("resana"), Alias::new("uploads")))
                    .col(Alias::new("uploaded_at"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("analyses_project_id")
                    .table((Alias::new("resana"), Alias::new("analyses")))
                    .col(Alias::new("project_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("analyses_created_at")
                    .table((Alias::new("resana"), Alias::new("analyses")))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("analyses_created_at")
                    .table((Alias::new("resana"), Alias::new("analyses")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("analyses_project_id")
                    .table((Alias::new("resana"), Alias::new("analyses")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uploads_uploaded_at")
                    .table((Alias::new("resana"), Alias::new("uploads")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uploads_project_id")
                    .table((Alias::new("resana"), Alias::new("uploads")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("research_projects_user_id")
                    .table((Alias::new("resana"), Alias::new("research_projects")))
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS resana.analyses;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS resana.uploads;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS resana.research_projects;")
            .await?;

        Ok(())
    }
}
