use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Projects)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Project::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Project::UserId).integer().not_null())
                    .col(ColumnDef::new(Project::Number).integer().not_null())
                    .col(ColumnDef::new(Project::Title).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Project::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Project::Platform).string_len(50).not_null())
                    .col(ColumnDef::new(Project::Client).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Project::EstimatedFee)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Project::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Project::Deadline).date().not_null())
                    .col(
                        ColumnDef::new(Project::LastTaskNumber)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Project::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Project::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Project::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_user")
                            .from(Project::Projects, Project::UserId)
                            .to(User::Users, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_user_number")
                    .table(Project::Projects)
                    .col(Project::UserId)
                    .col(Project::Number)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Project::Projects).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Project {
    Projects,
    Id,
    UserId,
    Number,
    Title,
    Description,
    Platform,
    Client,
    EstimatedFee,
    Status,
    Deadline,
    LastTaskNumber,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum User {
    Users,
    Id,
}
