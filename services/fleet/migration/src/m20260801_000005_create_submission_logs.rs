use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubmissionLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionLogs::SubmissionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionLogs::Status).string().not_null())
                    .col(ColumnDef::new(SubmissionLogs::ActorId).integer().not_null())
                    .col(ColumnDef::new(SubmissionLogs::Notes).string())
                    .col(
                        ColumnDef::new(SubmissionLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubmissionLogs::Table, SubmissionLogs::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(SubmissionLogs::Table)
                    .col(SubmissionLogs::SubmissionId)
                    .name("idx_submission_logs_submission_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubmissionLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SubmissionLogs {
    Table,
    Id,
    SubmissionId,
    Status,
    ActorId,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Submissions {
    Table,
    Id,
}
