use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportLogs::ReportId).integer().not_null())
                    .col(ColumnDef::new(ReportLogs::Status).string().not_null())
                    .col(ColumnDef::new(ReportLogs::ActorId).integer().not_null())
                    .col(ColumnDef::new(ReportLogs::Notes).string())
                    .col(
                        ColumnDef::new(ReportLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReportLogs::Table, ReportLogs::ReportId)
                            .to(Reports::Table, Reports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ReportLogs::Table)
                    .col(ReportLogs::ReportId)
                    .name("idx_report_logs_report_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReportLogs {
    Table,
    Id,
    ReportId,
    Status,
    ActorId,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Reports {
    Table,
    Id,
}
