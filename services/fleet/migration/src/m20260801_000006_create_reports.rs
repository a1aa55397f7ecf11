use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No FK to submissions: the unique_code link is by value only
        // (legacy data relies on the soft link).
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reports::UniqueCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Reports::UserId).integer().not_null())
                    .col(ColumnDef::new(Reports::VehicleId).integer().not_null())
                    .col(
                        ColumnDef::new(Reports::AmountRupiah)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reports::AmountLiter).double().not_null())
                    .col(ColumnDef::new(Reports::Status).string().not_null())
                    .col(ColumnDef::new(Reports::GpsLat).double())
                    .col(ColumnDef::new(Reports::GpsLng).double())
                    .col(ColumnDef::new(Reports::OdometerKm).integer())
                    .col(ColumnDef::new(Reports::VehiclePhoto).string())
                    .col(ColumnDef::new(Reports::OdometerPhoto).string())
                    .col(ColumnDef::new(Reports::InvoicePhoto).string())
                    .col(ColumnDef::new(Reports::CompanionPhoto).string())
                    .col(ColumnDef::new(Reports::AgencyId).integer().not_null())
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reports::Table, Reports::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reports::Table, Reports::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Reports::Table)
                    .col(Reports::AgencyId)
                    .name("idx_reports_agency_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reports {
    Table,
    Id,
    UniqueCode,
    UserId,
    VehicleId,
    AmountRupiah,
    AmountLiter,
    Status,
    GpsLat,
    GpsLng,
    OdometerKm,
    VehiclePhoto,
    OdometerPhoto,
    InvoicePhoto,
    CompanionPhoto,
    AgencyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
}
