use sea_orm::entity::prelude::*;

/// Fuel-purchase claim filed against an accepted Submission.
///
/// `unique_code` equals the originating Submission's code by value; there is
/// deliberately no foreign key (legacy data relies on the soft link).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub unique_code: String,
    pub user_id: i32,
    pub vehicle_id: i32,
    pub amount_rupiah: i64,
    pub amount_liter: f64,
    pub status: String,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub odometer_km: Option<i32>,
    pub vehicle_photo: Option<String>,
    pub odometer_photo: Option<String>,
    pub invoice_photo: Option<String>,
    pub companion_photo: Option<String>,
    pub agency_id: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report_logs::Entity")]
    ReportLogs,
}

impl Related<super::report_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
