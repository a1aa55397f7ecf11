use sea_orm::entity::prelude::*;

/// Cash-advance request created by a PIC, decided by the receiver.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Business key, e.g. `SUB-202608-1`. The matching Report carries the
    /// same value (soft link, no foreign key).
    #[sea_orm(unique)]
    pub unique_code: String,
    pub creator_id: i32,
    pub receiver_id: i32,
    pub amount_rupiah: i64,
    pub status: String,
    pub description: Option<String>,
    pub agency_id: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submission_logs::Entity")]
    SubmissionLogs,
}

impl Related<super::submission_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
