use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_vehicles;
mod m20260801_000003_create_otp_codes;
mod m20260801_000004_create_submissions;
mod m20260801_000005_create_submission_logs;
mod m20260801_000006_create_reports;
mod m20260801_000007_create_report_logs;
mod m20260801_000008_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_vehicles::Migration),
            Box::new(m20260801_000003_create_otp_codes::Migration),
            Box::new(m20260801_000004_create_submissions::Migration),
            Box::new(m20260801_000005_create_submission_logs::Migration),
            Box::new(m20260801_000006_create_reports::Migration),
            Box::new(m20260801_000007_create_report_logs::Migration),
            Box::new(m20260801_000008_create_outbox_events::Migration),
        ]
    }
}
