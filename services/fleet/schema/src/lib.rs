//! sea-orm entities for the fleet service database.

pub mod otp_codes;
pub mod outbox_events;
pub mod report_logs;
pub mod reports;
pub mod submission_logs;
pub mod submissions;
pub mod users;
pub mod vehicles;
