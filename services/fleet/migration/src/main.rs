use sea_orm_migration::prelude::*;

use armada_fleet_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
