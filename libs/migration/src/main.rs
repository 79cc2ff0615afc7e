//! Schema CLI: `up`, `down`, `status`, `fresh`, `refresh` and `reset` against `DATABASE_URL`.

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
