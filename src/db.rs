use std::time::Duration;

use migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

const PRAGMAS: [&str; 2] = ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

// The pool only drops a connection after it has lived or idled this long. sea-orm
// cannot switch the limits off, and a recycled connection takes the whole in-memory
// database with it.
const IN_MEMORY_CONNECTION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:")
}

fn connect_options(database_url: &str) -> ConnectOptions {
    let mut opts = ConnectOptions::new(database_url);
    opts.sqlx_logging(false);
    if is_in_memory(database_url) {
        // every pooled connection would otherwise see its own empty database
        opts.max_connections(1)
            .min_connections(1)
            .max_lifetime(IN_MEMORY_CONNECTION_TTL)
            .idle_timeout(IN_MEMORY_CONNECTION_TTL);
    }
    opts
}

pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(connect_options(database_url)).await?;

    if !is_in_memory(database_url) {
        for pragma in PRAGMAS {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}
