use sea_orm::{ConnectionTrait, Database, Statement};

use worktrack::config::{get_config, load_env_files};

/// Child tables first so foreign keys never block a drop.
const TABLES: [&str; 4] = ["tasks", "projects", "users", "seaql_migrations"];

#[tokio::main]
async fn main() {
    load_env_files();
    let config = get_config();

    let db = Database::connect(config.database_url.as_str())
        .await
        .expect("Failed to connect to database");
    let backend = db.get_database_backend();

    for table in TABLES {
        db.execute(Statement::from_string(
            backend,
            format!("DROP TABLE IF EXISTS \"{table}\""),
        ))
        .await
        .unwrap_or_else(|e| panic!("Failed to drop {table}: {e}"));
    }
    println!("Database reset successfully");
}
