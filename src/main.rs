use std::time::Duration;

use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worktrack::config::{get_config, load_env_files, Config};
use worktrack::routes::create_routes;
use worktrack::state::AppState;

#[derive(Parser)]
#[command(name = "worktrack")]
#[command(about = "Multi-tenant project and task tracker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply migrations and serve the HTTP API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Apply migrations and create demo users, projects and tasks
    Seed,
}

#[tokio::main]
async fn main() {
    load_env_files();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worktrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = get_config();

    let db = connect(config).await.expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db).await,
        Command::Migrate => {}
        Command::Seed => {
            let state = AppState::new(db);
            worktrack::seed::seed(&state)
                .await
                .expect("Failed to seed demo data");
        }
    }
}

async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(config.debug);

    let db = Database::connect(opt).await?;
    tracing::info!(env = %config.env, "Database connection established");
    Ok(db)
}

async fn serve(config: &Config, db: DatabaseConnection) {
    let app = create_routes(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&config.api_url)
        .await
        .expect("Failed to bind API_URL");
    tracing::info!(
        "Listening on {}",
        listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| config.api_url.clone())
    );
    axum::serve(listener, app).await.expect("Server error");
}
