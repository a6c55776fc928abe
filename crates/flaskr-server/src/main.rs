use std::net::SocketAddr;
use std::path::PathBuf;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use flaskr_db::Database;
use flaskr_web::AppState;

const DEV_SECRET: &str = "dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flaskr=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let secret = std::env::var("FLASKR_SECRET_KEY").unwrap_or_else(|_| DEV_SECRET.into());
    let db_path = std::env::var("FLASKR_DB_PATH").unwrap_or_else(|_| "flaskr.db".into());
    let host = std::env::var("FLASKR_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("FLASKR_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    let db = Database::open(&PathBuf::from(&db_path))?;

    // Maintenance command: destructive schema reset, then exit.
    if std::env::args().nth(1).as_deref() == Some("init-db") {
        db.init_schema()?;
        println!("Initialized the database.");
        return Ok(());
    }

    if secret == DEV_SECRET {
        warn!("FLASKR_SECRET_KEY is unset; sessions are signed with the dev key");
    }

    let state = AppState::new(db, &secret);
    let app = flaskr_web::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("flaskr listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
