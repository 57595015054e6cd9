use backend::{
    catchers::{bad_request, internal_error, not_found, unauthorized},
    cors::CORS,
    routes::{
        admin_login, admin_logout, all_options, create_vote, delete_vote, get_replay, get_report,
        get_status, get_summary, list_votes, update_vote, votes_by_department, AppState,
    },
};
use rocket::{catchers, routes};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn connect_database() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            warn!("DATABASE_URL not set - running against the local cache only");
            return None;
        }
    };

    let pool = match PgPoolOptions::new().max_connections(5).connect(&url).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!("database unreachable, starting offline: {e}");
            return None;
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("migrations failed, starting offline: {e}");
        return None;
    }
    info!("📋 Migrations complete");
    Some(pool)
}

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🗳️ Starting election tracker server");

    let pool = connect_database().await;
    let cache_path = std::env::var("CACHE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("votes_cache.json"));
    let state = AppState::new(pool, cache_path);

    let _ = rocket::build()
        .attach(CORS)
        .manage(state)
        .mount(
            "/api",
            routes![
                list_votes,
                votes_by_department,
                get_summary,
                get_replay,
                get_report,
                get_status,
                admin_login,
                admin_logout,
                create_vote,
                update_vote,
                delete_vote,
                all_options
            ],
        )
        .register(
            "/",
            catchers![bad_request, unauthorized, not_found, internal_error],
        )
        .launch()
        .await?;

    Ok(())
}
