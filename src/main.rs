mod auth;
mod db;
mod error;
mod handlers;
mod models;
mod schedule;

use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub db_pool: PgPool,
    /// Emails granted ADMIN at authentication time, from configuration.
    pub admin_emails: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roombook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set")?;
    let host = std::env::var("HOST")
        .unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .context("Invalid PORT")?;

    // Set up database
    tracing::info!("Connecting to database");
    let db_pool = db::create_pool(&database_url).await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool).await
        .context("Failed to run migrations")?;

    // Load the admin allow-list
    let admin_emails = load_admin_emails().await;

    // Create shared application state
    let state = Arc::new(AppState {
        db_pool,
        admin_emails,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/rooms", get(handlers::rooms::list_rooms).post(handlers::rooms::create_room))
        .route("/rooms/today", get(handlers::rooms::today))
        .route(
            "/rooms/:id",
            get(handlers::rooms::get_room)
                .put(handlers::rooms::update_room)
                .delete(handlers::rooms::delete_room),
        )
        .route("/rooms/:id/bookings", get(handlers::bookings::list_room_bookings))
        .route("/rooms/:id/availability", get(handlers::bookings::room_availability))
        .route(
            "/bookings",
            get(handlers::bookings::my_bookings).post(handlers::bookings::create_booking),
        )
        .route("/bookings/:id", delete(handlers::bookings::delete_booking))
        .route("/admin/bookings", get(handlers::admin::list_all_bookings))
        .route("/admin/bookings/resolve", post(handlers::admin::resolve_pending_bookings))
        .route("/admin/bookings/:id", patch(handlers::admin::update_booking_status))
        .route("/admin/stats", get(handlers::admin::stats))
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/users/:id", patch(handlers::admin::update_user_role))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

/// Load admin emails from the ADMIN_EMAILS environment variable or an
/// admins.txt file. These callers resolve to ADMIN regardless of their
/// stored role.
async fn load_admin_emails() -> Vec<String> {
    let mut emails = Vec::new();

    // Try environment variable first (for production)
    if let Ok(admins_env) = std::env::var("ADMIN_EMAILS") {
        tracing::info!("Loading admin emails from ADMIN_EMAILS environment variable");
        for email in admins_env.split(',') {
            let email = email.trim();
            if !email.is_empty() {
                emails.push(email.to_string());
            }
        }
    }
    // Fall back to admins.txt file (for local development)
    else if let Ok(contents) = tokio::fs::read_to_string("admins.txt").await {
        tracing::info!("Loading admin emails from admins.txt file");
        for line in contents.lines() {
            let line = line.trim();
            // Skip comments and empty lines
            if !line.starts_with('#') && !line.is_empty() {
                emails.push(line.to_string());
            }
        }
    } else {
        tracing::warn!("No admins configured (no ADMIN_EMAILS env var or admins.txt file)");
        return emails;
    }

    if emails.is_empty() {
        tracing::warn!("Admin email list is empty");
    } else {
        tracing::info!("Loaded {} admin email(s)", emails.len());
    }
    emails
}
