//! where2go server entry point.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use where2go_api::{AppState, app};
use where2go_common::Config;
use where2go_core::{
    CatalogService, PollService, ReviewService, StatisticsService, UserService, WeatherService,
};
use where2go_db::repositories::{
    CategoryRepository, FoodPollVoteRepository, PresenceVoteRepository, RestaurantRepository,
    ReviewRepository, UserRepository,
};

/// Upper bound for a whole request, above the weather client's own timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "where2go=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting where2go server...");

    let config = Config::load()?;

    let db = where2go_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    where2go_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let restaurant_repo = RestaurantRepository::new(Arc::clone(&db));
    let food_vote_repo = FoodPollVoteRepository::new(Arc::clone(&db));
    let presence_repo = PresenceVoteRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(
        user_repo.clone(),
        review_repo.clone(),
        food_vote_repo.clone(),
    );
    let poll_service = PollService::new(
        category_repo.clone(),
        food_vote_repo.clone(),
        presence_repo,
        user_repo.clone(),
    );
    let catalog_service = CatalogService::new(
        category_repo.clone(),
        restaurant_repo.clone(),
        review_repo.clone(),
    );
    let review_service = ReviewService::new(
        review_repo.clone(),
        user_repo.clone(),
        restaurant_repo.clone(),
    );
    let statistics_service = StatisticsService::new(
        category_repo,
        restaurant_repo,
        user_repo,
        review_repo,
        food_vote_repo,
    );
    let weather_service = WeatherService::new(&config.weather)?;
    info!(
        city = %config.weather.city,
        timezone = %config.weather.timezone,
        "Weather service configured"
    );

    let state = AppState {
        user_service,
        poll_service,
        catalog_service,
        review_service,
        statistics_service,
        weather_service,
        session: config.session.clone(),
    };

    let app = app(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
