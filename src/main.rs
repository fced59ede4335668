use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saccoflow::config::Config;
use saccoflow::middleware::{RateLimiter, RequestId};
use saccoflow::modules::groups::repositories::MySqlGroupRepository;
use saccoflow::modules::loans::repositories::MySqlLoanRepository;
use saccoflow::modules::members::repositories::MySqlMemberRepository;
use saccoflow::modules::reports::ReportService;
use saccoflow::modules::savings::repositories::MySqlAccountRepository;
use saccoflow::modules::transactions::repositories::MySqlTransactionRepository;
use saccoflow::modules::{health, reports};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "saccoflow=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting SaccoFlow reporting service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!(
        "Default currency: {}",
        config.reports.default_currency.as_str()
    );

    // Create database connection pool
    let db_pool = config.database.create_pool().await?;

    tracing::info!(
        "Database pool initialized (max {} connections)",
        config.database.max_connections
    );

    // Wire the reporting service over the MySQL repositories
    let report_service = web::Data::new(ReportService::new(
        Arc::new(MySqlLoanRepository::new(db_pool.clone())),
        Arc::new(MySqlTransactionRepository::new(db_pool.clone())),
        Arc::new(MySqlAccountRepository::new(db_pool.clone())),
        Arc::new(MySqlGroupRepository::new(db_pool.clone())),
        Arc::new(MySqlMemberRepository::new(db_pool.clone())),
        &config.reports,
    ));

    let rate_limit_per_minute = config.reports.rate_limit_per_minute;
    let workers = config.server.workers;
    let bind_address = config.server.bind_address();

    // Start HTTP server
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(report_service.clone())
            .wrap(RateLimiter::new(rate_limit_per_minute))
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .service(web::scope("/api").configure(reports::controllers::configure))
            .configure(health::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;

    Ok(())
}
