use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use reelist::{
    application::error::AppError,
    application::list::{ListSettings, MyListService},
    application::repos::{CatalogRepo, MembershipsRepo},
    cache::{CacheConfig, MemorySharedCache, RedisSharedCache, SharedCache, TieredPageCache},
    config,
    infra::{db::PostgresRepositories, error::InfraError, http, telemetry},
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(
        database_url,
        settings.database.max_connections.get(),
        settings.database.acquire_timeout,
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn build_shared_cache(
    settings: &config::Settings,
) -> Result<Arc<dyn SharedCache>, AppError> {
    match settings.redis.url.as_deref() {
        Some(url) => {
            let cache = RedisSharedCache::connect(url, settings.redis.op_timeout)
                .await
                .map_err(|err| {
                    AppError::from(InfraError::configuration(format!(
                        "failed to connect to redis: {err}"
                    )))
                })?;
            info!("shared cache backed by redis");
            Ok(Arc::new(cache))
        }
        None => {
            warn!("redis url not configured; shared cache is process-local only");
            Ok(Arc::new(MemorySharedCache::new()))
        }
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let memberships_repo: Arc<dyn MembershipsRepo> = repositories.clone();
    let catalog_repo: Arc<dyn CatalogRepo> = repositories.clone();

    let shared_cache = build_shared_cache(&settings).await?;
    let cache = Arc::new(TieredPageCache::new(
        shared_cache,
        CacheConfig::from(&settings.cache),
    ));

    let list_settings = ListSettings {
        max_page_size: settings.list.max_page_size,
        default_page_size: settings.list.default_page_size,
    };
    let list = Arc::new(MyListService::new(
        memberships_repo,
        catalog_repo,
        cache,
        list_settings,
    ));

    let router = http::build_router(http::HttpState::new(list));

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| {
            AppError::from(InfraError::configuration(format!(
                "failed to bind {}: {err}",
                settings.server.addr
            )))
        })?;

    info!(addr = %settings.server.addr, "listening");

    serve_with_grace(listener, router, settings.server.graceful_shutdown).await
}

/// Serve until a shutdown signal, then drain in-flight requests for at most
/// `grace` before dropping whatever remains.
async fn serve_with_grace(
    listener: tokio::net::TcpListener,
    router: axum::Router,
    grace: Duration,
) -> Result<(), AppError> {
    let draining = Arc::new(Notify::new());
    let notify = draining.clone();

    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            notify.notify_one();
        },
    )
    .into_future();
    tokio::pin!(server);

    let deadline = async {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))
        }
        _ = deadline => {
            warn!(
                grace_seconds = grace.as_secs(),
                "drain deadline elapsed; dropping remaining connections"
            );
            Ok(())
        }
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    repositories
        .health_check()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
    info!("migrations applied");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
