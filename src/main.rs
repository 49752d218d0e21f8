use std::{process, sync::Arc};

use docrelay::{
    application::{
        error::AppError,
        jobs::RenderJobService,
        repos::JobStore,
        upstream::RenderApi,
    },
    config,
    infra::{
        assets::PublicAssets,
        carbone::CarboneClient,
        error::InfraError,
        http::{self, HttpState},
        store::InMemoryJobStore,
        telemetry,
    },
};
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
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    match cli_args.command.unwrap_or(config::Command::Serve) {
        config::Command::Serve => run_serve(settings).await,
        config::Command::CheckConfig => {
            check_config(&settings);
            Ok(())
        }
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let state = build_http_state(&settings)?;
    if !state.jobs.accepts_submissions() {
        warn!(
            target = "docrelay::serve",
            "CARBONE_API_KEY or CARBONE_TEMPLATE_ID missing; job submission will be refused"
        );
    }

    let router = http::build_router(state, &settings.cors);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "docrelay::serve",
        addr = %settings.server.addr,
        upstream = %settings.carbone.base_url,
        "relay listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "docrelay::serve", "relay stopped");
    Ok(())
}

fn build_http_state(settings: &config::Settings) -> Result<HttpState, AppError> {
    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let api: Arc<dyn RenderApi> = Arc::new(CarboneClient::new(&settings.carbone)?);
    let jobs = Arc::new(RenderJobService::new(store, api));

    let assets = settings
        .assets
        .enabled
        .then(|| PublicAssets::new(settings.assets.directory.clone()));
    if let Some(assets) = &assets
        && !assets.root().is_dir()
    {
        warn!(
            target = "docrelay::serve",
            directory = %assets.root().display(),
            "static asset directory does not exist; asset requests will 404"
        );
    }

    Ok(HttpState { jobs, assets })
}

fn check_config(settings: &config::Settings) {
    info!(
        target = "docrelay::check_config",
        addr = %settings.server.addr,
        upstream = %settings.carbone.base_url,
        carbone_version = %settings.carbone.version,
        api_key_configured = settings.carbone.api_key.is_some(),
        template_configured = settings.carbone.template_id.is_some(),
        assets_enabled = settings.assets.enabled,
        assets_directory = %settings.assets.directory.display(),
        "configuration is valid"
    );
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(
            target = "docrelay::serve",
            error = %err,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
    info!(target = "docrelay::serve", "shutdown signal received");
}
