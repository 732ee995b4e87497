#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident watch dashboard.
//!
//! Serves the REST API over one shared [`Dashboard`] session and answers
//! every other `GET` through the offline [`CacheGateway`]: shell assets
//! come from the precomputed cache, everything else from the shell
//! origin. The alert simulator and the stats refresh run as background
//! timers for the lifetime of the server.

mod handlers;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use incident_watch_alerts::clock::{Clock, SystemClock};
use incident_watch_alerts::effects::LogEffects;
use incident_watch_alerts::hooks::NoRender;
use incident_watch_alerts::ids::{ClockIds, IdGenerator, SequentialIds};
use incident_watch_alerts::simulator::AlertSimulator;
use incident_watch_alerts::source::RandomIncidentSource;
use incident_watch_dashboard::loader::{DEFAULT_LOAD_TIMEOUT, EmbeddedLoader};
use incident_watch_dashboard::scheduler::RefreshScheduler;
use incident_watch_dashboard::{Collaborators, Config, Dashboard, SharedDashboard};
use incident_watch_incident_models::Incident;
use incident_watch_offline::host::LogHost;
use incident_watch_offline::network::HttpNetwork;
use incident_watch_offline::{CacheGateway, GatewayConfig};

/// Shared application state.
pub struct AppState {
    /// The dashboard session.
    pub dashboard: SharedDashboard,
    /// Offline cache gateway for non-API paths.
    pub gateway: Arc<CacheGateway>,
    /// Id source for incidents posted through the API.
    pub incident_ids: Arc<dyn IdGenerator>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

/// Startup options of the server binary.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Optional TOML config file.
    pub config_path: Option<PathBuf>,
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Origin that serves the shell assets.
    pub shell_origin: String,
}

/// Registers every route on an actix app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/stats", web::get().to(handlers::stats))
            .route("/notifications", web::get().to(handlers::notifications))
            .route("/notifications", web::delete().to(handlers::clear_notifications))
            .route("/notifications/read", web::post().to(handlers::mark_all_read))
            .route("/incidents", web::get().to(handlers::incidents))
            .route("/incidents", web::post().to(handlers::ingest_incident))
            .route("/search", web::get().to(handlers::search))
            .route("/municipalities", web::get().to(handlers::municipalities))
            .route("/visits", web::get().to(handlers::visits))
            .route("/visits", web::post().to(handlers::create_visit))
            .route("/visits/{id}/complete", web::post().to(handlers::complete_visit))
            .route("/visits/{id}/cancel", web::post().to(handlers::cancel_visit))
            .route(
                "/businesses/{id}/visit-draft",
                web::get().to(handlers::visit_draft),
            )
            .route("/notes", web::get().to(handlers::notes))
            .route("/notes", web::post().to(handlers::create_note))
            .route("/notes/{id}", web::get().to(handlers::note))
            .route("/notes/{id}", web::put().to(handlers::update_note))
            .route("/push", web::post().to(handlers::push))
            .route("/push/{id}/click", web::post().to(handlers::notification_click)),
    )
    .default_service(web::to(handlers::gateway_fetch));
}

/// Starts the incident watch server.
///
/// Loads the config, initializes the dashboard session, starts the alert
/// simulator and stats refresh, installs the offline cache in the
/// background, and serves HTTP until shutdown.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the config can't be loaded, the
/// initial data load fails, or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(options: ServerOptions) -> std::io::Result<()> {
    let config = Config::load(options.config_path.as_deref()).map_err(std::io::Error::other)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let loader = Arc::new(EmbeddedLoader::new(Arc::clone(&clock)));
    let deps = Collaborators {
        clock: Arc::clone(&clock),
        effects: Arc::new(LogEffects),
        hooks: Arc::new(NoRender),
        visit_ids: Arc::new(SequentialIds::default()),
        note_ids: Arc::new(SequentialIds::default()),
    };

    let dashboard = Dashboard::initialize(config.clone(), loader.as_ref(), DEFAULT_LOAD_TIMEOUT, deps)
        .await
        .map_err(std::io::Error::other)?
        .into_shared();

    let scheduler = RefreshScheduler::new(Arc::clone(&dashboard), loader, DEFAULT_LOAD_TIMEOUT);
    scheduler.start(config.refresh_interval());

    let incident_ids: Arc<dyn IdGenerator> = Arc::new(ClockIds::new(SystemClock));
    let simulator = AlertSimulator::new(
        Box::new(RandomIncidentSource::new(
            Arc::clone(&incident_ids),
            Arc::clone(&clock),
        )),
        {
            let dashboard = Arc::clone(&dashboard);
            Arc::new(move |incident: Incident| {
                dashboard
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .ingest(incident);
            })
        },
    );
    if config.simulate_alerts {
        simulator.start(config.alert_interval());
    }

    log::info!("Shell origin: {}", options.shell_origin);
    let gateway = Arc::new(CacheGateway::new(
        GatewayConfig::default(),
        Arc::new(HttpNetwork::new(&options.shell_origin).map_err(std::io::Error::other)?),
        Arc::new(LogHost),
    ));
    actix_rt::spawn({
        let gateway = Arc::clone(&gateway);
        async move {
            if let Err(e) = gateway.install().await {
                log::warn!("Serving without offline cache: {e}");
            }
        }
    });

    let state = web::Data::new(AppState {
        dashboard,
        gateway,
        incident_ids,
        clock,
    });

    log::info!("Starting server on {}:{}", options.bind_addr, options.port);

    let result = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((options.bind_addr, options.port))?
    .run()
    .await;

    simulator.stop();
    scheduler.stop();
    result
}
