//! babytrack-gateway server entry point.
//!
//! Starts the Axum HTTP server and the recurring reminder scan.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use babytrack_gateway::api;
use babytrack_gateway::api::extract::AdminKey;
use babytrack_gateway::app_state::AppState;
use babytrack_gateway::config::{GatewayConfig, LogFormat};
use babytrack_gateway::domain::{Clock, SystemClock};
use babytrack_gateway::notify::{HttpRelayNotifier, LogNotifier, NotificationSender};
use babytrack_gateway::persistence::{
    ContactResolver, InMemoryStore, PostgresStore, ProfileResolver, ProfileStore, VaccineStore,
};
use babytrack_gateway::service::{
    AdminService, ProfileService, ReminderScheduler, VaccineService,
};

/// The persistence roles, usually served by one backend.
struct Stores {
    vaccines: Arc<dyn VaccineStore>,
    profile_store: Arc<dyn ProfileStore>,
    profiles: Arc<dyn ProfileResolver>,
    contacts: Arc<dyn ContactResolver>,
}

impl Stores {
    fn from_backend<B>(backend: B) -> Self
    where
        B: VaccineStore + ProfileStore + ProfileResolver + ContactResolver + 'static,
    {
        let backend = Arc::new(backend);
        let vaccines: Arc<B> = Arc::clone(&backend);
        let profile_store: Arc<B> = Arc::clone(&backend);
        let profiles: Arc<B> = Arc::clone(&backend);
        Self {
            vaccines,
            profile_store,
            profiles,
            contacts: backend,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config =
        GatewayConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting babytrack-gateway");

    // Build persistence layer
    let stores = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .context("connecting to PostgreSQL")?;
        let store = PostgresStore::new(pool);
        store.migrate().await.context("running database migrations")?;
        tracing::info!("using PostgreSQL persistence");
        Stores::from_backend(store)
    } else {
        tracing::warn!("persistence disabled, records are kept in memory only");
        Stores::from_backend(InMemoryStore::new())
    };

    // Build notification sender
    let template = config.email_template();
    let notifier: Arc<dyn NotificationSender> = match &config.notifier_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "reminders go to the mail relay");
            Arc::new(
                HttpRelayNotifier::new(
                    url.clone(),
                    config.notifier_api_key.clone(),
                    config.notifier_timeout(),
                    template,
                )
                .context("building mail relay client")?,
            )
        }
        None => {
            tracing::warn!("NOTIFIER_URL not set, reminders are only logged");
            Arc::new(LogNotifier::new(template))
        }
    };

    // Build service layer
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let vaccine_service = Arc::new(VaccineService::new(
        Arc::clone(&stores.vaccines),
        Arc::clone(&clock),
    ));
    let profile_service = Arc::new(ProfileService::new(
        Arc::clone(&stores.profile_store),
        Arc::clone(&clock),
    ));
    let admin_service = Arc::new(AdminService::new(
        stores.profile_store,
        Arc::clone(&stores.vaccines),
        Arc::clone(&clock),
    ));
    let reminder_scheduler = Arc::new(
        ReminderScheduler::new(
            stores.vaccines,
            stores.profiles,
            stores.contacts,
            notifier,
            clock,
        )
        .with_horizon_days(config.reminder_horizon_days),
    );

    let scheduler_handle = if config.reminder_enabled {
        Some(Arc::clone(&reminder_scheduler).spawn(config.reminder_interval()))
    } else {
        tracing::warn!("recurring reminder scan disabled");
        None
    };

    let admin_key = AdminKey::new(config.admin_api_key.clone());
    if !admin_key.is_set() {
        tracing::warn!("ADMIN_API_KEY not set, admin endpoints refuse every request");
    }

    // Build application state and router
    let app = api::app(AppState {
        vaccine_service,
        profile_service,
        reminder_scheduler,
        admin_service,
        admin_key,
    });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(handle) = scheduler_handle {
        handle.shutdown().await;
    }
    tracing::info!("babytrack-gateway stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
