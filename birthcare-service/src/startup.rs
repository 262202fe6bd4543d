//! Application startup and lifecycle management.

use crate::config::BirthcareConfig;
use crate::handlers::{admin, admissions, applications, billing, health, subscriptions};
use crate::middleware::{admin_middleware, auth_middleware, subscription_gate_middleware, TokenVerifier};
use crate::services::{
    init_metrics, ApplicationReview, BillingLedger, Database, JobScheduler, LocalStorage,
    RoomChargeAccrual, Storage, SubscriptionGate,
};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, patch, post, put};
use axum::{middleware, Router};
use birthcare_core::error::AppError;
use birthcare_core::middleware::{init_http_metrics, metrics_middleware, request_id_middleware};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: BirthcareConfig,
    pub db: Database,
    pub ledger: BillingLedger,
    pub gate: SubscriptionGate,
    pub review: ApplicationReview,
    pub verifier: TokenVerifier,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    scheduler: JobScheduler,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: BirthcareConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build without running migrations; test harnesses apply them upfront.
    pub async fn build_without_migrations(config: BirthcareConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(
        config: BirthcareConfig,
        run_migrations: bool,
    ) -> Result<Self, AppError> {
        init_metrics();
        init_http_metrics();

        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(&config.storage.root).await?);

        let ledger = BillingLedger::new(db.clone());
        let gate = SubscriptionGate::new(db.clone());
        let review = ApplicationReview::new(db.clone(), storage);
        let accrual = RoomChargeAccrual::new(db.clone(), ledger.clone());
        let verifier = TokenVerifier::new(&config.auth);
        let scheduler = JobScheduler::new(config.scheduler.clone(), gate.clone(), accrual);

        let state = AppState {
            config: config.clone(),
            db,
            ledger,
            gate,
            review,
            verifier,
        };

        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid bind address: {}", e)))?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "birthcare-service listener bound");

        Ok(Self {
            port,
            listener,
            state,
            scheduler,
        })
    }

    /// The port the server is listening on; meaningful when bound to port 0.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The database handle, for test seeding.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until the process is told to stop.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.scheduler.start();

        let router = build_router(self.state.clone());

        tracing::info!(port = self.port, "birthcare-service started");

        let result = axum::serve(self.listener, router).await;

        self.scheduler.shutdown();

        result
    }
}

/// Assemble the full route tree.
///
/// Everything under `/api` requires a valid bearer token. Operational
/// billing/admission routes additionally pass the subscription gate, and
/// `/api/admin` requires the admin role. Health, readiness and metrics stay
/// open for probes and scrapers.
pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/bills/charges", post(billing::add_charges))
        .route("/bills/:bill_id", get(billing::get_bill))
        .route("/bills/:bill_id/issue", post(billing::issue_bill))
        .route("/bills/:bill_id/cancel", post(billing::cancel_bill))
        .route("/bills/:bill_id/payments", post(billing::record_payment))
        .route(
            "/patients/:patient_id/statement",
            get(billing::patient_statement),
        )
        .route("/admissions", post(admissions::create_admission))
        .route(
            "/admissions/:admission_id/discharge",
            post(admissions::discharge_admission),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            subscription_gate_middleware,
        ));

    let ungated = Router::new()
        .route("/applications", post(applications::register))
        .route("/applications/me", get(applications::get_my_application))
        .route(
            "/applications/:application_id/documents",
            put(applications::update_documents),
        )
        .route(
            "/applications/:application_id/resubmit",
            post(applications::resubmit),
        )
        .route("/subscriptions/activate", post(subscriptions::activate))
        .route("/subscriptions/status", get(subscriptions::status))
        .route("/subscriptions/plans", get(subscriptions::list_plans));

    let admin_routes = Router::new()
        .route("/applications", get(admin::list_applications))
        .route(
            "/applications/:application_id/approve",
            post(admin::approve_application),
        )
        .route(
            "/applications/:application_id/reject",
            post(admin::reject_application),
        )
        .route("/plans", post(admin::create_plan))
        .route("/users", get(admin::list_users))
        .route("/users/:user_id/role", patch(admin::update_user_role))
        .route_layer(middleware::from_fn(admin_middleware));

    let api = Router::new()
        .merge(gated)
        .merge(ungated)
        .nest("/admin", admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .nest("/api", api)
        .layer(cors_layer(&state.config.server.allowed_origins))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
