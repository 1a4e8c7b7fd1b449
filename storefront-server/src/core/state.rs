//! Server state
//!
//! [`ServerState`] holds the shared handles every request needs: the
//! embedded database, the payment gateway client, the notification sender
//! and the JWT service. All of them are constructed once at startup and
//! injected explicitly - nothing is reached through ambient globals, so the
//! whole stack runs against an in-memory store and a scripted gateway in
//! tests.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::AdminConfig;
use crate::db::repository::{AdminRepository, OrderRepository};
use crate::notify::WhatsAppNotifier;
use crate::orders::MutationGateway;
use crate::payment::{MidtransClient, PaymentGateway};

/// Shared application state, cheap to clone
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<WhatsAppNotifier>,
}

impl ServerState {
    /// Assemble state from already-built components (used by tests)
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<WhatsAppNotifier>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            gateway,
            notifier,
        }
    }

    /// Initialize the production state
    ///
    /// Creates the work directory layout, opens the database and builds the
    /// HTTP clients.
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized -
    /// the server is useless without them.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("storefront.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let gateway: Arc<dyn PaymentGateway> = Arc::new(
            MidtransClient::new(&config.midtrans).expect("Failed to build gateway client"),
        );
        let notifier = Arc::new(
            WhatsAppNotifier::new(&config.whatsapp, config.public_base_url.clone())
                .expect("Failed to build notification client"),
        );

        let state = Self::new(config.clone(), db_service.db, jwt_service, gateway, notifier);
        state.bootstrap_admin_config().await;
        state
    }

    /// Provision the admin config document on first boot
    ///
    /// When no admin document exists and `ADMIN_PASSWORD` is set, its argon2
    /// hash is stored. An existing document is never overwritten from the
    /// environment.
    async fn bootstrap_admin_config(&self) {
        let repo = self.admin_repository();
        match repo.find().await {
            Ok(Some(_)) => {}
            Ok(None) => match &self.config.admin_password {
                Some(password) => match AdminConfig::hash_password(password) {
                    Ok(password_hash) => {
                        if let Err(e) = repo.upsert(AdminConfig { password_hash }).await {
                            tracing::error!(error = %e, "Failed to store admin config");
                        } else {
                            tracing::info!("Admin config provisioned from ADMIN_PASSWORD");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to hash bootstrap admin password")
                    }
                },
                None => tracing::warn!(
                    "No admin config found and ADMIN_PASSWORD not set - admin login disabled"
                ),
            },
            Err(e) => tracing::error!(error = %e, "Failed to read admin config"),
        }
    }

    pub fn order_repository(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    pub fn admin_repository(&self) -> AdminRepository {
        AdminRepository::new(self.db.clone())
    }

    /// The single write path for order status mutations
    pub fn mutation_gateway(&self) -> MutationGateway {
        MutationGateway::new(
            self.order_repository(),
            self.gateway.clone(),
            self.config.midtrans.server_key.clone(),
        )
    }
}
