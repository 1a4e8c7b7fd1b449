//! Babi Panggang Apung storefront server
//!
//! Backend for the food-ordering storefront: checkout, order lookup, payment
//! status reconciliation and the admin dashboard API.
//!
//! # Architecture overview
//!
//! - **Orders** (`orders`): the canonical status state machine, the
//!   reconciliation engine deriving status from stored + live gateway data,
//!   and the mutation gateway - the only write path for order status
//! - **Database** (`db`): embedded SurrealDB storage behind repositories
//! - **Payment** (`payment`): Midtrans Snap/core-API client and webhook
//!   signature verification
//! - **Notifications** (`notify`): fire-and-forget WhatsApp confirmations
//! - **Auth** (`auth`): argon2 shared admin credential + JWT bearer tokens
//! - **HTTP API** (`api`): axum routes for the storefront and admin pages
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # status engine + mutation gateway
//! ├── payment/       # gateway client, webhook signatures
//! ├── notify/        # WhatsApp sender
//! ├── auth/          # JWT auth, admin guard
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, time
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod payment;
pub mod utils;

// Re-export common types
pub use auth::JwtService;
pub use core::{Config, Server, ServerState};
pub use orders::{MutationGateway, OrderStatus};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load the environment and initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _                           ___
   / __ )(_)___  ____ _____  ____ _  /   |  ____  __  ______  ____ _
  / __  / / __ \/ __ `/ __ \/ __ `/ / /| | / __ \/ / / / __ \/ __ `/
 / /_/ / / /_/ / /_/ / / / / /_/ / / ___ |/ /_/ / /_/ / / / / /_/ /
/_____/_/ .___/\__,_/_/ /_/\__, / /_/  |_/ .___/\__,_/_/ /_/\__, /
       /_/                /____/        /_/                /____/
    "#
    );
}
