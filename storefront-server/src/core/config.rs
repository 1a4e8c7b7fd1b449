//! Server configuration
//!
//! All settings come from environment variables with sensible defaults.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | WORK_DIR | ./data | Work directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | PUBLIC_BASE_URL | http://localhost:3000 | Base URL used in customer-facing links |
//! | DELIVERY_FEE | 12000 | Flat courier delivery fee (rupiah) |
//! | ADMIN_PASSWORD | - | Bootstrap password for the admin config document |
//! | MIDTRANS_SERVER_KEY | - | Midtrans server key (signs webhooks, auths API calls) |
//! | MIDTRANS_IS_PRODUCTION | false | Use the production gateway endpoints |
//! | MIDTRANS_SNAP_BASE_URL | per environment | Override the Snap base URL |
//! | MIDTRANS_API_BASE_URL | per environment | Override the core-API base URL |
//! | GATEWAY_TIMEOUT_MS | 10000 | Timeout for gateway and notification calls |
//! | WHATSAPP_API_URL | https://api.dripsender.id/send | Notification webhook |
//! | WHATSAPP_API_KEY | - | Notification sender key (empty disables sending) |

use std::path::PathBuf;

use crate::auth::JwtConfig;

/// The flat courier option carries the only non-zero delivery fee
pub const COURIER_DELIVERY_METHOD: &str = "Dikirim kurir flat Rp 12.000";

/// Payment gateway settings
#[derive(Debug, Clone)]
pub struct MidtransConfig {
    pub server_key: String,
    pub is_production: bool,
    /// Override for the Snap base URL (tests point this at a local stub)
    pub snap_base_url: Option<String>,
    /// Override for the core-API base URL
    pub api_base_url: Option<String>,
    pub request_timeout_ms: u64,
}

/// WhatsApp notification settings
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub api_url: String,
    /// Empty key disables outbound messages (local development)
    pub api_key: String,
    pub request_timeout_ms: u64,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Base URL for links sent to customers
    pub public_base_url: String,
    /// Flat courier delivery fee in rupiah
    pub delivery_fee: i64,
    /// Bootstrap admin password, applied when no admin config exists yet
    pub admin_password: Option<String>,
    /// JWT settings
    pub jwt: JwtConfig,
    /// Payment gateway settings
    pub midtrans: MidtransConfig,
    /// Notification settings
    pub whatsapp: WhatsAppConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let gateway_timeout_ms = std::env::var("GATEWAY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            delivery_fee: std::env::var("DELIVERY_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12_000),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            jwt: JwtConfig::default(),
            midtrans: MidtransConfig {
                server_key: std::env::var("MIDTRANS_SERVER_KEY").unwrap_or_default(),
                is_production: std::env::var("MIDTRANS_IS_PRODUCTION")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(false),
                snap_base_url: std::env::var("MIDTRANS_SNAP_BASE_URL").ok(),
                api_base_url: std::env::var("MIDTRANS_API_BASE_URL").ok(),
                request_timeout_ms: gateway_timeout_ms,
            },
            whatsapp: WhatsAppConfig {
                api_url: std::env::var("WHATSAPP_API_URL")
                    .unwrap_or_else(|_| "https://api.dripsender.id/send".into()),
                api_key: std::env::var("WHATSAPP_API_KEY").unwrap_or_default(),
                request_timeout_ms: gateway_timeout_ms,
            },
        }
    }

    /// Delivery fee for a chosen delivery method
    ///
    /// Only the flat-rate courier option carries a fee; pickup and
    /// pay-the-courier-yourself methods are free at checkout.
    pub fn delivery_fee_for(&self, delivery_method: &str) -> i64 {
        if delivery_method == COURIER_DELIVERY_METHOD
            || delivery_method.contains("Rp 12.000")
        {
            self.delivery_fee
        } else {
            0
        }
    }

    /// Ensure the work directory layout exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_fee_rule() {
        let mut config = Config::from_env();
        config.delivery_fee = 12_000;

        assert_eq!(config.delivery_fee_for(COURIER_DELIVERY_METHOD), 12_000);
        assert_eq!(config.delivery_fee_for("Di Ambil di Toko"), 0);
        assert_eq!(
            config.delivery_fee_for("Gojek, Maxim, Shopee, Bayar di tempat ongkirnya"),
            0
        );
    }
}
