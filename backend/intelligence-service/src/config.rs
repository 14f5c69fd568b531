use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub http_port: u16,
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            service: ServiceConfig {
                http_port: env::var("HTTP_PORT")
                    .unwrap_or_else(|_| "8014".to_string())
                    .parse()?,
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "intelligence-service".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/atelier".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()?,
            },
        })
    }
}

/// Engine thresholds
///
/// Fixed business heuristics, not fitted parameters. The three money
/// thresholds are independent on purpose: order totals are in account
/// currency while event purchase amounts arrive in store currency, so the
/// orders path and the events path saturate at different magnitudes.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineThresholds {
    /// Orders needed before a customer can be VIP (both paths)
    pub vip_min_orders: u64,
    /// Lifetime spend needed for VIP on the orders path
    pub vip_min_spend: f64,
    /// AOV needed for VIP on the events path
    pub vip_aov: f64,
    /// AOV that marks a high-value customer on the orders path
    pub high_value_aov: f64,
    /// Mean unit price above which a low price sensitivity is assigned
    pub premium_price: f64,
}

impl Default for EngineThresholds {
    fn default() -> Self {
        Self {
            vip_min_orders: 5,
            vip_min_spend: 10_000.0,
            vip_aov: 2_000_000.0,
            high_value_aov: 1_000.0,
            premium_price: 1_000_000.0,
        }
    }
}
