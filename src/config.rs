use std::net::SocketAddr;

use anyhow::Result;
use dotenvy::dotenv;

fn default_max_upload_bytes() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub column_dupes: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid BIND_ADDR: {}", e))?;

        let allowed_origins = parse_origins(
            &std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        );

        let max_upload_bytes = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid MAX_UPLOAD_BYTES: {}", e))?,
            Err(_) => default_max_upload_bytes(),
        };

        let column_dupes = match std::env::var("COLUMN_DUPES") {
            Ok(raw) => parse_flag(&raw)
                .ok_or_else(|| anyhow::anyhow!("Invalid COLUMN_DUPES: {}", raw))?,
            Err(_) => true,
        };

        Ok(Config {
            bind_addr,
            allowed_origins,
            max_upload_bytes,
            column_dupes,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
