// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration file. A server binary only reads `tcp`; a client
/// binary only reads `tcp_client`. Both share `shutdown_timeout` and
/// `log_level`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub tcp: ServerConfig,
    #[serde(default)]
    pub tcp_client: ClientConfig,
    #[serde(default = "default_shutdown_timeout", with = "serde_secs")]
    pub shutdown_timeout: Duration,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Server-side TCP tunables (spec §6).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_pow_difficulty")]
    pub pow_difficulty: i32,
    #[serde(default = "default_read_timeout", with = "serde_secs")]
    pub read_timeout: Duration,
    #[serde(default = "default_write_timeout", with = "serde_secs")]
    pub write_timeout: Duration,
    #[serde(default = "default_handler_timeout", with = "serde_secs")]
    pub handler_timeout: Duration,
    #[serde(default)]
    pub enable_tls: bool,
    #[serde(default)]
    pub cert_file: Option<String>,
    #[serde(default)]
    pub key_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: default_addr(),
            pow_difficulty: default_pow_difficulty(),
            read_timeout: default_read_timeout(),
            write_timeout: default_write_timeout(),
            handler_timeout: default_handler_timeout(),
            enable_tls: false,
            cert_file: None,
            key_file: None,
        }
    }
}

/// Client-side TCP tunables (spec §6).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_client_url")]
    pub url: String,
    #[serde(default = "default_client_read_timeout", with = "serde_secs")]
    pub read_timeout: Duration,
    #[serde(default = "default_solution_timeout", with = "serde_secs")]
    pub solution_timeout: Duration,
    /// Deadline for establishing the TCP connection. Not in the original
    /// config table; folded into `read_timeout`'s family of knobs so the
    /// controller has a value to bound `connect()` with.
    #[serde(default = "default_client_read_timeout", with = "serde_secs")]
    pub connect_timeout: Duration,
    /// Deadline for writing the solution frame. Not in the original config
    /// table either; mirrors the server's `write_timeout` so the solution
    /// write can't hang forever against a server that stalls after issuing
    /// its challenge.
    #[serde(default = "default_client_write_timeout", with = "serde_secs")]
    pub write_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            url: default_client_url(),
            read_timeout: default_client_read_timeout(),
            solution_timeout: default_solution_timeout(),
            connect_timeout: default_client_read_timeout(),
            write_timeout: default_client_write_timeout(),
        }
    }
}

fn default_addr() -> String {
    ":8080".to_string()
}
fn default_pow_difficulty() -> i32 {
    15
}
fn default_read_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_write_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_handler_timeout() -> Duration {
    Duration::from_secs(20)
}
fn default_client_url() -> String {
    "localhost:8081".to_string()
}
fn default_client_read_timeout() -> Duration {
    Duration::from_secs(15)
}
fn default_solution_timeout() -> Duration {
    Duration::from_secs(60)
}
fn default_client_write_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config file {:?}", path.as_ref()))?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants that aren't expressible as pure serde defaults.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            (0..=256).contains(&self.tcp.pow_difficulty),
            "tcp.pow_difficulty must be in [0, 256], got {}",
            self.tcp.pow_difficulty
        );

        if self.tcp.enable_tls {
            ensure!(
                self.tcp.cert_file.as_deref().is_some_and(|s| !s.is_empty()),
                "tcp.cert_file is required when tcp.enable_tls is set"
            );
            ensure!(
                self.tcp.key_file.as_deref().is_some_and(|s| !s.is_empty()),
                "tcp.key_file is required when tcp.enable_tls is set"
            );
        }

        ensure!(!self.tcp.addr.is_empty(), "tcp.addr must not be empty");
        ensure!(
            !self.tcp_client.url.is_empty(),
            "tcp_client.url must not be empty"
        );

        Ok(())
    }
}

/// Serde helper representing a `Duration` as a number of whole seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let cfg = Config::default();
        assert_eq!(cfg.tcp.addr, ":8080");
        assert_eq!(cfg.tcp.pow_difficulty, 15);
        assert_eq!(cfg.tcp.read_timeout, Duration::from_secs(10));
        assert_eq!(cfg.tcp.write_timeout, Duration::from_secs(10));
        assert_eq!(cfg.tcp.handler_timeout, Duration::from_secs(20));
        assert!(!cfg.tcp.enable_tls);
        assert_eq!(cfg.tcp_client.url, "localhost:8081");
        assert_eq!(cfg.tcp_client.read_timeout, Duration::from_secs(15));
        assert_eq!(cfg.tcp_client.solution_timeout, Duration::from_secs(60));
        assert_eq!(cfg.tcp_client.write_timeout, Duration::from_secs(10));
        assert_eq!(cfg.shutdown_timeout, Duration::from_secs(5));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn rejects_out_of_range_difficulty() {
        let mut cfg = Config {
            tcp: ServerConfig {
                pow_difficulty: 257,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate_and_normalize().is_err());
    }

    #[test]
    fn tls_requires_cert_and_key() {
        let mut cfg = Config {
            tcp: ServerConfig {
                enable_tls: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate_and_normalize().is_err());

        cfg.tcp.cert_file = Some("cert.pem".to_string());
        cfg.tcp.key_file = Some("key.pem".to_string());
        assert!(cfg.validate_and_normalize().is_ok());
    }

    #[test]
    fn parses_minimal_yaml() {
        let yaml = "tcp:\n  addr: \"127.0.0.1:9000\"\n  pow_difficulty: 10\n";
        let mut cfg: Config = serde_yaml::from_str(yaml).expect("parse");
        cfg.validate_and_normalize().expect("validate");
        assert_eq!(cfg.tcp.addr, "127.0.0.1:9000");
        assert_eq!(cfg.tcp.pow_difficulty, 10);
        assert_eq!(cfg.tcp.write_timeout, Duration::from_secs(10));
    }
}
