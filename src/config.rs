//! Persistent settings and command-line overrides
//!
//! Settings live in `~/.quote-desk/config.json`. Flags given on the command
//! line win over the file for this run, and are written back only with
//! `--save-config`.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Length of the export verification code
pub const MFA_CODE_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the quote backend
    pub api_url: String,
    /// Sent as `X-Organization-ID` on every request
    pub org_id: String,
    pub user_id: String,
    /// Recipient of approved exception and negotiation drafts
    pub notify_address: String,
    /// Where exports and downloaded documents are written
    pub export_dir: String,
    /// Code accepted by the export verification prompt
    pub export_mfa_code: String,
    /// HS code pre-filled in the landed cost simulator
    pub default_hs_code: String,
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            org_id: "org_demo_123".to_string(),
            user_id: "PilotUser_01".to_string(),
            notify_address: "warehouse@logistics-demo.com".to_string(),
            export_dir: ".".to_string(),
            export_mfa_code: "123456".to_string(),
            default_hs_code: "8471.30".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".quote-desk"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = match fs::read_to_string(&config_path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "could not read config");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring unreadable config");
                None
            }
        }
    }

    /// Saved settings, or defaults when there are none
    pub fn load_or_default() -> Config {
        Self::load().unwrap_or_default().validated()
    }

    /// Replace values the prompts could never accept with their defaults
    pub fn validated(mut self) -> Self {
        if !is_valid_mfa_code(&self.export_mfa_code) {
            tracing::warn!(
                "export_mfa_code must be {} digits, falling back to the default",
                MFA_CODE_LEN
            );
            self.export_mfa_code = Config::default().export_mfa_code;
        }
        self
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Apply command-line overrides
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(org) = &cli.org {
            self.org_id = org.clone();
        }
        if let Some(user) = &cli.user {
            self.user_id = user.clone();
        }
        if let Some(dir) = &cli.export_dir {
            self.export_dir = dir.display().to_string();
        }
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

fn is_valid_mfa_code(code: &str) -> bool {
    code.len() == MFA_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Parser, Debug, Default)]
#[command(name = "quote-desk", version, about = "Freight quote comparison desk")]
pub struct Cli {
    #[arg(long, help = "Backend base URL")]
    pub api_url: Option<String>,
    #[arg(long, help = "Organization id sent with every request")]
    pub org: Option<String>,
    #[arg(long, help = "User id recorded on approvals and notes")]
    pub user: Option<String>,
    #[arg(long, help = "Directory for exports and downloads")]
    pub export_dir: Option<PathBuf>,
    #[arg(long, help = "Log file (defaults to ~/.quote-desk/quote-desk.log)")]
    pub log_file: Option<PathBuf>,
    #[arg(long, help = "Log filter, e.g. info or quote_desk=debug")]
    pub log_level: Option<String>,
    #[arg(long, default_value_t = false, help = "Persist the effective settings")]
    pub save_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api_url": "http://quotes.internal:8080"}"#).unwrap();
        assert_eq!(config.api_url, "http://quotes.internal:8080");
        assert_eq!(config.org_id, "org_demo_123");
        assert_eq!(config.export_mfa_code, "123456");
        assert_eq!(config.default_hs_code, "8471.30");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "quote-desk",
            "--org",
            "org_acme",
            "--export-dir",
            "/tmp/exports",
        ]);
        let config = Config::default().merge_cli(&cli);

        assert_eq!(config.org_id, "org_acme");
        assert_eq!(config.export_dir, "/tmp/exports");
        assert_eq!(config.user_id, "PilotUser_01");
        assert!(!cli.save_config);
    }

    #[test]
    fn test_connect_timeout_has_floor() {
        let config = Config {
            connect_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_unusable_mfa_code_falls_back() {
        for bad in ["1234", "12345678", "abc123", ""] {
            let config = Config {
                export_mfa_code: bad.to_string(),
                ..Config::default()
            }
            .validated();
            assert_eq!(config.export_mfa_code, "123456", "code {:?}", bad);
        }

        let config = Config {
            export_mfa_code: "908172".to_string(),
            ..Config::default()
        }
        .validated();
        assert_eq!(config.export_mfa_code, "908172");
    }
}
