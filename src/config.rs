/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Settings resolution: command line and environment over an optional TOML file

use crate::domain::ReportError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

lazy_static! {
    static ref SATELLITE_HOST_RE: Regex =
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]*[A-Za-z0-9])?(:\d{1,5})?$").unwrap();
}

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// A set of optional settings from one source
///
/// The same shape is read from the TOML file and built from CLI flags, then
/// layered with [`PartialSettings::or`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub login: Option<String>,
    pub password: Option<String>,
    pub satellite: Option<String>,
    pub orgid: Option<String>,
    pub insecure_tls: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

impl PartialSettings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ReportError> {
        toml::from_str(text).map_err(|e| ReportError::InvalidConfiguration(e.to_string()))
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReportError::InvalidConfiguration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: PartialSettings) -> PartialSettings {
        PartialSettings {
            login: non_empty(self.login).or(non_empty(fallback.login)),
            password: non_empty(self.password).or(non_empty(fallback.password)),
            satellite: non_empty(self.satellite).or(non_empty(fallback.satellite)),
            orgid: non_empty(self.orgid).or(non_empty(fallback.orgid)),
            insecure_tls: self.insecure_tls.or(fallback.insecure_tls),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            output_dir: self.output_dir.or(fallback.output_dir),
        }
    }

    /// Names of the required settings that are still unset or empty
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("login", &self.login),
            ("satellite", &self.satellite),
            ("orgid", &self.orgid),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }
}

/// An empty string counts as not given
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Fully resolved settings for one run
#[derive(Clone)]
pub struct Settings {
    pub login: String,
    /// `None` until prompted for
    pub password: Option<String>,
    /// Host name (and optional port) without scheme
    pub satellite: String,
    pub orgid: String,
    pub insecure_tls: bool,
    pub timeout: Duration,
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("satellite", &self.satellite)
            .field("orgid", &self.orgid)
            .field("insecure_tls", &self.insecure_tls)
            .field("timeout", &self.timeout)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl TryFrom<PartialSettings> for Settings {
    type Error = ReportError;

    fn try_from(partial: PartialSettings) -> Result<Self, Self::Error> {
        let missing = partial.missing_required();
        let (Some(login), Some(satellite), Some(orgid)) = (
            non_empty(partial.login),
            non_empty(partial.satellite),
            non_empty(partial.orgid),
        ) else {
            return Err(ReportError::MissingSettings(missing.join(", ")));
        };

        Ok(Settings {
            login,
            password: non_empty(partial.password),
            satellite: normalize_satellite(&satellite)?,
            orgid,
            insecure_tls: partial.insecure_tls.unwrap_or(false),
            timeout: Duration::from_secs(partial.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            output_dir: partial.output_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

impl Settings {
    pub fn base_url(&self) -> String {
        format!("https://{}", self.satellite)
    }
}

/// Reduce a Satellite address to `host[:port]`
///
/// Users often paste a URL; a leading `https://` and trailing slashes are
/// stripped. Anything else that is not a host name is rejected.
pub fn normalize_satellite(raw: &str) -> Result<String, ReportError> {
    let trimmed = raw.trim();
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    if host != trimmed {
        log::warn!("Satellite should be given without scheme; using {}", host);
    }

    if SATELLITE_HOST_RE.is_match(host) {
        Ok(host.to_string())
    } else {
        Err(ReportError::InvalidConfiguration(format!(
            "'{}' is not a valid Satellite host name",
            raw
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let settings = PartialSettings::from_toml(
            r#"
            login = "admin"
            satellite = "satellite.example.com"
            orgid = "ACME_Corporation"
            insecure_tls = true
            timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.login.as_deref(), Some("admin"));
        assert_eq!(settings.insecure_tls, Some(true));
        assert_eq!(settings.timeout_secs, Some(10));
        assert!(settings.password.is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = PartialSettings::from_toml("user = \"admin\"");
        assert!(matches!(result, Err(ReportError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_cli_values_win_over_file() {
        let cli = PartialSettings {
            orgid: Some("CLI_ORG".to_string()),
            ..PartialSettings::default()
        };
        let file = PartialSettings {
            login: Some("admin".to_string()),
            orgid: Some("FILE_ORG".to_string()),
            satellite: Some("sat.example.com".to_string()),
            ..PartialSettings::default()
        };

        let merged = cli.or(file);
        assert_eq!(merged.orgid.as_deref(), Some("CLI_ORG"));
        assert_eq!(merged.login.as_deref(), Some("admin"));

        let settings = Settings::try_from(merged).unwrap();
        assert_eq!(settings.base_url(), "https://sat.example.com");
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(!settings.insecure_tls);
        assert_eq!(settings.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_required_settings() {
        let partial = PartialSettings {
            login: Some("admin".to_string()),
            ..PartialSettings::default()
        };
        assert_eq!(partial.missing_required(), vec!["satellite", "orgid"]);

        let err = Settings::try_from(partial).unwrap_err();
        assert!(matches!(err, ReportError::MissingSettings(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let cli = PartialSettings {
            login: Some(String::new()),
            satellite: Some("sat.example.com".to_string()),
            orgid: Some(String::new()),
            password: Some(String::new()),
            ..PartialSettings::default()
        };
        assert_eq!(cli.missing_required(), vec!["login", "orgid"]);

        let file = PartialSettings {
            login: Some("admin".to_string()),
            ..PartialSettings::default()
        };
        let merged = cli.clone().or(file);
        assert_eq!(merged.login.as_deref(), Some("admin"));
        assert!(merged.password.is_none());
        assert_eq!(merged.missing_required(), vec!["orgid"]);

        let err = Settings::try_from(cli).unwrap_err();
        assert!(matches!(err, ReportError::MissingSettings(_)));
    }

    #[test]
    fn test_normalize_satellite() {
        assert_eq!(
            normalize_satellite("satellite.example.com").unwrap(),
            "satellite.example.com"
        );
        assert_eq!(
            normalize_satellite("https://satellite.example.com/").unwrap(),
            "satellite.example.com"
        );
        assert_eq!(
            normalize_satellite("satellite.example.com:8443").unwrap(),
            "satellite.example.com:8443"
        );
        assert!(normalize_satellite("satellite.example.com/katello").is_err());
        assert!(normalize_satellite("").is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let settings = Settings {
            login: "admin".to_string(),
            password: Some("hunter2".to_string()),
            satellite: "sat.example.com".to_string(),
            orgid: "ACME".to_string(),
            insecure_tls: false,
            timeout: Duration::from_secs(5),
            output_dir: PathBuf::from("."),
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("********"));
    }
}
