use std::fs;
use std::path::Path;

use aabsmart_core::{AdvisorConfig, GeminiConfig};

/// Configuration for the advisor demo
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub advisor: AdvisorConfig,
    pub gemini: GeminiConfig,
    /// Log entries printed after the run
    pub log_summary_limit: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            advisor: AdvisorConfig::default(),
            gemini: GeminiConfig::default(),
            log_summary_limit: 10,
        }
    }
}

impl DemoConfig {
    /// Load configuration from a TOML file (path via ADVISOR_CONFIG or ./advisor.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("ADVISOR_CONFIG").unwrap_or_else(|_| "advisor.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "advisor_demo", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => Self::from_toml_str(&s, default),
            Err(e) => {
                tracing::warn!(target = "advisor_demo", error = %e, "Failed to read TOML; using defaults");
                Self::default()
            }
        }
    }

    fn from_toml_str(s: &str, default: Self) -> Self {
        match toml::from_str::<DemoToml>(s) {
            Ok(t) => t.overlay(default),
            Err(e) => {
                tracing::warn!(target = "advisor_demo", error = %e, "Failed to parse TOML; using defaults");
                default
            }
        }
    }
}

// TOML overlay definitions

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct DemoToml {
    pub log_summary_limit: Option<usize>,
    pub advisor: Option<AdvisorToml>,
    pub gemini: Option<GeminiToml>,
}

impl DemoToml {
    fn overlay(self, mut base: DemoConfig) -> DemoConfig {
        if let Some(n) = self.log_summary_limit {
            base.log_summary_limit = n;
        }
        if let Some(a) = self.advisor {
            a.apply(&mut base.advisor);
        }
        if let Some(g) = self.gemini {
            g.apply(&mut base.gemini);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct AdvisorToml {
    pub session_max_turns: Option<usize>,
    pub max_tips: Option<usize>,
    pub default_land_size_ha: Option<f64>,
    pub temperature: Option<f32>,
}
impl AdvisorToml {
    fn apply(self, a: &mut AdvisorConfig) {
        if let Some(v) = self.session_max_turns {
            a.session_max_turns = v.max(1);
        }
        if let Some(v) = self.max_tips {
            a.max_tips = v;
        }
        if let Some(v) = self.default_land_size_ha {
            a.default_land_size_ha = v.max(0.0);
        }
        if let Some(v) = self.temperature {
            a.temperature = v.clamp(0.0, 2.0);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct GeminiToml {
    pub base_url: Option<String>,
    pub models: Option<Vec<String>>,
    pub request_timeout_ms: Option<u64>,
}
impl GeminiToml {
    fn apply(self, g: &mut GeminiConfig) {
        if let Some(v) = self.base_url {
            g.base_url = v;
        }
        if let Some(v) = self.models.filter(|m| !m.is_empty()) {
            g.models = v;
        }
        if let Some(v) = self.request_timeout_ms {
            g.request_timeout_ms = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_replaces_only_given_fields() {
        let base = DemoConfig::default();
        let cfg = DemoConfig::from_toml_str(
            r#"
log_summary_limit = 3

[advisor]
max_tips = 5

[gemini]
models = ["gemini-test"]
"#,
            base.clone(),
        );

        assert_eq!(cfg.log_summary_limit, 3);
        assert_eq!(cfg.advisor.max_tips, 5);
        assert_eq!(cfg.advisor.session_max_turns, base.advisor.session_max_turns);
        assert_eq!(cfg.gemini.models, vec!["gemini-test"]);
        assert_eq!(cfg.gemini.base_url, base.gemini.base_url);
    }

    #[test]
    fn malformed_toml_keeps_defaults() {
        let base = DemoConfig::default();
        let cfg = DemoConfig::from_toml_str("advisor = 7", base.clone());
        assert_eq!(cfg.advisor, base.advisor);
        assert_eq!(cfg.log_summary_limit, base.log_summary_limit);
    }
}
