// src/config.rs
//! Run configuration: which sources to pull, the filter rules, where reports
//! go and how the notification email is assembled. One file, TOML or JSON.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::filter::HardRequirements;
use crate::pipeline::score::Preferences;

const ENV_CONFIG_PATH: &str = "SCOUT_CONFIG_PATH";
const DEFAULT_TOML_PATH: &str = "config/scout.toml";
const DEFAULT_JSON_PATH: &str = "config/scout.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub sources: SourcesCfg,
    #[serde(default)]
    pub filters: FiltersCfg,
    #[serde(default)]
    pub output: OutputCfg,
    #[serde(default)]
    pub email: EmailCfg,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesCfg {
    #[serde(default)]
    pub rss: Vec<RssSourceCfg>,
    #[serde(default)]
    pub html: Vec<HtmlSourceCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RssSourceCfg {
    pub url: String,
    #[serde(default = "default_rss_name")]
    pub name: String,
}

/// Descriptor for one scraped listing page. `item_selector` is a CSS selector
/// for the per-listing anchor/element; `title_attr`/`href_attr` name the
/// attribute to read, with `"text"` meaning the element's own text.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlSourceCfg {
    pub url: String,
    #[serde(default = "default_html_name")]
    pub name: String,
    pub item_selector: String,
    #[serde(default = "default_title_attr")]
    pub title_attr: String,
    #[serde(default = "default_href_attr")]
    pub href_attr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltersCfg {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Escape hatch for the empty-keyword case: without it an empty
    /// `keywords` list matches nothing.
    #[serde(default)]
    pub match_all_when_no_keywords: bool,
    #[serde(default)]
    pub hard_requirements: HardRequirements,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputCfg {
    #[serde(default = "default_out_dir")]
    pub dir: String,
    #[serde(default = "default_csv_path")]
    pub csv: String,
    #[serde(default = "default_markdown_path")]
    pub markdown_summary: String,
}

impl Default for OutputCfg {
    fn default() -> Self {
        OutputCfg {
            dir: default_out_dir(),
            csv: default_csv_path(),
            markdown_summary: default_markdown_path(),
        }
    }
}

/// Email settings hold the *names* of environment variables, not the values,
/// so credentials never land in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailCfg {
    #[serde(default = "default_from_env")]
    pub from_env: String,
    #[serde(default = "default_to_env")]
    pub to_env: String,
    #[serde(default = "default_host_env")]
    pub host_env: String,
    #[serde(default = "default_port_env")]
    pub port_env: String,
    #[serde(default = "default_user_env")]
    pub user_env: String,
    #[serde(default = "default_pass_env")]
    pub pass_env: String,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Send the email even when there are zero matches.
    #[serde(default)]
    pub send_if_zero: bool,
}

impl Default for EmailCfg {
    fn default() -> Self {
        EmailCfg {
            from_env: default_from_env(),
            to_env: default_to_env(),
            host_env: default_host_env(),
            port_env: default_port_env(),
            user_env: default_user_env(),
            pass_env: default_pass_env(),
            subject_prefix: default_subject_prefix(),
            send_if_zero: false,
        }
    }
}

fn default_rss_name() -> String {
    "rss".to_string()
}
fn default_html_name() -> String {
    "html".to_string()
}
fn default_title_attr() -> String {
    "text".to_string()
}
fn default_href_attr() -> String {
    "href".to_string()
}
fn default_out_dir() -> String {
    "out".to_string()
}
fn default_csv_path() -> String {
    "out/matches.csv".to_string()
}
fn default_markdown_path() -> String {
    "out/matches.md".to_string()
}
fn default_from_env() -> String {
    "SMTP_FROM".to_string()
}
fn default_to_env() -> String {
    "SMTP_TO".to_string()
}
fn default_host_env() -> String {
    "SMTP_HOST".to_string()
}
fn default_port_env() -> String {
    "SMTP_PORT".to_string()
}
fn default_user_env() -> String {
    "SMTP_USER".to_string()
}
fn default_pass_env() -> String {
    "SMTP_PASS".to_string()
}
fn default_subject_prefix() -> String {
    "[Apartment Scout]".to_string()
}

impl ScoutConfig {
    /// Load from an explicit path. The extension picks the format; anything
    /// that is not `.json` is tried as TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = if ext == "json" {
            Self::from_json_str(&content)
                .with_context(|| format!("parsing {} as json", path.display()))?
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("parsing {} as toml", path.display()))?
        };
        cfg.warn_on_footguns();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $SCOUT_CONFIG_PATH
    /// 2) config/scout.toml
    /// 3) config/scout.json
    /// No file at all yields the built-in defaults (no sources, no keywords).
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from(DEFAULT_JSON_PATH);
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        tracing::warn!("no config file found, running with defaults");
        let cfg = Self::default();
        cfg.warn_on_footguns();
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Surface configurations that are legal but almost certainly not what
    /// the operator meant.
    fn warn_on_footguns(&self) {
        if self.sources.rss.is_empty() && self.sources.html.is_empty() {
            tracing::warn!("no sources configured, every run will produce zero listings");
        }
        if self.filters.keywords.is_empty() && !self.filters.match_all_when_no_keywords {
            tracing::warn!(
                "keywords is empty and match_all_when_no_keywords is off, \
                 every listing will be rejected"
            );
        }
    }
}
