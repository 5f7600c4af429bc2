use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub page: Page,
    #[serde(default)]
    pub fetch: Fetch,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Address of the hosting page. Empty means `file://<cwd>/index.html`.
    pub address: String,
    pub region_id: String,
    pub title: String,
}
impl Default for Page {
    fn default() -> Self {
        Self {
            address: "".into(),
            region_id: "content".into(),
            title: "Independence Probe Renderer".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Fetch {
    pub user_agent: String,
}
impl Default for Fetch {
    fn default() -> Self {
        Self {
            user_agent: concat!("probe-render/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub path: String,
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            path: "".into(),
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "probe-render.log".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [page]
            region_id = "results"

            [logging]
            json = true
            "#,
        )
        .expect("parse TOML");
        assert_eq!(cfg.page.region_id, "results");
        assert_eq!(cfg.page.title, "Independence Probe Renderer");
        assert!(cfg.logging.json);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.output.print_summary);
    }

    #[test]
    fn empty_file_is_default() {
        let cfg: Config = toml::from_str("").expect("parse TOML");
        assert!(cfg.page.address.is_empty());
        assert!(cfg.fetch.user_agent.starts_with("probe-render/"));
    }
}
