use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub audit: AuditConfig,
    pub aws: AwsConfig,
    pub ui: UiConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditConfig {
    pub exclude_tags: Vec<String>,
    pub top_n: usize,
    pub recency_window_days: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AwsConfig {
    pub region: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
    pub max_table_rows: usize,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            audit: AuditConfig {
                exclude_tags: vec!["autoscaling".to_string(), "karpenter".to_string()],
                top_n: 5,
                recency_window_days: 42,
            },
            aws: AwsConfig {
                region: "us-east-1".to_string(),
            },
            ui: UiConfig {
                color: true,
                max_table_rows: 20,
            },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    audit: Option<RawAuditConfig>,
    aws: Option<RawAwsConfig>,
    ui: Option<RawUiConfig>,
}

#[derive(Debug, Deserialize)]
struct RawAuditConfig {
    exclude_tags: Option<Vec<String>>,
    top_n: Option<usize>,
    recency_window_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawAwsConfig {
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
    max_table_rows: Option<usize>,
}

pub fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
        .context("HOME is not set")
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/bkaudit/config.toml")
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(audit) = raw.audit {
        if let Some(exclude_tags) = audit.exclude_tags {
            cfg.audit.exclude_tags = exclude_tags;
        }
        if let Some(top_n) = audit.top_n {
            cfg.audit.top_n = top_n;
        }
        if let Some(recency_window_days) = audit.recency_window_days {
            cfg.audit.recency_window_days = recency_window_days;
        }
    }

    if let Some(aws) = raw.aws {
        if let Some(region) = aws.region {
            cfg.aws.region = region;
        }
    }

    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
        if let Some(max_table_rows) = ui.max_table_rows {
            cfg.ui.max_table_rows = max_table_rows;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("BKAUDIT_AUDIT_EXCLUDE_TAGS") {
        let parts: Vec<String> = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        cfg.audit.exclude_tags = parts;
    }
    if let Ok(v) = std::env::var("BKAUDIT_AUDIT_TOP_N") {
        cfg.audit.top_n = v
            .trim()
            .parse::<usize>()
            .with_context(|| "BKAUDIT_AUDIT_TOP_N")?;
    }
    if let Ok(v) = std::env::var("BKAUDIT_AUDIT_RECENCY_WINDOW_DAYS") {
        cfg.audit.recency_window_days = v
            .trim()
            .parse::<u32>()
            .with_context(|| "BKAUDIT_AUDIT_RECENCY_WINDOW_DAYS")?;
    }
    if let Ok(v) = std::env::var("BKAUDIT_AWS_REGION") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.aws.region = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("BKAUDIT_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "BKAUDIT_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("BKAUDIT_UI_MAX_TABLE_ROWS") {
        cfg.ui.max_table_rows = v
            .trim()
            .parse::<usize>()
            .with_context(|| "BKAUDIT_UI_MAX_TABLE_ROWS")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
