// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::DEFAULT_WINDOW_DAYS;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.sakubumi", "SakuBumi", "sakubumi"));

pub const API_URL_ENV: &str = "SAKUBUMI_API_URL";
pub const DEFAULT_API_URL: &str = "https://sakubumi-api.vercel.app/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub app_name: String,
    pub window_days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    pub snapshot_scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            app_name: "SakuBumi".into(),
            window_days: DEFAULT_WINDOW_DAYS,
            export_dir: None,
            snapshot_scale: 2,
        }
    }
}

impl Config {
    /// Reads `path` if it exists, then applies environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Parse config {}", path.display()))?
        } else {
            Config::default()
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                cfg.api_url = url.trim().to_string();
            }
        }
        Ok(cfg)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.json"))
}
