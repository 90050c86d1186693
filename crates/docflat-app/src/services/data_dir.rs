// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-appropriate config directory resolution.

use std::path::PathBuf;

/// Return the config directory for Docflat, creating it if needed.
///
/// Uses `$XDG_CONFIG_HOME/docflat`, then `$HOME/.config/docflat`, then
/// `/tmp/docflat`.
pub fn config_dir() -> PathBuf {
    let dir = resolve(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    );
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Where `AppConfig` lives when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn resolve(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    let base = xdg_config_home
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("docflat")
}
