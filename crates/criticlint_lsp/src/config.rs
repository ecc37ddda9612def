//! Configuration management for LSP server.

use tracing::{error, info};

use criticlint_core::LintConfig;

use crate::state::BackendState;

/// Rebuilds the effective configuration.
///
/// The workspace config file (if any) is loaded first and client settings
/// are layered on top. On error the previous configuration stays active.
pub(crate) fn reload_config(state: &BackendState) {
    let base = match load_workspace_config(state) {
        Some(config) => config,
        None => LintConfig::new(),
    };

    let settings = match state.client_settings.read() {
        Ok(guard) => guard.clone(),
        Err(e) => {
            error!("Client settings lock poisoned: {}", e);
            return;
        }
    };

    let config = match settings {
        Some(settings) => match base.merged_with(&settings) {
            Ok(config) => config,
            Err(e) => {
                error!("Ignoring invalid client settings: {}", e);
                return;
            }
        },
        None => base,
    };

    match state.config.write() {
        Ok(mut guard) => {
            info!("Lint configuration updated");
            *guard = config;
        }
        Err(e) => error!("Config lock poisoned: {}", e),
    }
}

/// Replaces the client settings and rebuilds the configuration.
pub(crate) fn apply_client_settings(state: &BackendState, settings: serde_json::Value) {
    if settings.is_null() {
        return;
    }

    match state.client_settings.write() {
        Ok(mut guard) => *guard = Some(settings),
        Err(e) => {
            error!("Client settings lock poisoned: {}", e);
            return;
        }
    }

    reload_config(state);
}

fn load_workspace_config(state: &BackendState) -> Option<LintConfig> {
    let root_guard = match state.workspace_root.read() {
        Ok(g) => g,
        Err(e) => {
            error!("Workspace root lock poisoned: {}", e);
            return None;
        }
    };

    let config_path = LintConfig::discover(root_guard.as_ref()?)?;
    info!("Found config file: {}", config_path.display());
    match LintConfig::from_file(&config_path) {
        Ok(config) => {
            info!("Loaded configuration from workspace");
            Some(config)
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            None
        }
    }
}
