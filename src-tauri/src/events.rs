use onetime_core::{Config, Visibility};
use serde::Serialize;
use tauri::{AppHandle, Emitter};

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityChangedEvent {
    pub visibility: Visibility,
    pub copied: bool,
}

/// Tell the frontend its text just went to the clipboard (drives the
/// transient "copied" indicator)
pub fn emit_text_copied(app: &AppHandle) -> Result<(), String> {
    app.emit("text-copied", ())
        .map_err(|e| format!("Failed to emit text-copied: {}", e))
}

/// Emit the full config after it changed outside a settings command
pub fn emit_config_changed(app: &AppHandle, config: &Config) -> Result<(), String> {
    app.emit("config-changed", config)
        .map_err(|e| format!("Failed to emit config-changed: {}", e))
}

/// Emit a show/hide transition to the frontend
pub fn emit_visibility_changed(
    app: &AppHandle,
    event: VisibilityChangedEvent,
) -> Result<(), String> {
    app.emit("visibility-changed", event)
        .map_err(|e| format!("Failed to emit visibility-changed: {}", e))
}
