use log::{info, warn};
use onetime_core::{Config, HistoryEntry, IndentSize, IndentType, KeyCombo};
use tauri::{AppHandle, State};

use crate::lifecycle;
use crate::state::AppState;

/// All saved history entries, newest first
#[tauri::command]
pub async fn get_history(state: State<'_, AppState>) -> Result<Vec<HistoryEntry>, String> {
    let editor = state.editor()?;
    Ok(editor.history().load())
}

/// Save text as a new history entry. Blank text leaves history unchanged.
#[tauri::command]
pub async fn save_to_history(
    text: String,
    state: State<'_, AppState>,
) -> Result<Vec<HistoryEntry>, String> {
    let editor = state.editor()?;
    let history = editor.history();
    Ok(history.append(&text).unwrap_or_else(|e| {
        warn!("⚠️  Failed to save history entry: {}", e);
        history.load()
    }))
}

#[tauri::command]
pub async fn delete_history_entry(
    id: String,
    state: State<'_, AppState>,
) -> Result<Vec<HistoryEntry>, String> {
    let editor = state.editor()?;
    let history = editor.history();
    Ok(history.remove(&id).unwrap_or_else(|e| {
        warn!("⚠️  Failed to delete history entry {}: {}", id, e);
        history.load()
    }))
}

/// Explicit copy from the UI
#[tauri::command]
pub async fn copy_to_clipboard(text: String, state: State<'_, AppState>) -> Result<(), String> {
    state.editor()?.copy_text(&text)
}

/// Mirror the editor buffer so hide and quit can act on it
#[tauri::command]
pub async fn sync_text(text: String, state: State<'_, AppState>) -> Result<(), String> {
    state.editor()?.sync_text(text);
    Ok(())
}

#[tauri::command]
pub async fn get_config(state: State<'_, AppState>) -> Result<Config, String> {
    Ok(state.settings()?.store.load())
}

/// Current toggle shortcut string
#[tauri::command]
pub async fn get_shortcut(state: State<'_, AppState>) -> Result<String, String> {
    Ok(state.settings()?.store.load().toggle_shortcut.to_string())
}

/// Set the toggle shortcut. `false` means the combo was rejected and nothing
/// changed.
#[tauri::command]
pub async fn set_shortcut(combo: String, state: State<'_, AppState>) -> Result<bool, String> {
    let Some(combo) = parse_combo(&combo) else {
        return Ok(false);
    };

    let label = combo.to_string();
    let updated = state.update_shortcuts(|config| config.set_toggle_shortcut(combo))?;
    if updated.is_none() {
        info!("Rejected toggle shortcut {}: already the copy shortcut", label);
    }
    Ok(updated.is_some())
}

/// Set the secondary copy shortcut; an empty string clears it.
#[tauri::command]
pub async fn set_copy_shortcut(combo: String, state: State<'_, AppState>) -> Result<bool, String> {
    let combo = if combo.is_empty() {
        None
    } else {
        let Some(combo) = parse_combo(&combo) else {
            return Ok(false);
        };
        Some(combo)
    };

    let label = combo.as_ref().map(ToString::to_string);
    let updated = state.update_shortcuts(|config| config.set_copy_shortcut(combo))?;
    if let (None, Some(label)) = (&updated, label) {
        info!("Rejected copy shortcut {}: already the toggle shortcut", label);
    }
    Ok(updated.is_some())
}

/// Returns the value that was applied
#[tauri::command]
pub async fn set_always_on_top(
    always_on_top: bool,
    state: State<'_, AppState>,
) -> Result<bool, String> {
    let config = state.update_config(|config| config.always_on_top = always_on_top)?;
    Ok(config.always_on_top)
}

/// Invalid values are coerced the same way loading does
#[tauri::command]
pub async fn set_indent(
    indent_type: String,
    indent_size: u64,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let indent_type = IndentType::coerce(&indent_type);
    let indent_size = IndentSize::coerce(indent_size);
    state.update_config(|config| {
        config.indent_type = indent_type;
        config.indent_size = indent_size;
    })?;
    Ok(())
}

/// Explicit hide from the UI (e.g. Escape). Same side effects as a toggle-hide.
#[tauri::command]
pub async fn hide_window(app: AppHandle, state: State<'_, AppState>) -> Result<(), String> {
    let transition = state.editor()?.hide();
    lifecycle::report(&app, transition);
    Ok(())
}

fn parse_combo(raw: &str) -> Option<KeyCombo> {
    match raw.parse::<KeyCombo>() {
        Ok(combo) => Some(combo),
        Err(e) => {
            info!("Rejected shortcut {:?}: {}", raw, e);
            None
        }
    }
}
