mod clipboard;
mod commands;
mod events;
mod fs_watcher;
mod hotkey;
mod lifecycle;
mod state;
mod window;

pub mod logging;

use state::AppState;
use tauri::{AppHandle, Manager, RunEvent};
use log::{info, warn};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let app = tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_clipboard_manager::init())
        .invoke_handler(tauri::generate_handler![
            commands::get_history,
            commands::save_to_history,
            commands::delete_history_entry,
            commands::copy_to_clipboard,
            commands::sync_text,
            commands::get_config,
            commands::get_shortcut,
            commands::set_shortcut,
            commands::set_copy_shortcut,
            commands::set_always_on_top,
            commands::set_indent,
            commands::hide_window,
        ])
        .setup(|app| {
            setup(app.handle())?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(handle_run_event);
}

fn setup(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = app.path().app_data_dir()?;
    if !data_dir.exists() {
        info!("📁 Creating data folder: {:?}", data_dir);
        std::fs::create_dir_all(&data_dir)?;
    }

    // Managed before any shortcut is bound: callbacks look the state up
    app.manage(AppState::new(app, &data_dir));
    let state = app.state::<AppState>();

    let (config, config_path) = {
        let settings = state.settings()?;
        (settings.applied.clone(), settings.store.path().to_path_buf())
    };
    state.hotkeys()?.bind(&config);

    match fs_watcher::watch_config(app.clone(), config_path) {
        Ok(watcher) => {
            let mut slot = state.config_watcher.lock()
                .map_err(|e| format!("Failed to lock config_watcher: {}", e))?;
            *slot = Some(watcher);
        }
        Err(e) => {
            warn!("⚠️  Failed to start config watcher: {}", e);
        }
    }

    // The editor starts visible, like a freshly launched app
    lifecycle::show(app.clone());
    Ok(())
}

fn handle_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        // Closing the last window keeps a macOS app resident; the hotkey
        // brings the editor back.
        #[cfg(target_os = "macos")]
        RunEvent::ExitRequested { code: None, api, .. } => {
            info!("Last window closed, staying resident");
            api.prevent_exit();
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => lifecycle::show(app.clone()),
        RunEvent::Exit => lifecycle::shutdown(app),
        _ => {}
    }
}
