use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Result as NotifyResult, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::channel;
use tauri::{AppHandle, Manager};
use log::{debug, info, warn};

use crate::events;
use crate::state::AppState;

/// Keeps the config watcher alive for as long as it is stored in `AppState`
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

/// Watch the config file's directory and re-apply the config when the file
/// is edited outside the app.
///
/// Only the directory is watched (editors often replace files by rename), and
/// only events touching the config file name get through.
pub fn watch_config(app: AppHandle, config_path: PathBuf) -> NotifyResult<ConfigWatcher> {
    let Some(dir) = config_path.parent().map(PathBuf::from) else {
        return Err(notify::Error::generic("config path has no parent directory"));
    };
    info!("📁 Starting config watcher for: {:?}", config_path);

    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    let file_name = config_path.file_name().map(|n| n.to_os_string());
    std::thread::spawn(move || {
        while let Ok(event) = rx.recv() {
            match event.kind {
                EventKind::Create(_) | EventKind::Modify(_) => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_config {
                        debug!("📂 Config file event: {:?}", event.kind);
                        reload(&app);
                    }
                }
                _ => {
                    debug!("   ⏭️  Ignored event type: {:?}", event.kind);
                }
            }
        }
    });

    info!("✅ Config watcher started successfully");
    Ok(ConfigWatcher { _watcher: watcher })
}

/// Re-read the config and apply whatever differs from what is in effect.
///
/// A missing or unparseable file is a half-finished external write; it is
/// skipped rather than treated as a reset to defaults.
fn reload(app: &AppHandle) {
    let state = app.state::<AppState>();
    let mut settings = match state.settings() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("⚠️  {}", e);
            return;
        }
    };

    let Some(next) = settings.store.try_load() else {
        debug!("Config file unreadable, keeping current settings");
        return;
    };
    if next == settings.applied {
        return;
    }

    info!("🔄 Config changed on disk, re-applying");
    if let Err(e) = state.apply_config(&mut settings, next.clone(), false) {
        warn!("⚠️  Failed to apply reloaded config: {}", e);
        return;
    }
    drop(settings);

    let _ = events::emit_config_changed(app, &next);
}
