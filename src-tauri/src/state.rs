use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use log::{info, warn};
use onetime_core::{
    Config, ConfigStore, HistoryStore, HotkeyAction, HotkeyManager, VisibilityController,
};
use tauri::AppHandle;

use crate::clipboard::SystemClipboard;
use crate::fs_watcher::ConfigWatcher;
use crate::hotkey::GlobalShortcutRegistrar;
use crate::window::WindowFactory;

pub type Editor = VisibilityController<WindowFactory, SystemClipboard>;
pub type Hotkeys = HotkeyManager<GlobalShortcutRegistrar>;

/// The config file plus the record currently in effect (bound hotkeys,
/// window flags).
pub struct Settings {
    pub store: ConfigStore,
    pub applied: Config,
}

/// Application state shared by commands, hotkey callbacks and window events.
///
/// Lock order is settings → hotkeys → editor. Code holding the editor lock
/// never takes the other two. All reads and writes of the history file go
/// through the editor lock.
pub struct AppState {
    pub settings: Mutex<Settings>,
    pub hotkeys: Mutex<Hotkeys>,
    pub editor: Mutex<Editor>,
    pub config_watcher: Mutex<Option<ConfigWatcher>>,
}

impl AppState {
    pub fn new(app: &AppHandle, data_dir: &Path) -> Self {
        let store = ConfigStore::in_dir(data_dir);
        let config = store.load_or_create();
        info!("⚙️  Loaded config from {}", store.path().display());

        let editor = VisibilityController::new(
            WindowFactory::new(app.clone()),
            SystemClipboard::new(app.clone()),
            HistoryStore::in_dir(data_dir),
            config.always_on_top,
        );

        Self {
            settings: Mutex::new(Settings {
                store,
                applied: config,
            }),
            hotkeys: Mutex::new(HotkeyManager::new(GlobalShortcutRegistrar::new(app.clone()))),
            editor: Mutex::new(editor),
            config_watcher: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> Result<MutexGuard<'_, Settings>, String> {
        self.settings
            .lock()
            .map_err(|e| format!("Failed to lock settings: {}", e))
    }

    pub fn hotkeys(&self) -> Result<MutexGuard<'_, Hotkeys>, String> {
        self.hotkeys
            .lock()
            .map_err(|e| format!("Failed to lock hotkeys: {}", e))
    }

    pub fn editor(&self) -> Result<MutexGuard<'_, Editor>, String> {
        self.editor
            .lock()
            .map_err(|e| format!("Failed to lock editor: {}", e))
    }

    /// Bring hotkeys and the window in line with `next`, touching only what
    /// changed since the last applied config. `rebind` re-registers hotkeys
    /// even when the bindings are unchanged, so a combo another application
    /// has since released replaces its fallback.
    pub fn apply_config(
        &self,
        settings: &mut Settings,
        next: Config,
        rebind: bool,
    ) -> Result<(), String> {
        let previous = &settings.applied;

        if rebind || next.bindings_differ(previous) {
            let mut hotkeys = self.hotkeys()?;
            for binding in hotkeys.bind(&next) {
                if binding.fallback {
                    warn!(
                        "⚠️  {:?} is bound to fallback {} instead of the configured shortcut",
                        binding.action, binding.combo
                    );
                }
            }
            if hotkeys.binding_for(HotkeyAction::ToggleWindow).is_none() {
                warn!("⚠️  No toggle shortcut is registered, the editor cannot be summoned");
            }
        }

        if next.always_on_top != previous.always_on_top {
            self.editor()?.set_always_on_top(next.always_on_top);
        }

        settings.applied = next;
        Ok(())
    }

    /// Load the config fresh, mutate it, persist it, and apply the result.
    pub fn update_config<F>(&self, change: F) -> Result<Config, String>
    where
        F: FnOnce(&mut Config),
    {
        let mut settings = self.settings()?;
        let next = settings
            .store
            .update(change)
            .map_err(|e| format!("Failed to save config: {}", e))?;
        self.apply_config(&mut settings, next.clone(), false)?;
        Ok(next)
    }

    /// Change a hotkey binding. `change` may refuse by returning `false`, in
    /// which case nothing is written. Check and write happen under one
    /// settings lock, and an accepted change always re-registers.
    pub fn update_shortcuts<F>(&self, change: F) -> Result<Option<Config>, String>
    where
        F: FnOnce(&mut Config) -> bool,
    {
        let mut settings = self.settings()?;
        let Some(next) = settings
            .store
            .try_update(change)
            .map_err(|e| format!("Failed to save config: {}", e))?
        else {
            return Ok(None);
        };
        self.apply_config(&mut settings, next.clone(), true)?;
        Ok(Some(next))
    }
}
