// Hotkey module - global shortcut registration through the Tauri plugin

use onetime_core::{HotkeyAction, KeyCombo, ShortcutRegistrar};
use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

use crate::lifecycle;

/// Registers key combinations with the OS and routes presses to the editor.
pub struct GlobalShortcutRegistrar {
    app: AppHandle,
}

impl GlobalShortcutRegistrar {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ShortcutRegistrar for GlobalShortcutRegistrar {
    type Error = tauri_plugin_global_shortcut::Error;

    fn register(&mut self, combo: &KeyCombo, action: HotkeyAction) -> Result<(), Self::Error> {
        self.app
            .global_shortcut()
            .on_shortcut(combo.accelerator().as_str(), move |app, _shortcut, event| {
                // Only presses count; releases would toggle straight back.
                if let ShortcutState::Pressed = event.state {
                    dispatch(app.clone(), action);
                }
            })
    }

    fn unregister_all(&mut self) -> Result<(), Self::Error> {
        self.app.global_shortcut().unregister_all()
    }
}

fn dispatch(app: AppHandle, action: HotkeyAction) {
    match action {
        HotkeyAction::ToggleWindow => lifecycle::toggle(app),
        HotkeyAction::CopyText => lifecycle::copy_live_text(app),
    }
}
