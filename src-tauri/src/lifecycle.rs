// Editor lifecycle - hotkey, window and app events routed into the controller
//
// Everything except `shutdown` runs on the async runtime so the main thread
// never waits on the editor lock.

use log::{info, warn};
use onetime_core::Transition;
use tauri::{AppHandle, Manager};
use tauri_plugin_global_shortcut::GlobalShortcutExt;

use crate::events::{self, VisibilityChangedEvent};
use crate::state::AppState;

/// Hotkey toggle: show the editor, or hide it and copy its text
pub fn toggle(app: AppHandle) {
    with_editor(app, |editor| Some(editor.toggle()));
}

/// External show request (launch, dock reopen)
pub fn show(app: AppHandle) {
    with_editor(app, |editor| Some(editor.show()));
}

pub fn focus_lost(app: AppHandle) {
    with_editor(app, |editor| editor.focus_lost());
}

/// The window is closing; save whatever is still in the buffer
pub fn window_closed(app: AppHandle) {
    with_editor(app, |editor| {
        editor.surface_closed();
        None
    });
}

/// Copy hotkey: put the live text on the clipboard without hiding
pub fn copy_live_text(app: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let state = app.state::<AppState>();
        let copied = match state.editor() {
            Ok(mut editor) => editor.copy_live_text(),
            Err(e) => {
                warn!("⚠️  {}", e);
                return;
            }
        };
        if copied {
            let _ = events::emit_text_copied(&app);
        }
    });
}

/// Process exit: flush unsaved text, then release every global shortcut.
/// Runs inline because the process is about to end.
pub fn shutdown(app: &AppHandle) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };

    match state.editor() {
        Ok(mut editor) => {
            editor.terminate();
        }
        Err(e) => warn!("⚠️  {}", e),
    }

    // A rebind in flight holds the hotkeys lock while it waits on the main
    // thread, which is this one. Go to the plugin directly instead of waiting.
    match state.hotkeys.try_lock() {
        Ok(mut hotkeys) => hotkeys.unbind_all(),
        Err(e) => {
            warn!("⚠️  Hotkeys busy at exit ({}), releasing through the plugin", e);
            if let Err(e) = app.global_shortcut().unregister_all() {
                warn!("⚠️  Failed to unregister global shortcuts: {}", e);
            }
        }
    }
    info!("👋 Shutdown complete");
}

/// Report a transition to the frontend
pub fn report(app: &AppHandle, transition: Transition) {
    if transition.copied {
        let _ = events::emit_text_copied(app);
    }
    let _ = events::emit_visibility_changed(
        app,
        VisibilityChangedEvent {
            visibility: transition.visibility,
            copied: transition.copied,
        },
    );
}

fn with_editor<F>(app: AppHandle, action: F)
where
    F: FnOnce(&mut crate::state::Editor) -> Option<Transition> + Send + 'static,
{
    tauri::async_runtime::spawn(async move {
        let state = app.state::<AppState>();
        let transition = match state.editor() {
            Ok(mut editor) => action(&mut editor),
            Err(e) => {
                warn!("⚠️  {}", e);
                return;
            }
        };
        if let Some(transition) = transition {
            report(&app, transition);
        }
    });
}
