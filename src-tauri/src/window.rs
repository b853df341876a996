// Editor window - the single webview surface behind the hotkey

use log::debug;
use onetime_core::{Surface, SurfaceFactory};
use tauri::{AppHandle, WebviewUrl, WebviewWindow, WebviewWindowBuilder, WindowEvent};

use crate::lifecycle;

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Builds the editor window on demand and wires its events back into the
/// visibility controller.
pub struct WindowFactory {
    app: AppHandle,
}

impl WindowFactory {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl SurfaceFactory for WindowFactory {
    type Surface = EditorWindow;
    type Error = tauri::Error;

    fn create(&mut self, always_on_top: bool) -> tauri::Result<EditorWindow> {
        let window = WebviewWindowBuilder::new(
            &self.app,
            MAIN_WINDOW_LABEL,
            WebviewUrl::App("index.html".into()),
        )
        .title("One-Time Editor")
        .inner_size(700.0, 500.0)
        .decorations(false)
        .visible(false)
        .skip_taskbar(false)
        .always_on_top(always_on_top)
        .build()?;

        let app = self.app.clone();
        window.on_window_event(move |event| match event {
            WindowEvent::Focused(false) => lifecycle::focus_lost(app.clone()),
            WindowEvent::CloseRequested { .. } => {
                debug!("Editor window close requested");
                lifecycle::window_closed(app.clone());
            }
            _ => {}
        });

        Ok(EditorWindow { window })
    }
}

pub struct EditorWindow {
    window: WebviewWindow,
}

impl Surface for EditorWindow {
    type Error = tauri::Error;

    fn reveal(&mut self) -> tauri::Result<()> {
        self.window.show()?;
        self.window.set_focus()
    }

    fn conceal(&mut self) -> tauri::Result<()> {
        self.window.hide()
    }

    fn set_always_on_top(&mut self, always_on_top: bool) -> tauri::Result<()> {
        self.window.set_always_on_top(always_on_top)
    }
}
