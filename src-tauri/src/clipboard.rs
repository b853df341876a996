use onetime_core::Clipboard;
use tauri::AppHandle;
use tauri_plugin_clipboard_manager::ClipboardExt;

/// System clipboard via the clipboard-manager plugin
pub struct SystemClipboard {
    app: AppHandle,
}

impl SystemClipboard {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl Clipboard for SystemClipboard {
    type Error = tauri_plugin_clipboard_manager::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.app.clipboard().write_text(text)
    }
}
