//! Show/hide state machine for the single editor window.
//!
//! Policy, held consistently across every hide path (toggle, explicit hide,
//! blur): non-blank live text is copied to the clipboard, never written to
//! history. History is only written when the window closes or the process
//! quits, so unsaved text survives the app going away.

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::history::{HistoryEntry, HistoryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Outcome of a show or hide request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub visibility: Visibility,
    /// The live text was placed on the clipboard on the way out.
    pub copied: bool,
}

/// A live editor window.
pub trait Surface {
    type Error: fmt::Display;

    /// Make the window visible and give it input focus.
    fn reveal(&mut self) -> Result<(), Self::Error>;
    fn conceal(&mut self) -> Result<(), Self::Error>;
    fn set_always_on_top(&mut self, always_on_top: bool) -> Result<(), Self::Error>;
}

/// Builds the editor window on demand.
pub trait SurfaceFactory {
    type Surface: Surface;
    type Error: fmt::Display;

    fn create(&mut self, always_on_top: bool) -> Result<Self::Surface, Self::Error>;
}

pub trait Clipboard {
    type Error: fmt::Display;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Owns the single window slot, the mirrored live text buffer, and the
/// history store the buffer is flushed into on close/quit.
pub struct VisibilityController<F: SurfaceFactory, C> {
    factory: F,
    clipboard: C,
    history: HistoryStore,
    surface: Option<F::Surface>,
    visibility: Visibility,
    live_text: String,
    always_on_top: bool,
}

impl<F, C> VisibilityController<F, C>
where
    F: SurfaceFactory,
    C: Clipboard,
{
    pub fn new(factory: F, clipboard: C, history: HistoryStore, always_on_top: bool) -> Self {
        Self {
            factory,
            clipboard,
            history,
            surface: None,
            visibility: Visibility::Hidden,
            live_text: String::new(),
            always_on_top,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Build the window if the slot is empty. Returns whether one exists.
    pub fn ensure_exists(&mut self) -> bool {
        if self.surface.is_some() {
            return true;
        }

        match self.factory.create(self.always_on_top) {
            Ok(surface) => {
                info!("🪟 Editor window created");
                self.surface = Some(surface);
                self.visibility = Visibility::Hidden;
                true
            }
            Err(e) => {
                warn!("⚠️  Failed to create editor window: {}", e);
                false
            }
        }
    }

    pub fn toggle(&mut self) -> Transition {
        match (self.has_surface(), self.visibility) {
            (true, Visibility::Visible) => self.hide(),
            _ => self.show(),
        }
    }

    /// Reveal the window, creating it first if needed. The live text and
    /// history are left alone.
    pub fn show(&mut self) -> Transition {
        if !self.ensure_exists() {
            return self.transition(false);
        }

        if let Some(surface) = self.surface.as_mut() {
            match surface.reveal() {
                Ok(()) => self.visibility = Visibility::Visible,
                Err(e) => warn!("⚠️  Failed to show editor window: {}", e),
            }
        }
        debug!("Editor is {:?}", self.visibility);
        self.transition(false)
    }

    /// Hide the window, copying non-blank live text to the clipboard first.
    /// Already hidden means nothing happens.
    pub fn hide(&mut self) -> Transition {
        if self.visibility == Visibility::Hidden {
            return self.transition(false);
        }

        let copied = self.copy_live_text();
        if let Some(surface) = self.surface.as_mut() {
            if let Err(e) = surface.conceal() {
                warn!("⚠️  Failed to hide editor window: {}", e);
            }
        }
        self.visibility = Visibility::Hidden;
        debug!("Editor is Hidden (copied: {})", copied);
        self.transition(copied)
    }

    /// The window lost focus. Pinned windows stay up so the user can read
    /// other apps alongside; otherwise this is a hide.
    pub fn focus_lost(&mut self) -> Option<Transition> {
        if self.always_on_top || self.visibility == Visibility::Hidden {
            return None;
        }
        Some(self.hide())
    }

    /// Mirror the editor's buffer.
    pub fn sync_text(&mut self, text: String) {
        self.live_text = text;
    }

    /// Put the live text on the clipboard. Blank text is skipped.
    pub fn copy_live_text(&mut self) -> bool {
        if self.live_text.trim().is_empty() {
            return false;
        }

        match self.clipboard.write_text(&self.live_text) {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️  Failed to copy text to clipboard: {}", e);
                false
            }
        }
    }

    /// Explicit copy requested by the UI. Writes exactly what it is given.
    pub fn copy_text(&mut self, text: &str) -> Result<(), String> {
        self.clipboard
            .write_text(text)
            .map_err(|e| format!("Failed to copy to clipboard: {}", e))
    }

    pub fn set_always_on_top(&mut self, always_on_top: bool) -> bool {
        self.always_on_top = always_on_top;
        if let Some(surface) = self.surface.as_mut() {
            if let Err(e) = surface.set_always_on_top(always_on_top) {
                warn!("⚠️  Failed to apply always-on-top: {}", e);
            }
        }
        always_on_top
    }

    /// The window is going away. Unsaved text goes to history and the slot is
    /// freed so the next show builds a fresh window.
    pub fn surface_closed(&mut self) -> Option<Vec<HistoryEntry>> {
        let saved = self.persist_live_text();
        self.surface = None;
        self.visibility = Visibility::Hidden;
        saved
    }

    /// Process exit: flush unsaved text to history.
    pub fn terminate(&mut self) -> Option<Vec<HistoryEntry>> {
        self.persist_live_text()
    }

    /// Appends non-blank live text to history and clears the mirror, so a
    /// close followed by quit does not save the same draft twice.
    fn persist_live_text(&mut self) -> Option<Vec<HistoryEntry>> {
        if self.live_text.trim().is_empty() {
            return None;
        }

        match self.history.append(&self.live_text) {
            Ok(entries) => {
                info!("💾 Saved unsaved text to history");
                self.live_text.clear();
                Some(entries)
            }
            Err(e) => {
                warn!("⚠️  Failed to save unsaved text: {}", e);
                None
            }
        }
    }

    fn transition(&self, copied: bool) -> Transition {
        Transition {
            visibility: self.visibility,
            copied,
        }
    }
}
