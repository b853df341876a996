//! # onetime-core
//!
//! State behind the One-Time Editor, a hidden scratchpad window toggled by a
//! global hotkey:
//! - `config`: the user configuration record and its JSON store
//! - `history`: the capped, newest-first list of saved snippets
//! - `hotkey`: binding configured key combinations through a registrar
//! - `visibility`: the show/hide state machine and its side effects
//!
//! Nothing in here talks to the OS directly. Global shortcuts, the editor
//! window and the clipboard are reached through the [`ShortcutRegistrar`],
//! [`SurfaceFactory`] and [`Clipboard`] traits, which the desktop host
//! implements.
//!
//! ## Example
//! ```no_run
//! use onetime_core::{ConfigStore, HistoryStore};
//!
//! let dir = std::path::Path::new("/tmp/onetime-editor");
//! let config = ConfigStore::in_dir(dir).load_or_create();
//! let history = HistoryStore::in_dir(dir).append("draft")?;
//! assert_eq!(history[0].text, "draft");
//! # let _ = config;
//! # Ok::<(), onetime_core::StoreError>(())
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod hotkey;
pub mod visibility;

mod json_file;

pub use config::{Config, ConfigStore, IndentSize, IndentType, KeyCombo, Modifier};
pub use error::{ComboError, StoreError};
pub use history::{HistoryEntry, HistoryStore, HISTORY_LIMIT};
pub use hotkey::{Binding, HotkeyAction, HotkeyManager, ShortcutRegistrar};
pub use visibility::{
    Clipboard, Surface, SurfaceFactory, Transition, Visibility, VisibilityController,
};
