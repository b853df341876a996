//! End-to-end walk through a session: settings change, hotkey presses,
//! hide/show, and quitting with an unsaved draft.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use onetime_core::{
    Clipboard, Config, ConfigStore, HistoryStore, HotkeyAction, HotkeyManager, KeyCombo,
    ShortcutRegistrar, Surface, SurfaceFactory, Visibility, VisibilityController, HISTORY_LIMIT,
};
use tempfile::tempdir;

/// Combos in `refused` are held by another application. The list is shared
/// so a test can release them mid-session.
#[derive(Default)]
struct Registrar {
    refused: Rc<RefCell<Vec<String>>>,
    active: HashMap<String, HotkeyAction>,
}

impl Registrar {
    fn refusing(combos: &[&str]) -> Self {
        Self {
            refused: Rc::new(RefCell::new(combos.iter().map(|c| c.to_string()).collect())),
            ..Self::default()
        }
    }
}

impl ShortcutRegistrar for Registrar {
    type Error = &'static str;

    fn register(&mut self, combo: &KeyCombo, action: HotkeyAction) -> Result<(), Self::Error> {
        if self.refused.borrow().iter().any(|c| c == combo.as_str()) {
            return Err("claimed by another application");
        }
        self.active.insert(combo.to_string(), action);
        Ok(())
    }

    fn unregister_all(&mut self) -> Result<(), Self::Error> {
        self.active.clear();
        Ok(())
    }
}

struct Window;

impl Surface for Window {
    type Error = &'static str;

    fn reveal(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn conceal(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_always_on_top(&mut self, _always_on_top: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct Windows;

impl SurfaceFactory for Windows {
    type Surface = Window;
    type Error = &'static str;

    fn create(&mut self, _always_on_top: bool) -> Result<Window, Self::Error> {
        Ok(Window)
    }
}

#[derive(Clone, Default)]
struct SharedClipboard(Rc<RefCell<Option<String>>>);

impl Clipboard for SharedClipboard {
    type Error = &'static str;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        *self.0.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// What the host does for `setShortcut`: validate, persist, rebind.
fn set_shortcut(store: &ConfigStore, hotkeys: &mut HotkeyManager<Registrar>, raw: &str) -> bool {
    let Ok(combo) = raw.parse::<KeyCombo>() else {
        return false;
    };
    apply(store, hotkeys, |c| c.set_toggle_shortcut(combo))
}

/// What the host does for `setCopyShortcut`; an empty string clears.
fn set_copy_shortcut(
    store: &ConfigStore,
    hotkeys: &mut HotkeyManager<Registrar>,
    raw: &str,
) -> bool {
    let combo = match raw {
        "" => None,
        raw => match raw.parse::<KeyCombo>() {
            Ok(combo) => Some(combo),
            Err(_) => return false,
        },
    };
    apply(store, hotkeys, |c| c.set_copy_shortcut(combo))
}

fn apply<F>(store: &ConfigStore, hotkeys: &mut HotkeyManager<Registrar>, change: F) -> bool
where
    F: FnOnce(&mut Config) -> bool,
{
    match store.try_update(change).unwrap() {
        Some(config) => {
            hotkeys.bind(&config);
            true
        }
        None => false,
    }
}

#[test]
fn shortcut_validation_and_rebinding() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    let mut hotkeys = HotkeyManager::new(Registrar::default());
    hotkeys.bind(&store.load_or_create());

    assert!(!set_shortcut(&store, &mut hotkeys, "J"));
    assert_eq!(store.load().toggle_shortcut.as_str(), "CommandOrControl+M");

    assert!(set_shortcut(&store, &mut hotkeys, "Control+J"));
    assert_eq!(store.load().toggle_shortcut.as_str(), "Control+J");
    assert_eq!(
        hotkeys.registrar().active.get("Control+J"),
        Some(&HotkeyAction::ToggleWindow)
    );
    assert!(!hotkeys.registrar().active.contains_key("CommandOrControl+M"));
}

#[test]
fn refused_shortcut_keeps_toggle_reachable() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    let mut hotkeys = HotkeyManager::new(Registrar::refusing(&["Alt+Shift+9"]));

    assert!(set_shortcut(&store, &mut hotkeys, "Alt+Shift+9"));
    // The user's choice is still what is stored; only the live binding differs.
    assert_eq!(store.load().toggle_shortcut.as_str(), "Alt+Shift+9");
    assert_eq!(
        hotkeys.registrar().active.get("CommandOrControl+M"),
        Some(&HotkeyAction::ToggleWindow)
    );
}

#[test]
fn resaving_a_released_shortcut_replaces_the_fallback() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    let registrar = Registrar::refusing(&["Alt+Shift+9"]);
    let refused = Rc::clone(&registrar.refused);
    let mut hotkeys = HotkeyManager::new(registrar);

    assert!(set_shortcut(&store, &mut hotkeys, "Alt+Shift+9"));
    assert!(hotkeys.bindings()[0].fallback);

    // The other application lets go of the combo; saving it again takes it.
    refused.borrow_mut().clear();
    assert!(set_shortcut(&store, &mut hotkeys, "Alt+Shift+9"));

    let toggle = hotkeys.binding_for(HotkeyAction::ToggleWindow).unwrap();
    assert!(!toggle.fallback);
    assert_eq!(toggle.combo.as_str(), "Alt+Shift+9");
    assert!(!hotkeys.registrar().active.contains_key("CommandOrControl+M"));
}

#[test]
fn copy_shortcut_collisions_and_clearing() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    let mut hotkeys = HotkeyManager::new(Registrar::default());
    hotkeys.bind(&store.load_or_create());

    assert!(set_copy_shortcut(&store, &mut hotkeys, "Alt+K"));
    assert_eq!(hotkeys.registrar().active.get("Alt+K"), Some(&HotkeyAction::CopyText));

    // Same chords as the other action, spelled differently
    let before = std::fs::read_to_string(store.path()).unwrap();
    assert!(!set_shortcut(&store, &mut hotkeys, "Alt+k"));
    assert!(!set_copy_shortcut(&store, &mut hotkeys, "CommandOrControl+m"));
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    assert_eq!(hotkeys.bindings().len(), 2);

    assert!(set_copy_shortcut(&store, &mut hotkeys, ""));
    assert_eq!(store.load().copy_shortcut, None);
    assert!(hotkeys.binding_for(HotkeyAction::CopyText).is_none());
    assert!(!hotkeys.registrar().active.contains_key("Alt+K"));
}

#[test]
fn session_with_unsaved_draft() {
    let dir = tempdir().unwrap();
    let clipboard = SharedClipboard::default();
    let history = HistoryStore::in_dir(dir.path());
    let always_on_top = Config::default().always_on_top;
    let mut editor =
        VisibilityController::new(Windows, clipboard.clone(), history.clone(), always_on_top);

    assert_eq!(editor.toggle().visibility, Visibility::Visible);
    editor.sync_text("draft".to_string());

    let hidden = editor.toggle();
    assert_eq!(hidden.visibility, Visibility::Hidden);
    assert!(hidden.copied);
    assert_eq!(clipboard.0.borrow().as_deref(), Some("draft"));
    assert!(history.load().is_empty());

    editor.toggle();
    editor.terminate();

    let saved = history.load();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].text, "draft");
}

#[test]
fn history_stays_capped_and_ordered() {
    let dir = tempdir().unwrap();
    let history = HistoryStore::in_dir(dir.path());

    for i in 0..(HISTORY_LIMIT * 2) {
        let entries = history.append(&format!("entry {i}")).unwrap();
        assert!(entries.len() <= HISTORY_LIMIT);
        assert_eq!(entries[0].text, format!("entry {i}"));
    }

    let entries = history.load();
    assert_eq!(entries.len(), HISTORY_LIMIT);
    assert_eq!(entries.last().unwrap().text, format!("entry {HISTORY_LIMIT}"));

    let unchanged = history.remove("no-such-id").unwrap();
    assert_eq!(unchanged, entries);
    assert_eq!(history.append("   ").unwrap(), entries);
}
