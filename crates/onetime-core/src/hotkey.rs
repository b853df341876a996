// Hotkey module - binding configured key combinations to actions

use std::fmt;

use log::{info, warn};

use crate::config::{Config, KeyCombo};

/// What a global key combination triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    ToggleWindow,
    CopyText,
}

impl HotkeyAction {
    /// Hardcoded binding used when the configured one cannot be registered.
    pub fn fallback(self) -> KeyCombo {
        match self {
            HotkeyAction::ToggleWindow => KeyCombo::default_toggle(),
            HotkeyAction::CopyText => KeyCombo::fallback_copy(),
        }
    }
}

/// Process-wide global shortcut facility.
///
/// Implemented by the desktop host on top of the OS hook; tests use a fake.
pub trait ShortcutRegistrar {
    type Error: fmt::Display;

    fn register(&mut self, combo: &KeyCombo, action: HotkeyAction) -> Result<(), Self::Error>;
    fn unregister_all(&mut self) -> Result<(), Self::Error>;
}

/// An active binding. `fallback` is set when the configured combination was
/// refused and the action's hardcoded default is bound instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub action: HotkeyAction,
    pub combo: KeyCombo,
    pub fallback: bool,
}

/// Owns every global shortcut the process has registered.
pub struct HotkeyManager<R> {
    registrar: R,
    bindings: Vec<Binding>,
}

impl<R: ShortcutRegistrar> HotkeyManager<R> {
    pub fn new(registrar: R) -> Self {
        Self {
            registrar,
            bindings: Vec::new(),
        }
    }

    /// Replace all bindings with the ones `config` asks for.
    ///
    /// Registration failures never surface: the action is bound to its
    /// fallback instead, or left unbound if that fails too.
    pub fn bind(&mut self, config: &Config) -> &[Binding] {
        self.unbind_all();

        let wanted = [
            (HotkeyAction::ToggleWindow, Some(config.toggle_shortcut.clone())),
            (HotkeyAction::CopyText, config.copy_shortcut.clone()),
        ];
        for (action, combo) in wanted {
            let Some(combo) = combo else { continue };
            if let Some(binding) = self.register_with_fallback(action, combo) {
                self.bindings.push(binding);
            }
        }

        &self.bindings
    }

    /// Release everything. Called on config change and at process exit.
    pub fn unbind_all(&mut self) {
        if let Err(e) = self.registrar.unregister_all() {
            warn!("⚠️  Failed to unregister global shortcuts: {}", e);
        }
        self.bindings.clear();
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn binding_for(&self, action: HotkeyAction) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.action == action)
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    fn register_with_fallback(&mut self, action: HotkeyAction, combo: KeyCombo) -> Option<Binding> {
        let error = match self.registrar.register(&combo, action) {
            Ok(()) => {
                info!("✅ Global shortcut registered: {} -> {:?}", combo, action);
                return Some(Binding {
                    action,
                    combo,
                    fallback: false,
                });
            }
            Err(e) => e,
        };

        let fallback = action.fallback();
        warn!(
            "⚠️  Could not register {} for {:?} ({}), falling back to {}",
            combo, action, error, fallback
        );
        if fallback.same_chord(&combo) || self.is_bound(&fallback) {
            return None;
        }

        match self.registrar.register(&fallback, action) {
            Ok(()) => Some(Binding {
                action,
                combo: fallback,
                fallback: true,
            }),
            Err(e) => {
                warn!("⚠️  Fallback {} for {:?} failed too: {}", fallback, action, e);
                None
            }
        }
    }

    fn is_bound(&self, combo: &KeyCombo) -> bool {
        self.bindings.iter().any(|b| b.combo.same_chord(combo))
    }
}
