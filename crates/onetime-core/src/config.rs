//! User configuration: hotkey bindings, window and indent preferences.
//!
//! The record is stored as a single JSON object. Loading never fails: each
//! field is recovered on its own and anything missing or invalid falls back
//! to its default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ComboError, StoreError};
use crate::json_file;

/// Toggle binding used when none is configured or the configured one is invalid.
pub const DEFAULT_TOGGLE_SHORTCUT: &str = "CommandOrControl+M";

/// Copy binding registered when the configured copy combination cannot be.
pub const FALLBACK_COPY_SHORTCUT: &str = "Alt+Shift+C";

/// A modifier accepted in a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Cmd on macOS, Ctrl everywhere else.
    CommandOrControl,
    Control,
    Command,
    Alt,
    Shift,
    Meta,
    Super,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::CommandOrControl => "CommandOrControl",
            Modifier::Control => "Control",
            Modifier::Command => "Command",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Meta => "Meta",
            Modifier::Super => "Super",
        }
    }

    /// Name understood by the global shortcut plugin, which has no `Meta`
    /// and calls that key `Super`.
    pub fn accelerator_name(self) -> &'static str {
        match self {
            Modifier::Meta => "Super",
            other => other.as_str(),
        }
    }

    /// The physical key this modifier stands for on the current platform.
    fn mask(self) -> u8 {
        match self {
            Modifier::Control => CONTROL,
            Modifier::CommandOrControl if cfg!(target_os = "macos") => SUPER,
            Modifier::CommandOrControl => CONTROL,
            Modifier::Alt => ALT,
            Modifier::Shift => SHIFT,
            Modifier::Command | Modifier::Meta | Modifier::Super => SUPER,
        }
    }
}

const CONTROL: u8 = 1;
const ALT: u8 = 1 << 1;
const SHIFT: u8 = 1 << 2;
const SUPER: u8 = 1 << 3;

impl FromStr for Modifier {
    type Err = ComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CommandOrControl" => Ok(Modifier::CommandOrControl),
            "Control" => Ok(Modifier::Control),
            "Command" => Ok(Modifier::Command),
            "Alt" => Ok(Modifier::Alt),
            "Shift" => Ok(Modifier::Shift),
            "Meta" => Ok(Modifier::Meta),
            "Super" => Ok(Modifier::Super),
            other => Err(ComboError::UnknownModifier(other.to_string())),
        }
    }
}

/// A validated global shortcut of the form `MOD(+MOD)*+KEY`.
///
/// The original string is kept verbatim as the storage format. Equality
/// compares that string; use [`KeyCombo::same_chord`] to ask whether two
/// combos press the same keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCombo {
    raw: String,
    modifiers: Vec<Modifier>,
    key: char,
}

impl KeyCombo {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn key(&self) -> char {
        self.key
    }

    /// The combination spelled the way the global shortcut plugin parses it.
    pub fn accelerator(&self) -> String {
        let key = self.key.to_string();
        let mut parts: Vec<&str> = self
            .modifiers
            .iter()
            .map(|m| m.accelerator_name())
            .collect();
        parts.push(&key);
        parts.join("+")
    }

    /// Whether both combos are the same chord on this platform, regardless of
    /// modifier order, aliases or key case.
    pub fn same_chord(&self, other: &KeyCombo) -> bool {
        self.chord() == other.chord()
    }

    fn chord(&self) -> (u8, char) {
        let mask = self.modifiers.iter().fold(0, |acc, m| acc | m.mask());
        (mask, self.key.to_ascii_uppercase())
    }

    /// The built-in toggle binding.
    pub fn default_toggle() -> Self {
        Self {
            raw: DEFAULT_TOGGLE_SHORTCUT.to_string(),
            modifiers: vec![Modifier::CommandOrControl],
            key: 'M',
        }
    }

    /// The built-in copy binding used as a fallback.
    pub fn fallback_copy() -> Self {
        Self {
            raw: FALLBACK_COPY_SHORTCUT.to_string(),
            modifiers: vec![Modifier::Alt, Modifier::Shift],
            key: 'C',
        }
    }
}

impl FromStr for KeyCombo {
    type Err = ComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ComboError::Empty);
        }

        let mut parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.pop().unwrap_or_default();
        if parts.is_empty() {
            return Err(ComboError::MissingModifier);
        }

        let modifiers = parts
            .into_iter()
            .map(Modifier::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        let mut chars = key_part.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => c,
            _ => return Err(ComboError::InvalidKey(key_part.to_string())),
        };

        Ok(Self {
            raw: s.to_string(),
            modifiers,
            key,
        })
    }
}

impl TryFrom<String> for KeyCombo {
    type Error = ComboError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyCombo> for String {
    fn from(combo: KeyCombo) -> Self {
        combo.raw
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentType {
    #[default]
    Space,
    Tab,
}

impl IndentType {
    /// Unknown names become `Space`.
    pub fn coerce(name: &str) -> Self {
        match name {
            "tab" => IndentType::Tab,
            _ => IndentType::Space,
        }
    }
}

/// Indent width, one of 2, 4, 6 or 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IndentSize(u8);

impl IndentSize {
    pub const ALLOWED: [u8; 4] = [2, 4, 6, 8];

    pub fn new(size: u8) -> Option<Self> {
        Self::ALLOWED.contains(&size).then_some(Self(size))
    }

    /// Out-of-range widths become 2.
    pub fn coerce(size: u64) -> Self {
        u8::try_from(size)
            .ok()
            .and_then(Self::new)
            .unwrap_or_default()
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for IndentSize {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for IndentSize {
    type Error = String;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        Self::new(size).ok_or_else(|| format!("indent size must be one of 2, 4, 6, 8, got {size}"))
    }
}

impl From<IndentSize> for u8 {
    fn from(size: IndentSize) -> Self {
        size.0
    }
}

/// The singleton configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub toggle_shortcut: KeyCombo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_shortcut: Option<KeyCombo>,
    pub always_on_top: bool,
    pub indent_type: IndentType,
    pub indent_size: IndentSize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toggle_shortcut: KeyCombo::default_toggle(),
            copy_shortcut: None,
            always_on_top: true,
            indent_type: IndentType::default(),
            indent_size: IndentSize::default(),
        }
    }
}

impl Config {
    /// Recover a config from an arbitrary JSON document, field by field.
    ///
    /// Older files kept the toggle binding under `shortcut`; it is honoured
    /// when `toggleShortcut` is absent or invalid.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Config::default();
        let combo = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<KeyCombo>().ok())
        };

        Self {
            toggle_shortcut: combo("toggleShortcut")
                .or_else(|| combo("shortcut"))
                .unwrap_or(defaults.toggle_shortcut),
            copy_shortcut: combo("copyShortcut"),
            always_on_top: value
                .get("alwaysOnTop")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.always_on_top),
            indent_type: value
                .get("indentType")
                .and_then(Value::as_str)
                .map(IndentType::coerce)
                .unwrap_or(defaults.indent_type),
            indent_size: value
                .get("indentSize")
                .and_then(Value::as_u64)
                .map(IndentSize::coerce)
                .unwrap_or(defaults.indent_size),
        }
    }

    /// Bind `combo` to the toggle action. Refused when the copy action already
    /// uses the same chord.
    pub fn set_toggle_shortcut(&mut self, combo: KeyCombo) -> bool {
        if let Some(copy) = &self.copy_shortcut {
            if copy.same_chord(&combo) {
                return false;
            }
        }
        self.toggle_shortcut = combo;
        true
    }

    /// Bind `combo` to the copy action, or clear it with `None`. Refused when
    /// the toggle action already uses the same chord.
    pub fn set_copy_shortcut(&mut self, combo: Option<KeyCombo>) -> bool {
        if let Some(combo) = &combo {
            if combo.same_chord(&self.toggle_shortcut) {
                return false;
            }
        }
        self.copy_shortcut = combo;
        true
    }

    /// Whether the two configs differ in any hotkey binding.
    pub fn bindings_differ(&self, other: &Config) -> bool {
        self.toggle_shortcut != other.toggle_shortcut || self.copy_shortcut != other.copy_shortcut
    }
}

/// Owns `config.json`. Holds no cached state; every call hits the file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub const FILE_NAME: &'static str = "config.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, substituting defaults for anything unusable.
    pub fn load(&self) -> Config {
        self.try_load().unwrap_or_default()
    }

    /// Load the record, or `None` when the file is missing or not JSON at all.
    pub fn try_load(&self) -> Option<Config> {
        json_file::read(&self.path).map(|value| Config::from_value(&value))
    }

    /// Load, writing the defaults out first if no record exists yet.
    pub fn load_or_create(&self) -> Config {
        if self.path.exists() {
            return self.load();
        }

        let config = Config::default();
        info!("📝 Creating default config at {}", self.path.display());
        if let Err(e) = self.save(&config) {
            warn!("⚠️  Failed to write default config: {}", e);
        }
        config
    }

    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        json_file::write(&self.path, config)?;
        debug!("Config saved to {}", self.path.display());
        Ok(())
    }

    /// Read the current record, apply `change`, and persist the result.
    pub fn update<F>(&self, change: F) -> Result<Config, StoreError>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load();
        change(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    /// Like [`ConfigStore::update`], but `change` may refuse by returning
    /// `false`. A refused change writes nothing and yields `None`.
    pub fn try_update<F>(&self, change: F) -> Result<Option<Config>, StoreError>
    where
        F: FnOnce(&mut Config) -> bool,
    {
        let mut config = self.load();
        if !change(&mut config) {
            return Ok(None);
        }
        self.save(&config)?;
        Ok(Some(config))
    }
}
