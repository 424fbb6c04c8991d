use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// A control the user can trigger while the animation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum Command {
    Slow,
    Reset,
    Fast,
    Quit,
}

/// A key, optionally combined with the control modifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyBinding {
    code: KeyCode,
    control: bool,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self { code, control: false }
    }

    pub fn with_control(code: KeyCode) -> Self {
        Self { code, control: true }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let control = event.modifiers.contains(KeyModifiers::CONTROL);
        if control != self.control {
            return false;
        }
        match (self.code, event.code) {
            // Terminals report characters differently when shift is pressed
            (KeyCode::Char(expected), KeyCode::Char(actual)) => expected.eq_ignore_ascii_case(&actual),
            (expected, actual) => expected == actual,
        }
    }

    fn parse_code(input: &str) -> Result<KeyCode, KeyBindingError> {
        let mut chars = input.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyCode::Char(c));
        }
        let code = match input.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "esc" | "escape" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "space" => KeyCode::Char(' '),
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            _ => return Err(KeyBindingError::UnknownKey(input.to_string())),
        };
        Ok(code)
    }
}

impl FromStr for KeyBinding {
    type Err = KeyBindingError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(KeyBindingError::Empty);
        }
        if let Some(inner) = input.strip_prefix("<c-").and_then(|rest| rest.strip_suffix('>')) {
            if inner.is_empty() {
                return Err(KeyBindingError::Empty);
            }
            return Ok(Self::with_control(Self::parse_code(inner)?));
        }
        Ok(Self::new(Self::parse_code(input)?))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            other => format!("{other:?}"),
        };
        if self.control { write!(f, "<c-{key}>") } else { write!(f, "{key}") }
    }
}

impl TryFrom<String> for KeyBinding {
    type Error = KeyBindingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyBinding> for String {
    fn from(binding: KeyBinding) -> Self {
        binding.to_string()
    }
}

/// Errors that can occur when parsing key bindings
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum KeyBindingError {
    #[error("empty key binding")]
    Empty,

    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

/// The keys bound to every command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct KeyBindingsConfig {
    #[cfg_attr(feature = "json-schema", schemars(with = "Vec<String>"))]
    pub slow: Vec<KeyBinding>,

    #[cfg_attr(feature = "json-schema", schemars(with = "Vec<String>"))]
    pub reset: Vec<KeyBinding>,

    #[cfg_attr(feature = "json-schema", schemars(with = "Vec<String>"))]
    pub fast: Vec<KeyBinding>,

    #[cfg_attr(feature = "json-schema", schemars(with = "Vec<String>"))]
    pub quit: Vec<KeyBinding>,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            slow: vec![KeyBinding::new(KeyCode::Char('s')), KeyBinding::new(KeyCode::Left)],
            reset: vec![KeyBinding::new(KeyCode::Char('r'))],
            fast: vec![KeyBinding::new(KeyCode::Char('f')), KeyBinding::new(KeyCode::Right)],
            quit: vec![KeyBinding::new(KeyCode::Char('q')), KeyBinding::new(KeyCode::Esc)],
        }
    }
}

impl KeyBindingsConfig {
    pub fn bindings(&self, command: Command) -> &[KeyBinding] {
        match command {
            Command::Slow => &self.slow,
            Command::Reset => &self.reset,
            Command::Fast => &self.fast,
            Command::Quit => &self.quit,
        }
    }

    /// Find the command bound to a key press.
    ///
    /// Key releases and repeats are ignored. `<c-c>` always quits.
    pub fn command_for(&self, event: &KeyEvent) -> Option<Command> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        if KeyBinding::with_control(KeyCode::Char('c')).matches(event) {
            return Some(Command::Quit);
        }
        Command::iter().find(|command| self.bindings(*command).iter().any(|binding| binding.matches(event)))
    }
}
