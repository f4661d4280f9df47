//! Event DSL parser for headless mode.
//!
//! Parses event strings like "key:enter", "type:SELECT 1", "wait:100ms" into
//! executable events.

use super::HeadlessState;
use crate::error::{PlaygroundError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::time::Duration;

/// An assertion to check against the screen or state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text (case-insensitive).
    NotContains(String),
    /// Screen matches regex pattern.
    Matches(String),
    /// State field compared against a value with `=`, `>=`, `<=`, `>` or `<`.
    State {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    /// Checks the assertion against the screen and a state snapshot.
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::State { field, op, value } => {
                compare_values(state.field(field).as_deref(), op, value)
            }
        }
    }
}

/// Compares values using the given operator; numbers compare numerically.
fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    if let (Ok(a), Ok(e)) = (actual.parse::<i64>(), expected.parse::<i64>()) {
        return match op {
            ">=" => a >= e,
            "<=" => a <= e,
            ">" => a > e,
            "<" => a < e,
            "=" => a == e,
            _ => false,
        };
    }

    op == "=" && actual == expected
}

/// A parsed event that can be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Type text, one key press per character.
    Type(String),
    /// Wait for a duration.
    Wait(Duration),
    /// Resize the terminal.
    Resize(u16, u16),
    /// Assert something about the screen or state.
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let mut parts = Vec::new();
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    parts.push("ctrl".to_string());
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    parts.push("alt".to_string());
                }
                parts.push(key_code_name(key.code));
                write!(f, "key:{}", parts.join("+"))
            }
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Assert(a) => match a {
                Assertion::Contains(t) => write!(f, "assert:contains:{t}"),
                Assertion::ContainsExact(t) => write!(f, "assert:contains-exact:{t}"),
                Assertion::NotContains(t) => write!(f, "assert:not-contains:{t}"),
                Assertion::Matches(p) => write!(f, "assert:matches:{p}"),
                Assertion::State { field, op, value } => {
                    write!(f, "assert:state:{field}{op}{value}")
                }
            },
        }
    }
}

/// Named keys accepted by `key:`.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("backspace", KeyCode::Backspace),
    ("bs", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("del", KeyCode::Delete),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pgup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("pgdn", KeyCode::PageDown),
    ("space", KeyCode::Char(' ')),
];

fn key_code_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("f{n}"),
        other => NAMED_KEYS
            .iter()
            .find(|(_, named)| *named == other)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses all events from an input string.
    ///
    /// Events are separated by newlines or commas; `#` starts a comment line.
    /// A `type:` event always runs to the end of its line so SQL can contain
    /// commas.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut rest = line;
            while !rest.is_empty() {
                if rest.to_lowercase().starts_with("type:") {
                    events.push(self.parse_one(rest)?);
                    break;
                }
                let (part, tail) = rest.split_once(',').unwrap_or((rest, ""));
                if !part.trim().is_empty() {
                    events.push(self.parse_one(part)?);
                }
                rest = tail.trim_start();
            }
        }

        Ok(events)
    }

    /// Parses a single event string.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();

        let Some((event_type, value)) = input.split_once(':') else {
            return Err(PlaygroundError::config(format!(
                "Invalid event syntax: '{input}'. Expected format: type:value"
            )));
        };

        match event_type.trim().to_lowercase().as_str() {
            "key" => Self::parse_key(value.trim()),
            // Leading spaces are part of the typed text.
            "type" => Ok(Event::Type(value.to_string())),
            "wait" => Self::parse_wait(value.trim()),
            "resize" => Self::parse_resize(value.trim()),
            "assert" => Self::parse_assert(value.trim()),
            other => Err(PlaygroundError::config(format!(
                "Unknown event type: '{other}'. Valid types: key, type, wait, resize, assert"
            ))),
        }
    }

    /// Parses a key event like "enter", "ctrl+s", "shift+tab", "f3".
    fn parse_key(value: &str) -> Result<Event> {
        let mut parts: Vec<&str> = value.split('+').collect();
        let key_str = parts.pop().unwrap_or_default();
        let mut modifiers = KeyModifiers::empty();

        for part in parts {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    return Err(PlaygroundError::config(format!(
                        "Unknown modifier: '{part}'. Valid modifiers: ctrl, alt, shift"
                    )));
                }
            }
        }

        let mut code = Self::parse_key_code(key_str)?;
        // Terminals report shift+tab as a distinct key.
        if code == KeyCode::Tab && modifiers.contains(KeyModifiers::SHIFT) {
            code = KeyCode::BackTab;
            modifiers.remove(KeyModifiers::SHIFT);
        }

        Ok(Event::Key(KeyEvent::new(code, modifiers)))
    }

    fn parse_key_code(s: &str) -> Result<KeyCode> {
        let lower = s.to_lowercase();

        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(KeyCode::F(n));
            }
        }

        if let Some((_, code)) = NAMED_KEYS.iter().find(|(name, _)| *name == lower) {
            return Ok(*code);
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(KeyCode::Char(c)),
            _ => Err(PlaygroundError::config(format!(
                "Unknown key: '{s}'. Use single characters or named keys like enter, esc, tab"
            ))),
        }
    }

    /// Parses a wait duration like "100ms", "2s", or just "100" (milliseconds).
    fn parse_wait(value: &str) -> Result<Event> {
        let value = value.to_lowercase();
        let invalid = || PlaygroundError::config(format!("Invalid duration: '{value}'"));

        let duration = if let Some(ms) = value.strip_suffix("ms") {
            Duration::from_millis(ms.trim().parse().map_err(|_| invalid())?)
        } else if let Some(secs) = value.strip_suffix('s') {
            Duration::from_secs(secs.trim().parse().map_err(|_| invalid())?)
        } else {
            Duration::from_millis(value.parse().map_err(|_| invalid())?)
        };

        Ok(Event::Wait(duration))
    }

    /// Parses a resize event like "120x40".
    fn parse_resize(value: &str) -> Result<Event> {
        let (width, height) = parse_size(value)?;
        Ok(Event::Resize(width, height))
    }

    /// Parses an assertion like "contains:hello" or "state:page=2".
    fn parse_assert(value: &str) -> Result<Event> {
        let Some((assert_type, rest)) = value.split_once(':') else {
            return Err(PlaygroundError::config(format!(
                "Invalid assertion syntax: '{value}'. Expected assert:type:value"
            )));
        };

        let rest = rest.trim().to_string();
        let assertion = match assert_type.trim().to_lowercase().as_str() {
            "contains" => Assertion::Contains(rest),
            "contains-exact" => Assertion::ContainsExact(rest),
            "not-contains" => Assertion::NotContains(rest),
            "matches" => Assertion::Matches(rest),
            "state" => Self::parse_state_assertion(&rest)?,
            other => {
                return Err(PlaygroundError::config(format!(
                    "Unknown assertion type: '{other}'. Valid types: contains, contains-exact, not-contains, matches, state"
                )));
            }
        };

        Ok(Event::Assert(assertion))
    }

    /// Parses a state assertion like "tab=Saved" or "history_count>=2".
    fn parse_state_assertion(value: &str) -> Result<Assertion> {
        for op in [">=", "<=", ">", "<", "="] {
            if let Some((field, expected)) = value.split_once(op) {
                return Ok(Assertion::State {
                    field: field.trim().to_string(),
                    op: op.to_string(),
                    value: expected.trim().to_string(),
                });
            }
        }

        Err(PlaygroundError::config(format!(
            "Invalid state assertion: '{value}'. Expected field=value or field>=value"
        )))
    }
}

/// Parses a `WIDTHxHEIGHT` screen size.
pub fn parse_size(value: &str) -> Result<(u16, u16)> {
    let Some((width, height)) = value.split_once('x') else {
        return Err(PlaygroundError::config(format!(
            "Invalid size format: '{value}'. Expected WIDTHxHEIGHT (e.g., 80x24)"
        )));
    };
    let width = width
        .trim()
        .parse::<u16>()
        .map_err(|_| PlaygroundError::config(format!("Invalid width: '{width}'")))?;
    let height = height
        .trim()
        .parse::<u16>()
        .map_err(|_| PlaygroundError::config(format!("Invalid height: '{height}'")))?;
    Ok((width, height))
}
