//! Keyboard shortcut resolution.
//!
//! # Responsibility
//! - Map key chords to editor commands.
//!
//! # Invariants
//! - Copy, cut, duplicate and delete resolve only when something is
//!   selected; with nothing selected the key falls through to the host.
//! - `ctrl` covers both Ctrl and Cmd; hosts fold the platform modifier in.

use crate::selection::controller::NavDirection;

/// Physical key of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
    Escape,
}

/// Key plus modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: true,
        }
    }

    pub fn ctrl_shift(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: true,
        }
    }
}

/// Editor action a chord resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Copy,
    Cut,
    Paste,
    Duplicate,
    Undo,
    Redo,
    SelectAll,
    ClearSelection,
    DeleteSelected,
    Navigate { direction: NavDirection, extend: bool },
}

/// Resolves `chord` to a command, or `None` when the editor should not
/// handle it.
pub fn resolve(chord: KeyChord, has_selection: bool) -> Option<EditorCommand> {
    if chord.ctrl {
        let Key::Char(ch) = chord.key else {
            return None;
        };
        return match (ch.to_ascii_lowercase(), chord.shift) {
            ('c', _) if has_selection => Some(EditorCommand::Copy),
            ('x', _) if has_selection => Some(EditorCommand::Cut),
            ('d', _) if has_selection => Some(EditorCommand::Duplicate),
            ('v', _) => Some(EditorCommand::Paste),
            ('z', false) => Some(EditorCommand::Undo),
            ('z', true) | ('y', _) => Some(EditorCommand::Redo),
            ('a', _) => Some(EditorCommand::SelectAll),
            _ => None,
        };
    }

    match chord.key {
        Key::Escape => Some(EditorCommand::ClearSelection),
        Key::Delete | Key::Backspace if has_selection => Some(EditorCommand::DeleteSelected),
        Key::ArrowUp => Some(EditorCommand::Navigate {
            direction: NavDirection::Up,
            extend: chord.shift,
        }),
        Key::ArrowDown => Some(EditorCommand::Navigate {
            direction: NavDirection::Down,
            extend: chord.shift,
        }),
        _ => None,
    }
}
