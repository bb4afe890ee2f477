//! Linear dialogue scripts and the live cursor over them.
//!
//! This module provides:
//! - [`DialogueScript`]: an identified, non-empty, immutable list of lines
//! - [`DialogueSession`]: the bounded cursor used during one interaction
//! - [`NavigationState`]: the button state a dialogue UI presents

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use townsfolk_common::{ConfigError, ScriptId};

/// Serialized form of a script, validated on conversion.
#[derive(Debug, Clone, Deserialize)]
struct RawDialogueScript {
    id: ScriptId,
    #[serde(default)]
    speaker: Option<String>,
    lines: Vec<String>,
}

impl TryFrom<RawDialogueScript> for DialogueScript {
    type Error = ConfigError;

    fn try_from(raw: RawDialogueScript) -> Result<Self, Self::Error> {
        let mut script = DialogueScript::new(raw.id, raw.lines)?;
        script.speaker = raw.speaker;
        Ok(script)
    }
}

/// An ordered, non-empty sequence of dialogue lines.
///
/// Immutable once constructed; an empty line list cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDialogueScript")]
pub struct DialogueScript {
    id: ScriptId,
    speaker: Option<String>,
    lines: Vec<String>,
}

impl DialogueScript {
    /// Creates a script, rejecting an empty line list.
    pub fn new<I, S>(id: ScriptId, lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Err(ConfigError::EmptyScript(id));
        }
        Ok(Self {
            id,
            speaker: None,
            lines,
        })
    }

    /// Sets the speaker name.
    #[must_use]
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Script identifier.
    #[must_use]
    pub fn id(&self) -> &ScriptId {
        &self.id
    }

    /// Speaker name, if any.
    #[must_use]
    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Which navigation controls a dialogue UI should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigationState {
    /// A previous line exists
    pub has_previous: bool,
    /// A next line exists
    pub has_next: bool,
    /// The cursor is on the last line
    pub is_last: bool,
}

/// Live cursor over one [`DialogueScript`] for the length of an interaction.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    script: Arc<DialogueScript>,
    cursor: usize,
}

impl DialogueSession {
    /// Starts a session at the first line.
    #[must_use]
    pub fn new(script: Arc<DialogueScript>) -> Self {
        Self {
            script,
            cursor: 0,
        }
    }

    /// Current line index.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Line at the cursor.
    #[must_use]
    pub fn current_line(&self) -> &str {
        // The cursor is kept in [0, len-1] and scripts are never empty.
        self.script
            .lines
            .get(self.cursor)
            .map_or("", String::as_str)
    }

    /// True on the first line.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    /// True on the last line.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.cursor + 1 == self.script.len()
    }

    /// Moves to the next line. Returns false (and does nothing) on the last line.
    pub fn next_line(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Moves to the previous line. Returns false (and does nothing) on the first line.
    pub fn previous_line(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Ends the session, returning the line it ended on. Valid from any line.
    pub fn finish(self) -> usize {
        self.cursor
    }

    /// Navigation controls for the current line.
    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        NavigationState {
            has_previous: !self.is_first(),
            has_next: !self.is_last(),
            is_last: self.is_last(),
        }
    }
}
