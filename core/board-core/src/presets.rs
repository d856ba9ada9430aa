//! Client-side preset prompt state and transient status messages.
//!
//! The preset store itself lives on the server; this is the sibling UI's
//! local view of it: an exact-string-deduped, capped list where the server
//! response is authoritative, plus the little status line that confirms an
//! operation and clears itself shortly after.

use board_protocol::PRESET_LIMIT;
use std::time::{Duration, Instant};

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_millis(1500);

/// Presets longer than this are shortened for display.
const LABEL_LIMIT: usize = 120;

/// Local view of the preset prompt list.
#[derive(Debug, Clone, Default)]
pub struct PresetBook {
    prompts: Vec<String>,
}

impl PresetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list with a server response, deduplicating by exact
    /// string equality (first occurrence wins) and capping at the retained
    /// limit.
    pub fn replace_from_server(&mut self, prompts: Vec<String>) {
        let mut deduped: Vec<String> = Vec::new();
        for prompt in prompts {
            if !deduped.contains(&prompt) {
                deduped.push(prompt);
            }
            if deduped.len() == PRESET_LIMIT {
                break;
            }
        }
        self.prompts = deduped;
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Shortened label for dropdown display.
    pub fn display_label(prompt: &str) -> String {
        let chars: Vec<char> = prompt.chars().collect();
        if chars.len() > LABEL_LIMIT {
            let mut label: String = chars[..LABEL_LIMIT - 3].iter().collect();
            label.push('…');
            label
        } else {
            prompt.to_string()
        }
    }
}

/// Transient operation status ("Sent", "Failed"), auto-clearing after
/// [`STATUS_TTL`]. Collaborator failures surface here and nowhere else.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Option<(String, Instant)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some((message.into(), now));
    }

    /// The message, if it has not expired yet.
    pub fn current(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((message, set_at)) if now.duration_since(*set_at) < STATUS_TTL => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}
