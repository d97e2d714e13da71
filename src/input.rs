use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::{REPEAT_DELAY_TOLERANCE, REPEAT_GAP};

/// Which keys are currently down, keyed by the character they produce
#[derive(Debug, Default, Clone)]
pub struct HeldKeys {
    keys: HashMap<char, bool>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: char) {
        self.keys.insert(key, true);
    }

    pub fn release(&mut self, key: char) {
        self.keys.insert(key, false);
    }

    pub fn is_held(&self, key: char) -> bool {
        self.keys.get(&key).copied().unwrap_or(false)
    }
}

/// A key signal after translation from raw terminal events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Key went down. `repeat` is set for auto-repeat events of a key already held.
    Down { key: char, repeat: bool },
    Up { key: char },
    Quit,
}

/// Translates raw key events into [`KeyInput`]s.
///
/// Terminals without the keyboard enhancement protocol never report releases,
/// and auto-repeat arrives as plain presses. In that mode each key keeps a
/// press history: a press that follows the previous one within [`REPEAT_GAP`]
/// belongs to an auto-repeat stream, a press after a longer gap is a new tap.
/// The first repeat of a hold comes after the terminal's initial repeat delay,
/// which looks like a tap until the delay has been observed once.
/// [`InputManager::expire`] synthesises the release once a key has gone quiet.
pub struct InputManager {
    hold_timeout: Option<Duration>,
    tracks: HashMap<char, KeyTrack>,
    /// Initial auto-repeat delay, learned from the first hold that reaches a repeat stream
    repeat_delay: Option<Duration>,
}

/// Press history of one key on a terminal that only reports presses
#[derive(Debug, Clone, Copy)]
struct KeyTrack {
    last_seen: Instant,
    streaming: bool,
    /// Time since the key's previous press when this track was opened by a new tap
    opened_after: Option<Duration>,
}

impl KeyTrack {
    fn new(now: Instant, opened_after: Option<Duration>) -> Self {
        Self {
            last_seen: now,
            streaming: false,
            opened_after,
        }
    }
}

impl InputManager {
    /// Manager for a terminal that reports key releases
    pub fn new() -> Self {
        Self {
            hold_timeout: None,
            tracks: HashMap::new(),
            repeat_delay: None,
        }
    }

    /// Manager for a terminal that only reports presses. `timeout` bounds the
    /// wait for a held key's first auto-repeat before it counts as released.
    pub fn with_hold_timeout(timeout: Duration) -> Self {
        Self {
            hold_timeout: Some(timeout),
            tracks: HashMap::new(),
            repeat_delay: None,
        }
    }

    /// Translates one key event, timestamped `now`
    pub fn translate(&mut self, key_event: KeyEvent, now: Instant) -> Option<KeyInput> {
        if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Esc)
            || (key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            return match key_event.kind {
                KeyEventKind::Press => Some(KeyInput::Quit),
                _ => None,
            };
        }

        let KeyCode::Char(c) = key_event.code else {
            return None;
        };
        // Shift or caps lock should not break the bindings
        let key = c.to_ascii_lowercase();

        match key_event.kind {
            KeyEventKind::Press => {
                let repeat = self.hold_timeout.is_some() && self.track_press(key, now);
                Some(KeyInput::Down { key, repeat })
            }
            KeyEventKind::Repeat => Some(KeyInput::Down { key, repeat: true }),
            KeyEventKind::Release => {
                self.tracks.remove(&key);
                Some(KeyInput::Up { key })
            }
        }
    }

    /// Records a press and reports whether it is an auto-repeat of a held key
    fn track_press(&mut self, key: char, now: Instant) -> bool {
        let Some(track) = self.tracks.get_mut(&key) else {
            self.tracks.insert(key, KeyTrack::new(now, None));
            return false;
        };
        let gap = now.saturating_duration_since(track.last_seen);

        if gap <= REPEAT_GAP {
            // The tap that opened this track was really the first repeat of a hold
            if !track.streaming
                && let Some(delay) = track.opened_after
            {
                tracing::debug!(?delay, "Learned key repeat delay");
                self.repeat_delay = Some(delay);
            }
            track.streaming = true;
            track.last_seen = now;
            return true;
        }

        let initial_repeat = !track.streaming
            && self
                .repeat_delay
                .is_some_and(|delay| gap.abs_diff(delay) <= REPEAT_DELAY_TOLERANCE);
        if initial_repeat {
            track.streaming = true;
            track.last_seen = now;
            return true;
        }

        *track = KeyTrack::new(now, Some(gap));
        false
    }

    /// How long `track` may stay quiet before its key counts as released
    fn quiet_limit(&self, track: &KeyTrack, timeout: Duration) -> Duration {
        if track.streaming {
            REPEAT_GAP
        } else {
            self.repeat_delay
                .map_or(timeout, |delay| delay + REPEAT_DELAY_TOLERANCE)
        }
    }

    /// Releases for keys that have gone quiet: past [`REPEAT_GAP`] inside an
    /// auto-repeat stream, otherwise past the repeat delay (or the hold timeout
    /// while that delay is unknown). Always empty when the terminal reports
    /// releases itself.
    pub fn expire(&mut self, now: Instant) -> Vec<KeyInput> {
        let Some(timeout) = self.hold_timeout else {
            return Vec::new();
        };

        let mut released: Vec<char> = self
            .tracks
            .iter()
            .filter(|(_, track)| {
                now.saturating_duration_since(track.last_seen) >= self.quiet_limit(track, timeout)
            })
            .map(|(key, _)| *key)
            .collect();
        released.sort_unstable();

        for key in &released {
            self.tracks.remove(key);
        }
        released.into_iter().map(|key| KeyInput::Up { key }).collect()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
