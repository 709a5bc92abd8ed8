//! Character event log
//!
//! Records policy decisions (grants, deaths, stuns) for display and for
//! post-run analysis of headless scenarios.

use bevy::prelude::*;
use std::fmt::Write as _;
use std::path::Path;

/// A single entry in the character log
#[derive(Debug, Clone)]
pub struct CharacterLogEntry {
    /// Seconds since the log was cleared
    pub timestamp: f32,
    pub event_type: CharacterLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterLogEventType {
    /// Character spawned and assigned a team
    Spawn,
    /// Ability granted
    AbilityGranted,
    /// Attribute changed
    Attribute,
    /// Gameplay tag added or removed
    Tag,
    /// Knockback applied
    Push,
    /// Input locked or unlocked
    InputLock,
    /// Character died
    Death,
    /// Scenario event (start, end, etc.)
    ScenarioEvent,
}

/// The log resource storing all events
#[derive(Resource, Default)]
pub struct CharacterLog {
    /// All log entries in chronological order
    pub entries: Vec<CharacterLogEntry>,
    /// Current time
    pub time: f32,
}

impl CharacterLog {
    pub fn clear(&mut self) {
        self.entries.clear();
        self.time = 0.0;
    }

    pub fn log(&mut self, event_type: CharacterLogEventType, message: String) {
        self.entries.push(CharacterLogEntry {
            timestamp: self.time,
            event_type,
            message,
        });
    }

    pub fn filter_by_type(&self, event_type: CharacterLogEventType) -> Vec<&CharacterLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CharacterLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Render the log as `[  1.25] Death: message` lines
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(
                out,
                "[{:>7.2}] {:?}: {}",
                entry.timestamp, entry.event_type, entry.message
            );
        }
        out
    }

    /// Write the rendered log to `path`
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        std::fs::write(path, self.render())
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

/// Advance the log clock
pub fn advance_log_time(time: Res<Time>, mut log: ResMut<CharacterLog>) {
    log.time += time.delta_secs();
}
