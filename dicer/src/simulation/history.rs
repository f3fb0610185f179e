use std::collections::VecDeque;

use derive_more::IntoIterator;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::{
    error::{DicerError, Result},
    rules::dice::RollResult,
};

pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Capacity used by the single-player variant.
pub const SIMPLE_HISTORY_CAPACITY: usize = 5;
/// Capacity used by the multiplayer variant.
pub const MULTIPLAYER_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub values: Vec<u32>,
    pub sum: u32,
    pub player: Option<String>,
    pub timestamp: Timestamp,
}

impl HistoryEntry {
    pub fn new(result: &RollResult, player: Option<&str>) -> Self {
        Self {
            values: result.values.clone(),
            sum: result.sum,
            player: player.map(str::to_string),
            timestamp: chrono::Utc::now(),
        }
    }

    /// `player_cells` is the display width reserved for the player column;
    /// zero leaves it out.
    pub fn pretty_print(&self, f: &mut impl std::fmt::Write, player_cells: usize) -> std::fmt::Result {
        let local = self.timestamp.with_timezone(&chrono::Local);
        write!(f, "{}  ", local.format("%Y-%m-%d %H:%M:%S"))?;
        if player_cells > 0 {
            let label = match &self.player {
                Some(player) => format!("{player}:"),
                None => String::new(),
            };
            write!(f, "{} ", pad_cells(&label, player_cells))?;
        }
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "] = {}", self.sum)
    }
}

/// Most-recent-first log of rolls that forgets its oldest entry once it is
/// over capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoIterator)]
pub struct History {
    #[into_iterator(owned, ref)]
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: MULTIPLAYER_HISTORY_CAPACITY,
        }
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking the capacity drops the oldest entries straight away.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        validate_capacity(capacity)?;
        self.capacity = capacity;
        self.entries.truncate(capacity);
        Ok(())
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Widest `"<player>:"` label in the log, for column alignment.
    pub fn player_cells(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.player.as_deref())
            .map(|p| p.width() + 1)
            .max()
            .unwrap_or(0)
    }
}

fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity < 1 {
        return Err(DicerError::invalid(
            "history capacity",
            capacity as u64,
            "the history must hold at least one roll",
        ));
    }
    Ok(())
}

fn pad_cells(s: &str, field_cells: usize) -> String {
    let w = s.width();
    let pad = field_cells.saturating_sub(w);
    format!("{s}{}", " ".repeat(pad))
}
