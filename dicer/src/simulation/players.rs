use serde::{Deserialize, Serialize};

use crate::error::{DicerError, Result};

pub const MAX_PLAYERS: u32 = 100;

/// Turn order for multiplayer sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoster {
    players: Vec<String>,
    current_turn: usize,
}

impl Default for PlayerRoster {
    fn default() -> Self {
        Self {
            players: numbered_players(2),
            current_turn: 0,
        }
    }
}

impl PlayerRoster {
    pub fn new(player_count: u32) -> Result<Self> {
        let mut roster = Self {
            players: Vec::new(),
            current_turn: 0,
        };
        roster.set_player_count(player_count)?;
        Ok(roster)
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn current_player(&self) -> Option<&str> {
        self.players.get(self.current_turn).map(String::as_str)
    }

    /// Renames everyone to `Player 1..=n` and hands the turn back to the
    /// first player.
    pub fn set_player_count(&mut self, player_count: u32) -> Result<()> {
        if player_count < 1 {
            return Err(DicerError::invalid(
                "player count",
                player_count,
                "at least one player is required",
            ));
        }
        if player_count > MAX_PLAYERS {
            return Err(DicerError::invalid(
                "player count",
                player_count,
                "too many players",
            ));
        }
        self.players = numbered_players(player_count);
        self.current_turn = 0;
        log::debug!("Roster reset to {} players", player_count);
        Ok(())
    }

    pub fn select_player(&mut self, index: usize) -> Result<()> {
        if index >= self.players.len() {
            return Err(DicerError::OutOfRange {
                index,
                len: self.players.len(),
            });
        }
        self.current_turn = index;
        Ok(())
    }

    /// Passes the turn to the next player, wrapping around.
    pub fn advance(&mut self) -> Result<usize> {
        if self.players.is_empty() {
            return Err(DicerError::EmptyRoster);
        }
        self.current_turn = (self.current_turn + 1) % self.players.len();
        log::debug!("Turn passes to {}", self.players[self.current_turn]);
        Ok(self.current_turn)
    }
}

fn numbered_players(player_count: u32) -> Vec<String> {
    (1..=player_count).map(|i| format!("Player {i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_roster() {
        let roster = PlayerRoster::new(3).unwrap();
        assert_eq!(roster.players(), &["Player 1", "Player 2", "Player 3"]);
        assert_eq!(roster.current_player(), Some("Player 1"));
    }

    #[test]
    fn test_advance_wraps() {
        let mut roster = PlayerRoster::new(3).unwrap();
        let turns: Vec<usize> = (0..5).map(|_| roster.advance().unwrap()).collect();
        assert_eq!(turns, vec![1, 2, 0, 1, 2]);

        let mut solo = PlayerRoster::new(1).unwrap();
        assert_eq!(solo.advance().unwrap(), 0);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut roster = PlayerRoster::new(2).unwrap();
        roster.select_player(1).unwrap();

        let err = roster.select_player(5).unwrap_err();
        assert!(matches!(err, DicerError::OutOfRange { index: 5, len: 2 }));
        assert_eq!(roster.current_turn(), 1);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_resize_resets_turn() {
        let mut roster = PlayerRoster::new(4).unwrap();
        roster.select_player(3).unwrap();
        roster.set_player_count(2).unwrap();
        assert_eq!(roster.current_turn(), 0);
        assert_eq!(roster.players(), &["Player 1", "Player 2"]);
    }

    #[test]
    fn test_invalid_player_count_keeps_roster() {
        let mut roster = PlayerRoster::new(3).unwrap();
        roster.select_player(2).unwrap();
        assert!(roster.set_player_count(0).unwrap_err().is_invalid_configuration());
        assert!(
            roster
                .set_player_count(MAX_PLAYERS + 1)
                .unwrap_err()
                .is_invalid_configuration()
        );
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.current_turn(), 2);
    }

    #[test]
    fn test_empty_roster_cannot_advance() {
        let mut roster = PlayerRoster {
            players: Vec::new(),
            current_turn: 0,
        };
        assert!(roster.is_empty());
        assert!(matches!(roster.advance(), Err(DicerError::EmptyRoster)));
    }
}
