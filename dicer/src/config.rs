use serde::{Deserialize, Serialize};

use crate::{
    error::{DicerError, Result},
    rules::dice::{DieSpec, DisplayMode, RngMode},
    simulation::{
        history::{MULTIPLAYER_HISTORY_CAPACITY, SIMPLE_HISTORY_CAPACITY},
        players::MAX_PLAYERS,
    },
};

/// The two shipped flavours of the roller differ only in how much history
/// they keep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HistoryVariant {
    Simple,
    #[default]
    Multiplayer,
}

impl HistoryVariant {
    pub fn capacity(&self) -> usize {
        match self {
            HistoryVariant::Simple => SIMPLE_HISTORY_CAPACITY,
            HistoryVariant::Multiplayer => MULTIPLAYER_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub dice_count: u32,
    pub dice_faces: u32,
    pub rng_mode: RngMode,
    pub display_mode: DisplayMode,
    pub multiplayer: bool,
    pub player_count: u32,
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let spec = DieSpec::default();
        Self {
            dice_count: spec.count,
            dice_faces: spec.faces,
            rng_mode: RngMode::default(),
            display_mode: DisplayMode::default(),
            multiplayer: false,
            player_count: 2,
            history_capacity: HistoryVariant::default().capacity(),
        }
    }
}

impl SessionConfig {
    pub fn for_variant(variant: HistoryVariant) -> Self {
        Self {
            history_capacity: variant.capacity(),
            ..Self::default()
        }
    }

    pub fn die_spec(&self) -> DieSpec {
        DieSpec {
            count: self.dice_count,
            faces: self.dice_faces,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.die_spec().validate()?;
        if self.player_count < 1 {
            return Err(DicerError::invalid(
                "player count",
                self.player_count,
                "at least one player is required",
            ));
        }
        if self.player_count > MAX_PLAYERS {
            return Err(DicerError::invalid(
                "player count",
                self.player_count,
                "too many players",
            ));
        }
        if self.history_capacity < 1 {
            return Err(DicerError::invalid(
                "history capacity",
                self.history_capacity as u64,
                "the history must hold at least one roll",
            ));
        }
        Ok(())
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
