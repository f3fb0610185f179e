use serde::{Deserialize, Serialize};

use crate::{
    config::SessionConfig,
    error::Result,
    rules::dice::{DieSpec, DisplayMode, RngMode, RollResult},
    simulation::{
        history::{History, HistoryEntry},
        players::PlayerRoster,
    },
    sound::{Silent, SoundCue},
    statistics::{
        aggregator::{Aggregator, StatKey, StatType, Summary, Uniformity},
        chart::ChartLayout,
        roller::{DieSource, Roller},
        sampler::Sampler,
    },
};

/// Both summaries recorded under one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyStatistics {
    pub key: StatKey,
    pub dice: Summary,
    pub totals: Summary,
}

/// A serialisable picture of everything a session currently holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub config: SessionConfig,
    pub current_player: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub statistics: Vec<KeyStatistics>,
}

/// Owns all dice-rolling state. The presentation layer drives it through
/// these methods and re-renders from what they return.
///
/// Every setter validates before touching anything, so a rejected change
/// leaves the session exactly as it was.
pub struct Session<S: DieSource = Roller> {
    config: SessionConfig,
    sampler: Sampler<S>,
    aggregator: Aggregator,
    history: History,
    roster: PlayerRoster,
    sound: Box<dyn SoundCue>,
}

impl Session<Roller> {
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_source(config, Roller::new())
    }
}

impl<S: DieSource> Session<S> {
    pub fn with_source(config: SessionConfig, source: S) -> Result<Self> {
        config.validate()?;
        let sampler = Sampler::new(config.die_spec(), config.rng_mode, source)?;
        let history = History::with_capacity(config.history_capacity)?;
        let roster = PlayerRoster::new(config.player_count)?;
        Ok(Self {
            config,
            sampler,
            aggregator: Aggregator::new(),
            history,
            roster,
            sound: Box::new(Silent),
        })
    }

    pub fn with_sound(mut self, sound: impl SoundCue + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Rolls with the current configuration. In multiplayer the roll belongs
    /// to whoever's turn it is, and the turn passes on afterwards.
    pub fn roll(&mut self) -> RollResult {
        self.sound.play_roll();

        let result = self.sampler.roll();
        let player = self.current_player().map(str::to_string);
        self.record(&result, player.as_deref());

        if self.config.multiplayer
            && let Err(e) = self.roster.advance()
        {
            log::warn!("Could not pass the turn on: {}", e);
        }
        result
    }

    /// Applies `spec` and `mode` and rolls once on behalf of `player`
    /// (`None` for the global bucket). Turn order is left alone.
    pub fn roll_with(&mut self, spec: DieSpec, mode: RngMode, player: Option<&str>) -> Result<RollResult> {
        self.configure_dice(spec, mode)?;
        self.sound.play_roll();
        let result = self.sampler.roll();
        self.record(&result, player);
        Ok(result)
    }

    fn record(&mut self, result: &RollResult, player: Option<&str>) {
        let key = StatKey::from(player);
        self.aggregator.record(&result.values, result.sum, &key);
        self.history.append(HistoryEntry::new(result, player));
    }

    pub fn summary(&self, stat_type: StatType, key: &StatKey) -> Summary {
        self.aggregator.summarize(stat_type, key)
    }

    /// `None` when `key` has no data yet.
    pub fn chart(&self, stat_type: StatType, key: &StatKey) -> Option<ChartLayout> {
        ChartLayout::from_summary(&self.summary(stat_type, key), stat_type)
    }

    /// How well the faces rolled under `key` fit the current die.
    pub fn uniformity(&self, key: &StatKey) -> Option<Uniformity> {
        self.aggregator.uniformity(key, self.config.dice_faces)
    }

    pub fn stat_keys(&self) -> Vec<StatKey> {
        self.aggregator.keys()
    }

    /// Keys that `roll` currently records under: every roster player in
    /// multiplayer, otherwise the global bucket.
    pub fn active_stat_keys(&self) -> Vec<StatKey> {
        if self.config.multiplayer {
            self.roster
                .players()
                .iter()
                .map(|name| StatKey::player(name.as_str()))
                .collect()
        } else {
            vec![StatKey::Global]
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    /// Forgets every roll and starts a fresh deck. Confirming with the user
    /// is the caller's job.
    pub fn reset_all(&mut self) {
        self.aggregator.reset();
        self.history.clear();
        self.sampler.reset_deck();
        log::info!("Session reset");
    }

    pub fn set_dice_count(&mut self, count: u32) -> Result<()> {
        let spec = DieSpec {
            count,
            ..self.config.die_spec()
        };
        self.configure_dice(spec, self.config.rng_mode)
    }

    pub fn set_dice_faces(&mut self, faces: u32) -> Result<()> {
        let spec = DieSpec {
            faces,
            ..self.config.die_spec()
        };
        self.configure_dice(spec, self.config.rng_mode)
    }

    pub fn set_rng_mode(&mut self, mode: RngMode) -> Result<()> {
        self.configure_dice(self.config.die_spec(), mode)
    }

    fn configure_dice(&mut self, spec: DieSpec, mode: RngMode) -> Result<()> {
        self.sampler.configure(spec, mode)?;
        self.config.dice_count = spec.count;
        self.config.dice_faces = spec.faces;
        self.config.rng_mode = mode;
        Ok(())
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.config.display_mode = mode;
    }

    /// Turning multiplayer on deals a fresh roster starting with the first
    /// player.
    pub fn set_multiplayer(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.roster.set_player_count(self.config.player_count)?;
        }
        self.config.multiplayer = enabled;
        log::debug!("Multiplayer {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    pub fn set_player_count(&mut self, player_count: u32) -> Result<()> {
        self.roster.set_player_count(player_count)?;
        self.config.player_count = player_count;
        Ok(())
    }

    pub fn set_history_capacity(&mut self, capacity: usize) -> Result<()> {
        self.history.set_capacity(capacity)?;
        self.config.history_capacity = capacity;
        Ok(())
    }

    pub fn select_player(&mut self, index: usize) -> Result<()> {
        self.roster.select_player(index)
    }

    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    /// Whose turn it is, or `None` outside of multiplayer.
    pub fn current_player(&self) -> Option<&str> {
        if self.config.multiplayer {
            self.roster.current_player()
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let statistics = self
            .stat_keys()
            .into_iter()
            .map(|key| KeyStatistics {
                dice: self.summary(StatType::Dice, &key),
                totals: self.summary(StatType::Total, &key),
                key,
            })
            .collect();
        SessionSnapshot {
            config: self.config.clone(),
            current_player: self.current_player().map(str::to_string),
            history: self.history_entries(),
            statistics,
        }
    }
}
