pub mod config;
pub mod error;
pub mod preferences;
pub mod roll_parser;
pub mod rules;
pub mod simulation;
pub mod sound;
pub mod statistics;

pub mod prelude {
    pub use crate::{
        config::{HistoryVariant, SessionConfig},
        error::{DicerError, Result},
        preferences::{Preferences, Theme},
        roll_parser::parse_dice,
        rules::dice::{DieSpec, DisplayMode, MAX_DICE, MAX_FACES, RngMode, RollResult},
        simulation::{
            history::{History, HistoryEntry, Timestamp},
            players::{MAX_PLAYERS, PlayerRoster},
            session::{KeyStatistics, Session, SessionSnapshot},
        },
        sound::{AudioBackend, AudioOutput, AudioSink, Silent, SoundCue},
        statistics::{
            aggregator::{Aggregator, FrequencyTable, StatKey, StatType, Summary, Uniformity},
            chart::ChartLayout,
            roller::{DieSource, Roller},
            sampler::Sampler,
        },
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_demo() -> anyhow::Result<()> {
        let config = SessionConfig {
            dice_count: 2,
            dice_faces: 6,
            rng_mode: RngMode::Balanced,
            ..SessionConfig::for_variant(HistoryVariant::Multiplayer)
        };
        let mut session = Session::with_source(config, Roller::from_seed(42))?;
        session.set_player_count(3)?;
        session.set_multiplayer(true)?;

        let rolls = 90;
        for _ in 0..rolls {
            let result = session.roll();
            assert_eq!(result.values.len(), 2);
            assert_eq!(result.sum, result.values.iter().sum::<u32>());
        }

        for player in session.roster().players().to_vec() {
            let key = StatKey::player(player);
            let dice = session.summary(StatType::Dice, &key);
            let totals = session.summary(StatType::Total, &key);
            assert_eq!(totals.total_count, rolls / 3);
            assert_eq!(dice.total_count, totals.total_count * 2);
        }

        // 180 balanced draws of a d6 are 30 complete cycles, spread over the
        // three players
        let faces: u64 = session
            .stat_keys()
            .iter()
            .map(|key| session.summary(StatType::Dice, key).total_count)
            .sum();
        assert_eq!(faces, 180);

        let mut summary = String::new();
        session
            .summary(StatType::Total, &StatKey::player("Player 1"))
            .pretty_print(&mut summary)?;
        println!("Player 1: {}", summary);

        assert_eq!(session.history().len(), 50);
        session.reset_all();
        assert!(session.history().is_empty());
        assert!(session.snapshot().statistics.is_empty());

        Ok(())
    }
}
