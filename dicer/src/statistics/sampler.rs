use crate::{
    error::{DicerError, Result},
    rules::dice::{DieSpec, RngMode, RollResult},
    statistics::roller::{DieSource, Roller},
};

/// Produces die faces under the configured [`RngMode`].
///
/// In [`RngMode::Balanced`] the sampler deals from a deck holding exactly one
/// copy of every face. The deck is refilled and reshuffled only once it runs
/// dry, so every `faces` consecutive draws after a refill contain each face
/// exactly once.
#[derive(Debug)]
pub struct Sampler<S: DieSource = Roller> {
    spec: DieSpec,
    mode: RngMode,
    deck: Vec<u32>,
    source: S,
}

impl<S: DieSource> Sampler<S> {
    pub fn new(spec: DieSpec, mode: RngMode, source: S) -> Result<Self> {
        spec.validate()?;
        let mut sampler = Self {
            spec,
            mode,
            deck: Vec::new(),
            source,
        };
        if mode == RngMode::Balanced {
            sampler.refill_deck();
        }
        Ok(sampler)
    }

    pub fn spec(&self) -> DieSpec {
        self.spec
    }

    pub fn mode(&self) -> RngMode {
        self.mode
    }

    /// Faces still waiting in the balanced deck, next draw last.
    pub fn deck(&self) -> &[u32] {
        &self.deck
    }

    /// Applies a new spec and mode. Nothing changes if `spec` is invalid.
    pub fn configure(&mut self, spec: DieSpec, mode: RngMode) -> Result<()> {
        spec.validate()?;

        let faces_changed = spec.faces != self.spec.faces;
        let switched_to_balanced = mode == RngMode::Balanced && self.mode != RngMode::Balanced;
        self.spec = spec;
        self.mode = mode;

        match mode {
            RngMode::Balanced if faces_changed || switched_to_balanced => self.refill_deck(),
            RngMode::Balanced => {}
            RngMode::Uniform => self.deck.clear(),
        }

        log::debug!("Sampler configured for {} ({:?})", spec, mode);
        Ok(())
    }

    /// Throws away whatever is left of the deck and starts a fresh cycle.
    pub fn reset_deck(&mut self) {
        match self.mode {
            RngMode::Balanced => self.refill_deck(),
            RngMode::Uniform => self.deck.clear(),
        }
    }

    pub fn draw_one(&mut self) -> u32 {
        match self.mode {
            RngMode::Uniform => self.source.roll_face(self.spec.faces),
            RngMode::Balanced => loop {
                if let Some(face) = self.deck.pop() {
                    break face;
                }
                self.refill_deck();
            },
        }
    }

    /// Draws `count` faces; the returned order is the draw order.
    pub fn roll_many(&mut self, count: u32) -> Result<Vec<u32>> {
        if count < 1 {
            return Err(DicerError::invalid(
                "dice count",
                count,
                "at least one die is required",
            ));
        }
        Ok((0..count).map(|_| self.draw_one()).collect())
    }

    /// Rolls every die of the configured spec.
    pub fn roll(&mut self) -> RollResult {
        let values = (0..self.spec.count).map(|_| self.draw_one()).collect();
        RollResult::new(values)
    }

    fn refill_deck(&mut self) {
        self.deck.clear();
        self.deck.extend(1..=self.spec.faces);
        self.source.shuffle(&mut self.deck);
        log::debug!("Refilled balanced deck with {} faces", self.spec.faces);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Hands out scripted faces and leaves decks in ascending order.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedSource {
        pub faces: VecDeque<u32>,
        pub shuffles: usize,
    }

    impl ScriptedSource {
        pub(crate) fn new(faces: impl IntoIterator<Item = u32>) -> Self {
            Self {
                faces: faces.into_iter().collect(),
                shuffles: 0,
            }
        }
    }

    impl DieSource for ScriptedSource {
        fn roll_face(&mut self, faces: u32) -> u32 {
            let face = self.faces.pop_front().expect("script exhausted");
            assert!(face >= 1 && face <= faces);
            face
        }

        fn shuffle(&mut self, _deck: &mut [u32]) {
            self.shuffles += 1;
        }
    }

    fn is_permutation(draws: &[u32], faces: u32) -> bool {
        let mut sorted = draws.to_vec();
        sorted.sort_unstable();
        sorted == (1..=faces).collect::<Vec<_>>()
    }

    #[test]
    fn test_uniform_uses_source() {
        let spec = DieSpec::new(2, 6).unwrap();
        let mut sampler = Sampler::new(spec, RngMode::Uniform, ScriptedSource::new([3, 5])).unwrap();
        let result = sampler.roll();
        assert_eq!(result.values, vec![3, 5]);
        assert_eq!(result.sum, 8);
        assert!(sampler.deck().is_empty());
    }

    #[test]
    fn test_roll_many_count_and_range() {
        let mut roller = Roller::test_rng();
        for faces in [2, 4, 6, 8, 10, 12, 20, 100] {
            for mode in [RngMode::Uniform, RngMode::Balanced] {
                let spec = DieSpec::new(1, faces).unwrap();
                let mut sampler = Sampler::new(spec, mode, &mut roller).unwrap();
                for count in 1..=25 {
                    let values = sampler.roll_many(count).unwrap();
                    assert_eq!(values.len(), count as usize);
                    assert!(values.iter().all(|v| (1..=faces).contains(v)));
                }
            }
        }
    }

    #[test]
    fn test_roll_many_rejects_zero() {
        let mut sampler = Sampler::new(DieSpec::default(), RngMode::Uniform, Roller::test_rng()).unwrap();
        assert!(sampler.roll_many(0).unwrap_err().is_invalid_configuration());
    }

    #[test]
    fn test_balanced_cycles_are_permutations() {
        let mut roller = Roller::test_rng();
        for faces in 2..=20 {
            let spec = DieSpec::new(1, faces).unwrap();
            let mut sampler = Sampler::new(spec, RngMode::Balanced, &mut roller).unwrap();
            let draws = sampler.roll_many(faces * 6).unwrap();
            for cycle in draws.chunks(faces as usize) {
                assert!(is_permutation(cycle, faces), "{cycle:?} for d{faces}");
            }
        }
    }

    #[test]
    fn test_balanced_refills_after_exhaustion() {
        let spec = DieSpec::new(1, 4).unwrap();
        let mut sampler = Sampler::new(spec, RngMode::Balanced, ScriptedSource::default()).unwrap();
        assert_eq!(sampler.source.shuffles, 1);

        let first_cycle = sampler.roll_many(4).unwrap();
        assert_eq!(first_cycle, vec![4, 3, 2, 1]);
        assert!(sampler.deck().is_empty());
        assert_eq!(sampler.source.shuffles, 1);

        let fifth = sampler.draw_one();
        assert_eq!(fifth, 4);
        assert_eq!(sampler.source.shuffles, 2);
        assert_eq!(sampler.deck(), &[1, 2, 3]);
    }

    #[test]
    fn test_configure_rebuilds_deck_on_face_change() {
        let mut sampler = Sampler::new(
            DieSpec::new(1, 6).unwrap(),
            RngMode::Balanced,
            ScriptedSource::default(),
        )
        .unwrap();
        sampler.draw_one();
        assert_eq!(sampler.deck().len(), 5);

        // same faces, more dice: the deck is kept
        sampler.configure(DieSpec::new(3, 6).unwrap(), RngMode::Balanced).unwrap();
        assert_eq!(sampler.deck().len(), 5);

        sampler.configure(DieSpec::new(3, 8).unwrap(), RngMode::Balanced).unwrap();
        assert_eq!(sampler.deck(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_configure_switching_modes() {
        let mut sampler = Sampler::new(
            DieSpec::new(1, 6).unwrap(),
            RngMode::Uniform,
            ScriptedSource::default(),
        )
        .unwrap();
        assert!(sampler.deck().is_empty());

        sampler.configure(DieSpec::new(1, 6).unwrap(), RngMode::Balanced).unwrap();
        assert_eq!(sampler.deck().len(), 6);
        assert_eq!(sampler.source.shuffles, 1);

        sampler.configure(DieSpec::new(1, 6).unwrap(), RngMode::Uniform).unwrap();
        assert!(sampler.deck().is_empty());
    }

    #[test]
    fn test_invalid_configure_keeps_state() {
        let mut sampler = Sampler::new(
            DieSpec::new(2, 6).unwrap(),
            RngMode::Balanced,
            ScriptedSource::default(),
        )
        .unwrap();
        sampler.draw_one();

        let err = sampler
            .configure(DieSpec { count: 2, faces: 1 }, RngMode::Uniform)
            .unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(
            sampler
                .configure(DieSpec { count: 0, faces: 6 }, RngMode::Uniform)
                .is_err()
        );
        assert_eq!(sampler.spec(), DieSpec::new(2, 6).unwrap());
        assert_eq!(sampler.mode(), RngMode::Balanced);
        assert_eq!(sampler.deck(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reset_deck_starts_new_cycle() {
        let mut sampler = Sampler::new(
            DieSpec::new(1, 3).unwrap(),
            RngMode::Balanced,
            ScriptedSource::default(),
        )
        .unwrap();
        sampler.draw_one();
        sampler.reset_deck();
        assert_eq!(sampler.deck(), &[1, 2, 3]);
        assert_eq!(sampler.source.shuffles, 2);
    }
}
