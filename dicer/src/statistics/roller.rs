use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Where die faces come from. The sampler only ever asks for a single
/// independent face or for a deck to be permuted.
pub trait DieSource {
    /// A face drawn uniformly from `1..=faces`.
    fn roll_face(&mut self, faces: u32) -> u32;

    /// Permutes `deck` in place, every ordering equally likely.
    fn shuffle(&mut self, deck: &mut [u32]);
}

#[derive(Debug)]
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let rng = StdRng::from_os_rng();
        Roller { rng }
    }

    /// Creates a new `Roller` seeded from this one, so that a reproducible
    /// session can hand out independent streams.
    pub fn fork(&mut self) -> Self {
        let mut seed = [0u8; 32];
        self.rng.fill(&mut seed);
        let rng = StdRng::from_seed(seed);
        Roller { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Roller { rng }
    }

    pub fn d(&mut self, die_size: u32) -> u32 {
        self.rng.random_range(1..=die_size)
    }

    #[cfg(test)]
    pub fn test_rng() -> Self {
        Self::from_seed(42)
    }
}

impl DieSource for Roller {
    fn roll_face(&mut self, faces: u32) -> u32 {
        self.d(faces)
    }

    fn shuffle(&mut self, deck: &mut [u32]) {
        // Fisher-Yates
        deck.shuffle(&mut self.rng);
    }
}

impl<S: DieSource + ?Sized> DieSource for &mut S {
    fn roll_face(&mut self, faces: u32) -> u32 {
        (**self).roll_face(faces)
    }

    fn shuffle(&mut self, deck: &mut [u32]) {
        (**self).shuffle(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d_in_range() {
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let face = roller.d(6);
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn test_seeded_rollers_agree() {
        let mut a = Roller::from_seed(7);
        let mut b = Roller::from_seed(7);
        let a: Vec<u32> = (0..32).map(|_| a.d(20)).collect();
        let b: Vec<u32> = (0..32).map(|_| b.d(20)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut roller = Roller::test_rng();
        let mut deck: Vec<u32> = (1..=12).collect();
        roller.shuffle(&mut deck);
        let mut sorted = deck.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_fork_is_independent() {
        let mut parent = Roller::test_rng();
        let mut child = parent.fork();
        let from_parent: Vec<u32> = (0..16).map(|_| parent.d(1000)).collect();
        let from_child: Vec<u32> = (0..16).map(|_| child.d(1000)).collect();
        assert_ne!(from_parent, from_child);
    }
}
