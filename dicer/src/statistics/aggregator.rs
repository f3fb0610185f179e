use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Aggregation bucket: a single player's rolls, or everything rolled outside
/// of multiplayer.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    #[default]
    Global,
    Player(String),
}

impl StatKey {
    pub fn player(name: impl Into<String>) -> Self {
        StatKey::Player(name.into())
    }
}

impl From<Option<&str>> for StatKey {
    fn from(player: Option<&str>) -> Self {
        match player {
            Some(name) => StatKey::player(name),
            None => StatKey::Global,
        }
    }
}

impl std::fmt::Display for StatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatKey::Global => write!(f, "All Rolls"),
            StatKey::Player(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    /// Individual die faces.
    #[default]
    Dice,
    /// Roll sums.
    Total,
}

impl StatType {
    pub fn axis_title(&self) -> &'static str {
        match self {
            StatType::Dice => "Dice Value",
            StatType::Total => "Total Sum",
        }
    }
}

/// Counts per observed value, kept sorted by value.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: BTreeMap<u32, u64>,
}

impl FrequencyTable {
    pub fn record(&mut self, value: u32) {
        *self.counts.entry(value).or_default() += 1;
    }

    pub fn count(&self, value: u32) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    pub fn total_count(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn series(&self) -> Vec<(u32, u64)> {
        self.counts.iter().map(|(&v, &c)| (v, c)).collect()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_count: u64,
    /// Weighted mean rounded to two decimals, `None` when nothing was recorded.
    pub mean: Option<f64>,
    pub min_value: Option<u32>,
    pub max_value: Option<u32>,
    /// Most frequent value; the lowest one wins a tie.
    pub mode: Option<u32>,
    pub series: Vec<(u32, u64)>,
}

impl Summary {
    pub fn from_table(table: &FrequencyTable) -> Self {
        let total_count = table.total_count();
        if total_count == 0 {
            return Self::default();
        }

        let series = table.series();
        let weighted: f64 = series.iter().map(|&(v, c)| v as f64 * c as f64).sum();
        let mean = round2(weighted / total_count as f64);

        let mut mode = None;
        let mut best = 0;
        for &(value, count) in &series {
            if count > best {
                best = count;
                mode = Some(value);
            }
        }

        Self {
            total_count,
            mean: Some(mean),
            min_value: series.first().map(|&(v, _)| v),
            max_value: series.last().map(|&(v, _)| v),
            mode,
            series,
        }
    }

    pub fn has_data(&self) -> bool {
        self.total_count > 0
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        match self.mean {
            Some(mean) => write!(f, "{} rolls, average {:.2}", self.total_count, mean),
            None => write!(f, "0 rolls, average --"),
        }
    }
}

/// Chi-squared goodness of fit of observed faces against a fair die.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uniformity {
    pub statistic: f64,
    pub degrees_of_freedom: u32,
    pub p_value: f64,
}

/// Running frequency tables of faces and sums, bucketed by [`StatKey`].
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    dice: FxHashMap<StatKey, FrequencyTable>,
    totals: FxHashMap<StatKey, FrequencyTable>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, values: &[u32], sum: u32, key: &StatKey) {
        let dice = self.dice.entry(key.clone()).or_default();
        for &value in values {
            dice.record(value);
        }
        self.totals.entry(key.clone()).or_default().record(sum);
    }

    pub fn table(&self, stat_type: StatType, key: &StatKey) -> Option<&FrequencyTable> {
        match stat_type {
            StatType::Dice => self.dice.get(key),
            StatType::Total => self.totals.get(key),
        }
    }

    pub fn summarize(&self, stat_type: StatType, key: &StatKey) -> Summary {
        self.table(stat_type, key)
            .map(Summary::from_table)
            .unwrap_or_default()
    }

    /// Keys that have at least one roll recorded, sorted.
    pub fn keys(&self) -> Vec<StatKey> {
        let mut keys: Vec<StatKey> = self
            .totals
            .iter()
            .filter(|(_, table)| !table.is_empty())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Tests the faces recorded under `key` against a fair `faces`-sided die.
    /// Only values in `1..=faces` take part.
    pub fn uniformity(&self, key: &StatKey, faces: u32) -> Option<Uniformity> {
        if faces < 2 {
            return None;
        }
        let table = self.dice.get(key)?;
        let observed: Vec<u64> = (1..=faces).map(|face| table.count(face)).collect();
        let total: u64 = observed.iter().sum();
        if total == 0 {
            return None;
        }

        let expected = total as f64 / faces as f64;
        let statistic: f64 = observed
            .iter()
            .map(|&o| {
                let diff = o as f64 - expected;
                diff * diff / expected
            })
            .sum();
        let degrees_of_freedom = faces - 1;
        let distribution = ChiSquared::new(degrees_of_freedom as f64).ok()?;
        let p_value = (1.0 - distribution.cdf(statistic)).clamp(0.0, 1.0);

        Some(Uniformity {
            statistic,
            degrees_of_freedom,
            p_value,
        })
    }

    pub fn reset(&mut self) {
        self.dice.clear();
        self.totals.clear();
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
