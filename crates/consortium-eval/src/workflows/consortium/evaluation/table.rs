use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Direction in which a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPolicy {
    /// Match the first tier whose threshold is strictly above the value.
    LowerIsBetter,
    /// Match the first tier whose threshold is at or below the value.
    HigherIsBetter,
}

/// One `(threshold, score)` row. An unbounded threshold is `null` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    #[serde(
        serialize_with = "serialize_threshold",
        deserialize_with = "deserialize_threshold"
    )]
    pub threshold: f64,
    pub score: f64,
}

impl ScoreTier {
    pub const fn new(threshold: f64, score: f64) -> Self {
        Self { threshold, score }
    }

    pub const fn unbounded(score: f64) -> Self {
        Self {
            threshold: f64::INFINITY,
            score,
        }
    }
}

/// Ordered tiers scanned front to back. Rows are kept in the order the
/// regulator publishes them; the scan never re-sorts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable(pub Vec<ScoreTier>);

impl ScoreTable {
    pub fn new(tiers: Vec<ScoreTier>) -> Self {
        Self(tiers)
    }

    pub fn tiers(&self) -> &[ScoreTier] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve the score for `value`. Missing values score zero; a value no
    /// tier matches lands in the last tier rather than zero.
    pub fn lookup(&self, value: Option<f64>, policy: LookupPolicy) -> f64 {
        let Some(value) = value else {
            return 0.0;
        };

        let matched = self.0.iter().find(|tier| match policy {
            LookupPolicy::LowerIsBetter => value < tier.threshold,
            LookupPolicy::HigherIsBetter => value >= tier.threshold,
        });

        matched
            .or_else(|| self.0.last())
            .map(|tier| tier.score)
            .unwrap_or(0.0)
    }
}

/// Table lookup followed by the ruleset's base-score fallback. A table score
/// of exactly zero is replaced by `base_score`.
pub(crate) fn score_or_base(
    table: Option<&ScoreTable>,
    value: Option<f64>,
    policy: LookupPolicy,
    base_score: f64,
) -> f64 {
    let score = table.map_or(0.0, |table| table.lookup(value, policy));
    if score > 0.0 {
        score
    } else {
        base_score
    }
}

fn serialize_threshold<S>(threshold: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if threshold.is_finite() {
        serializer.serialize_some(threshold)
    } else {
        serializer.serialize_none()
    }
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debt_table() -> ScoreTable {
        ScoreTable::new(vec![
            ScoreTier::new(50.0, 8.0),
            ScoreTier::new(75.0, 7.2),
            ScoreTier::new(100.0, 6.4),
            ScoreTier::new(125.0, 5.6),
            ScoreTier::unbounded(4.8),
        ])
    }

    fn current_table() -> ScoreTable {
        ScoreTable::new(vec![
            ScoreTier::new(150.0, 7.0),
            ScoreTier::new(120.0, 6.3),
            ScoreTier::new(100.0, 5.6),
            ScoreTier::new(70.0, 4.9),
            ScoreTier::unbounded(4.2),
        ])
    }

    #[test]
    fn lower_is_better_uses_strict_upper_bounds() {
        let table = debt_table();
        assert_eq!(table.lookup(Some(48.2), LookupPolicy::LowerIsBetter), 8.0);
        assert_eq!(table.lookup(Some(50.0), LookupPolicy::LowerIsBetter), 7.2);
        assert_eq!(table.lookup(Some(124.9), LookupPolicy::LowerIsBetter), 5.6);
    }

    #[test]
    fn values_beyond_every_finite_threshold_hit_the_catch_all() {
        let table = debt_table();
        for value in [125.0, 300.0, 1.0e9] {
            assert_eq!(table.lookup(Some(value), LookupPolicy::LowerIsBetter), 4.8);
        }
    }

    #[test]
    fn higher_is_better_matches_first_floor_reached() {
        let table = current_table();
        assert_eq!(table.lookup(Some(150.0), LookupPolicy::HigherIsBetter), 7.0);
        assert_eq!(table.lookup(Some(105.2), LookupPolicy::HigherIsBetter), 5.6);
        assert_eq!(table.lookup(Some(70.0), LookupPolicy::HigherIsBetter), 4.9);
    }

    #[test]
    fn exhausted_scan_falls_back_to_last_tier() {
        let duration = ScoreTable::new(vec![
            ScoreTier::new(20.0, 3.0),
            ScoreTier::new(15.0, 2.8),
            ScoreTier::new(10.0, 2.5),
            ScoreTier::new(5.0, 2.2),
        ]);
        assert_eq!(
            duration.lookup(Some(2.0), LookupPolicy::HigherIsBetter),
            2.2
        );
        assert_eq!(
            current_table().lookup(Some(12.0), LookupPolicy::HigherIsBetter),
            4.2
        );
    }

    #[test]
    fn missing_values_and_empty_tables_score_zero() {
        assert_eq!(debt_table().lookup(None, LookupPolicy::LowerIsBetter), 0.0);
        let empty = ScoreTable::default();
        assert_eq!(empty.lookup(Some(10.0), LookupPolicy::LowerIsBetter), 0.0);
        assert_eq!(empty.lookup(Some(10.0), LookupPolicy::HigherIsBetter), 0.0);
    }

    #[test]
    fn base_score_only_replaces_a_zero_table_score() {
        let zero_floor = ScoreTable::new(vec![ScoreTier::new(50.0, 8.0), ScoreTier::unbounded(0.0)]);
        assert_eq!(
            score_or_base(Some(&zero_floor), Some(10.0), LookupPolicy::LowerIsBetter, 4.8),
            8.0
        );
        assert_eq!(
            score_or_base(Some(&zero_floor), Some(90.0), LookupPolicy::LowerIsBetter, 4.8),
            4.8
        );
        assert_eq!(
            score_or_base(None, Some(10.0), LookupPolicy::LowerIsBetter, 4.2),
            4.2
        );
    }

    #[test]
    fn unbounded_thresholds_round_trip_through_null() {
        let json = serde_json::to_value(debt_table()).expect("serializes");
        assert_eq!(json[4]["threshold"], serde_json::Value::Null);
        let parsed: ScoreTable = serde_json::from_value(json).expect("deserializes");
        assert!(parsed.tiers()[4].threshold.is_infinite());
    }
}
