use std::collections::BTreeMap;

use tracing::debug;

use super::ModelError;

/// Direction of an indel error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndelErrorRateType {
    /// Spurious insertion.
    Insert,
    /// Spurious deletion.
    Delete,
}

impl IndelErrorRateType {
    /// The error type that reverts this one.
    pub fn opposite(self) -> Self {
        match self {
            IndelErrorRateType::Insert => IndelErrorRateType::Delete,
            IndelErrorRateType::Delete => IndelErrorRateType::Insert,
        }
    }
}

/// Error rates stored for one (pattern size, repeat count) cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndelErrorRate {
    /// Per-read probability of a spurious insertion.
    pub insertion: f64,
    /// Per-read probability of a spurious deletion.
    pub deletion: f64,
    /// Fraction of loci in this context that behave as noisy.
    pub noisy_locus: f64,
}

impl IndelErrorRate {
    /// Rate for the given error direction.
    pub fn rate(&self, rate_type: IndelErrorRateType) -> f64 {
        match rate_type {
            IndelErrorRateType::Insert => self.insertion,
            IndelErrorRateType::Delete => self.deletion,
        }
    }
}

/// Mutable accumulator of enumerated rates, consumed by [`finalize`](Self::finalize).
#[derive(Debug, Clone, Default)]
pub struct IndelErrorRateSetBuilder {
    rates: BTreeMap<(u32, u32), IndelErrorRate>,
}

impl IndelErrorRateSetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rates of one context. A later call for the same context
    /// replaces the earlier one.
    pub fn add_rate(
        &mut self,
        pattern_size: u32,
        repeat_count: u32,
        insertion: f64,
        deletion: f64,
        noisy_locus: f64,
    ) -> &mut Self {
        debug_assert!(pattern_size >= 1 && repeat_count >= 1);
        self.rates.insert(
            (pattern_size, repeat_count),
            IndelErrorRate {
                insertion,
                deletion,
                noisy_locus,
            },
        );
        self
    }

    /// Number of enumerated contexts.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether no context has been enumerated.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Resolve every legal query into a dense immutable table.
    ///
    /// Per pattern size the table spans repeat counts `1..=max`, where `max`
    /// is the largest enumerated count. A count that was not enumerated takes
    /// the rate of the nearest enumerated count below it, or the nearest
    /// above when nothing lies below. Queries past `max` clamp to `max`.
    /// Pattern sizes that were never enumerated resolve to the repeat-count-1
    /// rate of the smallest enumerated pattern size.
    pub fn finalize(self) -> Result<IndelErrorRateSet, ModelError> {
        let mut by_pattern: BTreeMap<u32, BTreeMap<u32, IndelErrorRate>> = BTreeMap::new();
        for ((pattern_size, repeat_count), rate) in self.rates {
            by_pattern
                .entry(pattern_size)
                .or_default()
                .insert(repeat_count, rate);
        }

        let mut tables = BTreeMap::new();
        for (pattern_size, counts) in by_pattern {
            let max_count = match counts.keys().next_back() {
                Some(&max_count) => max_count,
                None => continue,
            };
            let table: Vec<IndelErrorRate> = (1..=max_count)
                .filter_map(|count| {
                    counts
                        .range(..=count)
                        .next_back()
                        .or_else(|| counts.range(count..).next())
                        .map(|(_, rate)| *rate)
                })
                .collect();
            debug!(
                pattern_size,
                max_repeat_count = max_count,
                enumerated = counts.len(),
                "finalized indel error rate table"
            );
            tables.insert(pattern_size, table);
        }

        let non_str = tables
            .values()
            .next()
            .and_then(|table| table.first())
            .copied()
            .ok_or(ModelError::EmptyRateSet)?;

        Ok(IndelErrorRateSet { tables, non_str })
    }
}

/// Finalized indel error rates keyed by pattern size and repeat count.
#[derive(Debug, Clone, PartialEq)]
pub struct IndelErrorRateSet {
    tables: BTreeMap<u32, Vec<IndelErrorRate>>,
    non_str: IndelErrorRate,
}

impl IndelErrorRateSet {
    /// All rates of the context, following the finalize resolution rules.
    pub fn rates(&self, pattern_size: u32, repeat_count: u32) -> IndelErrorRate {
        match self.tables.get(&pattern_size) {
            Some(table) if !table.is_empty() => {
                let idx = (repeat_count.max(1) as usize - 1).min(table.len() - 1);
                table[idx]
            }
            _ => self.non_str,
        }
    }

    /// Error rate of one direction in the context.
    pub fn rate(&self, pattern_size: u32, repeat_count: u32, rate_type: IndelErrorRateType) -> f64 {
        self.rates(pattern_size, repeat_count).rate(rate_type)
    }

    /// Noisy-locus rate of the context.
    pub fn noisy_locus_rate(&self, pattern_size: u32, repeat_count: u32) -> f64 {
        self.rates(pattern_size, repeat_count).noisy_locus
    }

    /// Pattern sizes with an explicit table, ascending.
    pub fn pattern_sizes(&self) -> impl Iterator<Item = u32> + '_ {
        self.tables.keys().copied()
    }

    /// Largest repeat count with its own table entry for `pattern_size`.
    pub fn max_repeat_count(&self, pattern_size: u32) -> Option<u32> {
        self.tables
            .get(&pattern_size)
            .map(|table| table.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> IndelErrorRateSetBuilder {
        let mut builder = IndelErrorRateSetBuilder::new();
        builder
            .add_rate(1, 1, 1e-4, 2e-4, 0.0)
            .add_rate(1, 3, 1e-3, 2e-3, 0.1)
            .add_rate(1, 5, 1e-2, 2e-2, 0.2)
            .add_rate(2, 4, 5e-3, 6e-3, 0.3);
        builder
    }

    #[test]
    fn exact_lookups_return_enumerated_rates() {
        let rates = builder().finalize().unwrap();
        assert_eq!(rates.rate(1, 3, IndelErrorRateType::Insert), 1e-3);
        assert_eq!(rates.rate(1, 3, IndelErrorRateType::Delete), 2e-3);
        assert_eq!(rates.noisy_locus_rate(1, 5), 0.2);
    }

    #[test]
    fn gaps_take_nearest_count_below() {
        let rates = builder().finalize().unwrap();
        assert_eq!(rates.rate(1, 2, IndelErrorRateType::Insert), 1e-4);
        assert_eq!(rates.rate(1, 4, IndelErrorRateType::Insert), 1e-3);
    }

    #[test]
    fn counts_past_table_end_clamp() {
        let rates = builder().finalize().unwrap();
        assert_eq!(rates.rate(1, 50, IndelErrorRateType::Insert), 1e-2);
        assert_eq!(rates.max_repeat_count(1), Some(5));
    }

    #[test]
    fn counts_below_first_entry_take_first_entry() {
        let rates = builder().finalize().unwrap();
        assert_eq!(rates.rate(2, 1, IndelErrorRateType::Delete), 6e-3);
        assert_eq!(rates.rate(2, 0, IndelErrorRateType::Delete), 6e-3);
    }

    #[test]
    fn unknown_pattern_size_resolves_as_non_str() {
        let rates = builder().finalize().unwrap();
        assert_eq!(rates.rate(7, 12, IndelErrorRateType::Insert), 1e-4);
        assert_eq!(rates.pattern_sizes().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn empty_builder_fails_to_finalize() {
        let err = IndelErrorRateSetBuilder::new().finalize().unwrap_err();
        assert!(matches!(err, ModelError::EmptyRateSet));
    }

    #[test]
    fn later_rates_replace_earlier_ones() {
        let mut builder = IndelErrorRateSetBuilder::new();
        builder.add_rate(1, 1, 1.0, 1.0, 0.0).add_rate(1, 1, 0.5, 0.25, 0.0);
        assert_eq!(builder.len(), 1);
        let rates = builder.finalize().unwrap();
        assert_eq!(rates.rate(1, 1, IndelErrorRateType::Delete), 0.25);
    }
}
