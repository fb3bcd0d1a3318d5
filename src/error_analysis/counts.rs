use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use tracing::debug;

use super::observation::BasecallErrorContextInputObservation;
use super::observation_data::{BasecallErrorContextObservationData, ObservationExportData};
use super::ExportError;

/// Calibration bucket an observation belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BasecallErrorContext {
    /// Homopolymer/STR repeat count at the site.
    pub repeat_count: u32,
}

impl BasecallErrorContext {
    /// Context for the given repeat count.
    pub fn new(repeat_count: u32) -> Self {
        Self { repeat_count }
    }
}

impl fmt::Display for BasecallErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repeat_count)
    }
}

/// Observations of one context plus the reasons sites were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasecallErrorData {
    /// Compressed observation patterns.
    pub counts: BasecallErrorContextObservationData,
    /// Sites skipped inside excluded regions.
    pub excluded_region_skipped: u64,
    /// Sites skipped by the depth filter.
    pub depth_skipped: u64,
    /// Sites skipped for lack of usable basecalls.
    pub empty_skipped: u64,
    /// Sites skipped by the noise filter.
    pub noise_skipped: u64,
}

impl BasecallErrorData {
    /// Add all counts of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.counts.merge(&other.counts);
        self.excluded_region_skipped += other.excluded_region_skipped;
        self.depth_skipped += other.depth_skipped;
        self.empty_skipped += other.empty_skipped;
        self.noise_skipped += other.noise_skipped;
    }

    /// Write skip counters followed by the observation summary.
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "excludedRegionSkippedCount: {}", self.excluded_region_skipped)?;
        writeln!(writer, "depthSkippedCount: {}", self.depth_skipped)?;
        writeln!(writer, "emptySkippedCount: {}", self.empty_skipped)?;
        writeln!(writer, "noiseSkippedCount: {}", self.noise_skipped)?;
        self.counts.dump(writer)
    }
}

/// Basecall error observations over all contexts of one shard or run.
///
/// Each worker owns an instance; shards are combined with [`merge`](Self::merge),
/// which is associative and commutative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasecallErrorCounts {
    data: BTreeMap<BasecallErrorContext, BasecallErrorData>,
}

impl BasecallErrorCounts {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts seen.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no context has been touched.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Accumulated data of a context, if it was touched.
    pub fn get(&self, context: &BasecallErrorContext) -> Option<&BasecallErrorData> {
        self.data.get(context)
    }

    /// Contexts and their data in ascending context order.
    pub fn iter(&self) -> impl Iterator<Item = (&BasecallErrorContext, &BasecallErrorData)> {
        self.data.iter()
    }

    /// Data of `context`, inserting an empty entry first if needed.
    pub fn context_entry(&mut self, context: BasecallErrorContext) -> &mut BasecallErrorData {
        self.data.entry(context).or_default()
    }

    /// Record the evidence of one site.
    pub fn add_site_observation(
        &mut self,
        context: BasecallErrorContext,
        observation: &BasecallErrorContextInputObservation,
    ) {
        self.context_entry(context).counts.add_observation(observation);
    }

    /// Record a site skipped inside an excluded region.
    pub fn add_excluded_region_skip(&mut self, context: BasecallErrorContext) {
        self.context_entry(context).excluded_region_skipped += 1;
    }

    /// Record a site skipped by the depth filter.
    pub fn add_depth_skip(&mut self, context: BasecallErrorContext) {
        self.context_entry(context).depth_skipped += 1;
    }

    /// Record a site skipped for lack of usable basecalls.
    pub fn add_empty_skip(&mut self, context: BasecallErrorContext) {
        self.context_entry(context).empty_skipped += 1;
    }

    /// Record a site skipped by the noise filter.
    pub fn add_noise_skip(&mut self, context: BasecallErrorContext) {
        self.context_entry(context).noise_skipped += 1;
    }

    /// Add all counts of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for (context, data) in &other.data {
            self.context_entry(*context).merge(data);
        }
        debug!(contexts = self.data.len(), "merged basecall error counts");
    }

    /// Export the observation data of every context.
    pub fn export(
        &self,
    ) -> Result<BTreeMap<BasecallErrorContext, ObservationExportData>, ExportError> {
        self.data
            .iter()
            .map(|(context, data)| {
                data.counts
                    .export()
                    .map(|export| (*context, export))
                    .map_err(|source| ExportError::Context {
                        context: *context,
                        source: Box::new(source),
                    })
            })
            .collect()
    }

    /// Write a diagnostic report of every context.
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "BasecallErrorCounts DUMP_ON")?;
        writeln!(writer, "Total Basecall Contexts: {}", self.data.len())?;
        for (context, data) in &self.data {
            writeln!(writer, "Basecall Context: {}", context)?;
            data.dump(writer)?;
        }
        writeln!(writer, "BasecallErrorCounts DUMP_OFF")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(ref_reads: u32, alt_reads: u32) -> BasecallErrorContextInputObservation {
        let mut obs = BasecallErrorContextInputObservation::new();
        for _ in 0..ref_reads {
            obs.add_ref_count(true, 30);
        }
        for _ in 0..alt_reads {
            obs.add_alt_count(false, 30);
        }
        obs
    }

    #[test]
    fn context_entry_inserts_once() {
        let mut counts = BasecallErrorCounts::new();
        counts.context_entry(BasecallErrorContext::new(3)).depth_skipped += 2;
        counts.context_entry(BasecallErrorContext::new(3)).depth_skipped += 1;
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&BasecallErrorContext::new(3)).unwrap().depth_skipped, 3);
    }

    #[test]
    fn skip_counters_are_independent() {
        let mut counts = BasecallErrorCounts::new();
        let context = BasecallErrorContext::new(1);
        counts.add_excluded_region_skip(context);
        counts.add_depth_skip(context);
        counts.add_depth_skip(context);
        counts.add_empty_skip(context);
        counts.add_noise_skip(context);
        counts.add_noise_skip(context);
        counts.add_noise_skip(context);

        let data = counts.get(&context).unwrap();
        assert_eq!(data.excluded_region_skipped, 1);
        assert_eq!(data.depth_skipped, 2);
        assert_eq!(data.empty_skipped, 1);
        assert_eq!(data.noise_skipped, 3);
        assert!(data.counts.is_empty());
    }

    #[test]
    fn merge_adds_skips_and_unions_contexts() {
        let mut left = BasecallErrorCounts::new();
        left.add_depth_skip(BasecallErrorContext::new(1));
        left.add_site_observation(BasecallErrorContext::new(1), &observation(10, 1));

        let mut right = BasecallErrorCounts::new();
        right.add_depth_skip(BasecallErrorContext::new(1));
        right.add_site_observation(BasecallErrorContext::new(4), &observation(10, 0));

        left.merge(&right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.get(&BasecallErrorContext::new(1)).unwrap().depth_skipped, 2);
        assert_eq!(left.get(&BasecallErrorContext::new(4)).unwrap().counts.len(), 1);
    }

    #[test]
    fn export_covers_every_context() {
        let mut counts = BasecallErrorCounts::new();
        counts.add_site_observation(BasecallErrorContext::new(1), &observation(5, 1));
        counts.add_site_observation(BasecallErrorContext::new(2), &observation(7, 0));
        counts.add_noise_skip(BasecallErrorContext::new(9));

        let export = counts.export().unwrap();
        assert_eq!(export.len(), 3);
        assert!(export[&BasecallErrorContext::new(9)].observations.is_empty());
        assert_eq!(export[&BasecallErrorContext::new(1)].quality_levels, vec![30]);
    }

    #[test]
    fn dump_is_bracketed_per_context() {
        let mut counts = BasecallErrorCounts::new();
        counts.add_empty_skip(BasecallErrorContext::new(2));
        let mut out = Vec::new();
        counts.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("BasecallErrorCounts DUMP_ON\nTotal Basecall Contexts: 1\n"));
        assert!(text.contains("Basecall Context: 2\n"));
        assert!(text.contains("emptySkippedCount: 1\n"));
        assert!(text.ends_with("BasecallErrorCounts DUMP_OFF\n"));
    }
}
