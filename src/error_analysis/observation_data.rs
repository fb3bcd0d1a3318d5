use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use super::observation::{
    BasecallErrorContextInputObservation, BasecallErrorContextObservation, BasecallQuality,
    StrandBasecallCounts,
};
use super::ExportError;

const DUMP_TAG: &str = "base-error";

/// One strand of an exported pattern, alt counts indexed by quality level.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExportStrandObservation {
    /// Reference allele reads.
    pub ref_allele_count: u32,
    /// Alternate reads, parallel to the export quality levels.
    pub alt_allele_count: Vec<u32>,
}

/// Exported form of one compressed observation pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExportObservation {
    /// Greater strand under the canonical order.
    pub strand0: ExportStrandObservation,
    /// Lesser strand under the canonical order.
    pub strand1: ExportStrandObservation,
}

/// Flattened observation data handed to the error model fitting routine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationExportData {
    /// Ascending basecall quality levels seen in reference evidence.
    pub quality_levels: Vec<BasecallQuality>,
    /// Reference evidence per quality level, parallel to `quality_levels`.
    pub ref_count: Vec<u64>,
    /// Occurrence count of every exported pattern.
    pub observations: BTreeMap<ExportObservation, u64>,
}

/// Compressed observation patterns of one calibration context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasecallErrorContextObservationData {
    data: BTreeMap<BasecallErrorContextObservation, u64>,
    ref_quality_counts: BTreeMap<BasecallQuality, u64>,
}

impl BasecallErrorContextObservationData {
    /// Create empty observation data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct compressed patterns.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no observation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Patterns and their occurrence counts, in canonical order.
    pub fn patterns(&self) -> impl Iterator<Item = (&BasecallErrorContextObservation, u64)> {
        self.data.iter().map(|(pattern, &count)| (pattern, count))
    }

    /// Reference evidence per quality level, aggregated over all sites.
    pub fn ref_quality_counts(&self) -> &BTreeMap<BasecallQuality, u64> {
        &self.ref_quality_counts
    }

    /// Record one site.
    ///
    /// Reference quality is kept only in the aggregate per-level counts; the
    /// stored pattern keeps the reference read total per strand, saturating
    /// at `u32::MAX`. Zero alt entries are dropped so they cannot block
    /// reference-only folding.
    pub fn add_observation(&mut self, observation: &BasecallErrorContextInputObservation) {
        let mut strands: [StrandBasecallCounts; 2] = Default::default();
        for (strand, (ref_counts, alt_counts)) in strands.iter_mut().zip(
            observation
                .ref_counts
                .iter()
                .zip(observation.alt_counts.iter()),
        ) {
            for (&quality, &count) in ref_counts {
                *self.ref_quality_counts.entry(quality).or_insert(0) += u64::from(count);
                strand.ref_allele_count = strand.ref_allele_count.saturating_add(count);
            }
            strand.alt_allele_count = alt_counts
                .iter()
                .filter(|&(_, &count)| count > 0)
                .map(|(&quality, &count)| (quality, count))
                .collect();
        }

        let [strand0, strand1] = strands;
        let pattern = BasecallErrorContextObservation::new(strand0, strand1);
        *self.data.entry(pattern).or_insert(0) += 1;
    }

    /// Add all counts of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for (pattern, &count) in &other.data {
            *self.data.entry(pattern.clone()).or_insert(0) += count;
        }
        for (&quality, &count) in &other.ref_quality_counts {
            *self.ref_quality_counts.entry(quality).or_insert(0) += count;
        }
    }

    /// Flatten into the export layout.
    ///
    /// Fails when a pattern carries alt evidence at a quality level never
    /// seen in reference evidence, or when two patterns flatten to the same
    /// export key.
    pub fn export(&self) -> Result<ObservationExportData, ExportError> {
        let quality_levels: Vec<BasecallQuality> =
            self.ref_quality_counts.keys().copied().collect();
        let ref_count = self.ref_quality_counts.values().copied().collect();
        let level_index: BTreeMap<BasecallQuality, usize> = quality_levels
            .iter()
            .enumerate()
            .map(|(idx, &quality)| (quality, idx))
            .collect();

        let export_strand =
            |strand: &StrandBasecallCounts| -> Result<ExportStrandObservation, ExportError> {
                let mut alt_allele_count = vec![0; quality_levels.len()];
                for (&quality, &count) in &strand.alt_allele_count {
                    let idx = level_index
                        .get(&quality)
                        .ok_or(ExportError::UnlistedQualityLevel { quality })?;
                    alt_allele_count[*idx] = count;
                }
                Ok(ExportStrandObservation {
                    ref_allele_count: strand.ref_allele_count,
                    alt_allele_count,
                })
            };

        let mut observations = BTreeMap::new();
        for (pattern, &count) in &self.data {
            let key = ExportObservation {
                strand0: export_strand(pattern.strand0())?,
                strand1: export_strand(pattern.strand1())?,
            };
            if observations.insert(key, count).is_some() {
                return Err(ExportError::DuplicateExportKey);
            }
        }

        Ok(ObservationExportData {
            quality_levels,
            ref_count,
            observations,
        })
    }

    /// Write a human-readable summary of the recorded patterns.
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let key_count = self.data.len();
        writeln!(writer, "{}KeyCount: {}", DUMP_TAG, key_count)?;

        let mut ref_only_key_count = 0usize;
        let mut alt_only_key_count = 0usize;
        let mut total_observations = 0u64;
        let mut total_alt: BTreeMap<BasecallQuality, u64> = BTreeMap::new();
        let mut total_by_depth: BTreeMap<u64, u64> = BTreeMap::new();

        for (pattern, &count) in &self.data {
            total_observations += count;
            let (s0, s1) = (pattern.strand0(), pattern.strand1());
            for (&quality, &alt) in s0.alt_allele_count.iter().chain(&s1.alt_allele_count) {
                *total_alt.entry(quality).or_insert(0) += u64::from(alt) * count;
            }
            *total_by_depth.entry(s0.depth() + s1.depth()).or_insert(0) += count;

            if !s0.has_alt() && !s1.has_alt() {
                ref_only_key_count += 1;
            }
            if s0.ref_allele_count == 0 && s1.ref_allele_count == 0 {
                alt_only_key_count += 1;
            }
        }

        let mean_occupancy = if key_count == 0 {
            0.0
        } else {
            total_observations as f64 / key_count as f64
        };
        writeln!(writer, "{}RefOnlyKeyCount: {}", DUMP_TAG, ref_only_key_count)?;
        writeln!(writer, "{}AltOnlyKeyCount: {}", DUMP_TAG, alt_only_key_count)?;
        writeln!(writer, "{}TotalObservations: {}", DUMP_TAG, total_observations)?;
        writeln!(writer, "{}MeanKeyOccupancy: {}", DUMP_TAG, mean_occupancy)?;

        let qualities: BTreeSet<BasecallQuality> = self
            .ref_quality_counts
            .keys()
            .chain(total_alt.keys())
            .copied()
            .collect();
        writeln!(writer, "{}Qval\tTotalRef\tTotalAlt", DUMP_TAG)?;
        for quality in qualities {
            writeln!(
                writer,
                "{}Q{}\t{}\t{}",
                DUMP_TAG,
                quality,
                self.ref_quality_counts.get(&quality).copied().unwrap_or(0),
                total_alt.get(&quality).copied().unwrap_or(0)
            )?;
        }

        for (depth, observations) in total_by_depth {
            writeln!(writer, "DEPTH: {}\t{}", depth, observations)?;
        }
        Ok(())
    }
}
