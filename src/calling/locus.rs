use std::collections::BTreeSet;

use crate::types::{Base, IndelKey, IndelRepeatContext, N_BASE};

use super::scoring::safe_frac;

/// Set of flags attached to a locus.
///
/// Setting a flag that is already present leaves the set unchanged and
/// returns `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet<F: Ord + Copy> {
    flags: BTreeSet<F>,
}

impl<F: Ord + Copy> Default for FilterSet<F> {
    fn default() -> Self {
        Self {
            flags: BTreeSet::new(),
        }
    }
}

impl<F: Ord + Copy> FilterSet<F> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `flag`, returning whether it was newly set.
    pub fn set(&mut self, flag: F) -> bool {
        self.flags.insert(flag)
    }

    /// Remove `flag`, returning whether it was present.
    pub fn unset(&mut self, flag: F) -> bool {
        self.flags.remove(&flag)
    }

    /// Whether `flag` is set.
    pub fn contains(&self, flag: F) -> bool {
        self.flags.contains(&flag)
    }

    /// Whether no flag is set.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Set flags in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.flags.iter().copied()
    }
}

/// Locus-level filters assigned by the continuous caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocusFilter {
    /// Locus quality is below the configured minimum.
    LowGqx,
}

/// Per-sample call summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleInfo {
    /// Genotype quality.
    pub gq: i32,
}

/// One emitted allele at a site locus.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteAlleleInfo {
    /// Allele base.
    pub base: Base,
    /// Total depth at the site, spanning deletions included.
    pub total_depth: u32,
    /// Observations of this base.
    pub allele_count: u32,
    /// Quality of the allele call.
    pub gqx: i32,
    /// Strand-bias statistic; only computed for non-reference alleles.
    pub strand_bias: Option<f64>,
}

impl SiteAlleleInfo {
    /// Fraction of the site depth supporting this allele.
    pub fn variant_frequency(&self) -> f64 {
        safe_frac(self.allele_count, self.total_depth)
    }
}

/// Call record of one SNV site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLocusInfo {
    /// 0-based reference position.
    pub pos: u32,
    /// Reference base.
    pub ref_base: Base,
    /// Reads with a deletion spanning the site.
    pub spanning_deletions: u32,
    /// Observation count of each base, indexed by [`Base::index`].
    pub allele_observation_counts: [u32; N_BASE],
    /// Per-sample call summaries.
    pub samples: Vec<SampleInfo>,
    /// Whether any non-reference allele exceeded the frequency floor.
    pub is_snp: bool,
    /// Emit every allele regardless of frequency.
    pub is_forced_output: bool,
    /// Emitted alleles, in base order.
    pub alt_alleles: Vec<SiteAlleleInfo>,
    /// Maximum genotype quality over samples.
    pub any_variant_allele_quality: i32,
    /// Locus filters.
    pub filters: FilterSet<LocusFilter>,
}

impl SiteLocusInfo {
    /// Empty locus record with `sample_count` samples.
    pub fn new(pos: u32, ref_base: Base, sample_count: usize) -> Self {
        Self {
            pos,
            ref_base,
            spanning_deletions: 0,
            allele_observation_counts: [0; N_BASE],
            samples: vec![SampleInfo::default(); sample_count],
            is_snp: false,
            is_forced_output: false,
            alt_alleles: Vec::new(),
            any_variant_allele_quality: 0,
            filters: FilterSet::new(),
        }
    }

    /// Observation count of `base`.
    pub fn allele_observation_count(&self, base: Base) -> u32 {
        self.allele_observation_counts[base.index()]
    }

    /// Spanning deletions plus all base observations, saturating at `u32::MAX`.
    pub fn total_depth(&self) -> u32 {
        self.allele_observation_counts
            .iter()
            .fold(self.spanning_deletions, |depth, &count| depth.saturating_add(count))
    }
}

/// Confident read counts supporting an indel in one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndelSampleReportInfo {
    /// Reads confidently supporting the indel.
    pub n_confident_indel_reads: u32,
    /// Reads confidently supporting the reference.
    pub n_confident_ref_reads: u32,
    /// Reads confidently supporting another allele.
    pub n_confident_alt_reads: u32,
}

impl IndelSampleReportInfo {
    /// Sum of all confident reads, saturating at `u32::MAX`.
    pub fn total_confident_reads(&self) -> u32 {
        self.n_confident_indel_reads
            .saturating_add(self.n_confident_ref_reads)
            .saturating_add(self.n_confident_alt_reads)
    }
}

/// Indel allele under evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndelCandidate {
    /// Indel identity.
    pub key: IndelKey,
    /// Repeat context used for error-rate lookup.
    pub repeat_context: IndelRepeatContext,
    /// Confident read counts.
    pub sample_report: IndelSampleReportInfo,
    /// Emit the allele regardless of frequency.
    pub is_forced_output: bool,
}

/// One emitted allele at an indel locus.
#[derive(Debug, Clone, PartialEq)]
pub struct IndelAlleleInfo {
    /// Indel identity.
    pub key: IndelKey,
    /// Repeat context of the indel.
    pub repeat_context: IndelRepeatContext,
    /// Total confident reads at the locus.
    pub total_depth: u32,
    /// Confident reads supporting the indel.
    pub allele_count: u32,
    /// Quality of the allele call.
    pub gqx: i32,
}

impl IndelAlleleInfo {
    /// Fraction of confident reads supporting this indel.
    pub fn variant_frequency(&self) -> f64 {
        safe_frac(self.allele_count, self.total_depth)
    }
}

/// Call record of one indel locus.
#[derive(Debug, Clone, PartialEq)]
pub struct IndelLocusInfo {
    /// 0-based reference position.
    pub pos: u32,
    /// Per-sample call summaries.
    pub samples: Vec<SampleInfo>,
    /// Whether the locus is not essentially homozygous for one indel.
    pub is_het: bool,
    /// Emitted alleles, in insertion order.
    pub alt_alleles: Vec<IndelAlleleInfo>,
    /// Maximum genotype quality over samples.
    pub any_variant_allele_quality: i32,
    /// Locus filters.
    pub filters: FilterSet<LocusFilter>,
}

impl IndelLocusInfo {
    /// Empty locus record with `sample_count` samples.
    pub fn new(pos: u32, sample_count: usize) -> Self {
        Self {
            pos,
            samples: vec![SampleInfo::default(); sample_count],
            is_het: false,
            alt_alleles: Vec::new(),
            any_variant_allele_quality: 0,
            filters: FilterSet::new(),
        }
    }
}

/// Maximum sample gq, or 0 without samples.
pub(crate) fn max_sample_gq(samples: &[SampleInfo]) -> i32 {
    samples.iter().map(|sample| sample.gq).fold(0, i32::max)
}
