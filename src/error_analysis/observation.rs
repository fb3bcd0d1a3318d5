use std::collections::BTreeMap;
use std::fmt;

use super::compress::{compress_int, COUNT_COMPRESSION_BITS};

/// Basecall error quality level (phred-scaled error probability).
pub type BasecallQuality = u16;

/// Quality level to count mapping.
pub type QualityCounts = BTreeMap<BasecallQuality, u32>;

/// Reference and alternate evidence observed on one strand.
///
/// The derived ordering is the total order used for strand
/// canonicalization: `ref_allele_count` first, then the alt map compared as
/// an ascending sequence of `(quality, count)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrandBasecallCounts {
    /// Reference allele reads (quality discarded).
    pub ref_allele_count: u32,
    /// Alternate allele reads per basecall quality level.
    pub alt_allele_count: QualityCounts,
}

impl StrandBasecallCounts {
    /// Lossy compression of every count to a fixed number of significant bits.
    pub fn compress_counts(&mut self) {
        self.ref_allele_count = compress_int(self.ref_allele_count, COUNT_COMPRESSION_BITS);
        for count in self.alt_allele_count.values_mut() {
            *count = compress_int(*count, COUNT_COMPRESSION_BITS);
        }
    }

    /// Whether the strand carries any alternate evidence.
    pub fn has_alt(&self) -> bool {
        !self.alt_allele_count.is_empty()
    }

    /// Total reads on this strand.
    pub fn depth(&self) -> u64 {
        u64::from(self.ref_allele_count)
            + self
                .alt_allele_count
                .values()
                .map(|&count| u64::from(count))
                .sum::<u64>()
    }
}

impl fmt::Display for StrandBasecallCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REF:\t{}\tALT:\t", self.ref_allele_count)?;
        for (idx, (quality, count)) in self.alt_allele_count.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", quality, count)?;
        }
        Ok(())
    }
}

/// Raw evidence at one site, before compression.
///
/// Index 0 of each array is the forward strand, index 1 the reverse strand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasecallErrorContextInputObservation {
    /// Reference allele reads per strand and quality level.
    pub ref_counts: [QualityCounts; 2],
    /// Alternate allele reads per strand and quality level.
    pub alt_counts: [QualityCounts; 2],
}

impl BasecallErrorContextInputObservation {
    /// Create an empty observation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one reference-allele basecall.
    pub fn add_ref_count(&mut self, is_fwd_strand: bool, quality: BasecallQuality) {
        *self.ref_counts[strand_index(is_fwd_strand)]
            .entry(quality)
            .or_insert(0) += 1;
    }

    /// Record one alternate-allele basecall.
    pub fn add_alt_count(&mut self, is_fwd_strand: bool, quality: BasecallQuality) {
        *self.alt_counts[strand_index(is_fwd_strand)]
            .entry(quality)
            .or_insert(0) += 1;
    }
}

fn strand_index(is_fwd_strand: bool) -> usize {
    if is_fwd_strand {
        0
    } else {
        1
    }
}

/// Compressed, strand-canonical observation pattern.
///
/// `strand0 >= strand1` always holds, so swapping which physical strand is
/// forward never changes the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BasecallErrorContextObservation {
    strand0: StrandBasecallCounts,
    strand1: StrandBasecallCounts,
}

impl BasecallErrorContextObservation {
    /// Compress and canonicalize a strand pair.
    ///
    /// With no alternate evidence on either strand, all reference evidence
    /// is folded onto strand 0 first.
    pub fn new(mut strand0: StrandBasecallCounts, mut strand1: StrandBasecallCounts) -> Self {
        if !strand0.has_alt() && !strand1.has_alt() {
            strand0.ref_allele_count += strand1.ref_allele_count;
            strand1.ref_allele_count = 0;
        }

        strand0.compress_counts();
        strand1.compress_counts();
        if strand0 < strand1 {
            std::mem::swap(&mut strand0, &mut strand1);
        }
        Self { strand0, strand1 }
    }

    /// Greater strand under the canonical order.
    pub fn strand0(&self) -> &StrandBasecallCounts {
        &self.strand0
    }

    /// Lesser strand under the canonical order.
    pub fn strand1(&self) -> &StrandBasecallCounts {
        &self.strand1
    }
}
