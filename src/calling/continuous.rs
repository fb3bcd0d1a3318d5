use tracing::trace;

use crate::types::{Base, BaseCall};

use super::locus::{
    max_sample_gq, FilterSet, IndelAlleleInfo, IndelCandidate, IndelLocusInfo, LocusFilter,
    SiteAlleleInfo, SiteLocusInfo,
};
use super::options::ContinuousCallerOptions;
use super::scoring::{poisson_qscore, safe_frac, strand_bias};
use super::OptionsError;

/// Per-strand tallies of calls matching and not matching one base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StrandTally {
    fwd_alt: u32,
    rev_alt: u32,
    fwd_other: u32,
    rev_other: u32,
}

impl StrandTally {
    fn from_pileup(pileup: &[BaseCall], base: Base) -> Self {
        let mut tally = Self::default();
        for call in pileup {
            match (call.is_fwd_strand, call.base == base) {
                (true, true) => tally.fwd_alt += 1,
                (true, false) => tally.fwd_other += 1,
                (false, true) => tally.rev_alt += 1,
                (false, false) => tally.rev_other += 1,
            }
        }
        tally
    }
}

/// Caller that reports every allele above a frequency floor without assuming
/// a diploid genotype.
#[derive(Debug, Clone)]
pub struct ContinuousVariantCaller {
    options: ContinuousCallerOptions,
}

impl ContinuousVariantCaller {
    /// Create a caller after validating `options`.
    pub fn new(options: ContinuousCallerOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Active options.
    pub fn options(&self) -> &ContinuousCallerOptions {
        &self.options
    }

    /// Call the alleles of one SNV site.
    ///
    /// `pileup` holds the filtered basecalls at the site and is used for the
    /// strand tallies; depth and allele counts come from `locus`. When no
    /// allele passes, a reference allele is emitted anyway so the locus still
    /// carries a call that filters can attach to.
    pub fn call_site(&self, pileup: &[BaseCall], locus: &mut SiteLocusInfo) {
        let total_depth = locus.total_depth();
        let forced = locus.is_forced_output;
        for base in Base::ALL {
            self.emit_site_allele(pileup, locus, base, total_depth, forced);
        }
        if locus.alt_alleles.is_empty() {
            let ref_base = locus.ref_base;
            self.emit_site_allele(pileup, locus, ref_base, total_depth, true);
        }

        locus.any_variant_allele_quality = max_sample_gq(&locus.samples);
        self.apply_quality_filter(locus.any_variant_allele_quality, &mut locus.filters);
    }

    fn emit_site_allele(
        &self,
        pileup: &[BaseCall],
        locus: &mut SiteLocusInfo,
        base: Base,
        total_depth: u32,
        forced: bool,
    ) {
        let allele_count = locus.allele_observation_count(base);
        let vf = safe_frac(allele_count, total_depth);
        let passes = vf > self.options.min_het_vf;
        if !(passes || forced) {
            return;
        }

        let gq = self.qscore(allele_count, total_depth);
        for sample in &mut locus.samples {
            sample.gq = gq;
        }

        let mut allele = SiteAlleleInfo {
            base,
            total_depth,
            allele_count,
            gqx: gq,
            strand_bias: None,
        };
        if base != locus.ref_base {
            locus.is_snp |= passes;
            let tally = StrandTally::from_pileup(pileup, base);
            let bias = strand_bias(
                tally.fwd_alt,
                tally.rev_alt,
                tally.fwd_other,
                tally.rev_other,
                self.options.noise_floor,
            );
            allele.strand_bias = Some(bias);
        }

        trace!(
            pos = locus.pos,
            base = %char::from(base.to_ascii()),
            vf,
            gq,
            "emitted site allele"
        );
        locus.alt_alleles.push(allele);
    }

    /// Add one indel allele to an indel locus.
    ///
    /// Alleles accumulate across calls; heterozygosity and locus quality are
    /// recomputed after each one.
    pub fn add_indel_call(&self, candidate: &IndelCandidate, locus: &mut IndelLocusInfo) {
        let report = &candidate.sample_report;
        let total_depth = report.total_confident_reads();
        let allele_count = report.n_confident_indel_reads;
        let vf = safe_frac(allele_count, total_depth);

        if vf > self.options.min_het_vf || candidate.is_forced_output {
            let gq = self.qscore(allele_count, total_depth);
            for sample in &mut locus.samples {
                sample.gq = gq;
            }
            trace!(pos = locus.pos, kind = ?candidate.key.kind, vf, gq, "emitted indel allele");
            locus.alt_alleles.push(IndelAlleleInfo {
                key: candidate.key.clone(),
                repeat_context: candidate.repeat_context,
                total_depth,
                allele_count,
                gqx: gq,
            });
        }

        if let Some(first) = locus.alt_alleles.first() {
            locus.is_het = locus.alt_alleles.len() > 1
                || first.variant_frequency() < 1.0 - self.options.min_het_vf;
        }

        locus.any_variant_allele_quality = max_sample_gq(&locus.samples);
        self.apply_quality_filter(locus.any_variant_allele_quality, &mut locus.filters);
    }

    fn qscore(&self, call_count: u32, coverage: u32) -> i32 {
        poisson_qscore(
            call_count,
            coverage,
            self.options.min_qscore,
            self.options.max_qscore,
        )
    }

    fn apply_quality_filter(&self, quality: i32, filters: &mut FilterSet<LocusFilter>) {
        if let Some(min_gqx) = self.options.min_gqx {
            if quality < min_gqx {
                filters.set(LocusFilter::LowGqx);
            } else {
                filters.unset(LocusFilter::LowGqx);
            }
        }
    }
}
