use smallvar::calling::{
    poisson_qscore, strand_bias, ContinuousCallerOptions, ContinuousVariantCaller, IndelCandidate,
    IndelLocusInfo, IndelSampleReportInfo, LocusFilter, SiteLocusInfo,
};
use smallvar::types::{Base, BaseCall, IndelKey, IndelRepeatContext};
use test_case::test_case;

fn pileup_from(spec: &str) -> Vec<BaseCall> {
    // Uppercase letters are forward-strand calls, lowercase reverse-strand.
    spec.bytes()
        .filter_map(|b| Base::from_ascii(b).map(|base| BaseCall::new(base, b.is_ascii_uppercase())))
        .collect()
}

fn locus_from(ref_base: Base, pileup: &[BaseCall], samples: usize) -> SiteLocusInfo {
    let mut locus = SiteLocusInfo::new(1_234, ref_base, samples);
    for call in pileup {
        locus.allele_observation_counts[call.base.index()] += 1;
    }
    locus
}

#[test]
fn zero_depth_emits_one_forced_reference_call() {
    let caller = ContinuousVariantCaller::new(ContinuousCallerOptions::default()).unwrap();
    for ref_base in Base::ALL {
        let mut locus = SiteLocusInfo::new(0, ref_base, 1);
        caller.call_site(&[], &mut locus);
        assert_eq!(locus.alt_alleles.len(), 1);
        assert_eq!(locus.alt_alleles[0].base, ref_base);
        assert_eq!(locus.alt_alleles[0].gqx, 0);
        assert_eq!(locus.any_variant_allele_quality, 0);
    }
}

#[test]
fn low_frequency_alt_is_still_called_above_floor() {
    // 3 T calls out of 100: frequency 0.03 clears the default 0.01 floor.
    let mut spec = "A".repeat(48) + &"a".repeat(49);
    spec.push_str("TTt");
    let pileup = pileup_from(&spec);
    let mut locus = locus_from(Base::A, &pileup, 1);

    let caller = ContinuousVariantCaller::new(ContinuousCallerOptions::default()).unwrap();
    caller.call_site(&pileup, &mut locus);

    assert!(locus.is_snp);
    let alt = locus
        .alt_alleles
        .iter()
        .find(|allele| allele.base == Base::T)
        .expect("T allele emitted");
    assert_eq!(alt.allele_count, 3);
    assert_eq!(alt.gqx, poisson_qscore(3, 100, 17, 40));
    let expected_bias = strand_bias(2, 1, 48, 49, 0.005);
    assert_eq!(alt.strand_bias, Some(expected_bias));
}

#[test]
fn raised_floor_drops_the_alt_and_snp_flag() {
    let mut spec = "C".repeat(97);
    spec.push_str("GGG");
    let pileup = pileup_from(&spec);
    let mut locus = locus_from(Base::C, &pileup, 1);

    let options = ContinuousCallerOptions::default().with_min_het_vf(0.05);
    ContinuousVariantCaller::new(options)
        .unwrap()
        .call_site(&pileup, &mut locus);

    assert!(!locus.is_snp);
    assert_eq!(locus.alt_alleles.len(), 1);
    assert_eq!(locus.alt_alleles[0].base, Base::C);
}

#[test]
fn every_sample_receives_a_quality() {
    let pileup = pileup_from(&"G".repeat(30));
    let mut locus = locus_from(Base::G, &pileup, 3);
    ContinuousVariantCaller::new(ContinuousCallerOptions::default())
        .unwrap()
        .call_site(&pileup, &mut locus);

    assert!(locus.samples.iter().all(|sample| sample.gq == 40));
    assert_eq!(locus.any_variant_allele_quality, 40);
}

#[test]
fn quality_filter_is_applied_per_locus() {
    let options = ContinuousCallerOptions::default().with_min_gqx(30);
    let caller = ContinuousVariantCaller::new(options).unwrap();

    let deep = pileup_from(&"T".repeat(40));
    let mut confident = locus_from(Base::T, &deep, 1);
    caller.call_site(&deep, &mut confident);
    assert!(confident.filters.is_empty());

    let mut empty = SiteLocusInfo::new(9, Base::T, 1);
    caller.call_site(&[], &mut empty);
    assert!(empty.filters.contains(LocusFilter::LowGqx));
}

fn candidate(key: IndelKey, indel_reads: u32, ref_reads: u32) -> IndelCandidate {
    IndelCandidate {
        key,
        repeat_context: IndelRepeatContext::new(1, 5, 6),
        sample_report: IndelSampleReportInfo {
            n_confident_indel_reads: indel_reads,
            n_confident_ref_reads: ref_reads,
            n_confident_alt_reads: 0,
        },
        is_forced_output: false,
    }
}

#[test_case(20, 0 => false ; "all reads support the indel")]
#[test_case(199, 1 => false ; "frequency above the homozygous bound")]
#[test_case(90, 10 => true ; "frequency below the homozygous bound")]
#[test_case(5, 15 => true ; "minor indel")]
fn single_indel_heterozygosity(indel_reads: u32, ref_reads: u32) -> bool {
    let caller = ContinuousVariantCaller::new(ContinuousCallerOptions::default()).unwrap();
    let mut locus = IndelLocusInfo::new(77, 1);
    caller.add_indel_call(
        &candidate(IndelKey::insertion(77, "T"), indel_reads, ref_reads),
        &mut locus,
    );
    assert_eq!(locus.alt_alleles.len(), 1);
    locus.is_het
}

#[test]
fn indel_locus_quality_tracks_samples() {
    let caller = ContinuousVariantCaller::new(ContinuousCallerOptions::default()).unwrap();
    let mut locus = IndelLocusInfo::new(77, 2);
    caller.add_indel_call(&candidate(IndelKey::deletion(77, 3), 4, 36), &mut locus);

    let expected = poisson_qscore(4, 40, 17, 40);
    assert_eq!(locus.alt_alleles[0].gqx, expected);
    assert!(locus.samples.iter().all(|sample| sample.gq == expected));
    assert_eq!(locus.any_variant_allele_quality, expected);
    assert!((locus.alt_alleles[0].variant_frequency() - 0.1).abs() < 1e-12);
}
