use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smallvar::calibration::{IndelErrorModel, IndelErrorRateType, RateSource};
use smallvar::calling::{
    poisson_qscore, strand_bias, ContinuousCallerOptions, DEFAULT_MAX_QSCORE, DEFAULT_MIN_QSCORE,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "smallvar", about = "Small-variant calling statistics")]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved indel error-rate table.
    IndelRates {
        /// Built-in model name (logLinear or adaptiveDefault).
        #[arg(long, default_value = "adaptiveDefault")]
        model: String,
        /// JSON model file; overrides --model.
        #[arg(long)]
        model_file: Option<PathBuf>,
        /// Print the candidate-selection rates instead of the report rates.
        #[arg(long)]
        candidate: bool,
        /// Largest repeat count to print (default: largest tabulated).
        #[arg(long)]
        max_repeat_count: Option<u32>,
    },
    /// Phred confidence that an allele count is not all basecall error.
    Qscore {
        /// Observed allele count.
        #[arg(long)]
        count: u32,
        /// Total coverage.
        #[arg(long)]
        coverage: u32,
        /// Assumed basecall quality.
        #[arg(long, default_value_t = DEFAULT_MIN_QSCORE)]
        quality: u32,
        /// Score cap.
        #[arg(long, default_value_t = DEFAULT_MAX_QSCORE)]
        max_qscore: i32,
    },
    /// Strand-bias statistic of an allele.
    StrandBias {
        /// Forward-strand reads supporting the allele.
        fwd_alt: u32,
        /// Reverse-strand reads supporting the allele.
        rev_alt: u32,
        /// Forward-strand reads supporting anything else.
        fwd_other: u32,
        /// Reverse-strand reads supporting anything else.
        rev_other: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("smallvar=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smallvar=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::IndelRates {
            model,
            model_file,
            candidate,
            max_repeat_count,
        } => run_indel_rates(&model, model_file, candidate, max_repeat_count)?,
        Commands::Qscore {
            count,
            coverage,
            quality,
            max_qscore,
        } => run_qscore(count, coverage, quality, max_qscore)?,
        Commands::StrandBias {
            fwd_alt,
            rev_alt,
            fwd_other,
            rev_other,
        } => run_strand_bias(fwd_alt, rev_alt, fwd_other, rev_other)?,
    }

    Ok(())
}

fn run_indel_rates(
    model_name: &str,
    model_file: Option<PathBuf>,
    candidate: bool,
    max_repeat_count: Option<u32>,
) -> Result<()> {
    let model = IndelErrorModel::new(model_name, model_file.as_deref()).with_context(|| {
        match &model_file {
            Some(path) => format!("failed to load indel error model from {}", path.display()),
            None => format!("failed to build indel error model '{}'", model_name),
        }
    })?;
    let source = if candidate {
        RateSource::Candidate
    } else {
        RateSource::Report
    };
    let rates = model.rates(source);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "#patternSize\trepeatCount\tinsertRate\tdeleteRate\tnoisyLocusRate")?;
    for pattern_size in rates.pattern_sizes() {
        let last = max_repeat_count
            .or_else(|| rates.max_repeat_count(pattern_size))
            .unwrap_or(1);
        debug!(pattern_size, last, "printing rate rows");
        for repeat_count in 1..=last {
            writeln!(
                out,
                "{}\t{}\t{:.6e}\t{:.6e}\t{:.6e}",
                pattern_size,
                repeat_count,
                rates.rate(pattern_size, repeat_count, IndelErrorRateType::Insert),
                rates.rate(pattern_size, repeat_count, IndelErrorRateType::Delete),
                rates.noisy_locus_rate(pattern_size, repeat_count),
            )?;
        }
    }
    Ok(())
}

fn run_qscore(count: u32, coverage: u32, quality: u32, max_qscore: i32) -> Result<()> {
    ContinuousCallerOptions::default()
        .with_min_qscore(quality)
        .with_max_qscore(max_qscore)
        .validate()
        .context("invalid qscore arguments")?;
    println!("{}", poisson_qscore(count, coverage, quality, max_qscore));
    Ok(())
}

fn run_strand_bias(fwd_alt: u32, rev_alt: u32, fwd_other: u32, rev_other: u32) -> Result<()> {
    let noise_floor = ContinuousCallerOptions::default().noise_floor;
    println!(
        "{:.6}",
        strand_bias(fwd_alt, rev_alt, fwd_other, rev_other, noise_floor)
    );
    Ok(())
}
