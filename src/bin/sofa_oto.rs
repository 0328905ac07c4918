use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use sofa_oto_rs::{
    LabelFormat, NumberingStrategy, OtoConfig, OtoError, OtoEstimator,
    OtoEstimatorBuilder, OtoSetBuilder, OtoStyle,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LabelChoice {
    Htk,
    #[value(name = "textgrid")]
    TextGrid,
}

impl From<LabelChoice> for LabelFormat {
    fn from(choice: LabelChoice) -> Self {
        match choice {
            LabelChoice::Htk => LabelFormat::Htk,
            LabelChoice::TextGrid => LabelFormat::TextGrid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NumberingChoice {
    /// Counts bare aliases only, so a third repeat gets 2 again.
    Literal,
    PerBase,
}

impl From<NumberingChoice> for NumberingStrategy {
    fn from(choice: NumberingChoice) -> Self {
        match choice {
            NumberingChoice::Literal => NumberingStrategy::Literal,
            NumberingChoice::PerBase => NumberingStrategy::PerBase,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sofa_oto")]
#[command(version, about = "Use SOFA forced-alignment labels to estimate oto.ini")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write `<stem>.txt` grapheme transcripts for the aligner.
    Prepare(CommonArgs),
    /// Build oto-SOFAEstimation.ini from the aligner's phone labels.
    Estimate(EstimateArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Voicebank directory holding the .wav samples.
    voicebank_dir: PathBuf,
    /// JSON file with kana → phones entries layered over the built-in table.
    #[arg(long, env = "SOFA_OTO_DICTIONARY")]
    dictionary: Option<PathBuf>,
    /// JSON oto configuration; command-line flags override its values.
    #[arg(long, env = "SOFA_OTO_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct EstimateArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Skip VCV generation.
    #[arg(long, env = "SOFA_OTO_NO_VCV", default_value_t = false)]
    no_vcv: bool,
    /// Request CVVC generation (not implemented; reported and skipped).
    #[arg(long, env = "SOFA_OTO_CVVC", default_value_t = false)]
    cvvc: bool,
    /// Suffix appended to every alias.
    #[arg(long, env = "SOFA_OTO_SUFFIX")]
    suffix: Option<String>,
    /// Number duplicate aliases within a sample.
    #[arg(long, env = "SOFA_OTO_NUMBER_DUPLICATES", default_value_t = false)]
    number_duplicates: bool,
    /// Highest number appended to a duplicate alias.
    #[arg(long, env = "SOFA_OTO_NUMBERING_LIMIT")]
    numbering_limit: Option<usize>,
    #[arg(long, env = "SOFA_OTO_NUMBERING", value_enum)]
    numbering: Option<NumberingChoice>,
    #[arg(long, env = "SOFA_OTO_LABEL_FORMAT", value_enum)]
    label_format: Option<LabelChoice>,
    /// Output file name inside the voicebank directory.
    #[arg(long, env = "SOFA_OTO_OUTPUT")]
    output: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(message) = run(Cli::parse()) {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Prepare(args) => prepare(&args),
        Command::Estimate(args) => estimate(&args),
    }
}

fn prepare(args: &CommonArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let estimator = build_estimator(config, args)?;

    let progress = progress_bar(0);
    let written = estimator
        .write_transcripts_with(&args.voicebank_dir, |transcript, total| {
            progress.set_length(total as u64);
            progress.set_message(display_name(transcript));
            progress.inc(1);
        })
        .map_err(|err| err.to_string())?;
    progress.finish_with_message("transcripts written");
    println!(
        "Wrote {written} transcript file(s) in '{}'.",
        args.voicebank_dir.display()
    );
    Ok(())
}

fn estimate(args: &EstimateArgs) -> Result<(), String> {
    let mut config = load_config(args.common.config.as_deref())?;
    apply_overrides(&mut config, args);
    let estimator = build_estimator(config, &args.common)?;
    let voicebank_dir = &args.common.voicebank_dir;

    if estimator.config().generate_vcv {
        let builder = estimate_vcv(&estimator, voicebank_dir)?;
        let out_path = estimator.output_path(voicebank_dir);
        builder
            .write(&out_path)
            .map_err(|err| format!("{}: {err}", out_path.display()))?;
        println!("{}", out_path.display());
    }

    if estimator.config().generate_cvvc {
        match estimator.estimate_voicebank(voicebank_dir, OtoStyle::Cvvc) {
            Err(OtoError::NotImplemented { feature }) => {
                tracing::warn!("{feature} is not supported yet; skipped");
            }
            Err(err) => return Err(err.to_string()),
            Ok(_) => {}
        }
    }
    Ok(())
}

fn estimate_vcv(estimator: &OtoEstimator, voicebank_dir: &Path) -> Result<OtoSetBuilder, String> {
    let mut skipped_graphemes = 0usize;

    let progress = progress_bar(0);
    let builder = estimator
        .estimate_voicebank_with(voicebank_dir, OtoStyle::Vcv, |done| {
            progress.set_length(done.total as u64);
            progress.set_message(display_name(done.wav_path));
            skipped_graphemes += done.sample.unknown_graphemes.len();
            progress.inc(1);
        })
        .map_err(|err| err.to_string())?;
    progress.finish_with_message("oto estimation complete");

    if skipped_graphemes > 0 {
        tracing::warn!(skipped_graphemes, "graphemes missing from the dictionary were skipped");
    }
    Ok(builder)
}

fn load_config(path: Option<&Path>) -> Result<OtoConfig, String> {
    match path {
        Some(path) => OtoConfig::load(path).map_err(|err| format!("{}: {err}", path.display())),
        None => Ok(OtoConfig::default()),
    }
}

fn apply_overrides(config: &mut OtoConfig, args: &EstimateArgs) {
    if args.no_vcv {
        config.generate_vcv = false;
    }
    if args.cvvc {
        config.generate_cvvc = true;
    }
    if let Some(suffix) = &args.suffix {
        config.alias_suffix = suffix.clone();
    }
    if args.number_duplicates {
        config.number_duplicates = true;
    }
    if let Some(limit) = args.numbering_limit {
        config.numbering_limit = limit;
    }
    if let Some(numbering) = args.numbering {
        config.numbering_strategy = numbering.into();
    }
    if let Some(label_format) = args.label_format {
        config.label_format = label_format.into();
    }
    if let Some(output) = &args.output {
        config.output_file_name = output.clone();
    }
}

fn build_estimator(config: OtoConfig, args: &CommonArgs) -> Result<OtoEstimator, String> {
    let mut builder = OtoEstimatorBuilder::new(config);
    if let Some(path) = &args.dictionary {
        builder = builder.with_dictionary_path(path);
    }
    builder
        .build()
        .map_err(|err| format!("Failed to build oto estimator: {err}"))
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");
    progress
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
