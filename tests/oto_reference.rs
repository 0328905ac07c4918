use std::fs;
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;
use sofa_oto_rs::{OtoConfig, OtoEntry, OtoError, OtoEstimatorBuilder, PhonemeSegment};

const SUITE_NAME: &str = "oto_reference_matches_expected_entries";
const FIXTURE_DIR: &str = "test-data/oto_reference";
const DELTA: f64 = 1e-9;

#[derive(Debug, Deserialize)]
struct ReferenceCase {
    id: String,
    sample_filename: String,
    #[serde(default)]
    config: Option<OtoConfig>,
    phonemes: Vec<PhonemeSegment>,
    expected: Expected,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Expected {
    aliases: Option<Vec<String>>,
    entries: Option<Vec<ExpectedEntry>>,
    unknown_graphemes: Option<Vec<String>>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpectedEntry {
    alias: String,
    offset: f64,
    overlap: f64,
    preutterance: f64,
    consonant_boundary: f64,
    cutoff: f64,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let cases = match load_cases(&repo_root.join(FIXTURE_DIR)) {
        Ok(cases) if !cases.is_empty() => cases,
        Ok(_) => {
            run_setup_failure(&args, format!("No reference cases found under {FIXTURE_DIR}."));
            return;
        }
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };

    let tests = cases
        .into_iter()
        .map(|case| {
            let test_name = format!("{SUITE_NAME}::{}", case.id);
            Trial::test(test_name, move || run_case(&case).map_err(Failed::from))
        })
        .collect();

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn load_cases(dir: &Path) -> Result<Vec<ReferenceCase>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to read fixture directory '{}': {err}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("Failed to read entry in '{}': {err}", dir.display()))?
            .path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let data = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
            serde_json::from_str(&data)
                .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
        })
        .collect()
}

fn run_case(case: &ReferenceCase) -> Result<(), String> {
    let config = case.config.clone().unwrap_or_default();
    let estimator = OtoEstimatorBuilder::new(config)
        .build()
        .map_err(|err| format!("{}: build failed: {err}", case.id))?;
    let result = estimator.estimate_sample(&case.sample_filename, &case.phonemes);

    if let Some(expected_error) = &case.expected.error {
        return match result {
            Err(err) if error_kind(&err) == expected_error => Ok(()),
            Err(err) => Err(format!(
                "{}: expected error '{expected_error}', got '{}' ({err})",
                case.id,
                error_kind(&err)
            )),
            Ok(sample) => Err(format!(
                "{}: expected error '{expected_error}', got {} entries",
                case.id,
                sample.entries.len()
            )),
        };
    }

    let sample = result.map_err(|err| format!("{}: estimate_sample() failed: {err}", case.id))?;

    for entry in &sample.entries {
        if !entry.is_finite() {
            return Err(format!("{}: non-finite entry {entry:?}", case.id));
        }
        if entry.sample_filename != case.sample_filename {
            return Err(format!(
                "{}: entry filename '{}' differs from sample",
                case.id, entry.sample_filename
            ));
        }
    }

    if let Some(aliases) = &case.expected.aliases {
        let observed: Vec<&str> = sample.entries.iter().map(|e| e.alias.as_str()).collect();
        if observed != *aliases {
            return Err(format!(
                "{}: alias mismatch (expected {aliases:?}, got {observed:?})",
                case.id
            ));
        }
    }

    if let Some(unknown) = &case.expected.unknown_graphemes {
        let observed: Vec<&str> = sample
            .unknown_graphemes
            .iter()
            .map(|g| g.text.as_str())
            .collect();
        if observed != *unknown {
            return Err(format!(
                "{}: unknown grapheme mismatch (expected {unknown:?}, got {observed:?})",
                case.id
            ));
        }
    }

    if let Some(expected_entries) = &case.expected.entries {
        compare_entries(&case.id, expected_entries, &sample.entries)?;
    }
    Ok(())
}

fn compare_entries(id: &str, expected: &[ExpectedEntry], observed: &[OtoEntry]) -> Result<(), String> {
    if expected.len() != observed.len() {
        return Err(format!(
            "{id}: entry count mismatch (expected {}, got {})",
            expected.len(),
            observed.len()
        ));
    }
    for (idx, (exp, obs)) in expected.iter().zip(observed).enumerate() {
        if exp.alias != obs.alias {
            return Err(format!(
                "{id}: alias mismatch at index {idx} (expected '{}', got '{}')",
                exp.alias, obs.alias
            ));
        }
        let fields = [
            ("offset", exp.offset, obs.offset),
            ("overlap", exp.overlap, obs.overlap),
            ("preutterance", exp.preutterance, obs.preutterance),
            ("consonant_boundary", exp.consonant_boundary, obs.consonant_boundary),
            ("cutoff", exp.cutoff, obs.cutoff),
        ];
        for (name, want, got) in fields {
            if (want - got).abs() > DELTA {
                return Err(format!(
                    "{id}: {name} mismatch at index {idx} (expected {want}, got {got})"
                ));
            }
        }
    }
    Ok(())
}

fn error_kind(err: &OtoError) -> &'static str {
    match err {
        OtoError::Io { .. } => "io",
        OtoError::Json { .. } => "json",
        OtoError::Label { .. } => "label",
        OtoError::AlignmentMismatch { .. } => "alignment_mismatch",
        OtoError::NotImplemented { .. } => "not_implemented",
        OtoError::InvalidInput { .. } => "invalid_input",
    }
}
