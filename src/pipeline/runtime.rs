use std::path::{Path, PathBuf};

use crate::config::OtoConfig;
use crate::error::OtoError;
use crate::estimation::alias::{base_alias, AliasAllocator, AliasRegistry};
use crate::estimation::graphemes::{sample_identifier, transcript_line};
use crate::estimation::label::{label_path, load_phonemes};
use crate::estimation::oto_set::OtoSetBuilder;
use crate::estimation::spans::assign_spans;
use crate::estimation::timing::synthesize;
use crate::pipeline::traits::{GraphemeSegmenter, PronunciationLookup};
use crate::types::{Grapheme, GraphemeSpan, OtoEntry, OtoStyle, PhonemeSegment, SampleOto};

/// Handed to the `estimate_voicebank_with` callback once per sample.
#[derive(Debug, Clone, Copy)]
pub struct SampleProgress<'a> {
    pub wav_path: &'a Path,
    pub sample: &'a SampleOto,
    /// Zero-based position in sorted sample order.
    pub index: usize,
    pub total: usize,
}

pub struct OtoEstimator {
    config: OtoConfig,
    segmenter: Box<dyn GraphemeSegmenter>,
    lookup: Box<dyn PronunciationLookup>,
}

pub(crate) struct OtoEstimatorParts {
    pub config: OtoConfig,
    pub segmenter: Box<dyn GraphemeSegmenter>,
    pub lookup: Box<dyn PronunciationLookup>,
}

impl OtoEstimator {
    pub(crate) fn from_parts(parts: OtoEstimatorParts) -> Self {
        Self {
            config: parts.config,
            segmenter: parts.segmenter,
            lookup: parts.lookup,
        }
    }

    pub fn config(&self) -> &OtoConfig {
        &self.config
    }

    /// Graphemes of a sample, from its file stem.
    pub fn graphemes(&self, stem: &str) -> Vec<Grapheme> {
        self.segmenter.segment(sample_identifier(stem))
    }

    /// Oto entries for one sample given its already-filtered phonemes.
    pub fn estimate_sample(
        &self,
        sample_filename: &str,
        phonemes: &[PhonemeSegment],
    ) -> Result<SampleOto, OtoError> {
        let stem = Path::new(sample_filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                OtoError::invalid_input(format!("cannot derive a stem from '{sample_filename}'"))
            })?;
        let graphemes = self.graphemes(stem);
        let spans = assign_spans(&graphemes, phonemes, self.lookup.as_ref())?;

        let unknown_graphemes = spans
            .iter()
            .filter(|span| span.is_empty())
            .map(|span| span.grapheme.clone())
            .collect();
        Ok(SampleOto {
            entries: self.entries_for_spans(sample_filename, &spans),
            unknown_graphemes,
        })
    }

    /// Timing and alias for every non-empty span, with a registry that lives
    /// only for this sample.
    pub fn entries_for_spans(&self, sample_filename: &str, spans: &[GraphemeSpan]) -> Vec<OtoEntry> {
        let allocator = AliasAllocator::new(
            self.config.alias_suffix.clone(),
            self.config.effective_numbering_limit(),
            self.config.numbering_strategy,
        );
        let mut registry = AliasRegistry::new();
        let mut previous_last: Option<&PhonemeSegment> = None;
        let mut entries = Vec::with_capacity(spans.len());

        for span in spans {
            let Some(timing) = synthesize(&span.phonemes, previous_last) else {
                continue;
            };
            let base = base_alias(&span.grapheme.text, previous_last);
            let alias = allocator.allocate(&base, &mut registry);
            tracing::debug!(
                sample = sample_filename,
                alias = alias.as_str(),
                phonemes = span.phonemes.len(),
                offset = timing.offset,
                preutterance = timing.preutterance,
                "oto: entry"
            );
            entries.push(OtoEntry {
                sample_filename: sample_filename.to_string(),
                alias,
                offset: timing.offset,
                overlap: timing.overlap,
                preutterance: timing.preutterance,
                consonant_boundary: timing.consonant_boundary,
                cutoff: timing.cutoff,
            });
            previous_last = span.phonemes.last();
        }
        entries
    }

    /// Reads the label exported for `wav_path` and estimates its entries.
    pub fn estimate_wav(&self, wav_path: &Path) -> Result<SampleOto, OtoError> {
        let (dir, stem, file_name) = split_wav_path(wav_path)?;
        let label = label_path(dir, stem, self.config.label_format);
        if !label.exists() {
            return Err(OtoError::invalid_input(format!(
                "missing label '{}' for sample '{file_name}'",
                label.display()
            )));
        }
        let phonemes = load_phonemes(&label, self.config.label_format)?;
        self.estimate_sample(file_name, &phonemes)
    }

    /// Every sample of a voicebank directory, in sorted file order.
    pub fn estimate_voicebank(
        &self,
        voicebank_dir: &Path,
        style: OtoStyle,
    ) -> Result<OtoSetBuilder, OtoError> {
        self.estimate_voicebank_with(voicebank_dir, style, |_| {})
    }

    /// Same as [`Self::estimate_voicebank`], calling `on_sample` after each
    /// sample is estimated.
    pub fn estimate_voicebank_with<F>(
        &self,
        voicebank_dir: &Path,
        style: OtoStyle,
        mut on_sample: F,
    ) -> Result<OtoSetBuilder, OtoError>
    where
        F: FnMut(SampleProgress<'_>),
    {
        if style == OtoStyle::Cvvc {
            return Err(OtoError::NotImplemented {
                feature: "CVVC oto.ini generation",
            });
        }
        let samples = list_samples(voicebank_dir)?;
        let mut builder = OtoSetBuilder::new();
        for (index, wav) in samples.iter().enumerate() {
            let sample = self.estimate_wav(wav).inspect_err(|_| {
                tracing::warn!(sample = %wav.display(), "oto: sample failed");
            })?;
            on_sample(SampleProgress {
                wav_path: wav,
                sample: &sample,
                index,
                total: samples.len(),
            });
            builder.extend(sample.entries);
        }
        tracing::info!(
            samples = samples.len(),
            entries = builder.len(),
            "oto: voicebank estimated"
        );
        Ok(builder)
    }

    pub fn output_path(&self, voicebank_dir: &Path) -> PathBuf {
        voicebank_dir.join(&self.config.output_file_name)
    }

    /// Writes `<stem>.txt` next to each sample with its space-separated
    /// graphemes, the transcript the aligner consumes. Returns the count.
    pub fn write_transcripts(&self, voicebank_dir: &Path) -> Result<usize, OtoError> {
        self.write_transcripts_with(voicebank_dir, |_, _| {})
    }

    /// Calls `on_written(transcript_path, total)` after each file.
    pub fn write_transcripts_with<F>(
        &self,
        voicebank_dir: &Path,
        mut on_written: F,
    ) -> Result<usize, OtoError>
    where
        F: FnMut(&Path, usize),
    {
        let samples = list_samples(voicebank_dir)?;
        for wav in &samples {
            let out = self.write_transcript(wav)?;
            on_written(&out, samples.len());
        }
        Ok(samples.len())
    }

    pub fn write_transcript(&self, wav_path: &Path) -> Result<PathBuf, OtoError> {
        let (dir, stem, _) = split_wav_path(wav_path)?;
        let graphemes = self.graphemes(stem);
        let out = dir.join(format!("{stem}.txt"));
        std::fs::write(&out, transcript_line(&graphemes))
            .map_err(|e| OtoError::io("write transcript", e))?;
        Ok(out)
    }
}

/// Sorted `.wav` files directly inside `voicebank_dir`. An empty directory is
/// an error: there is nothing to estimate.
pub fn list_samples(voicebank_dir: &Path) -> Result<Vec<PathBuf>, OtoError> {
    let entries = std::fs::read_dir(voicebank_dir)
        .map_err(|e| OtoError::io("read voicebank directory", e))?;
    let mut samples = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| OtoError::io("read voicebank directory entry", e))?
            .path();
        if path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
        {
            samples.push(path);
        }
    }
    if samples.is_empty() {
        return Err(OtoError::invalid_input(format!(
            "no wav files found in '{}'",
            voicebank_dir.display()
        )));
    }
    samples.sort();
    Ok(samples)
}

fn split_wav_path(wav_path: &Path) -> Result<(&Path, &str, &str), OtoError> {
    let invalid = || OtoError::invalid_input(format!("invalid sample path '{}'", wav_path.display()));
    let dir = wav_path.parent().ok_or_else(invalid)?;
    let stem = wav_path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    let file_name = wav_path.file_name().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    Ok((dir, stem, file_name))
}
