//! Oto timing fields for one grapheme span.
//!
//! All three span-length regimes share one formula; they differ only in which
//! phoneme supplies the start reference (consonant/vowel boundary) and which
//! supplies the end reference (sustained vowel end).

use crate::types::PhonemeSegment;

/// Aligner time unit to oto milliseconds (HTK 100 ns ticks).
pub const UNIT: f64 = 1e-4;

/// Share of the previous phoneme's duration kept as lead-in before the offset.
const LEAD_IN_RATIO: f64 = 0.2;
/// Fraction of the reference end used for the cutoff and consonant area.
const SUSTAIN_RATIO: f64 = 0.8;
/// Share of the sustained region covered by the fixed consonant area.
const CONSONANT_RATIO: f64 = 0.2;
const OVERLAP_DIVISOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingValues {
    pub offset: f64,
    pub overlap: f64,
    pub preutterance: f64,
    pub consonant_boundary: f64,
    pub cutoff: f64,
}

impl TimingValues {
    pub fn is_finite(&self) -> bool {
        [
            self.offset,
            self.overlap,
            self.preutterance,
            self.consonant_boundary,
            self.cutoff,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// `(start_ref, end_ref)` indices into a span of `len` phonemes.
///
/// | len | start | end |
/// |-----|-------|-----|
/// | 1   | 0     | 0   |
/// | 2   | 1     | 1   |
/// | >2  | 1     | len-1 |
pub fn reference_indices(len: usize) -> (usize, usize) {
    match len {
        0 | 1 => (0, 0),
        2 => (1, 1),
        n => (1, n - 1),
    }
}

/// Computes timing for a non-empty span. `previous_last` is the last phoneme
/// of the closest earlier non-empty span, `None` for a sample's first span.
///
/// Returns `None` for an empty span.
pub fn synthesize(
    phonemes: &[PhonemeSegment],
    previous_last: Option<&PhonemeSegment>,
) -> Option<TimingValues> {
    let first = phonemes.first()?;
    let (start_idx, end_idx) = reference_indices(phonemes.len());
    let reference = &phonemes[start_idx];
    let reference_end = &phonemes[end_idx];

    let offset = match previous_last {
        None => first.start as f64 * UNIT,
        Some(prev) => (first.start as f64 - prev.duration() as f64 * LEAD_IN_RATIO) * UNIT,
    };

    let start_rel = reference.start as f64 * UNIT - offset;
    let end_rel = reference_end.end as f64 * UNIT - offset;

    let overlap = if previous_last.is_none() {
        0.0
    } else {
        start_rel / OVERLAP_DIVISOR
    };
    // Only single-phoneme first spans start at the offset; longer first spans
    // keep their consonant as preutterance.
    let preutterance = if previous_last.is_none() && phonemes.len() == 1 {
        0.0
    } else {
        start_rel
    };
    let consonant_boundary = start_rel + (end_rel * SUSTAIN_RATIO - start_rel) * CONSONANT_RATIO;
    let cutoff = -end_rel * SUSTAIN_RATIO;

    let values = TimingValues {
        offset,
        overlap,
        preutterance,
        consonant_boundary,
        cutoff,
    };
    debug_assert!(values.is_finite(), "non-finite oto timing: {values:?}");
    Some(values)
}
