use serde::{Deserialize, Serialize};

/// One mora-like unit of a sample name: a base kana plus trailing modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grapheme {
    pub text: String,
}

impl Grapheme {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeSegment {
    pub symbol: String,
    /// Interval start in the aligner's native unit (HTK labels: 100 ns).
    pub start: i64,
    /// Interval end, `start <= end`.
    pub end: i64,
}

impl PhonemeSegment {
    pub fn new(symbol: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }

    /// Saturates instead of overflowing on extreme timestamps.
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

/// The contiguous slice of a sample's phonemes assigned to one grapheme.
/// Empty when the grapheme was unknown to the pronunciation lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphemeSpan {
    pub grapheme: Grapheme,
    pub phonemes: Vec<PhonemeSegment>,
}

impl GraphemeSpan {
    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }
}

/// One oto.ini record. Timing fields are milliseconds; `cutoff` is negative,
/// i.e. measured back from the offset rather than from the file end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtoEntry {
    pub sample_filename: String,
    pub alias: String,
    pub offset: f64,
    pub overlap: f64,
    pub preutterance: f64,
    pub consonant_boundary: f64,
    pub cutoff: f64,
}

impl OtoEntry {
    pub fn is_finite(&self) -> bool {
        [
            self.offset,
            self.overlap,
            self.preutterance,
            self.consonant_boundary,
            self.cutoff,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

/// Entries produced for one sample, plus the graphemes skipped as unknown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleOto {
    pub entries: Vec<OtoEntry>,
    pub unknown_graphemes: Vec<Grapheme>,
}

/// Alias layout of the generated oto.ini.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtoStyle {
    Vcv,
    /// Consonant-vowel / vowel-consonant layout; not implemented yet.
    Cvvc,
}
