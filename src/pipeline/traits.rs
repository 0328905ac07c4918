use crate::types::Grapheme;

/// Pronunciation collaborator: the phones a grapheme is expected to occupy.
pub trait PronunciationLookup: Send + Sync {
    /// `None` when the grapheme is not in the dictionary.
    fn phones(&self, grapheme: &str) -> Option<Vec<String>>;
}

pub trait GraphemeSegmenter: Send + Sync {
    fn segment(&self, identifier: &str) -> Vec<Grapheme>;
}
