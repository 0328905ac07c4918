use crate::estimation::graphemes::split_graphemes;
use crate::pipeline::traits::GraphemeSegmenter;
use crate::types::Grapheme;

pub struct KanaSegmenter;

impl GraphemeSegmenter for KanaSegmenter {
    fn segment(&self, identifier: &str) -> Vec<Grapheme> {
        split_graphemes(identifier)
    }
}
