use crate::error::OtoError;
use crate::estimation::cursor::AlignmentCursor;
use crate::pipeline::traits::PronunciationLookup;
use crate::types::{Grapheme, GraphemeSpan, PhonemeSegment};


/// Greedily hands each grapheme as many segments as its pronunciation has
/// phones. Unknown graphemes get an empty span and leave the cursor alone.
pub fn assign_spans(
    graphemes: &[Grapheme],
    phonemes: &[PhonemeSegment],
    lookup: &dyn PronunciationLookup,
) -> Result<Vec<GraphemeSpan>, OtoError> {
    let mut cursor = AlignmentCursor::new(phonemes);
    let mut spans = Vec::with_capacity(graphemes.len());

    for grapheme in graphemes {
        let Some(phones) = lookup.phones(&grapheme.text) else {
            tracing::warn!(
                grapheme = grapheme.text.as_str(),
                "grapheme is not in the dictionary; ignored"
            );
            spans.push(GraphemeSpan {
                grapheme: grapheme.clone(),
                phonemes: Vec::new(),
            });
            continue;
        };

        let taken = cursor
            .advance(phones.len())
            .map_err(|mismatch| OtoError::AlignmentMismatch {
                grapheme: grapheme.text.clone(),
                requested: mismatch.requested,
                remaining: mismatch.remaining,
            })?;
        tracing::debug!(
            grapheme = grapheme.text.as_str(),
            phones = ?phones,
            aligned = ?taken.iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>(),
            "spans: assigned"
        );
        spans.push(GraphemeSpan {
            grapheme: grapheme.clone(),
            phonemes: taken.to_vec(),
        });
    }

    if cursor.remaining() > 0 {
        tracing::warn!(
            leftover = cursor.remaining(),
            symbols = ?cursor.rest().iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>(),
            "phoneme segments left over after the last grapheme"
        );
    }

    Ok(spans)
}
