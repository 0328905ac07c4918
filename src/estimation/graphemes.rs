use crate::types::Grapheme;

const MODIFIERS: &str = "ぁぃぅぇぉゃゅょっァィゥェォャュョッー";

/// Hiragana `ぁ`..=`ん`, katakana `ァ`..=`ン`, `ヴ`, and the long-vowel mark.
fn is_base(c: char) -> bool {
    matches!(c, 'ぁ'..='ん' | 'ァ'..='ン' | 'ヴ' | 'ー')
}

fn is_modifier(c: char) -> bool {
    MODIFIERS.contains(c)
}

/// Drops the reserved silence marker (first character) from a sample stem.
pub fn sample_identifier(stem: &str) -> &str {
    let mut chars = stem.chars();
    chars.next();
    chars.as_str()
}

/// Groups each base kana with the modifiers that directly follow it.
/// Any other character is dropped and ends the current group.
pub fn split_graphemes(identifier: &str) -> Vec<Grapheme> {
    let mut graphemes = Vec::new();
    let mut current = String::new();

    for c in identifier.chars() {
        if !current.is_empty() && is_modifier(c) {
            current.push(c);
            continue;
        }
        if !current.is_empty() {
            graphemes.push(Grapheme::new(std::mem::take(&mut current)));
        }
        if is_base(c) {
            current.push(c);
        }
    }
    if !current.is_empty() {
        graphemes.push(Grapheme::new(current));
    }

    graphemes
}

/// Phase-one transcript text handed to the aligner.
pub fn transcript_line(graphemes: &[Grapheme]) -> String {
    graphemes
        .iter()
        .map(|g| g.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
