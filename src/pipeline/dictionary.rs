use std::collections::HashMap;
use std::path::Path;

use crate::error::OtoError;
use crate::pipeline::traits::PronunciationLookup;

/// Hiragana pronunciations in the OpenJTalk phone set. Katakana is folded to
/// hiragana before lookup.
#[rustfmt::skip]
const BUILTIN_KANA: &[(&str, &str)] = &[
    ("あ", "a"), ("い", "i"), ("う", "u"), ("え", "e"), ("お", "o"),
    ("か", "k a"), ("き", "k i"), ("く", "k u"), ("け", "k e"), ("こ", "k o"),
    ("が", "g a"), ("ぎ", "g i"), ("ぐ", "g u"), ("げ", "g e"), ("ご", "g o"),
    ("さ", "s a"), ("し", "sh i"), ("す", "s u"), ("せ", "s e"), ("そ", "s o"),
    ("ざ", "z a"), ("じ", "j i"), ("ず", "z u"), ("ぜ", "z e"), ("ぞ", "z o"),
    ("た", "t a"), ("ち", "ch i"), ("つ", "ts u"), ("て", "t e"), ("と", "t o"),
    ("だ", "d a"), ("ぢ", "j i"), ("づ", "z u"), ("で", "d e"), ("ど", "d o"),
    ("な", "n a"), ("に", "n i"), ("ぬ", "n u"), ("ね", "n e"), ("の", "n o"),
    ("は", "h a"), ("ひ", "h i"), ("ふ", "f u"), ("へ", "h e"), ("ほ", "h o"),
    ("ば", "b a"), ("び", "b i"), ("ぶ", "b u"), ("べ", "b e"), ("ぼ", "b o"),
    ("ぱ", "p a"), ("ぴ", "p i"), ("ぷ", "p u"), ("ぺ", "p e"), ("ぽ", "p o"),
    ("ま", "m a"), ("み", "m i"), ("む", "m u"), ("め", "m e"), ("も", "m o"),
    ("や", "y a"), ("ゆ", "y u"), ("よ", "y o"),
    ("ら", "r a"), ("り", "r i"), ("る", "r u"), ("れ", "r e"), ("ろ", "r o"),
    ("わ", "w a"), ("を", "o"), ("ん", "N"), ("ゔ", "v u"),
    ("ぁ", "a"), ("ぃ", "i"), ("ぅ", "u"), ("ぇ", "e"), ("ぉ", "o"),
    ("ゃ", "y a"), ("ゅ", "y u"), ("ょ", "y o"), ("ゎ", "w a"), ("っ", "cl"),
    ("きゃ", "ky a"), ("きゅ", "ky u"), ("きぇ", "ky e"), ("きょ", "ky o"),
    ("ぎゃ", "gy a"), ("ぎゅ", "gy u"), ("ぎぇ", "gy e"), ("ぎょ", "gy o"),
    ("しゃ", "sh a"), ("しゅ", "sh u"), ("しぇ", "sh e"), ("しょ", "sh o"),
    ("じゃ", "j a"), ("じゅ", "j u"), ("じぇ", "j e"), ("じょ", "j o"),
    ("ちゃ", "ch a"), ("ちゅ", "ch u"), ("ちぇ", "ch e"), ("ちょ", "ch o"),
    ("にゃ", "ny a"), ("にゅ", "ny u"), ("にぇ", "ny e"), ("にょ", "ny o"),
    ("ひゃ", "hy a"), ("ひゅ", "hy u"), ("ひぇ", "hy e"), ("ひょ", "hy o"),
    ("びゃ", "by a"), ("びゅ", "by u"), ("びぇ", "by e"), ("びょ", "by o"),
    ("ぴゃ", "py a"), ("ぴゅ", "py u"), ("ぴぇ", "py e"), ("ぴょ", "py o"),
    ("みゃ", "my a"), ("みゅ", "my u"), ("みぇ", "my e"), ("みょ", "my o"),
    ("りゃ", "ry a"), ("りゅ", "ry u"), ("りぇ", "ry e"), ("りょ", "ry o"),
    ("ふぁ", "f a"), ("ふぃ", "f i"), ("ふぇ", "f e"), ("ふぉ", "f o"), ("ふゅ", "fy u"),
    ("てぃ", "t i"), ("とぅ", "t u"), ("でぃ", "d i"), ("どぅ", "d u"),
    ("てゅ", "ty u"), ("でゅ", "dy u"),
    ("うぃ", "w i"), ("うぇ", "w e"), ("うぉ", "w o"), ("いぇ", "y e"),
    ("すぃ", "s i"), ("ずぃ", "z i"),
    ("つぁ", "ts a"), ("つぃ", "ts i"), ("つぇ", "ts e"), ("つぉ", "ts o"),
    ("ゔぁ", "v a"), ("ゔぃ", "v i"), ("ゔぇ", "v e"), ("ゔぉ", "v o"), ("ゔゅ", "vy u"),
];

const VOWELS: [&str; 5] = ["a", "i", "u", "e", "o"];
const SMALL_KANA: &str = "ぁぃぅぇぉゃゅょゎ";

/// Kana-to-phone dictionary: a built-in table, optionally extended from JSON.
#[derive(Debug, Clone)]
pub struct KanaDictionary {
    entries: HashMap<String, Vec<String>>,
}

impl KanaDictionary {
    pub fn builtin() -> Self {
        let entries = BUILTIN_KANA
            .iter()
            .map(|(kana, phones)| (kana.to_string(), split_phones(phones)))
            .collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Built-in table with the entries of a `{ "kana": "p h o n e s" }` JSON
    /// file layered on top.
    pub fn load(path: &Path) -> Result<Self, OtoError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| OtoError::io("read pronunciation dictionary", e))?;
        let raw: HashMap<String, String> = serde_json::from_str(&data)
            .map_err(|e| OtoError::json("parse pronunciation dictionary", e))?;
        let mut dictionary = Self::builtin();
        dictionary.extend(raw);
        Ok(dictionary)
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        for (kana, phones) in entries {
            let phones = split_phones(&phones);
            if phones.is_empty() {
                tracing::warn!(kana = kana.as_str(), "dictionary entry has no phones; skipped");
                continue;
            }
            self.entries.insert(fold_katakana(&kana), phones);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw phones for a grapheme, before palatalization is stripped.
    /// Trailing `っ` becomes `cl`, `ー` repeats the last vowel and a small
    /// kana adds its own phones (`かぁ` -> `k a a`).
    pub fn raw_phones(&self, grapheme: &str) -> Option<Vec<String>> {
        let folded = fold_katakana(grapheme);
        if let Some(phones) = self.entries.get(&folded) {
            return Some(phones.clone());
        }

        // Longest dictionary prefix, then only sokuon, long-vowel and small kana.
        let (prefix_len, mut phones) = folded
            .char_indices()
            .map(|(idx, c)| idx + c.len_utf8())
            .rev()
            .find_map(|end| self.entries.get(&folded[..end]).map(|p| (end, p.clone())))?;

        for c in folded[prefix_len..].chars() {
            match c {
                'っ' => phones.push("cl".to_string()),
                'ー' => {
                    let vowel = phones
                        .iter()
                        .rev()
                        .find(|p| VOWELS.contains(&p.as_str()))?
                        .clone();
                    phones.push(vowel);
                }
                c if SMALL_KANA.contains(c) => {
                    let mut buf = [0u8; 4];
                    let small = self.entries.get(&*c.encode_utf8(&mut buf))?;
                    phones.extend(small.iter().cloned());
                }
                _ => return None,
            }
        }
        Some(phones)
    }
}

impl Default for KanaDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PronunciationLookup for KanaDictionary {
    fn phones(&self, grapheme: &str) -> Option<Vec<String>> {
        self.raw_phones(grapheme).map(strip_palatalization)
    }
}

/// `ky a` -> `k a`: the aligner folds the palatal glide into the vowel unit.
/// Only the trailing `y` of a multi-letter consonant is removed.
pub fn strip_palatalization(phones: Vec<String>) -> Vec<String> {
    phones
        .into_iter()
        .map(|phone| match phone.strip_suffix('y') {
            Some(base) if !base.is_empty() => base.to_string(),
            _ => phone,
        })
        .collect()
}

fn split_phones(phones: &str) -> Vec<String> {
    phones.split_whitespace().map(str::to_string).collect()
}

/// Maps katakana `ァ`..=`ヶ` onto the matching hiragana code points.
fn fold_katakana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}
