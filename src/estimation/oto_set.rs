use std::fmt::Write as _;
use std::path::Path;

use crate::error::OtoError;
use crate::types::OtoEntry;

/// Ordered collection of oto entries for one voicebank directory.
#[derive(Debug, Clone, Default)]
pub struct OtoSetBuilder {
    entries: Vec<OtoEntry>,
}

impl OtoSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: OtoEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = OtoEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[OtoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `file=alias,offset,consonant,cutoff,preutterance,overlap`, one per line.
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(
                out,
                "{}={},{},{},{},{},{}",
                entry.sample_filename,
                entry.alias,
                format_number(entry.offset),
                format_number(entry.consonant_boundary),
                format_number(entry.cutoff),
                format_number(entry.preutterance),
                format_number(entry.overlap),
            );
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<(), OtoError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| OtoError::io("create oto.ini directory", e))?;
            }
        }
        std::fs::write(path, self.to_ini_string()).map_err(|e| OtoError::io("write oto.ini", e))
    }
}

/// Shortest round-trip decimal, keeping a trailing `.0` on integral values and
/// switching to a two-digit signed exponent outside `[1e-4, 1e16)`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e16).contains(&magnitude) {
        let text = value.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{text}.0")
        }
    } else {
        let text = format!("{value:e}");
        let Some((mantissa, exponent)) = text.split_once('e') else {
            return text;
        };
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}
