use std::path::Path;

use serde::Deserialize;

use crate::error::OtoError;

/// How repeated aliases within one sample are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingStrategy {
    /// Count bare-alias occurrences in the registry, which also stores
    /// numbered variants. A third repeat gets `2` again.
    #[default]
    Literal,
    /// Keep a counter per bare alias: `2`, `3`, `4`, ...
    PerBase,
}

/// Which aligner export the phoneme segments are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// `htk/phones/<stem>.lab`, integer 100 ns times.
    #[default]
    Htk,
    /// `textgrid/<stem>.TextGrid`, `phones` interval tier in seconds.
    TextGrid,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OtoConfig {
    pub generate_vcv: bool,
    pub generate_cvvc: bool,
    /// Appended to every alias on output; never stored in the alias registry.
    pub alias_suffix: String,
    pub number_duplicates: bool,
    pub numbering_limit: usize,
    pub numbering_strategy: NumberingStrategy,
    pub label_format: LabelFormat,
    pub output_file_name: String,
}

impl OtoConfig {
    pub const DEFAULT_NUMBERING_LIMIT: usize = 100;
    pub const DEFAULT_OUTPUT_FILE_NAME: &'static str = "oto-SOFAEstimation.ini";

    pub fn load(path: &Path) -> Result<Self, OtoError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| OtoError::io("read oto config", e))?;
        serde_json::from_str(&data).map_err(|e| OtoError::json("parse oto config", e))
    }

    /// Limit actually applied to numbering; zero when numbering is off.
    pub fn effective_numbering_limit(&self) -> usize {
        if self.number_duplicates {
            self.numbering_limit
        } else {
            0
        }
    }
}

impl Default for OtoConfig {
    fn default() -> Self {
        Self {
            generate_vcv: true,
            generate_cvvc: false,
            alias_suffix: String::new(),
            number_duplicates: false,
            numbering_limit: Self::DEFAULT_NUMBERING_LIMIT,
            numbering_strategy: NumberingStrategy::default(),
            label_format: LabelFormat::default(),
            output_file_name: Self::DEFAULT_OUTPUT_FILE_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oto_config_default() {
        let config = OtoConfig::default();
        assert!(config.generate_vcv);
        assert!(!config.generate_cvvc);
        assert!(config.alias_suffix.is_empty());
        assert!(!config.number_duplicates);
        assert_eq!(config.numbering_limit, 100);
        assert_eq!(config.numbering_strategy, NumberingStrategy::Literal);
        assert_eq!(config.label_format, LabelFormat::Htk);
        assert_eq!(config.output_file_name, "oto-SOFAEstimation.ini");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "alias_suffix": "_C4",
            "number_duplicates": true,
            "numbering_strategy": "per-base",
            "label_format": "textgrid"
        }"#;
        let config: OtoConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.alias_suffix, "_C4");
        assert!(config.number_duplicates);
        assert_eq!(config.numbering_limit, OtoConfig::DEFAULT_NUMBERING_LIMIT);
        assert_eq!(config.numbering_strategy, NumberingStrategy::PerBase);
        assert_eq!(config.label_format, LabelFormat::TextGrid);
        assert!(config.generate_vcv);
    }

    #[test]
    fn numbering_limit_is_zero_when_disabled() {
        let mut config = OtoConfig {
            numbering_limit: 7,
            ..OtoConfig::default()
        };
        assert_eq!(config.effective_numbering_limit(), 0);
        config.number_duplicates = true;
        assert_eq!(config.effective_numbering_limit(), 7);
    }
}
