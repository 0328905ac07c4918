use std::path::PathBuf;

use crate::config::OtoConfig;
use crate::error::OtoError;
use crate::pipeline::defaults::KanaSegmenter;
use crate::pipeline::dictionary::KanaDictionary;
use crate::pipeline::runtime::{OtoEstimator, OtoEstimatorParts};
use crate::pipeline::traits::{GraphemeSegmenter, PronunciationLookup};

pub struct OtoEstimatorBuilder {
    config: OtoConfig,
    dictionary_path: Option<PathBuf>,
    segmenter: Option<Box<dyn GraphemeSegmenter>>,
    lookup: Option<Box<dyn PronunciationLookup>>,
}

impl OtoEstimatorBuilder {
    pub fn new(config: OtoConfig) -> Self {
        Self {
            config,
            dictionary_path: None,
            segmenter: None,
            lookup: None,
        }
    }

    /// JSON dictionary merged over the built-in kana table. Ignored when a
    /// lookup is injected with [`Self::with_lookup`].
    pub fn with_dictionary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary_path = Some(path.into());
        self
    }

    pub fn with_segmenter(mut self, segmenter: Box<dyn GraphemeSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn with_lookup(mut self, lookup: Box<dyn PronunciationLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn build(self) -> Result<OtoEstimator, OtoError> {
        if self.config.output_file_name.trim().is_empty() {
            return Err(OtoError::invalid_input("output file name must not be empty"));
        }
        if self.config.number_duplicates && self.config.numbering_limit == 0 {
            tracing::warn!("duplicate numbering is enabled with a limit of 0; no alias will be numbered");
        }

        let lookup = match (self.lookup, self.dictionary_path) {
            (Some(lookup), _) => lookup,
            (None, Some(path)) => {
                let dictionary = KanaDictionary::load(&path)?;
                tracing::info!(
                    path = %path.display(),
                    entries = dictionary.len(),
                    "loaded pronunciation dictionary"
                );
                Box::new(dictionary) as Box<dyn PronunciationLookup>
            }
            (None, None) => Box::new(KanaDictionary::builtin()),
        };

        Ok(OtoEstimator::from_parts(OtoEstimatorParts {
            config: self.config,
            segmenter: self.segmenter.unwrap_or_else(|| Box::new(KanaSegmenter)),
            lookup,
        }))
    }
}
