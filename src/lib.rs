pub mod config;
pub mod error;
pub mod estimation;
pub mod pipeline;
pub mod types;

pub use config::{LabelFormat, NumberingStrategy, OtoConfig};
pub use error::OtoError;
pub use estimation::oto_set::OtoSetBuilder;
pub use estimation::timing::UNIT;
pub use pipeline::builder::OtoEstimatorBuilder;
pub use pipeline::dictionary::KanaDictionary;
pub use pipeline::runtime::{list_samples, OtoEstimator, SampleProgress};
pub use pipeline::traits::{GraphemeSegmenter, PronunciationLookup};
pub use types::{Grapheme, GraphemeSpan, OtoEntry, OtoStyle, PhonemeSegment, SampleOto};
