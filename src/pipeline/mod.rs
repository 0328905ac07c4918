pub mod builder;
pub mod defaults;
pub mod dictionary;
pub mod runtime;
pub mod traits;
