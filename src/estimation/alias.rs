use std::collections::HashMap;

use crate::config::NumberingStrategy;
use crate::types::PhonemeSegment;

/// Aliases already handed out within one sample, in insertion order.
/// Stored values never carry the global suffix.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    aliases: Vec<String>,
    per_base: HashMap<String, usize>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, alias: &str) -> usize {
        self.aliases.iter().filter(|a| a.as_str() == alias).count()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn insert(&mut self, base: &str, alias: String) {
        *self.per_base.entry(base.to_string()).or_insert(0) += 1;
        self.aliases.push(alias);
    }

    fn base_uses(&self, base: &str) -> usize {
        self.per_base.get(base).copied().unwrap_or(0)
    }
}

/// VCV alias for a span: `- G` at the start of a sample, otherwise the
/// lowercased last phoneme of the previous span followed by `G`.
pub fn base_alias(grapheme: &str, previous_last: Option<&PhonemeSegment>) -> String {
    match previous_last {
        None => format!("- {grapheme}"),
        Some(prev) => format!("{} {grapheme}", prev.symbol.to_lowercase()),
    }
}

#[derive(Debug, Clone)]
pub struct AliasAllocator {
    suffix: String,
    /// Zero disables numbering.
    numbering_limit: usize,
    strategy: NumberingStrategy,
}

impl AliasAllocator {
    pub fn new(suffix: impl Into<String>, numbering_limit: usize, strategy: NumberingStrategy) -> Self {
        Self {
            suffix: suffix.into(),
            numbering_limit,
            strategy,
        }
    }

    /// Resolves `base` against the registry, records the unsuffixed result and
    /// returns the alias to write.
    pub fn allocate(&self, base: &str, registry: &mut AliasRegistry) -> String {
        let previous = match self.strategy {
            NumberingStrategy::Literal => registry.count(base),
            NumberingStrategy::PerBase => registry.base_uses(base),
        };

        let mut alias = base.to_string();
        let next = previous + 1;
        if previous > 0 && self.numbering_limit > 0 && next <= self.numbering_limit {
            alias.push_str(&next.to_string());
        }
        registry.insert(base, alias.clone());

        if !self.suffix.is_empty() {
            alias.push_str(&self.suffix);
        }
        alias
    }
}
