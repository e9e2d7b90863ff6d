use std::collections::HashMap;
use crate::engine::symbols::Symbol;

/// Occurrence count per symbol for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: HashMap<Symbol, u64>,
}

impl FrequencyMap {
    pub fn count<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut counts = HashMap::new();
        for symbol in symbols {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn from_text(text: &str) -> Self {
        Self::count(text.chars())
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted sequence.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries ordered by (count, symbol). Gives tree construction a stable
    /// seed order independent of hash iteration.
    pub fn sorted_by_count(&self) -> Vec<(Symbol, u64)> {
        let mut entries: Vec<(Symbol, u64)> = self.counts.iter().map(|(&s, &c)| (s, c)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

impl FromIterator<(Symbol, u64)> for FrequencyMap {
    fn from_iter<T: IntoIterator<Item = (Symbol, u64)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().filter(|&(_, c)| c > 0).collect(),
        }
    }
}
