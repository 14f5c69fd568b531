use std::collections::HashMap;

/// Insertion-ordered frequency accumulator.
///
/// Analyzers fold their event slice through one of these exactly once;
/// ranking ties are broken by first-encounter order, which a bare HashMap
/// cannot provide.
#[derive(Debug, Default)]
pub struct FrequencyMap {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&mut self, key: &str) {
        self.bump_by(key, 1);
    }

    pub fn bump_by(&mut self, key: &str, amount: u64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by descending count; ties keep encounter order.
    pub fn sorted_desc(&self) -> Vec<(&str, u64)> {
        let mut out: Vec<(&str, u64)> = self.iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }
}
