//! Named event counters

use std::collections::BTreeMap;

/// Monotonic counters keyed by static names. Reports come out sorted by name.
#[derive(Default)]
pub struct Counters {
    counters: BTreeMap<&'static str, u64>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, value: u64) {
        *self.counters.entry(name).or_insert(0) += value;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.counters.clear();
    }

    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        self.counters.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_sorted() {
        let mut c = Counters::new();
        c.add("kills", 1);
        c.add("enemies_spawned", 3);
        c.add("kills", 2);
        assert_eq!(c.snapshot(), vec![("enemies_spawned", 3), ("kills", 3)]);
        c.reset_all();
        assert_eq!(c.get("kills"), 0);
    }
}
