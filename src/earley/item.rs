//! Dotted items and per-position item sets, per SPEC_FULL.md §4.3.1/§3.
//!
//! Because [`lower`](super::lower) has already reduced every production to
//! flat sequences of [`Sym`](super::lower::Sym)s, an item's identity is
//! simply `(rule, alt, dot, origin)` — no separate structural-key hashing
//! is needed the way the unlowered spec text describes, since two items
//! with the same `(rule, alt)` always share the same right-hand side.

use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub rule: Rc<str>,
    pub alt: usize,
    pub dot: usize,
    pub origin: usize,
}

impl Item {
    pub fn new(rule: Rc<str>, alt: usize, dot: usize, origin: usize) -> Self {
        Self {
            rule,
            alt,
            dot,
            origin,
        }
    }

    pub fn advanced(&self) -> Self {
        Self {
            rule: self.rule.clone(),
            alt: self.alt,
            dot: self.dot + 1,
            origin: self.origin,
        }
    }
}

/// The set of items active at one chart position. Insertion order is
/// preserved (it drives the fixpoint worklist and gives deterministic
/// "first completed" lookups during CST reconstruction); a side hash set
/// enforces the no-duplicates invariant cheaply.
#[derive(Debug, Default, Clone)]
pub struct ItemSet {
    items: Vec<Rc<Item>>,
    seen: std::collections::HashSet<Item>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` if not already present. Returns `true` if it was newly
    /// added (callers use this to know whether to keep processing it).
    pub fn insert(&mut self, item: Item) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(Rc::new(item));
        true
    }

    pub fn items(&self) -> &[Rc<Item>] {
        &self.items
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.seen.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `chart[i]` holds every item reachable after consuming `i` tokens.
/// `chart.len() == tokens.len() + 1`.
#[derive(Debug, Default)]
pub struct Chart {
    sets: Vec<ItemSet>,
}

impl Chart {
    pub fn new(positions: usize) -> Self {
        Self {
            sets: (0..positions).map(|_| ItemSet::new()).collect(),
        }
    }

    pub fn set(&self, i: usize) -> &ItemSet {
        &self.sets[i]
    }

    pub fn set_mut(&mut self, i: usize) -> &mut ItemSet {
        &mut self.sets[i]
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Highest index with at least one item — used to locate the furthest
    /// scanned position for error reporting (SPEC_FULL.md §4.3.6).
    pub fn furthest_nonempty(&self) -> usize {
        self.sets
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| !s.is_empty())
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_set_dedups() {
        let mut set = ItemSet::new();
        let rule: Rc<str> = Rc::from("S");
        assert!(set.insert(Item::new(rule.clone(), 0, 0, 0)));
        assert!(!set.insert(Item::new(rule.clone(), 0, 0, 0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn chart_tracks_furthest_nonempty() {
        let mut chart = Chart::new(4);
        chart.set_mut(2).insert(Item::new(Rc::from("S"), 0, 0, 0));
        assert_eq!(chart.furthest_nonempty(), 2);
    }
}
