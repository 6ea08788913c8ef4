use std::collections::HashMap;

use tracing::debug;

/// Default number of direct slots. Prime, so `hash % slots` spreads well.
pub const DEFAULT_SLOT_COUNT: usize = 1021;

const EMPTY: u32 = 0;
const OVERFLOW: u32 = u32::MAX;

/// Name-keyed table tuned for repeated lookups of a small, rarely changing key set.
///
/// Each key hashes (FNV-1a) to one of a fixed number of direct slots. A slot
/// holds either nothing, the index of the single key that landed there, or an
/// overflow marker. Only keys in an overflowed slot pay for a lookup in the
/// fallback map; everything else is one hash, one slot read and one key compare.
///
/// The table never resizes. Values are kept in insertion order in a dense
/// backing vector; setting an existing key replaces its value in place.
#[derive(Debug, Clone)]
pub struct FastLookup<T> {
    slots: Box<[u32]>,
    slot_keys: Box<[String]>,
    values: Vec<T>,
    fallback: HashMap<String, u32>,
}

impl<T> Default for FastLookup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FastLookup<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOT_COUNT)
    }

    /// Create a table with `slot_count` direct slots (at least one).
    #[must_use]
    pub fn with_slots(slot_count: usize) -> Self {
        let slot_count = slot_count.max(1);
        Self {
            slots: vec![EMPTY; slot_count].into_boxed_slice(),
            slot_keys: vec![String::new(); slot_count].into_boxed_slice(),
            values: Vec::new(),
            fallback: HashMap::new(),
        }
    }

    /// Number of direct slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fallback.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fallback.is_empty()
    }

    /// Insert or replace the value stored under `key`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set(&mut self, key: &str, value: T) {
        if let Some(&index) = self.fallback.get(key) {
            self.values[index as usize] = value;
            return;
        }

        let index = self.values.len() as u32;
        self.values.push(value);
        self.fallback.insert(key.to_owned(), index);

        let slot = self.slot_of(key);
        match self.slots[slot] {
            EMPTY => {
                self.slots[slot] = index + 1;
                key.clone_into(&mut self.slot_keys[slot]);
            }
            OVERFLOW => {}
            _ => {
                debug!(key, slot, "lookup slot collision, using fallback map");
                self.slots[slot] = OVERFLOW;
                self.slot_keys[slot].clear();
            }
        }
    }

    /// Look up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        let slot = self.slot_of(key);
        match self.slots[slot] {
            EMPTY => None,
            OVERFLOW => self
                .fallback
                .get(key)
                .map(|&index| &self.values[index as usize]),
            index => (self.slot_keys[slot] == key).then(|| &self.values[index as usize - 1]),
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove every entry. The slot count is kept.
    pub fn clear(&mut self) {
        self.slots.fill(EMPTY);
        self.slot_keys.iter_mut().for_each(String::clear);
        self.values.clear();
        self.fallback.clear();
    }

    /// Iterate over all (key, value) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.fallback
            .iter()
            .map(|(k, &index)| (k.as_str(), &self.values[index as usize]))
    }

    fn slot_of(&self, key: &str) -> usize {
        fnv1a(key.as_bytes()) as usize % self.slots.len()
    }
}

/// 32-bit FNV-1a.
#[must_use]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ u32::from(b)).wrapping_mul(PRIME)
    })
}
