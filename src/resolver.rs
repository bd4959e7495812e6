// Resolver: aggregates entries from any number of providers into a
// case-insensitive lookup index with duplicate detection.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::entry::AbbrevEntry;

/// Anything that can contribute an ordered list of abbreviation entries to
/// a resolver (an open list document, a preferences-backed default list, a
/// fixture in tests).
pub trait AbbrevProvider {
    fn get_abbreviations(&self) -> Vec<AbbrevEntry>;
}

/// A plain in-memory abbreviation list, the simplest provider.
#[derive(Debug, Clone, Default)]
pub struct AbbrevList {
    entries: Vec<AbbrevEntry>,
}

impl AbbrevList {
    pub fn new(entries: Vec<AbbrevEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AbbrevEntry] {
        &self.entries
    }

    /// Replaces the list contents. The caller is responsible for asking the
    /// resolver to refresh afterwards.
    pub fn set_entries(&mut self, entries: Vec<AbbrevEntry>) {
        self.entries = entries;
    }
}

impl AbbrevProvider for AbbrevList {
    fn get_abbreviations(&self) -> Vec<AbbrevEntry> {
        self.entries.clone()
    }
}

// Shared-ownership handle so an editor can keep mutating a list the
// resolver is registered on.
impl<P: AbbrevProvider> AbbrevProvider for Rc<RefCell<P>> {
    fn get_abbreviations(&self) -> Vec<AbbrevEntry> {
        self.borrow().get_abbreviations()
    }
}

/// Index slot: one entry owns the token, or several collide on it.
#[derive(Debug, Clone)]
enum IndexValue {
    Single(AbbrevEntry),
    Collision(Vec<AbbrevEntry>),
}

/// Case-insensitive token lookup over every registered provider.
///
/// The index is rebuilt from scratch on every [`AbbrevResolver::refresh`],
/// never patched incrementally, so it is always consistent with the full
/// provider set as of the last refresh. It is not safe for concurrent
/// mutation-while-reading; keep a resolver confined to one thread or task
/// (e.g. refreshed from the same event loop that performs lookups).
#[derive(Default)]
pub struct AbbrevResolver {
    providers: Vec<Box<dyn AbbrevProvider>>,
    index: HashMap<String, IndexValue>,
}

impl AbbrevResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider and immediately rebuilds the index.
    pub fn add_provider(&mut self, provider: impl AbbrevProvider + 'static) {
        self.providers.push(Box::new(provider));
        self.refresh();
    }

    /// Re-pulls every provider, in registration order, and rebuilds the
    /// index from the concatenated entry lists.
    pub fn refresh(&mut self) {
        let mut items = Vec::new();
        for provider in &self.providers {
            items.extend(provider.get_abbreviations());
        }
        debug!("rebuilding abbreviation index from {} entries", items.len());
        self.set_items(items);
    }

    fn set_items(&mut self, items: Vec<AbbrevEntry>) {
        let mut index = HashMap::with_capacity(items.len());
        for entry in &items {
            Self::add_to_index(&mut index, &entry.abbreviation, entry);
            if let Some(variants) = &entry.variants {
                for variant in variants {
                    Self::add_to_index(&mut index, &entry.variant_abbreviation(variant), entry);
                }
            }
        }
        // Wholesale replacement; readers never see a half-built index.
        self.index = index;
    }

    fn add_to_index(index: &mut HashMap<String, IndexValue>, key: &str, entry: &AbbrevEntry) {
        // Rows with an empty trigger or an empty expansion are transient
        // editing states, excluded rather than reported.
        if key.is_empty() || entry.expansion.is_empty() {
            return;
        }
        match index.entry(key.to_lowercase()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(IndexValue::Single(entry.clone()));
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                let updated = match slot.get() {
                    IndexValue::Single(existing) => {
                        IndexValue::Collision(vec![existing.clone(), entry.clone()])
                    }
                    IndexValue::Collision(list) => {
                        let mut list = list.clone();
                        list.push(entry.clone());
                        IndexValue::Collision(list)
                    }
                };
                slot.insert(updated);
            }
        }
    }

    /// Looks up a typed token, case-insensitively.
    ///
    /// Returns the entry's own expansion when the token is its short form,
    /// or the spliced variant expansion when the token matches one of its
    /// variant triggers. Ambiguous tokens (more than one entry claims them)
    /// never resolve; `None` covers both "unknown" and "ambiguous".
    pub fn get_expansion(&self, abbrev: &str) -> Option<String> {
        let key = abbrev.to_lowercase();
        match self.index.get(&key)? {
            IndexValue::Single(entry) => {
                if entry.abbreviation.to_lowercase() == key {
                    return Some(entry.expansion.clone());
                }
                let variants = entry.variants.as_deref().unwrap_or(&[]);
                for variant in variants {
                    if entry.variant_abbreviation(variant).to_lowercase() == key {
                        return Some(entry.variant_expansion(variant));
                    }
                }
                None
            }
            IndexValue::Collision(_) => None,
        }
    }

    /// True if the entry's short form, or any of its variant triggers, is
    /// claimed by more than one indexed entry. Used for duplicate warning
    /// indicators; colliding tokens also never resolve via
    /// [`AbbrevResolver::get_expansion`].
    pub fn has_duplicate_abbreviation(&self, entry: &AbbrevEntry) -> bool {
        if self.is_duplicate(&entry.abbreviation) {
            return true;
        }
        entry
            .variants
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .any(|variant| self.is_duplicate(&entry.variant_abbreviation(variant)))
    }

    fn is_duplicate(&self, abbrev: &str) -> bool {
        matches!(
            self.index.get(&abbrev.to_lowercase()),
            Some(IndexValue::Collision(_))
        )
    }

    /// Every colliding lowercased token, sorted. Reporting helper for batch
    /// checks; interactive callers use
    /// [`AbbrevResolver::has_duplicate_abbreviation`] per entry.
    pub fn duplicate_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .index
            .iter()
            .filter(|(_, value)| matches!(value, IndexValue::Collision(_)))
            .map(|(token, _)| token.clone())
            .collect();
        tokens.sort();
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Abbrev;

    fn suffix_entry() -> AbbrevEntry {
        AbbrevEntry::with_variants("d", "dog", vec![Abbrev::new("s", "es")])
    }

    #[test]
    fn test_empty_resolver_finds_nothing() {
        let resolver = AbbrevResolver::new();
        assert_eq!(None, resolver.get_expansion("dog"));
    }

    #[test]
    fn test_simple_lookup() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![AbbrevEntry::new("dog", "cat")]));
        assert_eq!(Some("cat".to_string()), resolver.get_expansion("dog"));
    }

    #[test]
    fn test_lookup_is_case_insensitive_both_ways() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![AbbrevEntry::new("Dog", "canine")]));
        assert_eq!(Some("canine".to_string()), resolver.get_expansion("DOG"));
        assert_eq!(Some("canine".to_string()), resolver.get_expansion("dog"));
    }

    #[test]
    fn test_variant_lookup_splices() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![suffix_entry()]));
        assert_eq!(Some("doges".to_string()), resolver.get_expansion("ds"));
    }

    #[test]
    fn test_unknown_token_misses() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![suffix_entry()]));
        assert_eq!(None, resolver.get_expansion("dx"));
    }

    #[test]
    fn test_empty_fields_are_not_indexed() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![
            AbbrevEntry::new("", "dog"),
            AbbrevEntry::new("d", ""),
        ]));
        assert_eq!(None, resolver.get_expansion("d"));
        assert_eq!(None, resolver.get_expansion(""));
    }

    #[test]
    fn test_duplicates_across_providers_block_resolution() {
        let mut resolver = AbbrevResolver::new();
        let first = AbbrevEntry::new("d", "dog");
        let second = AbbrevEntry::new("D", "dig");
        resolver.add_provider(AbbrevList::new(vec![first.clone()]));
        resolver.add_provider(AbbrevList::new(vec![second.clone()]));
        assert_eq!(None, resolver.get_expansion("d"));
        assert!(resolver.has_duplicate_abbreviation(&first));
        assert!(resolver.has_duplicate_abbreviation(&second));
    }

    #[test]
    fn test_variant_trigger_collision_flags_both_entries() {
        let mut resolver = AbbrevResolver::new();
        let base = AbbrevEntry::new("ds", "dose");
        resolver.add_provider(AbbrevList::new(vec![suffix_entry(), base.clone()]));
        // "ds" is both a variant trigger of d and the short form of ds.
        assert_eq!(None, resolver.get_expansion("ds"));
        assert!(resolver.has_duplicate_abbreviation(&suffix_entry()));
        assert!(resolver.has_duplicate_abbreviation(&base));
        // The base trigger "d" itself is unambiguous.
        assert_eq!(Some("dog".to_string()), resolver.get_expansion("d"));
    }

    #[test]
    fn test_three_way_collision_is_still_flagged() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![
            AbbrevEntry::new("d", "dog"),
            AbbrevEntry::new("d", "dig"),
            AbbrevEntry::new("d", "dug"),
        ]));
        assert_eq!(None, resolver.get_expansion("d"));
        assert!(resolver.has_duplicate_abbreviation(&AbbrevEntry::new("d", "dug")));
    }

    #[test]
    fn test_duplicate_tokens_are_sorted_and_lowercased() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![
            AbbrevEntry::new("Zz", "zebra"),
            AbbrevEntry::new("zZ", "zed"),
            AbbrevEntry::new("a", "apple"),
            AbbrevEntry::new("A", "acorn"),
        ]));
        assert_eq!(vec!["a".to_string(), "zz".to_string()], resolver.duplicate_tokens());
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(AbbrevList::new(vec![suffix_entry()]));
        let before = resolver.get_expansion("ds");
        resolver.refresh();
        resolver.refresh();
        assert_eq!(before, resolver.get_expansion("ds"));
        assert_eq!(Some("dog".to_string()), resolver.get_expansion("d"));
    }

    #[test]
    fn test_shared_list_edits_visible_after_refresh() {
        let list = Rc::new(RefCell::new(AbbrevList::default()));
        let mut resolver = AbbrevResolver::new();
        resolver.add_provider(Rc::clone(&list));
        assert_eq!(None, resolver.get_expansion("d"));

        list.borrow_mut()
            .set_entries(vec![AbbrevEntry::new("d", "dog")]);
        // Not visible until the resolver is told to refresh.
        assert_eq!(None, resolver.get_expansion("d"));
        resolver.refresh();
        assert_eq!(Some("dog".to_string()), resolver.get_expansion("d"));
    }
}
