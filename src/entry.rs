// Entry model: the atomic substitution rule and the entry type that adds
// suffix variants with splice directives.

/// A single substitution rule: the short form a transcriptionist types and
/// the canonical (typically lowercase) expansion it stands for.
///
/// The short form's case is stored as the user typed it; comparisons against
/// typed text are case-insensitive and happen in the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Abbrev {
    pub abbreviation: String,
    pub expansion: String,
}

impl Abbrev {
    pub fn new(abbreviation: impl Into<String>, expansion: impl Into<String>) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            expansion: expansion.into(),
        }
    }

    /// True iff both fields are empty strings.
    pub fn is_empty(&self) -> bool {
        self.abbreviation.is_empty() && self.expansion.is_empty()
    }
}

/// A primary abbreviation plus optional suffix variants.
///
/// Each variant's `abbreviation` is a suffix appended to the entry's own
/// short form; its `expansion` is either a literal suffix or a splice
/// directive (see [`AbbrevEntry::variant_expansion`]). `variants` preserves
/// the distinction between "no variant list" (`None`) and "an empty variant
/// list" (`Some(vec![])`) because the archive format round-trips it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbrevEntry {
    pub abbreviation: String,
    pub expansion: String,
    pub variants: Option<Vec<Abbrev>>,
}

impl AbbrevEntry {
    pub fn new(abbreviation: impl Into<String>, expansion: impl Into<String>) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            expansion: expansion.into(),
            variants: None,
        }
    }

    pub fn with_variants(
        abbreviation: impl Into<String>,
        expansion: impl Into<String>,
        variants: Vec<Abbrev>,
    ) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            expansion: expansion.into(),
            variants: Some(variants),
        }
    }

    /// True iff both primary fields are empty strings.
    pub fn is_empty(&self) -> bool {
        self.abbreviation.is_empty() && self.expansion.is_empty()
    }

    /// True iff a variant list is present and non-empty.
    pub fn has_variants(&self) -> bool {
        self.variants.as_ref().is_some_and(|vs| !vs.is_empty())
    }

    /// The full trigger for a variant: entry short form + variant suffix.
    pub fn variant_abbreviation(&self, variant: &Abbrev) -> String {
        format!("{}{}", self.abbreviation, variant.abbreviation)
    }

    /// The full expansion for a variant, honoring splice directives.
    ///
    /// The variant expansion may start with one of two directive characters:
    /// `<` removes the last character of the base expansion before appending
    /// the remainder ("love" + "<ing" = "loving"), and `>` repeats the last
    /// character of the base expansion before appending the remainder
    /// ("let" + ">ing" = "letting"). Any other leading character means plain
    /// concatenation. An empty variant expansion leaves the base unchanged.
    pub fn variant_expansion(&self, variant: &Abbrev) -> String {
        let base = &self.expansion;
        let mut chars = variant.expansion.chars();
        // Empty must be handled before the directive test; there is no first
        // character to inspect.
        let Some(directive) = chars.next() else {
            return base.clone();
        };
        let remainder = chars.as_str();
        match directive {
            '<' => {
                // Trim-one: an empty base has nothing to trim.
                let kept = match base.char_indices().next_back() {
                    Some((idx, _)) => &base[..idx],
                    None => base.as_str(),
                };
                format!("{kept}{remainder}")
            }
            '>' => {
                // Double-one: an empty base has nothing to repeat.
                let mut out = base.clone();
                if let Some(last) = base.chars().next_back() {
                    out.push(last);
                }
                out.push_str(remainder);
                out
            }
            _ => format!("{}{}", base, variant.expansion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entry_has_no_variants() {
        assert!(AbbrevEntry::default().variants.is_none());
    }

    #[test]
    fn test_is_empty_requires_both_fields_empty() {
        assert!(Abbrev::default().is_empty());
        assert!(!Abbrev::new("d", "").is_empty());
        assert!(!Abbrev::new("", "dog").is_empty());
        assert!(!Abbrev::new("d", "dog").is_empty());
    }

    #[test]
    fn test_has_variants() {
        let none = AbbrevEntry::new("d", "dog");
        let empty = AbbrevEntry::with_variants("d", "dog", vec![]);
        let some = AbbrevEntry::with_variants("d", "dog", vec![Abbrev::new("s", "s")]);
        assert!(!none.has_variants());
        assert!(!empty.has_variants());
        assert!(some.has_variants());
    }

    #[test]
    fn test_variant_abbreviation_concatenates() {
        let entry = AbbrevEntry::new("d", "dog");
        assert_eq!("ds", entry.variant_abbreviation(&Abbrev::new("s", "es")));
    }

    #[test]
    fn test_variant_expansion_plain_append() {
        let entry = AbbrevEntry::new("d", "dog");
        assert_eq!("doges", entry.variant_expansion(&Abbrev::new("s", "es")));
    }

    #[test]
    fn test_variant_expansion_trim_one() {
        let entry = AbbrevEntry::new("l", "love");
        assert_eq!("loving", entry.variant_expansion(&Abbrev::new("g", "<ing")));
    }

    #[test]
    fn test_variant_expansion_double_one() {
        let entry = AbbrevEntry::new("l", "let");
        assert_eq!("letting", entry.variant_expansion(&Abbrev::new("g", ">ing")));
    }

    #[test]
    fn test_variant_expansion_empty_variant_keeps_base() {
        let entry = AbbrevEntry::new("d", "dog");
        assert_eq!("dog", entry.variant_expansion(&Abbrev::new("x", "")));
    }

    #[test]
    fn test_variant_expansion_trim_on_empty_base() {
        let entry = AbbrevEntry::new("d", "");
        assert_eq!("ing", entry.variant_expansion(&Abbrev::new("g", "<ing")));
    }

    #[test]
    fn test_variant_expansion_double_on_empty_base() {
        let entry = AbbrevEntry::new("d", "");
        assert_eq!("ing", entry.variant_expansion(&Abbrev::new("g", ">ing")));
    }

    #[test]
    fn test_variant_expansion_multibyte_trim() {
        let entry = AbbrevEntry::new("c", "café");
        assert_eq!("cafes", entry.variant_expansion(&Abbrev::new("s", "<es")));
    }
}
