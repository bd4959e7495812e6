// Common-suffix suggestion engine: recommends suffix variants for a base
// expansion from a configurable rule table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};

use crate::entry::Abbrev;

/// One alternative expansion for a suffix rule, with the word endings it
/// prefers to attach to. Endings are matched as case-insensitive regexes
/// anchored at the end of the expansion (`ending` + `$`), so an ending may
/// be a literal like `e` or a fragment like `[^aeiou]y`.
#[derive(Debug, Clone)]
pub struct SuffixChoice {
    pub expansion: String,
    pub preferred_endings: Vec<String>,
    regexes: Vec<Regex>,
}

impl SuffixChoice {
    pub fn new(expansion: impl Into<String>, preferred_endings: Vec<String>) -> Self {
        let regexes = preferred_endings
            .iter()
            .filter_map(|ending| match Regex::new(&format!("(?i){ending}$")) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("ignoring unparseable suffix ending {ending:?}: {e}");
                    None
                }
            })
            .collect();
        Self {
            expansion: expansion.into(),
            preferred_endings,
            regexes,
        }
    }

    /// True iff this choice has endings and one of them matches `expansion`.
    fn matches(&self, expansion: &str) -> bool {
        !self.regexes.is_empty() && self.regexes.iter().any(|r| r.is_match(expansion))
    }
}

/// A suffix abbreviation with its ordered alternative expansions.
#[derive(Debug, Clone)]
pub struct SuffixRule {
    pub abbreviation: String,
    pub choices: Vec<SuffixChoice>,
}

/// The full suggestion rule table, in rule order.
#[derive(Debug, Clone, Default)]
pub struct CommonSuffixes {
    rules: Vec<SuffixRule>,
}

impl CommonSuffixes {
    pub fn new(rules: Vec<SuffixRule>) -> Self {
        Self { rules }
    }

    /// A starter table covering plural, progressive, and past forms, with
    /// trim directives for silent-e bases.
    pub fn standard() -> Self {
        Self::from_items(&[
            "s es s".to_string(),
            "s es sh".to_string(),
            "s es ch".to_string(),
            "s es x".to_string(),
            "s es z".to_string(),
            "s s".to_string(),
            "g <ing e".to_string(),
            "g ing".to_string(),
            "d <ed e".to_string(),
            "d ed".to_string(),
        ])
    }

    /// Parses the flat string-list representation: each item is
    /// `abbreviation expansion [endings...]` joined by single spaces.
    /// Items sharing an abbreviation merge into one rule, preserving choice
    /// order; items with fewer than two tokens are ignored.
    pub fn from_items(items: &[String]) -> Self {
        let mut rules: Vec<SuffixRule> = Vec::new();
        for item in items {
            let tokens: Vec<&str> = item.split(' ').collect();
            if tokens.len() < 2 {
                continue;
            }
            let abbreviation = tokens[0];
            let endings = tokens[2..].iter().map(|s| s.to_string()).collect();
            let choice = SuffixChoice::new(tokens[1], endings);
            match rules.iter_mut().find(|r| r.abbreviation == abbreviation) {
                Some(rule) => rule.choices.push(choice),
                None => rules.push(SuffixRule {
                    abbreviation: abbreviation.to_string(),
                    choices: vec![choice],
                }),
            }
        }
        Self { rules }
    }

    /// The inverse of [`CommonSuffixes::from_items`].
    pub fn to_items(&self) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(|rule| {
                rule.choices.iter().map(|choice| {
                    let mut tokens = vec![rule.abbreviation.clone(), choice.expansion.clone()];
                    tokens.extend(choice.preferred_endings.iter().cloned());
                    tokens.join(" ")
                })
            })
            .collect()
    }

    pub fn rules(&self) -> &[SuffixRule] {
        &self.rules
    }

    /// Suggests suffix variants for a base abbreviation's expansion.
    ///
    /// For each rule the first choice whose preferred endings match the
    /// expansion wins; when none match, every generic choice (one with no
    /// preferred endings) is offered instead. Output preserves rule-table
    /// order.
    pub fn suggest(&self, base: &Abbrev) -> Vec<Abbrev> {
        let expansion = &base.expansion;
        self.rules
            .iter()
            .flat_map(|rule| {
                let chosen: Vec<&SuffixChoice> =
                    match rule.choices.iter().find(|c| c.matches(expansion)) {
                        Some(choice) => vec![choice],
                        None => rule
                            .choices
                            .iter()
                            .filter(|c| c.preferred_endings.is_empty())
                            .collect(),
                    };
                chosen
                    .into_iter()
                    .map(|choice| Abbrev::new(rule.abbreviation.clone(), choice.expansion.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// On-disk store for the suffix rule table: a JSON array of the flat
/// string-list items.
///
/// The table is loaded lazily on first access and cached for the store's
/// lifetime; [`SuffixRuleStore::set_rules`] rewrites the file and the cache
/// together, so readers of this store never observe a half-updated table.
pub struct SuffixRuleStore {
    path: PathBuf,
    cached: Option<CommonSuffixes>,
}

impl SuffixRuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    /// The current rule table, loading it from disk on first call. A
    /// missing file yields the built-in defaults.
    pub fn rules(&mut self) -> Result<&CommonSuffixes> {
        let rules = match self.cached.take() {
            Some(rules) => rules,
            None => load_rules(&self.path)?,
        };
        Ok(self.cached.insert(rules))
    }

    /// Replaces the rule table, persisting it before updating the cache.
    pub fn set_rules(&mut self, rules: CommonSuffixes) -> Result<()> {
        let json = serde_json::to_string_pretty(&rules.to_items())
            .context("failed to serialize suffix rules")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write suffix rules to {}", self.path.display()))?;
        self.cached = Some(rules);
        Ok(())
    }
}

fn load_rules(path: &Path) -> Result<CommonSuffixes> {
    if !path.exists() {
        debug!("no suffix rule file at {}, using built-in defaults", path.display());
        return Ok(CommonSuffixes::standard());
    }
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read suffix rules from {}", path.display()))?;
    let items: Vec<String> = serde_json::from_str(&data)
        .with_context(|| format!("suffix rule file {} is not a JSON string list", path.display()))?;
    debug!("loaded {} suffix rule items from {}", items.len(), path.display());
    Ok(CommonSuffixes::from_items(&items))
}
