//! Pattern library for PII detection
//!
//! The library is immutable, versionable configuration: an ordered list of
//! structural patterns plus per-locale name sets and contextual full-name
//! templates, loaded from TOML. A default library is embedded in the binary;
//! deployments can point `detection.pattern_library` at their own file.

use crate::config::Locale;
use crate::domain::{PiiKind, Result, SignalveilError};
use regex::RegexBuilder;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

/// Structural pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Pattern name (diagnostics only)
    pub name: String,
    /// PII kind produced by this pattern
    pub kind: String,
    /// Regular expression
    pub regex: String,
    /// Route through the lookaround-capable engine
    #[serde(default)]
    pub lookaround: bool,
    /// Case-insensitive matching (structural default)
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
}

fn default_case_insensitive() -> bool {
    true
}

/// Per-locale name heuristics from TOML
#[derive(Debug, Clone, Deserialize)]
struct LocaleDefinition {
    first_names: Vec<String>,
    context_patterns: Vec<String>,
}

/// Pattern library container as parsed from TOML
#[derive(Debug, Deserialize)]
struct LibraryFile {
    patterns: Vec<PatternDefinition>,
    locales: HashMap<String, LocaleDefinition>,
}

/// Compiled matcher, split by engine capability
enum Matcher {
    Plain(regex::Regex),
    Lookaround(fancy_regex::Regex),
}

/// A compiled structural pattern
pub struct StructuralPattern {
    /// Pattern name (diagnostics only)
    pub name: String,
    /// PII kind produced on match
    pub kind: PiiKind,
    matcher: Matcher,
}

impl StructuralPattern {
    /// All match spans in `text`, in match order
    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        match &self.matcher {
            Matcher::Plain(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            Matcher::Lookaround(re) => re
                .find_iter(text)
                .filter_map(|m| match m {
                    Ok(m) => Some((m.start(), m.end())),
                    Err(e) => {
                        tracing::warn!(pattern = %self.name, error = %e, "Lookaround match error");
                        None
                    }
                })
                .collect(),
        }
    }
}

/// Compiled name heuristics for one locale
pub struct NameRules {
    first_names: HashSet<String>,
    context: Vec<regex::Regex>,
}

impl NameRules {
    /// Whether a lowercased token is a known first name
    pub fn is_first_name(&self, word_lower: &str) -> bool {
        self.first_names.contains(word_lower)
    }

    /// Contextual full-name templates; capture group 1 is the name span
    pub fn context_patterns(&self) -> &[regex::Regex] {
        &self.context
    }
}

/// Immutable, compiled pattern library
pub struct PatternLibrary {
    structural: Vec<StructuralPattern>,
    locales: HashMap<String, NameRules>,
    word_pattern: regex::Regex,
}

impl PatternLibrary {
    /// Load and compile a pattern library from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SignalveilError::Configuration(format!(
                "Failed to read pattern library {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Compile a pattern library from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: LibraryFile = toml::from_str(content)
            .map_err(|e| SignalveilError::Configuration(format!("Invalid pattern library: {e}")))?;

        let mut structural = Vec::with_capacity(file.patterns.len());
        for def in &file.patterns {
            let kind = PiiKind::from_str(&def.kind).map_err(|e| {
                SignalveilError::Configuration(format!("Pattern '{}': {}", def.name, e))
            })?;

            let matcher = if def.lookaround {
                let pattern = if def.case_insensitive {
                    format!("(?i){}", def.regex)
                } else {
                    def.regex.clone()
                };
                Matcher::Lookaround(fancy_regex::Regex::new(&pattern).map_err(|e| {
                    SignalveilError::Configuration(format!(
                        "Invalid lookaround regex in pattern '{}': {}",
                        def.name, e
                    ))
                })?)
            } else {
                Matcher::Plain(
                    RegexBuilder::new(&def.regex)
                        .case_insensitive(def.case_insensitive)
                        .build()
                        .map_err(|e| {
                            SignalveilError::Configuration(format!(
                                "Invalid regex in pattern '{}': {}",
                                def.name, e
                            ))
                        })?,
                )
            };

            structural.push(StructuralPattern {
                name: def.name.clone(),
                kind,
                matcher,
            });
        }

        let mut locales = HashMap::new();
        for (key, def) in &file.locales {
            let mut context = Vec::with_capacity(def.context_patterns.len());
            for pattern in &def.context_patterns {
                let re = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        SignalveilError::Configuration(format!(
                            "Invalid context pattern for locale '{key}': {e}"
                        ))
                    })?;
                context.push(re);
            }
            locales.insert(
                key.clone(),
                NameRules {
                    first_names: def.first_names.iter().map(|n| n.to_lowercase()).collect(),
                    context,
                },
            );
        }

        // Capitalized tokens of length >= 3; candidates for the first-name lookup.
        // Deliberately case-sensitive.
        let word_pattern = RegexBuilder::new(r"\b([A-ZÄÖÜ][a-zäöüß]{2,})\b")
            .build()
            .map_err(|e| SignalveilError::Configuration(format!("Invalid word pattern: {e}")))?;

        Ok(Self {
            structural,
            locales,
            word_pattern,
        })
    }

    /// The embedded default library
    pub fn embedded_default() -> Result<Self> {
        Self::from_toml(include_str!("../../../patterns/pii_patterns.toml"))
    }

    /// Structural patterns in declaration order
    pub fn structural(&self) -> &[StructuralPattern] {
        &self.structural
    }

    /// Name rules for a locale, if the library defines it
    pub fn rules_for(&self, locale: Locale) -> Option<&NameRules> {
        self.locales.get(locale.as_str())
    }

    /// The capitalized-token scanner shared by all locales
    pub fn word_pattern(&self) -> &regex::Regex {
        &self.word_pattern
    }
}
