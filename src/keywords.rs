//! Keyword substitution applied to every outgoing message.
//!
//! A [`KeywordTable`] is an ordered list of `(pattern, replacement)` pairs that is
//! built once at startup and shared read-only between requests.
//!
//! Substitution is a single left-to-right scan: at each position the longest
//! matching pattern wins (ties go to the earlier entry), its replacement is
//! emitted, and scanning resumes after the matched input. Replacement text is
//! never rescanned, so `"なんて日だ"` becomes `"なんてGoな日だ！！！！"` even though
//! the output contains `"な"`, which is itself a pattern.

use log::{debug, info};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::AppError;

/// The substitutions used when no override file is configured.
pub const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("なんて日だ", "なんてGoな日だ！！！！"),
    ("oh...", "ﾌｧｧｧｧｧｧｧｧｧ"),
    ("努力", "GO"),
    ("はい", "ふぁーい"),
    ("します", "しますだふぁー"),
    ("まだ", "まだだふぁー"),
    ("した", "しただふぁー"),
    ("です", "ですだふぁー"),
    ("よう", "ようだふぁー"),
    ("ゴーファー", "GOOOOOOOOOOO!"),
    ("な", "ふぁ"),
];

/// Immutable keyword substitution table.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<(String, String)>,
    replacements: HashMap<String, String>,
    matcher: Option<Regex>,
}

impl KeywordTable {
    /// Builds a table from `(pattern, replacement)` pairs.
    ///
    /// # Returns
    ///
    /// - `Ok(KeywordTable)`: The compiled table
    /// - `Err(AppError::Config)`: If a pattern is empty
    pub fn from_pairs<I, P, R>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: Into<String>,
        R: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut replacements = HashMap::new();

        for (pattern, replacement) in pairs {
            let pattern = pattern.into();
            if pattern.is_empty() {
                return Err(AppError::Config("keyword pattern cannot be empty".into()));
            }
            if replacements.contains_key(&pattern) {
                debug!("Ignoring duplicate keyword pattern '{}'", pattern);
                continue;
            }
            let replacement = replacement.into();
            replacements.insert(pattern.clone(), replacement.clone());
            entries.push((pattern, replacement));
        }

        // Stable sort keeps table order among patterns of equal length.
        let mut ordered: Vec<&str> = entries.iter().map(|(p, _)| p.as_str()).collect();
        ordered.sort_by_key(|p| std::cmp::Reverse(p.chars().count()));

        let matcher = if ordered.is_empty() {
            None
        } else {
            let alternation = ordered
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                Regex::new(&alternation)
                    .map_err(|e| AppError::Config(format!("invalid keyword table: {}", e)))?,
            )
        };

        Ok(KeywordTable {
            entries,
            replacements,
            matcher,
        })
    }

    /// Loads a table from a JSON file holding `[pattern, replacement]` pairs.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        info!("Loading keyword table from {}", path.display());

        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let pairs: Vec<(String, String)> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("malformed keyword table: {}", e)))?;

        let table = Self::from_pairs(pairs)?;
        info!("Loaded {} keyword substitutions", table.len());
        Ok(table)
    }

    /// Applies every substitution to `text`.
    pub fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Some(matcher) => matcher
                .replace_all(text, |caps: &Captures| {
                    let matched = &caps[0];
                    self.replacements
                        .get(matched)
                        .cloned()
                        .unwrap_or_else(|| matched.to_string())
                })
                .into_owned(),
            None => text.to_string(),
        }
    }

    /// The entries in table order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        // Built-in patterns are non-empty literals, so construction cannot fail.
        Self::from_pairs(DEFAULT_KEYWORDS.iter().copied()).unwrap_or_else(|_| KeywordTable {
            entries: Vec::new(),
            replacements: HashMap::new(),
            matcher: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nante_hi_da_is_not_rescanned() {
        let table = KeywordTable::default();
        assert_eq!(table.apply("なんて日だ"), "なんてGoな日だ！！！！");
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let table = KeywordTable::default();
        assert_eq!(table.apply("はいはい"), "ふぁーいふぁーい");
        assert_eq!(table.apply("努力と努力"), "GOとGO");
    }

    #[test]
    fn test_longest_pattern_wins() {
        let table = KeywordTable::from_pairs([("a", "1"), ("abc", "3"), ("ab", "2")]).unwrap();
        assert_eq!(table.apply("abcab a"), "32 1");
    }

    #[test]
    fn test_single_char_keyword() {
        let table = KeywordTable::default();
        assert_eq!(table.apply("さかな"), "さかふぁ");
    }

    #[test]
    fn test_pattern_with_regex_metacharacters() {
        let table = KeywordTable::default();
        assert_eq!(table.apply("oh..."), "ﾌｧｧｧｧｧｧｧｧｧ");
        // "." is literal, so "ohxxx" is left alone
        assert_eq!(table.apply("ohxxx"), "ohxxx");
    }

    #[test]
    fn test_text_without_keywords_is_unchanged() {
        let table = KeywordTable::default();
        assert_eq!(table.apply("hello world"), "hello world");
        assert_eq!(table.apply(""), "");
    }

    #[test]
    fn test_empty_table() {
        let table = KeywordTable::from_pairs(Vec::<(String, String)>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.apply("なんて日だ"), "なんて日だ");
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let result = KeywordTable::from_pairs([("", "x")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        std::fs::write(&path, r#"[["go", "GO!"], ["rust", "🦀"]]"#).unwrap();

        let table = KeywordTable::from_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.apply("go rust"), "GO! 🦀");
    }

    #[test]
    fn test_default_table_keeps_order() {
        let table = KeywordTable::default();
        assert_eq!(table.len(), DEFAULT_KEYWORDS.len());
        assert_eq!(table.entries()[0].0, "なんて日だ");
        assert_eq!(table.entries()[10].0, "な");
    }
}
