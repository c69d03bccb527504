//! Code fragments and the text utilities used to splice them into templates.
//!
//! A [`CodeFragment`] is an opaque, pre-generated block of imperative code
//! produced by an upstream compiler stage. The emission backend never
//! interprets it; it only needs to know which identifiers the fragment
//! mentions, how to rename them, and how to indent it at the insertion point.

use std::collections::{BTreeSet, HashMap};
use std::fmt;


/// An opaque code string together with the identifiers it mentions.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeFragment {
    code: String,
    identifiers: BTreeSet<String>,
}

impl CodeFragment {
    /// Wraps `code` and extracts its identifiers.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let identifiers = identifiers(&code).into_iter().map(str::to_string).collect();
        Self { code, identifiers }
    }

    /// The raw code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Every identifier mentioned by the code, sorted.
    #[inline]
    pub fn identifiers(&self) -> &BTreeSet<String> {
        &self.identifiers
    }

    /// Returns `true` if `name` appears as a whole identifier.
    #[inline]
    pub fn uses(&self, name: &str) -> bool {
        self.identifiers.contains(name)
    }

    /// Returns `true` if the fragment contains only whitespace.
    pub fn is_empty(&self) -> bool {
        self.code.trim().is_empty()
    }

    /// Replaces whole identifiers according to `substitutions`.
    ///
    /// Identifiers that merely contain a key (`v` inside `v0`) are left alone.
    pub fn substitute(&self, substitutions: &HashMap<&str, &str>) -> Self {
        Self::new(word_substitute(&self.code, substitutions))
    }

    /// The code re-indented with `indent`; see [`autoindent`].
    pub fn indented(&self, indent: &str) -> String {
        autoindent(&self.code, indent)
    }
}

impl fmt::Display for CodeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl From<&str> for CodeFragment {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CodeFragment {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

#[inline]
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `code` into maximal runs of word characters and the text between
/// them, in order. Word runs are tagged `true`.
fn tokens(code: &str) -> Vec<(bool, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_word = false;

    for (i, c) in code.char_indices() {
        let word = is_word(c);
        if i > start && word != in_word {
            out.push((in_word, &code[start..i]));
            start = i;
        }
        in_word = word;
    }
    if start < code.len() {
        out.push((in_word, &code[start..]));
    }
    out
}

/// Identifiers in `code`: word runs that start with a letter or underscore.
///
/// Word runs starting with a digit are numeric literals (`1e5`, `0x1f`) and
/// are skipped as a whole.
pub fn identifiers(code: &str) -> BTreeSet<&str> {
    tokens(code)
        .into_iter()
        .filter(|(word, text)| *word && !text.starts_with(|c: char| c.is_ascii_digit()))
        .map(|(_, text)| text)
        .collect()
}

/// Whole-word replacement of identifiers in `code`.
pub fn word_substitute(code: &str, substitutions: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(code.len());
    for (word, text) in tokens(code) {
        match substitutions.get(text) {
            Some(replacement) if word => out.push_str(replacement),
            _ => out.push_str(text),
        }
    }
    out
}

/// Strips the common leading spaces and tabs of `code` and prefixes every
/// non-blank line with `indent`.
///
/// Blank lines are emitted empty. Leading and trailing blank lines are
/// dropped.
pub fn autoindent(code: &str, indent: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());

    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };
    let lines = &lines[first..=last];

    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{}", &l[common..])
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
