use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::parser::{
    format_clause, parse_query, Qualifier, SearchQuery, Segment, SymbolPattern,
};

/// Languages GitHub code search supports for `symbol:` qualifiers.
pub const SYMBOL_LANGUAGES: &[&str] = &[
    "C#",
    "Go",
    "Java",
    "JavaScript",
    "PHP",
    "Protocol Buffers",
    "Python",
    "Ruby",
    "Rust",
    "TypeScript",
];

pub fn is_symbol_language(language: &str) -> bool {
    SYMBOL_LANGUAGES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(language.trim()))
}

/// Qualifier keys with a dedicated [`QualifierState`] field. They are
/// rejected as scalars so symbol validation and round trips see them.
const RESERVED_SCALAR_KEYS: &[&str] = &["language", "is", "content", "symbol"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryBuildError {
    #[error("symbol search is not supported for: {}", .0.join(", "))]
    UnsupportedSymbolLanguages(Vec<String>),
    #[error("`{0}` cannot be set as a plain qualifier")]
    ReservedScalarKey(String),
    #[error("free text contains the qualifier `{0}`")]
    QualifierInFreeText(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    And,
    #[default]
    Or,
    Not,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            _ => None,
        }
    }
}

/// One language chip. `operator` joins it to the previous chip and is
/// ignored on the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChip {
    pub language: String,
    #[serde(default)]
    pub operator: BoolOp,
}

/// Editable qualifier state behind the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualifierState {
    pub free_text: String,
    /// `repo`, `user`, `org`, `path` and any other plain `key:value` filter
    pub scalars: BTreeMap<String, String>,
    pub languages: Vec<LanguageChip>,
    pub is: String,
    pub content: String,
    pub symbol: String,
    pub symbol_is_regex: bool,
}

impl QualifierState {
    pub fn push_language(&mut self, language: impl Into<String>, operator: BoolOp) {
        self.languages.push(LanguageChip {
            language: language.into(),
            operator,
        });
    }

    pub fn set_scalar(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.scalars.insert(key.into(), value.into());
    }

    /// Rebuild state from a parsed query.
    ///
    /// Recognizes the `( ... )` grouping and `AND`/`OR`/`NOT` words that
    /// [`build_query`] places around language chips; everything else that is
    /// not a qualifier is collected as free text.
    pub fn from_query(query: &SearchQuery) -> Self {
        let mut state = Self::default();
        let mut free_words: Vec<&str> = Vec::new();
        let mut pending_op: Option<BoolOp> = None;
        let segments = &query.segments;

        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Free(text) => {
                    let after_language = i > 0 && is_language(&segments[i - 1]);
                    let before_language = segments.get(i + 1).is_some_and(is_language);

                    let mut words: Vec<&str> = text.split_whitespace().collect();
                    if after_language && words.first() == Some(&")") {
                        words.remove(0);
                    }
                    if before_language && words.last() == Some(&"(") {
                        words.pop();
                    }
                    if after_language && before_language && words.len() == 1 {
                        if let Some(op) = BoolOp::from_word(words[0]) {
                            pending_op = Some(op);
                            continue;
                        }
                    }
                    free_words.extend(words);
                }
                Segment::Qualifier(qualifier) => match qualifier {
                    Qualifier::Language(language) => {
                        let language = language.strip_suffix(')').unwrap_or(language);
                        state.push_language(language, pending_op.take().unwrap_or_default());
                    }
                    Qualifier::Is(value) => state.is = value.clone(),
                    Qualifier::Content(value) => state.content = value.clone(),
                    Qualifier::Symbol(SymbolPattern { pattern, is_regex }) => {
                        state.symbol = pattern.clone();
                        state.symbol_is_regex = *is_regex;
                    }
                    Qualifier::Repo(value)
                    | Qualifier::User(value)
                    | Qualifier::Org(value)
                    | Qualifier::Path(value) => state.set_scalar(qualifier.key(), value.clone()),
                    Qualifier::Other { key, value } => state.set_scalar(key.clone(), value.clone()),
                },
            }
        }

        state.free_text = free_words.join(" ");
        state
    }
}

fn is_language(segment: &Segment) -> bool {
    matches!(segment, Segment::Qualifier(Qualifier::Language(_)))
}

/// Assemble a single query string from qualifier state.
///
/// Clause order is free text, scalar qualifiers (by key), the language group,
/// then `is`, `content` and `symbol`. Empty clauses are dropped.
pub fn build_query(state: &QualifierState) -> Result<String, QueryBuildError> {
    let mut clauses: Vec<String> = Vec::new();

    let free_text = state.free_text.trim();
    if let Some(qualifier) = parse_query(free_text).qualifiers().next() {
        return Err(QueryBuildError::QualifierInFreeText(qualifier.to_string()));
    }
    clauses.push(free_text.to_string());

    for (key, value) in &state.scalars {
        if RESERVED_SCALAR_KEYS
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(key.trim()))
        {
            return Err(QueryBuildError::ReservedScalarKey(key.clone()));
        }
        let value = value.trim();
        if !key.is_empty() && !value.is_empty() {
            clauses.push(format_clause(key, value));
        }
    }

    clauses.push(language_group(state));

    if !state.is.trim().is_empty() {
        clauses.push(format_clause("is", state.is.trim()));
    }
    if !state.content.trim().is_empty() {
        clauses.push(format_clause("content", state.content.trim()));
    }

    let symbol = state.symbol.trim();
    if !symbol.is_empty() {
        let unsupported: Vec<String> = state
            .languages
            .iter()
            .filter(|chip| !chip.language.trim().is_empty())
            .filter(|chip| !is_symbol_language(&chip.language))
            .map(|chip| chip.language.clone())
            .collect();
        if !unsupported.is_empty() {
            return Err(QueryBuildError::UnsupportedSymbolLanguages(unsupported));
        }

        let pattern = SymbolPattern {
            pattern: symbol.to_string(),
            is_regex: state.symbol_is_regex,
        };
        clauses.push(format_clause("symbol", &pattern.render()));
    }

    clauses.retain(|c| !c.is_empty());
    Ok(clauses.join(" "))
}

fn language_group(state: &QualifierState) -> String {
    let chips: Vec<&LanguageChip> = state
        .languages
        .iter()
        .filter(|chip| !chip.language.trim().is_empty())
        .collect();
    if chips.is_empty() {
        return String::new();
    }

    let mut group = String::from("(");
    for (i, chip) in chips.iter().enumerate() {
        if i > 0 {
            group.push(' ');
            group.push_str(chip.operator.as_str());
            group.push(' ');
        }
        group.push_str(&format_clause("language", chip.language.trim()));
    }
    group.push(')');
    group
}
