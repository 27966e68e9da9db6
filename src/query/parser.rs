use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// `key:value` where value is a double-quoted string or a run of non-space characters.
static QUALIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+):(?:"([^"]*)"|(\S+))"#).expect("qualifier pattern"));

/// A `symbol:` qualifier value. `/pattern/` marks a regex symbol search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPattern {
    pub pattern: String,
    pub is_regex: bool,
}

impl SymbolPattern {
    pub fn parse(raw: &str) -> Self {
        match raw
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(inner) if raw.len() >= 2 => Self {
                pattern: inner.to_string(),
                is_regex: true,
            },
            _ => Self {
                pattern: raw.to_string(),
                is_regex: false,
            },
        }
    }

    pub fn render(&self) -> String {
        if self.is_regex {
            format!("/{}/", self.pattern)
        } else {
            self.pattern.clone()
        }
    }
}

/// A recognized search qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    Repo(String),
    User(String),
    Org(String),
    Path(String),
    Language(String),
    Is(String),
    Content(String),
    Symbol(SymbolPattern),
    /// Any key GitHub accepts that needs no special handling (`stars`, `topic`, ...)
    Other { key: String, value: String },
}

impl Qualifier {
    pub fn from_pair(key: &str, value: &str) -> Self {
        let value = value.to_string();
        match key.to_ascii_lowercase().as_str() {
            "repo" => Self::Repo(value),
            "user" => Self::User(value),
            "org" => Self::Org(value),
            "path" => Self::Path(value),
            "language" => Self::Language(value),
            "is" => Self::Is(value),
            "content" => Self::Content(value),
            "symbol" => Self::Symbol(SymbolPattern::parse(&value)),
            _ => Self::Other {
                key: key.to_string(),
                value,
            },
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Repo(_) => "repo",
            Self::User(_) => "user",
            Self::Org(_) => "org",
            Self::Path(_) => "path",
            Self::Language(_) => "language",
            Self::Is(_) => "is",
            Self::Content(_) => "content",
            Self::Symbol(_) => "symbol",
            Self::Other { key, .. } => key,
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::Repo(v)
            | Self::User(v)
            | Self::Org(v)
            | Self::Path(v)
            | Self::Language(v)
            | Self::Is(v)
            | Self::Content(v) => v.clone(),
            Self::Symbol(symbol) => symbol.render(),
            Self::Other { value, .. } => value.clone(),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clause(self.key(), &self.value()))
    }
}

/// Render `key:value`, quoting values that contain whitespace.
pub fn format_clause(key: &str, value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("{key}:\"{value}\"")
    } else {
        format!("{key}:{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Qualifier(Qualifier),
    Free(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qualifier(q) => q.fmt(f),
            Self::Free(text) => f.write_str(text),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SegmentView<'a> {
    Qualifier { key: &'a str, value: String },
    Free { text: &'a str },
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Qualifier(q) => SegmentView::Qualifier {
                key: q.key(),
                value: q.value(),
            },
            Self::Free(text) => SegmentView::Free { text },
        }
        .serialize(serializer)
    }
}

/// A raw search string split into qualifiers and free text, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub segments: Vec<Segment>,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &Qualifier> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Qualifier(q) => Some(q),
            Segment::Free(_) => None,
        })
    }

    /// All free-text segments joined by single spaces.
    pub fn free_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Free(text) => Some(text.as_str()),
                Segment::Qualifier(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            segment.fmt(f)?;
        }
        Ok(())
    }
}

/// Split a raw search string into qualifier and free-text segments.
///
/// Keys are not validated here; unknown keys become [`Qualifier::Other`].
/// A value starting with an unmatched `"` is kept literally, quote included.
pub fn parse_query(raw: &str) -> SearchQuery {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in QUALIFIER_RE.captures_iter(raw) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_free(&mut segments, &raw[cursor..whole.start()]);

        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());
        segments.push(Segment::Qualifier(Qualifier::from_pair(&caps[1], value)));
        cursor = whole.end();
    }
    push_free(&mut segments, &raw[cursor..]);

    SearchQuery { segments }
}

fn push_free(segments: &mut Vec<Segment>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        segments.push(Segment::Free(text.to_string()));
    }
}
