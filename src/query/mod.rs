//! GitHub search-qualifier handling.
//!
//! [`parse_query`] splits a raw string into qualifier and free-text segments;
//! [`build_query`] goes the other way from the editable [`QualifierState`].

pub mod builder;
pub mod parser;

pub use builder::{
    build_query, is_symbol_language, BoolOp, LanguageChip, QualifierState, QueryBuildError,
    SYMBOL_LANGUAGES,
};
pub use parser::{parse_query, Qualifier, SearchQuery, Segment, SymbolPattern};
