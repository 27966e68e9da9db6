//! Repository search and in-repository search on top of the GitHub client.

pub mod in_repo;
pub mod regex_filter;
pub mod repositories;

pub use in_repo::{search_within_repository, split_language_clauses, ScopedQuery};
pub use regex_filter::{filter_repositories_by_regex, is_valid_regex};
pub use repositories::{validate_query, RepositorySearchService};
