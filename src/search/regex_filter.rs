use regex::{Regex, RegexBuilder};

use crate::models::Repository;

/// Whether `pattern` compiles as a regular expression.
pub fn is_valid_regex(pattern: &str) -> bool {
    Regex::new(pattern).is_ok()
}

/// Keep repositories whose name, full name or description matches `pattern`
/// case-insensitively. A pattern that fails to compile matches nothing.
pub fn filter_repositories_by_regex(repositories: Vec<Repository>, pattern: &str) -> Vec<Repository> {
    let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => regex,
        Err(e) => {
            tracing::debug!("Regex filter skipped, pattern does not compile: {e}");
            return Vec::new();
        }
    };

    repositories
        .into_iter()
        .filter(|repo| matches_repository(&regex, repo))
        .collect()
}

fn matches_repository(regex: &Regex, repo: &Repository) -> bool {
    regex.is_match(&repo.name)
        || regex.is_match(&repo.full_name)
        || repo
            .description
            .as_deref()
            .is_some_and(|d| regex.is_match(d))
}
