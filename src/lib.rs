//! # repo-scout
//!
//! A backend for exploring GitHub: repository search with local regex
//! filtering, search scoped to a single repository, repository detail
//! pages, a structured query builder, and LLM file summaries.
//!
//! ## Request flow
//!
//! ```text
//!            ┌──────────────────────────┐
//!            │  GET /api/repositories/  │
//!            │      search?q=...        │
//!            └────────────┬─────────────┘
//!                         │
//!                         ▼
//!            ┌──────────────────────────┐
//!            │  Validate: ≤256 chars,   │
//!            │  ≤5 AND/OR/NOT           │
//!            └────────────┬─────────────┘
//!                         │
//!            ┌────────────┴─────────────┐
//!            ▼                          ▼
//!   ┌─────────────────┐       ┌──────────────────┐
//!   │  Regex mode     │       │  Pass-through    │
//!   │  alnum term,    │       │  query verbatim, │
//!   │  fetch 100,     │       │  upstream page   │
//!   │  filter + page  │       │                  │
//!   └────────┬────────┘       └────────┬─────────┘
//!            └────────────┬────────────┘
//!                         ▼
//!            ┌──────────────────────────┐
//!            │  Envelope: items, total, │
//!            │  hasNextPage, error?     │
//!            └──────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server, GitHub, LLM and job limits
//! - [`models`] - GitHub resource types and the search result envelope
//! - [`github`] - Authenticated GitHub REST client and its error classification
//! - [`search::repositories`] - Validated repository search with regex filtering and pagination
//! - [`search::in_repo`] - Concurrent code, issue and commit search within one repository
//! - [`details`] - Repository page bundle with bounded per-commit stats fetches
//! - [`query`] - Qualifier query parsing and building
//! - [`llm`] - One-shot completions via Ollama, OpenAI-compatible or Anthropic APIs
//! - [`summary`] - Background summary jobs in a bounded, expiring store
//! - [`api`] - Axum HTTP handlers and router
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod details;
pub mod github;
pub mod llm;
pub mod models;
pub mod query;
pub mod search;
pub mod state;
pub mod summary;
