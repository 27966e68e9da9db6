//! Repository search and in-repository search against a mock GitHub API.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use repo_scout::models::SearchErrorKind;
use repo_scout::query::{build_query, BoolOp, QualifierState};
use repo_scout::search::{search_within_repository, RepositorySearchService};

use common::{github_client, repo_json, search_page};

async fn service(server: &MockServer) -> RepositorySearchService {
    RepositorySearchService::new(github_client(&server.uri()))
}

// ─── Validation ──────────────────────────────────────────

#[tokio::test]
async fn test_overlong_query_never_reaches_github() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let envelope = service(&server).await.search(&"a".repeat(257), 1, 30).await;

    let error = envelope.error.expect("validation error");
    assert_eq!(error.kind, SearchErrorKind::QueryLength);
    assert!(envelope.repositories.is_empty());
    assert_eq!(envelope.total_count, 0);
    assert!(!envelope.has_next_page);
}

#[tokio::test]
async fn test_too_many_operators_never_reaches_github() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let envelope = service(&server)
        .await
        .search("a AND b AND c AND d AND e AND f AND g", 1, 30)
        .await;

    assert_eq!(envelope.error.unwrap().kind, SearchErrorKind::QueryOperators);
}

// ─── Regex mode ──────────────────────────────────────────

#[tokio::test]
async fn test_regex_mode_filters_then_paginates_locally() {
    let server = MockServer::start().await;

    // 100 raw results, of which 45 start with "test"
    let items = (0..100)
        .map(|i| {
            let name = if i < 45 {
                format!("test-{i:02}")
            } else {
                format!("other-{i:02}")
            };
            repo_json(i, &name)
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "test"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(items, 5000)))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("^test.*", 2, 10).await;

    assert!(envelope.error.is_none());
    assert_eq!(envelope.total_count, 45);
    assert_eq!(envelope.current_page, 2);
    assert_eq!(envelope.per_page, 10);
    assert!(envelope.has_next_page);
    let names: Vec<_> = envelope.repositories.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names.len(), 10);
    assert_eq!(names.first(), Some(&"test-10"));
    assert_eq!(names.last(), Some(&"test-19"));
}

#[tokio::test]
async fn test_regex_mode_last_page_has_no_next() {
    let server = MockServer::start().await;
    let items = (0..12).map(|i| repo_json(i, &format!("test-{i}"))).collect();
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(items, 12)))
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("^test", 2, 10).await;

    assert_eq!(envelope.total_count, 12);
    assert_eq!(envelope.repositories.len(), 2);
    assert!(!envelope.has_next_page);
}

#[tokio::test]
async fn test_pattern_without_alphanumerics_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let envelope = service(&server).await.search(".*", 1, 30).await;

    assert_eq!(envelope.error.unwrap().kind, SearchErrorKind::ValidationFailed);
}

// ─── Pass-through mode ───────────────────────────────────

#[tokio::test]
async fn test_invalid_regex_is_passed_through_verbatim() {
    let server = MockServer::start().await;
    let items = (0..5).map(|i| repo_json(i, &format!("repo-{i}"))).collect();
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "rust["))
        .and(query_param("page", "3"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(items, 40)))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("rust[", 3, 5).await;

    assert!(envelope.error.is_none());
    assert_eq!(envelope.total_count, 40);
    assert_eq!(envelope.repositories.len(), 5);
    assert!(envelope.has_next_page);
}

#[tokio::test]
async fn test_request_carries_auth_and_version_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(wiremock::matchers::header("authorization", "Bearer test-token"))
        .and(wiremock::matchers::header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("rust(", 1, 30).await;
    assert!(envelope.error.is_none());
}

// ─── Upstream failures ───────────────────────────────────

#[tokio::test]
async fn test_exhausted_rate_limit_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("tokio", 1, 30).await;

    let error = envelope.error.unwrap();
    assert_eq!(error.kind, SearchErrorKind::RateLimit);
    assert!(envelope.repositories.is_empty());
}

#[tokio::test]
async fn test_forbidden_with_quota_left_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "12")
                .set_body_json(json!({ "message": "Forbidden" })),
        )
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("tokio", 1, 30).await;
    assert_eq!(envelope.error.unwrap().kind, SearchErrorKind::Unknown);
}

#[tokio::test]
async fn test_unprocessable_query_is_validation_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Validation Failed" })),
        )
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("tokio", 1, 30).await;
    assert_eq!(envelope.error.unwrap().kind, SearchErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_server_error_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let envelope = service(&server).await.search("tokio", 1, 30).await;
    assert_eq!(envelope.error.unwrap().kind, SearchErrorKind::Unknown);
}

#[tokio::test]
async fn test_unreachable_github_is_unknown() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let service = RepositorySearchService::new(github_client(&uri));
    let envelope = service.search("tokio", 1, 30).await;
    assert_eq!(envelope.error.unwrap().kind, SearchErrorKind::Unknown);
}

// ─── In-repository search ────────────────────────────────

#[tokio::test]
async fn test_language_only_query_makes_no_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let github = github_client(&server.uri());
    let results = search_within_repository(&github, "octo", "hello", "language:go")
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_language_filter_only_scopes_code_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "repo:octo/hello parser language:rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(
            vec![json!({ "name": "parser.rs", "path": "src/parser.rs", "sha": "abc" })],
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "repo:octo/hello parser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(
            vec![json!({ "id": 7, "number": 3, "title": "parser panics", "state": "open" })],
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/commits"))
        .and(query_param("q", "repo:octo/hello parser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(1)
        .mount(&server)
        .await;

    let github = github_client(&server.uri());
    let results = search_within_repository(&github, "octo", "hello", "language:rust parser")
        .await
        .unwrap();

    assert_eq!(results.files.len(), 1);
    assert_eq!(results.files[0].path, "src/parser.rs");
    assert_eq!(results.issues.len(), 1);
    assert_eq!(results.issues[0].number, 3);
    assert!(results.commits.is_empty());
}

#[tokio::test]
async fn test_one_failed_scoped_search_fails_all() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/commits"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let github = github_client(&server.uri());
    let err = search_within_repository(&github, "octo", "hello", "parser")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_built_language_group_only_makes_no_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let mut state = QualifierState::default();
    state.push_language("Go", BoolOp::Or);
    state.push_language("Rust", BoolOp::Or);
    let query = build_query(&state).unwrap();
    assert_eq!(query, "(language:Go OR language:Rust)");

    let github = github_client(&server.uri());
    let results = search_within_repository(&github, "octo", "hello", &query)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_built_language_group_scopes_code_search_intact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param(
            "q",
            "repo:octo/hello parser (language:Go OR language:Rust)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
        .expect(1)
        .mount(&server)
        .await;
    for endpoint in ["/search/issues", "/search/commits"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("q", "repo:octo/hello parser"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(vec![], 0)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut state = QualifierState {
        free_text: "parser".to_string(),
        ..QualifierState::default()
    };
    state.push_language("Go", BoolOp::Or);
    state.push_language("Rust", BoolOp::Or);
    let query = build_query(&state).unwrap();

    let github = github_client(&server.uri());
    let results = search_within_repository(&github, "octo", "hello", &query)
        .await
        .unwrap();
    assert!(results.is_empty());
}
