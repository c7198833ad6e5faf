// Search engine over the SQLite store. Request-level cases run against a
// slice store in src/search/engine/tests.rs.

use crate::models::Snippet;
use crate::search::{ScoreResult, SearchEngine, SearchRequest};
use crate::tests::helpers::{seeded_database, snippet, snippet_with_language};

fn names(results: &[ScoreResult]) -> Vec<&str> {
    results.iter().map(|r| r.snippet.name.as_str()).collect()
}

fn docker_corpus() -> Vec<Snippet> {
    vec![
        snippet("docker", "docker ps -a", &["docker"]),
        snippet(
            "deploy-script",
            "docker build . && docker push",
            &["deployment"],
        ),
        snippet("git-status", "git status -sb", &["git"]),
        snippet("docker-compose", "docker compose up -d", &["docker", "compose"]),
    ]
}

#[test]
fn test_docker_query_ranks_exact_then_substring_then_content() {
    let db = seeded_database(&docker_corpus());
    let engine = SearchEngine::new(&db);

    let results = engine.search_query("docker").unwrap();

    assert_eq!(names(&results), vec!["docker", "docker-compose", "deploy-script"]);
    assert_eq!(results[0].score, 100);
    assert_eq!(results[1].score, 95);
    assert_eq!(results[2].score, 37);
}

#[test]
fn test_no_query_lists_everything_newest_first() {
    let db = seeded_database(&docker_corpus());
    let engine = SearchEngine::new(&db);

    let results = engine.search(&SearchRequest::new()).unwrap();

    assert_eq!(
        names(&results),
        vec!["docker-compose", "git-status", "deploy-script", "docker"]
    );
    assert!(results.iter().all(|r| r.score == 100));
}

#[test]
fn test_tag_filter_narrows_candidates_before_scoring() {
    let db = seeded_database(&docker_corpus());
    let engine = SearchEngine::new(&db);

    let request = SearchRequest::new()
        .query("docker")
        .tags(vec!["deployment".to_string(), "git".to_string()]);
    let results = engine.search(&request).unwrap();

    assert_eq!(names(&results), vec!["deploy-script"]);
}

#[test]
fn test_language_filter_narrows_candidates() {
    let db = seeded_database(&[
        snippet_with_language("hello-py", "print('hello')", "python", &[]),
        snippet_with_language("hello-sh", "echo hello", "bash", &[]),
    ]);
    let engine = SearchEngine::new(&db);

    let results = engine
        .search(&SearchRequest::new().query("hello").language("bash"))
        .unwrap();
    assert_eq!(names(&results), vec!["hello-sh"]);
}

#[test]
fn test_several_matching_tags_outrank_a_weak_name() {
    let db = seeded_database(&[
        snippet(
            "orchestration",
            "kubectl apply -f stack.yaml",
            &["docker", "docker-compose", "deployment"],
        ),
        snippet("git-status", "git status -sb", &["git"]),
    ]);
    let engine = SearchEngine::new(&db);

    let results = engine.search_query("docker").unwrap();

    // Two tags contain the query: 70 + 70, clamped
    assert_eq!(names(&results), vec!["orchestration"]);
    assert!(results[0].score >= 70);
    assert_eq!(results[0].score, 100);
}
