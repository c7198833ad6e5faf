// SQLite snippet store tests

use crate::database::*;
use crate::models::{ExecutionMode, NewSnippet};
use crate::tests::helpers::snippets::at;
use crate::tests::helpers::{seeded_database, snippet, snippet_with_language, unique_temp_dir};

fn names(snippets: &[crate::models::Snippet]) -> Vec<&str> {
    snippets.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn test_database_creation() {
    let temp_dir = unique_temp_dir("db_create");
    let db_path = temp_dir.path().join("nested").join("snippets.db");

    let db = SnippetDatabase::new(&db_path).unwrap();
    let stats = db.get_stats().unwrap();

    assert!(db_path.exists(), "parent directories should be created");
    assert_eq!(db.file_path(), db_path.as_path());
    assert_eq!(stats.total_snippets, 0);
    assert_eq!(stats.total_tags, 0);
}

#[test]
fn test_schema_version_is_latest() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    assert_eq!(db.get_schema_version().unwrap(), LATEST_SCHEMA_VERSION);
}

#[test]
fn test_fresh_database_records_one_schema_migration() {
    let temp_dir = unique_temp_dir("db_migrations");
    let db_path = temp_dir.path().join("snippets.db");

    let count_versions = |db: &SnippetDatabase| -> i64 {
        db.conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap()
    };

    let db = SnippetDatabase::new(&db_path).unwrap();
    let description: String = db
        .conn
        .query_row(
            "SELECT description FROM schema_version WHERE version = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(description, "Initial schema");
    assert_eq!(count_versions(&db), 1);

    let indexes: i64 = db
        .conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_snippets_updated'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexes, 1);
    drop(db);

    let reopened = SnippetDatabase::new(&db_path).unwrap();
    assert_eq!(count_versions(&reopened), 1);
}

#[test]
fn test_reopen_is_idempotent_and_keeps_data() {
    let temp_dir = unique_temp_dir("db_reopen");
    let db_path = temp_dir.path().join("snippets.db");

    {
        let db = SnippetDatabase::new(&db_path).unwrap();
        db.create(&snippet("hello", "echo hello", &["demo"])).unwrap();
    }

    let db = SnippetDatabase::new(&db_path).unwrap();
    assert_eq!(db.get_schema_version().unwrap(), LATEST_SCHEMA_VERSION);
    let stored = db.get_by_name("hello").unwrap().unwrap();
    assert_eq!(stored.content, "echo hello");
    assert_eq!(stored.tags, vec!["demo"]);
}

#[test]
fn test_create_and_get_round_trip() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    let mut original = snippet_with_language("docker-ps", "docker ps -a", "bash", &["docker", "ops"]);
    original.execution_mode = ExecutionMode::Isolated;

    db.create(&original).unwrap();

    let by_name = db.get_by_name("docker-ps").unwrap().unwrap();
    assert_eq!(by_name, original);

    let by_id = db.get_by_id(&original.id).unwrap().unwrap();
    assert_eq!(by_id, original);
}

#[test]
fn test_sub_second_timestamps_survive_at_microsecond_precision() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    let fresh = NewSnippet::new("fresh", "true").build().unwrap();
    db.create(&fresh).unwrap();

    let stored = db.get_by_name("fresh").unwrap().unwrap();
    assert_eq!(
        stored.created_at.timestamp_micros(),
        fresh.created_at.timestamp_micros()
    );
}

#[test]
fn test_missing_snippet_is_none() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    assert!(db.get_by_name("nope").unwrap().is_none());
    assert!(db.get_by_id("nope").unwrap().is_none());
}

#[test]
fn test_duplicate_name_is_rejected_without_overwrite() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    db.create(&snippet("deploy", "first", &[])).unwrap();

    let err = db.create(&snippet("deploy", "second", &[])).unwrap_err();
    assert_eq!(err.to_string(), "Snippet 'deploy' already exists");

    let stored = db.get_by_name("deploy").unwrap().unwrap();
    assert_eq!(stored.content, "first");
    assert_eq!(db.list_all().unwrap().len(), 1);
}

#[test]
fn test_list_all_newest_first() {
    let db = seeded_database(&[
        snippet("oldest", "a", &[]),
        snippet("middle", "b", &[]),
        snippet("newest", "c", &[]),
    ]);

    assert_eq!(names(&db.list_all().unwrap()), vec!["newest", "middle", "oldest"]);
}

#[test]
fn test_equal_timestamps_fall_back_to_insertion_order() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    // Same updated_at on every row
    for name in ["first", "second", "third"] {
        db.create(&snippet(name, "x", &[])).unwrap();
    }

    assert_eq!(names(&db.list_all().unwrap()), vec!["third", "second", "first"]);
}

#[test]
fn test_find_by_language() {
    let db = seeded_database(&[
        snippet_with_language("py-one", "print(1)", "python", &[]),
        snippet_with_language("sh-one", "echo 1", "bash", &[]),
        snippet_with_language("py-two", "print(2)", "python", &[]),
    ]);

    let found = db.find(&SnippetFilter::new().language("python")).unwrap();
    assert_eq!(names(&found), vec!["py-two", "py-one"]);
}

#[test]
fn test_find_tags_match_any() {
    let db = seeded_database(&[
        snippet("a", "x", &["docker"]),
        snippet("b", "x", &["git"]),
        snippet("c", "x", &["k8s", "docker"]),
        snippet("d", "x", &[]),
    ]);

    let filter = SnippetFilter::new().tags(vec!["docker".to_string(), "git".to_string()]);
    assert_eq!(names(&db.find(&filter).unwrap()), vec!["c", "b", "a"]);
}

#[test]
fn test_find_empty_tag_list_is_no_filter() {
    let db = seeded_database(&[snippet("a", "x", &["docker"]), snippet("b", "x", &[])]);

    let found = db.find(&SnippetFilter::new().tags(Vec::new())).unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn test_find_combines_language_and_tags() {
    let db = seeded_database(&[
        snippet_with_language("a", "x", "python", &["web"]),
        snippet_with_language("b", "x", "bash", &["web"]),
        snippet_with_language("c", "x", "python", &["cli"]),
    ]);

    let filter = SnippetFilter::new()
        .language("python")
        .tags(vec!["web".to_string()]);
    assert_eq!(names(&db.find(&filter).unwrap()), vec!["a"]);
}

#[test]
fn test_find_text_matches_name_or_content_case_insensitively() {
    let db = seeded_database(&[
        snippet("Docker cleanup", "docker system prune", &[]),
        snippet("list files", "ls -la | grep DOCKER", &[]),
        snippet("unrelated", "echo hi", &[]),
    ]);

    let found = db.find(&SnippetFilter::new().text("docker")).unwrap();
    assert_eq!(names(&found), vec!["list files", "Docker cleanup"]);
}

#[test]
fn test_find_text_folds_non_ascii_case() {
    let db = seeded_database(&[
        snippet("café-notes", "espresso ratios", &[]),
        snippet("unicode", "Ünïcode body", &[]),
        snippet("plain", "nothing special", &[]),
    ]);

    assert_eq!(
        names(&db.find(&SnippetFilter::new().text("CAFÉ")).unwrap()),
        vec!["café-notes"]
    );
    assert_eq!(
        names(&db.find(&SnippetFilter::new().text("ünïcode")).unwrap()),
        vec!["unicode"]
    );
}

#[test]
fn test_find_text_combines_with_tag_filter() {
    let db = seeded_database(&[
        snippet("Straße cleanup", "rm -rf /tmp/x", &["ops"]),
        snippet("straße backup", "tar czf", &["backup"]),
    ]);

    let filter = SnippetFilter::new()
        .text("STRAßE")
        .tags(vec!["ops".to_string()]);
    assert_eq!(names(&db.find(&filter).unwrap()), vec!["Straße cleanup"]);
}

#[test]
fn test_find_text_treats_like_wildcards_literally() {
    let db = seeded_database(&[
        snippet("disk 100%", "df -h", &[]),
        snippet("disk 1000", "du -sh", &[]),
        snippet("under_score", "x", &[]),
        snippet("underscore", "x", &[]),
    ]);

    assert_eq!(
        names(&db.find(&SnippetFilter::new().text("100%")).unwrap()),
        vec!["disk 100%"]
    );
    assert_eq!(
        names(&db.find(&SnippetFilter::new().text("r_s")).unwrap()),
        vec!["under_score"]
    );
}

#[test]
fn test_update_persists_fields_and_normalizes_tags() {
    let db = seeded_database(&[snippet("hello", "echo hi", &["demo"])]);
    let mut stored = db.get_by_name("hello").unwrap().unwrap();

    stored.content = "echo bye".to_string();
    stored.language = "bash".to_string();
    stored.tags = vec!["Demo".to_string(), " shell ".to_string(), "demo".to_string()];
    stored.execution_mode = ExecutionMode::Isolated;
    db.update(&mut stored).unwrap();

    let reloaded = db.get_by_name("hello").unwrap().unwrap();
    assert_eq!(reloaded.content, "echo bye");
    assert_eq!(reloaded.language, "bash");
    assert_eq!(reloaded.tags, vec!["demo", "shell"]);
    assert_eq!(reloaded.execution_mode, ExecutionMode::Isolated);
    assert_eq!(reloaded.created_at, at(0));
}

#[test]
fn test_update_bumps_updated_at_and_reorders() {
    let db = seeded_database(&[snippet("old", "a", &[]), snippet("new", "b", &[])]);
    assert_eq!(names(&db.list_all().unwrap()), vec!["new", "old"]);

    let mut old = db.get_by_name("old").unwrap().unwrap();
    let before = old.updated_at;
    db.update(&mut old).unwrap();

    assert!(old.updated_at > before);
    assert_eq!(names(&db.list_all().unwrap()), vec!["old", "new"]);
}

#[test]
fn test_update_never_moves_updated_at_backwards() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    let mut future = snippet("future", "x", &[]);
    future.updated_at = chrono::Utc::now() + chrono::Duration::days(365);
    db.create(&future).unwrap();

    let expected = future.updated_at;
    db.update(&mut future).unwrap();
    assert_eq!(future.updated_at, expected);
}

#[test]
fn test_create_normalizes_hand_built_snippets() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    let mut raw = snippet("raw", "echo raw", &[]);
    raw.language = "  Python ".to_string();
    raw.tags = vec![" Docker".to_string(), "docker".to_string(), String::new()];

    db.create(&raw).unwrap();

    let stored = db.get_by_name("raw").unwrap().unwrap();
    assert_eq!(stored.language, "python");
    assert_eq!(stored.tags, vec!["docker"]);
    assert_eq!(
        names(&db.find(&SnippetFilter::new().tags(vec!["docker".to_string()])).unwrap()),
        vec!["raw"]
    );
}

#[test]
fn test_create_rejects_invalid_hand_built_snippets() {
    let db = SnippetDatabase::open_in_memory().unwrap();

    let mut unnamed = snippet("placeholder", "echo hi", &[]);
    unnamed.name = String::new();
    assert!(db.create(&unnamed).is_err());

    let mut empty = snippet("empty", "x", &[]);
    empty.content.clear();
    assert!(db.create(&empty).is_err());

    assert!(db.list_all().unwrap().is_empty());
}

#[test]
fn test_update_normalizes_language() {
    let db = seeded_database(&[snippet("hello", "echo hi", &[])]);
    let mut stored = db.get_by_name("hello").unwrap().unwrap();

    stored.language = "BASH".to_string();
    db.update(&mut stored).unwrap();
    assert_eq!(stored.language, "bash");

    stored.language = "   ".to_string();
    db.update(&mut stored).unwrap();
    assert_eq!(db.get_by_name("hello").unwrap().unwrap().language, "auto");
}

#[test]
fn test_update_rename_onto_existing_name_fails() {
    let db = seeded_database(&[snippet("alpha", "a", &[]), snippet("beta", "b", &[])]);
    let mut beta = db.get_by_name("beta").unwrap().unwrap();
    beta.name = "alpha".to_string();

    let err = db.update(&mut beta).unwrap_err();
    assert_eq!(err.to_string(), "Snippet 'alpha' already exists");
    assert_eq!(db.get_by_name("beta").unwrap().unwrap().content, "b");
}

#[test]
fn test_update_rejects_invalid_snippets() {
    let db = seeded_database(&[snippet("alpha", "a", &[])]);
    let mut alpha = db.get_by_name("alpha").unwrap().unwrap();

    alpha.content.clear();
    assert!(db.update(&mut alpha).is_err());

    alpha.content = "a".to_string();
    alpha.name = String::new();
    assert!(db.update(&mut alpha).is_err());
}

#[test]
fn test_update_unknown_snippet_fails() {
    let db = SnippetDatabase::open_in_memory().unwrap();
    let mut ghost = snippet("ghost", "boo", &[]);

    let err = db.update(&mut ghost).unwrap_err();
    assert!(err.to_string().contains("not found"), "{}", err);
}

#[test]
fn test_delete_reports_whether_a_row_was_removed() {
    let db = seeded_database(&[snippet("a", "x", &[]), snippet("b", "x", &[])]);
    let a = db.get_by_name("a").unwrap().unwrap();

    assert!(db.delete(&a.id).unwrap());
    assert!(!db.delete(&a.id).unwrap());
    assert!(db.delete_by_name("b").unwrap());
    assert!(!db.delete_by_name("b").unwrap());
    assert!(db.list_all().unwrap().is_empty());
}

#[test]
fn test_get_all_tags_sorted_by_count_then_name() {
    let db = seeded_database(&[
        snippet("a", "x", &["docker", "ops"]),
        snippet("b", "x", &["git"]),
        snippet("c", "x", &["docker", "git"]),
        snippet("d", "x", &["docker", "aws"]),
    ]);

    let tags = db.get_all_tags().unwrap();
    let flat: Vec<(&str, i64)> = tags.iter().map(|t| (t.tag.as_str(), t.count)).collect();
    assert_eq!(
        flat,
        vec![("docker", 3), ("git", 2), ("aws", 1), ("ops", 1)]
    );
}

#[test]
fn test_stats_count_snippets_tags_and_languages() {
    let db = seeded_database(&[
        snippet_with_language("a", "x", "python", &["web", "api"]),
        snippet_with_language("b", "x", "bash", &["web"]),
    ]);

    let stats = db.get_stats().unwrap();
    assert_eq!(stats.total_snippets, 2);
    assert_eq!(stats.total_tags, 2);
    assert_eq!(stats.languages, vec!["bash", "python"]);
}
