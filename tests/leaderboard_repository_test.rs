//! Tests for leaderboard persistence.

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use game2048::{
    GameRepository, LEADERBOARD_CAPACITY, LeaderboardError, LeaderboardService, NewScoreRecord,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    (db_file, repo)
}

fn record(name: &str, score: i64) -> NewScoreRecord {
    let date = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid date");
    NewScoreRecord::new(name.to_string(), score, date)
}

#[test]
fn test_list_scores_empty() {
    let (_db, repo) = setup_test_db();
    let scores = repo.list_scores().expect("List failed");
    assert!(scores.is_empty());
}

#[test]
fn test_replace_scores_into_empty_table() {
    let (_db, repo) = setup_test_db();
    let stored = repo.replace_scores(&[record("Ann", 512)]).expect("Replace failed");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name(), "Ann");
    assert_eq!(*stored[0].score(), 512);
    assert!(*stored[0].id() > 0);
}

#[test]
fn test_list_scores_ordered_by_score_then_insertion() {
    let (_db, repo) = setup_test_db();
    repo.replace_scores(&[record("first", 100), record("top", 900), record("second", 100)])
        .expect("Replace failed");

    let names: Vec<String> = repo
        .list_scores()
        .expect("List failed")
        .iter()
        .map(|s| s.name().clone())
        .collect();
    assert_eq!(names, ["top", "first", "second"]);
}

#[test]
fn test_replace_scores_overwrites_table() {
    let (_db, repo) = setup_test_db();
    repo.replace_scores(&[record("old", 5)]).expect("Replace failed");

    let stored = repo
        .replace_scores(&[record("a", 30), record("b", 20)])
        .expect("Replace failed");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].name(), "a");
    assert_eq!(stored[1].name(), "b");
}

#[test]
fn test_replace_scores_with_nothing_clears_table() {
    let (_db, repo) = setup_test_db();
    repo.replace_scores(&[record("old", 5)]).expect("Replace failed");
    assert!(repo.replace_scores(&[]).expect("Replace failed").is_empty());
}

#[test]
fn test_service_rejects_blank_name_without_writing() {
    let (_db, repo) = setup_test_db();
    let service = LeaderboardService::new(repo.clone());
    service.submit("Kim", 64).expect("Submit failed");

    let result = service.submit("   ", 4096);
    assert!(matches!(result, Err(LeaderboardError::BlankName)));

    let scores = repo.list_scores().expect("List failed");
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].name(), "Kim");
}

#[test]
fn test_service_keeps_top_ten() {
    let (_db, repo) = setup_test_db();
    let service = LeaderboardService::new(repo.clone());

    for i in 1..=12u64 {
        service.submit(&format!("player{i}"), i * 100).expect("Submit failed");
    }

    let board = service.load().expect("Load failed");
    assert_eq!(board.len(), LEADERBOARD_CAPACITY);
    assert_eq!(board.best(), Some(1200));
    assert_eq!(board.entries().last().map(|e| *e.score()), Some(300));
    assert_eq!(repo.list_scores().expect("List failed").len(), LEADERBOARD_CAPACITY);
}

#[test]
fn test_service_reports_rank_and_trims_name() {
    let (_db, repo) = setup_test_db();
    let service = LeaderboardService::new(repo);
    service.submit("a", 1000).expect("Submit failed");

    let (board, rank) = service.submit("  Lee ", 500).expect("Submit failed");
    assert_eq!(rank, Some(2));
    assert_eq!(board.entries()[1].name(), "Lee");
}

#[test]
fn test_leaderboard_survives_reopen() {
    let (db, repo) = setup_test_db();
    LeaderboardService::new(repo)
        .submit("Max", 2048)
        .expect("Submit failed");

    let path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = GameRepository::new(path).expect("Reopen failed");
    let board = LeaderboardService::new(reopened).load().expect("Load failed");
    assert_eq!(board.entries()[0].name(), "Max");
    assert_eq!(*board.entries()[0].score(), 2048);
}
