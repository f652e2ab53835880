//! Integration tests for job execution.
//!
//! Tests cover:
//! - Copy, link and move placement
//! - Archive materialization end to end
//! - Parallel execution with a bounded worker pool
//! - Failure isolation between jobs

use episode_organizer::core::executor::{ExecutionMode, Executor, ExecutorConfig};
use episode_organizer::core::parser::EpisodeParser;
use episode_organizer::core::planner::build_jobs;
use episode_organizer::core::scanner::MediaScanner;
use episode_organizer::models::config::MediaConfig;
use episode_organizer::models::job::{Action, Job, OutcomeStatus};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn parser() -> EpisodeParser {
    EpisodeParser::new(&MediaConfig::default()).unwrap()
}

fn executor(max_workers: usize) -> Executor {
    Executor::with_config(
        parser(),
        ExecutorConfig {
            max_workers,
            verify_checksum: true,
        },
    )
}

/// Copy a RAR fixture from `tests/fixtures` to `path`.
fn copy_fixture(fixture: &str, path: &Path) {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(fixture);
    fs::copy(source, path).unwrap();
}

/// Create `count` episode files of season 1 and plan them into `target`.
fn episode_jobs(source: &Path, target: &Path, count: u32, action: Action) -> Vec<Job> {
    fs::create_dir_all(source).unwrap();
    let items: Vec<PathBuf> = (1..=count)
        .map(|episode| {
            let path = source.join(format!("Show.S01E{:02}.mkv", episode));
            fs::write(&path, format!("episode {}", episode)).unwrap();
            path
        })
        .collect();

    build_jobs(&items, target, action, &parser()).unwrap().jobs
}

// ========== PLACEMENT TESTS ==========

#[tokio::test]
async fn test_copy_preserves_source() {
    let temp_dir = TempDir::new().unwrap();
    let target_root = temp_dir.path().join("show");
    let jobs = episode_jobs(&temp_dir.path().join("src"), &target_root, 1, Action::Copy);
    let source = jobs[0].source.clone();

    let summary = executor(4).run_serial(jobs, |_| {}).await.unwrap();

    let target = target_root.join("season 01").join("s01e01.mkv");
    assert_eq!(summary.total_placed(), 1);
    assert!(source.exists());
    assert_eq!(fs::read_to_string(target).unwrap(), "episode 1");
}

#[tokio::test]
async fn test_link_shares_contents() {
    let temp_dir = TempDir::new().unwrap();
    let target_root = temp_dir.path().join("show");
    let jobs = episode_jobs(&temp_dir.path().join("src"), &target_root, 1, Action::Link);
    let source = jobs[0].source.clone();

    let summary = executor(4).run_serial(jobs, |_| {}).await.unwrap();

    let target = target_root.join("season 01").join("s01e01.mkv");
    assert_eq!(summary.total_placed(), 1);
    assert!(source.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        assert_eq!(
            fs::metadata(&source).unwrap().ino(),
            fs::metadata(&target).unwrap().ino()
        );
    }
}

#[tokio::test]
async fn test_move_removes_source() {
    let temp_dir = TempDir::new().unwrap();
    let target_root = temp_dir.path().join("show");
    let jobs = episode_jobs(&temp_dir.path().join("src"), &target_root, 2, Action::Move);
    let sources: Vec<_> = jobs.iter().map(|j| j.source.clone()).collect();

    let summary = executor(4).run_serial(jobs, |_| {}).await.unwrap();

    assert_eq!(summary.total_placed(), 2);
    assert!(sources.iter().all(|s| !s.exists()));
    assert!(target_root.join("season 01").join("s01e02.mkv").exists());
}

#[tokio::test]
async fn test_move_onto_existing_target_fails() {
    let temp_dir = TempDir::new().unwrap();
    let target_root = temp_dir.path().join("show");
    let jobs = episode_jobs(&temp_dir.path().join("src"), &target_root, 1, Action::Move);
    let source = jobs[0].source.clone();
    let target = jobs[0].target.clone();
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, "already here").unwrap();

    let summary = executor(4).run_serial(jobs, |_| {}).await.unwrap();

    assert_eq!(summary.total_placed(), 0);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].error.contains("already exists"));
    assert!(source.exists());
    assert_eq!(fs::read_to_string(&target).unwrap(), "already here");
}

#[tokio::test]
async fn test_serial_preserves_order() {
    let temp_dir = TempDir::new().unwrap();
    let jobs = episode_jobs(
        &temp_dir.path().join("src"),
        &temp_dir.path().join("show"),
        5,
        Action::Copy,
    );
    let expected: Vec<_> = jobs.iter().map(|j| j.target.clone()).collect();

    let mut seen = Vec::new();
    executor(4)
        .run_serial(jobs, |outcome| seen.push(outcome.job.target.clone()))
        .await
        .unwrap();

    assert_eq!(seen, expected);
}

// ========== ARCHIVE TESTS ==========

#[tokio::test]
async fn test_archive_episode_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let source_root = temp_dir.path().join("show_source");
    let target_root = temp_dir.path().join("media").join("show");
    fs::create_dir_all(&source_root).unwrap();
    copy_fixture("episode.rar", &source_root.join("Show.S02E03.rar"));

    let parser = parser();
    let scanner = MediaScanner::new(parser.classifier().clone());
    let items = scanner.discover(&source_root);
    let jobs = build_jobs(&items, &target_root, Action::Move, &parser).unwrap().jobs;
    assert_eq!(jobs[0].target, target_root.join("season 02").join("s02e03.rar"));

    let summary = executor(4)
        .run(jobs, ExecutionMode::Parallel, |_| {})
        .await
        .unwrap();

    let placed = target_root.join("season 02").join("s02e03.mkv");
    assert_eq!(summary.total_placed(), 1);
    assert_eq!(summary.directory_counts[&target_root.join("season 02")], 1);
    assert_eq!(fs::read(&placed).unwrap(), b"episode contents");
    // Moved out of the extraction spot, archive left alone
    assert!(!source_root.join("episode.mkv").exists());
    assert!(source_root.join("Show.S02E03.rar").exists());
}

#[test]
fn test_archive_copy_leaves_extracted_file() {
    let temp_dir = TempDir::new().unwrap();
    let source_root = temp_dir.path().join("show_source");
    fs::create_dir_all(&source_root).unwrap();
    let archive = source_root.join("Show.S02E03.rar");
    copy_fixture("episode.rar", &archive);
    let target = temp_dir.path().join("show").join("season 02").join("s02e03.rar");

    let outcome = executor(1).execute(Job::new(Action::Copy, archive, target));

    assert!(outcome.is_placed());
    assert_eq!(outcome.job.source, source_root.join("episode.mkv"));
    assert!(source_root.join("episode.mkv").exists());
    assert!(temp_dir
        .path()
        .join("show")
        .join("season 02")
        .join("s02e03.mkv")
        .exists());
}

#[tokio::test]
async fn test_archive_without_media_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("Show.S02E03.rar");
    copy_fixture("no_media.rar", &archive);
    let target_root = temp_dir.path().join("show");
    let job = Job::new(
        Action::Move,
        archive.clone(),
        target_root.join("season 02").join("s02e03.rar"),
    );

    let summary = executor(1).run_serial(vec![job], |_| {}).await.unwrap();

    assert_eq!(summary.total_placed(), 0);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.skipped.len(), 1);
    assert!(archive.exists());
    assert!(!target_root.exists());
}

#[test]
fn test_corrupt_archive_fails_job() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("Show.S02E03.rar");
    fs::write(&archive, "garbage").unwrap();
    let job = Job::new(
        Action::Move,
        archive,
        temp_dir.path().join("show").join("season 02").join("s02e03.rar"),
    );

    let outcome = executor(1).execute(job);

    match outcome.status {
        OutcomeStatus::Failed { error } => assert!(error.contains("archive")),
        other => panic!("unexpected status: {:?}", other),
    }
}

#[test]
fn test_archive_extraction_keeps_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let source_root = temp_dir.path().join("show_source");
    fs::create_dir_all(&source_root).unwrap();
    let archive = source_root.join("Show.S02E03.rar");
    copy_fixture("episode.rar", &archive);
    let existing = source_root.join("episode.mkv");
    fs::write(&existing, "unrelated file").unwrap();
    let target_root = temp_dir.path().join("show");

    let outcome = executor(1).execute(Job::new(
        Action::Move,
        archive,
        target_root.join("season 02").join("s02e03.rar"),
    ));

    match outcome.status {
        OutcomeStatus::Failed { error } => assert!(error.contains("already exists")),
        other => panic!("unexpected status: {:?}", other),
    }
    assert_eq!(fs::read_to_string(&existing).unwrap(), "unrelated file");
    assert!(!target_root.exists());
}

// ========== CONCURRENCY TESTS ==========

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_executes_each_job_once() {
    let temp_dir = TempDir::new().unwrap();
    let target_root = temp_dir.path().join("show");
    let jobs = episode_jobs(&temp_dir.path().join("src"), &target_root, 100, Action::Move);
    let targets: HashSet<_> = jobs.iter().map(|j| j.target.clone()).collect();
    assert_eq!(targets.len(), 100);

    let mut outcomes = 0usize;
    let summary = executor(64)
        .run_parallel(jobs, |_| outcomes += 1)
        .await
        .unwrap();

    // A second execution of any move job would fail on the missing source
    assert_eq!(outcomes, 100);
    assert_eq!(summary.processed(), 100);
    assert_eq!(summary.total_placed(), 100);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.directory_counts.len(), 1);
    assert_eq!(summary.directory_counts[&target_root.join("season 01")], 100);
    assert!(targets.iter().all(|t| t.exists()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_failure_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let target_root = temp_dir.path().join("show");
    let mut jobs = episode_jobs(&temp_dir.path().join("src"), &target_root, 99, Action::Copy);

    // Target directory sits below a regular file and cannot be created
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let bad_source = temp_dir.path().join("src").join("Show.S01E100.mkv");
    fs::write(&bad_source, "episode 100").unwrap();
    let bad_target = blocker.join("season 01").join("s01e100.mkv");
    jobs.insert(50, Job::new(Action::Copy, bad_source, bad_target.clone()));

    let summary = executor(64)
        .run_parallel(jobs, |_| {})
        .await
        .unwrap();

    assert_eq!(summary.processed(), 100);
    assert_eq!(summary.total_placed(), 99);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].job.target, bad_target);
}

#[tokio::test]
async fn test_parallel_with_fewer_jobs_than_workers() {
    let temp_dir = TempDir::new().unwrap();
    let jobs = episode_jobs(
        &temp_dir.path().join("src"),
        &temp_dir.path().join("show"),
        3,
        Action::Copy,
    );

    let summary = executor(64)
        .run(jobs, ExecutionMode::Parallel, |_| {})
        .await
        .unwrap();

    assert_eq!(summary.total_placed(), 3);
}
