//! End-to-end merge runs against scratch directory trees.

use folder_merger::{MergeConfig, MergeEngine, MergeError, MergeEvent, Summary};
use rstest::{fixture, rstest};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Create a file (and its parent folders) with the given contents
    fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("create parent");
        fs::write(&path, contents).expect("write file");
        path
    }

    fn folder(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("create folder");
        path
    }

    /// Base config: logging off so tests do not litter the working directory
    fn config(&self, sources: &[&str]) -> MergeConfig {
        MergeConfig::new(sources.iter().map(|s| self.path(s)), self.path("out"))
            .with_rename_on_conflict(true)
            .with_delete_empty_sources(false)
            .with_preserve_structure(false)
            .with_write_log(false)
    }
}

#[fixture]
fn ws() -> Workspace {
    Workspace {
        dir: TempDir::new().expect("create temp dir"),
    }
}

fn run(config: MergeConfig) -> (Result<Summary, MergeError>, Vec<MergeEvent>) {
    let mut events = Vec::new();
    let result = MergeEngine::new(config).run(&mut events);
    (result, events)
}

fn moved_records(events: &[MergeEvent]) -> Vec<(PathBuf, PathBuf)> {
    events
        .iter()
        .filter_map(|e| match e {
            MergeEvent::Moved(r) => Some((r.source.clone(), r.destination.clone())),
            _ => None,
        })
        .collect()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[rstest]
fn same_name_files_are_renamed(ws: Workspace) {
    ws.file("a/f1.txt", "from a");
    ws.file("b/f1.txt", "from b");

    let (result, events) = run(ws.config(&["a", "b"]));
    let summary = result.expect("merge succeeds");

    assert_eq!(read(&ws.path("out/f1.txt")), "from a");
    assert_eq!(read(&ws.path("out/f1_1.txt")), "from b");
    assert_eq!(summary.files_moved, 2);
    assert_eq!(summary.files_renamed, 1);

    // Emptied sources stay when deletion is off
    assert!(ws.path("a").is_dir());
    assert!(ws.path("b").is_dir());
    assert_eq!(fs::read_dir(ws.path("a")).unwrap().count(), 0);

    assert_eq!(
        moved_records(&events),
        vec![
            (ws.path("a/f1.txt"), ws.path("out/f1.txt")),
            (ws.path("b/f1.txt"), ws.path("out/f1_1.txt")),
        ]
    );
}

#[rstest]
fn renaming_skips_names_already_in_target(ws: Workspace) {
    ws.file("out/photo.jpg", "old");
    ws.file("out/photo_1.jpg", "old 1");
    ws.file("a/photo.jpg", "new");

    run(ws.config(&["a"])).0.expect("merge succeeds");

    assert_eq!(read(&ws.path("out/photo.jpg")), "old");
    assert_eq!(read(&ws.path("out/photo_1.jpg")), "old 1");
    assert_eq!(read(&ws.path("out/photo_2.jpg")), "new");
}

#[rstest]
fn conflict_without_rename_fails_and_keeps_existing(ws: Workspace) {
    ws.file("a/f1.txt", "from a");
    ws.file("b/f1.txt", "from b");

    let (result, events) = run(ws.config(&["a", "b"]).with_rename_on_conflict(false));

    let err = result.expect_err("second move collides");
    assert_eq!(err.io_kind(), Some(io::ErrorKind::AlreadyExists));
    let summary = err.partial_summary().expect("partial summary");
    assert_eq!(summary.files_moved, 1);
    assert_eq!(summary.total_files, 2);

    // Nothing overwritten, nothing rolled back
    assert_eq!(read(&ws.path("out/f1.txt")), "from a");
    assert_eq!(read(&ws.path("b/f1.txt")), "from b");
    assert_eq!(moved_records(&events).len(), 1);
}

#[rstest]
#[case::preserved(true, "out/sub/x.txt")]
#[case::flattened(false, "out/x.txt")]
fn structure_option_decides_destination(ws: Workspace, #[case] preserve: bool, #[case] expected: &str) {
    ws.file("a/sub/x.txt", "x");

    run(ws.config(&["a"]).with_preserve_structure(preserve))
        .0
        .expect("merge succeeds");

    assert_eq!(read(&ws.path(expected)), "x");
    assert!(!ws.path("a/sub/x.txt").exists());
}

#[rstest]
fn preserved_structure_renames_within_subfolder(ws: Workspace) {
    ws.file("a/docs/readme.md", "a");
    ws.file("b/docs/readme.md", "b");
    ws.file("b/readme.md", "top");

    run(ws.config(&["a", "b"]).with_preserve_structure(true))
        .0
        .expect("merge succeeds");

    assert_eq!(read(&ws.path("out/docs/readme.md")), "a");
    assert_eq!(read(&ws.path("out/docs/readme_1.md")), "b");
    assert_eq!(read(&ws.path("out/readme.md")), "top");
}

#[rstest]
fn emptied_sources_are_deleted(ws: Workspace) {
    ws.file("a/one.txt", "1");
    ws.file("b/nested/two.txt", "2");

    let (result, events) = run(ws.config(&["a", "b"]).with_delete_empty_sources(true));
    let summary = result.expect("merge succeeds");

    // `a` is empty afterwards; `b` still holds the empty `nested` folder
    assert!(!ws.path("a").exists());
    assert!(ws.path("b/nested").is_dir());
    assert_eq!(summary.folders_deleted, 1);

    let deleted: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            MergeEvent::FolderDeleted(p) => Some(p.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(deleted, vec![ws.path("a")]);
}

#[rstest]
fn progress_total_matches_moves(ws: Workspace) {
    ws.file("a/1.txt", "");
    ws.file("a/deep/er/2.txt", "");
    ws.file("b/3.txt", "");
    ws.folder("c/empty");

    let (result, events) = run(ws.config(&["a", "b", "c"]));
    let summary = result.expect("merge succeeds");

    let progress: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            MergeEvent::Progress(p) => Some((p.processed, p.total)),
            _ => None,
        })
        .collect();

    assert_eq!(summary.total_files, 3);
    assert_eq!(moved_records(&events).len(), summary.total_files);
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
}

#[rstest]
fn progress_precedes_each_moved_event(ws: Workspace) {
    ws.file("a/1.txt", "");
    ws.file("a/2.txt", "");

    let (_, events) = run(ws.config(&["a"]));

    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e {
            MergeEvent::Progress(_) => "progress",
            MergeEvent::Moved(_) => "moved",
            MergeEvent::FolderDeleted(_) => "deleted",
            MergeEvent::Finished(_) => "finished",
        })
        .collect();
    assert_eq!(kinds, vec!["progress", "moved", "progress", "moved"]);
}

#[rstest]
fn log_file_records_moves_and_deletions(ws: Workspace) {
    ws.file("a/f1.txt", "");
    let logs = ws.folder("logs");

    let summary = run(
        ws.config(&["a"])
            .with_write_log(true)
            .with_log_dir(&logs)
            .with_delete_empty_sources(true),
    )
    .0
    .expect("merge succeeds");

    let log_path = summary.log_path.expect("log written");
    assert_eq!(log_path.parent(), Some(logs.as_path()));

    let expected = format!(
        "Moved: {} -> {}\nDeleted empty folder: {}\n",
        ws.path("a/f1.txt").display(),
        ws.path("out/f1.txt").display(),
        ws.path("a").display()
    );
    assert_eq!(read(&log_path), expected);
}

#[rstest]
fn log_is_kept_when_run_fails(ws: Workspace) {
    ws.file("a/f1.txt", "");
    ws.file("b/f1.txt", "");
    let logs = ws.folder("logs");

    let err = run(
        ws.config(&["a", "b"])
            .with_rename_on_conflict(false)
            .with_write_log(true)
            .with_log_dir(&logs),
    )
    .0
    .expect_err("collision");

    let log_path = err
        .partial_summary()
        .and_then(|s| s.log_path.clone())
        .expect("log path in partial summary");
    let contents = read(&log_path);
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("Moved: "));
}

#[rstest]
fn missing_target_is_created(ws: Workspace) {
    ws.file("a/f.txt", "f");
    let config = MergeConfig::new([ws.path("a")], ws.path("deep/new/target")).with_write_log(false);

    run(config).0.expect("merge succeeds");

    assert_eq!(read(&ws.path("deep/new/target/f.txt")), "f");
}

#[rstest]
fn validation_runs_before_anything_moves(ws: Workspace) {
    ws.file("a/f.txt", "f");

    let (result, events) = run(ws.config(&["a", "missing"]));

    match result {
        Err(MergeError::SourceNotFound(path)) => assert_eq!(path, ws.path("missing")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(events.is_empty());
    assert!(ws.path("a/f.txt").exists());
    assert!(!ws.path("out").exists());
}

#[rstest]
fn plan_matches_actual_run(ws: Workspace) {
    ws.file("a/f1.txt", "");
    ws.file("a/sub/f2.txt", "");
    ws.file("b/f1.txt", "");
    ws.file("b/sub/f2.txt", "");
    ws.file("out/f2.txt", "already here");

    let config = ws.config(&["a", "b"]);
    let planned = MergeEngine::new(config.clone()).plan().expect("plan");
    let (result, events) = run(config);
    result.expect("merge succeeds");

    let planned: Vec<_> = planned
        .into_iter()
        .map(|r| (r.source, r.destination))
        .collect();
    assert_eq!(planned, moved_records(&events));
    assert_eq!(read(&ws.path("out/f2.txt")), "already here");
    assert!(ws.path("out/f2_2.txt").exists());
}

#[rstest]
#[case::outer_first(&["a", "a/sub"])]
#[case::inner_first(&["a/sub", "a"])]
fn plan_matches_run_with_nested_sources(ws: Workspace, #[case] sources: &[&str]) {
    ws.file("a/top.txt", "");
    ws.file("a/sub/x.txt", "");

    let config = ws.config(sources);
    let planned = MergeEngine::new(config.clone()).plan().expect("plan");
    let (result, events) = run(config);
    let summary = result.expect("merge succeeds");

    let planned: Vec<_> = planned
        .into_iter()
        .map(|r| (r.source, r.destination))
        .collect();
    assert_eq!(planned, moved_records(&events));
    assert_eq!(summary.files_moved, 2);
    assert!(ws.path("out/x.txt").exists());
    assert!(!ws.path("out/x_1.txt").exists());
}

#[cfg(unix)]
#[rstest]
fn dangling_symlink_in_target_is_not_replaced(ws: Workspace) {
    ws.file("a/f1.txt", "from a");
    ws.folder("out");
    std::os::unix::fs::symlink(ws.path("nowhere.txt"), ws.path("out/f1.txt")).expect("symlink");

    run(ws.config(&["a"])).0.expect("merge succeeds");

    let link = fs::symlink_metadata(ws.path("out/f1.txt")).expect("link kept");
    assert!(link.file_type().is_symlink());
    assert_eq!(read(&ws.path("out/f1_1.txt")), "from a");
}

#[rstest]
fn plan_reports_collision_without_rename(ws: Workspace) {
    ws.file("a/f1.txt", "");
    ws.file("b/f1.txt", "");

    let err = MergeEngine::new(ws.config(&["a", "b"]).with_rename_on_conflict(false))
        .plan()
        .expect_err("collision");

    assert_eq!(err.io_kind(), Some(io::ErrorKind::AlreadyExists));
    assert!(ws.path("a/f1.txt").exists());
}
