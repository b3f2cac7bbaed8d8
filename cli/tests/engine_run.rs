#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
//! Integration tests for a full engine run: backup, copy, link and the
//! action log across reruns.

mod common;

use std::fs;
use std::sync::Arc;

use common::TestHome;
use homedots::cache::{Action, ActionLog};
use homedots::config::Subdir;
use homedots::engine::Phase;
use homedots::logging::TaskStatus;
use homedots::resources::compare::background_check;
use homedots::tasks::menu::AcceptDefaults;

fn cache_of(home: &TestHome) -> ActionLog {
    let mut cache = ActionLog::new(home.layout.cache_file());
    cache.load().unwrap();
    cache
}

// ---------------------------------------------------------------------------
// Copy
// ---------------------------------------------------------------------------

#[test]
fn copy_materialises_every_source() {
    let mut home = TestHome::new();
    for i in 0..5 {
        home = home.with_source(Subdir::Copy, &format!("file{i}"), "data");
    }

    let report = home.run();

    assert_eq!(report.copy.unwrap().changed, 5);
    for i in 0..5 {
        assert_eq!(home.read_home(&format!("file{i}")), "data");
        assert!(
            !home
                .home_file(&format!("file{i}"))
                .symlink_metadata()
                .unwrap()
                .is_symlink()
        );
    }
}

#[test]
fn background_check_tracks_copy_state() {
    let home = TestHome::new().with_source(Subdir::Copy, "file0", "data");
    let source = home.layout.subdir(Subdir::Copy).join("file0");
    let dest = home.home_file("file0");

    assert!(background_check(&source, &dest));
    home.run_with(&home.options().only(Phase::Copy), Arc::new(AcceptDefaults));
    assert!(!background_check(&source, &dest));

    home.write_source(Subdir::Copy, "file0", "data\n newdata");
    assert!(background_check(&source, &dest));
}

#[test]
fn changed_copy_source_is_recopied_without_backup() {
    let home = TestHome::new().with_source(Subdir::Copy, ".gitconfig", "[user]\n");
    home.run();
    home.write_source(Subdir::Copy, ".gitconfig", "[user]\nname = u\n");

    let report = home.run();

    assert_eq!(report.copy.unwrap().changed, 1);
    assert_eq!(home.read_home(".gitconfig"), "[user]\nname = u\n");
    assert!(home.backups().is_empty());
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn links_reflect_later_source_edits() {
    let mut home = TestHome::new();
    for i in 0..5 {
        home = home.with_source(Subdir::Link, &format!("file{i}"), "data");
    }

    home.run();
    for i in 0..5 {
        assert_eq!(home.read_home(&format!("file{i}")), "data");
        home.write_source(Subdir::Link, &format!("file{i}"), "new data");
    }

    for i in 0..5 {
        assert_eq!(home.read_home(&format!("file{i}")), "new data");
    }
}

#[cfg(unix)]
#[test]
fn first_link_backs_up_only_existing_destinations() {
    let mut home = TestHome::new()
        .with_occupant("file4", "old content")
        .with_occupant("file5", "old content");
    for i in 0..6 {
        home = home.with_source(Subdir::Link, &format!("file{i}"), "some data");
    }

    let report = home.run();

    assert_eq!(home.backups(), ["file4", "file5"]);
    assert_eq!(report.link.unwrap().backed_up, 2);
    assert_eq!(
        fs::read_to_string(home.layout.backup_dir().join("file5")).unwrap(),
        "old content"
    );
    assert_eq!(home.read_home("file5"), "some data");
}

#[cfg(unix)]
#[test]
fn rerun_never_backs_up_managed_files() {
    let home = TestHome::new()
        .with_occupant(".bashrc", "distro default")
        .with_source(Subdir::Link, ".bashrc", "mine");
    home.run();
    assert_eq!(home.backups(), [".bashrc"]);
    fs::remove_dir_all(home.layout.backup_dir()).unwrap();

    // The user replaces the link with a file; it is now out of sync but
    // already under management.
    fs::remove_file(home.home_file(".bashrc")).unwrap();
    fs::write(home.home_file(".bashrc"), "edited").unwrap();
    let report = home.run();

    assert!(home.backups().is_empty());
    assert_eq!(report.link.unwrap().changed, 1);
    assert_eq!(home.read_home(".bashrc"), "mine");
}

// ---------------------------------------------------------------------------
// Action log
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn run_records_each_action_kind() {
    let home = TestHome::new()
        .with_source(Subdir::Copy, "c", "1")
        .with_source(Subdir::Link, "l", "2")
        .with_source(Subdir::Init, "i.sh", "true");

    home.run();

    let cache = cache_of(&home);
    let copy = home.layout.subdir(Subdir::Copy).join("c");
    let link = home.layout.subdir(Subdir::Link).join("l");
    let init = home.layout.subdir(Subdir::Init).join("i.sh");
    assert!(cache.contains(Action::Copy, &copy).unwrap());
    assert!(cache.contains(Action::Link, &link).unwrap());
    assert!(cache.contains(Action::InitRun, &init).unwrap());
    assert!(cache.contains(Action::InitSelected, &init).unwrap());
    assert!(!cache.contains(Action::Copy, &link).unwrap());
}

#[test]
fn second_run_is_converged() {
    let home = TestHome::new()
        .with_occupant("a", "old")
        .with_source(Subdir::Copy, "a", "new\n")
        .with_source(Subdir::Copy, "b", "b\n");
    home.run();

    let report = home.run();

    let copy = report.copy.unwrap();
    assert_eq!(copy.changed, 0);
    assert_eq!(copy.already_ok, 2);
    assert_eq!(copy.backed_up, 0);
    assert_eq!(home.backups(), ["a"]);
}

#[test]
fn nocache_forgets_the_log_and_backs_up_again() {
    let home = TestHome::new().with_source(Subdir::Copy, "a", "v1");
    home.run();
    // Diverge the destination so the copy step has to act again.
    fs::write(home.home_file("a"), "local edit").unwrap();

    let (report, _) = home.run_with(
        &home.options().with_invalidate(true),
        Arc::new(AcceptDefaults),
    );

    assert_eq!(report.copy.unwrap().backed_up, 1);
    assert_eq!(
        fs::read_to_string(home.layout.backup_dir().join("a")).unwrap(),
        "local edit"
    );
    assert_eq!(home.read_home("a"), "v1");
}

#[test]
fn corrupt_log_is_fatal() {
    let home = TestHome::new().with_source(Subdir::Copy, "a", "v1");
    fs::create_dir_all(home.layout.cache_file().parent().unwrap()).unwrap();
    fs::write(home.layout.cache_file(), "{\"Link\": [").unwrap();

    let log = Arc::new(homedots::logging::Logger::new(None));
    let engine = homedots::engine::Engine::new(
        log,
        Arc::new(homedots::exec::SystemExecutor),
        Arc::new(AcceptDefaults),
    );
    let err = engine.run(&home.options()).unwrap_err();

    assert!(err.to_string().contains("corrupt cache file"));
    assert!(!home.home_file("a").exists());
}

#[test]
fn missing_managed_directories_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".dotfiles/copy")).unwrap();
    fs::write(dir.path().join(".dotfiles/copy/x"), "x").unwrap();
    let home = TestHome {
        layout: homedots::config::Layout::new(dir.path()),
        dir,
    };

    let (report, log) = home.run_with(&home.options(), Arc::new(AcceptDefaults));

    assert_eq!(report.copy.unwrap().changed, 1);
    assert!(report.link.is_none());
    assert!(report.init.is_none());
    let statuses: Vec<_> = log.task_entries().into_iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        [TaskStatus::Ok, TaskStatus::Skipped, TaskStatus::Skipped]
    );
}

#[test]
fn single_phase_leaves_others_alone() {
    let home = TestHome::new()
        .with_source(Subdir::Copy, "c", "1")
        .with_source(Subdir::Link, "l", "2");

    let (report, _) = home.run_with(&home.options().only(Phase::Link), Arc::new(AcceptDefaults));

    assert!(report.copy.is_none());
    assert!(report.link.is_some());
    assert!(!home.home_file("c").exists());
}
