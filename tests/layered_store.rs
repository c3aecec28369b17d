//! Integration tests for layered resolution across file and memory backends.
//!
//! These tests exercise the public API the way an embedding application
//! would: several scopes registered with the conventional priorities.

use std::ops::ControlFlow;

use cfgstack::constants::{PRIORITY_GLOBAL, PRIORITY_LOCAL, PRIORITY_SYSTEM};
use cfgstack::{ConfigStore, Env, ErrorKind, FileBackend, MemoryBackend, get_env_bool};
use pretty_assertions::assert_eq;

fn file_layer(dir: &tempfile::TempDir, name: &str, content: &str) -> Box<FileBackend> {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    let mut backend = FileBackend::new(path);
    cfgstack::Backend::open(&mut backend).unwrap();
    Box::new(backend)
}

fn three_scopes(dir: &tempfile::TempDir) -> ConfigStore {
    let mut store = ConfigStore::new();
    store
        .add_backend(
            file_layer(dir, "system", "[core]\n\tpager = less\n\teditor = ed\n"),
            PRIORITY_SYSTEM,
        )
        .unwrap();
    store
        .add_backend(
            file_layer(dir, "local", "[core]\n\tbare = false\n"),
            PRIORITY_LOCAL,
        )
        .unwrap();
    store
        .add_backend(
            file_layer(dir, "global", "[core]\n\teditor = vim\n[user]\n\tname = Ada\n"),
            PRIORITY_GLOBAL,
        )
        .unwrap();
    store
}

// ---------------------------------------------------------------------------
// resolution
// ---------------------------------------------------------------------------

#[test]
fn priorities_sorted_after_mixed_registration() {
    let dir = tempfile::tempdir().unwrap();
    let store = three_scopes(&dir);
    assert_eq!(
        store.priorities().collect::<Vec<_>>(),
        vec![PRIORITY_LOCAL, PRIORITY_GLOBAL, PRIORITY_SYSTEM]
    );
}

#[test]
fn reads_never_fall_through_to_lower_scopes() {
    let dir = tempfile::tempdir().unwrap();
    let store = three_scopes(&dir);

    assert!(!store.get_bool("core.bare").unwrap());

    // Present in global and system, absent in local.
    let err = store.get_string("core.editor").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.variable(), Some("core.editor"));
    assert_eq!(store.get_string("user.name").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn writes_land_in_top_scope_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = three_scopes(&dir);

    store.set_bool("flag", true).unwrap_err();
    store.set_bool("feature.flag", true).unwrap();
    store.set_int("pack.threads", 4).unwrap();

    assert_eq!(store.get_string("feature.flag").unwrap(), "true");
    assert_eq!(store.get_int("pack.threads").unwrap(), 4);

    let local = std::fs::read_to_string(dir.path().join("local")).unwrap();
    assert_eq!(
        local,
        "[core]\n\tbare = false\n[feature]\n\tflag = true\n[pack]\n\tthreads = 4\n"
    );
    let global = std::fs::read_to_string(dir.path().join("global")).unwrap();
    assert!(!global.contains("flag"));
}

#[test]
fn memory_defaults_under_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ConfigStore::new();
    store
        .add_backend(
            Box::new(MemoryBackend::with_entries([("core.compression", "9")])),
            0,
        )
        .unwrap();
    store
        .add_backend(file_layer(&dir, "global", "[core]\n\tcompression = 1\n"), PRIORITY_GLOBAL)
        .unwrap();

    assert_eq!(store.get_long("core.compression").unwrap(), 1);
}

// ---------------------------------------------------------------------------
// iteration
// ---------------------------------------------------------------------------

#[test]
fn foreach_lists_every_scope_in_priority_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = three_scopes(&dir);

    let mut seen = Vec::new();
    let flow = store.foreach(|name, value| {
        seen.push(format!("{name}={}", value.unwrap_or("")));
        ControlFlow::<()>::Continue(())
    });
    assert_eq!(flow, ControlFlow::Continue(()));
    assert_eq!(
        seen,
        vec![
            "core.bare=false",
            "core.editor=vim",
            "user.name=Ada",
            "core.pager=less",
            "core.editor=ed",
        ]
    );
}

#[test]
fn foreach_can_search_and_stop() {
    let dir = tempfile::tempdir().unwrap();
    let store = three_scopes(&dir);

    let mut visited = 0;
    let flow = store.foreach(|name, value| {
        visited += 1;
        if name == "user.name" {
            ControlFlow::Break(value.map(str::to_string))
        } else {
            ControlFlow::Continue(())
        }
    });
    assert_eq!(flow, ControlFlow::Break(Some("Ada".to_string())));
    assert_eq!(visited, 3);
}

// ---------------------------------------------------------------------------
// convenience constructors
// ---------------------------------------------------------------------------

#[test]
fn open_path_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    std::fs::write(&path, "[http]\n\tpostBuffer = 500m\n\tsslVerify\n").unwrap();

    let mut store = ConfigStore::open_path(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get_long("http.postbuffer").unwrap(), 500 * 1024 * 1024);
    assert!(store.get_bool("http.sslverify").unwrap());

    store.set_long("http.lowSpeedLimit", -1).unwrap();
    drop(store);

    let store = ConfigStore::open_path(&path).unwrap();
    assert_eq!(store.get_long("http.lowspeedlimit").unwrap(), -1);
}

#[test]
fn open_path_unknown_names_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    std::fs::write(&path, "[core]\n\teditor = vim\n").unwrap();

    let store = ConfigStore::open_path(&path).unwrap();
    assert_eq!(store.get_string("x").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(store.get_string("core.1x").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn bool_accepts_integers_beyond_32_bits() {
    let mut store = ConfigStore::new();
    store
        .add_backend(
            Box::new(MemoryBackend::with_entries([("core.x", "3g"), ("core.y", "5000000000")])),
            PRIORITY_LOCAL,
        )
        .unwrap();
    assert!(store.get_bool("core.x").unwrap());
    assert!(store.get_bool("core.y").unwrap());

    let env = Env::mock([("GIT_BIG", "4g")]);
    assert!(get_env_bool(&env, "GIT_BIG").unwrap());
}

#[test]
fn open_path_nonexistent_returns_no_store() {
    let err = ConfigStore::open_path("/nonexistent").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoError);
}

#[test]
fn open_path_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    std::fs::write(&path, "[core]\n\teditor = \"unterminated\n").unwrap();

    let err = ConfigStore::open_path(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseError);
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn open_global_without_home_is_config_not_found() {
    let env = Env::mock([("HOME", "")]);
    let err = ConfigStore::open_global(&env).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigNotFound);
}

#[test]
fn open_global_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let env = Env::mock([("HOME", dir.path().to_str().unwrap())]);
    let err = ConfigStore::open_global(&env).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoError);
}

// ---------------------------------------------------------------------------
// environment fallback
// ---------------------------------------------------------------------------

#[test]
fn env_bool_needs_no_store() {
    let env = Env::mock([("GIT_TERMINAL_PROMPT", "0"), ("GIT_TRACE", "On")]);
    assert!(!get_env_bool(&env, "GIT_TERMINAL_PROMPT").unwrap());
    assert!(get_env_bool(&env, "GIT_TRACE").unwrap());
    assert_eq!(
        get_env_bool(&env, "GIT_SSH").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
