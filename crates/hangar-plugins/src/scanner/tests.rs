//! Unit tests for the archive scanner.

use std::fs;
use std::path::Path;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

#[fixture]
fn plugin_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("pluginA.jar"), b"").expect("write pluginA");
    fs::write(dir.path().join("pluginB.jar"), b"").expect("write pluginB");
    fs::write(dir.path().join("README.txt"), b"").expect("write readme");
    fs::create_dir(dir.path().join("nested.jar")).expect("create nested dir");
    dir
}

fn sorted_names(archives: &[PluginArchive]) -> Vec<&str> {
    let mut names: Vec<&str> = archives.iter().map(PluginArchive::name).collect();
    names.sort_unstable();
    names
}

fn scan_archives(directory: &Path, settings: &LoaderSettings) -> Vec<PluginArchive> {
    let (archives, rejected) = scan(directory, settings).expect("scan").into_parts();
    assert!(rejected.is_empty(), "unexpected rejections: {rejected:?}");
    archives
}

#[rstest]
fn scan_returns_only_matching_files(plugin_dir: TempDir) {
    let archives = scan_archives(plugin_dir.path(), &LoaderSettings::new());
    assert_eq!(sorted_names(&archives), vec!["pluginA", "pluginB"]);
}

#[rstest]
fn scan_records_location_and_file_name(plugin_dir: TempDir) {
    let archives = scan_archives(plugin_dir.path(), &LoaderSettings::new());
    let archive = archives
        .iter()
        .find(|archive| archive.name() == "pluginA")
        .expect("pluginA present");
    assert_eq!(archive.file_name(), "pluginA.jar");
    assert_eq!(archive.location(), plugin_dir.path().join("pluginA.jar"));
}

#[rstest]
fn scan_honours_custom_suffix(plugin_dir: TempDir) {
    let settings = LoaderSettings::new().with_archive_suffix("txt");
    let archives = scan_archives(plugin_dir.path(), &settings);
    assert_eq!(sorted_names(&archives), vec!["README"]);
}

#[test]
fn scan_of_missing_directory_is_empty() {
    let dir = TempDir::new().expect("create temp dir");
    let missing = dir.path().join("absent");
    let archives = scan_archives(&missing, &LoaderSettings::new());
    assert!(archives.is_empty());
}

#[test]
fn scan_of_regular_file_is_empty() {
    let dir = TempDir::new().expect("create temp dir");
    let file = dir.path().join("plugins.jar");
    fs::write(&file, b"").expect("write file");
    let archives = scan_archives(&file, &LoaderSettings::new());
    assert!(archives.is_empty());
}

#[cfg(unix)]
#[test]
fn scan_reports_unreadable_directory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("create temp dir");
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).expect("create locked dir");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

    let result = scan(&locked, &LoaderSettings::new());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");

    // Privileged users bypass permission bits, so only check when denied.
    if let Err(error) = result {
        assert!(matches!(error, DiscoveryError::Scan { .. }));
    }
}

#[test]
fn scan_below_regular_file_is_empty() {
    let dir = TempDir::new().expect("create temp dir");
    let file = dir.path().join("plugins.jar");
    fs::write(&file, b"").expect("write file");
    let archives = scan_archives(&file.join("nested"), &LoaderSettings::new());
    assert!(archives.is_empty());
}

#[cfg(unix)]
#[test]
fn scan_reports_symlink_loop() {
    let dir = TempDir::new().expect("create temp dir");
    let looped = dir.path().join("plugins");
    std::os::unix::fs::symlink(&looped, &looped).expect("create symlink loop");

    let error = scan(&looped, &LoaderSettings::new()).expect_err("loop must not scan");
    assert!(matches!(error, DiscoveryError::Scan { .. }), "{error}");
}

#[cfg(unix)]
#[test]
fn scan_rejects_archives_with_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().expect("create temp dir");
    let raw = OsStr::from_bytes(b"plug\xffin.jar");
    let Ok(()) = fs::write(dir.path().join(raw), b"") else {
        // Some filesystems refuse names that are not valid UTF-8.
        return;
    };
    fs::write(dir.path().join("pluginA.jar"), b"").expect("write pluginA");

    let (archives, rejected) = scan(dir.path(), &LoaderSettings::new())
        .expect("scan")
        .into_parts();
    assert_eq!(sorted_names(&archives), vec!["pluginA"]);
    match rejected.as_slice() {
        [DiscoveryError::ArchiveOpen { path, message, .. }] => {
            assert_eq!(path.file_name(), Some(raw));
            assert!(message.contains("UTF-8"), "{message}");
        }
        other => panic!("expected one rejected archive, got {other:?}"),
    }
}

#[test]
fn from_path_rejects_paths_without_file_name() {
    assert!(PluginArchive::from_path("/").is_none());
}
