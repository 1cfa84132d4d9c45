use super::*;

#[test]
fn ensure_dir_creates_and_returns() {
    let tmp = tempfile::tempdir().unwrap();
    let new_dir = tmp.path().join("subdir");
    let result = ensure_dir(&new_dir).unwrap();
    assert_eq!(result, new_dir);
    assert!(new_dir.exists());
}

#[test]
fn atomic_write_creates_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("test.txt");
    atomic_write(&path, "hello").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
}

#[test]
fn atomic_write_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("test.txt");
    atomic_write(&path, "first").unwrap();
    atomic_write(&path, "second").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
}

#[test]
fn atomic_write_creates_missing_parent() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested/deeper/session.json");
    atomic_write(&path, "{}").unwrap();
    assert!(path.exists());
}

#[cfg(unix)]
#[test]
fn restrict_permissions_sets_owner_only() {
    use std::os::unix::fs::PermissionsExt;
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("secret.json");
    std::fs::write(&path, "{}").unwrap();
    restrict_permissions(&path);
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn truncate_short_text_untouched() {
    assert_eq!(truncate_for_display("short", 200), "short");
}

#[test]
fn truncate_long_text_appends_ellipsis() {
    let long = "x".repeat(300);
    let out = truncate_for_display(&long, 200);
    assert_eq!(out.len(), 203);
    assert!(out.ends_with("..."));
}

#[test]
fn truncate_respects_char_boundary() {
    // 'é' is two bytes; cutting at 3 would land mid-char
    let out = truncate_for_display("aéééé", 2);
    assert_eq!(out, "a...");
}
