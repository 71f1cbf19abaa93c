//! Edge case and error handling tests for hefty


use std::fs;

use harness::{TestTree, file_names, run_hefty, run_hefty_json};

fn path_arg(tree: &TestTree) -> &str {
    tree.path().to_str().expect("temp path is UTF-8")
}

// ============================================================================
// Root Path Errors
// ============================================================================

#[test]
fn test_nonexistent_root() {
    let tree = TestTree::new();
    let missing = tree.path().join("does-not-exist");

    let (_stdout, stderr, success) = run_hefty(tree.path(), &[missing.to_str().unwrap()]);
    assert!(!success, "missing root should fail");
    assert!(stderr.contains("hefty: path does not exist"), "got: {}", stderr);
}

#[test]
fn test_file_as_root() {
    let tree = TestTree::new();
    let file = tree.add_file("plain.txt", 10);

    let (_stdout, stderr, success) = run_hefty(tree.path(), &[file.to_str().unwrap()]);
    assert!(!success, "file root should fail");
    assert!(stderr.contains("not a directory"), "got: {}", stderr);
}

// ============================================================================
// Configuration Errors
// ============================================================================

#[test]
fn test_invalid_glob_rejected() {
    let tree = TestTree::new();
    let (_stdout, stderr, success) = run_hefty(tree.path(), &["--exclude", "[unclosed"]);
    assert!(!success);
    assert!(stderr.contains("invalid exclude pattern"), "got: {}", stderr);
}

#[test]
fn test_invalid_regex_rejected() {
    let tree = TestTree::new();
    let (_stdout, stderr, success) = run_hefty(tree.path(), &["--exclude-regex", "(oops"]);
    assert!(!success);
    assert!(stderr.contains("invalid exclude regex"), "got: {}", stderr);
}

#[test]
fn test_invalid_size_rejected() {
    let tree = TestTree::new();
    let (_stdout, stderr, success) = run_hefty(tree.path(), &["--min-size", "lots"]);
    assert!(!success);
    assert!(stderr.contains("invalid size 'lots'"), "got: {}", stderr);
}

#[test]
fn test_invalid_date_rejected() {
    let tree = TestTree::new();
    let (_stdout, stderr, success) = run_hefty(tree.path(), &["--modified-since", "2024-13-45"]);
    assert!(!success);
    assert!(stderr.contains("expected YYYY-MM-DD"), "got: {}", stderr);
}

#[test]
fn test_invalid_duration_rejected() {
    let tree = TestTree::new();
    let (_stdout, stderr, success) = run_hefty(tree.path(), &["--newer", "soon"]);
    assert!(!success);
    assert!(stderr.contains("invalid duration"), "got: {}", stderr);
}

#[test]
fn test_zero_top_n_rejected() {
    let tree = TestTree::new();
    let (_stdout, stderr, success) = run_hefty(tree.path(), &["-n", "0"]);
    assert!(!success);
    assert!(stderr.contains("at least 1"), "got: {}", stderr);
}

// ============================================================================
// Hidden Files
// ============================================================================

#[test]
fn test_hidden_directory_excluded_by_default() {
    let tree = TestTree::new();
    tree.add_file(".cache/huge.bin", 1024 * 1024);
    tree.add_file(".hidden_file", 4096);
    tree.add_file("visible.txt", 10);

    let json = run_hefty_json(tree.path(), &[path_arg(&tree)]);
    assert_eq!(file_names(&json), vec!["visible.txt"]);
}

#[test]
fn test_include_hidden() {
    let tree = TestTree::new();
    tree.add_file(".cache/huge.bin", 1024 * 1024);
    tree.add_file("visible.txt", 10);

    let json = run_hefty_json(tree.path(), &["--include-hidden", path_arg(&tree)]);
    assert_eq!(file_names(&json), vec!["huge.bin", "visible.txt"]);
}

#[test]
fn test_hidden_root_is_scanned() {
    let tree = TestTree::new();
    tree.add_file(".dotroot/inside.bin", 50);
    let root = tree.path().join(".dotroot");

    let json = run_hefty_json(tree.path(), &[root.to_str().unwrap()]);
    assert_eq!(file_names(&json), vec!["inside.bin"]);
}

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_symlink_to_file_not_followed() {
        let tree = TestTree::new();
        let target = tree.add_file("target.bin", 5000);
        symlink(&target, tree.path().join("link.bin")).expect("Failed to create symlink");

        let json = run_hefty_json(tree.path(), &[path_arg(&tree)]);
        let files = json["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);

        let link = files
            .iter()
            .find(|f| f["path"].as_str().unwrap().ends_with("link.bin"))
            .expect("link reported");
        assert_eq!(link["is_symlink"], true);
        // Link's own size, not the target's
        assert_ne!(link["size"], 5000);
    }

    #[test]
    fn test_symlink_to_file_followed() {
        let tree = TestTree::new();
        let target = tree.add_file("target.bin", 5000);
        symlink(&target, tree.path().join("link.bin")).expect("Failed to create symlink");

        let json = run_hefty_json(tree.path(), &["--follow-symlinks", path_arg(&tree)]);
        for file in json["files"].as_array().unwrap() {
            assert_eq!(file["size"], 5000);
        }
    }

    #[test]
    fn test_symlink_to_directory_not_descended() {
        let tree = TestTree::new();
        tree.add_file("elsewhere/inner.bin", 100);
        tree.add_dir("scan");
        symlink(tree.path().join("elsewhere"), tree.path().join("scan/link"))
            .expect("Failed to create dir symlink");
        let root = tree.path().join("scan");

        let json = run_hefty_json(tree.path(), &[root.to_str().unwrap()]);
        assert!(!file_names(&json).contains(&"inner.bin".to_string()));

        let json = run_hefty_json(tree.path(), &["--follow-symlinks", root.to_str().unwrap()]);
        assert_eq!(file_names(&json), vec!["inner.bin"]);
    }

    #[test]
    fn test_symlink_to_ancestor_terminates() {
        let tree = TestTree::new();
        tree.add_file("subdir/file.bin", 10);
        symlink("..", tree.path().join("subdir/parent")).expect("Failed to create symlink");

        let json = run_hefty_json(tree.path(), &["--follow-symlinks", path_arg(&tree)]);
        assert_eq!(file_names(&json), vec!["file.bin"]);
    }

    #[test]
    fn test_broken_symlink() {
        let tree = TestTree::new();
        tree.add_file("real.bin", 10);
        symlink(tree.path().join("gone"), tree.path().join("dangling"))
            .expect("Failed to create symlink");

        // Not following: the link itself is an entry
        let json = run_hefty_json(tree.path(), &[path_arg(&tree)]);
        assert!(file_names(&json).contains(&"dangling".to_string()));

        // Following: reported and skipped, scan still succeeds
        let (stdout, stderr, success) = run_hefty(
            tree.path(),
            &["--follow-symlinks", "--format", "json", path_arg(&tree)],
        );
        assert!(success);
        assert!(!stdout.contains("dangling"));
        assert!(stderr.contains("dangling"), "warning expected: {}", stderr);
    }
}

// ============================================================================
// Permission Error Handling
// ============================================================================

#[test]
#[cfg(unix)]
fn test_unreadable_directory() {
    use std::os::unix::fs::PermissionsExt;

    let tree = TestTree::new();
    tree.add_file("readable/file.bin", 100);
    tree.add_file("locked/secret.bin", 9000);
    let locked = tree.path().join("locked");

    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&locked, perms).expect("Failed to set permissions");

    // Privileged users can read it anyway; nothing to check then
    let still_readable = fs::read_dir(&locked).is_ok();

    let (stdout, stderr, success) = run_hefty(tree.path(), &["--format", "json", path_arg(&tree)]);

    // Restore permissions for cleanup
    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&locked, perms).expect("Failed to restore permissions");

    assert!(success, "unreadable directories should not fail the scan");
    assert!(stdout.contains("file.bin"));
    if !still_readable {
        assert!(!stdout.contains("secret.bin"));
        assert!(stderr.contains("permission denied"), "got: {}", stderr);
    }
}

// ============================================================================
// Unusual Names
// ============================================================================

#[test]
fn test_unicode_and_spaces_in_names() {
    let tree = TestTree::new();
    tree.add_file("données/résumé final.pdf", 700);
    tree.add_file("日本語.txt", 300);

    let json = run_hefty_json(tree.path(), &[path_arg(&tree)]);
    assert_eq!(file_names(&json), vec!["résumé final.pdf", "日本語.txt"]);
}

#[test]
fn test_zero_byte_files_are_listed() {
    let tree = TestTree::new();
    tree.add_file("empty.bin", 0);

    let json = run_hefty_json(tree.path(), &[path_arg(&tree)]);
    assert_eq!(json["files"][0]["size"], 0);
}

#[test]
fn test_files_without_extension_group() {
    let tree = TestTree::new();
    tree.add_file("Makefile", 100);
    tree.add_file("a.rs", 10);

    let json = run_hefty_json(tree.path(), &["--group-by", "ext", path_arg(&tree)]);
    assert_eq!(json["groups"][0]["group"], "(no extension)");
}
