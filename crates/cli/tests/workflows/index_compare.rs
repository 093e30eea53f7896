//! index -> change the tree -> compare

use crate::common::TestTree;
use crate::dsnap;
use anyhow::Result;

#[test]
fn index_reports_file_count() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "a")?;
    tree.write("sub/b.txt", "b")?;

    let result = dsnap!(tree.path(), "index").assert_success()?;
    assert!(result.contains_stdout("Indexed 2 files"), "stdout: {}", result.stdout);
    assert!(tree.path().join("dirsnap.json").is_file());

    // Running again replaces the index and still skips the index file itself
    let result = dsnap!(tree.path(), "index").assert_success()?;
    assert!(result.contains_stdout("Indexed 2 files"));
    assert!(result.contains_stdout("Previous index replaced"));
    Ok(())
}

#[test]
fn index_accepts_directory_argument() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("nested/file.txt", "x")?;
    let parent = tree.path().parent().unwrap().to_path_buf();

    dsnap!(&parent, "index", "tree").assert_success()?;
    assert!(tree.path().join("dirsnap.json").is_file());
    Ok(())
}

#[test]
fn compare_without_index_fails_with_hint() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "a")?;

    let result = dsnap!(tree.path(), "compare").assert_failure()?;
    assert!(result.contains_stderr("index not found"), "stderr: {}", result.stderr);
    assert!(result.contains_stderr("dsnap index"));
    Ok(())
}

#[test]
fn compare_unchanged_tree() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("file.txt", "content")?;

    dsnap!(tree.path(), "index").assert_success()?;
    let result = dsnap!(tree.path(), "compare").assert_success()?;
    assert!(result.contains_stdout("No changes detected"));
    Ok(())
}

#[test]
fn compare_classifies_all_changes() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("keep.txt", "keep")?;
    tree.write("edit.txt", "original content")?;
    tree.write("gone.txt", "gone")?;
    tree.write("old.txt", "moving content")?;
    dsnap!(tree.path(), "index").assert_success()?;

    tree.write("edit.txt", "modified content")?;
    tree.remove("gone.txt")?;
    tree.rename("old.txt", "subdir/new.txt")?;
    tree.write("fresh.txt", "fresh")?;

    let result = dsnap!(tree.path(), "compare").assert_success()?;
    assert!(result.contains_stdout("fresh.txt"), "stdout: {}", result.stdout);
    assert!(result.contains_stdout("edit.txt"));
    assert!(result.contains_stdout("gone.txt"));
    assert!(result.contains_stdout("old.txt -> subdir/new.txt"));
    assert!(result.contains_stdout("1 added, 1 modified, 1 renamed/moved, 1 deleted"));
    assert!(!result.stdout.contains("keep.txt"));
    Ok(())
}

#[test]
fn compare_json_output() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "h1")?;
    dsnap!(tree.path(), "index").assert_success()?;
    tree.rename("a.txt", "b.txt")?;

    let json = dsnap!(tree.path(), "compare", "--json").assert_success()?.json()?;
    assert_eq!(json["added"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["modified"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["deleted"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["renamed_or_moved"][0]["old_path"], "a.txt");
    assert_eq!(json["renamed_or_moved"][0]["new_path"], "b.txt");
    Ok(())
}

#[test]
fn compare_does_not_rewrite_index() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "a")?;
    dsnap!(tree.path(), "index").assert_success()?;
    tree.write("b.txt", "b")?;

    for _ in 0..2 {
        let result = dsnap!(tree.path(), "compare").assert_success()?;
        assert!(result.contains_stdout("b.txt"));
    }
    Ok(())
}

#[test]
fn hidden_policy_saved_with_index() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("file.txt", "content")?;
    tree.write(".hidden", "content")?;

    let result = dsnap!(tree.path(), "index").assert_success()?;
    assert!(result.contains_stdout("Indexed 1 file"));

    // Saved policy excludes hidden files, so a new hidden file is invisible
    tree.write(".env", "secret")?;
    let result = dsnap!(tree.path(), "compare").assert_success()?;
    assert!(result.contains_stdout("No changes detected"));

    // Explicit --hidden overrides the saved policy
    let result = dsnap!(tree.path(), "compare", "--hidden").assert_success()?;
    assert!(result.contains_stdout(".env"));
    assert!(result.contains_stdout(".hidden"));

    let result = dsnap!(tree.path(), "index", "--hidden").assert_success()?;
    assert!(result.contains_stdout("Indexed 3 files"));
    Ok(())
}

#[test]
fn config_file_sets_algorithm() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "a")?;
    tree.write_config("[scan]\nalgorithm = \"blake3\"\nparallel = true\n")?;

    dsnap!(tree.path(), "index").assert_success()?;
    let result = dsnap!(tree.path(), "info").assert_success()?;
    assert!(result.contains_stdout("blake3"), "stdout: {}", result.stdout);

    let result = dsnap!(tree.path(), "compare").assert_success()?;
    assert!(result.contains_stdout("No changes detected"));
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_config("[scan]\nalgorithm = \"md5\"\n")?;

    let result = dsnap!(tree.path(), "index").assert_failure()?;
    assert!(result.contains_stderr("Invalid config"), "stderr: {}", result.stderr);
    Ok(())
}

#[test]
fn commands_finish_quickly_on_small_trees() -> Result<()> {
    let tree = TestTree::new()?;
    for i in 0..200 {
        tree.write(&format!("d{}/f{i}.txt", i % 10), &format!("{i}"))?;
    }

    let index = dsnap!(tree.path(), "index", "--parallel").assert_success()?;
    let compare = dsnap!(tree.path(), "compare").assert_success()?;
    assert!(compare.contains_stdout("No changes detected"));
    assert!(index.duration.as_secs() < 30 && compare.duration.as_secs() < 30);
    Ok(())
}

#[test]
fn rust_log_enables_library_events() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "a")?;

    let quiet = dsnap!(tree.path(), "index").assert_success()?;
    assert!(!quiet.contains_stderr("scan complete"));

    let verbose = dsnap!(tree.path(), "index")
        .env("RUST_LOG", "dirsnap_core=debug")
        .assert_success()?;
    assert!(verbose.contains_stderr("scan complete"), "stderr: {}", verbose.stderr);
    assert!(verbose.contains_stderr("skipping index file"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_file_shows_up_in_compare() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("real.txt", "content")?;
    dsnap!(tree.path(), "index").assert_success()?;

    std::os::unix::fs::symlink(tree.path().join("real.txt"), tree.path().join("link.txt"))?;
    let json = dsnap!(tree.path(), "compare", "--json").assert_success()?.json()?;
    assert_eq!(json["added"][0], "link.txt");
    Ok(())
}
