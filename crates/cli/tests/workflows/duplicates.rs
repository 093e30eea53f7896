//! dupes command

use crate::common::TestTree;
use crate::dsnap;
use anyhow::Result;

fn six_files(tree: &TestTree) -> Result<()> {
    tree.write("file1.txt", "unique content 1")?;
    tree.write("file2.txt", "duplicate content")?;
    tree.write("file3.txt", "duplicate content")?;
    tree.write("file4.txt", "duplicate content")?;
    tree.write("file5.txt", "another duplicate content")?;
    tree.write("file6.txt", "another duplicate content")?;
    Ok(())
}

#[test]
fn lists_all_groups() -> Result<()> {
    let tree = TestTree::new()?;
    six_files(&tree)?;

    let result = dsnap!(tree.path(), "dupes").assert_success()?;
    assert!(result.contains_stdout("3 files"), "stdout: {}", result.stdout);
    assert!(result.contains_stdout("2 files"));
    assert!(result.contains_stdout("2 groups, 3 files redundant"));
    assert!(!result.stdout.contains("file1.txt"));
    Ok(())
}

#[test]
fn no_duplicates() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "a")?;
    tree.write("b.txt", "b")?;

    let result = dsnap!(tree.path(), "dupes").assert_success()?;
    assert!(result.contains_stdout("No duplicates found"));
    Ok(())
}

#[test]
fn duplicates_of_one_path() -> Result<()> {
    let tree = TestTree::new()?;
    six_files(&tree)?;

    let result = dsnap!(tree.path(), "dupes", "--path", "./file5.txt").assert_success()?;
    assert!(result.contains_stdout("= file6.txt"), "stdout: {}", result.stdout);
    assert!(!result.contains_stdout("= file5.txt"));

    let result = dsnap!(tree.path(), "dupes", "--path", "file1.txt").assert_success()?;
    assert!(result.contains_stdout("No other file has the same content"));

    let result = dsnap!(tree.path(), "dupes", "--path", "missing.txt").assert_failure()?;
    assert!(result.contains_stderr("not found"), "stderr: {}", result.stderr);
    Ok(())
}

#[test]
fn uses_saved_index_unless_rescan() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "same")?;
    dsnap!(tree.path(), "index").assert_success()?;
    tree.write("b.txt", "same")?;

    let result = dsnap!(tree.path(), "dupes").assert_success()?;
    assert!(result.contains_stdout("No duplicates found"));

    let result = dsnap!(tree.path(), "dupes", "--rescan").assert_success()?;
    assert!(result.contains_stdout("b.txt"));
    Ok(())
}

#[test]
fn hidden_flag_beats_saved_index() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write("a.txt", "same")?;
    tree.write(".b.txt", "same")?;
    dsnap!(tree.path(), "index").assert_success()?;

    let result = dsnap!(tree.path(), "dupes").assert_success()?;
    assert!(result.contains_stdout("No duplicates found"));

    let result = dsnap!(tree.path(), "dupes", "--hidden").assert_success()?;
    assert!(result.contains_stdout(".b.txt"), "stdout: {}", result.stdout);
    assert!(result.contains_stdout("a.txt"));
    Ok(())
}
