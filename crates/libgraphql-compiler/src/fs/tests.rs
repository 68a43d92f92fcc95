use crate::fs::AddedRemovedFiles;
use crate::fs::CodegenFilesystem;
use crate::fs::DirectFilesystem;
use crate::fs::FilesystemError;
use crate::fs::SourceControl;
use crate::fs::SourceControlError;
use crate::fs::StagedEntry;
use crate::fs::StagedFilesystem;
use crate::fs::StagedState;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct RecordingSourceControl {
    calls: Mutex<Vec<(Vec<PathBuf>, Vec<PathBuf>)>>,
}
impl SourceControl for RecordingSourceControl {
    fn add_remove(&self, added: &[PathBuf], removed: &[PathBuf]) -> Result<(), SourceControlError> {
        self.calls.lock().push((added.to_vec(), removed.to_vec()));
        Ok(())
    }
}

#[test]
fn write_to_new_path_is_reported_as_added() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.out");
    let fs = StagedFilesystem::new();

    fs.write_file(&path, "X").unwrap();
    assert!(!path.exists());
    assert_eq!(fs.read_file(&path).unwrap(), "X");

    let source_control = RecordingSourceControl::default();
    fs.commit(Some(&source_control)).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "X");
    let expected = AddedRemovedFiles {
        added: vec![path.clone()],
        removed: vec![],
    };
    assert_eq!(fs.added_removed_files(), expected);
    assert_eq!(*source_control.calls.lock(), vec![(vec![path], vec![])]);
}

#[test]
fn identical_write_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b.out");
    std::fs::write(&path, "Y").unwrap();
    let modified = std::fs::metadata(&path).unwrap().modified().unwrap();
    let fs = StagedFilesystem::new();

    fs.write_file(&path, "Y").unwrap();
    assert!(fs.has_changes().unwrap());
    fs.commit(None).unwrap();

    assert_eq!(fs.added_removed_files(), AddedRemovedFiles::default());
    assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), modified);
}

#[test]
fn changed_write_is_neither_added_nor_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b.out");
    std::fs::write(&path, "old").unwrap();
    let fs = StagedFilesystem::new();

    fs.write_file(&path, "new").unwrap();
    fs.commit(None).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    assert_eq!(fs.added_removed_files(), AddedRemovedFiles::default());
}

#[test]
fn unlink_deletes_on_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("c.out");
    std::fs::write(&path, "Z").unwrap();
    let fs = StagedFilesystem::new();

    fs.unlink(&path).unwrap();
    assert!(path.exists());
    assert!(!fs.exists(&path).unwrap());
    assert!(matches!(fs.read_file(&path), Err(FilesystemError::NotFound(_))));
    assert!(matches!(fs.stat(&path), Err(FilesystemError::NotFound(_))));

    fs.commit(None).unwrap();
    assert!(!path.exists());
    assert_eq!(fs.added_removed_files().removed, vec![path]);
}

#[test]
fn unlink_of_missing_file_is_not_reported() {
    let dir = tempfile::tempdir().unwrap();
    let fs = StagedFilesystem::new();
    fs.unlink(&dir.path().join("never-existed.out")).unwrap();
    fs.commit(None).unwrap();
    assert_eq!(fs.added_removed_files(), AddedRemovedFiles::default());
}

#[test]
fn later_operations_on_a_path_win() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("d.out");
    let fs = StagedFilesystem::new();

    fs.write_file(&path, "first").unwrap();
    fs.unlink(&path).unwrap();
    assert_eq!(fs.staged_entry(&path), Some(StagedEntry::Delete));
    fs.write_file(&path, "second").unwrap();
    assert_eq!(fs.staged_entry(&path), Some(StagedEntry::Write("second".to_string())));
}

#[test]
fn commit_creates_parent_and_staged_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("x/y/__generated__/A.json");
    let empty_dir = dir.path().join("empty");
    let fs = StagedFilesystem::new();

    fs.mkdir(&empty_dir).unwrap();
    assert!(fs.stat(&empty_dir).unwrap().is_directory);
    assert!(fs.stat(dir.path()).unwrap().is_directory);
    fs.write_file(&nested, "{}").unwrap();
    fs.commit(None).unwrap();

    assert!(empty_dir.is_dir());
    assert_eq!(std::fs::read_to_string(&nested).unwrap(), "{}");
}

#[test]
fn state_machine_advances_on_first_operation() {
    let dir = tempfile::tempdir().unwrap();
    let fs = StagedFilesystem::new();
    assert_eq!(fs.state(), StagedState::Open);
    fs.exists(dir.path()).unwrap();
    assert_eq!(fs.state(), StagedState::Staging);
    fs.commit(None).unwrap();
    assert_eq!(fs.state(), StagedState::Committed);
}

#[test]
fn every_operation_after_commit_is_a_contract_violation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.out");
    let fs = StagedFilesystem::new();
    fs.write_file(&path, "X").unwrap();
    fs.commit(None).unwrap();

    let violation = |result: Result<(), FilesystemError>, operation: &str| match result {
        Err(FilesystemError::ContractViolation(err)) => assert_eq!(err.operation, operation),
        other => panic!("expected a contract violation from `{operation}`, got {other:?}"),
    };
    violation(fs.read_file(&path).map(|_| ()), "read_file");
    violation(fs.write_file(&path, "Y"), "write_file");
    violation(fs.unlink(&path), "unlink");
    violation(fs.exists(&path).map(|_| ()), "exists");
    violation(fs.stat(&path).map(|_| ()), "stat");
    violation(fs.mkdir(dir.path()), "mkdir");
    violation(fs.has_changes().map(|_| ()), "has_changes");
    violation(fs.commit(None), "commit");

    // The committed result is still readable and the failed calls had no
    // effect.
    assert_eq!(fs.added_removed_files().added, vec![path.clone()]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "X");
}

#[test]
fn dropping_without_commit_discards_staged_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.out");
    {
        let fs = StagedFilesystem::new();
        fs.write_file(&path, "X").unwrap();
    }
    assert!(!path.exists());
}

#[test]
fn direct_filesystem_applies_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/a.out");
    let fs = DirectFilesystem::new();

    fs.write_file(&path, "X").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "X");
    fs.write_file(&path, "Y").unwrap();
    assert!(fs.has_changes().unwrap());

    let source_control = RecordingSourceControl::default();
    fs.commit(Some(&source_control)).unwrap();
    assert_eq!(*source_control.calls.lock(), vec![(vec![path.clone()], vec![])]);

    fs.unlink(&path).unwrap();
    assert!(matches!(fs.read_file(&path), Err(FilesystemError::NotFound(_))));
    assert_eq!(fs.added_removed_files().removed, vec![path]);
}
