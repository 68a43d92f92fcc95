use crate::compiler_error::CompilerError;
use crate::context::ValidationError;
use crate::fs::SourceControl;
use crate::fs::SourceControlError;
use crate::manifest::ArtifactManifest;
use crate::runner::ErrorOrigin;
use crate::runner::FileChange;
use crate::runner::RunError;
use crate::test_project::SCHEMA;
use crate::test_project::TestProject;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn user_fields_project() -> TestProject {
    let project = TestProject::new();
    project.write("src/user.graphql", "fragment UserFields on User { id }");
    project.write("src/a.graphql", "query A { viewer { ...UserFields } }");
    project.write("src/b.graphql", "query B { viewer { name ...UserFields } }");
    project.write("src/c.graphql", "query C { story(id: 1) { title } }");
    project
}

fn load_manifest(project: &TestProject) -> ArtifactManifest {
    let json = std::fs::read_to_string(project.manifest_path()).unwrap();
    serde_json::from_str(&json).unwrap()
}

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
fn full_run_writes_every_artifact_and_the_manifest() {
    let project = user_fields_project();
    let mut runner = project.runner();

    let report = runner.run_full(&CancellationToken::new()).unwrap();

    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["A", "B", "C", "UserFields"]));
    assert_eq!(report.created.len(), 4);
    for name in ["A", "B", "C", "UserFields"] {
        assert!(project.artifact(name).is_file(), "missing artifact for {name}");
    }
    assert!(report.added.contains(&project.manifest_path()));
    assert_eq!(load_manifest(&project).len(), 4);
}

#[test]
fn unchanged_inputs_stage_nothing() {
    let project = user_fields_project();
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();

    let second = runner.run_full(&CancellationToken::new()).unwrap();
    assert_eq!(second.staged_changes, 0);
    assert!(second.created.is_empty() && second.updated.is_empty() && second.deleted.is_empty());
    assert!(second.added.is_empty() && second.removed.is_empty());
    assert_eq!(second.unchanged.len(), 4);

    let third = runner.run_incremental(&[], &CancellationToken::new()).unwrap();
    assert_eq!(third.staged_changes, 0);
    assert!(third.compiled.is_empty());
}

#[test]
fn fragment_change_recompiles_exactly_its_dependents() {
    let project = user_fields_project();
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();
    let untouched = project.read_artifact("C");

    let changed = project.write("src/user.graphql", "fragment UserFields on User { id name }");
    let report = runner.run_incremental(&[FileChange::changed(changed)], &CancellationToken::new())
        .unwrap();

    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["A", "B", "UserFields"]));
    let updated: BTreeSet<PathBuf> = report.updated.iter().cloned().collect();
    assert_eq!(updated, BTreeSet::from([
        project.artifact("A"),
        project.artifact("B"),
        project.artifact("UserFields"),
    ]));
    assert_eq!(project.read_artifact("C"), untouched);
}

#[test]
fn formatting_only_edits_recompile_nothing() {
    let project = user_fields_project();
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();

    let changed = project.write("src/a.graphql", "query A {\n  viewer {\n    ...UserFields\n  }\n}\n");
    let report = runner.run_incremental(&[FileChange::changed(changed)], &CancellationToken::new())
        .unwrap();

    assert!(report.compiled.is_empty());
    assert_eq!(report.staged_changes, 0);
}

#[test]
fn fragment_cycles_are_rejected_without_blocking_other_definitions() {
    let project = TestProject::new();
    project.write("src/cycle.graphql", "
        fragment F1 on User { id bestFriend { ...F2 } }
        fragment F2 on User { name bestFriend { ...F1 } }
        query UsesCycle { viewer { ...F1 } }
    ");
    project.write("src/fine.graphql", "query Fine { viewer { id } }");
    let mut runner = project.runner();

    let report = runner.run_full(&CancellationToken::new()).unwrap();

    let cycle_errors = &report.errors[&ErrorOrigin::Definition("F1".to_string())];
    assert!(matches!(
        &cycle_errors[..],
        [CompilerError::Validation(ValidationError::CyclicDependency(cycle))]
            if cycle.cycle() == ["F1", "F2", "F1"]
    ));
    assert!(matches!(
        &report.errors[&ErrorOrigin::Definition("UsesCycle".to_string())][..],
        [CompilerError::Validation(ValidationError::InvalidDependency { dependency, .. })]
            if dependency == "F1"
    ));
    for name in ["F1", "F2", "UsesCycle"] {
        assert!(!project.artifact(name).exists(), "unexpected artifact for {name}");
    }
    assert!(project.artifact("Fine").is_file());
    assert_eq!(runner.failed_definitions(), &names(&["F1", "F2", "UsesCycle"]));
}

#[test]
fn missing_fragment_compiles_once_it_is_added() {
    let project = TestProject::new();
    project.write("src/op.graphql", "query NeedsLater { viewer { ...Later } }");
    let mut runner = project.runner();

    let report = runner.run_full(&CancellationToken::new()).unwrap();
    assert!(matches!(
        &report.errors[&ErrorOrigin::Definition("NeedsLater".to_string())][..],
        [CompilerError::Validation(ValidationError::MissingFragment { fragment, .. })]
            if fragment == "Later"
    ));
    assert!(!project.artifact("NeedsLater").exists());

    let added = project.write("src/later.graphql", "fragment Later on User { id }");
    let report = runner.run_incremental(&[FileChange::added(added)], &CancellationToken::new())
        .unwrap();

    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["Later", "NeedsLater"]));
    assert!(project.artifact("NeedsLater").is_file());
    assert!(project.artifact("Later").is_file());
    assert!(runner.failed_definitions().is_empty());
}

#[test]
fn removed_definitions_delete_their_artifacts() {
    let project = user_fields_project();
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();

    let removed = project.remove("src/c.graphql");
    let report = runner.run_incremental(&[FileChange::removed(removed)], &CancellationToken::new())
        .unwrap();

    assert_eq!(report.deleted, vec![project.artifact("C")]);
    assert_eq!(report.removed, vec![project.artifact("C")]);
    assert!(!project.artifact("C").exists());
    assert!(load_manifest(&project).get(&PathBuf::from("generated/C.json")).is_none());
}

#[test]
fn failing_definition_keeps_its_previous_artifact() {
    let project = user_fields_project();
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();
    let before = project.read_artifact("C");

    let broken = project.write("src/c.graphql", "query C { story(id: 1) { headline } }");
    let report = runner.run_incremental(&[FileChange::changed(broken.clone())], &CancellationToken::new())
        .unwrap();
    assert!(report.errors.contains_key(&ErrorOrigin::Definition("C".to_string())));
    assert_eq!(project.read_artifact("C"), before);
    assert!(report.deleted.is_empty());

    project.write("src/c.graphql", "query C { story(id: 1) { id title } }");
    let report = runner.run_incremental(&[FileChange::changed(broken)], &CancellationToken::new())
        .unwrap();
    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.updated, vec![project.artifact("C")]);
    assert_ne!(project.read_artifact("C"), before);
}

#[test]
fn parse_errors_are_reported_per_file() {
    let project = user_fields_project();
    let broken = project.write("src/broken.graphql", "query Broken {");
    let mut runner = project.runner();

    let report = runner.run_full(&CancellationToken::new()).unwrap();

    assert_eq!(report.errors.keys().collect::<Vec<_>>(), vec![&ErrorOrigin::Path(broken)]);
    assert!(project.artifact("A").is_file());
}

#[test]
fn cancelled_run_writes_nothing_and_leaves_state_untouched() {
    let project = user_fields_project();
    let mut runner = project.runner();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(matches!(runner.run_full(&cancel), Err(RunError::Cancelled)));
    assert!(!project.artifact("A").exists());
    assert!(!project.manifest_path().exists());

    let report = runner.run_full(&CancellationToken::new()).unwrap();
    assert_eq!(report.created.len(), 4);
}

#[test]
fn schema_changes_recompile_definitions_touching_changed_types() {
    let project = TestProject::new();
    project.write("src/names.graphql", "query Names { viewer { name } }");
    project.write("src/stories.graphql", "query Stories { story(id: 1) { title } }");
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();

    let schema = project.write(
        "schema.graphql",
        &SCHEMA.replace("bestFriend: User }", "bestFriend: User, age: Int }"),
    );
    let report = runner.run_incremental(&[FileChange::changed(schema)], &CancellationToken::new())
        .unwrap();

    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["Names"]));
}

#[test]
fn schema_errors_keep_the_previous_schema() {
    let project = user_fields_project();
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();

    let schema = project.write("schema.graphql", "type Query {");
    let report = runner.run_incremental(&[FileChange::changed(schema)], &CancellationToken::new())
        .unwrap();

    assert!(report.errors.contains_key(&ErrorOrigin::Schema));
    assert!(runner.schema().get_type("Story").is_some());
    assert!(project.artifact("C").is_file());
}

#[test]
fn shared_split_operation_lives_until_its_last_owner_is_removed() {
    let project = TestProject::new();
    project.write("src/renderer.graphql", "fragment Renderer on Story { title }");
    project.write(
        "src/first.graphql",
        "query First { story(id: 1) { ...Renderer @module(name: \"Renderer.react\") } }",
    );
    project.write(
        "src/second.graphql",
        "query Second { story(id: 2) { ...Renderer @module(name: \"Renderer.react\") } }",
    );
    let mut runner = project.runner();
    let report = runner.run_full(&CancellationToken::new()).unwrap();
    assert!(!report.has_errors(), "{:?}", report.errors);

    let split = project.artifact("Renderer$normalization");
    let split_key = PathBuf::from("generated/Renderer$normalization.json");
    assert!(split.is_file());
    assert_eq!(load_manifest(&project).get(&split_key).unwrap().owners, names(&["First", "Second"]));

    let removed = project.remove("src/second.graphql");
    runner.run_incremental(&[FileChange::removed(removed)], &CancellationToken::new()).unwrap();
    assert!(split.is_file());
    assert!(!project.artifact("Second").exists());
    assert_eq!(load_manifest(&project).get(&split_key).unwrap().owners, names(&["First"]));

    let removed = project.remove("src/first.graphql");
    let report = runner.run_incremental(&[FileChange::removed(removed)], &CancellationToken::new())
        .unwrap();
    assert!(!split.exists());
    assert!(report.deleted.contains(&split));
}

#[test]
fn corrupt_manifest_rewrites_it_without_touching_identical_artifacts() {
    let project = user_fields_project();
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();

    std::fs::write(project.manifest_path(), "{ not json").unwrap();
    let report = runner.run_full(&CancellationToken::new()).unwrap();

    assert!(report.added.is_empty());
    assert!(report.removed.is_empty());
    assert_eq!(load_manifest(&project).len(), 4);
}

#[test]
fn colocated_artifacts_sit_next_to_their_sources() {
    let project = TestProject::with_artifact_directory(None);
    project.write("src/user.graphql", "fragment UserFields on User { id }");
    project.write("src/viewer.js", "const query = graphql`query ViewerQuery { viewer { ...UserFields } }`;\n");
    let mut runner = project.runner();

    let report = runner.run_full(&CancellationToken::new()).unwrap();

    assert!(!report.has_errors(), "{:?}", report.errors);
    assert!(project.root().join("src/__generated__/UserFields.json").is_file());
    assert!(project.root().join("src/__generated__/ViewerQuery.json").is_file());

    let second = runner.run_full(&CancellationToken::new()).unwrap();
    assert_eq!(second.staged_changes, 0);
}

#[test]
fn commit_reports_added_files_to_source_control() {
    let project = user_fields_project();
    let source_control = Arc::new(RecordingSourceControl::default());
    let mut runner = project.runner().with_source_control(source_control.clone());

    runner.run_full(&CancellationToken::new()).unwrap();

    let calls = source_control.calls.lock();
    assert_eq!(calls.len(), 1);
    let (added, removed) = &calls[0];
    assert_eq!(added.len(), 5);
    assert!(added.contains(&project.artifact("A")));
    assert!(removed.is_empty());
}

#[test]
fn moving_a_definition_moves_its_colocated_artifact() {
    let project = TestProject::with_artifact_directory(None);
    let old_source = project.write("src/one/a.graphql", "query A { viewer { id } }");
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();
    let old_artifact = project.root().join("src/one/__generated__/A.json");
    assert!(old_artifact.is_file());

    std::fs::create_dir_all(project.root().join("src/two")).unwrap();
    let new_source = project.root().join("src/two/a.graphql");
    std::fs::rename(&old_source, &new_source).unwrap();
    let report = runner.run_incremental(
        &[FileChange::removed(old_source), FileChange::added(new_source)],
        &CancellationToken::new(),
    ).unwrap();

    let new_artifact = project.root().join("src/two/__generated__/A.json");
    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["A"]));
    assert_eq!(report.created, vec![new_artifact.clone()]);
    assert_eq!(report.deleted, vec![old_artifact.clone()]);
    assert!(new_artifact.is_file());
    assert!(!old_artifact.exists());
}

#[test]
fn directories_moved_out_of_and_into_src_are_tracked() {
    let project = user_fields_project();
    project.write("src/feature/d.graphql", "query D { viewer { ...UserFields } }");
    let mut runner = project.runner();
    runner.run_full(&CancellationToken::new()).unwrap();
    assert!(project.artifact("D").is_file());

    let feature = project.root().join("src/feature");
    let elsewhere = project.root().join("elsewhere");
    std::fs::rename(&feature, &elsewhere).unwrap();
    let report = runner.run_incremental(&[FileChange::removed(feature)], &CancellationToken::new())
        .unwrap();
    assert_eq!(report.deleted, vec![project.artifact("D")]);
    assert!(!project.artifact("D").exists());

    let moved = project.root().join("src/moved");
    std::fs::rename(&elsewhere, &moved).unwrap();
    let report = runner.run_incremental(&[FileChange::added(moved)], &CancellationToken::new())
        .unwrap();
    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["D"]));
    assert!(project.artifact("D").is_file());
}

#[test]
fn duplicate_names_compile_neither_definition() {
    let project = TestProject::new();
    project.write("src/a.graphql", "query Dup { viewer { id } }");
    let second = project.write("src/b.graphql", "query Dup { viewer { name } }");
    let mut runner = project.runner();

    let report = runner.run_full(&CancellationToken::new()).unwrap();
    assert!(matches!(
        &report.errors[&ErrorOrigin::Definition("Dup".to_string())][..],
        [CompilerError::Validation(ValidationError::DuplicateDefinition { .. })]
    ));
    assert!(report.compiled.is_empty());
    assert!(!project.artifact("Dup").exists());
    assert_eq!(runner.failed_definitions(), &names(&["Dup"]));

    project.remove("src/b.graphql");
    let report = runner.run_incremental(&[FileChange::removed(second)], &CancellationToken::new())
        .unwrap();
    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["Dup"]));
    assert!(project.artifact("Dup").is_file());
}

#[test]
fn unparseable_file_keeps_its_previous_artifacts() {
    let project = user_fields_project();
    let source_control = Arc::new(RecordingSourceControl::default());
    let mut runner = project.runner().with_source_control(source_control.clone());
    runner.run_full(&CancellationToken::new()).unwrap();
    let before = project.read_artifact("C");

    let broken = project.write("src/c.graphql", "query C { story(id: 1) { title }");
    let report = runner.run_incremental(&[FileChange::changed(broken.clone())], &CancellationToken::new())
        .unwrap();
    assert_eq!(report.errors.keys().collect::<Vec<_>>(), vec![&ErrorOrigin::Path(broken.clone())]);
    assert!(report.deleted.is_empty());
    assert_eq!(project.read_artifact("C"), before);
    assert!(load_manifest(&project).get(&PathBuf::from("generated/C.json")).is_some());
    assert!(source_control.calls.lock().iter().all(|(_, removed)| removed.is_empty()));

    project.write("src/c.graphql", "query C { story(id: 1) { id title } }");
    let report = runner.run_incremental(&[FileChange::changed(broken)], &CancellationToken::new())
        .unwrap();
    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.compiled, names(&["C"]));
    assert_eq!(report.updated, vec![project.artifact("C")]);
}
