use crate::ir::Definition;
use crate::ir::FragmentSpread;
use crate::ir::InlineFragment;
use crate::ir::LinkedField;
use crate::ir::ModuleImport;
use crate::ir::OperationKind;
use crate::ir::ScalarField;
use crate::ir::Selection;
use crate::loc::SourceLocation;
use std::path::Path;

fn user_selections() -> Vec<Selection> {
    vec![
        Selection::ScalarField(ScalarField::new("id")),
        Selection::LinkedField(LinkedField::new(
            "friends",
            vec![Selection::FragmentSpread(FragmentSpread::new("FriendFields"))],
        )),
        Selection::InlineFragment(InlineFragment::new(
            Some("Admin".to_string()),
            vec![Selection::FragmentSpread(FragmentSpread::new("AdminFields"))],
        )),
    ]
}

#[test]
fn referenced_fragments_are_collected_from_nested_selections() {
    let def = Definition::fragment("UserFields", "User", user_selections());
    let refs: Vec<_> = def.referenced_fragments().iter().cloned().collect();
    assert_eq!(refs, vec!["AdminFields".to_string(), "FriendFields".to_string()]);
}

#[test]
fn module_imports_count_as_references() {
    let def = Definition::operation(
        OperationKind::Query,
        "FeedQuery",
        vec![Selection::ModuleImport(ModuleImport::new(
            "StoryRenderer",
            "StoryRenderer.react",
            vec![Selection::FragmentSpread(FragmentSpread::new("StoryRenderer"))],
        ))],
    );
    assert!(def.referenced_fragments().contains("StoryRenderer"));
}

#[test]
fn structural_key_ignores_locations() {
    let first = Definition::fragment("UserFields", "User", user_selections())
        .with_location(SourceLocation::new(Some(Path::new("a.graphql")), 1, 1));
    let second = Definition::fragment("UserFields", "User", user_selections())
        .with_location(SourceLocation::new(Some(Path::new("b.graphql")), 40, 3));

    assert_eq!(first.structural_key(), second.structural_key());
    assert_eq!(first.source_hash(), second.source_hash());
}

#[test]
fn with_selections_produces_new_definition() {
    let original = Definition::fragment("UserFields", "User", user_selections());
    let trimmed = original.with_selections(vec![
        Selection::ScalarField(ScalarField::new("id")),
    ]);

    assert_eq!(original.selections().len(), 3);
    assert_eq!(trimmed.selections().len(), 1);
    assert!(trimmed.referenced_fragments().is_empty());
    assert_eq!(trimmed.source_hash(), original.source_hash());
    assert_ne!(trimmed.structural_key(), original.structural_key());
}
