use crate::context::CompilationContext;
use crate::context::CompilationContextBuilder;
use crate::context::ValidationError;
use crate::ir::Definition;
use crate::ir::FragmentSpread;
use crate::ir::LinkedField;
use crate::ir::OperationKind;
use crate::ir::ScalarField;
use crate::ir::Selection;
use crate::loc::SourceLocation;
use crate::schema::Schema;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

fn spread(name: &str) -> Selection {
    Selection::FragmentSpread(FragmentSpread::new(name))
}

fn field(name: &str) -> Selection {
    Selection::ScalarField(ScalarField::new(name))
}

fn fragment(name: &str, selections: Vec<Selection>) -> Arc<Definition> {
    Arc::new(Definition::fragment(name, "User", selections))
}

fn query(name: &str, selections: Vec<Selection>) -> Arc<Definition> {
    Arc::new(Definition::operation(
        OperationKind::Query,
        name,
        vec![Selection::LinkedField(LinkedField::new("viewer", selections))],
    ))
}

fn names<'a>(defs: impl IntoIterator<Item = &'a Arc<Definition>>) -> Vec<&'a str> {
    defs.into_iter().map(|def| def.name()).collect()
}

fn empty_context() -> CompilationContext {
    CompilationContext::new(Arc::new(Schema::empty()))
}

#[test]
fn add_is_persistent() {
    let base = empty_context().add([fragment("A", vec![field("id")])]).unwrap();
    let extended = base.add([query("Q", vec![spread("A")])]).unwrap();

    assert_eq!(base.len(), 1);
    assert_eq!(extended.len(), 2);
    assert!(!base.contains("Q"));
    assert!(Arc::ptr_eq(base.get("A").unwrap(), extended.get("A").unwrap()));

    let trimmed = extended.without_definition("A");
    assert_eq!(names(trimmed.documents()), vec!["Q"]);
    assert_eq!(extended.len(), 2);
}

#[test]
fn add_rejects_duplicate_names() {
    let located = Arc::new(
        Definition::fragment("A", "User", vec![field("id")])
            .with_location(SourceLocation::new(Some(Path::new("b.graphql")), 3, 1)),
    );
    let base = empty_context().add([fragment("A", vec![field("id")])]).unwrap();

    let err = base.add([located]).unwrap_err();
    let ValidationError::DuplicateDefinition { name, second_location, .. } = err else {
        panic!("expected a duplicate definition error, got {err:?}");
    };
    assert_eq!(name, "A");
    assert_eq!(second_location.line, 3);
    assert_eq!(base.len(), 1);
}

#[test]
fn get_unknown_name_is_not_found() {
    assert_eq!(
        empty_context().get("Nope").unwrap_err(),
        ValidationError::NotFound("Nope".to_string()),
    );
}

#[test]
fn replacing_a_definition_keeps_its_position() {
    let context = empty_context()
        .add([fragment("A", vec![field("id")]), fragment("B", vec![field("id")])])
        .unwrap();
    let replacement = context.get("A").unwrap().with_selections(vec![field("name")]);
    let replaced = context.with_definitions_replaced([replacement]);

    assert_eq!(names(replaced.documents()), vec!["A", "B"]);
    assert_eq!(replaced.get("A").unwrap().selections(), &[field("name")]);
    assert_eq!(context.get("A").unwrap().selections(), &[field("id")]);
}

#[test]
fn topological_order_puts_fragments_first() {
    let context = empty_context()
        .add([
            query("Q", vec![spread("B"), spread("A")]),
            fragment("A", vec![field("id")]),
            fragment("B", vec![spread("A")]),
        ])
        .unwrap();

    assert_eq!(names(context.topological_order()), vec!["A", "B", "Q"]);
}

#[test]
fn restrict_to_keeps_fragment_closure() {
    let context = empty_context()
        .add([
            fragment("A", vec![field("id")]),
            fragment("B", vec![spread("A")]),
            fragment("C", vec![field("id")]),
            query("Q", vec![spread("B")]),
            query("R", vec![spread("C")]),
        ])
        .unwrap();

    let restricted = context.restrict_to(["Q", "Unknown"]);
    assert_eq!(names(restricted.documents()), vec!["A", "B", "Q"]);
}

#[test]
fn dependents_are_transitive() {
    let context = empty_context()
        .add([
            fragment("A", vec![field("id")]),
            fragment("B", vec![spread("A")]),
            query("Q", vec![spread("B")]),
            query("R", vec![field("id")]),
        ])
        .unwrap();

    assert_eq!(
        context.dependents_of(&BTreeSet::from(["A".to_string()])),
        BTreeSet::from(["B".to_string(), "Q".to_string()]),
    );
}

#[test]
fn validate_reports_dangling_spreads() {
    let context = empty_context().add([query("Q", vec![spread("Missing")])]).unwrap();
    let errors = context.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].definition_name(), "Q");
}

#[test]
fn builder_accepts_forward_references() {
    let mut builder = CompilationContextBuilder::new(Arc::new(Schema::empty()));
    builder.add_definitions([query("Q", vec![spread("A")])]);
    builder.add_definitions([fragment("A", vec![field("id")])]);

    let validated = builder.build();
    assert!(validated.errors.is_empty());
    assert_eq!(names(validated.context.documents()), vec!["Q", "A"]);
    assert!(validated.context.validate().is_empty());
}

#[test]
fn builder_excludes_every_duplicate_and_its_dependents() {
    let mut builder = CompilationContextBuilder::new(Arc::new(Schema::empty()));
    builder.add_definitions([fragment("A", vec![field("id")])]);
    builder.add_definitions([
        fragment("A", vec![field("name")]),
        query("Q", vec![spread("A")]),
        query("R", vec![field("id")]),
    ]);

    let validated = builder.build();
    assert_eq!(names(validated.context.documents()), vec!["R"]);
    assert_eq!(
        validated.errors.iter().map(|err| err.definition_name()).collect::<Vec<_>>(),
        vec!["A", "Q"],
    );
    assert!(matches!(
        validated.errors[0],
        ValidationError::DuplicateDefinition { .. },
    ));
    assert!(matches!(
        &validated.errors[1],
        ValidationError::InvalidDependency { dependency, .. } if dependency == "A",
    ));
    assert!(validated.context.validate().is_empty());
}

#[test]
fn builder_removes_dependents_of_missing_fragments() {
    let mut builder = CompilationContextBuilder::new(Arc::new(Schema::empty()));
    builder.add_definitions([
        fragment("B", vec![spread("Missing")]),
        fragment("C", vec![spread("B")]),
        query("Q", vec![spread("C")]),
        query("R", vec![field("id")]),
    ]);

    let validated = builder.build();
    assert_eq!(names(validated.context.documents()), vec!["R"]);
    assert_eq!(
        validated.errors.iter().map(|err| err.definition_name()).collect::<Vec<_>>(),
        vec!["B", "C", "Q"],
    );
    assert!(matches!(
        &validated.errors[0],
        ValidationError::MissingFragment { fragment, .. } if fragment == "Missing",
    ));
    assert!(validated.context.validate().is_empty());
}

#[test]
fn builder_rejects_spreads_of_operations() {
    let mut builder = CompilationContextBuilder::new(Arc::new(Schema::empty()));
    builder.add_definitions([
        query("Other", vec![field("id")]),
        query("Q", vec![spread("Other")]),
    ]);

    let validated = builder.build();
    assert_eq!(names(validated.context.documents()), vec!["Other"]);
}
