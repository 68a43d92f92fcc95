use crate::ir::DefinitionKind;
use crate::ir::OperationKind;
use crate::ir::Selection;
use crate::parser::GraphQLDocumentParser;
use crate::parser::ParserPlugin;
use crate::parser::TaggedTemplateParser;
use std::path::Path;

fn parse(text: &str) -> Vec<crate::ir::Definition> {
    GraphQLDocumentParser::new()
        .parse(Path::new("test.graphql"), text)
        .unwrap()
}

#[test]
fn recognizes_configured_extensions() {
    let parser = GraphQLDocumentParser::new();
    assert!(parser.recognize(Path::new("src/a.graphql")));
    assert!(parser.recognize(Path::new("src/a.gql")));
    assert!(!parser.recognize(Path::new("src/a.js")));
    assert!(TaggedTemplateParser::new().recognize(Path::new("src/a.tsx")));
}

#[test]
fn lowers_fields_by_presence_of_selections() {
    let defs = parse("query Viewer { viewer { id name } }");
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].kind(), &DefinitionKind::Operation { operation: OperationKind::Query });

    let Selection::LinkedField(viewer) = &defs[0].selections()[0] else {
        panic!("expected a linked field");
    };
    assert!(matches!(viewer.selections()[0], Selection::ScalarField(_)));
    assert_eq!(viewer.location().line, 1);
}

#[test]
fn include_and_skip_become_conditions() {
    let defs = parse(
        "query Q($withName: Boolean!) { viewer { name @include(if: $withName) id @skip(if: true) } }",
    );
    let Selection::LinkedField(viewer) = &defs[0].selections()[0] else {
        panic!("expected a linked field");
    };
    // `id @skip(if: true)` never passes and is dropped outright.
    assert_eq!(viewer.selections().len(), 1);
    let Selection::Condition(condition) = &viewer.selections()[0] else {
        panic!("expected a condition");
    };
    assert_eq!(condition.variable(), "withName");
    assert!(condition.passing_value());
    assert_eq!(defs[0].variables()[0].type_annotation(), "Boolean!");
}

#[test]
fn module_directive_becomes_module_import() {
    let defs = parse(
        r#"query Feed { story { ...StoryRenderer @module(name: "StoryRenderer.react") } }"#,
    );
    let Selection::LinkedField(story) = &defs[0].selections()[0] else {
        panic!("expected a linked field");
    };
    let Selection::ModuleImport(module) = &story.selections()[0] else {
        panic!("expected a module import");
    };
    assert_eq!(module.module_name(), "StoryRenderer.react");
    assert_eq!(module.split_operation_name(), "StoryRenderer$normalization");
    assert!(defs[0].referenced_fragments().contains("StoryRenderer"));
}

#[test]
fn anonymous_operations_are_rejected() {
    let errors = GraphQLDocumentParser::new()
        .parse(Path::new("anon.graphql"), "{ viewer { id } }")
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path(), Path::new("anon.graphql"));
}

#[test]
fn syntax_errors_carry_the_path() {
    let errors = GraphQLDocumentParser::new()
        .parse(Path::new("broken.graphql"), "query Q { viewer { id }")
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path(), Path::new("broken.graphql"));
}

#[test]
fn formatting_does_not_change_source_hash() {
    let compact = parse("fragment F on User { id name }");
    let spread_out = parse("fragment F on User {\n  id\n\n  name\n}\n");
    assert_eq!(compact[0].source_hash(), spread_out[0].source_hash());
    assert_eq!(spread_out[0].location().line, 1);
}

#[test]
fn tagged_templates_offset_locations() {
    let defs = TaggedTemplateParser::new()
        .parse(
            Path::new("Viewer.js"),
            "// header\n// header\nexport const q = graphql`query ViewerQuery { viewer { id } }`;\n",
        )
        .unwrap();
    assert_eq!(defs[0].name(), "ViewerQuery");
    assert_eq!(defs[0].location().line, 3);
}
