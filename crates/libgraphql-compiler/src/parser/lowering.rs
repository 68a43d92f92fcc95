//! Lowers a `graphql_parser` executable document into compiler IR.

use crate::ir;
use crate::ir::Definition;
use crate::ir::OperationKind;
use crate::ir::Selection;
use crate::loc::SourceLocation;
use crate::parser::ParseError;
use graphql_parser::query as ast;
use std::path::Path;

type Result<T> = std::result::Result<T, Vec<ParseError>>;

pub(crate) fn lower_document(
    path: &Path,
    text: &str,
    line_offset: usize,
) -> Result<Vec<Definition>> {
    let doc = graphql_parser::parse_query::<String>(text)
        .map_err(|err| vec![ParseError::new(path, None, err.to_string().trim())])?;

    let mut lowerer = Lowerer {
        path,
        line_offset,
        errors: vec![],
    };
    let mut definitions = vec![];
    for def in &doc.definitions {
        if let Some(definition) = lowerer.lower_definition(def) {
            definitions.push(definition);
        }
    }

    if !lowerer.errors.is_empty() {
        return Err(lowerer.errors);
    }
    Ok(definitions)
}

struct Lowerer<'a> {
    path: &'a Path,
    line_offset: usize,
    errors: Vec<ParseError>,
}
impl Lowerer<'_> {
    fn location(&self, pos: graphql_parser::Pos) -> SourceLocation {
        SourceLocation::from_pos(Some(self.path), pos, self.line_offset)
    }

    fn error(&mut self, pos: graphql_parser::Pos, message: impl Into<String>) {
        let location = self.location(pos);
        self.errors.push(ParseError::new(self.path, Some(location), message));
    }

    fn lower_definition(
        &mut self,
        def: &ast::Definition<'_, String>,
    ) -> Option<Definition> {
        match def {
            ast::Definition::Fragment(frag) => {
                let ast::TypeCondition::On(type_condition) = &frag.type_condition;
                let selections = self.lower_selection_set(&frag.selection_set);
                let directives = self.lower_directives(&frag.directives);
                Some(
                    Definition::fragment(frag.name.as_str(), type_condition.as_str(), selections)
                        .with_directives(directives)
                        .with_location(self.location(frag.position)),
                )
            },

            ast::Definition::Operation(ast::OperationDefinition::SelectionSet(set)) => {
                self.error(
                    set.span.0,
                    "Anonymous operations are not supported; every operation \
                    needs a name to derive its artifact from.",
                );
                None
            },

            ast::Definition::Operation(ast::OperationDefinition::Query(query)) => self.lower_operation(
                OperationKind::Query,
                query.name.as_ref(),
                &query.variable_definitions,
                &query.directives,
                &query.selection_set,
                query.position,
            ),

            ast::Definition::Operation(ast::OperationDefinition::Mutation(mutation)) => self.lower_operation(
                OperationKind::Mutation,
                mutation.name.as_ref(),
                &mutation.variable_definitions,
                &mutation.directives,
                &mutation.selection_set,
                mutation.position,
            ),

            ast::Definition::Operation(ast::OperationDefinition::Subscription(sub)) => self.lower_operation(
                OperationKind::Subscription,
                sub.name.as_ref(),
                &sub.variable_definitions,
                &sub.directives,
                &sub.selection_set,
                sub.position,
            ),
        }
    }

    fn lower_operation(
        &mut self,
        kind: OperationKind,
        name: Option<&String>,
        variable_definitions: &[ast::VariableDefinition<'_, String>],
        directives: &[ast::Directive<'_, String>],
        selection_set: &ast::SelectionSet<'_, String>,
        pos: graphql_parser::Pos,
    ) -> Option<Definition> {
        let Some(name) = name else {
            self.error(
                pos,
                format!(
                    "Anonymous {kind} operations are not supported; every \
                    operation needs a name to derive its artifact from.",
                ),
            );
            return None;
        };

        let variables = variable_definitions.iter()
            .map(|var_def| ir::VariableDefinition::new(
                var_def.name.as_str(),
                type_annotation(&var_def.var_type),
                var_def.default_value.as_ref().map(ir::Value::from_ast),
            ))
            .collect();
        let selections = self.lower_selection_set(selection_set);
        let directives = self.lower_directives(directives);

        Some(
            Definition::operation(kind, name.as_str(), selections)
                .with_variables(variables)
                .with_directives(directives)
                .with_location(self.location(pos)),
        )
    }

    fn lower_selection_set(
        &mut self,
        selection_set: &ast::SelectionSet<'_, String>,
    ) -> Vec<Selection> {
        selection_set.items.iter()
            .filter_map(|item| self.lower_selection(item))
            .collect()
    }

    fn lower_selection(
        &mut self,
        selection: &ast::Selection<'_, String>,
    ) -> Option<Selection> {
        let (lowered, directives, pos) = match selection {
            ast::Selection::Field(field) => {
                let location = self.location(field.position);
                let arguments = ir::Argument::from_ast_list(&field.arguments);
                let lowered = if field.selection_set.items.is_empty() {
                    Selection::ScalarField(ir::ScalarField {
                        alias: field.alias.clone(),
                        name: field.name.clone(),
                        arguments,
                        directives: vec![],
                        location,
                    })
                } else {
                    Selection::LinkedField(ir::LinkedField {
                        alias: field.alias.clone(),
                        name: field.name.clone(),
                        arguments,
                        directives: vec![],
                        type_name: None,
                        selections: self.lower_selection_set(&field.selection_set),
                        location,
                    })
                };
                (lowered, &field.directives, field.position)
            },

            ast::Selection::FragmentSpread(spread) => {
                let location = self.location(spread.position);
                let lowered = match module_name(&spread.directives) {
                    Some(Ok(module_name)) => Selection::ModuleImport(ir::ModuleImport {
                        fragment_name: spread.fragment_name.clone(),
                        module_name,
                        fragment_type: None,
                        selections: vec![Selection::FragmentSpread(ir::FragmentSpread {
                            fragment_name: spread.fragment_name.clone(),
                            directives: vec![],
                            location: location.clone(),
                        })],
                        location,
                    }),
                    Some(Err(message)) => {
                        self.error(spread.position, message);
                        return None;
                    },
                    None => Selection::FragmentSpread(ir::FragmentSpread {
                        fragment_name: spread.fragment_name.clone(),
                        directives: vec![],
                        location,
                    }),
                };
                (lowered, &spread.directives, spread.position)
            },

            ast::Selection::InlineFragment(inline) => {
                let type_condition = inline.type_condition.as_ref()
                    .map(|ast::TypeCondition::On(name)| name.clone());
                let lowered = Selection::InlineFragment(ir::InlineFragment {
                    type_condition,
                    directives: vec![],
                    selections: self.lower_selection_set(&inline.selection_set),
                    location: self.location(inline.position),
                });
                (lowered, &inline.directives, inline.position)
            },
        };

        self.apply_directives(lowered, directives, pos)
    }

    /// Attaches the directives of a selection to its lowered form: `@include`
    /// and `@skip` wrap it in a [`Condition`](ir::Condition) (or drop it
    /// entirely for a literal condition that never passes), `@module` has
    /// already been consumed, and anything else is kept verbatim.
    fn apply_directives(
        &mut self,
        mut lowered: Selection,
        directives: &[ast::Directive<'_, String>],
        pos: graphql_parser::Pos,
    ) -> Option<Selection> {
        let mut kept = vec![];
        let mut conditions = vec![];
        for directive in directives {
            match directive.name.as_str() {
                "include" | "skip" => {
                    let passing_value = directive.name == "include";
                    match directive.arguments.as_slice() {
                        [(arg_name, ast::Value::Variable(var))] if arg_name == "if" =>
                            conditions.push((var.clone(), passing_value)),
                        [(arg_name, ast::Value::Boolean(value))] if arg_name == "if" => {
                            if *value != passing_value {
                                return None;
                            }
                        },
                        _ => {
                            self.error(
                                directive.position,
                                format!(
                                    "@{} requires exactly one `if` argument \
                                    with a variable or boolean value.",
                                    directive.name,
                                ),
                            );
                            return None;
                        },
                    }
                },
                "module" => (),
                _ => kept.push(lower_directive(directive)),
            }
        }

        match &mut lowered {
            Selection::FragmentSpread(spread) => spread.directives = kept,
            Selection::InlineFragment(inline) => inline.directives = kept,
            Selection::LinkedField(field) => field.directives = kept,
            Selection::ScalarField(field) => field.directives = kept,
            Selection::ModuleImport(_) | Selection::Condition(_) => {
                if !kept.is_empty() {
                    self.error(pos, "@module spreads do not accept other directives.");
                    return None;
                }
            },
        }

        let location = self.location(pos);
        Some(conditions.into_iter().rev().fold(lowered, |inner, (variable, passing_value)| {
            Selection::Condition(ir::Condition {
                variable,
                passing_value,
                selections: vec![inner],
                location: location.clone(),
            })
        }))
    }

    fn lower_directives(
        &mut self,
        directives: &[ast::Directive<'_, String>],
    ) -> Vec<ir::Directive> {
        directives.iter().map(lower_directive).collect()
    }
}

fn lower_directive(directive: &ast::Directive<'_, String>) -> ir::Directive {
    ir::Directive::new(
        directive.name.as_str(),
        ir::Argument::from_ast_list(&directive.arguments),
    )
}

/// `Some(Ok(name))` for a valid `@module(name: "...")`, `Some(Err(..))` for a
/// malformed one, `None` if the spread has no `@module` directive.
fn module_name(
    directives: &[ast::Directive<'_, String>],
) -> Option<std::result::Result<String, String>> {
    let directive = directives.iter().find(|d| d.name == "module")?;
    Some(match directive.arguments.as_slice() {
        [(arg_name, ast::Value::String(name))] if arg_name == "name" => Ok(name.clone()),
        _ => Err("@module requires exactly one string `name` argument.".to_string()),
    })
}

fn type_annotation(var_type: &ast::Type<'_, String>) -> String {
    match var_type {
        ast::Type::NamedType(name) => name.clone(),
        ast::Type::ListType(inner) => format!("[{}]", type_annotation(inner)),
        ast::Type::NonNullType(inner) => format!("{}!", type_annotation(inner)),
    }
}
