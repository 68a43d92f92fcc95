use crate::context::CompilationContext;
use crate::context::ValidationError;
use crate::ir::Definition;
use crate::ir::selection::find_fragment_reference;
use crate::schema::Schema;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// The outcome of [`CompilationContextBuilder::build`]: a context that
/// satisfies the closed-reference invariant, plus the errors for every
/// definition that had to be left out of it.
#[derive(Debug)]
pub struct ValidatedContext {
    pub context: CompilationContext,
    pub errors: Vec<ValidationError>,
}

/// Merges the definitions of every document in a run into one
/// [`CompilationContext`].
///
/// Fragment references are only checked in [`build`](Self::build), once every
/// document has been added, since a spread may refer to a fragment that lives
/// in a document added later.
///
/// ```
/// use libgraphql_compiler::context::CompilationContextBuilder;
/// use libgraphql_compiler::ir::Definition;
/// use libgraphql_compiler::ir::FragmentSpread;
/// use libgraphql_compiler::ir::OperationKind;
/// use libgraphql_compiler::ir::Selection;
/// use libgraphql_compiler::schema::Schema;
/// use std::sync::Arc;
///
/// let mut builder = CompilationContextBuilder::new(Arc::new(Schema::empty()));
/// builder.add_definitions([Arc::new(Definition::operation(
///     OperationKind::Query,
///     "Feed",
///     vec![Selection::FragmentSpread(FragmentSpread::new("Missing"))],
/// ))]);
///
/// let validated = builder.build();
/// assert!(validated.context.is_empty());
/// assert_eq!(validated.errors.len(), 1);
/// ```
#[derive(Debug)]
pub struct CompilationContextBuilder {
    definitions: IndexMap<String, Arc<Definition>>,
    duplicated: BTreeSet<String>,
    errors: Vec<ValidationError>,
    schema: Arc<Schema>,
}
impl CompilationContextBuilder {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            definitions: IndexMap::new(),
            duplicated: BTreeSet::new(),
            errors: vec![],
            schema,
        }
    }

    /// Adds definitions in the given order. A name collision records a
    /// [`DuplicateDefinition`](ValidationError::DuplicateDefinition) error for
    /// the later definition, and [`build`](Self::build) leaves every
    /// definition with that name out of the context.
    pub fn add_definitions(&mut self, definitions: impl IntoIterator<Item = Arc<Definition>>) {
        for definition in definitions {
            if let Some(existing) = self.definitions.get(definition.name()) {
                self.errors.push(ValidationError::DuplicateDefinition {
                    name: definition.name().to_string(),
                    first_location: existing.location().clone(),
                    second_location: definition.location().clone(),
                });
                self.duplicated.insert(definition.name().to_string());
                continue;
            }
            self.definitions.insert(definition.name().to_string(), definition);
        }
    }

    pub fn build(self) -> ValidatedContext {
        let mut errors = self.errors;
        let mut invalid = self.duplicated;

        for definition in self.definitions.values() {
            if invalid.contains(definition.name()) {
                continue;
            }
            for fragment in definition.referenced_fragments() {
                let resolves = self.definitions.get(fragment)
                    .is_some_and(|def| def.is_fragment());
                if resolves {
                    continue;
                }
                let location = find_fragment_reference(definition.selections(), fragment)
                    .unwrap_or(definition.location());
                errors.push(ValidationError::MissingFragment {
                    definition: definition.name().to_string(),
                    fragment: fragment.clone(),
                    location: location.clone(),
                });
                invalid.insert(definition.name().to_string());
            }
        }

        // Everything that (transitively) spreads an invalid definition is
        // invalid too. Iterate to a fixpoint in insertion order so the error
        // list is deterministic.
        loop {
            let mut newly_invalid = vec![];
            for definition in self.definitions.values() {
                if invalid.contains(definition.name()) {
                    continue;
                }
                let failed_dependency = definition.referenced_fragments()
                    .iter()
                    .find(|fragment| invalid.contains(fragment.as_str()));
                if let Some(dependency) = failed_dependency {
                    newly_invalid.push((definition.name().to_string(), dependency.clone()));
                }
            }
            if newly_invalid.is_empty() {
                break;
            }
            for (definition, dependency) in newly_invalid {
                invalid.insert(definition.clone());
                errors.push(ValidationError::InvalidDependency {
                    definition,
                    dependency,
                });
            }
        }

        let valid = self.definitions
            .into_values()
            .filter(|definition| !invalid.contains(definition.name()));
        let context = match CompilationContext::new(self.schema.clone()).add(valid) {
            Ok(context) => context,
            Err(err) => {
                // Duplicated names were excluded above, so this cannot collide.
                errors.push(err);
                CompilationContext::new(self.schema)
            },
        };

        ValidatedContext {
            context,
            errors,
        }
    }
}
