use crate::context::ValidationError;
use crate::ir::Definition;
use crate::ir::selection::find_fragment_reference;
use crate::ir::selection::fragment_references_in_order;
use crate::schema::Schema;
use crate::transform::PipelineOutput;
use crate::transform::TransformPipeline;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::sync::Arc;

/// Index of a [`Definition`] within a context's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(usize);

/// An immutable, ordered collection of every known [`Definition`] plus the
/// [`Schema`] they are validated against.
///
/// A `CompilationContext` is a persistent value: every "mutation"
/// ([`add`](Self::add), [`without_definition`](Self::without_definition),
/// [`with_definitions_replaced`](Self::with_definitions_replaced), ...)
/// returns a new context and leaves `self` untouched. Definitions live in a
/// shared, append-only arena of `Arc`s; a context is a name -> arena index map
/// over it, so derived contexts share every definition they did not replace.
/// Contexts are `Send + Sync` and can be read concurrently while a new one is
/// being derived.
#[derive(Clone, Debug)]
pub struct CompilationContext {
    arena: Arc<Vec<Arc<Definition>>>,
    index: Arc<IndexMap<String, DefinitionId>>,
    schema: Arc<Schema>,
}
impl CompilationContext {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            arena: Arc::new(vec![]),
            index: Arc::new(IndexMap::new()),
            schema,
        }
    }

    /// Returns a new context with `definitions` appended. Fails (leaving no
    /// partially-updated context behind) if any name collides with an existing
    /// definition or with another definition in the same batch.
    ///
    /// Fragment references are not checked here since forward references
    /// across documents are legal; see [`validate`](Self::validate).
    pub fn add(
        &self,
        definitions: impl IntoIterator<Item = Arc<Definition>>,
    ) -> Result<Self, ValidationError> {
        let mut arena = (*self.arena).clone();
        let mut index = (*self.index).clone();
        for definition in definitions {
            if let Some(existing) = index.get(definition.name()) {
                return Err(ValidationError::DuplicateDefinition {
                    name: definition.name().to_string(),
                    first_location: arena[existing.0].location().clone(),
                    second_location: definition.location().clone(),
                });
            }
            index.insert(definition.name().to_string(), DefinitionId(arena.len()));
            arena.push(definition);
        }
        Ok(Self {
            arena: Arc::new(arena),
            index: Arc::new(index),
            schema: self.schema.clone(),
        })
    }

    /// Returns a new context in which each given definition replaces the
    /// existing definition of the same name (keeping its position), or is
    /// appended if no such definition exists.
    pub fn with_definitions_replaced(
        &self,
        definitions: impl IntoIterator<Item = Definition>,
    ) -> Self {
        let mut arena = (*self.arena).clone();
        let mut index = (*self.index).clone();
        for definition in definitions {
            let id = DefinitionId(arena.len());
            index.insert(definition.name().to_string(), id);
            arena.push(Arc::new(definition));
        }
        Self {
            arena: Arc::new(arena),
            index: Arc::new(index),
            schema: self.schema.clone(),
        }
    }

    pub fn without_definition(&self, name: &str) -> Self {
        self.without_definitions(&BTreeSet::from([name.to_string()]))
    }

    pub fn without_definitions(&self, names: &BTreeSet<String>) -> Self {
        if !names.iter().any(|name| self.index.contains_key(name)) {
            return self.clone();
        }
        let mut index = (*self.index).clone();
        index.retain(|name, _| !names.contains(name));
        Self {
            arena: self.arena.clone(),
            index: Arc::new(index),
            schema: self.schema.clone(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every definition, in insertion order.
    pub fn documents(&self) -> impl Iterator<Item = &Arc<Definition>> {
        self.index.values().map(|id| &self.arena[id.0])
    }

    pub fn for_each(&self, mut f: impl FnMut(&Definition)) {
        for definition in self.documents() {
            f(definition);
        }
    }

    pub fn get(&self, name: &str) -> Result<&Arc<Definition>, ValidationError> {
        self.index.get(name)
            .map(|id| &self.arena[id.0])
            .ok_or_else(|| ValidationError::NotFound(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Runs both tracks of `pipeline` over this context.
    pub fn apply_transforms(&self, pipeline: &TransformPipeline) -> PipelineOutput {
        pipeline.run(self)
    }

    /// Checks the closed-reference invariant: every fragment referenced
    /// anywhere resolves to a fragment in this context.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = vec![];
        for definition in self.documents() {
            for fragment in definition.referenced_fragments() {
                let resolves = self.get(fragment).is_ok_and(|def| def.is_fragment());
                if !resolves {
                    let location = find_fragment_reference(
                        definition.selections(),
                        fragment,
                    ).unwrap_or(definition.location());
                    errors.push(ValidationError::MissingFragment {
                        definition: definition.name().to_string(),
                        fragment: fragment.clone(),
                        location: location.clone(),
                    });
                }
            }
        }
        errors
    }

    /// Definitions ordered so that every fragment precedes the first
    /// definition (in insertion order) that reaches it. Deterministic for a
    /// given context.
    pub fn topological_order(&self) -> Vec<&Arc<Definition>> {
        let mut visited = HashSet::new();
        let mut order = vec![];
        for definition in self.documents() {
            self.visit_topologically(definition, &mut visited, &mut order);
        }
        order
    }

    fn visit_topologically<'a>(
        &'a self,
        definition: &'a Arc<Definition>,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<&'a Arc<Definition>>,
    ) {
        if !visited.insert(definition.name()) {
            return;
        }
        let mut references = vec![];
        fragment_references_in_order(definition.selections(), &mut references);
        for fragment in references {
            if let Ok(fragment) = self.get(fragment) {
                self.visit_topologically(fragment, visited, order);
            }
        }
        order.push(definition);
    }

    /// A context holding only `roots` and the fragments they transitively
    /// reference, in the original order. Unknown root names are ignored.
    pub fn restrict_to<'a>(&self, roots: impl IntoIterator<Item = &'a str>) -> Self {
        let mut keep = BTreeSet::new();
        let mut stack: Vec<&str> = roots.into_iter().collect();
        while let Some(name) = stack.pop() {
            let Ok(definition) = self.get(name) else {
                continue;
            };
            if keep.insert(definition.name().to_string()) {
                stack.extend(definition.referenced_fragments().iter().map(String::as_str));
            }
        }

        let mut index = (*self.index).clone();
        index.retain(|name, _| keep.contains(name));
        Self {
            arena: self.arena.clone(),
            index: Arc::new(index),
            schema: self.schema.clone(),
        }
    }

    /// Names of every definition that transitively references (by spread or
    /// module import) any of `names`. Does not include `names` themselves
    /// unless they reach each other.
    pub fn dependents_of(&self, names: &BTreeSet<String>) -> BTreeSet<String> {
        let mut referencers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for definition in self.documents() {
            for fragment in definition.referenced_fragments() {
                referencers.entry(fragment.as_str()).or_default().push(definition.name());
            }
        }

        let mut dependents = BTreeSet::new();
        let mut stack: Vec<&str> = names.iter().map(String::as_str).collect();
        while let Some(name) = stack.pop() {
            for referencer in referencers.get(name).into_iter().flatten() {
                if dependents.insert(referencer.to_string()) {
                    stack.push(*referencer);
                }
            }
        }
        dependents
    }
}
