use crate::context::CompilationContext;
use crate::dependency_graph::CyclicDependencyError;
use crate::ir::Definition;
use crate::ir::Selection;
use crate::schema::Schema;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
struct GraphNode {
    is_operation: bool,
    fragments: BTreeSet<String>,
    schema_types: BTreeSet<String>,
}

/// Edges from every definition to the fragments it spreads (directly, or via
/// a module import) and to the schema types its selections touch.
///
/// The graph is a value: [`update`](Self::update) returns a new graph with
/// only the changed definitions' edges rebuilt.
///
/// Edges to fragments that do not exist are kept. When the missing fragment
/// shows up later, the definitions spreading it are found through those
/// edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, GraphNode>,
}
impl DependencyGraph {
    /// Builds the graph of a validated context, failing if its fragment
    /// spreads form any cycles.
    ///
    /// This is the entry point for callers holding a finished context. The
    /// runner instead builds from raw definitions with
    /// [`from_definitions`](Self::from_definitions), so that edges to missing
    /// fragments survive, and reports [`cycles`](Self::cycles) per definition
    /// without failing the whole run.
    pub fn build(
        context: &CompilationContext,
    ) -> std::result::Result<Self, Vec<CyclicDependencyError>> {
        let graph = Self::from_definitions(context.documents(), context.schema());
        let cycles = graph.cycles();
        if !cycles.is_empty() {
            return Err(cycles);
        }
        Ok(graph)
    }

    /// Builds the graph of raw (possibly invalid) definitions. Where names
    /// collide the first definition wins.
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = &'a Arc<Definition>>,
        schema: &Schema,
    ) -> Self {
        let mut nodes = BTreeMap::new();
        for definition in definitions {
            if !nodes.contains_key(definition.name()) {
                nodes.insert(definition.name().to_string(), graph_node(definition, schema));
            }
        }
        Self { nodes }
    }

    /// Returns a new graph with the edges of `changed_names` rebuilt from
    /// `context`. Names no longer in `context` are dropped.
    pub fn update(&self, context: &CompilationContext, changed_names: &BTreeSet<String>) -> Self {
        self.update_with(context.schema(), changed_names, |name| context.get(name).ok())
    }

    /// Like [`update`](Self::update), looking definitions up through
    /// `lookup`.
    pub fn update_with<'a>(
        &self,
        schema: &Schema,
        changed_names: &BTreeSet<String>,
        lookup: impl Fn(&str) -> Option<&'a Arc<Definition>>,
    ) -> Self {
        let mut nodes = self.nodes.clone();
        for name in changed_names {
            match lookup(name) {
                Some(definition) => {
                    nodes.insert(name.clone(), graph_node(definition, schema));
                },
                None => {
                    nodes.remove(name);
                },
            }
        }
        Self { nodes }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn fragments_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.nodes.get(name).map(|node| &node.fragments)
    }

    pub fn schema_types_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.nodes.get(name).map(|node| &node.schema_types)
    }

    /// Every definition that transitively spreads any of `names`, plus those
    /// of `names` that are in the graph.
    pub fn reaching<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
        let mut referencers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, node) in &self.nodes {
            for fragment in &node.fragments {
                referencers.entry(fragment.as_str()).or_default().push(name.as_str());
            }
        }

        let mut reached = BTreeSet::new();
        let mut stack: Vec<&str> = names.into_iter().collect();
        for name in &stack {
            if self.nodes.contains_key(*name) {
                reached.insert(name.to_string());
            }
        }
        while let Some(name) = stack.pop() {
            for referencer in referencers.get(name).into_iter().flatten() {
                if reached.insert(referencer.to_string()) {
                    stack.push(*referencer);
                }
            }
        }
        reached
    }

    /// Operations that must be recompiled because they (transitively) spread
    /// one of `changed_fragments`.
    pub fn affected_operations(&self, changed_fragments: &BTreeSet<String>) -> BTreeSet<String> {
        self.reaching(changed_fragments.iter().map(String::as_str))
            .into_iter()
            .filter(|name| self.nodes.get(name).is_some_and(|node| node.is_operation))
            .collect()
    }

    /// Definitions whose selections touch one of `changed_types`, plus every
    /// operation that reaches one of them.
    pub fn affected_by_schema_types(&self, changed_types: &BTreeSet<String>) -> BTreeSet<String> {
        let touching: Vec<&str> = self.nodes.iter()
            .filter(|(_, node)| !node.schema_types.is_disjoint(changed_types))
            .map(|(name, _)| name.as_str())
            .collect();
        let mut affected: BTreeSet<String> = touching.iter().map(|name| name.to_string()).collect();
        affected.extend(
            self.reaching(touching)
                .into_iter()
                .filter(|name| self.nodes.get(name).is_some_and(|node| node.is_operation)),
        );
        affected
    }

    /// Every distinct cycle of fragment spreads, in a deterministic order.
    pub fn cycles(&self) -> Vec<CyclicDependencyError> {
        let mut cycles = vec![];
        let mut seen = HashSet::new();
        for name in self.nodes.keys() {
            let mut path = vec![];
            let mut visiting = HashSet::new();
            self.check_cycles(name, &mut path, &mut visiting, &mut seen, &mut cycles);
        }
        cycles
    }

    fn check_cycles(
        &self,
        name: &str,
        path: &mut Vec<String>,
        visiting: &mut HashSet<String>,
        seen: &mut HashSet<CyclicDependencyError>,
        cycles: &mut Vec<CyclicDependencyError>,
    ) {
        if visiting.contains(name) {
            let start = path.iter().position(|member| member == name).unwrap_or(0);
            let mut cycle_path = path[start..].to_vec();
            cycle_path.push(name.to_string());
            let cycle = CyclicDependencyError::from_path(&cycle_path);
            if seen.insert(cycle.clone()) {
                cycles.push(cycle);
            }
            return;
        }

        // Missing fragments are reported by context validation.
        let Some(node) = self.nodes.get(name) else {
            return;
        };

        path.push(name.to_string());
        visiting.insert(name.to_string());
        for fragment in &node.fragments {
            self.check_cycles(fragment, path, visiting, seen, cycles);
        }
        path.pop();
        visiting.remove(name);
    }
}

fn graph_node(definition: &Definition, schema: &Schema) -> GraphNode {
    let mut schema_types = BTreeSet::new();
    if let Some(parent_type) = definition.parent_type(schema) {
        schema_types.insert(parent_type.to_string());
        collect_schema_types(definition.selections(), parent_type, schema, &mut schema_types);
    }
    GraphNode {
        is_operation: definition.is_operation(),
        fragments: definition.referenced_fragments().clone(),
        schema_types,
    }
}

fn collect_schema_types(
    selections: &[Selection],
    parent_type: &str,
    schema: &Schema,
    types: &mut BTreeSet<String>,
) {
    for selection in selections {
        match selection {
            Selection::ScalarField(field) => {
                if let Some(field_type) = schema.field_type(parent_type, field.name()) {
                    types.insert(field_type.to_string());
                }
            },
            Selection::LinkedField(field) => {
                let Some(field_type) = schema.field_type(parent_type, field.name()) else {
                    continue;
                };
                types.insert(field_type.to_string());
                collect_schema_types(field.selections(), field_type, schema, types);
            },
            Selection::InlineFragment(inline) => {
                let inner_type = inline.type_condition().unwrap_or(parent_type);
                types.insert(inner_type.to_string());
                collect_schema_types(inline.selections(), inner_type, schema, types);
            },
            Selection::ModuleImport(module) => {
                let inner_type = module.fragment_type().unwrap_or(parent_type);
                collect_schema_types(module.selections(), inner_type, schema, types);
            },
            Selection::Condition(condition) => {
                collect_schema_types(condition.selections(), parent_type, schema, types);
            },
            Selection::FragmentSpread(_) => (),
        }
    }
}
