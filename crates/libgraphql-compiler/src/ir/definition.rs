use crate::content_hash::ContentHash;
use crate::ir::Directive;
use crate::ir::OperationKind;
use crate::ir::Selection;
use crate::ir::VariableDefinition;
use crate::ir::selection::collect_referenced_fragments;
use crate::loc::SourceLocation;
use crate::schema::Schema;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum DefinitionKind {
    Fragment,
    Operation {
        operation: OperationKind,
    },
    /// A standalone normalization artifact derived from a `@module` import.
    SplitOperation {
        /// Every operation whose module imports produced this split
        /// operation, sorted.
        #[serde(skip)]
        parent_operations: Vec<String>,
    },
}

/// A named IR node: a fragment, an operation, or a derived split operation.
///
/// Definitions are immutable once constructed. Transforms produce new
/// definitions (see [`Definition::with_selections`]) rather than mutating
/// existing ones, which is what lets several
/// [`CompilationContext`](crate::context::CompilationContext) snapshots share
/// them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Definition {
    kind: DefinitionKind,
    name: String,
    type_condition: Option<String>,
    variables: Vec<VariableDefinition>,
    directives: Vec<Directive>,
    selections: Vec<Selection>,
    #[serde(skip)]
    referenced_fragments: BTreeSet<String>,
    #[serde(skip)]
    source_hash: ContentHash,
    #[serde(skip)]
    location: SourceLocation,
}
impl Definition {
    pub fn fragment(
        name: impl Into<String>,
        type_condition: impl Into<String>,
        selections: Vec<Selection>,
    ) -> Self {
        Self::new(
            DefinitionKind::Fragment,
            name.into(),
            Some(type_condition.into()),
            selections,
        )
    }

    pub fn operation(
        operation: OperationKind,
        name: impl Into<String>,
        selections: Vec<Selection>,
    ) -> Self {
        Self::new(
            DefinitionKind::Operation { operation },
            name.into(),
            None,
            selections,
        )
    }

    pub fn split_operation(
        name: impl Into<String>,
        parent_operations: Vec<String>,
        type_condition: Option<String>,
        selections: Vec<Selection>,
    ) -> Self {
        Self::new(
            DefinitionKind::SplitOperation { parent_operations },
            name.into(),
            type_condition,
            selections,
        )
    }

    fn new(
        kind: DefinitionKind,
        name: String,
        type_condition: Option<String>,
        selections: Vec<Selection>,
    ) -> Self {
        let mut referenced_fragments = BTreeSet::new();
        collect_referenced_fragments(&selections, &mut referenced_fragments);
        let mut definition = Self {
            kind,
            name,
            type_condition,
            variables: vec![],
            directives: vec![],
            selections,
            referenced_fragments,
            source_hash: ContentHash::default(),
            location: SourceLocation::default(),
        };
        definition.source_hash = ContentHash::of(definition.structural_key());
        definition
    }

    pub fn with_directives(mut self, directives: Vec<Directive>) -> Self {
        self.directives = directives;
        self.source_hash = ContentHash::of(self.structural_key());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_variables(mut self, variables: Vec<VariableDefinition>) -> Self {
        self.variables = variables;
        self.source_hash = ContentHash::of(self.structural_key());
        self
    }

    /// Returns a new definition with the same metadata (including its
    /// original source hash) and the given selections.
    pub fn with_selections(&self, selections: Vec<Selection>) -> Self {
        let mut referenced_fragments = BTreeSet::new();
        collect_referenced_fragments(&selections, &mut referenced_fragments);
        Self {
            kind: self.kind.clone(),
            name: self.name.clone(),
            type_condition: self.type_condition.clone(),
            variables: self.variables.clone(),
            directives: self.directives.clone(),
            selections,
            referenced_fragments,
            source_hash: self.source_hash.clone(),
            location: self.location.clone(),
        }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.kind, DefinitionKind::Fragment)
    }

    pub fn is_operation(&self) -> bool {
        matches!(self.kind, DefinitionKind::Operation { .. })
    }

    pub fn kind(&self) -> &DefinitionKind {
        &self.kind
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The schema type the top-level selections are made against: the
    /// fragment's (or split operation's) type condition, or the schema's root
    /// type for the operation kind.
    pub fn parent_type<'a>(&'a self, schema: &'a Schema) -> Option<&'a str> {
        match &self.kind {
            DefinitionKind::Operation { operation } =>
                schema.root_type_name(*operation),
            DefinitionKind::Fragment | DefinitionKind::SplitOperation { .. } =>
                self.type_condition.as_deref(),
        }
    }

    /// Names of every fragment spread (or module-imported) anywhere in this
    /// definition.
    pub fn referenced_fragments(&self) -> &BTreeSet<String> {
        &self.referenced_fragments
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Hash of the definition's canonical source form. Insensitive to
    /// formatting and source location.
    pub fn source_hash(&self) -> &ContentHash {
        &self.source_hash
    }

    pub fn type_condition(&self) -> Option<&str> {
        self.type_condition.as_deref()
    }

    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    /// Serialized form with all location metadata stripped. Two definitions
    /// are structurally identical iff their keys are equal.
    pub fn structural_key(&self) -> String {
        crate::ir::structural_key(self)
    }
}
