use indexmap::IndexMap;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaTypeKind {
    Enum,
    InputObject,
    Interface,
    Object,
    Scalar,
    Union,
}

/// The subset of a schema type definition the compiler needs: its kind, the
/// named type of each of its fields, and (for unions) its members.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaType {
    pub(super) name: String,
    pub(super) kind: SchemaTypeKind,
    /// Field name -> named type of the field (list and non-null wrappers
    /// removed).
    pub(super) fields: IndexMap<String, String>,
    pub(super) interfaces: BTreeSet<String>,
    pub(super) union_members: BTreeSet<String>,
}
impl SchemaType {
    pub(super) fn new(name: impl Into<String>, kind: SchemaTypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: IndexMap::new(),
            interfaces: BTreeSet::new(),
            union_members: BTreeSet::new(),
        }
    }

    pub fn field_type(&self, field_name: &str) -> Option<&str> {
        self.fields.get(field_name).map(String::as_str)
    }

    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    pub fn interfaces(&self) -> &BTreeSet<String> {
        &self.interfaces
    }

    /// Object, interface and union types accept sub-selections.
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            SchemaTypeKind::Interface | SchemaTypeKind::Object | SchemaTypeKind::Union,
        )
    }

    pub fn kind(&self) -> SchemaTypeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn union_members(&self) -> &BTreeSet<String> {
        &self.union_members
    }
}
