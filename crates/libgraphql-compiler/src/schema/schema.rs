use crate::content_hash::ContentHash;
use crate::file_reader;
use crate::ir::OperationKind;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaType;
use crate::schema::SchemaTypeKind;
use graphql_parser::schema as ast;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::path::Path;

type Result<T> = std::result::Result<T, Vec<SchemaBuildError>>;

const BUILTIN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

/// A lightweight type table built from one or more SDL documents.
///
/// Only type names, field types, interfaces and union membership are
/// retained; directive definitions and argument types are not needed by the
/// compiler's transforms.
#[derive(Clone, Debug)]
pub struct Schema {
    types: IndexMap<String, SchemaType>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    source_hash: ContentHash,
}
impl Schema {
    /// A schema with only the built-in scalars and no root types.
    pub fn empty() -> Self {
        let mut types = IndexMap::new();
        for scalar in BUILTIN_SCALARS {
            types.insert(scalar.to_string(), SchemaType::new(scalar, SchemaTypeKind::Scalar));
        }
        Self {
            types,
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            source_hash: ContentHash::default(),
        }
    }

    pub fn from_str(content: impl AsRef<str>, file_path: Option<&Path>) -> Result<Self> {
        Self::from_sources([(file_path, content.as_ref())])
    }

    pub fn from_files<P: AsRef<Path>>(file_paths: &[P]) -> Result<Self> {
        let mut contents = vec![];
        let mut errors = vec![];
        for file_path in file_paths {
            match file_reader::read_content(file_path) {
                Ok(content) => contents.push((file_path.as_ref(), content)),
                Err(err) => errors.push(err.into()),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Self::from_sources(
            contents.iter().map(|(path, content)| (Some(*path), content.as_str())),
        )
    }

    /// Builds a schema from several SDL documents. Type extensions may refer
    /// to types defined in any of the documents.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (Option<&'a Path>, &'a str)>,
    ) -> Result<Self> {
        let mut errors = vec![];
        let mut documents = vec![];
        let mut hashed_content = String::new();
        for (file_path, content) in sources {
            hashed_content.push_str(content);
            hashed_content.push('\0');
            match graphql_parser::parse_schema::<String>(content) {
                Ok(doc) => documents.push((file_path, doc.into_static())),
                Err(err) => errors.push(SchemaBuildError::ParseError {
                    file_path: file_path.map(Path::to_path_buf),
                    message: err.to_string(),
                }),
            }
        }

        let mut schema = Self::empty();
        schema.source_hash = ContentHash::of(hashed_content);
        let mut explicit_roots = None;

        for (file_path, doc) in &documents {
            for def in &doc.definitions {
                match def {
                    ast::Definition::SchemaDefinition(schema_def) => {
                        explicit_roots = Some((
                            schema_def.query.clone(),
                            schema_def.mutation.clone(),
                            schema_def.subscription.clone(),
                        ));
                    },
                    ast::Definition::TypeDefinition(type_def) => {
                        let schema_type = schema_type_from_ast(type_def);
                        if schema.types.contains_key(schema_type.name()) {
                            errors.push(SchemaBuildError::DuplicateTypeDefinition {
                                file_path: file_path.map(Path::to_path_buf),
                                type_name: schema_type.name.clone(),
                            });
                            continue;
                        }
                        schema.types.insert(schema_type.name.clone(), schema_type);
                    },
                    ast::Definition::TypeExtension(_)
                    | ast::Definition::DirectiveDefinition(_) => (),
                }
            }
        }

        // Extensions are applied once every document's definitions are known
        // so that an extension may precede its type's definition.
        for (file_path, doc) in &documents {
            for def in &doc.definitions {
                if let ast::Definition::TypeExtension(ext) = def
                    && let Err(err) = schema.apply_extension(ext, *file_path) {
                    errors.push(err);
                }
            }
        }

        let (query, mutation, subscription) = explicit_roots.unwrap_or_else(|| (
            schema.types.contains_key("Query").then(|| "Query".to_string()),
            schema.types.contains_key("Mutation").then(|| "Mutation".to_string()),
            schema.types.contains_key("Subscription").then(|| "Subscription".to_string()),
        ));
        for root in [&query, &mutation, &subscription].into_iter().flatten() {
            if !schema.types.contains_key(root) {
                errors.push(SchemaBuildError::UndefinedRootOperationType {
                    type_name: root.clone(),
                });
            }
        }
        schema.query_type = query;
        schema.mutation_type = mutation;
        schema.subscription_type = subscription;

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(schema)
    }

    fn apply_extension(
        &mut self,
        ext: &ast::TypeExtension<'static, String>,
        file_path: Option<&Path>,
    ) -> std::result::Result<(), SchemaBuildError> {
        let (name, fields, interfaces, members) = match ext {
            ast::TypeExtension::Object(obj) =>
                (&obj.name, obj.fields.as_slice(), obj.implements_interfaces.as_slice(), &[][..]),
            ast::TypeExtension::Interface(iface) =>
                (&iface.name, iface.fields.as_slice(), &[][..], &[][..]),
            ast::TypeExtension::Union(union) =>
                (&union.name, &[][..], &[][..], union.types.as_slice()),
            ast::TypeExtension::Enum(e) => (&e.name, &[][..], &[][..], &[][..]),
            ast::TypeExtension::InputObject(input) => (&input.name, &[][..], &[][..], &[][..]),
            ast::TypeExtension::Scalar(scalar) => (&scalar.name, &[][..], &[][..], &[][..]),
        };
        let Some(schema_type) = self.types.get_mut(name) else {
            return Err(SchemaBuildError::ExtensionOfUndefinedType {
                file_path: file_path.map(Path::to_path_buf),
                type_name: name.clone(),
            });
        };
        for field in fields {
            schema_type.fields.insert(field.name.clone(), named_type(&field.field_type).to_string());
        }
        schema_type.interfaces.extend(interfaces.iter().cloned());
        schema_type.union_members.extend(members.iter().cloned());
        Ok(())
    }

    /// Named type of `parent_type.field_name`. `__typename` resolves to
    /// `String` on every composite type.
    pub fn field_type(&self, parent_type: &str, field_name: &str) -> Option<&str> {
        let parent = self.types.get(parent_type)?;
        if field_name == "__typename" && parent.is_composite() {
            return Some("String");
        }
        parent.field_type(field_name)
    }

    pub fn get_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    pub fn is_composite(&self, type_name: &str) -> bool {
        self.types.get(type_name).is_some_and(SchemaType::is_composite)
    }

    pub fn root_type_name(&self, operation: OperationKind) -> Option<&str> {
        match operation {
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    /// Hash of the SDL text this schema was built from.
    pub fn source_hash(&self) -> &ContentHash {
        &self.source_hash
    }

    pub fn types(&self) -> &IndexMap<String, SchemaType> {
        &self.types
    }

    /// Names of types that were added, removed or altered between `self` and
    /// `other`. Root-type reassignments mark the affected root types changed.
    pub fn changed_types(&self, other: &Schema) -> BTreeSet<String> {
        let mut changed = BTreeSet::new();
        for (name, schema_type) in &self.types {
            if other.types.get(name) != Some(schema_type) {
                changed.insert(name.clone());
            }
        }
        for name in other.types.keys() {
            if !self.types.contains_key(name) {
                changed.insert(name.clone());
            }
        }
        for (mine, theirs) in [
            (&self.query_type, &other.query_type),
            (&self.mutation_type, &other.mutation_type),
            (&self.subscription_type, &other.subscription_type),
        ] {
            if mine != theirs {
                changed.extend(mine.iter().cloned());
                changed.extend(theirs.iter().cloned());
            }
        }
        changed
    }
}

fn schema_type_from_ast(type_def: &ast::TypeDefinition<'static, String>) -> SchemaType {
    match type_def {
        ast::TypeDefinition::Enum(e) =>
            SchemaType::new(e.name.as_str(), SchemaTypeKind::Enum),
        ast::TypeDefinition::InputObject(input) => {
            let mut schema_type = SchemaType::new(input.name.as_str(), SchemaTypeKind::InputObject);
            for field in &input.fields {
                schema_type.fields.insert(field.name.clone(), named_type(&field.value_type).to_string());
            }
            schema_type
        },
        ast::TypeDefinition::Interface(iface) => {
            let mut schema_type = SchemaType::new(iface.name.as_str(), SchemaTypeKind::Interface);
            for field in &iface.fields {
                schema_type.fields.insert(field.name.clone(), named_type(&field.field_type).to_string());
            }
            schema_type
        },
        ast::TypeDefinition::Object(obj) => {
            let mut schema_type = SchemaType::new(obj.name.as_str(), SchemaTypeKind::Object);
            for field in &obj.fields {
                schema_type.fields.insert(field.name.clone(), named_type(&field.field_type).to_string());
            }
            schema_type.interfaces.extend(obj.implements_interfaces.iter().cloned());
            schema_type
        },
        ast::TypeDefinition::Scalar(scalar) =>
            SchemaType::new(scalar.name.as_str(), SchemaTypeKind::Scalar),
        ast::TypeDefinition::Union(union) => {
            let mut schema_type = SchemaType::new(union.name.as_str(), SchemaTypeKind::Union);
            schema_type.union_members.extend(union.types.iter().cloned());
            schema_type
        },
    }
}

fn named_type<'a>(ast_type: &'a ast::Type<'static, String>) -> &'a str {
    match ast_type {
        ast::Type::NamedType(name) => name.as_str(),
        ast::Type::ListType(inner) | ast::Type::NonNullType(inner) => named_type(inner),
    }
}
