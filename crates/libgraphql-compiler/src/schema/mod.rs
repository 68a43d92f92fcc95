mod schema;
mod schema_build_error;
mod schema_type;

pub use schema::Schema;
pub use schema_build_error::SchemaBuildError;
pub use schema_type::SchemaType;
pub use schema_type::SchemaTypeKind;
