mod collection;
mod field;

pub use collection::{CollectionSchema, SchemaHelper};
pub use field::{DataType, FieldSchema};
