//! Collection metadata the compiler and planner read from.

mod schema;

pub use schema::{CollectionSchema, DataType, FieldSchema, SchemaHelper};
