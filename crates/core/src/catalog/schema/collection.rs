use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::schema::field::FieldSchema;
use crate::err::Error;

/// The definition of a collection and its fields.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSchema {
	pub name: String,
	pub fields: Vec<FieldSchema>,
	/// Whether names which match no field resolve into the dynamic field.
	pub enable_dynamic_field: bool,
}

impl CollectionSchema {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn with_field(mut self, field: FieldSchema) -> Self {
		self.fields.push(field);
		self
	}

	pub fn with_dynamic_field(mut self, enabled: bool) -> Self {
		self.enable_dynamic_field = enabled;
		self
	}
}

/// A read-only, indexed view over a [`CollectionSchema`].
///
/// This is the schema handle the compiler and planner work against. The
/// collection name identifies the schema inside the expression cache, so a
/// handle is assumed to describe the same fields for as long as compiled
/// expressions for its collection remain cached.
#[derive(Clone, Debug)]
pub struct SchemaHelper {
	schema: CollectionSchema,
	by_name: HashMap<String, usize>,
	by_id: HashMap<i64, usize>,
	primary_key: Option<usize>,
	partition_key: Option<usize>,
	dynamic_field: Option<usize>,
	loaded_fields: Option<HashSet<i64>>,
}

impl SchemaHelper {
	pub fn new(schema: CollectionSchema) -> Result<Self, Error> {
		let mut by_name = HashMap::with_capacity(schema.fields.len());
		let mut by_id = HashMap::with_capacity(schema.fields.len());
		let mut primary_key: Option<usize> = None;
		let mut partition_key = None;
		let mut dynamic_field = None;
		for (idx, field) in schema.fields.iter().enumerate() {
			if by_name.insert(field.name.clone(), idx).is_some() {
				return Err(Error::DuplicateFieldName {
					name: field.name.clone(),
				});
			}
			if by_id.insert(field.field_id, idx).is_some() {
				return Err(Error::DuplicateFieldId {
					id: field.field_id,
				});
			}
			if field.is_primary_key {
				if let Some(first) = primary_key {
					return Err(Error::MultiplePrimaryKeys {
						first: schema.fields[first].name.clone(),
						second: field.name.clone(),
					});
				}
				primary_key = Some(idx);
			}
			if field.is_partition_key {
				partition_key = Some(idx);
			}
			if field.is_dynamic {
				dynamic_field = Some(idx);
			}
		}
		Ok(Self {
			schema,
			by_name,
			by_id,
			primary_key,
			partition_key,
			dynamic_field,
			loaded_fields: None,
		})
	}

	/// Restrict the resident fields to the given ids.
	///
	/// Without a restriction every field counts as loaded.
	pub fn with_loaded_fields(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
		self.loaded_fields = Some(ids.into_iter().collect());
		self
	}

	pub fn schema(&self) -> &CollectionSchema {
		&self.schema
	}

	pub fn collection_name(&self) -> &str {
		&self.schema.name
	}

	pub fn field_by_name(&self, name: &str) -> Result<&FieldSchema, Error> {
		self.by_name.get(name).map(|idx| &self.schema.fields[*idx]).ok_or_else(|| {
			Error::FieldNotFound {
				name: name.to_owned(),
			}
		})
	}

	pub fn field_by_id(&self, id: i64) -> Option<&FieldSchema> {
		self.by_id.get(&id).map(|idx| &self.schema.fields[*idx])
	}

	pub fn primary_key_field(&self) -> Result<&FieldSchema, Error> {
		self.primary_key.map(|idx| &self.schema.fields[idx]).ok_or_else(|| {
			Error::PrimaryKeyNotFound {
				collection: self.schema.name.clone(),
			}
		})
	}

	pub fn partition_key_field(&self) -> Option<&FieldSchema> {
		self.partition_key.map(|idx| &self.schema.fields[idx])
	}

	/// The field holding dynamic values, if the collection has dynamic fields enabled.
	pub fn dynamic_field(&self) -> Option<&FieldSchema> {
		if !self.schema.enable_dynamic_field {
			return None;
		}
		self.dynamic_field.map(|idx| &self.schema.fields[idx])
	}

	pub fn is_field_loaded(&self, field_id: i64) -> bool {
		match &self.loaded_fields {
			Some(loaded) => loaded.contains(&field_id),
			None => true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::DataType;
	use crate::err::ErrorKind;

	fn schema() -> CollectionSchema {
		CollectionSchema::new("books")
			.with_field(FieldSchema::new(100, "id", DataType::Int64).with_primary_key(true))
			.with_field(FieldSchema::new(101, "title", DataType::VarChar).with_partition_key())
			.with_field(FieldSchema::new(102, "embedding", DataType::FloatVector))
			.with_field(FieldSchema::new(103, "$meta", DataType::Json).with_dynamic())
			.with_dynamic_field(true)
	}

	#[test]
	fn lookups() {
		let helper = SchemaHelper::new(schema()).unwrap();
		assert_eq!(helper.collection_name(), "books");
		assert_eq!(helper.field_by_name("title").unwrap().field_id, 101);
		assert_eq!(helper.field_by_id(102).unwrap().name, "embedding");
		assert_eq!(helper.primary_key_field().unwrap().name, "id");
		assert_eq!(helper.partition_key_field().unwrap().name, "title");
		assert_eq!(helper.dynamic_field().unwrap().field_id, 103);
		let err = helper.field_by_name("missing").unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Schema);
	}

	#[test]
	fn residency_defaults_to_everything() {
		let helper = SchemaHelper::new(schema()).unwrap();
		assert!(helper.is_field_loaded(102));
		let helper = helper.with_loaded_fields([100, 101]);
		assert!(helper.is_field_loaded(100));
		assert!(!helper.is_field_loaded(102));
	}

	#[test]
	fn dynamic_field_requires_the_collection_flag() {
		let helper = SchemaHelper::new(schema().with_dynamic_field(false)).unwrap();
		assert!(helper.dynamic_field().is_none());
	}

	#[test]
	fn rejects_inconsistent_schemas() {
		let dup = schema().with_field(FieldSchema::new(200, "title", DataType::Int64));
		assert!(matches!(SchemaHelper::new(dup), Err(Error::DuplicateFieldName { .. })));

		let dup = schema().with_field(FieldSchema::new(100, "other", DataType::Int64));
		assert!(matches!(SchemaHelper::new(dup), Err(Error::DuplicateFieldId { id: 100 })));

		let pk = schema().with_field(FieldSchema::new(201, "pk2", DataType::Int64).with_primary_key(false));
		assert!(matches!(SchemaHelper::new(pk), Err(Error::MultiplePrimaryKeys { .. })));
	}
}
