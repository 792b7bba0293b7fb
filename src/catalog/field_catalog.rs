use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{catalog::FieldDescriptor, error::CsvResult};

/// Ordered table of field descriptors for one record type.
///
/// The order of the descriptors is the column order. When a record type
/// extends another one, the ancestor's fields must come first; use
/// [`FieldCatalog::derived_from`] to build such a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: Vec<FieldDescriptor>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a catalog for a subtype: the parent's fields are listed first
    /// and the subtype's own fields are appended after them.
    pub fn derived_from(parent: &FieldCatalog) -> Self {
        Self { fields: parent.fields.clone() }
    }

    /// Append a descriptor, builder style.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    pub fn push(&mut self, descriptor: FieldDescriptor) {
        self.fields.push(descriptor);
    }

    /// Parse a catalog from a JSON array of descriptors.
    pub fn from_json(text: &str) -> CsvResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// One plain scalar descriptor per key of an exemplar object, in key
    /// order.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            fields: obj.keys().map(|key| FieldDescriptor::new(key)).collect(),
        }
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Descriptors that take part in the output, in order.
    pub fn active(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| !field.ignore)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDescriptor> for FieldCatalog {
    fn from_iter<T: IntoIterator<Item = FieldDescriptor>>(iter: T) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}
