//! Declared-type storage.
//!
//! [`TypeStore`] is the seam to whatever owns the program's types (normally
//! the host disassembler's database). [`TypeDatabase`] is a self-contained
//! implementation that persists to JSON.

use crate::types::StructType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use swiftida_core::EntityId;
use thiserror::Error;
use tracing::info;

/// The operations an edit needs from the program database.
pub trait TypeStore {
    /// The declared type string of `entity`, if it has one.
    fn get_declared_type(&self, entity: EntityId) -> Option<String>;

    /// Replace the declared type. Returns `false` if the store rejected it,
    /// in which case the previous type is unchanged.
    fn set_declared_type(&mut self, entity: EntityId, ty: &str) -> bool;

    /// Create a struct of `words` 8-byte fields unless `name` already exists.
    fn create_tuple_struct(&mut self, name: &str, words: usize);
}

/// Errors loading or saving a [`TypeDatabase`].
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid type database: {0}")]
    Json(#[from] serde_json::Error),
}

/// A database of declared function types and named structs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDatabase {
    /// Declared type string per entity.
    #[serde(default)]
    declared: BTreeMap<EntityId, String>,

    /// Named struct types.
    #[serde(default)]
    structs: BTreeMap<String, StructType>,
}

impl TypeDatabase {
    /// Create a new empty type database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DatabaseError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the database as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), DatabaseError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    // ==================== Declared Types ====================

    /// Declare (or redeclare) the type of an entity.
    pub fn declare(&mut self, entity: EntityId, ty: impl Into<String>) {
        self.declared.insert(entity, ty.into());
    }

    pub fn declared_type(&self, entity: EntityId) -> Option<&str> {
        self.declared.get(&entity).map(String::as_str)
    }

    /// All entities with a declared type, in address order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &str)> {
        self.declared.iter().map(|(id, ty)| (*id, ty.as_str()))
    }

    // ==================== Structs ====================

    pub fn add_struct(&mut self, st: StructType) {
        self.structs.insert(st.name.clone(), st);
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructType> {
        self.structs.get(name)
    }

    pub fn has_struct(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    /// Get all struct names.
    pub fn struct_names(&self) -> impl Iterator<Item = &str> {
        self.structs.keys().map(|s| s.as_str())
    }
}

impl TypeStore for TypeDatabase {
    fn get_declared_type(&self, entity: EntityId) -> Option<String> {
        self.declared.get(&entity).cloned()
    }

    /// Only entities that already have a declared type can be retyped.
    fn set_declared_type(&mut self, entity: EntityId, ty: &str) -> bool {
        match self.declared.get_mut(&entity) {
            Some(slot) => {
                *slot = ty.to_string();
                true
            }
            None => false,
        }
    }

    fn create_tuple_struct(&mut self, name: &str, words: usize) {
        if self.has_struct(name) {
            return;
        }
        self.add_struct(StructType::tuple(name, words));
        info!("Created struct {}", name);
    }
}
