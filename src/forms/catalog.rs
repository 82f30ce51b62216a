//! Organizational catalog: directions, their departments, and system roles.
//!
//! DESIGN
//! ======
//! The direction→department table is configuration data, not code. The copy
//! under `config/catalogo.json` is embedded as the built-in default, and the
//! same schema can be loaded from an external path at deploy time.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::path::Path;

use serde::{Deserialize, Serialize};

const CATALOGO_BUILTIN: &str = include_str!("../../config/catalogo.json");

/// Errors produced when loading a catalog from an external source.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A top-level organizational unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direccion {
    pub id: String,
    pub nombre: String,
}

/// A sub-unit belonging to one direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departamento {
    pub id: String,
    pub nombre: String,
    /// Id of the [`Direccion`] this department belongs to.
    pub direccion: String,
}

/// A system role selectable for a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rol {
    pub id: String,
    pub nombre: String,
}

/// The full lookup table the user form filters against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogo {
    pub direcciones: Vec<Direccion>,
    pub departamentos: Vec<Departamento>,
    pub roles: Vec<Rol>,
}

impl Catalogo {
    /// The embedded default catalog.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `config/catalogo.json` is not valid JSON,
    /// which would be a packaging defect caught by tests.
    #[must_use]
    pub fn builtin() -> Self {
        serde_json::from_str(CATALOGO_BUILTIN).expect("embedded catalog is valid JSON")
    }

    /// Load a catalog from an external JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Parse`] if it is not a valid catalog document.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Departments belonging to `direccion_id`, in catalog order.
    #[must_use]
    pub fn departamentos_de(&self, direccion_id: &str) -> Vec<Departamento> {
        self.departamentos
            .iter()
            .filter(|dept| dept.direccion == direccion_id)
            .cloned()
            .collect()
    }

    /// Look up a direction by id.
    #[must_use]
    pub fn direccion(&self, id: &str) -> Option<&Direccion> {
        self.direcciones.iter().find(|d| d.id == id)
    }

    /// Look up a role by id.
    #[must_use]
    pub fn rol(&self, id: &str) -> Option<&Rol> {
        self.roles.iter().find(|r| r.id == id)
    }
}
