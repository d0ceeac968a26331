//! Inventory file parser.
//!
//! An inventory is a TOML document with `[[nodes]]` and `[[components]]`
//! tables. It is a thin serde layer over the core types; validation covers
//! name uniqueness (resource figures are checked on deserialization).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Component, NodeDefinition};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Inventory {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate an inventory.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let inventory: Inventory = toml::from_str(content)?;
        inventory.validate()?;
        Ok(inventory)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that node and component names are unique.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(CoreError::DuplicateNode(node.name.clone()));
            }
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(component.name.as_str()) {
                return Err(CoreError::DuplicateComponent(component.name.clone()));
            }
        }
        Ok(())
    }

    pub fn node(&self, name: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}
