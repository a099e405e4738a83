//! Category definitions and their institution pools

use thiserror::Error;

use crate::config::CategoryConfig;

/// Lookup errors against the configured categories
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("institution {institution} is not in the {category} pool")]
    UnknownInstitution {
        category: String,
        institution: String,
    },
}

/// A trading category
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub label: String,
    pub entry_label: String,
    pub has_symbol: bool,
    /// Institutions in display order
    pub institutions: Vec<String>,
}

impl Category {
    /// Whether the institution belongs to this category's pool
    pub fn has_institution(&self, institution: &str) -> bool {
        self.institutions.iter().any(|i| i == institution)
    }

    /// Position of an institution in display order
    pub fn institution_index(&self, institution: &str) -> Option<usize> {
        self.institutions.iter().position(|i| i == institution)
    }
}

impl From<&CategoryConfig> for Category {
    fn from(config: &CategoryConfig) -> Self {
        Self {
            name: config.name.clone(),
            label: config.label.clone().unwrap_or_else(|| config.name.clone()),
            entry_label: config.entry_label.clone(),
            has_symbol: config.has_symbol,
            institutions: config.institutions.clone(),
        }
    }
}

/// Ordered set of categories, fixed for the lifetime of the process
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPool {
    categories: Vec<Category>,
}

impl CategoryPool {
    /// Build the pool from configuration, keeping file order
    pub fn from_config(categories: &[CategoryConfig]) -> Self {
        Self {
            categories: categories.iter().map(Category::from).collect(),
        }
    }

    /// Look up a category by name
    pub fn get(&self, name: &str) -> Result<&Category, PoolError> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PoolError::UnknownCategory(name.to_string()))
    }

    /// Category names in configured order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// First configured category, the initial selection of a session
    pub fn first(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
