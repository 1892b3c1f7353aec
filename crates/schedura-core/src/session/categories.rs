use super::Session;
use crate::error::{CoreError, EntityKind, Result, ValidationError};
use crate::model::{Category, CategoryDomain};

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub domain: Option<CategoryDomain>,
}

/// `#RRGGBB`.
fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Session {
    fn category_index(&self, id: &str) -> Result<usize> {
        self.document
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Category, id))
    }

    fn validate_category(&self, category: &Category) -> Result<()> {
        if category.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name".to_string()).into());
        }
        if !is_hex_color(&category.color) {
            return Err(ValidationError::InvalidValue {
                field: "color".to_string(),
                message: format!("'{}' is not a #RRGGBB color", category.color),
            }
            .into());
        }
        let taken = self
            .document
            .categories
            .iter()
            .any(|c| c.id != category.id && c.name.eq_ignore_ascii_case(category.name.trim()));
        if taken {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: format!("a category named '{}' already exists", category.name),
            }
            .into());
        }
        Ok(())
    }

    pub fn add_category(&mut self, category: Category) -> Result<Category> {
        self.validate_category(&category)?;
        self.document.categories.push(category.clone());
        self.persist("add_category")?;
        Ok(category)
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> Result<Category> {
        let index = self.category_index(id)?;
        let mut category = self.document.categories[index].clone();
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }
        if let Some(domain) = patch.domain {
            category.domain = domain;
        }
        self.validate_category(&category)?;
        self.document.categories[index] = category.clone();
        self.persist("update_category")?;
        Ok(category)
    }

    /// Remove an unused category.
    ///
    /// Fails with [`CoreError::ReferentialIntegrity`] while any task, goal,
    /// habit or event still points at it.
    pub fn delete_category(&mut self, id: &str) -> Result<Category> {
        let index = self.category_index(id)?;
        let usage = self.document.category_usage(id);
        if !usage.is_unused() {
            return Err(CoreError::ReferentialIntegrity {
                category_id: id.to_string(),
                tasks: usage.tasks,
                goals: usage.goals,
                habits: usage.habits,
                events: usage.events,
            });
        }
        let category = self.document.categories.remove(index);
        self.persist("delete_category")?;
        Ok(category)
    }
}
