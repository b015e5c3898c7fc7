use std::rc::Rc;

use anyhow::Result;
use log::warn;

use crate::console::Console;
use crate::controller::report;
use crate::error::StoreError;
use crate::model::Category;
use crate::nav::node::{Controller, NewRecord, Outcome, Payload, Token};
use crate::store::Catalog;
use crate::view::table::TableRow;

pub struct CategoryController {
    catalog: Rc<Catalog>,
}

impl CategoryController {
    pub fn new(catalog: Rc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Add a category played at the level with id `level`.
    pub fn add(&self, name: &str, level: &str) -> Result<Category, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid {
                kind: "category",
                reason: "name must not be empty".into(),
            });
        }
        if self.catalog.levels.get(level)?.is_none() {
            return Err(StoreError::Invalid {
                kind: "category",
                reason: format!("level {level} does not exist"),
            });
        }
        let category = Category::new(name, level);
        self.catalog.categories.add(category.clone())?;
        Ok(category)
    }

    pub fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.catalog.categories.delete_many(ids)
    }

    /// Categories sorted by level then name, as `name | level` rows.
    pub fn table_rows(&self) -> Result<Vec<TableRow>, StoreError> {
        let levels = self.catalog.levels.list()?;
        let mut rows: Vec<(u32, Category)> = self
            .catalog
            .categories
            .list()?
            .into_iter()
            .map(|c| {
                let value = levels
                    .iter()
                    .find(|l| l.id == c.level)
                    .map(|l| l.value)
                    .unwrap_or(0);
                (value, c)
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));
        Ok(rows
            .into_iter()
            .map(|(value, c)| {
                let level = if value == 0 {
                    "?".to_string()
                } else {
                    value.to_string()
                };
                TableRow::new(c.id, vec![c.name, level])
            })
            .collect())
    }
}

impl Controller for CategoryController {
    fn process(&self, outcome: Outcome, console: &mut dyn Console) -> Result<Token> {
        match outcome {
            Outcome::Token(token) => return Ok(token),
            Outcome::Payload(Payload::Add(NewRecord::Category { name, level })) => {
                let result = self.add(&name, &level).map(|c| format!("category '{}'", c.name));
                report(console, "add category", result)?;
            }
            Outcome::Payload(Payload::Delete(ids)) => {
                let result = self.delete(&ids).map(|n| format!("{n} categories removed"));
                report(console, "delete categories", result)?;
            }
            Outcome::Payload(other) => warn!("Category controller ignored {other:?}"),
        }
        Ok(Token::Back)
    }
}
