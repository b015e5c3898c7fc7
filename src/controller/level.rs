use std::rc::Rc;

use anyhow::Result;
use log::warn;

use crate::console::Console;
use crate::controller::report;
use crate::error::StoreError;
use crate::model::Level;
use crate::nav::node::{Controller, NewRecord, Outcome, Payload, Token};
use crate::store::Catalog;
use crate::view::table::TableRow;

pub struct LevelController {
    catalog: Rc<Catalog>,
}

impl LevelController {
    pub fn new(catalog: Rc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Add a level. Level values are unique and start at 1.
    pub fn add(&self, value: u32, prize: u64) -> Result<Level, StoreError> {
        if value == 0 {
            return Err(StoreError::Invalid {
                kind: "level",
                reason: "levels start at 1".into(),
            });
        }
        if self.catalog.level_by_value(value)?.is_some() {
            return Err(StoreError::Invalid {
                kind: "level",
                reason: format!("level {value} already exists"),
            });
        }
        let level = Level::new(value, prize);
        self.catalog.levels.add(level.clone())?;
        Ok(level)
    }

    pub fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.catalog.levels.delete_many(ids)
    }

    pub fn table_rows(&self) -> Result<Vec<TableRow>, StoreError> {
        Ok(self
            .catalog
            .ladder()?
            .into_iter()
            .map(|l| TableRow::new(l.id, vec![l.value.to_string(), format!("${}", l.prize)]))
            .collect())
    }
}

impl Controller for LevelController {
    fn process(&self, outcome: Outcome, console: &mut dyn Console) -> Result<Token> {
        match outcome {
            Outcome::Token(token) => return Ok(token),
            Outcome::Payload(Payload::Add(NewRecord::Level { value, prize })) => {
                let result = self.add(value, prize).map(|l| format!("level {}", l.value));
                report(console, "add level", result)?;
            }
            Outcome::Payload(Payload::Delete(ids)) => {
                let result = self.delete(&ids).map(|n| format!("{n} levels removed"));
                report(console, "delete levels", result)?;
            }
            Outcome::Payload(other) => warn!("Level controller ignored {other:?}"),
        }
        Ok(Token::Back)
    }
}
