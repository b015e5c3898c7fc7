use anyhow::Result;

use crate::console::{choice, parse_selection, Console};
use crate::nav::node::{Outcome, Payload, Token, View};

/// One table line: the record id it stands for plus its visible cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(id: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// Read only; the user can only leave.
    Browse,
    /// Pick rows to remove.
    Delete,
}

pub struct TableView {
    title: String,
    columns: Vec<String>,
    rows: Vec<TableRow>,
    width: usize,
    mode: TableMode,
}

impl TableView {
    pub fn new(
        title: impl Into<String>,
        columns: &[&str],
        rows: Vec<TableRow>,
        width: usize,
        mode: TableMode,
    ) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            width,
            mode,
        }
    }

    fn line(&self, cells: &[String]) -> String {
        cells
            .iter()
            .map(|cell| format!("{cell:<width$}", width = self.width))
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn render(&self, console: &mut dyn Console) -> std::io::Result<()> {
        if self.rows.is_empty() {
            console.say("Sorry, no records found.\n")?;
            return Ok(());
        }
        let rule = "-".repeat(self.width * self.columns.len() + 5);
        console.say(&self.title)?;
        console.say(&rule)?;
        console.say(&format!("     {}", self.line(&self.columns)))?;
        console.say(&rule)?;
        for (i, row) in self.rows.iter().enumerate() {
            console.say(&format!("{:>3}. {}", i + 1, self.line(&row.cells)))?;
        }
        console.say(&rule)
    }
}

impl View for TableView {
    fn run(&mut self, console: &mut dyn Console) -> Result<Outcome> {
        self.render(console)?;

        if self.mode == TableMode::Browse || self.rows.is_empty() {
            console.say("  0. Back    00. Close")?;
            let picked = choice(console, &["0", "00"], "  Enter 0 to go back or 00 to close.")?;
            let token = if picked == "0" { Token::Back } else { Token::Close };
            return Ok(token.into());
        }

        console.say("  Enter the rows to delete (e.g. 1,3), 0 to go back or 00 to close.")?;
        loop {
            console.write("> ")?;
            let raw = console.read_line()?;
            match raw.trim() {
                "0" => return Ok(Token::Back.into()),
                "00" => return Ok(Token::Close.into()),
                picked => match parse_selection(picked, self.rows.len()) {
                    Some(indexes) => {
                        let ids = indexes.into_iter().map(|i| self.rows[i].id.clone()).collect();
                        return Ok(Payload::Delete(ids).into());
                    }
                    None => console.say(&format!(
                        "  Row numbers go from 1 to {}.",
                        self.rows.len()
                    ))?,
                },
            }
        }
    }
}
