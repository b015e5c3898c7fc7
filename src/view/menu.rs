use anyhow::Result;

use crate::console::{choice, Console};
use crate::nav::node::{Outcome, Token, View};
use crate::view::BANNER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// Top level: no way back, only close.
    Main,
    Sub,
}

/// Numbered menu. Choice `n` yields key `"n"`, `0` goes back (submenus
/// only) and `00` asks to close.
pub struct MenuView {
    kind: MenuKind,
    message: String,
    choices: Vec<String>,
}

impl MenuView {
    pub fn new(kind: MenuKind, message: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            kind,
            message: message.into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn render(&self, console: &mut dyn Console) -> std::io::Result<()> {
        console.say(BANNER)?;
        console.say(&self.message)?;
        for (i, label) in self.choices.iter().enumerate() {
            console.say(&format!("  {}. {label}", i + 1))?;
        }
        console.say("---------------------------------")?;
        if self.kind == MenuKind::Sub {
            console.say("  0. Back")?;
        }
        console.say("  00. Close")
    }
}

impl View for MenuView {
    fn run(&mut self, console: &mut dyn Console) -> Result<Outcome> {
        self.render(console)?;

        let mut valid: Vec<String> = (1..=self.choices.len()).map(|n| n.to_string()).collect();
        if self.kind == MenuKind::Sub {
            valid.push("0".into());
        }
        valid.push("00".into());
        let valid: Vec<&str> = valid.iter().map(String::as_str).collect();

        let picked = choice(console, &valid, "  Pick one of the listed numbers.")?;
        let token = match picked.as_str() {
            "0" => Token::Back,
            "00" => Token::Close,
            key => Token::key(key),
        };
        Ok(token.into())
    }
}
