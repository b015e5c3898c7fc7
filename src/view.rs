pub mod form;
pub mod menu;
pub mod table;

use anyhow::Result;

use crate::console::{confirm, Console, Toggle};
use crate::nav::node::{Outcome, Payload, View};

pub const BANNER: &str = "\
======================================
$$$$$$$$$$$ Answer and Win $$$$$$$$$$$
======================================";

/// A yes/no screen whose answer goes to the node's controller.
pub struct ToggleView {
    toggle: Toggle,
}

impl ToggleView {
    pub fn new(toggle: Toggle) -> Self {
        Self { toggle }
    }

    /// The screen in front of the game itself.
    pub fn game_start(levels: usize) -> Self {
        Self::new(Toggle::new(
            format!(
                "Welcome to Answer and Win! The game has {levels} rounds of questions,\n\
                 each with a prize that accumulates as you win each round.\n\n\
                 Are you ready?\n"
            ),
            "Start Game",
            "Back to menu",
        ))
    }
}

impl View for ToggleView {
    fn run(&mut self, console: &mut dyn Console) -> Result<Outcome> {
        console.say(BANNER)?;
        let picked = confirm(console, &self.toggle)?;
        Ok(Payload::Toggle(picked).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    #[test]
    fn test_toggle_view_yields_payload() {
        let mut view = ToggleView::game_start(5);
        let mut console = ScriptedConsole::new(&["y"]);
        let outcome = view.run(&mut console).unwrap();
        assert_eq!(outcome, Outcome::Payload(Payload::Toggle(true)));
        assert!(console.output.contains("5 rounds"));
    }
}
