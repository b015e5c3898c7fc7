use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::console::{input, pause, Console};
use crate::error::GameError;
use crate::game::round::RoundResolver;
use crate::game::GameSession;
use crate::nav::node::{Controller, Outcome, Payload, Token};
use crate::store::Catalog;

/// Usernames are shown in a fixed-width ranking column.
pub const MAX_USERNAME_LEN: usize = 7;

/// Behind the "Play Now" toggle: asks who is playing, runs the game, and
/// always sends the menu walk back to the main menu.
pub struct GameController<R> {
    catalog: Rc<Catalog>,
    resolver: RefCell<R>,
}

impl<R: RoundResolver> GameController<R> {
    pub fn new(catalog: Rc<Catalog>, resolver: R) -> Self {
        Self {
            catalog,
            resolver: RefCell::new(resolver),
        }
    }

    fn ask_username(console: &mut dyn Console) -> std::io::Result<String> {
        input(
            console,
            &format!("Enter a username (maximum {MAX_USERNAME_LEN} characters): "),
            &|value| {
                let len = value.chars().count();
                if len == 0 {
                    Err("A username is required.".into())
                } else if len > MAX_USERNAME_LEN {
                    Err(format!("At most {MAX_USERNAME_LEN} characters, please."))
                } else {
                    Ok(())
                }
            },
        )
    }

    fn start(&self, console: &mut dyn Console) -> Result<()> {
        let username = Self::ask_username(console).context("failed to read username")?;
        info!("Game started by {username}");

        let mut resolver = self.resolver.borrow_mut();
        let mut session = GameSession::new(self.catalog.clone(), &mut *resolver);
        match session.play(&username, console) {
            Ok(runs) => {
                info!("{username} played {} time(s)", runs.len());
                Ok(())
            }
            Err(GameError::MissingContent(what)) => {
                warn!("Game aborted: {what}");
                console.clear()?;
                console.say(&format!(
                    "The game cannot be played right now: {what}.\n\
                     Add the missing content under Setting.\n"
                ))?;
                pause(console)?;
                Ok(())
            }
            Err(e) => Err(e).context("game session failed"),
        }
    }
}

impl<R: RoundResolver> Controller for GameController<R> {
    fn process(&self, outcome: Outcome, console: &mut dyn Console) -> Result<Token> {
        match outcome {
            Outcome::Payload(Payload::Toggle(true)) => self.start(console)?,
            Outcome::Token(Token::Close) => return Ok(Token::Close),
            _ => {}
        }
        Ok(Token::Back)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::console::ScriptedConsole;
    use crate::game::round::RoundResult;
    use crate::model::Level;

    struct AlwaysWrong;

    impl RoundResolver for AlwaysWrong {
        fn start_round(
            &mut self,
            _level: u32,
            _console: &mut dyn Console,
        ) -> Result<RoundResult, GameError> {
            Ok(RoundResult {
                correct: false,
                time: Duration::from_millis(250),
            })
        }
    }

    fn catalog_with_levels() -> Rc<Catalog> {
        let catalog = Catalog::in_memory();
        catalog.levels.add(Level::new(1, 100)).unwrap();
        Rc::new(catalog)
    }

    #[test]
    fn test_declined_start_goes_back() {
        let controller = GameController::new(catalog_with_levels(), AlwaysWrong);
        let mut console = ScriptedConsole::new(&[]);
        let token = controller
            .process(Payload::Toggle(false).into(), &mut console)
            .unwrap();
        assert_eq!(token, Token::Back);
    }

    #[test]
    fn test_play_registers_and_returns_back() {
        let catalog = catalog_with_levels();
        let controller = GameController::new(catalog.clone(), AlwaysWrong);
        // too long, then valid name, then "back to menu" after losing
        let mut console = ScriptedConsole::new(&["abcdefgh", "ada", "n"]);

        let token = controller
            .process(Payload::Toggle(true).into(), &mut console)
            .unwrap();

        assert_eq!(token, Token::Back);
        assert!(console.output.contains("At most 7 characters"));
        let player = catalog.player_by_username("ada").unwrap().unwrap();
        assert_eq!(player.max_level_reached, 1);
    }

    #[test]
    fn test_missing_content_is_shown_not_propagated() {
        let controller = GameController::new(Rc::new(Catalog::in_memory()), AlwaysWrong);
        let mut console = ScriptedConsole::new(&["ada", ""]);

        let token = controller
            .process(Payload::Toggle(true).into(), &mut console)
            .unwrap();

        assert_eq!(token, Token::Back);
        assert!(console.output.contains("no levels are configured"));
    }
}
