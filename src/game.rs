pub mod random;
pub mod round;

use std::rc::Rc;
use std::time::Duration;

use log::info;

use crate::console::{confirm, Console, Toggle};
use crate::controller::player::PlayerController;
use crate::error::GameError;
use crate::model::Level;
use crate::store::Catalog;
use round::RoundResolver;

// ---------------------------------------------------------------------------
// Ladder
// ---------------------------------------------------------------------------

/// The configured levels, ordered by difficulty.
#[derive(Debug, Clone)]
pub struct Ladder {
    levels: Vec<Level>,
}

impl Ladder {
    pub fn load(catalog: &Catalog) -> Result<Self, GameError> {
        let levels = catalog.ladder()?;
        if levels.is_empty() {
            return Err(GameError::MissingContent("no levels are configured".into()));
        }
        Ok(Self { levels })
    }

    pub fn prize(&self, level: u32) -> Result<u64, GameError> {
        self.levels
            .iter()
            .find(|l| l.value == level)
            .map(|l| l.prize)
            .ok_or_else(|| GameError::MissingContent(format!("level {level} does not exist")))
    }

    /// Value of the hardest level; clearing it wins the game.
    pub fn top(&self) -> u32 {
        self.levels.last().map(|l| l.value).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// State of one play-through. Starts at level 1 with nothing won.
#[derive(Debug, Clone)]
struct SessionState {
    level: u32,
    accumulated: u64,
    elapsed: Duration,
    /// `accumulated` after each round, in order.
    rewards: Vec<u64>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            level: 1,
            accumulated: 0,
            elapsed: Duration::ZERO,
            rewards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Every level of the ladder answered correctly.
    Won,
    /// A wrong answer.
    Lost,
    /// The player took the accumulated prize and left.
    Quit,
}

/// Summary of one finished play-through.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayThrough {
    pub ending: Ending,
    /// Level registered for the player.
    pub level: u32,
    pub accumulated: u64,
    pub elapsed: Duration,
    pub rewards: Vec<u64>,
    /// The player asked to play again right away.
    pub restart: bool,
}

// ---------------------------------------------------------------------------
// Game session
// ---------------------------------------------------------------------------

/// Runs the question ladder for one player until they go back to the menu.
pub struct GameSession<R> {
    catalog: Rc<Catalog>,
    players: PlayerController,
    resolver: R,
}

impl<R: RoundResolver> GameSession<R> {
    pub fn new(catalog: Rc<Catalog>, resolver: R) -> Self {
        Self {
            players: PlayerController::new(catalog.clone()),
            catalog,
            resolver,
        }
    }

    /// Play until the player stops asking for another go. Each "play again"
    /// starts a fresh play-through from level 1.
    pub fn play(
        &mut self,
        player: &str,
        console: &mut dyn Console,
    ) -> Result<Vec<PlayThrough>, GameError> {
        let mut finished = Vec::new();
        loop {
            let ladder = Ladder::load(&self.catalog)?;
            info!("{player} starts a play-through ({} levels)", ladder.len());
            let report = self.play_through(player, &ladder, console)?;
            info!(
                "{player} finished: {:?} at level {} with ${} in {:?}",
                report.ending, report.level, report.accumulated, report.elapsed
            );
            let restart = report.restart;
            finished.push(report);
            if !restart {
                return Ok(finished);
            }
        }
    }

    fn play_through(
        &mut self,
        player: &str,
        ladder: &Ladder,
        console: &mut dyn Console,
    ) -> Result<PlayThrough, GameError> {
        let mut state = SessionState::new();

        loop {
            console.clear()?;
            let round = self.resolver.start_round(state.level, console)?;
            state.elapsed += round.time;
            console.clear()?;

            if !round.correct {
                state.rewards.push(state.accumulated);
                let again = confirm(console, &lost_prompt(state.level))?;
                self.players.register(player, state.level, state.elapsed)?;
                return Ok(finish(state, Ending::Lost, again));
            }

            state.accumulated = state
                .accumulated
                .saturating_add(ladder.prize(state.level)?);
            state.rewards.push(state.accumulated);

            if state.level >= ladder.top() {
                let again = confirm(console, &won_prompt(state.accumulated))?;
                self.players.register(player, state.level, state.elapsed)?;
                return Ok(finish(state, Ending::Won, again));
            }

            if !confirm(console, &continue_prompt(state.accumulated))? {
                self.players.register(player, state.level, state.elapsed)?;
                return Ok(finish(state, Ending::Quit, false));
            }
            // below the top rung, so there is always a next level
            state.level += 1;
        }
    }
}

fn finish(state: SessionState, ending: Ending, restart: bool) -> PlayThrough {
    PlayThrough {
        ending,
        level: state.level,
        accumulated: state.accumulated,
        elapsed: state.elapsed,
        rewards: state.rewards,
        restart,
    }
}

fn won_prompt(accumulated: u64) -> Toggle {
    Toggle::new(
        format!(
            "Congratulations! You answered every question correctly. You won ${accumulated}!\n"
        ),
        "Play again",
        "Back to menu",
    )
}

fn continue_prompt(accumulated: u64) -> Toggle {
    Toggle::new(
        format!(
            "You're right! Each round brings you closer to the grand prize.\n\
             So far you have accumulated ${accumulated}.\n\n\
             If you leave now you keep what you have accumulated,\n\
             but you lose the chance at a bigger prize.\n"
        ),
        "Continue playing",
        "Quit the game",
    )
}

fn lost_prompt(level: u32) -> Toggle {
    Toggle::new(
        format!(
            "You lost! You reached level {level}.\n\
             The game is over, but you can try again!\n"
        ),
        "Play again",
        "Back to menu",
    )
}
