pub mod node;
pub mod tree;

use log::{debug, info};

use crate::console::{confirm, Console, Toggle};
use crate::error::{NavError, Stage};
use node::{Outcome, Token};
use tree::{MenuTree, NodeId};

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `close` was confirmed somewhere in the tree.
    Closed,
    /// `back` was chosen at the starting node.
    Returned,
}

/// Walks a [`MenuTree`]: runs each node's view, feeds the result through the
/// node's controller, and moves according to the resulting token.
///
/// The walk keeps an explicit stack of visited nodes (push on descend, pop on
/// `back`) instead of recursing, so tree depth never grows the call stack.
pub struct Navigator {
    close_prompt: Toggle,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            close_prompt: Toggle::new(
                "Are you sure you want to close the application?",
                "Close",
                "Back",
            ),
        }
    }
}

impl Navigator {
    pub fn run(&self, tree: &MenuTree, console: &mut dyn Console) -> Result<Exit, NavError> {
        self.run_from(tree, tree.root(), console)
    }

    /// Walk starting at `start`. Any failure abandons the walk and is
    /// returned with the node and stage it happened in.
    pub fn run_from(
        &self,
        tree: &MenuTree,
        start: NodeId,
        console: &mut dyn Console,
    ) -> Result<Exit, NavError> {
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let node = tree.node(current);
            let fail = move |stage: Stage| move |cause: anyhow::Error| NavError {
                node: current,
                stage,
                cause,
            };

            let mut view = node.view().build().map_err(fail(Stage::BuildView))?;
            console
                .clear()
                .map_err(|e| fail(Stage::RunView)(e.into()))?;
            let outcome = view.run(console).map_err(fail(Stage::RunView))?;

            let token = match node.controller() {
                Some(controller) => controller
                    .process(outcome, console)
                    .map_err(fail(Stage::Process))?,
                None => match outcome {
                    Outcome::Token(token) => token,
                    Outcome::Payload(payload) => {
                        debug!(
                            "Node {} ({}) produced {payload:?} but has no controller; staying",
                            current, node.label
                        );
                        continue;
                    }
                },
            };

            match token {
                Token::Key(key) => match node.child(&key) {
                    Some(child) => {
                        debug!(
                            "Descend: {} ({}) -[{key}]-> {} ({})",
                            current,
                            node.label,
                            child,
                            tree.node(child).label
                        );
                        stack.push(child);
                    }
                    None => debug!("Key '{key}' names no child of {}; staying", node.label),
                },
                Token::Back => {
                    debug!("Back from {} ({})", current, node.label);
                    stack.pop();
                }
                Token::Close => {
                    console
                        .clear()
                        .map_err(|e| fail(Stage::Confirm)(e.into()))?;
                    let confirmed = confirm(console, &self.close_prompt)
                        .map_err(|e| fail(Stage::Confirm)(e.into()))?;
                    if confirmed {
                        info!("Close confirmed at {} ({})", current, node.label);
                        return Ok(Exit::Closed);
                    }
                    debug!("Close declined at {}", node.label);
                }
            }
        }

        Ok(Exit::Returned)
    }
}
