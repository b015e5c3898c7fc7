use std::rc::Rc;
use std::time::Duration;

use log::info;

use crate::error::StoreError;
use crate::model::{seconds_from_millis, Player};
use crate::store::Catalog;
use crate::view::table::TableRow;

pub struct PlayerController {
    catalog: Rc<Catalog>,
}

impl PlayerController {
    pub fn new(catalog: Rc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Record a finished game. An existing record for `username` is
    /// overwritten with these values, even when they are worse.
    pub fn register(
        &self,
        username: &str,
        level: u32,
        time: Duration,
    ) -> Result<Player, StoreError> {
        if username.trim().is_empty() {
            return Err(StoreError::Invalid {
                kind: "player",
                reason: "username must not be empty".into(),
            });
        }
        let seconds = seconds_from_millis(time.as_millis());

        match self.catalog.player_by_username(username)? {
            Some(mut player) => {
                player.max_level_reached = level;
                player.time = seconds;
                self.catalog.players.update(player.clone())?;
                info!("Updated {username}: level {level} in {seconds}s");
                Ok(player)
            }
            None => {
                let player = Player::new(username, level, seconds);
                self.catalog.players.add(player.clone())?;
                info!("Registered {username}: level {level} in {seconds}s");
                Ok(player)
            }
        }
    }

    /// Highest level first; ties go to the faster player.
    pub fn ranking(&self) -> Result<Vec<Player>, StoreError> {
        let mut players = self.catalog.players.list()?;
        players.sort_by(|a, b| {
            b.max_level_reached
                .cmp(&a.max_level_reached)
                .then_with(|| a.time.total_cmp(&b.time))
        });
        Ok(players)
    }

    pub fn table_rows(&self) -> Result<Vec<TableRow>, StoreError> {
        Ok(self
            .ranking()?
            .into_iter()
            .map(|p| {
                TableRow::new(
                    p.id,
                    vec![
                        p.username,
                        p.max_level_reached.to_string(),
                        format!("{:.2}s", p.time),
                    ],
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (Rc<Catalog>, PlayerController) {
        let catalog = Rc::new(Catalog::in_memory());
        (catalog.clone(), PlayerController::new(catalog))
    }

    #[test]
    fn test_register_overwrites_last_write_wins() {
        let (catalog, players) = controller();

        let first = players
            .register("ada", 5, Duration::from_millis(42_000))
            .unwrap();
        let second = players
            .register("ada", 2, Duration::from_millis(1_234))
            .unwrap();

        assert_eq!(first.id, second.id);
        let stored = catalog.player_by_username("ada").unwrap().unwrap();
        assert_eq!(stored.max_level_reached, 2);
        assert_eq!(stored.time, 1.23);
        assert_eq!(catalog.players.list().unwrap().len(), 1);
    }

    #[test]
    fn test_register_rejects_blank_username() {
        let (_, players) = controller();
        assert!(players.register(" ", 1, Duration::ZERO).is_err());
    }

    #[test]
    fn test_ranking_order() {
        let (_, players) = controller();
        players.register("slow", 3, Duration::from_secs(90)).unwrap();
        players.register("fast", 3, Duration::from_secs(30)).unwrap();
        players.register("best", 5, Duration::from_secs(300)).unwrap();
        players.register("new", 1, Duration::from_secs(5)).unwrap();

        let names: Vec<String> = players
            .ranking()
            .unwrap()
            .into_iter()
            .map(|p| p.username)
            .collect();
        assert_eq!(names, vec!["best", "fast", "slow", "new"]);

        let rows = players.table_rows().unwrap();
        assert_eq!(rows[1].cells, vec!["fast", "3", "30.00s"]);
    }
}
