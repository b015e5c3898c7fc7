use std::rc::Rc;

use anyhow::Result;
use log::debug;

use crate::controller::category::CategoryController;
use crate::controller::game::GameController;
use crate::controller::level::LevelController;
use crate::controller::player::PlayerController;
use crate::controller::question::QuestionController;
use crate::game::round::RoundResolver;
use crate::nav::node::View;
use crate::nav::tree::MenuTree;
use crate::store::Catalog;
use crate::view::form::{CategoryForm, LevelForm, QuestionForm};
use crate::view::menu::{MenuKind, MenuView};
use crate::view::table::{TableMode, TableView};
use crate::view::ToggleView;

const MENU_MESSAGE: &str = "Select one of the following options";

fn menu(
    kind: MenuKind,
    choices: &'static [&'static str],
) -> impl Fn() -> Result<Box<dyn View>> {
    move || Ok(Box::new(MenuView::new(kind, MENU_MESSAGE, choices)) as Box<dyn View>)
}

fn removal_title(what: &str) -> String {
    format!("Select the {what} you want to remove:")
}

/// Build the application menu:
///
/// ```text
/// main ─1─ play now (game)
///      ─2─ setting ─1─ category ─1─ create / ─2─ delete
///                  ─2─ question ─1─ create / ─2─ delete
///                  ─3─ level    ─1─ create / ─2─ delete
///      ─3─ player history
/// ```
pub fn build<R: RoundResolver + 'static>(catalog: Rc<Catalog>, resolver: R) -> MenuTree {
    let categories = Rc::new(CategoryController::new(catalog.clone()));
    let questions = Rc::new(QuestionController::new(catalog.clone()));
    let levels = Rc::new(LevelController::new(catalog.clone()));
    let players = Rc::new(PlayerController::new(catalog.clone()));
    let game = Rc::new(GameController::new(catalog.clone(), resolver));

    let mut tree = MenuTree::new(
        "main menu",
        menu(MenuKind::Main, &["Play Now", "Setting", "Player History"]),
        None,
    );
    let root = tree.root();

    // Play now
    let c = catalog.clone();
    tree.add_child(
        root,
        "1",
        "game start",
        move || -> Result<Box<dyn View>> {
            Ok(Box::new(ToggleView::game_start(c.ladder()?.len())))
        },
        Some(game),
    );

    // Setting
    let setting = tree.add_child(
        root,
        "2",
        "setting",
        menu(MenuKind::Sub, &["Category", "Question", "Level"]),
        None,
    );

    let category_menu = tree.add_child(
        setting,
        "1",
        "category setting",
        menu(MenuKind::Sub, &["Create Category", "Delete Category"]),
        None,
    );
    let c = catalog.clone();
    tree.add_child(
        category_menu,
        "1",
        "create category",
        move || -> Result<Box<dyn View>> { Ok(Box::new(CategoryForm::new(c.ladder()?))) },
        Some(categories.clone()),
    );
    let ctl = categories.clone();
    tree.add_child(
        category_menu,
        "2",
        "delete categories",
        move || -> Result<Box<dyn View>> {
            Ok(Box::new(TableView::new(
                removal_title("categories"),
                &["name", "level"],
                ctl.table_rows()?,
                40,
                TableMode::Delete,
            )))
        },
        Some(categories),
    );

    let question_menu = tree.add_child(
        setting,
        "2",
        "question setting",
        menu(MenuKind::Sub, &["Create Question", "Delete Question"]),
        None,
    );
    let c = catalog.clone();
    tree.add_child(
        question_menu,
        "1",
        "create question",
        move || -> Result<Box<dyn View>> {
            let mut all = c.categories.list()?;
            all.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(Box::new(QuestionForm::new(all)))
        },
        Some(questions.clone()),
    );
    let ctl = questions.clone();
    tree.add_child(
        question_menu,
        "2",
        "delete questions",
        move || -> Result<Box<dyn View>> {
            Ok(Box::new(TableView::new(
                removal_title("questions"),
                &["text", "category"],
                ctl.table_rows()?,
                60,
                TableMode::Delete,
            )))
        },
        Some(questions),
    );

    let level_menu = tree.add_child(
        setting,
        "3",
        "level setting",
        menu(MenuKind::Sub, &["Create Level", "Delete Level"]),
        None,
    );
    let c = catalog.clone();
    tree.add_child(
        level_menu,
        "1",
        "create level",
        move || -> Result<Box<dyn View>> { Ok(Box::new(LevelForm::new(c.ladder()?))) },
        Some(levels.clone()),
    );
    let ctl = levels.clone();
    tree.add_child(
        level_menu,
        "2",
        "delete levels",
        move || -> Result<Box<dyn View>> {
            Ok(Box::new(TableView::new(
                removal_title("levels"),
                &["level", "prize"],
                ctl.table_rows()?,
                30,
                TableMode::Delete,
            )))
        },
        Some(levels),
    );

    // Player history
    tree.add_child(
        root,
        "3",
        "player history",
        move || -> Result<Box<dyn View>> {
            Ok(Box::new(TableView::new(
                "Player Ranking",
                &["username", "level", "time"],
                players.table_rows()?,
                30,
                TableMode::Browse,
            )))
        },
        None,
    );

    debug!("Menu tree built: {} nodes, depth {}", tree.len(), tree.depth());
    tree
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::console::{Console, ScriptedConsole};
    use crate::error::GameError;
    use crate::game::round::RoundResult;
    use crate::nav::{Exit, Navigator};
    use crate::seed;

    struct AlwaysWrong;

    impl RoundResolver for AlwaysWrong {
        fn start_round(
            &mut self,
            _level: u32,
            _console: &mut dyn Console,
        ) -> Result<RoundResult, GameError> {
            Ok(RoundResult {
                correct: false,
                time: Duration::from_secs(2),
            })
        }
    }

    fn seeded() -> Rc<Catalog> {
        let catalog = Rc::new(Catalog::in_memory());
        assert!(seed::seed_if_empty(&catalog).unwrap());
        catalog
    }

    fn walk(catalog: &Rc<Catalog>, script: &[&str]) -> (Exit, ScriptedConsole) {
        let tree = build(catalog.clone(), AlwaysWrong);
        let mut console = ScriptedConsole::new(script);
        let exit = Navigator::default().run(&tree, &mut console).unwrap();
        (exit, console)
    }

    #[test]
    fn test_tree_shape() {
        let tree = build(seeded(), AlwaysWrong);
        assert_eq!(tree.len(), 13);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_create_level_then_close() {
        let catalog = seeded();
        let (exit, console) = walk(
            &catalog,
            &["2", "3", "1", "6", "9000", "0", "0", "00", "y"],
        );

        assert_eq!(exit, Exit::Closed);
        assert_eq!(catalog.level_by_value(6).unwrap().unwrap().prize, 9000);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn test_play_then_view_ranking() {
        let catalog = seeded();
        let (exit, console) = walk(
            &catalog,
            &["1", "y", "ada", "n", "3", "0", "00", "n", "00", "y"],
        );

        assert_eq!(exit, Exit::Closed);
        assert!(console.output.contains("You lost!"));
        assert!(console.output.contains("Player Ranking"));
        let player = catalog.player_by_username("ada").unwrap().unwrap();
        assert_eq!(player.max_level_reached, 1);
        assert_eq!(player.time, 2.0);
    }

    #[test]
    fn test_delete_category_refreshes_table() {
        let catalog = seeded();
        let before = catalog.categories.list().unwrap().len();

        let (_, console) = walk(&catalog, &["2", "1", "2", "1", "2", "0", "0", "0", "00", "y"]);

        assert_eq!(catalog.categories.list().unwrap().len(), before - 1);
        // table rendered twice: before and after the removal
        assert_eq!(console.output.matches("Select the categories").count(), 2);
    }

    #[test]
    fn test_declining_game_returns_to_main_menu() {
        let catalog = seeded();
        let (exit, _) = walk(&catalog, &["1", "n", "00", "y"]);
        assert_eq!(exit, Exit::Closed);
        assert!(catalog.players.list().unwrap().is_empty());
    }
}
