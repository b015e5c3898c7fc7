use std::rc::Rc;

use log::info;

use crate::controller::category::CategoryController;
use crate::controller::level::LevelController;
use crate::controller::question::QuestionController;
use crate::error::StoreError;
use crate::store::Catalog;

struct SeedQuestion {
    text: &'static str,
    correct: &'static str,
    wrong: [&'static str; 3],
}

struct SeedLevel {
    value: u32,
    prize: u64,
    category: &'static str,
    questions: &'static [SeedQuestion],
}

const fn q(text: &'static str, correct: &'static str, wrong: [&'static str; 3]) -> SeedQuestion {
    SeedQuestion {
        text,
        correct,
        wrong,
    }
}

/// Starter content: five levels, one category per level, prizes that grow
/// with difficulty.
const STARTER: &[SeedLevel] = &[
    SeedLevel {
        value: 1,
        prize: 100,
        category: "General Knowledge",
        questions: &[
            q("How many days are there in a leap year?", "366", ["365", "364", "367"]),
            q(
                "Which colour do you get by mixing blue and yellow?",
                "Green",
                ["Purple", "Orange", "Brown"],
            ),
            q("How many legs does a spider have?", "Eight", ["Six", "Ten", "Twelve"]),
        ],
    },
    SeedLevel {
        value: 2,
        prize: 200,
        category: "Geography",
        questions: &[
            q(
                "What is the capital of Australia?",
                "Canberra",
                ["Sydney", "Melbourne", "Perth"],
            ),
            q(
                "Which is the longest river in South America?",
                "Amazon",
                ["Paraná", "Orinoco", "Magdalena"],
            ),
            q(
                "On which continent is the Sahara desert?",
                "Africa",
                ["Asia", "Australia", "South America"],
            ),
        ],
    },
    SeedLevel {
        value: 3,
        prize: 500,
        category: "Science",
        questions: &[
            q("What is the chemical symbol for gold?", "Au", ["Ag", "Gd", "Go"]),
            q(
                "Which planet is known as the Red Planet?",
                "Mars",
                ["Venus", "Jupiter", "Mercury"],
            ),
            q(
                "Which gas do plants absorb from the atmosphere?",
                "Carbon dioxide",
                ["Oxygen", "Nitrogen", "Hydrogen"],
            ),
        ],
    },
    SeedLevel {
        value: 4,
        prize: 1000,
        category: "History",
        questions: &[
            q("In which year did the Berlin Wall fall?", "1989", ["1991", "1987", "1979"]),
            q(
                "Who was the first person to walk on the Moon?",
                "Neil Armstrong",
                ["Buzz Aldrin", "Yuri Gagarin", "John Glenn"],
            ),
            q("Which empire built Machu Picchu?", "Inca", ["Aztec", "Maya", "Olmec"]),
        ],
    },
    SeedLevel {
        value: 5,
        prize: 5000,
        category: "Literature",
        questions: &[
            q(
                "Who wrote 'One Hundred Years of Solitude'?",
                "Gabriel García Márquez",
                ["Mario Vargas Llosa", "Jorge Luis Borges", "Julio Cortázar"],
            ),
            q(
                "In which language was 'Don Quixote' first written?",
                "Spanish",
                ["Italian", "Portuguese", "Latin"],
            ),
            q(
                "Who wrote 'Pride and Prejudice'?",
                "Jane Austen",
                ["Charlotte Brontë", "Mary Shelley", "George Eliot"],
            ),
        ],
    },
];

/// Fill an empty catalog with the starter content. Returns `false` and
/// touches nothing when any level already exists.
pub fn seed_if_empty(catalog: &Rc<Catalog>) -> Result<bool, StoreError> {
    if !catalog.levels.list()?.is_empty() {
        return Ok(false);
    }

    let levels = LevelController::new(catalog.clone());
    let categories = CategoryController::new(catalog.clone());
    let questions = QuestionController::new(catalog.clone());

    for entry in STARTER {
        let level = levels.add(entry.value, entry.prize)?;
        let category = categories.add(entry.category, &level.id)?;
        for question in entry.questions {
            let wrong: Vec<String> = question.wrong.iter().map(|w| w.to_string()).collect();
            questions.add(question.text, &category.id, question.correct, &wrong)?;
        }
    }

    info!("Seeded catalog with {} levels", STARTER.len());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;

    #[test]
    fn test_seed_fills_every_level() {
        let catalog = Rc::new(Catalog::in_memory());
        assert!(seed_if_empty(&catalog).unwrap());

        let ladder = catalog.ladder().unwrap();
        let prizes: Vec<u64> = ladder.iter().map(|l| l.prize).collect();
        assert_eq!(prizes, vec![100, 200, 500, 1000, 5000]);

        for level in &ladder {
            let categories = catalog.categories_by_level(&level.id).unwrap();
            assert_eq!(categories.len(), 1);
            let questions = catalog.questions_by_category(&categories[0].id).unwrap();
            assert_eq!(questions.len(), 3);
            for question in &questions {
                let answers = catalog.answers_by_question(&question.id).unwrap();
                assert_eq!(answers.len(), 4);
                assert_eq!(answers.iter().filter(|a| a.is_correct).count(), 1);
            }
        }
    }

    #[test]
    fn test_seed_leaves_existing_content_alone() {
        let catalog = Rc::new(Catalog::in_memory());
        catalog.levels.add(Level::new(1, 10)).unwrap();

        assert!(!seed_if_empty(&catalog).unwrap());
        assert_eq!(catalog.levels.list().unwrap().len(), 1);
        assert!(catalog.categories.list().unwrap().is_empty());
    }
}
