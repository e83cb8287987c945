//! Small in-memory question bank shared by unit tests.
//!
//! - Science / Easy: questions 1-5, three distractors each
//! - Science / Medium: questions 6-8, one distractor each
//! - Science / Hard: none
//! - History / Hard: question 9, two distractors
//! - History / Easy: question 10, no distractors

use crate::data::Repository;
use crate::models::{Category, DifficultyLevel, DistractorAnswer, Question};

fn question(id: u32, category_id: u32, difficulty_id: u32) -> Question {
    Question {
        id,
        question: format!("Question {}?", id),
        answer: format!("Answer {}", id),
        category_id,
        difficulty_id,
    }
}

fn distractors(question_id: u32, count: u32) -> impl Iterator<Item = DistractorAnswer> {
    (1..=count).map(move |n| DistractorAnswer {
        id: Some(question_id * 10 + n),
        question_id,
        answer: format!("Wrong {}.{}", question_id, n),
    })
}

pub fn repository() -> Repository {
    let mut questions: Vec<Question> = (1..=5).map(|id| question(id, 1, 1)).collect();
    questions.extend((6..=8).map(|id| question(id, 1, 2)));
    questions.push(question(9, 2, 3));
    questions.push(question(10, 2, 1));

    let mut answers: Vec<DistractorAnswer> = (1..=5).flat_map(|id| distractors(id, 3)).collect();
    answers.extend((6..=8).flat_map(|id| distractors(id, 1)));
    answers.extend(distractors(9, 2));

    Repository::from_records(
        questions,
        vec![
            Category { id: 1, name: "Science".to_string() },
            Category { id: 2, name: "History".to_string() },
        ],
        vec![
            DifficultyLevel { id: 1, name: "Easy".to_string() },
            DifficultyLevel { id: 2, name: "Medium".to_string() },
            DifficultyLevel { id: 3, name: "Hard".to_string() },
        ],
        answers,
    )
}
