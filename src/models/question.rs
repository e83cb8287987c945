use serde::{Deserialize, Serialize};

/// A question as stored in `Questions.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    /// Prompt text shown to the user.
    pub question: String,
    /// The correct answer text.
    pub answer: String,
    #[serde(rename = "categoryID")]
    pub category_id: u32,
    #[serde(rename = "difficultyID")]
    pub difficulty_id: u32,
}

/// A quiz category, e.g. "Science".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    #[serde(rename = "category")]
    pub name: String,
}

/// A difficulty level, e.g. "Easy".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    pub id: u32,
    #[serde(rename = "difficulty")]
    pub name: String,
}

/// A wrong answer offered alongside a question's correct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistractorAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "questionID")]
    pub question_id: u32,
    pub answer: String,
}
