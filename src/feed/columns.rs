//! Header names of the feed sheets.
//!
//! Defaults match the registration form the event runs on; each name can be
//! overridden in the configuration file.

use serde::{Deserialize, Serialize};

/// Column headers of the submission sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionColumns {
    /// Submission time.
    pub timestamp: String,
    /// Team secret code.
    pub code: String,
    /// Submit or attack.
    pub action: String,
    /// Problem being submitted.
    pub problem: String,
    /// Answer text.
    pub answer: String,
    /// Attack target, `(x,y)`.
    pub target: String,
    /// Comma-separated problems paying for an attack.
    pub problems: String,
}

impl Default for SubmissionColumns {
    fn default() -> Self {
        Self {
            timestamp: "Timestamp".to_string(),
            code: "Секретный код".to_string(),
            action: "Вы сдаете или атакуете?".to_string(),
            problem: "Номер вашей задачи?".to_string(),
            answer: "Ваш ответ".to_string(),
            target: "Координаты клетки".to_string(),
            problems: "Номера задач".to_string(),
        }
    }
}

/// Column headers of the manual-grade sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualColumns {
    /// Submission time, copied from the submission feed.
    pub timestamp: String,
    /// Team secret code.
    pub code: String,
    /// Team display name, for the graders' convenience.
    pub team: String,
    /// Problem number.
    pub problem: String,
    /// Answer text.
    pub answer: String,
    /// Human verdict: empty, `1` for correct, anything else for incorrect.
    pub verdict: String,
}

impl Default for ManualColumns {
    fn default() -> Self {
        Self {
            timestamp: "Отметка времени".to_string(),
            code: "Секретный код".to_string(),
            team: "Команда".to_string(),
            problem: "Номер вашей задачи?".to_string(),
            answer: "Ваш ответ".to_string(),
            verdict: "Результат проверки".to_string(),
        }
    }
}
