//! 题目生成相关的数据模型
//!
//! 请求体与响应体字段名与后端 JSON 一一对应

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// 每题分值，只允许 1 / 2 / 3 / 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Marks {
    One,
    Two,
    Three,
    Five,
}

impl Marks {
    pub fn value(self) -> u8 {
        match self {
            Marks::One => 1,
            Marks::Two => 2,
            Marks::Three => 3,
            Marks::Five => 5,
        }
    }

    /// 下拉框中显示的标签，如 "1 mark" / "2 marks"
    pub fn label(self) -> String {
        match self {
            Marks::One => "1 mark".to_string(),
            other => format!("{} marks", other.value()),
        }
    }
}

impl Default for Marks {
    fn default() -> Self {
        Marks::One
    }
}

impl From<Marks> for u8 {
    fn from(marks: Marks) -> Self {
        marks.value()
    }
}

impl TryFrom<u8> for Marks {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Marks::One),
            2 => Ok(Marks::Two),
            3 => Ok(Marks::Three),
            5 => Ok(Marks::Five),
            other => Err(InputError::InvalidMarks {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for Marks {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidMarks {
            value: s.to_string(),
        };
        let value: u8 = s.trim().parse().map_err(|_| invalid())?;
        Marks::try_from(value).map_err(|_| invalid())
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl FromStr for Difficulty {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(InputError::InvalidDifficulty {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 解析题目数量输入，必须是 >= 1 的整数
pub fn parse_question_count(input: &str) -> Result<u32, InputError> {
    match input.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(InputError::InvalidQuestionCount {
            value: input.to_string(),
        }),
    }
}

/// `POST /questions` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub topic: String,
    pub num_questions: u32,
    pub marks: Marks,
    pub difficulty: Difficulty,
}

/// `POST /answer` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub questions: Vec<String>,
    pub marks: Marks,
}

/// `POST /questions` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

/// `POST /answer` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct AnswersResponse {
    pub answers: Vec<String>,
}
