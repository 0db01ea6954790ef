pub mod question;

pub use question::{
    AnswerRequest, AnswersResponse, Difficulty, Marks, QuestionRequest, QuestionsResponse,
};
