pub mod pdf;

pub use pdf::{build_questions_pdf, save_questions_pdf, QuestionPdfLayout};
