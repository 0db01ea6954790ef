//! 会话层
//!
//! - `state` - 会话状态记录与状态转换函数（不做 IO）
//! - `controller` - 将用户动作与后端调用串起来

pub mod controller;
pub mod state;

pub use controller::{ActionOutcome, QuizSession};
pub use state::{AnswerTicket, BusyFlag, SessionState, UPLOAD_SUCCESS_NOTICE};
