//! # Quiz Forge
//!
//! AI 出题 + 找答案客户端：上传 PDF、按主题生成题目、获取答案、导出题目 PDF
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `clients/` - `BackendClient`，封装后端 `/upload`、`/questions`、`/answer`
//!
//! ### ② 业务能力层（Capabilities）
//! - `export/` - 题目列表 → PDF
//! - `view` - 会话状态 → 终端文本与控件列表
//!
//! ### ③ 流程层（Session）
//! - `session/state` - `SessionState`，唯一的状态记录与转换函数
//! - `session/controller` - `QuizSession`，一个用户动作的完整流程
//!
//! ### ④ 编排层（Orchestration）
//! - `app` - 交互模式与单次模式
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod models;
pub mod session;
pub mod utils;
pub mod view;

// 重新导出常用类型
pub use app::App;
pub use clients::{BackendClient, QuestionBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::{ActionOutcome, QuizSession, SessionState};
