//! 会话状态
//!
//! 表单与结果的全部客户端状态都在 `SessionState` 中，
//! 只能通过本文件中的转换函数修改。转换函数不做任何 IO。

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, InputError};
use crate::models::question::parse_question_count;
use crate::models::{AnswerRequest, Difficulty, Marks, QuestionRequest};

/// 上传成功后展示给用户的提示
pub const UPLOAD_SUCCESS_NOTICE: &str = "✅ PDF uploaded successfully";

/// 单个请求类型的忙碌标记
///
/// Idle → Pending（触发）→ Idle（成功或失败）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyFlag {
    #[default]
    Idle,
    Pending,
}

impl BusyFlag {
    pub fn is_pending(self) -> bool {
        self == BusyFlag::Pending
    }
}

/// 一次答案请求的凭据
///
/// 记录请求发出时的题目版本，响应回来时用来判断是否过期
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerTicket {
    pub request: AnswerRequest,
    pub revision: u64,
}

/// 会话状态
#[derive(Debug, Clone)]
pub struct SessionState {
    selected_file: Option<PathBuf>,
    topic: String,
    num_questions: u32,
    marks: Marks,
    difficulty: Difficulty,
    questions: Vec<String>,
    answers: Vec<String>,
    generating: BusyFlag,
    answering: BusyFlag,
    question_revision: u64,
    notice: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(5, Marks::default(), Difficulty::default())
    }
}

impl SessionState {
    pub fn new(num_questions: u32, marks: Marks, difficulty: Difficulty) -> Self {
        Self {
            selected_file: None,
            topic: String::new(),
            num_questions: num_questions.max(1),
            marks,
            difficulty,
            questions: Vec::new(),
            answers: Vec::new(),
            generating: BusyFlag::Idle,
            answering: BusyFlag::Idle,
            question_revision: 0,
            notice: None,
        }
    }

    /// 使用配置中的表单初始值创建
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.default_num_questions,
            config.default_marks,
            config.default_difficulty,
        )
    }

    // ========== 读取 ==========

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn num_questions(&self) -> u32 {
        self.num_questions
    }

    pub fn marks(&self) -> Marks {
        self.marks
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn generating(&self) -> BusyFlag {
        self.generating
    }

    pub fn answering(&self) -> BusyFlag {
        self.answering
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// "Generate Questions" 按钮是否可用
    pub fn can_generate(&self) -> bool {
        !self.generating.is_pending()
    }

    /// "Show Answers" 按钮是否存在（有题目时才显示）
    pub fn shows_answer_control(&self) -> bool {
        !self.questions.is_empty()
    }

    /// "Show Answers" 按钮是否可用
    pub fn can_show_answers(&self) -> bool {
        self.shows_answer_control() && !self.answering.is_pending()
    }

    // ========== 表单输入 ==========

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.selected_file = Some(path.into());
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn set_num_questions(&mut self, count: u32) -> Result<(), InputError> {
        if count == 0 {
            return Err(InputError::InvalidQuestionCount {
                value: count.to_string(),
            });
        }
        self.num_questions = count;
        Ok(())
    }

    /// 从文本输入设置题目数量，非法输入不修改状态
    pub fn set_num_questions_input(&mut self, input: &str) -> Result<(), InputError> {
        self.num_questions = parse_question_count(input)?;
        Ok(())
    }

    pub fn set_marks(&mut self, marks: Marks) {
        self.marks = marks;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// 取出并清除当前提示
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    // ========== 上传 ==========

    /// 上传结束：成功时设置提示，失败时状态不变
    pub fn finish_upload(
        &mut self,
        result: AppResult<Option<String>>,
    ) -> AppResult<Option<String>> {
        let message = result?;
        self.notice = Some(UPLOAD_SUCCESS_NOTICE.to_string());
        Ok(message)
    }

    // ========== 生成题目 ==========

    /// 开始生成题目。已有请求在途时返回 None（按钮处于禁用状态）
    pub fn begin_generate(&mut self) -> Option<QuestionRequest> {
        if self.generating.is_pending() {
            return None;
        }
        self.generating = BusyFlag::Pending;

        Some(QuestionRequest {
            topic: self.topic.clone(),
            num_questions: self.num_questions,
            marks: self.marks,
            difficulty: self.difficulty,
        })
    }

    /// 生成题目结束
    ///
    /// 成功：替换题目、清空答案、题目版本 +1。失败：题目与答案不变。
    /// 两种情况下忙碌标记都回到 Idle。
    pub fn finish_generate(&mut self, result: AppResult<Vec<String>>) -> AppResult<usize> {
        self.generating = BusyFlag::Idle;

        let questions = result?;
        self.questions = questions;
        self.answers.clear();
        self.question_revision += 1;

        Ok(self.questions.len())
    }

    // ========== 获取答案 ==========

    /// 开始获取答案。没有题目或已有请求在途时返回 None
    pub fn begin_answers(&mut self) -> Option<AnswerTicket> {
        if !self.can_show_answers() {
            return None;
        }
        self.answering = BusyFlag::Pending;

        Some(AnswerTicket {
            request: AnswerRequest {
                questions: self.questions.clone(),
                marks: self.marks,
            },
            revision: self.question_revision,
        })
    }

    /// 获取答案结束
    ///
    /// 只有题目版本未变且答案数量与发送的题目数量一致时才替换答案，
    /// 否则保留原答案并返回错误。忙碌标记总是回到 Idle。
    pub fn finish_answers(
        &mut self,
        ticket: &AnswerTicket,
        result: AppResult<Vec<String>>,
    ) -> AppResult<usize> {
        self.answering = BusyFlag::Idle;

        let answers = result?;

        if ticket.revision != self.question_revision {
            return Err(AppError::Api(ApiError::StaleResponse {
                endpoint: crate::clients::backend_client::ANSWER_ENDPOINT.to_string(),
            }));
        }

        let sent = ticket.request.questions.len();
        if answers.len() != sent {
            return Err(AppError::Api(ApiError::AnswerCountMismatch {
                questions: sent,
                answers: answers.len(),
            }));
        }

        self.answers = answers;
        Ok(self.answers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn transport_error() -> AppError {
        AppError::Api(ApiError::BadResponse {
            endpoint: "/questions".to_string(),
            status: 502,
            body: String::new(),
        })
    }

    fn state_with_questions(questions: &[&str]) -> SessionState {
        let mut state = SessionState::default();
        state.begin_generate().unwrap();
        state.finish_generate(Ok(strings(questions))).unwrap();
        state
    }

    #[test]
    fn test_begin_generate_builds_request_from_form() {
        let mut state = SessionState::default();
        state.set_topic("Photosynthesis");
        state.set_num_questions(3).unwrap();
        state.set_marks(Marks::Two);
        state.set_difficulty(Difficulty::Easy);

        let request = state.begin_generate().unwrap();
        assert_eq!(
            request,
            QuestionRequest {
                topic: "Photosynthesis".to_string(),
                num_questions: 3,
                marks: Marks::Two,
                difficulty: Difficulty::Easy,
            }
        );
        assert_eq!(state.generating(), BusyFlag::Pending);
        assert!(!state.can_generate());
    }

    #[test]
    fn test_second_generate_while_pending_is_refused() {
        let mut state = SessionState::default();
        assert!(state.begin_generate().is_some());
        assert!(state.begin_generate().is_none());
        assert_eq!(state.generating(), BusyFlag::Pending);
    }

    #[test]
    fn test_generate_success_replaces_questions_and_clears_answers() {
        let mut state = state_with_questions(&["old"]);
        let ticket = state.begin_answers().unwrap();
        state.finish_answers(&ticket, Ok(strings(&["ans"]))).unwrap();
        assert_eq!(state.answers(), &["ans".to_string()]);

        state.begin_generate().unwrap();
        let count = state.finish_generate(Ok(strings(&["Q1", "Q2", "Q3"]))).unwrap();

        assert_eq!(count, 3);
        assert_eq!(state.questions(), strings(&["Q1", "Q2", "Q3"]).as_slice());
        assert!(state.answers().is_empty());
        assert!(state.can_generate());
    }

    #[test]
    fn test_generate_failure_keeps_state_and_releases_flag() {
        let mut state = state_with_questions(&["Q1"]);
        let ticket = state.begin_answers().unwrap();
        state.finish_answers(&ticket, Ok(strings(&["A1"]))).unwrap();

        state.begin_generate().unwrap();
        assert!(state.finish_generate(Err(transport_error())).is_err());

        assert_eq!(state.questions(), strings(&["Q1"]).as_slice());
        assert_eq!(state.answers(), strings(&["A1"]).as_slice());
        assert_eq!(state.generating(), BusyFlag::Idle);
    }

    #[test]
    fn test_answers_unavailable_without_questions() {
        let mut state = SessionState::default();
        assert!(!state.shows_answer_control());
        assert!(state.begin_answers().is_none());
        assert_eq!(state.answering(), BusyFlag::Idle);
    }

    #[test]
    fn test_answers_request_uses_current_questions_and_marks() {
        let mut state = state_with_questions(&["Q1", "Q2"]);
        state.set_marks(Marks::Two);

        let ticket = state.begin_answers().unwrap();
        assert_eq!(ticket.request.questions, strings(&["Q1", "Q2"]));
        assert_eq!(ticket.request.marks, Marks::Two);
        assert!(!state.can_show_answers());
        assert!(state.begin_answers().is_none());

        let count = state.finish_answers(&ticket, Ok(strings(&["A1", "A2"]))).unwrap();
        assert_eq!(count, 2);
        assert_eq!(state.answers(), strings(&["A1", "A2"]).as_slice());
        assert_eq!(state.answering(), BusyFlag::Idle);
    }

    #[test]
    fn test_busy_flags_are_independent() {
        let mut state = state_with_questions(&["Q1"]);
        let ticket = state.begin_answers().unwrap();

        assert!(state.can_generate());
        state.begin_generate().unwrap();
        assert!(state.generating().is_pending());
        assert!(state.answering().is_pending());

        state.finish_answers(&ticket, Err(transport_error())).unwrap_err();
        assert!(state.generating().is_pending());
        assert!(!state.answering().is_pending());
    }

    #[test]
    fn test_mismatched_answer_count_is_rejected() {
        let mut state = state_with_questions(&["Q1", "Q2"]);
        let ticket = state.begin_answers().unwrap();

        let err = state.finish_answers(&ticket, Ok(strings(&["A1"]))).unwrap_err();
        assert!(matches!(
            err,
            AppError::Api(ApiError::AnswerCountMismatch {
                questions: 2,
                answers: 1
            })
        ));
        assert!(state.answers().is_empty());
        assert_eq!(state.answering(), BusyFlag::Idle);
    }

    #[test]
    fn test_answers_for_replaced_questions_are_discarded() {
        let mut state = state_with_questions(&["Q1"]);
        let ticket = state.begin_answers().unwrap();

        state.begin_generate().unwrap();
        state.finish_generate(Ok(strings(&["N1"]))).unwrap();

        let err = state.finish_answers(&ticket, Ok(strings(&["A1"]))).unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::StaleResponse { .. })));
        assert!(state.answers().is_empty());
    }

    #[test]
    fn test_upload_notice_only_on_success() {
        let mut state = SessionState::default();
        state.select_file("notes.pdf");

        assert!(state.finish_upload(Err(transport_error())).is_err());
        assert!(state.notice().is_none());
        assert_eq!(state.selected_file(), Some(Path::new("notes.pdf")));

        state.finish_upload(Ok(None)).unwrap();
        assert_eq!(state.take_notice().as_deref(), Some(UPLOAD_SUCCESS_NOTICE));
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_invalid_count_input_leaves_value() {
        let mut state = SessionState::default();
        assert!(state.set_num_questions_input("abc").is_err());
        assert!(state.set_num_questions(0).is_err());
        assert_eq!(state.num_questions(), 5);

        state.set_num_questions_input("8").unwrap();
        assert_eq!(state.num_questions(), 8);
    }
}
