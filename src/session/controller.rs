//! 会话控制器 - 流程层
//!
//! 一个用户动作对应一个方法：转换状态 → 调用后端 → 转换状态。
//! 后端失败只写日志，不向上抛出；返回值只说明动作的结局。

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::clients::QuestionBackend;
use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::export::{save_questions_pdf, QuestionPdfLayout};
use crate::session::state::SessionState;
use crate::utils::truncate_text;

/// 动作结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 成功完成
    Completed,
    /// 失败（已记录日志）
    Failed,
    /// 控件不可用，未发出请求
    Ignored,
}

/// 一次会话：状态 + 后端 + 导出设置
pub struct QuizSession<B> {
    backend: B,
    state: SessionState,
    export_path: PathBuf,
    layout: QuestionPdfLayout,
}

impl<B: QuestionBackend> QuizSession<B> {
    pub fn new(backend: B, config: &Config) -> Self {
        Self {
            backend,
            state: SessionState::from_config(config),
            export_path: config.export_path(),
            layout: QuestionPdfLayout::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 表单输入直接修改状态
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// 选择并上传文档
    pub async fn upload(&mut self, path: &Path) -> ActionOutcome {
        self.state.select_file(path);

        let result = match read_document(path).await {
            Ok((file_name, bytes)) => self.backend.upload_document(&file_name, bytes).await,
            Err(e) => Err(e),
        };

        match self.state.finish_upload(result) {
            Ok(message) => {
                if let Some(message) = message {
                    info!("后端响应: {}", message);
                }
                info!("📂 已上传 {}", path.display());
                ActionOutcome::Completed
            }
            Err(e) => {
                error!("❌ Upload error: {}", e);
                ActionOutcome::Failed
            }
        }
    }

    /// 生成题目
    pub async fn generate_questions(&mut self) -> ActionOutcome {
        let Some(request) = self.state.begin_generate() else {
            warn!("⏳ 题目生成中，忽略重复请求");
            return ActionOutcome::Ignored;
        };

        info!(
            "🎯 生成题目: topic=\"{}\" x{} ({} marks, {})",
            truncate_text(&request.topic, 40),
            request.num_questions,
            request.marks,
            request.difficulty
        );

        let result = self.backend.generate_questions(&request).await;
        match self.state.finish_generate(result) {
            Ok(count) => {
                info!("✓ 收到 {} 道题目", count);
                ActionOutcome::Completed
            }
            Err(e) => {
                error!("❌ Question generation failed: {}", e);
                ActionOutcome::Failed
            }
        }
    }

    /// 获取当前题目的答案
    pub async fn show_answers(&mut self) -> ActionOutcome {
        let Some(ticket) = self.state.begin_answers() else {
            if self.state.shows_answer_control() {
                warn!("⏳ 答案获取中，忽略重复请求");
            } else {
                warn!("⚠️ 还没有题目，无法获取答案");
            }
            return ActionOutcome::Ignored;
        };

        info!("✅ 获取 {} 道题的答案...", ticket.request.questions.len());

        let result = self.backend.generate_answers(&ticket.request).await;
        match self.state.finish_answers(&ticket, result) {
            Ok(count) => {
                info!("✓ 收到 {} 条答案", count);
                ActionOutcome::Completed
            }
            Err(e) => {
                error!("❌ Answer fetch failed: {}", e);
                ActionOutcome::Failed
            }
        }
    }

    /// 将当前题目导出为 PDF，`path` 为空时使用配置中的导出路径
    pub async fn export_pdf(&self, path: Option<&Path>) -> ActionOutcome {
        if self.state.questions().is_empty() {
            warn!("⚠️ 还没有题目，无法导出 PDF");
            return ActionOutcome::Ignored;
        }

        let target = path.unwrap_or(self.export_path.as_path());

        match save_questions_pdf(self.state.questions(), &self.layout, target).await {
            Ok(()) => ActionOutcome::Completed,
            Err(e) => {
                error!("❌ PDF export failed: {}", e);
                ActionOutcome::Failed
            }
        }
    }
}

/// 读取待上传的文档，返回 (文件名, 内容)
async fn read_document(path: &Path) -> AppResult<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::File(FileError::NotFound {
                path: path.display().to_string(),
            })
        } else {
            AppError::file_read_failed(path.display().to_string(), e)
        }
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "document.pdf".to_string());

    Ok((file_name, bytes))
}
