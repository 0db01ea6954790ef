//! 编排层
//!
//! - 交互模式：逐行读取命令，相当于在表单上操作
//! - 单次模式：按 上传 → 生成题目 → 获取答案 → 导出 的顺序各执行一次

use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::clients::BackendClient;
use crate::config::Config;
use crate::error::{AppResult, InputError};
use crate::models::question::parse_question_count;
use crate::models::{Difficulty, Marks};
use crate::session::{ActionOutcome, QuizSession};
use crate::utils::logging::log_startup;
use crate::view;

pub const HELP: &str = "\
命令:
  upload <path>        上传 PDF
  topic <text>         设置主题（可为空）
  count <n>            设置题目数量
  marks <1|2|3|5>      设置每题分值
  difficulty <d>       设置难度 (easy|medium|hard)
  generate             生成题目
  answers              获取答案
  export [path]        导出题目 PDF
  show                 显示当前界面
  help                 显示帮助
  quit                 退出";

/// 交互命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    Topic(String),
    Count(u32),
    Marks(Marks),
    Difficulty(Difficulty),
    Generate,
    Answers,
    Export(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

impl Command {
    /// 解析一行输入，空行返回 None
    pub fn parse(line: &str) -> Result<Option<Command>, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "upload" if !rest.is_empty() => Command::Upload(PathBuf::from(rest)),
            "topic" => Command::Topic(rest.to_string()),
            "count" => Command::Count(parse_question_count(rest)?),
            "marks" => Command::Marks(rest.parse()?),
            "difficulty" => Command::Difficulty(rest.parse()?),
            "generate" => Command::Generate,
            "answers" => Command::Answers,
            "export" if rest.is_empty() => Command::Export(None),
            "export" => Command::Export(Some(PathBuf::from(rest))),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => {
                return Err(InputError::UnknownCommand {
                    command: line.to_string(),
                })
            }
        };

        Ok(Some(command))
    }
}

/// 单次模式的参数
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    pub upload: Option<PathBuf>,
    pub topic: String,
    pub count: Option<u32>,
    pub marks: Option<Marks>,
    pub difficulty: Option<Difficulty>,
    pub answers: bool,
    pub export: bool,
    pub export_path: Option<PathBuf>,
}

/// 单次模式各步骤的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub upload: Option<ActionOutcome>,
    pub generate: ActionOutcome,
    pub answers: Option<ActionOutcome>,
    pub export: Option<ActionOutcome>,
}

/// 应用主结构
pub struct App {
    session: QuizSession<BackendClient>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let client = BackendClient::new(&config)?;
        let session = QuizSession::new(client, &config);

        Ok(Self { session })
    }

    /// 执行一条命令，返回是否继续
    pub async fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Upload(path) => {
                self.session.upload(&path).await;
            }
            Command::Topic(topic) => self.session.state_mut().set_topic(topic),
            Command::Count(count) => {
                if let Err(e) = self.session.state_mut().set_num_questions(count) {
                    warn!("{}", e);
                }
            }
            Command::Marks(marks) => self.session.state_mut().set_marks(marks),
            Command::Difficulty(d) => self.session.state_mut().set_difficulty(d),
            Command::Generate => {
                self.session.generate_questions().await;
            }
            Command::Answers => {
                self.session.show_answers().await;
            }
            Command::Export(path) => {
                self.session.export_pdf(path.as_deref()).await;
            }
            Command::Show | Command::Help => {}
            Command::Quit => return false,
        }
        true
    }

    /// 交互模式主循环
    pub async fn run_interactive<R, W>(&mut self, input: R, mut output: W) -> AppResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(input).lines();

        output.write_all(view::render(self.session.state()).as_bytes()).await?;
        output.write_all(b"\n> ").await?;
        output.flush().await?;

        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => {
                    output.write_all(b"> ").await?;
                    output.flush().await?;
                    continue;
                }
                Err(e) => {
                    output.write_all(format!("{}\n> ", e).as_bytes()).await?;
                    output.flush().await?;
                    continue;
                }
            };

            let show_help = command == Command::Help;
            if !self.execute(command).await {
                break;
            }

            if show_help {
                output.write_all(HELP.as_bytes()).await?;
                output.write_all(b"\n").await?;
            } else {
                if let Some(notice) = self.session.state_mut().take_notice() {
                    output.write_all(format!("{}\n", notice).as_bytes()).await?;
                }
                output.write_all(view::render(self.session.state()).as_bytes()).await?;
            }
            output.write_all(b"\n> ").await?;
            output.flush().await?;
        }

        info!("👋 会话结束");
        Ok(())
    }

    /// 单次模式
    pub async fn run_once(&mut self, plan: RunPlan) -> RunSummary {
        let upload = match &plan.upload {
            Some(path) => Some(self.session.upload(path).await),
            None => None,
        };

        {
            let state = self.session.state_mut();
            state.set_topic(plan.topic);
            if let Some(count) = plan.count {
                if let Err(e) = state.set_num_questions(count) {
                    warn!("{}", e);
                }
            }
            if let Some(marks) = plan.marks {
                state.set_marks(marks);
            }
            if let Some(difficulty) = plan.difficulty {
                state.set_difficulty(difficulty);
            }
        }

        let generate = self.session.generate_questions().await;

        let answers = if plan.answers && generate == ActionOutcome::Completed {
            Some(self.session.show_answers().await)
        } else {
            None
        };

        let export = if plan.export && generate == ActionOutcome::Completed {
            Some(self.session.export_pdf(plan.export_path.as_deref()).await)
        } else {
            None
        };

        RunSummary {
            upload,
            generate,
            answers,
            export,
        }
    }

    /// 当前界面文本
    pub fn render(&self) -> String {
        view::render(self.session.state())
    }
}
