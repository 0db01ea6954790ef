use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quiz_forge::app::{App, RunPlan};
use quiz_forge::config::Config;
use quiz_forge::logger;
use quiz_forge::models::{Difficulty, Marks};
use quiz_forge::session::ActionOutcome;

#[derive(Parser)]
#[command(name = "quiz-forge")]
#[command(version, about = "AI question generator + answer finder client", long_about = None)]
struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 后端地址（覆盖配置）
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// 显示 debug 日志
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 交互模式（默认）
    Interactive,
    /// 依次执行 上传 → 生成题目 → 获取答案 → 导出
    Run {
        #[arg(long, default_value = "")]
        topic: String,
        #[arg(long, value_parser = parse_count)]
        count: Option<u32>,
        #[arg(long)]
        marks: Option<Marks>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// 先上传的 PDF
        #[arg(long)]
        upload: Option<PathBuf>,
        /// 同时获取答案
        #[arg(long)]
        answers: bool,
        /// 导出题目 PDF
        #[arg(long)]
        export: bool,
        /// 导出路径（默认使用配置）
        #[arg(long, requires = "export")]
        output: Option<PathBuf>,
    },
}

fn parse_count(value: &str) -> Result<u32, String> {
    quiz_forge::models::question::parse_question_count(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.backend_base_url = base_url;
    }
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logger::init_with_verbose(config.verbose_logging);

    let mut app = App::initialize(config)?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            app.run_interactive(tokio::io::stdin(), tokio::io::stdout())
                .await?;
        }
        Commands::Run {
            topic,
            count,
            marks,
            difficulty,
            upload,
            answers,
            export,
            output,
        } => {
            let summary = app
                .run_once(RunPlan {
                    upload,
                    topic,
                    count,
                    marks,
                    difficulty,
                    answers,
                    export,
                    export_path: output,
                })
                .await;

            println!("{}", app.render());

            if summary.generate != ActionOutcome::Completed {
                bail!("题目生成失败，详见日志");
            }
        }
    }

    Ok(())
}
