//! 终端视图
//!
//! 把 `SessionState` 渲染成文本，并列出当前可见的控件及其可用状态

use crate::session::SessionState;

pub const APP_TITLE: &str = "📄 AI Question Generator + Answer Finder";

/// 界面上的控件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Upload,
    GenerateQuestions,
    ShowAnswers,
    DownloadPdf,
}

/// 控件及其状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub kind: ControlKind,
    pub label: &'static str,
    pub enabled: bool,
}

/// 当前可见的控件
///
/// "Show Answers" 与 "Download as PDF" 只在有题目时出现
pub fn controls(state: &SessionState) -> Vec<Control> {
    let mut controls = vec![
        Control {
            kind: ControlKind::Upload,
            label: "📂 Upload PDF",
            enabled: true,
        },
        Control {
            kind: ControlKind::GenerateQuestions,
            label: if state.generating().is_pending() {
                "⏳ Generating..."
            } else {
                "🎯 Generate Questions"
            },
            enabled: state.can_generate(),
        },
    ];

    if state.shows_answer_control() {
        controls.push(Control {
            kind: ControlKind::ShowAnswers,
            label: if state.answering().is_pending() {
                "⏳ Fetching Answers..."
            } else {
                "✅ Show Answers"
            },
            enabled: state.can_show_answers(),
        });
        controls.push(Control {
            kind: ControlKind::DownloadPdf,
            label: "📥 Download as PDF",
            enabled: true,
        });
    }

    controls
}

/// 查找某个控件，不可见时返回 None
pub fn control(state: &SessionState, kind: ControlKind) -> Option<Control> {
    controls(state).into_iter().find(|c| c.kind == kind)
}

/// 渲染整个界面
pub fn render(state: &SessionState) -> String {
    let mut out = String::new();
    out.push_str(APP_TITLE);
    out.push('\n');

    let file = state
        .selected_file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    out.push_str(&format!("📂 PDF: {}\n", file));
    out.push_str(&format!(
        "🎯 Topic: {} | Questions: {} | {} | {}\n",
        if state.topic().is_empty() { "(empty)" } else { state.topic() },
        state.num_questions(),
        state.marks().label(),
        state.difficulty()
    ));

    if let Some(notice) = state.notice() {
        out.push_str(notice);
        out.push('\n');
    }

    if !state.questions().is_empty() {
        out.push_str("\n📝 Questions:\n");
        for (i, q) in state.questions().iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, q));
        }
    }

    if !state.answers().is_empty() {
        out.push_str("\n📘 Answers:\n");
        for (i, a) in state.answers().iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, a));
        }
    }

    let labels: Vec<String> = controls(state)
        .iter()
        .map(|c| {
            if c.enabled {
                format!("[{}]", c.label)
            } else {
                format!("[{} (disabled)]", c.label)
            }
        })
        .collect();
    out.push('\n');
    out.push_str(&labels.join(" "));
    out.push('\n');

    out
}
