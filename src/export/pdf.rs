//! 题目导出为 PDF
//!
//! 版式：A4 纵向，14 号字，标题位于 (10mm, 20mm)，第 i 道题位于 (10mm, 30 + 10·i mm)。
//! 不分页，题目过多时超出页面底部，只记录警告。
//!
//! 文档中不写入时间戳或随机 ID，同一题目列表两次导出的字节完全相同。

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// 导出版式参数（单位 mm）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionPdfLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub font_size: i64,
    pub left_mm: f32,
    pub title_top_mm: f32,
    pub first_line_top_mm: f32,
    pub line_step_mm: f32,
}

impl Default for QuestionPdfLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            font_size: 14,
            left_mm: 10.0,
            title_top_mm: 20.0,
            first_line_top_mm: 30.0,
            line_step_mm: 10.0,
        }
    }
}

impl QuestionPdfLayout {
    /// 第 `index` 道题距页面顶部的距离
    pub fn line_top_mm(&self, index: usize) -> f32 {
        self.first_line_top_mm + self.line_step_mm * index as f32
    }

    /// 能完整落在页面内的题目数量
    pub fn lines_per_page(&self) -> usize {
        if self.first_line_top_mm >= self.page_height_mm {
            return 0;
        }
        ((self.page_height_mm - self.first_line_top_mm) / self.line_step_mm).ceil() as usize
    }
}

pub const TITLE: &str = "AI Generated Questions";

const PT_PER_MM: f32 = 72.0 / 25.4;
const FONT_NAME: &[u8] = b"F1";

/// 生成题目 PDF 的字节内容
pub fn build_questions_pdf(questions: &[String], layout: &QuestionPdfLayout) -> AppResult<Vec<u8>> {
    let overflow = questions.len().saturating_sub(layout.lines_per_page());
    if overflow > 0 {
        warn!(
            "⚠️ 共 {} 道题，其中 {} 道超出页面底部（导出不分页）",
            questions.len(),
            overflow
        );
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = text_line(layout, layout.title_top_mm, TITLE);
    for (i, question) in questions.iter().enumerate() {
        let line = format!("{}. {}", i + 1, question);
        operations.extend(text_line(layout, layout.line_top_mm(i), &line));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        (layout.page_width_mm * PT_PER_MM).into(),
        (layout.page_height_mm * PT_PER_MM).into(),
    ];
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// 生成题目 PDF 并写入 `path`
pub async fn save_questions_pdf(
    questions: &[String],
    layout: &QuestionPdfLayout,
    path: &Path,
) -> AppResult<()> {
    let bytes = build_questions_pdf(questions, layout)?;

    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    info!(
        "📥 已导出 {} 道题到 {} ({} 字节)",
        questions.len(),
        path.display(),
        bytes.len()
    );
    Ok(())
}

/// 单行文本：BT /F1 size Tf x y Td (text) Tj ET
fn text_line(layout: &QuestionPdfLayout, top_mm: f32, text: &str) -> Vec<Operation> {
    let x = layout.left_mm * PT_PER_MM;
    let y = (layout.page_height_mm - top_mm) * PT_PER_MM;

    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_NAME.to_vec()),
                Object::Integer(layout.font_size),
            ],
        ),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Helvetica/WinAnsi 只覆盖 Latin-1，其余字符替换为 '?'
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
