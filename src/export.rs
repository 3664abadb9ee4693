//! PDF export of a generated quiz.
//!
//! Export is split into a pure layout pass (wrapping and pagination in
//! millimetres, measured from the top of the page) and a rendering pass
//! that draws the positioned lines with `printpdf`.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{QuizError, Result};
use crate::quiz::Question;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 15.0;
pub const LINE_HEIGHT_MM: f32 = 7.0;
pub const FONT_SIZE_PT: f32 = 12.0;
const OPTION_INDENT_MM: f32 = 5.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x_mm: f32,
    /// Baseline distance from the top edge.
    pub y_mm: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl ExportedDocument {
    /// Write the document into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!("Exported {} ({} pages)", path.display(), self.page_count);
        Ok(path)
    }
}

/// `"Rust  ownership rules"` -> `"Rust_ownership_rules-mcqs.pdf"`
pub fn file_name_for(topic: &str) -> String {
    let stem = topic.split_whitespace().collect::<Vec<_>>().join("_");
    let stem = if stem.is_empty() { "quiz".to_string() } else { stem };
    format!("{}-mcqs.pdf", stem)
}

struct Cursor {
    pages: Vec<PageLayout>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: MARGIN_MM,
        }
    }

    /// Place a wrapped block, starting a new page if it would cross the
    /// bottom margin.
    fn add(&mut self, text: &str, x_mm: f32, bold: bool) {
        let width = PAGE_WIDTH_MM - MARGIN_MM - x_mm;
        let lines = wrap_text(text, chars_per_line(width));
        let height = lines.len() as f32 * LINE_HEIGHT_MM;
        if self.y + height > PAGE_HEIGHT_MM - MARGIN_MM {
            self.pages.push(PageLayout::default());
            self.y = MARGIN_MM;
        }
        let Some(page) = self.pages.last_mut() else {
            return;
        };
        for (i, line) in lines.into_iter().enumerate() {
            page.lines.push(PlacedLine {
                text: line,
                x_mm,
                y_mm: self.y + i as f32 * LINE_HEIGHT_MM,
                bold,
            });
        }
        self.y += height;
    }

    fn skip(&mut self, mm: f32) {
        self.y += mm;
    }
}

fn chars_per_line(width_mm: f32) -> usize {
    let glyph_mm = FONT_SIZE_PT * AVG_GLYPH_EM * PT_TO_MM;
    ((width_mm / glyph_mm) as usize).max(1)
}

/// Greedy word wrap; words longer than a line are hard-split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out the quiz. Correct options are bold and marked with `*`.
pub fn layout(
    topic: &str,
    questions: &[Question],
    answers: &BTreeMap<usize, String>,
    practice_mode: bool,
) -> DocumentLayout {
    let mut cursor = Cursor::new();
    cursor.add(&format!("MCQs on: {}", topic), MARGIN_MM, true);
    cursor.skip(5.0);

    for (i, question) in questions.iter().enumerate() {
        cursor.add(&format!("Q{}: {}", i + 1, question.prompt), MARGIN_MM, true);
        cursor.skip(2.0);

        for option in &question.options {
            let correct = question.is_correct(&option.key);
            let marker = if correct { "* " } else { "" };
            cursor.add(
                &format!("{}{}) {}", marker, option.key, option.text),
                MARGIN_MM + OPTION_INDENT_MM,
                correct,
            );
            cursor.skip(1.0);
        }

        if practice_mode {
            if let Some(answer) = answers.get(&i) {
                let verdict = if question.is_correct(answer) {
                    "Correct"
                } else {
                    "Incorrect"
                };
                cursor.add(
                    &format!("Your Answer: {} ({})", answer, verdict),
                    MARGIN_MM + OPTION_INDENT_MM,
                    false,
                );
            }
        }
        cursor.skip(8.0);
    }

    DocumentLayout {
        pages: cursor.pages,
    }
}

/// Render the quiz to PDF. Returns `None` when there is nothing to export.
pub fn export(
    topic: &str,
    questions: &[Question],
    answers: &BTreeMap<usize, String>,
    practice_mode: bool,
) -> Result<Option<ExportedDocument>> {
    if questions.is_empty() {
        return Ok(None);
    }
    let layout = layout(topic, questions, answers, practice_mode);
    let bytes = render_pdf(topic, &layout)?;
    Ok(Some(ExportedDocument {
        file_name: file_name_for(topic),
        bytes,
        page_count: layout.page_count(),
    }))
}

fn render_pdf(topic: &str, layout: &DocumentLayout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("MCQs on: {}", topic),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut first = Some((first_page, first_layer));
    for page in &layout.pages {
        let (page_index, layer_index) = match first.take() {
            Some(indices) => indices,
            None => doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"),
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in &page.lines {
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(
                pdf_safe(&line.text),
                FONT_SIZE_PT,
                Mm(line.x_mm),
                Mm(PAGE_HEIGHT_MM - line.y_mm),
                font,
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

/// Built-in PDF fonts only cover Latin-1.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

fn pdf_error<E: std::fmt::Debug>(e: E) -> QuizError {
    QuizError::Export(format!("{:?}", e))
}
