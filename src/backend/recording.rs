//! In-memory surface that keeps every primitive it receives.
//!
//! Useful for asserting on layout without parsing PDF output, and for diffing layouts while
//! tuning geometry: [`RecordingBackend::finish`] produces a stable, line-oriented trace.

use std::fmt::Write as _;

use genpdf::{Alignment, Size};

use super::{Cell, RenderBackend};
use crate::error::RenderError;
use crate::layout::mm_to_f64;

const SAME_LINE_TOLERANCE_MM: f64 = 0.01;

/// A recorded drawing operation.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// A page was opened; `number` starts at 1.
    BeginPage {
        /// One-based page number.
        number: usize,
        /// Page dimensions.
        size: Size,
    },
    /// A cell was drawn on the most recently opened page.
    Cell(Cell),
}

/// Backend that records operations instead of producing a PDF.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    ops: Vec<DrawOp>,
    pages: usize,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation in emission order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of pages opened so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Cells drawn on the given one-based page.
    pub fn cells_on_page(&self, page: usize) -> Vec<&Cell> {
        let mut current = 0;
        let mut cells = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::BeginPage { number, .. } => current = *number,
                DrawOp::Cell(cell) if current == page => cells.push(cell),
                DrawOp::Cell(_) => {}
            }
        }
        cells
    }

    /// Non-empty cell texts on the given page, grouped into visual lines by their top edge.
    pub fn lines_on_page(&self, page: usize) -> Vec<Vec<String>> {
        let mut lines: Vec<(f64, Vec<String>)> = Vec::new();
        for cell in self.cells_on_page(page) {
            if cell.text.is_empty() {
                continue;
            }
            let top = mm_to_f64(cell.origin.y);
            let same_line = lines
                .last()
                .map_or(false, |(y, _)| (y - top).abs() < SAME_LINE_TOLERANCE_MM);
            if same_line {
                if let Some((_, texts)) = lines.last_mut() {
                    texts.push(cell.text.clone());
                }
            } else {
                lines.push((top, vec![cell.text.clone()]));
            }
        }
        lines.into_iter().map(|(_, texts)| texts).collect()
    }

    /// Every non-empty cell text across all pages, in emission order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Cell(cell) if !cell.text.is_empty() => Some(cell.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn alignment_tag(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "L",
        Alignment::Center => "C",
        Alignment::Right => "R",
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_page(&mut self, size: Size) -> Result<(), RenderError> {
        self.pages += 1;
        self.ops.push(DrawOp::BeginPage {
            number: self.pages,
            size,
        });
        Ok(())
    }

    fn draw_cell(&mut self, cell: &Cell) -> Result<(), RenderError> {
        if self.pages == 0 {
            return Err(RenderError::backend("no page has been started"));
        }
        self.ops.push(DrawOp::Cell(cell.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        let mut trace = String::new();
        for op in &self.ops {
            // Writing into a String cannot fail.
            let _ = match op {
                DrawOp::BeginPage { number, size } => writeln!(
                    trace,
                    "page {} {:.2}x{:.2}",
                    number,
                    mm_to_f64(size.width),
                    mm_to_f64(size.height)
                ),
                DrawOp::Cell(cell) => writeln!(
                    trace,
                    "cell {:.2} {:.2} {:.2} {:.2} {}{}{}{}{} {}pt {:?}",
                    mm_to_f64(cell.origin.x),
                    mm_to_f64(cell.origin.y),
                    mm_to_f64(cell.size.width),
                    mm_to_f64(cell.size.height),
                    alignment_tag(cell.alignment),
                    if cell.border { "|" } else { "" },
                    if cell.fill.is_some() { "#" } else { "" },
                    if cell.style.is_bold() { "B" } else { "" },
                    if cell.style.is_italic() { "I" } else { "" },
                    cell.style.font_size(),
                    cell.text
                ),
            };
        }
        Ok(trace.into_bytes())
    }
}
