//! SVG document backend.

use std::fmt::Write as _;

use super::backend::{CellRenderData, Palette, RenderBackend};
use crate::error::{GridError, Result};
use crate::types::Size;

const FONT_SIZE: f32 = 12.0;

/// Renders a frame into a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgBackend {
    palette: Palette,
    out: String,
    in_frame: bool,
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palette(palette: Palette) -> Self {
        Self {
            palette,
            ..Self::default()
        }
    }

    /// Document produced by the last complete frame.
    pub fn document(&self) -> &str {
        &self.out
    }

    pub fn into_document(self) -> String {
        self.out
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn fmt_error(_: std::fmt::Error) -> GridError {
    GridError::Render("svg write failed".to_string())
}

impl RenderBackend for SvgBackend {
    fn begin_frame(&mut self, size: Size) -> Result<()> {
        self.out.clear();
        self.in_frame = true;
        write!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height
        )
        .map_err(fmt_error)?;
        write!(
            self.out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape(&self.palette.background)
        )
        .map_err(fmt_error)
    }

    fn draw_cell(&mut self, cell: &CellRenderData) -> Result<()> {
        if !self.in_frame {
            return Err(GridError::Render("draw_cell outside a frame".to_string()));
        }
        let r = cell.rect;
        write!(
            self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}"/>"#,
            r.x,
            r.y,
            r.width,
            r.height,
            escape(self.palette.fill_for(cell)),
            escape(&self.palette.grid_line)
        )
        .map_err(fmt_error)?;

        if let Some(label) = &cell.label {
            write!(
                self.out,
                r#"<text x="{}" y="{}" font-size="{FONT_SIZE}" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                r.x + r.width / 2.0,
                r.y + r.height / 2.0,
                escape(&self.palette.text),
                escape(label)
            )
            .map_err(fmt_error)?;
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.in_frame {
            return Err(GridError::Render("end_frame without begin_frame".to_string()));
        }
        self.in_frame = false;
        self.out.push_str("</svg>");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::{CellRect, Coordinate};

    fn cell(label: Option<&str>) -> CellRenderData {
        CellRenderData {
            coordinate: Coordinate::xy(0, 0),
            column: 0,
            row: 0,
            rect: CellRect::new(0.0, 0.0, 10.0, 20.0),
            label: label.map(str::to_string),
            fill: None,
            has_data: label.is_some(),
        }
    }

    #[test]
    fn test_frame_produces_document() {
        let mut svg = SvgBackend::new();
        svg.begin_frame(Size::new(10.0, 20.0)).unwrap();
        svg.draw_cell(&cell(Some("a<b"))).unwrap();
        svg.end_frame().unwrap();

        let doc = svg.document();
        assert!(doc.starts_with("<svg"));
        assert!(doc.ends_with("</svg>"));
        assert!(doc.contains("a&lt;b"));
        assert!(doc.contains(r##"fill="#F3F6FA""##));
    }

    #[test]
    fn test_draw_outside_frame_fails() {
        let mut svg = SvgBackend::new();
        assert!(matches!(
            svg.draw_cell(&cell(None)),
            Err(GridError::Render(_))
        ));
    }
}
