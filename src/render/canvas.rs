//! Canvas 2D rendering backend.
//!
//! Implements the RenderBackend trait using HTML Canvas 2D API via web-sys.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backend::{CellRenderData, Palette, RenderBackend};
use crate::error::{GridError, Result};
use crate::types::Size;

const CELL_PADDING: f64 = 4.0;
const FONT: &str = "12px sans-serif";

pub struct CanvasBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    palette: Palette,
    dpr: f64,
}

impl CanvasBackend {
    /// # Errors
    /// Fails if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, dpr: f32) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GridError::Render("get_context failed".to_string()))?
            .ok_or_else(|| GridError::Render("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Render("not a CanvasRenderingContext2d".to_string()))?;
        Ok(Self {
            canvas,
            ctx,
            palette: Palette::default(),
            dpr: f64::from(dpr.max(1.0)),
        })
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn set_dpr(&mut self, dpr: f32) {
        self.dpr = f64::from(dpr.max(1.0));
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn physical(&self, logical: f32) -> u32 {
        // Clamped to [0, u32::MAX] before the cast
        (f64::from(logical.max(0.0)) * self.dpr)
            .ceil()
            .min(f64::from(u32::MAX)) as u32
    }
}

impl RenderBackend for CanvasBackend {
    fn begin_frame(&mut self, size: Size) -> Result<()> {
        self.canvas.set_width(self.physical(size.width));
        self.canvas.set_height(self.physical(size.height));
        self.ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)
            .map_err(|_| GridError::Render("set_transform failed".to_string()))?;

        self.ctx.set_fill_style_str(&self.palette.background);
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(size.width),
            f64::from(size.height),
        );
        self.ctx.set_font(FONT);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        Ok(())
    }

    fn draw_cell(&mut self, cell: &CellRenderData) -> Result<()> {
        let x = f64::from(cell.rect.x);
        let y = f64::from(cell.rect.y);
        let w = f64::from(cell.rect.width);
        let h = f64::from(cell.rect.height);

        self.ctx.set_fill_style_str(self.palette.fill_for(cell));
        self.ctx.fill_rect(x, y, w, h);
        self.ctx.set_stroke_style_str(&self.palette.grid_line);
        self.ctx.set_line_width(1.0 / self.dpr);
        self.ctx.stroke_rect(x, y, w, h);

        if let Some(label) = &cell.label {
            self.ctx.set_fill_style_str(&self.palette.text);
            let max_width = (w - 2.0 * CELL_PADDING).max(0.0);
            // Text failures are cosmetic
            let _ = self
                .ctx
                .fill_text_with_max_width(label, x + w / 2.0, y + h / 2.0, max_width);
        }
        Ok(())
    }
}
