//! Aspect-preserving uniform grid layout.

use serde::{Deserialize, Serialize};

use super::{GridGeometry, PlacedCell};
use crate::editor::CellConfig;
use crate::error::{GridError, Result};
use crate::mapper::ViewMapper;
use crate::types::{CellRect, Coordinate, Size};

/// Which container dimension drives the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StretchMode {
    /// Cell width = container width / columns; height follows the aspect ratio.
    #[default]
    Horizontal,
    /// Cell height = container height / rows; width follows the aspect ratio.
    Vertical,
}

/// Cell size for `container` under `config`, scale applied.
///
/// 1. Raw size from the stretch axis: `width = container.width / columns`,
///    `height = width / aspect` (or the vertical counterpart)
/// 2. Clamp up to the minimum size; the other dimension is rescaled by the
///    same ratio so the aspect ratio holds
/// 3. Multiply both dimensions by the scale
pub fn cell_size_for(container: Size, config: &CellConfig, stretch: StretchMode) -> Size {
    let aspect = sanitized_aspect(config.aspect_ratio);
    let raw = raw_cell_size(container, config, stretch);
    clamp_to_min(raw, config.min_cell_size, aspect).scaled(config.scale)
}

fn sanitized_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

fn raw_cell_size(container: Size, config: &CellConfig, stretch: StretchMode) -> Size {
    let aspect = sanitized_aspect(config.aspect_ratio);
    match stretch {
        StretchMode::Horizontal => {
            let width = if config.column_count == 0 {
                0.0
            } else {
                container.width.max(0.0) / config.column_count as f32
            };
            Size::new(width, width / aspect)
        }
        StretchMode::Vertical => {
            let height = if config.row_count == 0 {
                0.0
            } else {
                container.height.max(0.0) / config.row_count as f32
            };
            Size::new(aspect * height, height)
        }
    }
}

fn clamp_to_min(size: Size, min: Option<Size>, aspect: f32) -> Size {
    let Some(min) = min else {
        return size;
    };
    let mut width = size.width;
    let mut height = size.height;

    if width < min.width {
        height = if width > 0.0 {
            height * (min.width / width)
        } else {
            min.width / aspect
        };
        width = min.width;
    }
    if height < min.height {
        width = if height > 0.0 {
            width * (min.height / height)
        } else {
            min.height * aspect
        };
        height = min.height;
    }
    Size::new(width, height)
}

/// What the previous pass was computed from.
#[derive(Debug, Clone, Copy)]
struct LayoutMemo {
    container: Size,
    config: CellConfig,
    stretch: StretchMode,
    /// Un-clamped, un-scaled size derived from `container`.
    raw: Size,
}

/// Stateful layout pass: remembers the last computation so container resizes
/// carry the cell size forward instead of recomputing from scratch.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    stretch: StretchMode,
    fixed_size: Option<Size>,
    memo: Option<LayoutMemo>,
}

impl GridLayout {
    pub fn new(stretch: StretchMode) -> Self {
        Self {
            stretch,
            fixed_size: None,
            memo: None,
        }
    }

    pub fn stretch_mode(&self) -> StretchMode {
        self.stretch
    }

    pub fn set_stretch_mode(&mut self, stretch: StretchMode) {
        self.stretch = stretch;
    }

    /// Pin the container size, ignoring the real container from now on.
    ///
    /// Each dimension is taken as absolute and floored at 1.
    pub fn scale_to_size(&mut self, width: f32, height: f32) {
        self.fixed_size = Some(Size::new(width.abs().max(1.0), height.abs().max(1.0)));
    }

    pub fn clear_fixed_size(&mut self) {
        self.fixed_size = None;
    }

    pub fn fixed_size(&self) -> Option<Size> {
        self.fixed_size
    }

    /// Container size a pass would use for `container`.
    pub fn effective_container(&self, container: Size) -> Size {
        self.fixed_size.unwrap_or(container)
    }

    /// Cell size of the previous pass, scale applied.
    pub fn cell_size(&self) -> Option<Size> {
        self.memo.map(|m| {
            clamp_to_min(
                m.raw,
                m.config.min_cell_size,
                sanitized_aspect(m.config.aspect_ratio),
            )
            .scaled(m.config.scale)
        })
    }

    /// Lay out `coordinates` (render order) of a view described by `mapper`
    /// and `config` inside `container`.
    ///
    /// Column and row of every cell come from its coordinate through the
    /// mapper's axes, not from its position in the list.
    ///
    /// # Errors
    /// - `LayoutInconsistent` if there are not exactly `columns x rows` cells
    /// - `AxisOutOfRange` if a coordinate lacks one of the mapper's axes
    pub fn arrange(
        &mut self,
        coordinates: &[Coordinate],
        mapper: &ViewMapper,
        config: &CellConfig,
        container: Size,
    ) -> Result<GridGeometry> {
        let expected = config.cell_count();
        if coordinates.len() != expected {
            return Err(GridError::LayoutInconsistent {
                expected,
                actual: coordinates.len(),
            });
        }

        let container = self.effective_container(container);
        let raw = match self.memo {
            Some(memo) if memo.stretch == self.stretch && memo.config.same_geometry(config) => {
                self.carry_forward(&memo, container, config)
            }
            _ => raw_cell_size(container, config, self.stretch),
        };
        self.memo = Some(LayoutMemo {
            container,
            config: *config,
            stretch: self.stretch,
            raw,
        });

        let aspect = sanitized_aspect(config.aspect_ratio);
        let cell = clamp_to_min(raw, config.min_cell_size, aspect).scaled(config.scale);
        tracing::debug!(
            container_width = container.width,
            container_height = container.height,
            cell_width = cell.width,
            cell_height = cell.height,
            "cell size"
        );

        let cells = coordinates
            .iter()
            .map(|coordinate| {
                let column = mapper.column_of(coordinate).ok_or(GridError::AxisOutOfRange {
                    axis: mapper.horizontal_axis(),
                    dimensions: coordinate.dimensions(),
                })?;
                let row = mapper.row_of(coordinate).ok_or(GridError::AxisOutOfRange {
                    axis: mapper.vertical_axis(),
                    dimensions: coordinate.dimensions(),
                })?;
                Ok(PlacedCell {
                    coordinate: coordinate.clone(),
                    column,
                    row,
                    rect: CellRect::new(
                        column as f32 * cell.width,
                        row as f32 * cell.height,
                        cell.width,
                        cell.height,
                    ),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GridGeometry::new(
            cell,
            config.column_count,
            config.row_count,
            cells,
        ))
    }

    /// Previous raw size rescaled by the container delta along the stretch axis.
    fn carry_forward(&self, memo: &LayoutMemo, container: Size, config: &CellConfig) -> Size {
        if memo.container.same_as(container) {
            return memo.raw;
        }
        let ratio = match self.stretch {
            StretchMode::Horizontal => container.width / memo.container.width,
            StretchMode::Vertical => container.height / memo.container.height,
        };
        if ratio.is_finite() && ratio > 0.0 {
            memo.raw.scaled(ratio)
        } else {
            raw_cell_size(container, config, self.stretch)
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn config(aspect: f32, min: Option<Size>, scale: f32, cols: u32, rows: u32) -> CellConfig {
        CellConfig {
            aspect_ratio: aspect,
            min_cell_size: min,
            scale,
            column_count: cols,
            row_count: rows,
        }
    }

    fn coords(cols: u32, rows: u32) -> Vec<Coordinate> {
        ViewMapper::identity_2d()
            .traverse(cols, rows)
            .map(|(c, r)| Coordinate::xy(c, r))
            .collect()
    }

    #[test]
    fn test_horizontal_stretch_no_clamp() {
        let cfg = config(2.0, Some(Size::new(40.0, 40.0)), 1.0, 3, 1);
        let size = cell_size_for(Size::new(300.0, 100.0), &cfg, StretchMode::Horizontal);
        assert_eq!(size, Size::new(100.0, 50.0));
    }

    #[test]
    fn test_scale_applied_after_clamp() {
        let cfg = config(2.0, Some(Size::new(40.0, 40.0)), 2.0, 3, 1);
        let size = cell_size_for(Size::new(300.0, 100.0), &cfg, StretchMode::Horizontal);
        assert_eq!(size, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_vertical_stretch() {
        let cfg = config(0.5, None, 1.0, 4, 2);
        let size = cell_size_for(Size::new(1000.0, 100.0), &cfg, StretchMode::Vertical);
        assert_eq!(size, Size::new(25.0, 50.0));
    }

    #[test]
    fn test_min_clamp_keeps_aspect() {
        // raw 10x5 -> width clamped to 40, height follows to 20, then height
        // clamped to 30 and width follows to 60
        let cfg = config(2.0, Some(Size::new(40.0, 30.0)), 1.0, 10, 1);
        let size = cell_size_for(Size::new(100.0, 100.0), &cfg, StretchMode::Horizontal);
        assert_eq!(size, Size::new(60.0, 30.0));
        assert!((size.width / size.height - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_container_falls_back_to_min() {
        let cfg = config(2.0, Some(Size::new(40.0, 10.0)), 1.0, 3, 3);
        let size = cell_size_for(Size::ZERO, &cfg, StretchMode::Horizontal);
        assert_eq!(size, Size::new(40.0, 20.0));
    }

    #[test]
    fn test_arrange_places_by_coordinate() {
        let mut layout = GridLayout::default();
        let cfg = config(1.0, None, 1.0, 3, 2);
        let geometry = layout
            .arrange(
                &coords(3, 2),
                &ViewMapper::identity_2d(),
                &cfg,
                Size::new(300.0, 200.0),
            )
            .unwrap();

        assert_eq!(geometry.cell_size, Size::new(100.0, 100.0));
        assert_eq!(
            geometry.rect_at(2, 1),
            Some(CellRect::new(200.0, 100.0, 100.0, 100.0))
        );
        assert_eq!(geometry.content_size(), Size::new(300.0, 200.0));
        assert_eq!(geometry.cell_at_point(250.0, 150.0), Some((2, 1)));
        assert_eq!(geometry.cell_at_point(350.0, 150.0), None);
    }

    #[test]
    fn test_arrange_rejects_incomplete_grid() {
        let mut layout = GridLayout::default();
        let cfg = config(1.0, None, 1.0, 3, 2);
        let mut partial = coords(3, 2);
        partial.pop();
        let err = layout
            .arrange(&partial, &ViewMapper::identity_2d(), &cfg, Size::new(10.0, 10.0))
            .unwrap_err();
        assert!(matches!(
            err,
            GridError::LayoutInconsistent {
                expected: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_resize_carries_cell_size_forward() {
        let mut layout = GridLayout::default();
        let cfg = config(2.0, None, 1.0, 3, 1);
        let mapper = ViewMapper::identity_2d();
        let cells = coords(3, 1);

        layout
            .arrange(&cells, &mapper, &cfg, Size::new(300.0, 100.0))
            .unwrap();
        let grown = layout
            .arrange(&cells, &mapper, &cfg, Size::new(600.0, 100.0))
            .unwrap();
        assert_eq!(grown.cell_size, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_fixed_size_overrides_container() {
        let mut layout = GridLayout::default();
        layout.scale_to_size(-90.0, 0.0);
        assert_eq!(layout.fixed_size(), Some(Size::new(90.0, 1.0)));

        let cfg = config(1.0, None, 1.0, 3, 1);
        let geometry = layout
            .arrange(
                &coords(3, 1),
                &ViewMapper::identity_2d(),
                &cfg,
                Size::new(3000.0, 3000.0),
            )
            .unwrap();
        assert_eq!(geometry.cell_size, Size::new(30.0, 30.0));
    }
}
