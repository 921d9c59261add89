//! JavaScript binding.
//!
//! ```javascript
//! import init, { GridHandle, initLogging } from 'gridslice';
//! await init();
//! initLogging();
//! const grid = new GridHandle(canvas, JSON.stringify(config), devicePixelRatio);
//! grid.setCell([1, 2, 0], "hello");
//! grid.render();
//! const hits = await grid.findCells((value, coordinate) => value === "hello");
//! ```

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlCanvasElement;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::layout::StretchMode;
use crate::render::CanvasBackend;
use crate::types::Coordinate;
use crate::view::GridView;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A grid bound to a canvas.
#[wasm_bindgen]
pub struct GridHandle {
    view: GridView<serde_json::Value>,
    backend: CanvasBackend,
}

#[wasm_bindgen]
impl GridHandle {
    /// Build the grid described by `config` (JSON) and draw it onto `canvas`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: &str, dpr: f32) -> Result<GridHandle, JsValue> {
        console_error_panic_hook::set_once();

        let config = GridConfig::from_json(config)?;
        let view = config.build_view()?;
        let backend = CanvasBackend::new(canvas, dpr)?;
        tracing::debug!(dimensions = ?config.dimensions, "grid handle created");
        Ok(Self { view, backend })
    }

    #[wasm_bindgen(js_name = activateView)]
    pub fn activate_view(&self, id: u32) -> Result<(), JsValue> {
        Ok(self.view.activate_view(id)?)
    }

    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&self, value: f32) {
        self.view.set_scale(value);
    }

    #[wasm_bindgen(js_name = scaleToSize)]
    pub fn scale_to_size(&self, width: f32, height: f32) {
        self.view.scale_to_size(width, height);
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.view.resize(width, height);
    }

    /// `"horizontal"` or `"vertical"`.
    #[wasm_bindgen(js_name = setStretch)]
    pub fn set_stretch(&self, mode: &str) -> Result<(), JsValue> {
        let stretch = match mode {
            "horizontal" => StretchMode::Horizontal,
            "vertical" => StretchMode::Vertical,
            other => return Err(js_error(format!("unknown stretch mode: {other}"))),
        };
        self.view.set_stretch_mode(stretch);
        Ok(())
    }

    #[wasm_bindgen(js_name = setScrollable)]
    pub fn set_scrollable(&self, scrollable: bool) {
        self.view.set_scrollable(scrollable);
    }

    /// Set the payload at `coordinate`; `null`/`undefined` clears it.
    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&self, coordinate: Vec<u32>, value: JsValue) -> Result<(), JsValue> {
        let data = if value.is_null() || value.is_undefined() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value::<serde_json::Value>(value)?)
        };
        let editor = self.view.editor();
        editor
            .borrow_mut()
            .set_data(Coordinate::new(coordinate), data)?;
        Ok(())
    }

    /// Payload at `coordinate`, `null` if empty or never observed.
    pub fn cell(&self, coordinate: Vec<u32>) -> Result<JsValue, JsValue> {
        let editor = self.view.editor();
        let data = editor
            .borrow()
            .cell(&Coordinate::new(coordinate))
            .and_then(|c| c.data());
        Ok(serde_wasm_bindgen::to_value(&data)?)
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        Ok(self.view.render(&mut self.backend)?)
    }

    /// Layout of the active view (`null` before the first pass).
    pub fn geometry(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.view.geometry())?)
    }

    /// Resolves with the coordinates of every record for which
    /// `predicate(value, coordinate)` is truthy, in creation order.
    #[wasm_bindgen(js_name = findCells)]
    pub fn find_cells(&self, predicate: js_sys::Function) -> js_sys::Promise {
        let editor = self.view.editor();
        let task = editor.borrow().try_find_by_cell_async(move |cell| {
            let value = cell
                .with_data(|d| serde_wasm_bindgen::to_value(&d))
                .map_err(|e| GridError::Search(e.to_string()))?;
            let coordinate = serde_wasm_bindgen::to_value(cell.position())
                .map_err(|e| GridError::Search(e.to_string()))?;
            let verdict = predicate
                .call2(&JsValue::NULL, &value, &coordinate)
                .map_err(|e| GridError::Search(format!("{e:?}")))?;
            Ok(verdict.is_truthy())
        });

        future_to_promise(async move {
            let found = task.await?;
            let coordinates: Vec<&Coordinate> = found.iter().map(|c| c.position()).collect();
            Ok(serde_wasm_bindgen::to_value(&coordinates)?)
        })
    }
}
