//! Grid <-> canvas rectangle mapping.
//!
//! The drawing canvas knows nothing about cells: it holds a list of filled
//! rectangles in screen space. A grid is shown by projecting every cell to one
//! rectangle, and user edits are folded back by snapping each rectangle's
//! top-left corner to the cell beneath it.

use serde::{Deserialize, Serialize};

use super::{GridSize, PixelGrid, Rgb};
use crate::error::Result;

/// Slack (in cells) when snapping a position to a cell, so that `col * cell`
/// divided back by `cell` never lands just below `col`.
const SNAP_EPSILON: f64 = 1e-6;

pub const RECT_KIND: &str = "rect";

/// One object on the drawing canvas. Unknown keys are ignored on input and
/// every key but `type` may be missing, since only rectangles are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default = "default_true")]
    pub evented: bool,
}

const fn default_true() -> bool {
    true
}

impl Shape {
    /// A rectangle as the canvas creates it when the user draws with a brush.
    pub fn brush_rect(left: f64, top: f64, side: f64, color: Rgb) -> Self {
        let fill = color.to_hex();
        Self {
            kind: RECT_KIND.to_string(),
            left,
            top,
            width: side,
            height: side,
            stroke: Some(fill.clone()),
            fill: Some(fill),
            stroke_width: side,
            selectable: true,
            evented: true,
        }
    }

    pub fn is_rect(&self) -> bool {
        self.kind == RECT_KIND
    }

    /// Cell under this shape's top-left corner, if it is inside an `n`x`n` grid.
    pub fn cell(&self, size: GridSize, display_size: f64) -> Option<(usize, usize)> {
        let cell_size = cell_size(size, display_size);
        let col = snap_to_cell(self.left, cell_size, size)?;
        let row = snap_to_cell(self.top, cell_size, size)?;
        Some((row, col))
    }
}

/// Everything the canvas draws, in its JSON document form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDrawing {
    #[serde(default)]
    pub objects: Vec<Shape>,
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    Rgb::WHITE.to_hex()
}

impl Default for CanvasDrawing {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            background: default_background(),
        }
    }
}

impl CanvasDrawing {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub fn cell_size(size: GridSize, display_size: f64) -> f64 {
    display_size / f64::from(size.get())
}

fn snap_to_cell(pos: f64, cell_size: f64, size: GridSize) -> Option<usize> {
    if !pos.is_finite() || cell_size <= 0.0 {
        return None;
    }
    let idx = (pos / cell_size + SNAP_EPSILON).floor();
    if idx < 0.0 || idx >= f64::from(size.get()) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(idx as usize)
}

/// Render every cell as one non-selectable rectangle, row-major.
pub fn project_grid(grid: &PixelGrid, display_size: f64, grid_stroke: Rgb) -> CanvasDrawing {
    let cell = cell_size(grid.size(), display_size);
    let stroke = grid_stroke.to_hex();
    let objects = grid
        .iter()
        .map(|((row, col), color)| Shape {
            kind: RECT_KIND.to_string(),
            left: col as f64 * cell,
            top: row as f64 * cell,
            width: cell,
            height: cell,
            fill: Some(color.to_hex()),
            stroke: Some(stroke.clone()),
            stroke_width: 1.0,
            selectable: false,
            evented: false,
        })
        .collect();
    CanvasDrawing {
        objects,
        background: default_background(),
    }
}

/// Fold canvas rectangles back into a fresh white grid. Later shapes win on
/// shared cells; shapes outside the grid are dropped. Any rectangle with a
/// missing or malformed fill fails the whole reduction.
pub fn reduce_shapes(shapes: &[Shape], size: GridSize, display_size: f64) -> Result<PixelGrid> {
    let mut grid = PixelGrid::blank(size);
    for shape in shapes.iter().filter(|s| s.is_rect()) {
        let color: Rgb = shape.fill.as_deref().unwrap_or_default().parse()?;
        if let Some((row, col)) = shape.cell(size, display_size) {
            grid.set(row, col, color);
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: f64 = 512.0;

    fn size(n: u32) -> GridSize {
        GridSize::new(n).expect("valid size")
    }

    fn patterned(size: GridSize) -> PixelGrid {
        let mut grid = PixelGrid::blank(size);
        let n = size.cells();
        for row in 0..n {
            for col in 0..n {
                #[allow(clippy::cast_possible_truncation)]
                let color = Rgb::new((row * 4) as u8, (col * 4) as u8, ((row + col) % 256) as u8);
                grid.set(row, col, color);
            }
        }
        grid
    }

    fn edit(left: f64, top: f64, fill: &str) -> Shape {
        let mut shape = Shape::brush_rect(left, top, 32.0, Rgb::WHITE);
        shape.fill = Some(fill.to_string());
        shape
    }

    #[test]
    fn projection_is_row_major_with_cell_geometry() {
        let grid = patterned(size(16));
        let drawing = project_grid(&grid, DISPLAY, Rgb::new(0xDD, 0xDD, 0xDD));
        assert_eq!(drawing.objects.len(), 256);
        let shape = &drawing.objects[16 + 2];
        assert!((shape.left - 64.0).abs() < f64::EPSILON);
        assert!((shape.top - 32.0).abs() < f64::EPSILON);
        assert!((shape.width - 32.0).abs() < f64::EPSILON);
        assert_eq!(shape.fill, grid.get(1, 2).map(Rgb::to_hex));
        assert_eq!(shape.stroke.as_deref(), Some("#dddddd"));
        assert!(!shape.selectable && !shape.evented);
    }

    #[test]
    fn round_trip_for_every_supported_size() {
        for size in GridSize::all() {
            let grid = patterned(size);
            let drawing = project_grid(&grid, DISPLAY, Rgb::WHITE);
            let back = reduce_shapes(&drawing.objects, size, DISPLAY).expect("reduce");
            assert_eq!(back, grid, "size {}", size.get());
        }
    }

    #[test]
    fn round_trip_with_uneven_display_size() {
        for size in GridSize::all() {
            let grid = patterned(size);
            let drawing = project_grid(&grid, 500.0, Rgb::WHITE);
            let back = reduce_shapes(&drawing.objects, size, 500.0).expect("reduce");
            assert_eq!(back, grid, "size {}", size.get());
        }
    }

    #[test]
    fn single_edit_marks_one_cell() {
        let grid = reduce_shapes(&[edit(32.0, 32.0, "#FF0000")], size(16), DISPLAY).unwrap();
        for ((row, col), color) in grid.iter() {
            if (row, col) == (1, 1) {
                assert_eq!(color, Rgb::new(255, 0, 0));
            } else {
                assert_eq!(color, Rgb::WHITE);
            }
        }
    }

    #[test]
    fn later_shape_wins_on_shared_cell() {
        let shapes = [edit(40.0, 70.0, "#FF0000"), edit(33.0, 64.0, "#0000ff")];
        let grid = reduce_shapes(&shapes, size(16), DISPLAY).unwrap();
        assert_eq!(grid.get(2, 1), Some(Rgb::new(0, 0, 255)));
    }

    #[test]
    fn out_of_range_shapes_are_dropped() {
        let shapes = [
            edit(-1.0, 0.0, "#FF0000"),
            edit(0.0, -0.5, "#FF0000"),
            edit(512.0, 0.0, "#FF0000"),
            edit(0.0, 600.0, "#FF0000"),
            edit(f64::NAN, 0.0, "#FF0000"),
        ];
        let grid = reduce_shapes(&shapes, size(16), DISPLAY).unwrap();
        assert!(grid.is_uniform(Rgb::WHITE));
    }

    #[test]
    fn non_rect_objects_are_ignored() {
        let mut circle = edit(0.0, 0.0, "not a color");
        circle.kind = "circle".to_string();
        let grid = reduce_shapes(&[circle], size(8), DISPLAY).unwrap();
        assert!(grid.is_uniform(Rgb::WHITE));
    }

    #[test]
    fn malformed_fill_fails_whole_reduction() {
        let shapes = [edit(0.0, 0.0, "#00FF00"), edit(32.0, 0.0, "green")];
        let err = reduce_shapes(&shapes, size(16), DISPLAY).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn json_tolerates_unknown_fields() {
        let json = r##"{
            "version": "4.4.0",
            "objects": [
                {"type": "rect", "left": 96, "top": 0, "width": 32, "height": 32,
                 "fill": "#123456", "stroke": "#123456", "strokeWidth": 32,
                 "selectable": true, "evented": true, "angle": 0, "opacity": 1,
                 "originX": "left"},
                {"type": "path", "left": 0, "top": 0, "fill": "", "path": []}
            ],
            "background": "#FFFFFF"
        }"##;
        let drawing = CanvasDrawing::from_json(json).expect("parse drawing");
        assert_eq!(drawing.objects.len(), 2);
        let grid = reduce_shapes(&drawing.objects, size(16), DISPLAY).unwrap();
        assert_eq!(grid.get(0, 3), Some(Rgb::new(0x12, 0x34, 0x56)));
    }

    #[test]
    fn json_skips_foreign_objects_without_rect_keys() {
        let json = r##"{
            "objects": [
                {"type": "path", "left": 0, "top": 0, "fill": null, "path": [["M", 1, 2]]},
                {"type": "line", "x1": 0, "y1": 0, "x2": 10, "y2": 10},
                {"type": "rect", "left": 32, "top": 32, "width": 32, "height": 32,
                 "fill": "#FF0000"}
            ]
        }"##;
        let drawing = CanvasDrawing::from_json(json).expect("parse drawing");
        assert_eq!(drawing.objects.len(), 3);
        let grid = reduce_shapes(&drawing.objects, size(16), DISPLAY).unwrap();
        assert_eq!(grid.get(1, 1), Some(Rgb::new(255, 0, 0)));
        assert_eq!(grid.get(0, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn rect_without_fill_is_format_error() {
        for fill in ["", r#","fill":null"#] {
            let json = format!(r#"{{"objects":[{{"type":"rect","left":0,"top":0{fill}}}]}}"#);
            let drawing = CanvasDrawing::from_json(&json).expect("parse drawing");
            let err = reduce_shapes(&drawing.objects, size(8), DISPLAY).unwrap_err();
            assert!(err.is_format(), "fill {fill:?}");
        }
    }

    #[test]
    fn json_keeps_camel_case_keys() {
        let drawing = project_grid(&PixelGrid::blank(size(8)), DISPLAY, Rgb::WHITE);
        let json = drawing.to_json().unwrap();
        assert!(json.contains("\"strokeWidth\":1.0"));
        assert!(json.contains("\"type\":\"rect\""));
        assert_eq!(CanvasDrawing::from_json(&json).unwrap(), drawing);
    }
}
