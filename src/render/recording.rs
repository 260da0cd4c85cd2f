//! テスト用: 描画命令を記録するだけのキャンバス

use std::collections::HashMap;

use super::{Canvas, Rgba, Stroke, TextStyle};
use crate::fields::FieldAsset;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Rgba),
    Backdrop,
    Line { from: (f32, f32), to: (f32, f32), stroke: Stroke },
    Point { x: f32, y: f32, color: Rgba },
    Circle { cx: f32, cy: f32, radius: f32, color: Rgba },
    Rect { x: f32, y: f32, w: f32, h: f32, stroke: Stroke },
    Text { text: String, x: f32, y: f32, style: TextStyle },
    Image { asset: FieldAsset, x: f32, y: f32 },
}

pub struct RecordingCanvas {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
    sizes: HashMap<FieldAsset, (f32, f32)>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            sizes: HashMap::new(),
        }
    }

    /// 全アセットを同じサイズで持つキャンバス
    pub fn with_all_assets(width: f32, height: f32, size: (f32, f32)) -> Self {
        let mut canvas = Self::new(width, height);
        for asset in FieldAsset::ALL {
            canvas.sizes.insert(asset, size);
        }
        canvas
    }

    pub fn with_assets(width: f32, height: f32, assets: &[(FieldAsset, (f32, f32))]) -> Self {
        let mut canvas = Self::new(width, height);
        canvas.sizes.extend(assets.iter().copied());
        canvas
    }

    /// 描画された画像を順番に
    pub fn images(&self) -> Vec<(FieldAsset, f32, f32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { asset, x, y } => Some((*asset, *x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn backdrop(&mut self) {
        self.ops.push(DrawOp::Backdrop);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Stroke) {
        self.ops.push(DrawOp::Line {
            from: (x1, y1),
            to: (x2, y2),
            stroke,
        });
    }

    fn point(&mut self, x: f32, y: f32, color: Rgba) {
        self.ops.push(DrawOp::Point { x, y, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle { cx, cy, radius, color });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, stroke: Stroke) {
        self.ops.push(DrawOp::Rect { x, y, w, h, stroke });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.len() as f32 * size * 0.5
    }

    fn image(&mut self, asset: FieldAsset, x: f32, y: f32) {
        if self.sizes.contains_key(&asset) {
            self.ops.push(DrawOp::Image { asset, x, y });
        }
    }

    fn image_size(&self, asset: FieldAsset) -> Option<(f32, f32)> {
        self.sizes.get(&asset).copied()
    }
}
