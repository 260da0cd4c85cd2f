#[cfg(feature = "desktop")]
pub mod assets;
#[cfg(feature = "desktop")]
pub mod mat_canvas;
#[cfg(test)]
pub(crate) mod recording;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

use crate::fields::FieldAsset;

#[cfg(feature = "desktop")]
pub use assets::AssetTable;
#[cfg(feature = "desktop")]
pub use mat_canvas::MatCanvas;
#[cfg(feature = "desktop")]
pub use minifb::Key;
pub use skeleton::{draw_skeleton, SKELETON_CONNECTIONS};
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;

/// RGBA カラー (a: 0=透明, 255=不透明)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// アルファを 0..255 に丸めて差し替え
    pub fn alpha(self, a: f32) -> Self {
        Self {
            a: a.round().clamp(0.0, 255.0) as u8,
            ..self
        }
    }

    /// 白 + 指定アルファ
    pub fn white(a: f32) -> Self {
        Self::WHITE.alpha(a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Baseline,
    Bottom,
}

/// 線の色と太さ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub weight: f32,
}

impl Stroke {
    pub fn new(color: Rgba, weight: f32) -> Self {
        Self { color, weight }
    }
}

/// 文字の大きさ (px)・色・揃え
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgba,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl TextStyle {
    pub fn new(size: f32, color: Rgba) -> Self {
        Self {
            size,
            color,
            h_align: HAlign::Left,
            v_align: VAlign::Baseline,
        }
    }

    pub fn align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }
}

/// 1フレーム分の時刻情報
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// セッション開始からの経過 (ms)
    pub now_ms: u64,
    /// 描画フレーム番号
    pub frame: u64,
    /// 実測FPS
    pub fps: f32,
}

/// 描画先。座標はキャンバスのピクセル、失敗した描画は黙って捨てる。
pub trait Canvas {
    /// キャンバスサイズ (幅, 高さ)
    fn size(&self) -> (f32, f32);

    fn clear(&mut self, color: Rgba);

    /// カメラ映像をキャンバス全体に描画
    fn backdrop(&mut self);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Stroke);

    fn point(&mut self, x: f32, y: f32, color: Rgba);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, stroke: Stroke);

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    fn text_width(&self, text: &str, size: f32) -> f32;

    /// 画像の左上を (x, y) に置く。画像が無ければ何もしない。
    fn image(&mut self, asset: FieldAsset, x: f32, y: f32);

    fn image_size(&self, asset: FieldAsset) -> Option<(f32, f32)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Rgba::white(300.0).a, 255);
        assert_eq!(Rgba::white(-5.0).a, 0);
        assert_eq!(Rgba::rgb(1, 2, 3).alpha(99.6).a, 100);
    }
}
