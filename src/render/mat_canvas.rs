use anyhow::Result;
use opencv::{
    core::{self, Mat, Point, Rect, Scalar, Size, Vec3b, CV_8UC3},
    imgproc,
    prelude::*,
};

use super::{AssetTable, Canvas, HAlign, Rgba, Stroke, TextStyle, VAlign};
use crate::fields::FieldAsset;

const FONT: i32 = imgproc::FONT_HERSHEY_SIMPLEX;
/// Hershey フォントのスケール1.0はおよそ 30px の文字サイズに相当
const FONT_PX_PER_SCALE: f64 = 30.0;

/// 映像が無い時の背景色
const BACKGROUND: Rgba = Rgba::rgb(240, 240, 250);

fn shifted(p: Point, offset: Point) -> Point {
    Point::new(p.x + offset.x, p.y + offset.y)
}

fn scalar(color: Rgba) -> Scalar {
    Scalar::new(color.b as f64, color.g as f64, color.r as f64, 0.0)
}

fn font_scale(size: f32) -> f64 {
    size as f64 / FONT_PX_PER_SCALE
}

fn font_thickness(size: f32) -> i32 {
    ((size / 24.0).round() as i32).max(1)
}

fn intersect(a: Rect, b: Rect) -> Option<Rect> {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);
    (x2 > x1 && y2 > y1).then(|| Rect::new(x1, y1, x2 - x1, y2 - y1))
}

fn log_draw_error(what: &str, result: opencv::Result<()>) {
    if let Err(e) = result {
        tracing::debug!(what, "draw call failed: {}", e);
    }
}

/// OpenCV の BGR Mat に描くキャンバス
///
/// 半透明の図形は、影響範囲を切り出して描き、`add_weighted` で元に戻す。
pub struct MatCanvas {
    mat: Mat,
    video: Option<Mat>,
    assets: AssetTable,
}

impl MatCanvas {
    pub fn new(width: usize, height: usize, assets: AssetTable) -> Result<Self> {
        let mat = Mat::new_rows_cols_with_default(
            height.max(1) as i32,
            width.max(1) as i32,
            CV_8UC3,
            scalar(BACKGROUND),
        )?;
        Ok(Self {
            mat,
            video: None,
            assets,
        })
    }

    /// ウィンドウサイズが変わったら作り直す
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        let (w, h) = (width.max(1) as i32, height.max(1) as i32);
        if self.mat.cols() != w || self.mat.rows() != h {
            self.mat = Mat::new_rows_cols_with_default(h, w, CV_8UC3, scalar(BACKGROUND))?;
            tracing::debug!(width = w, height = h, "canvas resized");
        }
        Ok(())
    }

    /// backdrop() で描くカメラ映像
    pub fn set_video(&mut self, frame: Mat) {
        self.video = Some(frame);
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.mat.cols(), self.mat.rows())
    }

    /// area に drawing を alpha で重ねる。drawing には切り出し領域の原点オフセットが渡る。
    fn blend<F>(&mut self, area: Rect, alpha: u8, drawing: F) -> opencv::Result<()>
    where
        F: FnOnce(&mut Mat, Point) -> opencv::Result<()>,
    {
        if alpha == 0 {
            return Ok(());
        }
        if alpha == 255 {
            return drawing(&mut self.mat, Point::new(0, 0));
        }
        let Some(roi) = intersect(area, self.bounds()) else {
            return Ok(());
        };

        let mut region = Mat::roi_mut(&mut self.mat, roi)?;
        let original = region.try_clone()?;
        let mut layer = original.try_clone()?;
        drawing(&mut layer, Point::new(-roi.x, -roi.y))?;

        let a = alpha as f64 / 255.0;
        let mut mixed = Mat::default();
        core::add_weighted(&layer, a, &original, 1.0 - a, 0.0, &mut mixed, -1)?;
        mixed.copy_to(&mut *region)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> opencv::Result<()> {
        let scale = font_scale(style.size);
        let thickness = font_thickness(style.size);
        let mut baseline = 0;
        let extent = imgproc::get_text_size(text, FONT, scale, thickness, &mut baseline)?;

        let left = match style.h_align {
            HAlign::Left => x,
            HAlign::Center => x - extent.width as f32 / 2.0,
            HAlign::Right => x - extent.width as f32,
        };
        let base_y = match style.v_align {
            VAlign::Top => y + extent.height as f32,
            VAlign::Center => y + extent.height as f32 / 2.0,
            VAlign::Baseline => y,
            VAlign::Bottom => y - baseline as f32,
        };
        let org = Point::new(left.round() as i32, base_y.round() as i32);
        let area = Rect::new(
            org.x - thickness,
            org.y - extent.height - thickness,
            extent.width + thickness * 2,
            extent.height + baseline + thickness * 2,
        );
        let color = scalar(style.color);

        self.blend(area, style.color.a, |img, offset| {
            imgproc::put_text(
                img,
                text,
                shifted(org, offset),
                FONT,
                scale,
                color,
                thickness,
                imgproc::LINE_AA,
                false,
            )
        })
    }

    /// BGRA 画像をアルファ合成
    fn draw_image(&mut self, asset: FieldAsset, x: f32, y: f32) -> opencv::Result<()> {
        let Some(image) = self.assets.get(asset) else {
            return Ok(());
        };
        let (ox, oy) = (x.round() as i32, y.round() as i32);
        let placed = Rect::new(ox, oy, image.cols(), image.rows());
        let Some(area) = intersect(placed, Rect::new(0, 0, self.mat.cols(), self.mat.rows())) else {
            return Ok(());
        };

        let src = image.data_bytes()?;
        let src_stride = image.cols() as usize * 4;
        for row in area.y..area.y + area.height {
            let src_row = (row - oy) as usize * src_stride;
            for col in area.x..area.x + area.width {
                let i = src_row + (col - ox) as usize * 4;
                let alpha = src[i + 3] as u16;
                if alpha == 0 {
                    continue;
                }
                let dst = self.mat.at_2d_mut::<Vec3b>(row, col)?;
                for c in 0..3 {
                    let s = src[i + c] as u16;
                    let d = dst[c] as u16;
                    dst[c] = ((s * alpha + d * (255 - alpha)) / 255) as u8;
                }
            }
        }
        Ok(())
    }

    fn draw_backdrop(&mut self) -> opencv::Result<()> {
        let Some(video) = self.video.as_ref() else {
            return self.mat.set_to(&scalar(BACKGROUND), &core::no_array()).map(|_| ());
        };
        let size = Size::new(self.mat.cols(), self.mat.rows());
        imgproc::resize(video, &mut self.mat, size, 0.0, 0.0, imgproc::INTER_LINEAR)
    }
}

impl Canvas for MatCanvas {
    fn size(&self) -> (f32, f32) {
        (self.mat.cols() as f32, self.mat.rows() as f32)
    }

    fn clear(&mut self, color: Rgba) {
        let result = self.mat.set_to(&scalar(color), &core::no_array()).map(|_| ());
        log_draw_error("clear", result);
    }

    fn backdrop(&mut self) {
        let result = self.draw_backdrop();
        log_draw_error("backdrop", result);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Stroke) {
        let thickness = (stroke.weight.round() as i32).max(1);
        let p1 = Point::new(x1.round() as i32, y1.round() as i32);
        let p2 = Point::new(x2.round() as i32, y2.round() as i32);
        let area = Rect::new(
            p1.x.min(p2.x) - thickness,
            p1.y.min(p2.y) - thickness,
            (p1.x - p2.x).abs() + thickness * 2 + 1,
            (p1.y - p2.y).abs() + thickness * 2 + 1,
        );
        let color = scalar(stroke.color);
        let result = self.blend(area, stroke.color.a, |img, offset| {
            imgproc::line(img, shifted(p1, offset), shifted(p2, offset), color, thickness, imgproc::LINE_AA, 0)
        });
        log_draw_error("line", result);
    }

    fn point(&mut self, x: f32, y: f32, color: Rgba) {
        let (col, row) = (x as i32, y as i32);
        if col < 0 || row < 0 || col >= self.mat.cols() || row >= self.mat.rows() {
            return;
        }
        let a = color.a as u16;
        let src = [color.b as u16, color.g as u16, color.r as u16];
        match self.mat.at_2d_mut::<Vec3b>(row, col) {
            Ok(px) => {
                for c in 0..3 {
                    px[c] = ((src[c] * a + px[c] as u16 * (255 - a)) / 255) as u8;
                }
            }
            Err(e) => tracing::debug!("point failed: {}", e),
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        let r = (radius.round() as i32).max(1);
        let center = Point::new(cx.round() as i32, cy.round() as i32);
        let area = Rect::new(center.x - r - 1, center.y - r - 1, r * 2 + 3, r * 2 + 3);
        let fill = scalar(color);
        let result = self.blend(area, color.a, |img, offset| {
            imgproc::circle(img, shifted(center, offset), r, fill, imgproc::FILLED, imgproc::LINE_AA, 0)
        });
        log_draw_error("circle", result);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, stroke: Stroke) {
        let thickness = (stroke.weight.round() as i32).max(1);
        let rect = Rect::new(x.round() as i32, y.round() as i32, w.round() as i32, h.round() as i32);
        let area = Rect::new(
            rect.x - thickness,
            rect.y - thickness,
            rect.width + thickness * 2 + 1,
            rect.height + thickness * 2 + 1,
        );
        let color = scalar(stroke.color);
        let result = self.blend(area, stroke.color.a, |img, offset| {
            let shifted = Rect::new(rect.x + offset.x, rect.y + offset.y, rect.width, rect.height);
            imgproc::rectangle(img, shifted, color, thickness, imgproc::LINE_8, 0)
        });
        log_draw_error("rect", result);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let result = self.draw_text(text, x, y, style);
        log_draw_error("text", result);
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        let mut baseline = 0;
        imgproc::get_text_size(text, FONT, font_scale(size), font_thickness(size), &mut baseline)
            .map(|s| s.width as f32)
            .unwrap_or(0.0)
    }

    fn image(&mut self, asset: FieldAsset, x: f32, y: f32) {
        let result = self.draw_image(asset, x, y);
        log_draw_error("image", result);
    }

    fn image_size(&self, asset: FieldAsset) -> Option<(f32, f32)> {
        self.assets.size(asset)
    }
}
