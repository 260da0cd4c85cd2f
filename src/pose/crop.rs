#[cfg(feature = "desktop")]
use anyhow::Result;
#[cfg(feature = "desktop")]
use opencv::{
    core::{Mat, Rect},
    prelude::*,
};

use super::keypoint::{KeypointIndex, Pose};

/// 顔クロップの一辺 = 頭部キーポイント範囲 × この倍率
pub const FACE_CROP_SCALE: f32 = 2.2;

/// 顔クロップの最小辺長（ピクセル）
pub const FACE_CROP_MIN_SIDE: f32 = 48.0;

/// クロップ領域（ピクセル座標）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// 頭部キーポイント (鼻・目・耳) から正方形の顔クロップ領域を推定
///
/// 有効なキーポイントが2個未満、またはフレーム内に収まらない場合はNone。
pub fn face_region_from_pose(
    pose: &Pose,
    frame_w: u32,
    frame_h: u32,
    confidence_threshold: f32,
) -> Option<CropRegion> {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0u32;

    for idx in KeypointIndex::HEAD {
        let kp = pose.get(idx);
        if kp.is_valid(confidence_threshold) {
            let px = kp.x * frame_w as f32;
            let py = kp.y * frame_h as f32;
            min_x = min_x.min(px);
            min_y = min_y.min(py);
            max_x = max_x.max(px);
            max_y = max_y.max(py);
            sum_x += px;
            sum_y += py;
            count += 1;
        }
    }

    if count < 2 {
        return None;
    }

    let cx = sum_x / count as f32;
    let cy = sum_y / count as f32;
    let side = ((max_x - min_x).max(max_y - min_y) * FACE_CROP_SCALE).max(FACE_CROP_MIN_SIDE);

    // フレーム境界にクリップ
    let fw = frame_w as f32;
    let fh = frame_h as f32;
    let x = (cx - side / 2.0).max(0.0);
    let y = (cy - side / 2.0).max(0.0);
    let width = side.min(fw - x);
    let height = side.min(fh - y);

    if width < 1.0 || height < 1.0 {
        return None;
    }

    Some(CropRegion {
        x,
        y,
        width,
        height,
    })
}

/// クロップ内のモデル座標 (0..input_size) をフレーム全体の正規化座標に変換
pub fn remap_landmark(
    lx: f32,
    ly: f32,
    input_size: f32,
    crop: &CropRegion,
    frame_w: u32,
    frame_h: u32,
) -> [f32; 2] {
    let x = crop.x + lx / input_size * crop.width;
    let y = crop.y + ly / input_size * crop.height;
    [x / frame_w as f32, y / frame_h as f32]
}

/// フレームからクロップ領域を切り出す
#[cfg(feature = "desktop")]
pub fn crop_frame(frame: &Mat, region: &CropRegion) -> Result<Mat> {
    let roi = Rect::new(
        region.x as i32,
        region.y as i32,
        (region.width as i32).max(1),
        (region.height as i32).max(1),
    );
    let cropped = Mat::roi(frame, roi)?;
    Ok(cropped.try_clone()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn head_pose() -> Pose {
        let mut pose = Pose::default();
        // 640x480 で鼻(320,240)、両耳(300,240)/(340,240)
        pose.set(KeypointIndex::Nose, Keypoint::new(0.5, 0.5, 0.9));
        pose.set(KeypointIndex::LeftEar, Keypoint::new(300.0 / 640.0, 0.5, 0.9));
        pose.set(KeypointIndex::RightEar, Keypoint::new(340.0 / 640.0, 0.5, 0.9));
        pose
    }

    #[test]
    fn test_face_region_centered_on_head() {
        let region = face_region_from_pose(&head_pose(), 640, 480, 0.3).unwrap();
        let side = 40.0 * FACE_CROP_SCALE;
        assert!((region.width - side).abs() < 1e-3);
        assert!((region.x + region.width / 2.0 - 320.0).abs() < 1e-3);
        assert!((region.y + region.height / 2.0 - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_face_region_needs_two_keypoints() {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::Nose, Keypoint::new(0.5, 0.5, 0.9));
        assert!(face_region_from_pose(&pose, 640, 480, 0.3).is_none());
    }

    #[test]
    fn test_face_region_clipped_to_frame() {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::Nose, Keypoint::new(0.0, 0.0, 0.9));
        pose.set(KeypointIndex::LeftEye, Keypoint::new(0.02, 0.02, 0.9));
        let region = face_region_from_pose(&pose, 640, 480, 0.3).unwrap();
        assert_eq!(region.x, 0.0);
        assert_eq!(region.y, 0.0);
        assert!(region.width <= 640.0);
    }

    #[test]
    fn test_remap_landmark() {
        let crop = CropRegion {
            x: 100.0,
            y: 50.0,
            width: 200.0,
            height: 200.0,
        };
        let p = remap_landmark(96.0, 192.0, 192.0, &crop, 640, 480);
        assert!((p[0] - 200.0 / 640.0).abs() < 1e-6);
        assert!((p[1] - 250.0 / 480.0).abs() < 1e-6);
    }
}
