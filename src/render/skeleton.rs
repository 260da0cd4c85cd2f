use super::{Canvas, Rgba, Stroke};
use crate::pose::{KeypointIndex, Pose};

/// 骨格の接続定義 (開始キーポイント, 終了キーポイント)。顔は含まない。
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 12] = [
    // 上半身
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftWrist),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
    // 胴体
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftHip),
    (KeypointIndex::RightShoulder, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::RightHip),
    // 下半身
    (KeypointIndex::LeftHip, KeypointIndex::LeftKnee),
    (KeypointIndex::LeftKnee, KeypointIndex::LeftAnkle),
    (KeypointIndex::RightHip, KeypointIndex::RightKnee),
    (KeypointIndex::RightKnee, KeypointIndex::RightAnkle),
];

/// 骨格線の色
pub const SKELETON_COLOR: Rgba = Rgba::rgba(255, 100, 100, 150);

pub const SKELETON_WEIGHT: f32 = 3.0;

/// 両端が閾値を超えている接続だけ描画
pub fn draw_skeleton<C: Canvas>(canvas: &mut C, pose: &Pose, confidence_threshold: f32) {
    let (w, h) = canvas.size();
    let stroke = Stroke::new(SKELETON_COLOR, SKELETON_WEIGHT);

    for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
        let start = pose.get(*start_idx);
        let end = pose.get(*end_idx);

        if start.is_valid(confidence_threshold) && end.is_valid(confidence_threshold) {
            let (x1, y1) = start.to_canvas(w, h);
            let (x2, y2) = end.to_canvas(w, h);
            canvas.line(x1, y1, x2, y2, stroke);
        }
    }
}
