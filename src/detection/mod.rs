//! 非同期に届く推論結果を間引いて保持する

pub mod throttle;
#[cfg(feature = "desktop")]
pub mod worker;

use crate::config::DetectionConfig;
use crate::pose::{FaceMesh, Pose};

pub use throttle::RateLimiter;
#[cfg(feature = "desktop")]
pub use worker::{DetectionEvent, InferenceWorker};

/// 最後に採用された推論結果。モデルごとに丸ごと置き換え、履歴は持たない。
#[derive(Debug, Clone, Default)]
pub struct DetectionFrame {
    pub poses: Vec<Pose>,
    pub faces: Vec<FaceMesh>,
    /// poses を採用した時刻 (ms)
    pub body_ms: Option<u64>,
    /// faces を採用した時刻 (ms)
    pub face_ms: Option<u64>,
}

impl DetectionFrame {
    /// 先頭の姿勢
    pub fn pose(&self) -> Option<&Pose> {
        self.poses.first()
    }

    /// 先頭の顔
    pub fn face(&self) -> Option<&FaceMesh> {
        self.faces.first()
    }

    /// 先頭の姿勢に閾値を超えるキーポイントがあるか
    pub fn person_present(&self, confidence_threshold: f32) -> bool {
        self.pose()
            .map(|p| p.any_valid(confidence_threshold))
            .unwrap_or(false)
    }
}

/// 体・顔の推論コールバックを受け、間引いて DetectionFrame を更新する
#[derive(Debug, Clone)]
pub struct DetectionAdapter {
    body: RateLimiter,
    face: RateLimiter,
    frame: DetectionFrame,
}

impl DetectionAdapter {
    pub fn new(body_every: u64, face_every: u64) -> Self {
        Self {
            body: RateLimiter::every(body_every),
            face: RateLimiter::every(face_every),
            frame: DetectionFrame::default(),
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.body_every, config.face_every)
    }

    /// 体の推論結果。採用されたら true。
    pub fn on_body_results(&mut self, poses: Vec<Pose>, now_ms: u64) -> bool {
        if !self.body.admit() {
            return false;
        }
        self.frame.poses = poses;
        self.frame.body_ms = Some(now_ms);
        true
    }

    /// 顔の推論結果。採用されたら true。
    pub fn on_face_results(&mut self, faces: Vec<FaceMesh>, now_ms: u64) -> bool {
        if !self.face.admit() {
            return false;
        }
        self.frame.faces = faces;
        self.frame.face_ms = Some(now_ms);
        true
    }

    pub fn frame(&self) -> &DetectionFrame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Keypoint, KeypointIndex};

    fn pose_with(confidence: f32) -> Pose {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::LeftHip, Keypoint::new(0.5, 0.5, confidence));
        pose
    }

    #[test]
    fn test_body_results_throttled() {
        let mut adapter = DetectionAdapter::new(8, 12);
        assert!(adapter.on_body_results(vec![pose_with(0.9)], 0));
        for i in 1..8 {
            assert!(!adapter.on_body_results(vec![], i * 10));
        }
        // 間引かれた空の結果では置き換わらない
        assert!(adapter.frame().person_present(0.3));
        assert_eq!(adapter.frame().body_ms, Some(0));

        assert!(adapter.on_body_results(vec![], 80));
        assert!(!adapter.frame().person_present(0.3));
        assert_eq!(adapter.frame().body_ms, Some(80));
    }

    #[test]
    fn test_face_and_body_limiters_independent() {
        let mut adapter = DetectionAdapter::new(8, 12);
        let mesh = FaceMesh::new(vec![[0.5, 0.5]; FaceMesh::LANDMARK_COUNT]);
        assert!(adapter.on_face_results(vec![mesh.clone()], 0));
        assert!(adapter.on_body_results(vec![pose_with(0.5)], 0));
        for _ in 1..12 {
            assert!(!adapter.on_face_results(vec![], 5));
        }
        assert!(adapter.frame().face().is_some());
        assert!(adapter.on_face_results(vec![], 100));
        assert!(adapter.frame().face().is_none());
        assert!(adapter.frame().pose().is_some());
    }

    #[test]
    fn test_presence_threshold_is_strict() {
        let mut adapter = DetectionAdapter::new(1, 1);
        adapter.on_body_results(vec![pose_with(0.3)], 0);
        assert!(!adapter.frame().person_present(0.3));
        adapter.on_body_results(vec![pose_with(0.31)], 1);
        assert!(adapter.frame().person_present(0.3));
    }
}
