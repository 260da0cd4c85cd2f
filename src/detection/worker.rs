use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Result;
use opencv::core::Mat;
use opencv::prelude::*;

use crate::config::Config;
use crate::pose::crop::crop_frame;
use crate::pose::{
    face_region_from_pose, preprocess_for_face_mesh, preprocess_for_movenet, CropRegion, FaceMesh,
    FaceMeshDetector, Pose, PoseDetector,
};

/// 推論スレッドからメインループへの通知（コールバック相当）
#[derive(Debug, Clone)]
pub enum DetectionEvent {
    Body(Vec<Pose>),
    Face(Vec<FaceMesh>),
}

struct InferenceRequest {
    frame: Mat,
    timestamp: Instant,
}

/// Mat の (幅, 高さ)
fn frame_size(frame: &Mat) -> (u32, u32) {
    (frame.cols().max(0) as u32, frame.rows().max(0) as u32)
}

/// 実フレーム上の顔クロップ領域
fn face_region_in_frame(pose: &Pose, frame: &Mat, threshold: f32) -> Option<CropRegion> {
    let (w, h) = frame_size(frame);
    face_region_from_pose(pose, w, h, threshold)
}

/// 別スレッドで体・顔の推論を行うワーカー
pub struct InferenceWorker {
    tx: mpsc::SyncSender<InferenceRequest>,
    rx: mpsc::Receiver<DetectionEvent>,
    in_flight: bool,
    _handle: thread::JoinHandle<()>,
}

impl InferenceWorker {
    /// モデルを読み込んで推論スレッドを起動
    pub fn start(config: &Config) -> Result<Self> {
        let mut pose_detector = PoseDetector::new(&config.models.pose)?;
        tracing::info!(model = %config.models.pose.display(), "pose model loaded");
        let mut face_detector =
            FaceMeshDetector::new(&config.models.face_mesh, config.models.face_presence)?;
        tracing::info!(model = %config.models.face_mesh.display(), "face mesh model loaded");

        let threshold = config.detection.confidence_threshold;

        let (tx, frame_rx) = mpsc::sync_channel::<InferenceRequest>(1);
        let (result_tx, rx) = mpsc::channel::<DetectionEvent>();

        let handle = thread::spawn(move || {
            while let Ok(mut req) = frame_rx.recv() {
                // 溜まっていれば最新だけ処理
                while let Ok(queued) = frame_rx.try_recv() {
                    req = queued;
                }

                let poses = match preprocess_for_movenet(&req.frame)
                    .and_then(|input| pose_detector.detect(input))
                {
                    Ok(pose) => vec![pose],
                    Err(e) => {
                        tracing::warn!("pose inference failed: {:#}", e);
                        Vec::new()
                    }
                };

                // 設定値ではなく実際に届いたフレームの大きさで座標を戻す
                let (frame_w, frame_h) = frame_size(&req.frame);
                let faces = poses
                    .first()
                    .and_then(|pose| face_region_in_frame(pose, &req.frame, threshold))
                    .map(|region| {
                        crop_frame(&req.frame, &region)
                            .and_then(|face| preprocess_for_face_mesh(&face))
                            .and_then(|input| face_detector.detect(input, &region, frame_w, frame_h))
                    })
                    .transpose();
                let faces: Vec<FaceMesh> = match faces {
                    Ok(face) => face.flatten().into_iter().collect(),
                    Err(e) => {
                        tracing::warn!("face mesh inference failed: {:#}", e);
                        Vec::new()
                    }
                };

                tracing::trace!(
                    latency_ms = req.timestamp.elapsed().as_millis() as u64,
                    faces = faces.len(),
                    "inference done"
                );

                if result_tx.send(DetectionEvent::Body(poses)).is_err()
                    || result_tx.send(DetectionEvent::Face(faces)).is_err()
                {
                    break;
                }
            }
            tracing::debug!("inference thread exiting");
        });

        Ok(Self {
            tx,
            rx,
            in_flight: false,
            _handle: handle,
        })
    }

    /// 前回のフレームをまだ処理中か
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// 推論中でなければフレームを渡す。渡せたら true。
    pub fn submit(&mut self, frame: Mat) -> bool {
        if self.in_flight {
            return false;
        }
        let req = InferenceRequest {
            frame,
            timestamp: Instant::now(),
        };
        match self.tx.try_send(req) {
            Ok(()) => {
                self.in_flight = true;
                true
            }
            Err(mpsc::TrySendError::Full(_)) => false,
            Err(mpsc::TrySendError::Disconnected(_)) => {
                tracing::warn!("inference thread disconnected");
                false
            }
        }
    }

    /// 届いている結果をすべて取り出す
    pub fn drain(&mut self) -> Vec<DetectionEvent> {
        let events: Vec<DetectionEvent> = self.rx.try_iter().collect();
        if events.iter().any(|e| matches!(e, DetectionEvent::Face(_))) {
            self.in_flight = false;
        }
        events
    }
}
