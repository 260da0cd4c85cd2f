use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::crop::{remap_landmark, CropRegion};
use super::detector::build_session;
use super::keypoint::FaceMesh;
use super::preprocess::FACE_MESH_INPUT_SIZE;

const INPUT_NAME: &str = "input_1";
/// [1, 1, 1, 1404] = 468 × (x, y, z)、入力ピクセル座標
const LANDMARKS_OUTPUT: &str = "conv2d_21";
/// [1, 1, 1, 1] 顔存在スコア (ロジット)
const FACE_FLAG_OUTPUT: &str = "conv2d_31";

/// MediaPipe face landmark モデル
pub struct FaceMeshDetector {
    session: Session,
    presence_threshold: f32,
}

impl FaceMeshDetector {
    pub fn new<P: AsRef<Path>>(model_path: P, presence_threshold: f32) -> Result<Self> {
        let session = build_session(model_path.as_ref())?;
        Ok(Self {
            session,
            presence_threshold,
        })
    }

    /// 顔クロップのテンソルからランドマークを検出
    ///
    /// 顔スコアが閾値未満なら None（顔なし）。座標はフレーム全体の正規化座標に戻して返す。
    pub fn detect(
        &mut self,
        input: Array4<f32>,
        crop: &CropRegion,
        frame_w: u32,
        frame_h: u32,
    ) -> Result<Option<FaceMesh>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![INPUT_NAME => input_tensor])
            .context("Face mesh inference failed")?;

        let flag: ndarray::ArrayViewD<f32> = outputs[FACE_FLAG_OUTPUT]
            .try_extract_array()
            .context("Failed to extract face flag")?;
        let logit = flag.iter().next().copied().unwrap_or(f32::NEG_INFINITY);
        let presence = 1.0 / (1.0 + (-logit).exp());
        if presence < self.presence_threshold {
            return Ok(None);
        }

        let raw: ndarray::ArrayViewD<f32> = outputs[LANDMARKS_OUTPUT]
            .try_extract_array()
            .context("Failed to extract face landmarks")?;
        let coords: Vec<f32> = raw.iter().copied().collect();
        if coords.len() < FaceMesh::LANDMARK_COUNT * 3 {
            anyhow::bail!("unexpected landmark tensor length {}", coords.len());
        }

        let size = FACE_MESH_INPUT_SIZE as f32;
        let landmarks = coords
            .chunks_exact(3)
            .take(FaceMesh::LANDMARK_COUNT)
            .map(|c| remap_landmark(c[0], c[1], size, crop, frame_w, frame_h))
            .collect();

        Ok(Some(FaceMesh::new(landmarks)))
    }
}
