use anyhow::Result;
use ndarray::Array4;
use opencv::{
    core::{AlgorithmHint, Mat, Size, CV_32FC3},
    imgproc,
    prelude::*,
};

/// MoveNet用の入力サイズ
pub const MOVENET_INPUT_SIZE: i32 = 192;

/// FaceMesh用の入力サイズ
pub const FACE_MESH_INPUT_SIZE: i32 = 192;

/// OpenCV Mat を MoveNet用の入力テンソルに変換
///
/// - [1, 192, 192, 3] の f32 テンソル (0.0-255.0)
pub fn preprocess_for_movenet(frame: &Mat) -> Result<Array4<f32>> {
    rgb_tensor(frame, MOVENET_INPUT_SIZE, 1.0)
}

/// 顔クロップを FaceMesh用の入力テンソルに変換
///
/// - [1, 192, 192, 3] の f32 テンソル (0.0-1.0)
pub fn preprocess_for_face_mesh(face: &Mat) -> Result<Array4<f32>> {
    rgb_tensor(face, FACE_MESH_INPUT_SIZE, 1.0 / 255.0)
}

/// BGR -> RGB、正方形にリサイズし、NHWC テンソルに詰める
fn rgb_tensor(frame: &Mat, size: i32, scale: f64) -> Result<Array4<f32>> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0, AlgorithmHint::ALGO_HINT_DEFAULT)?;

    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(size, size),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let mut float_mat = Mat::default();
    resized.convert_to(&mut float_mat, CV_32FC3, scale, 0.0)?;

    let mut tensor = Array4::<f32>::zeros((1, size as usize, size as usize, 3));

    for y in 0..size {
        for x in 0..size {
            let pixel = float_mat.at_2d::<opencv::core::Vec3f>(y, x)?;
            tensor[[0, y as usize, x as usize, 0]] = pixel[0];
            tensor[[0, y as usize, x as usize, 1]] = pixel[1];
            tensor[[0, y as usize, x as usize, 2]] = pixel[2];
        }
    }

    Ok(tensor)
}
