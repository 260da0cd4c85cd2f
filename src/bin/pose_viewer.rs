//! カメラ映像に骨格と顔ランドマークを重ねて表示する確認用ビューア

use anyhow::Result;
use std::time::Instant;

use intake_overlay::camera::OpenCvCamera;
use intake_overlay::config::Config;
use intake_overlay::pose::crop::crop_frame;
use intake_overlay::pose::{
    face_region_from_pose, preprocess_for_face_mesh, preprocess_for_movenet, FaceMeshDetector,
    PoseDetector,
};
use intake_overlay::render::{draw_skeleton, AssetTable, Canvas, MatCanvas, MinifbRenderer, Rgba, Stroke};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load_or_default(CONFIG_PATH);
    let threshold = config.detection.confidence_threshold;

    let mut camera = OpenCvCamera::open(&config.camera)?;
    let (width, height) = camera.resolution();

    let mut pose_detector = PoseDetector::new(&config.models.pose)?;
    let mut face_detector = FaceMeshDetector::new(&config.models.face_mesh, config.models.face_presence)?;
    tracing::info!("models loaded, press ESC to exit");

    let mut window = MinifbRenderer::new("Pose Viewer", width as usize, height as usize, 60)?;
    let mut canvas = MatCanvas::new(width as usize, height as usize, AssetTable::default())?;

    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    while window.is_open() {
        let frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("frame capture error: {:#}", e);
                continue;
            }
        };

        let pose = pose_detector.detect(preprocess_for_movenet(&frame)?)?;
        let face = match face_region_from_pose(&pose, width, height, threshold) {
            Some(region) => {
                let input = preprocess_for_face_mesh(&crop_frame(&frame, &region)?)?;
                let mesh = face_detector.detect(input, &region, width, height)?;
                Some((region, mesh))
            }
            None => None,
        };

        let (w, h) = window.size();
        canvas.resize(w, h)?;
        canvas.set_video(frame);
        canvas.backdrop();

        if let Some((region, mesh)) = &face {
            let (sx, sy) = (w as f32 / width as f32, h as f32 / height as f32);
            canvas.stroke_rect(
                region.x * sx,
                region.y * sy,
                region.width * sx,
                region.height * sy,
                Stroke::new(Rgba::rgb(255, 255, 0), 1.0),
            );
            for [lx, ly] in mesh.iter().flat_map(|m| m.landmarks.iter()) {
                canvas.fill_circle(lx * w as f32, ly * h as f32, 1.0, Rgba::rgb(0, 255, 0));
            }
        }
        draw_skeleton(&mut canvas, &pose, threshold);
        window.present(canvas.mat())?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            tracing::info!(
                "FPS: {:.1}, avg confidence: {:.2}, face: {}",
                frame_count as f32 / elapsed,
                pose.average_confidence(),
                face.as_ref().is_some_and(|(_, m)| m.is_some())
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    Ok(())
}
