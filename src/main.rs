use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use intake_overlay::app::Installation;
use intake_overlay::camera::ThreadedCamera;
use intake_overlay::config::Config;
use intake_overlay::detection::InferenceWorker;
use intake_overlay::logging;
use intake_overlay::render::{AssetTable, FrameInfo, Key, MatCanvas, MinifbRenderer};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    // ログ出力先が config にあるので、警告はログ初期化後に出す
    let loaded = Config::load(CONFIG_PATH);
    let config = loaded.as_ref().ok().cloned().unwrap_or_default();
    let log_path = logging::init(&config.debug.log_dir)?;
    if let Err(e) = &loaded {
        tracing::warn!("{} not loaded, using defaults: {:#}", CONFIG_PATH, e);
    }
    tracing::info!(log = %log_path.display(), "intake overlay starting");

    let camera = ThreadedCamera::start(&config.camera).context("Failed to start camera")?;
    let (cam_w, cam_h) = camera.resolution();
    tracing::info!("camera resolution: {}x{}", cam_w, cam_h);

    let mut worker = InferenceWorker::start(&config).context("Failed to start inference")?;

    let assets = AssetTable::load(&config.fields.assets_dir);
    let mut window = MinifbRenderer::new(
        &config.window.title,
        config.window.width,
        config.window.height,
        config.window.target_fps,
    )?;
    let (win_w, win_h) = window.size();
    let mut canvas = MatCanvas::new(win_w, win_h, assets)?;
    let mut installation = Installation::new(&config, &canvas, StdRng::from_entropy());

    tracing::info!("running (S: toggle skeleton, Esc: quit)");

    let start = Instant::now();
    let mut last_frame_id = 0u64;
    let mut frame = 0u64;
    let mut fps = 0.0f32;
    let mut fps_frames = 0u32;
    let mut fps_timer = Instant::now();

    while window.is_open() {
        let now_ms = start.elapsed().as_millis() as u64;

        for event in worker.drain() {
            installation.on_event(event, now_ms);
        }

        // 新しいカメラフレームだけを映像と推論に回す
        let frame_id = camera.frame_id();
        if frame_id != last_frame_id {
            if let Some(video) = camera.get_frame() {
                last_frame_id = frame_id;
                if !worker.is_busy() {
                    match video.try_clone() {
                        Ok(copy) => {
                            worker.submit(copy);
                        }
                        Err(e) => tracing::debug!("frame copy failed: {}", e),
                    }
                }
                canvas.set_video(video);
            }
        }

        if window.key_pressed(Key::S) {
            installation.toggle_skeleton();
        }

        let (w, h) = window.size();
        if let Err(e) = canvas.resize(w, h) {
            tracing::warn!("canvas resize failed: {:#}", e);
            continue;
        }

        let mode = installation.frame(&mut canvas, FrameInfo { now_ms, frame, fps });

        if let Err(e) = window.present(canvas.mat()) {
            tracing::warn!("present failed: {:#}", e);
        }

        frame += 1;
        fps_frames += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            fps = fps_frames as f32 / elapsed;
            tracing::debug!(fps, ?mode, queue = installation.queue_number(), "frame stats");
            fps_frames = 0;
            fps_timer = Instant::now();
        }
    }

    tracing::info!(frames = frame, "shutting down");
    Ok(())
}
