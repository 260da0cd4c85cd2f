use anyhow::{Context, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoCaptureTrait},
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::config::CameraConfig;

/// OpenCV の VideoCapture
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
}

impl OpenCvCamera {
    /// 解像度を指定してカメラを開く。実際の解像度はドライバ次第。
    pub fn open(config: &CameraConfig) -> Result<Self> {
        let mut capture = VideoCapture::new(config.index, VideoCaptureAPIs::CAP_ANY as i32)
            .context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", config.index);
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.height as f64)?;
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        if (width, height) != (config.width, config.height) {
            tracing::warn!(
                requested = %format!("{}x{}", config.width, config.height),
                actual = %format!("{}x{}", width, height),
                "camera resolution differs from config"
            );
        }
        tracing::info!(index = config.index, width, height, fps, "camera opened");

        Ok(Self {
            capture,
            width,
            height,
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// フレームを読み込む（BGR形式）
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        Ok(frame)
    }
}

/// 別スレッドでカメラキャプチャを行い、最新フレームを提供する
pub struct ThreadedCamera {
    latest: Arc<Mutex<Option<Mat>>>,
    frame_id: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    width: u32,
    height: u32,
    handle: Option<thread::JoinHandle<()>>,
}

impl ThreadedCamera {
    pub fn start(config: &CameraConfig) -> Result<Self> {
        let mut camera = OpenCvCamera::open(config)?;
        let (width, height) = camera.resolution();
        let latest = Arc::new(Mutex::new(None::<Mat>));
        let latest_ref = latest.clone();
        let frame_id = Arc::new(AtomicU64::new(0));
        let frame_id_ref = frame_id.clone();
        let running = Arc::new(AtomicBool::new(true));
        let running_ref = running.clone();

        let handle = thread::spawn(move || {
            let mut failures = 0u32;
            while running_ref.load(Ordering::Relaxed) {
                match camera.read_frame() {
                    Ok(frame) => {
                        failures = 0;
                        if let Ok(mut slot) = latest_ref.lock() {
                            *slot = Some(frame);
                        }
                        frame_id_ref.fetch_add(1, Ordering::Release);
                    }
                    Err(e) => {
                        failures += 1;
                        if failures == 1 || failures % 100 == 0 {
                            tracing::warn!(failures, "camera read failed: {:#}", e);
                        }
                        thread::sleep(Duration::from_millis(10));
                    }
                }
            }
            tracing::debug!("camera thread exiting");
        });

        Ok(Self {
            latest,
            frame_id,
            running,
            width,
            height,
            handle: Some(handle),
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 新フレームが到着するたびにインクリメントされる
    pub fn frame_id(&self) -> u64 {
        self.frame_id.load(Ordering::Acquire)
    }

    /// 最新フレーム。初回フレーム到着前は None。
    pub fn get_frame(&self) -> Option<Mat> {
        let guard = self.latest.lock().ok()?;
        guard.as_ref().map(|m| m.clone())
    }
}

impl Drop for ThreadedCamera {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
