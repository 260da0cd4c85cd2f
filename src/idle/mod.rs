//! 人がいない間の待機画面
//!
//! 黒背景にノイズ・走査線・二進数の雨などを重ね、最後に案内文を描く。
//! ここの状態は検出にもフィールド配置にも影響しない。

pub mod background;
pub mod constellation;
pub mod grid;
pub mod overlay;
pub mod spectrum;

use rand::Rng;

use crate::render::{Canvas, FrameInfo, Rgba};

pub use background::{BinaryRain, DataStreams, Scanlines, WhiteNoise};
pub use constellation::Constellation;
pub use grid::{BreathingGrid, PingPong};
pub use overlay::{Crosshair, Overlay, QueueNumber};
pub use spectrum::Spectrum;

/// 待機画面の全レイヤー
#[derive(Debug, Clone)]
pub struct IdleScreen {
    noise: WhiteNoise,
    scanlines: Scanlines,
    rain: BinaryRain,
    streams: DataStreams,
    grid: BreathingGrid,
    spectrum: Spectrum,
    constellation: Constellation,
    overlay: Overlay,
}

impl IdleScreen {
    pub fn new<R: Rng>(canvas_size: (f32, f32), camera_resolution: (u32, u32), rng: &mut R) -> Self {
        // 0 幅のキャンバスでも乱数範囲が空にならないように
        let size = (canvas_size.0.max(1.0), canvas_size.1.max(1.0));
        Self {
            noise: WhiteNoise::new(size, rng),
            scanlines: Scanlines::new(),
            rain: BinaryRain::new(size, rng),
            streams: DataStreams::new(size, rng),
            grid: BreathingGrid::new(),
            spectrum: Spectrum::new(rng),
            constellation: Constellation::new(size, rng),
            overlay: Overlay::new(camera_resolution, 0, rng),
        }
    }

    pub fn queue_number(&self) -> u32 {
        self.overlay.queue().value()
    }

    /// 1フレーム進めて描画
    pub fn draw<C: Canvas, R: Rng>(&mut self, canvas: &mut C, info: FrameInfo, rng: &mut R) {
        let (w, h) = canvas.size();
        let size = (w.max(1.0), h.max(1.0));

        self.noise.update(size, rng);
        self.scanlines.update(size, rng);
        self.rain.update(size, rng);
        self.streams.update(size, rng);
        self.grid.update();
        self.spectrum.update(rng);
        self.constellation.update(size, rng);
        self.overlay.update(info.now_ms, rng);

        canvas.clear(Rgba::BLACK);
        self.noise.draw(canvas);
        self.scanlines.draw(canvas);
        self.rain.draw(canvas);
        self.streams.draw(canvas);
        self.grid.draw(canvas);
        self.spectrum.draw(canvas);
        self.constellation.draw(canvas);
        self.overlay.draw(canvas, info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawOp, RecordingCanvas};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_idle_frame_starts_with_black_clear() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut canvas = RecordingCanvas::new(1280.0, 720.0);
        let mut idle = IdleScreen::new(canvas.size(), (640, 480), &mut rng);

        idle.draw(&mut canvas, FrameInfo { now_ms: 0, frame: 0, fps: 0.0 }, &mut rng);
        assert_eq!(canvas.ops[0], DrawOp::Clear(Rgba::BLACK));
        assert!(canvas.ops.iter().all(|op| !matches!(op, DrawOp::Backdrop | DrawOp::Image { .. })));
        assert_eq!(idle.queue_number(), QueueNumber::START);
    }

    #[test]
    fn test_idle_survives_resize() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut idle = IdleScreen::new((1280.0, 720.0), (640, 480), &mut rng);
        let mut small = RecordingCanvas::new(320.0, 200.0);
        for frame in 0..120 {
            let info = FrameInfo { now_ms: frame * 22, frame, fps: 45.0 };
            idle.draw(&mut small, info, &mut rng);
            small.reset();
        }
        let mut zero = RecordingCanvas::new(0.0, 0.0);
        idle.draw(&mut zero, FrameInfo { now_ms: 3000, frame: 121, fps: 45.0 }, &mut rng);
    }
}
