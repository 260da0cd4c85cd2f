use crate::render::{Canvas, Rgba, Stroke};

/// low と high の間を step ずつ往復する値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingPong {
    value: f32,
    step: f32,
    low: f32,
    high: f32,
    rising: bool,
}

impl PingPong {
    pub fn new(low: f32, high: f32, step: f32) -> Self {
        Self {
            value: low,
            step,
            low,
            high,
            rising: true,
        }
    }

    pub fn advance(&mut self) -> f32 {
        let delta = if self.rising { self.step } else { -self.step };
        self.value = (self.value + delta).clamp(self.low, self.high);
        if self.value >= self.high {
            self.rising = false;
        } else if self.value <= self.low {
            self.rising = true;
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// 呼吸するように明滅し、正弦波で揺らぐグリッド
#[derive(Debug, Clone)]
pub struct BreathingGrid {
    opacity: PingPong,
    phase: f32,
}

const GRID_SPACING: f32 = 60.0;
const WAVE_AMPLITUDE: f32 = 10.0;
const WAVE_FREQUENCY: f32 = 0.01;
const PHASE_STEP: f32 = 0.01;

impl BreathingGrid {
    pub fn new() -> Self {
        Self {
            opacity: PingPong::new(5.0, 40.0, 2.0),
            phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.opacity.advance();
        self.phase += PHASE_STEP;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        let (w, h) = canvas.size();
        let stroke = Stroke::new(Rgba::white(self.opacity()), 0.5);

        let mut x = 0.0;
        while x < w {
            let offset = (self.phase + x * WAVE_FREQUENCY).sin() * WAVE_AMPLITUDE;
            canvas.line(x + offset, 0.0, x + offset, h, stroke);
            x += GRID_SPACING;
        }

        let mut y = 0.0;
        while y < h {
            let offset = (self.phase + y * WAVE_FREQUENCY).cos() * WAVE_AMPLITUDE;
            canvas.line(0.0, y + offset, w, y + offset, stroke);
            y += GRID_SPACING;
        }
    }
}

impl Default for BreathingGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingCanvas;

    #[test]
    fn test_ping_pong_stays_within_bounds_and_turns() {
        let mut p = PingPong::new(5.0, 40.0, 2.0);
        let values: Vec<f32> = (0..100).map(|_| p.advance()).collect();
        assert!(values.iter().all(|v| (5.0..=40.0).contains(v)));
        assert!(values.contains(&40.0));
        // 上限に着いた後は下がる
        let top = values.iter().position(|v| *v == 40.0).unwrap();
        assert!(values[top + 1] < 40.0);
    }

    #[test]
    fn test_grid_line_count() {
        let mut canvas = RecordingCanvas::new(600.0, 300.0);
        let grid = BreathingGrid::new();
        grid.draw(&mut canvas);
        // 縦 10 本 + 横 5 本
        assert_eq!(canvas.ops.len(), 15);
    }
}
