//! 待機画面の背景レイヤー: ノイズ・走査線・二進数の雨・データストリーム

use rand::Rng;

use crate::render::{Canvas, HAlign, Rgba, Stroke, TextStyle, VAlign};

#[derive(Debug, Clone)]
struct NoisePixel {
    x: f32,
    y: f32,
    opacity: f32,
    life: f32,
}

/// 寿命つきの疎なホワイトノイズ
#[derive(Debug, Clone)]
pub struct WhiteNoise {
    pixels: Vec<NoisePixel>,
}

impl WhiteNoise {
    pub const COUNT: usize = 300;

    pub fn new<R: Rng>(size: (f32, f32), rng: &mut R) -> Self {
        let pixels = (0..Self::COUNT)
            .map(|_| NoisePixel {
                x: rng.gen_range(0.0..size.0),
                y: rng.gen_range(0.0..size.1),
                opacity: rng.gen_range(50.0..200.0),
                life: rng.gen_range(30.0..120.0),
            })
            .collect();
        Self { pixels }
    }

    pub fn update<R: Rng>(&mut self, size: (f32, f32), rng: &mut R) {
        for pixel in &mut self.pixels {
            pixel.life -= 1.0;
            if pixel.life <= 0.0 {
                pixel.x = rng.gen_range(0.0..size.0);
                pixel.y = rng.gen_range(0.0..size.1);
                pixel.opacity = rng.gen_range(30.0..150.0);
                pixel.life = rng.gen_range(20.0..80.0);
            }
        }
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        for pixel in &self.pixels {
            canvas.point(pixel.x, pixel.y, Rgba::white(pixel.opacity));
        }
    }
}

/// 下へ流れる走査線と、たまに走る赤いグリッチ線
#[derive(Debug, Clone)]
pub struct Scanlines {
    y: f32,
    speed: f32,
    glitch: Option<(f32, f32, f32)>,
}

const SCANLINE_WRAP: f32 = 20.0;
const GLITCH_PROBABILITY: f64 = 0.02;

impl Scanlines {
    pub fn new() -> Self {
        Self {
            y: 0.0,
            speed: 2.0,
            glitch: None,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn update<R: Rng>(&mut self, size: (f32, f32), rng: &mut R) {
        self.y += self.speed;
        if self.y > size.1 + SCANLINE_WRAP {
            self.y = -SCANLINE_WRAP;
        }

        self.glitch = if rng.gen_bool(GLITCH_PROBABILITY) {
            Some((
                rng.gen_range(0.0..size.1),
                rng.gen_range(0.0..size.1),
                rng.gen_range(1.0..4.0),
            ))
        } else {
            None
        };
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        let (w, _) = canvas.size();
        canvas.line(0.0, self.y, w, self.y, Stroke::new(Rgba::white(80.0), 2.0));

        // 残像
        for i in 1..4 {
            let y = self.y - i as f32 * 8.0;
            let alpha = 80.0 / (i as f32 * 2.0);
            canvas.line(0.0, y, w, y, Stroke::new(Rgba::white(alpha), 1.0));
        }

        if let Some((y1, y2, weight)) = self.glitch {
            canvas.line(0.0, y1, w, y2, Stroke::new(Rgba::rgba(255, 0, 0, 120), weight));
        }
    }
}

impl Default for Scanlines {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct BinaryDigit {
    x: f32,
    y: f32,
    speed: f32,
    one: bool,
    opacity: f32,
    size: f32,
}

/// 上から下へ落ち続ける 0/1
#[derive(Debug, Clone)]
pub struct BinaryRain {
    digits: Vec<BinaryDigit>,
}

impl BinaryRain {
    pub const COUNT: usize = 200;

    pub fn new<R: Rng>(size: (f32, f32), rng: &mut R) -> Self {
        let (w, h) = size;
        let digits = (0..Self::COUNT)
            .map(|_| BinaryDigit {
                x: rng.gen_range(0.0..w),
                y: rng.gen_range(-h..0.0),
                speed: rng.gen_range(1.0..4.0),
                one: rng.gen_bool(0.5),
                opacity: rng.gen_range(100.0..255.0),
                size: rng.gen_range(8.0..14.0),
            })
            .collect();
        Self { digits }
    }

    pub fn update<R: Rng>(&mut self, size: (f32, f32), rng: &mut R) {
        for digit in &mut self.digits {
            digit.y += digit.speed;
            if digit.y > size.1 + 20.0 {
                digit.y = rng.gen_range(-50.0..0.0);
                digit.x = rng.gen_range(0.0..size.0);
                digit.one = rng.gen_bool(0.5);
            }
        }
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        for digit in &self.digits {
            let style = TextStyle::new(digit.size, Rgba::rgb(0, 255, 0).alpha(digit.opacity * 0.3))
                .align(HAlign::Center, VAlign::Baseline);
            canvas.text(if digit.one { "1" } else { "0" }, digit.x, digit.y, style);
        }
    }
}

#[derive(Debug, Clone)]
struct DataStream {
    x: f32,
    y: f32,
    speed: f32,
    opacity: f32,
    width: f32,
}

/// 右へ流れる短い線分。右端で左に戻り、行を変える。
#[derive(Debug, Clone)]
pub struct DataStreams {
    lines: Vec<DataStream>,
}

const STREAM_LENGTH: f32 = 30.0;

impl DataStreams {
    pub const COUNT: usize = 12;

    pub fn new<R: Rng>(size: (f32, f32), rng: &mut R) -> Self {
        let lines = (0..Self::COUNT)
            .map(|_| DataStream {
                x: rng.gen_range(0.0..size.0),
                y: rng.gen_range(0.0..size.1),
                speed: rng.gen_range(0.5..3.0),
                opacity: rng.gen_range(50.0..255.0),
                width: rng.gen_range(1.0..4.0),
            })
            .collect();
        Self { lines }
    }

    pub fn update<R: Rng>(&mut self, size: (f32, f32), rng: &mut R) {
        for line in &mut self.lines {
            line.x += line.speed;
            if line.x > size.0 + 50.0 {
                line.x = -50.0;
                line.y = rng.gen_range(0.0..size.1);
            }
        }
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        let blue = Rgba::rgb(100, 150, 255);
        for line in &self.lines {
            canvas.line(
                line.x,
                line.y,
                line.x + STREAM_LENGTH,
                line.y,
                Stroke::new(blue.alpha(line.opacity * 0.4), line.width),
            );
            canvas.fill_circle(line.x + STREAM_LENGTH / 2.0, line.y, 1.0, blue.alpha(line.opacity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawOp, RecordingCanvas};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SIZE: (f32, f32) = (800.0, 600.0);

    #[test]
    fn test_noise_respawns_inside_canvas() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut noise = WhiteNoise::new(SIZE, &mut rng);
        for _ in 0..500 {
            noise.update(SIZE, &mut rng);
        }
        for p in &noise.pixels {
            assert!(p.x >= 0.0 && p.x < SIZE.0 && p.y >= 0.0 && p.y < SIZE.1);
            assert!(p.life > 0.0);
        }
    }

    #[test]
    fn test_scanline_wraps_at_bottom() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut scan = Scanlines::new();
        let mut wrapped = false;
        for _ in 0..400 {
            scan.update(SIZE, &mut rng);
            assert!(scan.y() <= SIZE.1 + SCANLINE_WRAP);
            if scan.y() == -SCANLINE_WRAP {
                wrapped = true;
            }
        }
        assert!(wrapped);
    }

    #[test]
    fn test_scanline_draws_main_and_trails() {
        let mut canvas = RecordingCanvas::new(SIZE.0, SIZE.1);
        Scanlines::new().draw(&mut canvas);
        assert_eq!(canvas.ops.len(), 4);
        match &canvas.ops[1] {
            DrawOp::Line { stroke, .. } => assert_eq!(stroke.color.a, 40),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_binary_rain_loops() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut rain = BinaryRain::new(SIZE, &mut rng);
        for _ in 0..1000 {
            rain.update(SIZE, &mut rng);
        }
        assert!(rain.digits.iter().all(|d| d.y <= SIZE.1 + 20.0 && d.y >= -SIZE.1));
    }

    #[test]
    fn test_streams_wrap_to_left() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut streams = DataStreams::new(SIZE, &mut rng);
        for _ in 0..2000 {
            streams.update(SIZE, &mut rng);
            assert!(streams.lines.iter().all(|l| l.x <= SIZE.0 + 50.0 && l.x >= -50.0));
        }
    }
}
