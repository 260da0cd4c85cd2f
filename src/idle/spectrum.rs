use rand::Rng;

use crate::render::{Canvas, Rgba, Stroke};

const BAR_COUNT: usize = 64;
const SIDE_MARGIN: f32 = 50.0;
const BASELINE_OFFSET: f32 = 20.0;
const MAX_HEIGHT: f32 = 60.0;
const EASE: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Bar {
    level: f32,
    height: f32,
}

/// 画面下部の擬似スペクトラム。レベルはランダムウォーク、高さはそれを追従する。
#[derive(Debug, Clone)]
pub struct Spectrum {
    bars: Vec<Bar>,
}

impl Spectrum {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let bars = (0..BAR_COUNT)
            .map(|_| Bar {
                level: rng.gen_range(0.1..1.0),
                height: 0.0,
            })
            .collect();
        Self { bars }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        for bar in &mut self.bars {
            bar.level = (bar.level + rng.gen_range(-0.1..0.1)).clamp(0.1, 1.0);
            let target = bar.level * MAX_HEIGHT;
            bar.height += (target - bar.height) * EASE;
        }
    }

    /// i 本目の x 座標 (左右 50px を空けて等間隔)
    pub fn bar_x(index: usize, width: f32) -> f32 {
        let t = index as f32 / (BAR_COUNT - 1) as f32;
        SIDE_MARGIN + t * (width - 2.0 * SIDE_MARGIN)
    }

    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.bars.iter().map(|b| b.height)
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        let (w, h) = canvas.size();
        let base = h - BASELINE_OFFSET;
        let stroke = Stroke::new(Rgba::white(100.0), 2.0);
        for (i, bar) in self.bars.iter().enumerate() {
            let x = Self::bar_x(i, w);
            canvas.line(x, base, x, base - bar.height, stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bar_positions_span_margins() {
        assert_eq!(Spectrum::bar_x(0, 1000.0), 50.0);
        assert!((Spectrum::bar_x(63, 1000.0) - 950.0).abs() < 1e-3);
    }

    #[test]
    fn test_heights_stay_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut spectrum = Spectrum::new(&mut rng);
        for _ in 0..500 {
            spectrum.update(&mut rng);
            for bar in &spectrum.bars {
                assert!((0.1..=1.0).contains(&bar.level));
            }
        }
        assert!(spectrum.heights().all(|h| (0.0..=MAX_HEIGHT).contains(&h)));
        assert!(spectrum.heights().all(|h| h > 0.0));
    }
}
