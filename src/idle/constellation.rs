use rand::Rng;

use crate::render::{Canvas, Rgba, Stroke};

const POINT_COUNT: usize = 50;
const EASE: f32 = 0.02;
const RETARGET_DISTANCE: f32 = 5.0;
const LINK_DISTANCE: f32 = 80.0;

#[derive(Debug, Clone, Copy)]
struct DataPoint {
    x: f32,
    y: f32,
    target_x: f32,
    target_y: f32,
    size: f32,
    opacity: f32,
}

/// 中央付近を漂い、近い点同士を線でつなぐ点群
#[derive(Debug, Clone)]
pub struct Constellation {
    points: Vec<DataPoint>,
}

fn random_target<R: Rng>(size: (f32, f32), rng: &mut R) -> (f32, f32) {
    let (w, h) = size;
    (
        rng.gen_range(w * 0.2..=w * 0.8),
        rng.gen_range(h * 0.3..=h * 0.7),
    )
}

impl Constellation {
    pub fn new<R: Rng>(size: (f32, f32), rng: &mut R) -> Self {
        let points = (0..POINT_COUNT)
            .map(|_| {
                let (x, y) = random_target(size, rng);
                let (target_x, target_y) = random_target(size, rng);
                DataPoint {
                    x,
                    y,
                    target_x,
                    target_y,
                    size: rng.gen_range(2.0..8.0),
                    opacity: rng.gen_range(100.0..255.0),
                }
            })
            .collect();
        Self { points }
    }

    pub fn update<R: Rng>(&mut self, size: (f32, f32), rng: &mut R) {
        for point in &mut self.points {
            point.x += (point.target_x - point.x) * EASE;
            point.y += (point.target_y - point.y) * EASE;

            let d = (point.target_x - point.x).hypot(point.target_y - point.y);
            if d < RETARGET_DISTANCE {
                let (tx, ty) = random_target(size, rng);
                point.target_x = tx;
                point.target_y = ty;
            }
        }
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        for (i, point) in self.points.iter().enumerate() {
            canvas.fill_circle(point.x, point.y, point.size / 2.0, Rgba::white(point.opacity * 0.3));

            for other in &self.points[i + 1..] {
                let d = (point.x - other.x).hypot(point.y - other.y);
                if d > 0.0 && d < LINK_DISTANCE {
                    let stroke = Stroke::new(Rgba::white((LINK_DISTANCE - d) * 2.0), 0.5);
                    canvas.line(point.x, point.y, other.x, other.y, stroke);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawOp, RecordingCanvas};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SIZE: (f32, f32) = (1000.0, 800.0);

    fn in_central_region(x: f32, y: f32) -> bool {
        (200.0..=800.0).contains(&x) && (240.0..=560.0).contains(&y)
    }

    #[test]
    fn test_points_stay_in_central_region() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut constellation = Constellation::new(SIZE, &mut rng);
        for _ in 0..1000 {
            constellation.update(SIZE, &mut rng);
        }
        for p in &constellation.points {
            assert!(in_central_region(p.x, p.y), "({}, {})", p.x, p.y);
            assert!(in_central_region(p.target_x, p.target_y));
        }
    }

    #[test]
    fn test_links_only_close_pairs() {
        let mut rng = StdRng::seed_from_u64(6);
        let constellation = Constellation::new(SIZE, &mut rng);
        let mut canvas = RecordingCanvas::new(SIZE.0, SIZE.1);
        constellation.draw(&mut canvas);

        let circles = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count();
        assert_eq!(circles, POINT_COUNT);

        for op in &canvas.ops {
            if let DrawOp::Line { from, to, .. } = op {
                let d = (from.0 - to.0).hypot(from.1 - to.1);
                assert!(d < LINK_DISTANCE);
            }
        }
    }
}
