use rand::Rng;

use super::catalog::BODY_FIELDS;
use super::cycle::RandomCycle;
use super::FieldAsset;
use crate::pose::{KeypointIndex, Pose};
use crate::render::Canvas;

/// 体キーポイントから求めたフィールドの移動範囲（キャンバス座標）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BodyBounds {
    /// 顔を除く12点のうち閾値を超えるものの外接矩形
    ///
    /// - margin だけ四方に広げる
    /// - 肩が見えていれば肩の高さから neck_extension 上まで広げる（首・胸元）
    /// - キャンバスにクランプ
    ///
    /// 有効な点が無い、または幅・高さが潰れた場合は None。
    pub fn from_pose(
        pose: &Pose,
        canvas_size: (f32, f32),
        confidence_threshold: f32,
        margin: f32,
        neck_extension: f32,
    ) -> Option<Self> {
        let (cw, ch) = canvas_size;
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut shoulder_y: Option<f32> = None;
        let mut count = 0u32;

        for idx in KeypointIndex::BODY {
            let kp = pose.get(idx);
            if !kp.is_valid(confidence_threshold) {
                continue;
            }
            let (x, y) = kp.to_canvas(cw, ch);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            if idx.is_shoulder() {
                shoulder_y = Some(shoulder_y.map_or(y, |s: f32| s.min(y)));
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }

        min_x -= margin;
        max_x += margin;
        min_y -= margin;
        max_y += margin;

        if let Some(sy) = shoulder_y {
            min_y = min_y.min(sy - neck_extension);
        }

        let bounds = Self {
            min_x: min_x.max(0.0),
            min_y: min_y.max(0.0),
            max_x: max_x.min(cw),
            max_y: max_y.min(ch),
        };

        if bounds.is_degenerate() {
            None
        } else {
            Some(bounds)
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.max_x > self.min_x && self.max_y > self.min_y)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// 軸ごとの速度の下限・上限 (px/frame)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLimits {
    pub min: f32,
    pub max: f32,
}

impl SpeedLimits {
    /// 符号を保ったまま |v| を [min, max] に収める（0 は正とみなす）
    pub fn apply(&self, v: f32) -> f32 {
        let magnitude = v.abs().clamp(self.min, self.max);
        if v < 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// 体の範囲内を漂うフィールド。起動時に一度だけ生成し、以後リセットしない。
#[derive(Debug, Clone, PartialEq)]
pub struct BouncingField {
    pub asset: FieldAsset,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl BouncingField {
    pub fn spawn<R: Rng>(asset: FieldAsset, canvas_size: (f32, f32), max_speed: f32, rng: &mut R) -> Self {
        let (w, h) = canvas_size;
        Self {
            asset,
            x: rng.gen_range(w * 0.2..=w * 0.8),
            y: rng.gen_range(h * 0.1..=h * 0.85),
            vx: rng.gen_range(-max_speed..=max_speed),
            vy: rng.gen_range(-max_speed..=max_speed),
        }
    }

    /// 1フレーム分進め、範囲の端で反射させ、速度を制限する
    ///
    /// 左上座標は [min, max(min, max - 画像サイズ)] に収まる。
    pub fn step(&mut self, bounds: &BodyBounds, image_size: (f32, f32), limits: SpeedLimits) {
        let (w, h) = image_size;
        self.x += self.vx;
        self.y += self.vy;

        (self.x, self.vx) = reflect(self.x, self.vx, bounds.min_x, bounds.max_x - w);
        (self.y, self.vy) = reflect(self.y, self.vy, bounds.min_y, bounds.max_y - h);

        self.vx = limits.apply(self.vx);
        self.vy = limits.apply(self.vy);
    }
}

/// 下端を越えたら正方向、上端を越えたら負方向へ向け直してクランプ
fn reflect(pos: f32, vel: f32, low: f32, high: f32) -> (f32, f32) {
    let high = high.max(low);
    if pos <= low {
        (low, vel.abs())
    } else if pos >= high {
        (high, -vel.abs())
    } else {
        (pos, vel)
    }
}

/// 体に貼るフィールド群
pub struct BodyFields {
    fields: Vec<BouncingField>,
    cycle: RandomCycle,
    limits: SpeedLimits,
    margin: f32,
    neck_extension: f32,
}

/// BodyFields の生成パラメータ
#[derive(Debug, Clone, Copy)]
pub struct BodyFieldParams {
    pub cycle_ms: u64,
    pub limits: SpeedLimits,
    pub margin: f32,
    pub neck_extension: f32,
}

impl BodyFields {
    pub fn new<R: Rng>(canvas_size: (f32, f32), params: BodyFieldParams, rng: &mut R) -> Self {
        let fields: Vec<BouncingField> = BODY_FIELDS
            .iter()
            .map(|asset| BouncingField::spawn(*asset, canvas_size, params.limits.max, rng))
            .collect();
        tracing::info!(count = fields.len(), "bouncing fields initialized");
        Self {
            cycle: RandomCycle::new(fields.len(), params.cycle_ms),
            fields,
            limits: params.limits,
            margin: params.margin,
            neck_extension: params.neck_extension,
        }
    }

    pub fn fields(&self) -> &[BouncingField] {
        &self.fields
    }

    pub fn top_index(&self) -> usize {
        self.cycle.top()
    }

    pub fn bounds(&self, pose: &Pose, canvas_size: (f32, f32), confidence_threshold: f32) -> Option<BodyBounds> {
        BodyBounds::from_pose(pose, canvas_size, confidence_threshold, self.margin, self.neck_extension)
    }

    /// 位置を更新して描画（最前面は最後）。範囲が求まらないフレームは何もしない。
    pub fn update_and_draw<C: Canvas, R: Rng>(
        &mut self,
        canvas: &mut C,
        pose: &Pose,
        confidence_threshold: f32,
        now_ms: u64,
        rng: &mut R,
    ) {
        let top = self.cycle.update(now_ms, rng);
        let Some(bounds) = self.bounds(pose, canvas.size(), confidence_threshold) else {
            return;
        };

        for (i, field) in self.fields.iter_mut().enumerate() {
            // 画像が無くても位置は動かし続ける
            let size = canvas.image_size(field.asset).unwrap_or((0.0, 0.0));
            field.step(&bounds, size, self.limits);
            if i != top {
                canvas.image(field.asset, field.x, field.y);
            }
        }

        if let Some(field) = self.fields.get(top) {
            canvas.image(field.asset, field.x, field.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;
    use crate::render::recording::RecordingCanvas;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const LIMITS: SpeedLimits = SpeedLimits { min: 0.6, max: 2.5 };

    fn params() -> BodyFieldParams {
        BodyFieldParams {
            cycle_ms: 1500,
            limits: LIMITS,
            margin: 50.0,
            neck_extension: 120.0,
        }
    }

    fn standing_pose() -> Pose {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::LeftShoulder, Keypoint::new(0.4, 0.4, 0.9));
        pose.set(KeypointIndex::RightShoulder, Keypoint::new(0.6, 0.4, 0.9));
        pose.set(KeypointIndex::LeftHip, Keypoint::new(0.42, 0.7, 0.9));
        pose.set(KeypointIndex::RightHip, Keypoint::new(0.58, 0.7, 0.9));
        // 顔は範囲に含めない
        pose.set(KeypointIndex::Nose, Keypoint::new(0.5, 0.05, 0.99));
        pose
    }

    #[test]
    fn test_bounds_padded_and_extended_from_shoulders() {
        let b = BodyBounds::from_pose(&standing_pose(), (1000.0, 1000.0), 0.3, 50.0, 120.0).unwrap();
        assert!((b.min_x - 350.0).abs() < 1e-3);
        assert!((b.max_x - 650.0).abs() < 1e-3);
        assert!((b.min_y - 280.0).abs() < 1e-3);
        assert!((b.max_y - 750.0).abs() < 1e-3);
    }

    #[test]
    fn test_bounds_clamped_to_canvas() {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::LeftShoulder, Keypoint::new(0.01, 0.05, 0.9));
        pose.set(KeypointIndex::RightAnkle, Keypoint::new(0.99, 0.99, 0.9));
        let b = BodyBounds::from_pose(&pose, (640.0, 480.0), 0.3, 50.0, 120.0).unwrap();
        assert_eq!(b.min_x, 0.0);
        assert_eq!(b.min_y, 0.0);
        assert_eq!(b.max_x, 640.0);
        assert_eq!(b.max_y, 480.0);
    }

    #[test]
    fn test_bounds_none_without_confident_body_keypoints() {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::Nose, Keypoint::new(0.5, 0.5, 0.99));
        pose.set(KeypointIndex::LeftHip, Keypoint::new(0.5, 0.5, 0.3));
        assert!(BodyBounds::from_pose(&pose, (640.0, 480.0), 0.3, 50.0, 120.0).is_none());
    }

    #[test]
    fn test_bounds_none_when_off_canvas() {
        let mut pose = Pose::default();
        pose.set(KeypointIndex::LeftKnee, Keypoint::new(2.0, 0.5, 0.9));
        assert!(BodyBounds::from_pose(&pose, (640.0, 480.0), 0.3, 50.0, 120.0).is_none());
    }

    #[test]
    fn test_reflect_flips_on_crossing() {
        let bounds = BodyBounds {
            min_x: 100.0,
            min_y: 100.0,
            max_x: 400.0,
            max_y: 400.0,
        };
        let mut field = BouncingField {
            asset: FieldAsset::FamilyFather,
            x: 101.0,
            y: 200.0,
            vx: -2.0,
            vy: 1.0,
        };
        field.step(&bounds, (50.0, 20.0), LIMITS);
        assert_eq!(field.x, 100.0);
        assert_eq!(field.vx, 2.0);
        assert_eq!(field.vy, 1.0);

        // 右端は max - 幅
        field.x = 349.0;
        field.vx = 2.0;
        field.step(&bounds, (50.0, 20.0), LIMITS);
        assert_eq!(field.x, 350.0);
        assert_eq!(field.vx, -2.0);
    }

    #[test]
    fn test_no_flip_inside_bounds() {
        let bounds = BodyBounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 500.0,
            max_y: 500.0,
        };
        let mut field = BouncingField {
            asset: FieldAsset::FamilyFather,
            x: 200.0,
            y: 200.0,
            vx: -1.5,
            vy: 2.0,
        };
        field.step(&bounds, (50.0, 20.0), LIMITS);
        assert_eq!((field.x, field.y), (198.5, 202.0));
        assert_eq!((field.vx, field.vy), (-1.5, 2.0));
    }

    #[test]
    fn test_speed_limits_keep_sign() {
        assert_eq!(LIMITS.apply(0.1), 0.6);
        assert_eq!(LIMITS.apply(-0.1), -0.6);
        assert_eq!(LIMITS.apply(0.0), 0.6);
        assert_eq!(LIMITS.apply(-9.0), -2.5);
        assert_eq!(LIMITS.apply(1.2), 1.2);
    }

    #[test]
    fn test_spawn_within_canvas_relative_region() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let f = BouncingField::spawn(FieldAsset::Question1, (1000.0, 500.0), 2.5, &mut rng);
            assert!(f.x >= 200.0 && f.x <= 800.0);
            assert!(f.y >= 50.0 && f.y <= 425.0);
            assert!(f.vx.abs() <= 2.5 && f.vy.abs() <= 2.5);
        }
    }

    #[test]
    fn test_fields_hold_position_without_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut canvas = RecordingCanvas::with_all_assets(1000.0, 1000.0, (60.0, 20.0));
        let mut body = BodyFields::new((1000.0, 1000.0), params(), &mut rng);
        let before = body.fields().to_vec();

        body.update_and_draw(&mut canvas, &Pose::default(), 0.3, 100, &mut rng);
        assert_eq!(body.fields(), &before[..]);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_top_body_field_drawn_last() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut canvas = RecordingCanvas::with_all_assets(1000.0, 1000.0, (60.0, 20.0));
        let mut body = BodyFields::new((1000.0, 1000.0), params(), &mut rng);
        let pose = standing_pose();

        for frame in 0..200u64 {
            canvas.reset();
            body.update_and_draw(&mut canvas, &pose, 0.3, frame * 22, &mut rng);
            let drawn = canvas.images();
            assert_eq!(drawn.len(), BODY_FIELDS.len());
            let top = body.fields()[body.top_index()].asset;
            assert_eq!(drawn.last().unwrap().0, top);
            assert_eq!(drawn.iter().filter(|d| d.0 == top).count(), 1);
        }
    }

    #[test]
    fn test_fields_end_up_inside_body_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut canvas = RecordingCanvas::with_all_assets(1000.0, 1000.0, (60.0, 20.0));
        let mut body = BodyFields::new((1000.0, 1000.0), params(), &mut rng);
        let pose = standing_pose();
        let bounds = body.bounds(&pose, (1000.0, 1000.0), 0.3).unwrap();

        for frame in 0..50u64 {
            body.update_and_draw(&mut canvas, &pose, 0.3, frame * 22, &mut rng);
            for f in body.fields() {
                assert!(bounds.contains(f.x, f.y), "{:?} outside {:?}", f, bounds);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_step_stays_in_bounds_with_limited_speed(
            x in -500.0f32..1500.0,
            y in -500.0f32..1500.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
            min_x in 0.0f32..400.0,
            min_y in 0.0f32..400.0,
            bw in 1.0f32..600.0,
            bh in 1.0f32..600.0,
            iw in 0.0f32..200.0,
            ih in 0.0f32..200.0,
        ) {
            let bounds = BodyBounds { min_x, min_y, max_x: min_x + bw, max_y: min_y + bh };
            let mut field = BouncingField { asset: FieldAsset::TravelVisa, x, y, vx, vy };
            field.step(&bounds, (iw, ih), LIMITS);

            prop_assert!(bounds.contains(field.x, field.y));
            prop_assert!(field.vx.abs() >= LIMITS.min && field.vx.abs() <= LIMITS.max);
            prop_assert!(field.vy.abs() >= LIMITS.min && field.vy.abs() <= LIMITS.max);
        }

        #[test]
        fn prop_crossing_low_bound_points_velocity_inward(
            start in 0.0f32..5.0,
            speed in 0.6f32..2.5,
        ) {
            let bounds = BodyBounds { min_x: 10.0, min_y: 0.0, max_x: 500.0, max_y: 500.0 };
            let mut field = BouncingField {
                asset: FieldAsset::TravelVisa,
                x: 10.0 + start,
                y: 250.0,
                vx: -speed,
                vy: 1.0,
            };
            let crossed = field.x - speed <= bounds.min_x;
            field.step(&bounds, (10.0, 10.0), LIMITS);
            prop_assert_eq!(field.vx > 0.0, crossed);
        }
    }
}
