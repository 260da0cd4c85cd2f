//! アクティブ画面の管理者HUD: 薄いグリッド・申請者ID・分類スコア

use rand::seq::SliceRandom;
use rand::Rng;

use crate::fields::CycleTimer;
use crate::idle::PingPong;
use crate::render::{Canvas, FrameInfo, HAlign, Rgba, Stroke, TextStyle, VAlign};

const NEON_GREEN: Rgba = Rgba::rgb(0x03, 0xFD, 0x20);
const ID_PREFIXES: [&str; 5] = ["USC", "DHS", "CBP", "ICE", "CIS"];
const GRID_SPACING: f32 = 100.0;
const LINE_STEP: f32 = 15.0;
const BOTTOM_STOP: f32 = 60.0;

pub const SCORE_INTERVAL_MS: u64 = 500;
pub const APPLICANT_INTERVAL_MS: u64 = 3000;

/// 表示用の分類スコア (%)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceScores {
    pub identity: f32,
    pub behavior: f32,
    pub threat: f32,
    pub compliance: f32,
}

impl ConfidenceScores {
    fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            identity: rng.gen_range(85.0..98.5),
            behavior: rng.gen_range(88.0..96.7),
            threat: rng.gen_range(2.1..25.8),
            compliance: rng.gen_range(87.3..97.2),
        }
    }
}

impl Default for ConfidenceScores {
    fn default() -> Self {
        Self {
            identity: 87.3,
            behavior: 94.1,
            threat: 12.8,
            compliance: 91.7,
        }
    }
}

pub struct AdminHud {
    grid_alpha: PingPong,
    scores: ConfidenceScores,
    applicant_id: String,
    score_timer: CycleTimer,
    applicant_timer: CycleTimer,
}

fn random_applicant_id<R: Rng>(rng: &mut R) -> String {
    let prefix = ID_PREFIXES.choose(rng).copied().unwrap_or("USC");
    format!("{}-{}", prefix, rng.gen_range(100_000..999_999))
}

impl AdminHud {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            grid_alpha: PingPong::new(3.0, 10.0, 0.5),
            scores: ConfidenceScores::default(),
            applicant_id: random_applicant_id(rng),
            score_timer: CycleTimer::new(SCORE_INTERVAL_MS),
            applicant_timer: CycleTimer::new(APPLICANT_INTERVAL_MS),
        }
    }

    pub fn scores(&self) -> ConfidenceScores {
        self.scores
    }

    pub fn applicant_id(&self) -> &str {
        &self.applicant_id
    }

    /// スコアと申請者IDの更新。待機中も毎フレーム呼ぶ。
    pub fn tick<R: Rng>(&mut self, now_ms: u64, rng: &mut R) {
        if self.score_timer.fire(now_ms) {
            self.scores = ConfidenceScores::random(rng);
        }
        if self.applicant_timer.fire(now_ms) {
            self.applicant_id = random_applicant_id(rng);
            tracing::trace!(id = %self.applicant_id, "applicant id rotated");
        }
    }

    pub fn draw<C: Canvas>(&mut self, canvas: &mut C, info: FrameInfo) {
        self.draw_grid(canvas);
        self.draw_status_column(canvas);
        self.draw_confidence_column(canvas);
        self.draw_metadata(canvas, info);
    }

    fn draw_grid<C: Canvas>(&mut self, canvas: &mut C) {
        let alpha = self.grid_alpha.advance();
        let (w, h) = canvas.size();
        let stroke = Stroke::new(Rgba::white(alpha), 0.5);

        let mut x = GRID_SPACING;
        while x < w {
            canvas.line(x, 0.0, x, h, stroke);
            x += GRID_SPACING;
        }
        let mut y = GRID_SPACING;
        while y < h {
            canvas.line(0.0, y, w, y, stroke);
            y += GRID_SPACING;
        }
    }

    fn draw_status_column<C: Canvas>(&self, canvas: &mut C) {
        let (_, h) = canvas.size();
        let top_left = |size| TextStyle::new(size, NEON_GREEN).align(HAlign::Left, VAlign::Top);

        canvas.text("SYS STATUS: ACTIVE...", 20.0, 30.0, top_left(18.0));

        let line = format!("APPLICANT ID: {}", self.applicant_id);
        let mut y = 55.0;
        while y < h - BOTTOM_STOP {
            canvas.text(&line, 20.0, y, top_left(14.0));
            y += LINE_STEP;
        }
    }

    fn draw_confidence_column<C: Canvas>(&self, canvas: &mut C) {
        let (w, h) = canvas.size();
        let x = w - 20.0;
        let top = 30.0;
        let top_right = |size| TextStyle::new(size, NEON_GREEN).align(HAlign::Right, VAlign::Top);
        let s = &self.scores;

        canvas.text("CLASSIFICATION CONFIDENCE", x, top, top_right(16.0));
        let lines = [
            format!("IDENTITY: {:.1}%", s.identity),
            format!("BEHAVIOR: {:.1}%", s.behavior),
            format!("THREAT: {:.1}%", s.threat),
            format!("COMPLIANCE: {:.1}%", s.compliance),
        ];
        for (i, line) in lines.iter().enumerate() {
            canvas.text(line, x, top + 20.0 + i as f32 * LINE_STEP, top_right(14.0));
        }

        let compliance = &lines[3];
        let mut y = top + 80.0;
        while y < h - BOTTOM_STOP {
            canvas.text(compliance, x, y, top_right(14.0));
            y += LINE_STEP;
        }
    }

    fn draw_metadata<C: Canvas>(&self, canvas: &mut C, info: FrameInfo) {
        let (w, h) = canvas.size();
        let left = TextStyle::new(14.0, NEON_GREEN).align(HAlign::Left, VAlign::Bottom);
        let right = left.align(HAlign::Right, VAlign::Bottom);

        canvas.text("LOCATION: SAN FRANCISCO, CA", 20.0, h - 40.0, left);
        canvas.text(&format!("SESSION: {}s", info.now_ms / 1000), 20.0, h - 20.0, left);

        let id = format!("APPLICANT ID: {}", self.applicant_id);
        canvas.text(&id, w - 20.0, h - 40.0, right);
        canvas.text("FORM: I-485 (ADJUSTMENT)", w - 20.0, h - 20.0, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingCanvas;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scores_in_range(s: ConfidenceScores) -> bool {
        (85.0..98.5).contains(&s.identity)
            && (88.0..96.7).contains(&s.behavior)
            && (2.1..25.8).contains(&s.threat)
            && (87.3..97.2).contains(&s.compliance)
    }

    #[test]
    fn test_scores_update_every_500ms() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut hud = AdminHud::new(&mut rng);
        let initial = hud.scores();

        hud.tick(499, &mut rng);
        assert_eq!(hud.scores(), initial);

        hud.tick(500, &mut rng);
        let first = hud.scores();
        assert_ne!(first, initial);
        assert!(scores_in_range(first));

        hud.tick(900, &mut rng);
        assert_eq!(hud.scores(), first);
        hud.tick(1000, &mut rng);
        assert!(scores_in_range(hud.scores()));
    }

    #[test]
    fn test_applicant_id_format_and_interval() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut hud = AdminHud::new(&mut rng);
        let initial = hud.applicant_id().to_string();

        hud.tick(2999, &mut rng);
        assert_eq!(hud.applicant_id(), initial);

        for now in (3000..30_000).step_by(3000) {
            hud.tick(now, &mut rng);
            let (prefix, number) = hud.applicant_id().split_once('-').unwrap();
            assert!(ID_PREFIXES.contains(&prefix));
            assert_eq!(number.len(), 6);
            assert!(number.parse::<u32>().is_ok());
        }
    }

    #[test]
    fn test_draw_columns() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hud = AdminHud::new(&mut rng);
        let mut canvas = RecordingCanvas::new(1280.0, 720.0);
        hud.draw(&mut canvas, FrameInfo { now_ms: 12_345, frame: 1, fps: 45.0 });

        let texts = canvas.texts();
        assert!(texts.contains(&"SYS STATUS: ACTIVE...".to_string()));
        assert!(texts.contains(&"IDENTITY: 87.3%".to_string()));
        assert!(texts.contains(&"SESSION: 12s".to_string()));
        assert!(texts.contains(&"FORM: I-485 (ADJUSTMENT)".to_string()));

        // 55 から 660 未満まで 15px 間隔 + 右下
        let id_line = format!("APPLICANT ID: {}", hud.applicant_id());
        let repeats = texts.iter().filter(|t| **t == id_line).count();
        assert_eq!(repeats, 41 + 1);
    }
}
