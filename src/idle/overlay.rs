//! 待機画面の前景: 受付番号・案内文・照準・四隅の表示

use rand::Rng;

use crate::render::{Canvas, FrameInfo, HAlign, Rgba, Stroke, TextStyle, VAlign};

const BUILD: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-", env!("GIT_VERSION"));

/// 受付番号。ランダムな間隔ごとに 1〜3 進み、減ることはない。
#[derive(Debug, Clone)]
pub struct QueueNumber {
    value: u32,
    last_change_ms: u64,
    interval_ms: u64,
}

impl QueueNumber {
    pub const START: u32 = 301;
    pub const MIN_INTERVAL_MS: u64 = 8000;
    pub const MAX_INTERVAL_MS: u64 = 12000;

    pub fn new<R: Rng>(now_ms: u64, rng: &mut R) -> Self {
        Self {
            value: Self::START,
            last_change_ms: now_ms,
            interval_ms: rng.gen_range(Self::MIN_INTERVAL_MS..=Self::MAX_INTERVAL_MS),
        }
    }

    pub fn update<R: Rng>(&mut self, now_ms: u64, rng: &mut R) -> u32 {
        if now_ms.saturating_sub(self.last_change_ms) >= self.interval_ms {
            self.value += rng.gen_range(1..=3);
            self.last_change_ms = now_ms;
            self.interval_ms = rng.gen_range(Self::MIN_INTERVAL_MS..=Self::MAX_INTERVAL_MS);
            tracing::debug!(queue = self.value, next_in_ms = self.interval_ms, "queue advanced");
        }
        self.value
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

/// 中央の照準。sin で脈動する。
#[derive(Debug, Clone, Default)]
pub struct Crosshair {
    pulse: f32,
}

impl Crosshair {
    pub fn update(&mut self) {
        self.pulse += 0.03;
    }

    pub fn scale(&self) -> f32 {
        1.0 + self.pulse.sin() * 0.08
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        let (w, h) = canvas.size();
        let (cx, cy) = (w / 2.0, h / 2.0 + h * 0.05);
        let s = self.scale();
        let half = w.min(h) * 0.15 * s / 2.0;
        let corner = 20.0 * s;
        let green = Rgba::rgb(0, 255, 0);
        let heavy = Stroke::new(green, 2.0 * s);

        canvas.stroke_rect(cx - half, cy - half, half * 2.0, half * 2.0, heavy);

        for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            let (x, y) = (cx + sx * half, cy + sy * half);
            canvas.line(x, y, x - sx * corner, y, heavy);
            canvas.line(x, y, x, y - sy * corner, heavy);
        }

        let thin = Stroke::new(green, s);
        let arm = 15.0 * s;
        canvas.line(cx - arm, cy, cx + arm, cy, thin);
        canvas.line(cx, cy - arm, cx, cy + arm, thin);
    }
}

/// 待機画面の文字情報
#[derive(Debug, Clone)]
pub struct Overlay {
    queue: QueueNumber,
    crosshair: Crosshair,
    camera_resolution: (u32, u32),
}

const CORNER_TEXT: f32 = 32.0;
const CORNER_MARGIN: f32 = 30.0;

impl Overlay {
    pub fn new<R: Rng>(camera_resolution: (u32, u32), now_ms: u64, rng: &mut R) -> Self {
        Self {
            queue: QueueNumber::new(now_ms, rng),
            crosshair: Crosshair::default(),
            camera_resolution,
        }
    }

    pub fn queue(&self) -> &QueueNumber {
        &self.queue
    }

    pub fn update<R: Rng>(&mut self, now_ms: u64, rng: &mut R) {
        self.queue.update(now_ms, rng);
        self.crosshair.update();
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C, info: FrameInfo) {
        let (w, h) = canvas.size();
        let base = w.min(h);
        let center = |size: f32, color: Rgba| {
            TextStyle::new(size, color).align(HAlign::Center, VAlign::Center)
        };

        let queue_text = format!(">>> PROCESSING APPLICANT #{:03} <<<", self.queue.value());
        let queue_size = base * 0.065;
        canvas.text(&queue_text, w / 2.0, h * 0.18, center(queue_size, Rgba::white(200.0)));
        if info.frame % 180 < 5 {
            let ghost = center(queue_size, Rgba::rgba(255, 0, 0, 100));
            canvas.text(&queue_text, w / 2.0 + 2.0, h * 0.18 + 1.0, ghost);
        }

        let main = center(base * 0.12, Rgba::WHITE);
        let main_y = h * 0.35;
        if h > w && w < h * 0.6 {
            canvas.text("PLEASE STAND", w / 2.0, main_y, main);
            canvas.text("IN FRONT OF CAMERA", w / 2.0, main_y + base * 0.14, main);
        } else {
            canvas.text(">>> PLEASE STAND IN FRONT OF CAMERA <<<", w / 2.0, main_y, main);
        }

        self.crosshair.draw(canvas);
        self.draw_system_status(canvas, info);

        let instruct = center(base * 0.05, Rgba::rgb(150, 255, 150));
        let instruct_y = h * 0.75;
        canvas.text("STAND ON DESIGNATED AREA", w / 2.0, instruct_y, instruct);
        canvas.text("LOOK DIRECTLY INTO CAMERA", w / 2.0, instruct_y + base * 0.07, instruct);

        if info.now_ms % 1000 < 500 {
            self.draw_ready_indicator(canvas, w / 2.0, instruct_y + base * 0.15, base * 0.055);
        }

        self.draw_corner_readouts(canvas, info);
    }

    fn draw_ready_indicator<C: Canvas>(&self, canvas: &mut C, cx: f32, cy: f32, size: f32) {
        let green = Rgba::rgb(0, 255, 0);
        let label = "ID PHOTO READY";
        let label_w = canvas.text_width(label, size);
        let dot_r = size * 0.3;
        let gap = size * 0.4;
        let left = cx - (label_w + dot_r * 2.0 + gap) / 2.0;

        canvas.fill_circle(left + dot_r, cy, dot_r, green);
        let style = TextStyle::new(size, green).align(HAlign::Left, VAlign::Center);
        canvas.text(label, left + dot_r * 2.0 + gap, cy, style);
    }

    fn draw_system_status<C: Canvas>(&self, canvas: &mut C, info: FrameInfo) {
        let (w, _) = canvas.size();
        let color = Rgba::rgba(100, 255, 100, 180);
        let left = TextStyle::new(CORNER_TEXT, color);
        let right = left.align(HAlign::Right, VAlign::Baseline);
        let (cam_w, cam_h) = self.camera_resolution;

        canvas.text("SYS_STATUS: ACTIVE", CORNER_MARGIN, 55.0, left);
        canvas.text(&format!("CAM_RES: {}x{}", cam_w, cam_h), CORNER_MARGIN, 95.0, left);
        canvas.text(&format!("FPS: {:04.1}", info.fps), CORNER_MARGIN, 135.0, left);
        canvas.text("TEMP: 67.2C", CORNER_MARGIN, 175.0, left);

        canvas.text("NET: SECURE_LINK", w - CORNER_MARGIN, 55.0, right);
        canvas.text("PING: 12ms", w - CORNER_MARGIN, 95.0, right);
        canvas.text("ENCRYPT: AES-256", w - CORNER_MARGIN, 135.0, right);
    }

    fn draw_corner_readouts<C: Canvas>(&self, canvas: &mut C, info: FrameInfo) {
        let (w, h) = canvas.size();
        let right = TextStyle::new(CORNER_TEXT, Rgba::rgba(150, 150, 255, 150))
            .align(HAlign::Right, VAlign::Baseline);
        let x = w - CORNER_MARGIN;

        canvas.text(&format!("TIMESTAMP: {:08}", info.now_ms), x, h - 155.0, right);
        canvas.text(&format!("FRAME: {:06}", info.frame), x, h - 115.0, right);
        canvas.text(&format!("QUEUE_POS: {}", self.queue.value()), x, h - 75.0, right);
        canvas.text(&format!("BUILD: {}", BUILD), x, h - 35.0, right);

        let left = TextStyle::new(CORNER_TEXT, Rgba::rgba(100, 255, 100, 150));
        canvas.text("ML_MODEL: ACTIVE", CORNER_MARGIN, h - 115.0, left);
        canvas.text("DETECTION: READY", CORNER_MARGIN, h - 75.0, left);
        canvas.text("STORAGE: 78% FREE", CORNER_MARGIN, h - 35.0, left);
    }
}
