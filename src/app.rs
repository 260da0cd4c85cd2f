use rand::rngs::StdRng;

use crate::config::Config;
use crate::detection::DetectionAdapter;
#[cfg(feature = "desktop")]
use crate::detection::DetectionEvent;
use crate::fields::{BodyFieldParams, BodyFields, CycleState, FaceFields, SpeedLimits};
use crate::hud::AdminHud;
use crate::idle::IdleScreen;
use crate::pose::{FaceMesh, Pose};
use crate::presence::{Mode, PresenceController};
use crate::render::{draw_skeleton, Canvas, FrameInfo};

/// インスタレーション全体の状態。描画ループが所有し、毎フレーム frame() を呼ぶ。
pub struct Installation {
    confidence_threshold: f32,
    detection: DetectionAdapter,
    presence: PresenceController,
    face_fields: FaceFields,
    body_fields: BodyFields,
    idle: IdleScreen,
    hud: AdminHud,
    show_skeleton: bool,
    rng: StdRng,
}

impl Installation {
    /// canvas は初期サイズと読み込めた画像の判定に使う
    pub fn new<C: Canvas>(config: &Config, canvas: &C, mut rng: StdRng) -> Self {
        let size = canvas.size();
        let fields = &config.fields;
        let params = BodyFieldParams {
            cycle_ms: fields.body_cycle_ms,
            limits: SpeedLimits {
                min: fields.min_speed,
                max: fields.max_speed,
            },
            margin: fields.body_margin,
            neck_extension: fields.neck_extension,
        };

        let face_fields = FaceFields::new(|asset| canvas.image_size(asset).is_some(), fields.face_cycle_ms);
        let body_fields = BodyFields::new(size, params, &mut rng);
        let idle = IdleScreen::new(size, (config.camera.width, config.camera.height), &mut rng);
        let hud = AdminHud::new(&mut rng);

        Self {
            confidence_threshold: config.detection.confidence_threshold,
            detection: DetectionAdapter::from_config(&config.detection),
            presence: PresenceController::from_config(&config.presence),
            face_fields,
            body_fields,
            idle,
            hud,
            show_skeleton: config.debug.show_skeleton,
            rng,
        }
    }

    pub fn on_body_results(&mut self, poses: Vec<Pose>, now_ms: u64) -> bool {
        self.detection.on_body_results(poses, now_ms)
    }

    pub fn on_face_results(&mut self, faces: Vec<FaceMesh>, now_ms: u64) -> bool {
        self.detection.on_face_results(faces, now_ms)
    }

    #[cfg(feature = "desktop")]
    pub fn on_event(&mut self, event: DetectionEvent, now_ms: u64) -> bool {
        match event {
            DetectionEvent::Body(poses) => self.on_body_results(poses, now_ms),
            DetectionEvent::Face(faces) => self.on_face_results(faces, now_ms),
        }
    }

    pub fn toggle_skeleton(&mut self) -> bool {
        self.show_skeleton = !self.show_skeleton;
        tracing::info!(show_skeleton = self.show_skeleton, "skeleton toggled");
        self.show_skeleton
    }

    pub fn mode(&self) -> Mode {
        self.presence.mode()
    }

    pub fn cycle_state(&self) -> CycleState {
        CycleState {
            face: self.face_fields.top_index(),
            body: self.body_fields.top_index(),
        }
    }

    pub fn queue_number(&self) -> u32 {
        self.idle.queue_number()
    }

    /// 1フレーム分の更新と描画。描いたモードを返す。
    pub fn frame<C: Canvas>(&mut self, canvas: &mut C, info: FrameInfo) -> Mode {
        self.hud.tick(info.now_ms, &mut self.rng);

        let present = self.detection.frame().person_present(self.confidence_threshold);
        let mode = self.presence.update(present, info.now_ms);

        match mode {
            Mode::Idle => self.idle.draw(canvas, info, &mut self.rng),
            Mode::Active => self.draw_active(canvas, info),
        }
        mode
    }

    fn draw_active<C: Canvas>(&mut self, canvas: &mut C, info: FrameInfo) {
        canvas.backdrop();
        self.hud.draw(canvas, info);

        let frame = self.detection.frame();
        if let Some(pose) = frame.pose() {
            self.body_fields.update_and_draw(
                canvas,
                pose,
                self.confidence_threshold,
                info.now_ms,
                &mut self.rng,
            );
        }
        if let Some(mesh) = frame.face() {
            self.face_fields.draw(canvas, mesh, info.now_ms);
        }
        if self.show_skeleton {
            if let Some(pose) = frame.pose() {
                draw_skeleton(canvas, pose, self.confidence_threshold);
            }
        }
    }
}
