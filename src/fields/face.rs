use super::catalog::{face_field, FaceField, FaceLayer, FACE_FIELDS, FOREHEAD_LIFT};
use super::cycle::SequentialCycle;
use super::FieldAsset;
use crate::pose::FaceMesh;
use crate::render::Canvas;

/// 顔ランドマークに貼り付けるフィールド群
pub struct FaceFields {
    /// 画像が読み込めたフィールドのみ（回転対象）
    eligible: Vec<FaceField>,
    cycle: SequentialCycle,
}

impl FaceFields {
    pub fn new<F>(is_loaded: F, cycle_ms: u64) -> Self
    where
        F: Fn(FieldAsset) -> bool,
    {
        let eligible: Vec<FaceField> = FACE_FIELDS
            .iter()
            .copied()
            .filter(|f| is_loaded(f.asset))
            .collect();
        tracing::info!(count = eligible.len(), "face field cycling initialized");
        Self {
            cycle: SequentialCycle::new(eligible.len(), cycle_ms),
            eligible,
        }
    }

    pub fn eligible(&self) -> &[FaceField] {
        &self.eligible
    }

    pub fn top_index(&self) -> usize {
        self.cycle.top()
    }

    /// 現在最前面のフィールド
    pub fn top(&self) -> Option<&FaceField> {
        self.eligible.get(self.cycle.top())
    }

    /// 最前面を更新して全フィールドを描画（最前面は最後）
    pub fn draw<C: Canvas>(&mut self, canvas: &mut C, mesh: &FaceMesh, now_ms: u64) {
        if self.eligible.is_empty() {
            return;
        }

        let before = self.cycle.top();
        let top = self.eligible[self.cycle.update(now_ms)];
        if self.cycle.top() != before {
            tracing::debug!(asset = top.asset.file_name(), "face field now on top");
        }

        for layer in FaceLayer::DRAW_ORDER {
            for anchor in layer.anchor_order() {
                let Some(field) = face_field(layer, *anchor) else {
                    continue;
                };
                if *field == top {
                    continue;
                }
                draw_face_field(canvas, mesh, field);
            }
        }

        draw_face_field(canvas, mesh, &top);
    }
}

/// フィールド画像左上のキャンバス座標
///
/// ランドマークをキャンバスへスケールし、レイヤーオフセットを足して画像中心を合わせ、
/// 画像全体がキャンバス内に収まるようにクランプする。
pub fn face_field_position(
    field: &FaceField,
    mesh: &FaceMesh,
    canvas_size: (f32, f32),
    image_size: (f32, f32),
) -> Option<(f32, f32)> {
    let [lx, ly] = mesh.landmark(field.anchor.landmark_index())?;
    let (cw, ch) = canvas_size;
    let (iw, ih) = image_size;
    let (ox, oy) = field.layer.offset();

    let cx = lx * cw + ox;
    let mut cy = ly * ch + oy;
    if field.asset == FOREHEAD_LIFT.0 {
        cy -= FOREHEAD_LIFT.1;
    }

    let x = (cx - iw / 2.0).clamp(0.0, (cw - iw).max(0.0));
    let y = (cy - ih / 2.0).clamp(0.0, (ch - ih).max(0.0));
    Some((x, y))
}

fn draw_face_field<C: Canvas>(canvas: &mut C, mesh: &FaceMesh, field: &FaceField) {
    let Some(image_size) = canvas.image_size(field.asset) else {
        return;
    };
    if let Some((x, y)) = face_field_position(field, mesh, canvas.size(), image_size) {
        canvas.image(field.asset, x, y);
    }
}
