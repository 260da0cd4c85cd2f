//! フォームフィールドの配置
//!
//! 顔フィールドはランドマークに固定して順番に最前面を回す。
//! 体フィールドは体の範囲内を跳ね回り、最前面はランダムに選ぶ。

pub mod body;
pub mod catalog;
pub mod cycle;
pub mod face;

pub use body::{BodyBounds, BodyFieldParams, BodyFields, BouncingField, SpeedLimits};
pub use catalog::{FaceAnchor, FaceField, FaceLayer, FieldAsset, BODY_FIELDS, FACE_FIELDS};
pub use cycle::{CycleState, CycleTimer, RandomCycle, SequentialCycle};
pub use face::{face_field_position, FaceFields};
