use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub presence: PresenceConfig,
    #[serde(default)]
    pub fields: FieldConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// VideoCapture のデバイス番号
    #[serde(default)]
    pub index: i32,
    /// キャプチャ解像度
    #[serde(default = "default_capture_width")]
    pub width: u32,
    #[serde(default = "default_capture_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// 初期ウィンドウサイズ（以後はウィンドウに追従）
    #[serde(default = "default_window_width")]
    pub width: usize,
    #[serde(default = "default_window_height")]
    pub height: usize,
    #[serde(default = "default_target_fps")]
    pub target_fps: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// MoveNet lightning ONNX
    #[serde(default = "default_pose_model")]
    pub pose: PathBuf,
    /// MediaPipe face landmark ONNX
    #[serde(default = "default_face_mesh_model")]
    pub face_mesh: PathBuf,
    /// 顔存在スコアの閾値
    #[serde(default = "default_face_presence")]
    pub face_presence: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// 体の推論結果を何回に1回採用するか
    #[serde(default = "default_body_every")]
    pub body_every: u64,
    /// 顔の推論結果を何回に1回採用するか
    #[serde(default = "default_face_every")]
    pub face_every: u64,
    /// キーポイント採用の信頼度閾値（これを超えたもののみ）
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PresenceConfig {
    /// 人物が見えなくなってから待機画面に戻るまで (ms)
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FieldConfig {
    /// フォーム画像のディレクトリ
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// 顔フィールドの最前面切り替え周期 (ms)
    #[serde(default = "default_face_cycle_ms")]
    pub face_cycle_ms: u64,
    /// 体フィールドの最前面切り替え周期 (ms)
    #[serde(default = "default_body_cycle_ms")]
    pub body_cycle_ms: u64,
    /// 軸ごとの最小速度 (px/frame)
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,
    /// 軸ごとの最大速度 (px/frame)
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// 体の範囲に足す余白 (px)
    #[serde(default = "default_body_margin")]
    pub body_margin: f32,
    /// 肩から上に広げる量 (px)
    #[serde(default = "default_neck_extension")]
    pub neck_extension: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    /// 起動時に骨格を表示するか (Sキーで切り替え)
    #[serde(default)]
    pub show_skeleton: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_capture_width() -> u32 { 640 }
fn default_capture_height() -> u32 { 480 }
fn default_title() -> String { "Intake".to_string() }
fn default_window_width() -> usize { 1280 }
fn default_window_height() -> usize { 720 }
fn default_target_fps() -> usize { 45 }
fn default_pose_model() -> PathBuf { PathBuf::from("models/movenet_lightning.onnx") }
fn default_face_mesh_model() -> PathBuf { PathBuf::from("models/face_landmark.onnx") }
fn default_face_presence() -> f32 { 0.5 }
fn default_body_every() -> u64 { 8 }
fn default_face_every() -> u64 { 12 }
fn default_confidence_threshold() -> f32 { 0.3 }
fn default_idle_timeout_ms() -> u64 { 3000 }
fn default_assets_dir() -> PathBuf { PathBuf::from("photos/form_fields") }
fn default_face_cycle_ms() -> u64 { 800 }
fn default_body_cycle_ms() -> u64 { 1500 }
fn default_min_speed() -> f32 { 0.6 }
fn default_max_speed() -> f32 { 2.5 }
fn default_body_margin() -> f32 { 50.0 }
fn default_neck_extension() -> f32 { 120.0 }
fn default_log_dir() -> PathBuf { PathBuf::from("logs") }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_capture_width(),
            height: default_capture_height(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_window_width(),
            height: default_window_height(),
            target_fps: default_target_fps(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pose: default_pose_model(),
            face_mesh: default_face_mesh_model(),
            face_presence: default_face_presence(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            body_every: default_body_every(),
            face_every: default_face_every(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            face_cycle_ms: default_face_cycle_ms(),
            body_cycle_ms: default_body_cycle_ms(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            body_margin: default_body_margin(),
            neck_extension: default_neck_extension(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_skeleton: false,
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config")?;
        config.validate()?;
        Ok(config)
    }

    /// 描画ループで clamp や乱数範囲に渡る値を検査する
    pub fn validate(&self) -> Result<()> {
        let fields = &self.fields;
        if !fields.min_speed.is_finite() || !fields.max_speed.is_finite() {
            bail!("fields.min_speed and fields.max_speed must be finite");
        }
        if fields.min_speed < 0.0 {
            bail!("fields.min_speed must be >= 0 (got {})", fields.min_speed);
        }
        if fields.min_speed > fields.max_speed {
            bail!(
                "fields.min_speed must be <= max_speed (got {} > {})",
                fields.min_speed,
                fields.max_speed
            );
        }
        if !fields.body_margin.is_finite() || !fields.neck_extension.is_finite() {
            bail!("fields.body_margin and fields.neck_extension must be finite");
        }
        if !self.detection.confidence_threshold.is_finite() {
            bail!("detection.confidence_threshold must be finite");
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            bail!("camera.width and camera.height must be non-zero");
        }
        Ok(())
    }

    /// 読めなければデフォルト設定で続行する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    "config not loaded, using defaults: {:#}",
                    e
                );
                Self::default()
            }
        }
    }
}
