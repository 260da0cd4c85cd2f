/// MoveNet の 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    /// 顔部分 (鼻・目・耳)
    pub const HEAD: [KeypointIndex; 5] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
    ];

    /// 胴体・手足 (顔を除く12点)
    pub const BODY: [KeypointIndex; 12] = [
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn is_shoulder(self) -> bool {
        matches!(self, Self::LeftShoulder | Self::RightShoulder)
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keypoint {
    /// キャプチャ幅で正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// キャプチャ高さで正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// 信頼度が閾値を超えているか (閾値ちょうどは不採用)
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }

    /// キャプチャ解像度からキャンバス解像度へ線形スケーリング
    pub fn to_canvas(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x * width, self.y * height)
    }
}

/// 17キーポイントからなる姿勢
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub keypoints: [Keypoint; KeypointIndex::COUNT],
}

impl Pose {
    pub fn new(keypoints: [Keypoint; KeypointIndex::COUNT]) -> Self {
        Self { keypoints }
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[index as usize]
    }

    pub fn set(&mut self, index: KeypointIndex, keypoint: Keypoint) {
        self.keypoints[index as usize] = keypoint;
    }

    /// 閾値を超えるキーポイントが1つでもあるか
    pub fn any_valid(&self, threshold: f32) -> bool {
        self.keypoints.iter().any(|k| k.is_valid(threshold))
    }

    /// 全キーポイントの平均信頼度
    pub fn average_confidence(&self) -> f32 {
        let sum: f32 = self.keypoints.iter().map(|k| k.confidence).sum();
        sum / KeypointIndex::COUNT as f32
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            keypoints: [Keypoint::default(); KeypointIndex::COUNT],
        }
    }
}

/// FaceMesh の 468 ランドマーク (正規化座標)
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMesh {
    pub landmarks: Vec<[f32; 2]>,
}

impl FaceMesh {
    pub const LANDMARK_COUNT: usize = 468;

    pub fn new(landmarks: Vec<[f32; 2]>) -> Self {
        Self { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<[f32; 2]> {
        self.landmarks.get(index).copied()
    }
}
