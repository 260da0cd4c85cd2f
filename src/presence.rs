use crate::config::PresenceConfig;

/// 描画モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 人がいない: 待機画面
    Idle,
    /// 人がいる: カメラ映像 + フォームフィールド
    Active,
}

/// 人物の有無から Idle / Active を切り替える
///
/// 有効なキーポイントが見えた瞬間に Active。最後に見えてから timeout 以上経つと Idle。
#[derive(Debug, Clone)]
pub struct PresenceController {
    idle_timeout_ms: u64,
    last_seen_ms: Option<u64>,
    mode: Mode,
}

impl PresenceController {
    pub fn new(idle_timeout_ms: u64) -> Self {
        Self {
            idle_timeout_ms,
            last_seen_ms: None,
            mode: Mode::Idle,
        }
    }

    pub fn from_config(config: &PresenceConfig) -> Self {
        Self::new(config.idle_timeout_ms)
    }

    /// このフレームの検出結果でモードを更新
    pub fn update(&mut self, person_present: bool, now_ms: u64) -> Mode {
        let previous = self.mode;

        if person_present {
            self.last_seen_ms = Some(now_ms);
            self.mode = Mode::Active;
        } else {
            let timed_out = match self.last_seen_ms {
                Some(last) => now_ms.saturating_sub(last) >= self.idle_timeout_ms,
                None => true,
            };
            if timed_out {
                self.mode = Mode::Idle;
            }
        }

        if self.mode != previous {
            tracing::info!(mode = ?self.mode, now_ms, "presence changed");
        }
        self.mode
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_seen_ms(&self) -> Option<u64> {
        self.last_seen_ms
    }
}
