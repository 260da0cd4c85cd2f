use rand::Rng;

/// 前回発火から period_ms 以上経過したら発火するタイマー
#[derive(Debug, Clone)]
pub struct CycleTimer {
    period_ms: u64,
    last_ms: u64,
}

impl CycleTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_ms: 0,
        }
    }

    /// 発火したら基準時刻を now_ms に更新して true
    pub fn fire(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) >= self.period_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// 最前面を1つずつ順送りする（顔フィールド用）
#[derive(Debug, Clone)]
pub struct SequentialCycle {
    len: usize,
    top: usize,
    timer: CycleTimer,
}

impl SequentialCycle {
    pub fn new(len: usize, period_ms: u64) -> Self {
        Self {
            len,
            top: 0,
            timer: CycleTimer::new(period_ms),
        }
    }

    /// 周期が来ていれば次へ進め、現在の最前面インデックスを返す
    pub fn update(&mut self, now_ms: u64) -> usize {
        if self.len > 0 && self.timer.fire(now_ms) {
            self.top = (self.top + 1) % self.len;
        }
        self.top
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// 最前面をランダムに選び直す（体フィールド用）
#[derive(Debug, Clone)]
pub struct RandomCycle {
    len: usize,
    top: usize,
    timer: CycleTimer,
}

impl RandomCycle {
    pub fn new(len: usize, period_ms: u64) -> Self {
        Self {
            len,
            top: 0,
            timer: CycleTimer::new(period_ms),
        }
    }

    pub fn update<R: Rng>(&mut self, now_ms: u64, rng: &mut R) -> usize {
        if self.len > 0 && self.timer.fire(now_ms) {
            self.top = rng.gen_range(0..self.len);
            tracing::trace!(top = self.top, "body field cycle");
        }
        self.top
    }

    pub fn top(&self) -> usize {
        self.top
    }
}

/// 各グループの最前面インデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleState {
    pub face: usize,
    pub body: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_timer_fires_at_period() {
        let mut timer = CycleTimer::new(800);
        assert!(!timer.fire(0));
        assert!(!timer.fire(799));
        assert!(timer.fire(800));
        assert!(!timer.fire(1599));
        assert!(timer.fire(1600));
    }

    #[test]
    fn test_sequential_advances_by_one_every_period() {
        // 800ms 周期・4フィールド: 800ms ごとにちょうど 1 (mod 4) 進む
        let mut cycle = SequentialCycle::new(4, 800);
        let mut expected = 0;
        for step in 0..20u64 {
            let now = step * 100;
            let top = cycle.update(now);
            if step > 0 && now % 800 == 0 {
                expected = (expected + 1) % 4;
            }
            assert_eq!(top, expected, "t={}", now);
        }
        assert_eq!(cycle.update(2400), 3);
        assert_eq!(cycle.update(3200), 0);
    }

    #[test]
    fn test_empty_sequential_stays_zero() {
        let mut cycle = SequentialCycle::new(0, 10);
        assert_eq!(cycle.update(1000), 0);
        assert!(cycle.is_empty());
    }

    #[test]
    fn test_random_cycle_in_range_and_timed() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cycle = RandomCycle::new(24, 1500);
        let first = cycle.update(100, &mut rng);
        assert_eq!(first, 0);
        for i in 1..50u64 {
            let top = cycle.update(i * 1500, &mut rng);
            assert!(top < 24);
        }
        // 周期内では変わらない
        let held = cycle.top();
        assert_eq!(cycle.update(49 * 1500 + 10, &mut rng), held);
    }
}
