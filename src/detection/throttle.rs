/// コールバック回数で間引くレートリミッタ
///
/// 0回目, n回目, 2n回目... のコールバックだけを通す。描画フレームレートとは独立。
#[derive(Debug, Clone)]
pub struct RateLimiter {
    every: u64,
    seen: u64,
}

impl RateLimiter {
    pub fn every(n: u64) -> Self {
        Self {
            every: n.max(1),
            seen: 0,
        }
    }

    /// このコールバックを採用するか
    pub fn admit(&mut self) -> bool {
        let admitted = self.seen % self.every == 0;
        self.seen += 1;
        admitted
    }

    /// これまでに受けたコールバック数
    pub fn seen(&self) -> u64 {
        self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_every_nth_callback() {
        let mut limiter = RateLimiter::every(8);
        let admitted: Vec<u64> = (0..30).filter(|_| limiter.admit()).collect();
        assert_eq!(admitted.len(), 4);

        let mut limiter = RateLimiter::every(12);
        let indices: Vec<u64> = (0..30u64).filter(|_| limiter.admit()).collect();
        assert_eq!(indices, vec![0, 12, 24]);
        assert_eq!(limiter.seen(), 30);
    }

    #[test]
    fn test_every_one_admits_all() {
        let mut limiter = RateLimiter::every(1);
        assert!((0..10).all(|_| limiter.admit()));
    }

    #[test]
    fn test_zero_is_treated_as_one() {
        let mut limiter = RateLimiter::every(0);
        assert!(limiter.admit());
        assert!(limiter.admit());
    }
}
