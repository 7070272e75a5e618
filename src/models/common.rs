use std::fmt;
use std::ops::Sub;

/// シミュレーション時刻（整数ミリ秒）
///
/// 浮動小数点の秒で時刻を持つと、刻みの累積誤差により発射・燃焼終了の
/// 等値判定が取りこぼされる。時刻は常に整数で保持し、秒への変換は
/// 出力境界でのみ行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// 出力用の秒表現
    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// 1刻み分進めた時刻
    ///
    /// 検証済みシナリオでは終了時刻を超えないため、u64 の上限で飽和させる。
    pub fn advanced_by(&self, step_ms: u64) -> Self {
        Self(self.0.saturating_add(step_ms))
    }

    /// `earlier` からの経過ミリ秒（`earlier` より前ならNone）
    pub fn millis_since(&self, earlier: SimTime) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl Sub for SimTime {
    type Output = u64;

    fn sub(self, other: Self) -> Self::Output {
        self.0.saturating_sub(other.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}秒", self.as_seconds())
    }
}

/// ミリ秒刻み幅を秒に変換
pub fn step_seconds(step_ms: u64) -> f64 {
    step_ms as f64 / 1000.0
}

/// 陽的オイラー積分の1ステップ
pub fn integrate(previous: f64, rate: f64, dt: f64) -> f64 {
    previous + rate * dt
}

/// 信号の最小・最大値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRange {
    pub min: f64,
    pub max: f64,
}

impl SignalRange {
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |range, v| match range {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self { min: r.min.min(v), max: r.max.max(v) }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time_advances_exactly() {
        let mut t = SimTime::ZERO;
        for _ in 0..10_000 {
            t = t.advanced_by(1);
        }
        assert_eq!(t, SimTime::from_millis(10_000));
        assert_eq!(t.as_seconds(), 10.0);
    }

    #[test]
    fn test_advanced_by_saturates() {
        let t = SimTime::from_millis(u64::MAX - 4);
        assert_eq!(t.advanced_by(15), SimTime::from_millis(u64::MAX));
    }

    #[test]
    fn test_millis_since() {
        let launch = SimTime::from_millis(4000);
        assert_eq!(SimTime::from_millis(4015).millis_since(launch), Some(15));
        assert_eq!(SimTime::from_millis(3999).millis_since(launch), None);
        assert_eq!(SimTime::from_millis(3999) - launch, 0);
    }

    #[test]
    fn test_integrate() {
        assert_eq!(integrate(4.0, 2.0, 0.5), 5.0);
        assert_eq!(step_seconds(1), 0.001);
    }

    #[test]
    fn test_signal_range() {
        let range = SignalRange::from_values([1.0, -3.0, 2.5]).unwrap();
        assert_eq!(range.min, -3.0);
        assert_eq!(range.max, 2.5);
        assert!(SignalRange::from_values(std::iter::empty()).is_none());
    }
}
