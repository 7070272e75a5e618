use crate::models::{
    common::{integrate, SimTime},
    constants::PhysicalConstants,
};
use crate::simulation::SimulationError;

/// 発射筒に格納されたロケットの発射イベント
///
/// 設定時に一度だけ作られ、以後は変更されない。燃焼窓
/// `[launch, launch + burn]` の間だけ機体に摂動を与える。
#[derive(Debug, Clone, PartialEq)]
pub struct RocketEvent {
    pub id: String,
    /// 発射時刻
    pub launch: SimTime,
    /// 燃焼時間[ms]
    pub burn_ms: u64,
    /// ロケット質量[kg]
    pub mass: f64,
    /// 発射後経過ミリ秒ごとのピッチ軸からの半径距離[m]
    pub radial_table: Option<Vec<f64>>,
}

impl RocketEvent {
    pub fn new(id: String, launch: SimTime, burn_ms: u64, mass: f64) -> Self {
        Self {
            id,
            launch,
            burn_ms,
            mass,
            radial_table: None,
        }
    }

    pub fn with_radial_table(mut self, table: Vec<f64>) -> Self {
        self.radial_table = Some(table);
        self
    }

    /// 燃焼終了時刻
    pub fn burnout(&self) -> SimTime {
        self.launch.advanced_by(self.burn_ms)
    }

    /// 燃焼窓に時刻 `t` が含まれるか
    pub fn is_active(&self, t: SimTime) -> bool {
        self.launch <= t && t <= self.burnout()
    }

    /// 可変部を含む全質量
    pub fn total_mass(&self, constants: &PhysicalConstants) -> f64 {
        self.mass + constants.m_part
    }

    /// 時刻 `t` でのピッチ軸からの半径距離
    ///
    /// テーブルを持たないロケットはNone。経過時間がテーブル長を超える場合は
    /// 設定不整合として致命的エラーを返す。
    pub fn radial_distance(&self, t: SimTime) -> Result<Option<f64>, SimulationError> {
        let Some(table) = &self.radial_table else {
            return Ok(None);
        };
        let elapsed_ms = t.millis_since(self.launch).unwrap_or(0);
        table
            .get(elapsed_ms as usize)
            .copied()
            .map(Some)
            .ok_or_else(|| SimulationError::RadialTableExhausted {
                rocket: self.id.clone(),
                elapsed_ms,
                len: table.len(),
            })
    }

    /// 燃焼中ロケットによる慣性モーメント寄与 (m + m_part)·r²
    pub fn inertia_contribution(&self, constants: &PhysicalConstants, t: SimTime) -> Result<f64, SimulationError> {
        Ok(self
            .radial_distance(t)?
            .map(|r| self.total_mass(constants) * r * r)
            .unwrap_or(0.0))
    }
}

/// 燃焼中ロケットの運動状態
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RocketMotion {
    /// 速度[m/s]
    pub velocity: f64,
    /// 変位[m]
    pub displacement: f64,
}

impl RocketMotion {
    /// 一定減速項で速度・変位を1刻み積分
    pub fn integrate(&mut self, constants: &PhysicalConstants, dt: f64) {
        self.velocity = integrate(self.velocity, constants.n_x, dt);
        self.displacement = integrate(self.displacement, self.velocity, dt);
    }

    /// 推力モーメント L·(m + m_part)·g
    pub fn thrust_moment(&self, rocket: &RocketEvent, constants: &PhysicalConstants) -> f64 {
        self.displacement * rocket.total_mass(constants) * constants.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rocket() -> RocketEvent {
        RocketEvent::new("R1".to_string(), SimTime::from_millis(4000), 15, 15.0)
    }

    #[test]
    fn test_is_active_window_is_inclusive() {
        let r = rocket();
        assert!(!r.is_active(SimTime::from_millis(3999)));
        assert!(r.is_active(SimTime::from_millis(4000)));
        assert!(r.is_active(SimTime::from_millis(4015)));
        assert!(!r.is_active(SimTime::from_millis(4016)));
        assert_eq!(r.burnout(), SimTime::from_millis(4015));
    }

    #[test]
    fn test_radial_distance_lookup() {
        let table: Vec<f64> = (0..=15).map(|i| 0.6 + i as f64 * 0.01).collect();
        let r = rocket().with_radial_table(table);
        assert_eq!(r.radial_distance(SimTime::from_millis(4000)).unwrap(), Some(0.6));
        assert_abs_diff_eq!(
            r.radial_distance(SimTime::from_millis(4015)).unwrap().unwrap(),
            0.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_radial_table_exhausted_is_error() {
        let r = rocket().with_radial_table(vec![0.6; 10]);
        match r.radial_distance(SimTime::from_millis(4012)) {
            Err(SimulationError::RadialTableExhausted { rocket, elapsed_ms, len }) => {
                assert_eq!(rocket, "R1");
                assert_eq!(elapsed_ms, 12);
                assert_eq!(len, 10);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_no_table_contributes_nothing() {
        let c = PhysicalConstants::default();
        let r = rocket();
        assert_eq!(r.radial_distance(SimTime::from_millis(4005)).unwrap(), None);
        assert_eq!(r.inertia_contribution(&c, SimTime::from_millis(4005)).unwrap(), 0.0);
    }

    #[test]
    fn test_motion_integration_and_moment() {
        let c = PhysicalConstants::default();
        let r = rocket();
        let mut motion = RocketMotion::default();
        motion.integrate(&c, 0.001);
        assert_abs_diff_eq!(motion.velocity, -0.007, epsilon = 1e-15);
        assert_abs_diff_eq!(motion.displacement, -0.000007, epsilon = 1e-15);
        motion.integrate(&c, 0.001);
        assert_abs_diff_eq!(motion.velocity, -0.014, epsilon = 1e-15);
        assert_abs_diff_eq!(motion.displacement, -0.000021, epsilon = 1e-15);

        let expected = motion.displacement * (15.0 + 1.3) * 9.81;
        assert_abs_diff_eq!(motion.thrust_moment(&r, &c), expected, epsilon = 1e-15);
    }
}
