use serde::{Deserialize, Serialize};

/// 物理・空力定数
///
/// 初期化後は変更されない。シナリオから読み込み、積分器へは参照で渡す。
/// 省略されたフィールドは既定値（機体＋発射筒の初期慣性モーメント 38.8）になる。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// 重力加速度[m/s²]
    pub gravity: f64,
    /// 迎角に対するピッチングモーメント微係数
    pub m_alpha_z: f64,
    /// 昇降舵角に対するピッチングモーメント微係数
    pub m_delta_z: f64,
    /// 基準半径（角加速度換算係数）
    pub radius: f64,
    /// 主翼面積[m²]
    pub s_wing: f64,
    /// 動圧[Pa]
    pub q: f64,
    /// 平均空力翼弦[m]
    pub b_a: f64,
    /// 縦方向荷重倍数（ロケットの減速項）
    pub n_x: f64,
    /// ロケット1発あたりの可変（消費）質量[kg]
    pub m_part: f64,
    /// 機体基本質量[kg]
    pub m_all: f64,
    /// 発射筒・ペイロード基本質量[kg]
    pub tube_mass: f64,
    /// 満載時の機体慣性モーメント[kg·m²]
    pub airframe_inertia: f64,
    /// 発射筒のピッチ軸からの距離[m]
    pub tube_arm: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            m_alpha_z: -0.0033,
            m_delta_z: -0.0025,
            radius: 57.3,
            s_wing: 5.34,
            q: 1236.25,
            b_a: 1.684,
            n_x: -7.0,
            m_part: 1.3,
            m_all: 50.0,
            tube_mass: 5.0,
            airframe_inertia: 37.0,
            tube_arm: 0.6,
        }
    }
}

impl PhysicalConstants {
    /// 空力モーメントの共通係数 S·q·b_a
    pub fn aero_scale(&self) -> f64 {
        self.s_wing * self.q * self.b_a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_initial_inertia() {
        let c = PhysicalConstants::default();
        let initial = c.airframe_inertia + c.tube_mass * c.tube_arm * c.tube_arm;
        assert_relative_eq!(initial, 38.8, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let c: PhysicalConstants = serde_yaml::from_str("gravity: 9.8\nm_all: 60.0\n").unwrap();
        assert_eq!(c.gravity, 9.8);
        assert_eq!(c.m_all, 60.0);
        assert_eq!(c.m_alpha_z, -0.0033);
    }
}
