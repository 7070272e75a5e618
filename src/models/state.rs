use crate::models::{aerodynamics, common::SimTime, constants::PhysicalConstants};

/// 1刻みごとの状態スナップショット
///
/// 積分ループだけが生成し、履歴に追加された後は変更しない。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// 経過時刻
    pub time: SimTime,
    /// 機体＋発射筒の慣性モーメント I
    pub moment_of_inertia: f64,
    /// 角加速度 ε
    pub angular_acceleration: f64,
    /// 角速度 ω
    pub angular_velocity: f64,
    /// 迎角 α
    pub attack_angle: f64,
    /// 昇降舵角 δ
    pub elevator_angle: f64,
    /// ロケット寄与を含む全ピッチングモーメント Mz
    pub aerodynamic_moment: f64,
    /// ロケット推力モーメント Mzp
    pub rocket_moment: f64,
    /// 燃焼中ロケットの速度 V
    pub rocket_velocity: f64,
    /// 燃焼中ロケットの変位 Lp
    pub rocket_displacement: f64,
    /// 燃焼を終えて離脱したロケット数
    pub launched_count: u32,
}

impl SimulationState {
    /// t=0 のトリム状態
    pub fn initial(constants: &PhysicalConstants, attack_angle: f64, moment_of_inertia: f64) -> Self {
        Self {
            time: SimTime::ZERO,
            moment_of_inertia,
            angular_acceleration: 0.0,
            angular_velocity: 0.0,
            attack_angle,
            elevator_angle: aerodynamics::trim_elevator_angle(constants, attack_angle),
            aerodynamic_moment: 0.0,
            rocket_moment: 0.0,
            rocket_velocity: 0.0,
            rocket_displacement: 0.0,
            launched_count: 0,
        }
    }
}
