//! 縦系（ピッチ）運動の空力モデル
//!
//! 昇降舵は迎角に比例するトリム則で決まり、時間積分はしない。

use crate::models::constants::PhysicalConstants;

/// トリム則による昇降舵角 δ = −(mα·α)/mδ
pub fn trim_elevator_angle(constants: &PhysicalConstants, attack_angle: f64) -> f64 {
    -(constants.m_alpha_z * attack_angle) / constants.m_delta_z
}

/// 迎角・昇降舵角による空力ピッチングモーメント
pub fn pitching_moment(constants: &PhysicalConstants, attack_angle: f64, elevator_angle: f64) -> f64 {
    let scale = constants.aero_scale();
    (attack_angle * constants.m_alpha_z * scale) / constants.gravity
        + (elevator_angle * constants.m_delta_z * scale) / constants.gravity
}

/// 角加速度 ε = M·R·g / I
pub fn angular_acceleration(constants: &PhysicalConstants, moment: f64, moment_of_inertia: f64) -> f64 {
    moment * constants.radius * constants.gravity / moment_of_inertia
}
