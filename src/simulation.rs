//! # Simulation モジュール
//!
//! ロケット斉射時の機体縦系運動を積分するシミュレーションエンジンを提供します。
//!
//! 固定刻み（既定1ms）の半陰的オイラー積分で、慣性モーメント・角運動・
//! 迎角・昇降舵角・ピッチングモーメントを1ステップずつ更新し、
//! 全ステップのスナップショットをメモリ上に蓄積します。出力は実行後に一括で行います。
//!
//! ## 1ステップの処理順序
//!
//! 1. **慣性モーメント**: 発射済みロケットの質量を差し引き、燃焼中ロケットの半径寄与を加算
//! 2. **角加速度**: 前ステップのモーメントから ε = M·R·g / I
//! 3. **角速度**: ω += ε·Δt
//! 4. **迎角**: α += ω·Δt
//! 5. **昇降舵角**: トリム則 δ = −(mα·α)/mδ
//! 6. **空力モーメント**: 更新後の α, δ から算出
//! 7. **ロケット**: 燃焼窓内のロケットの速度・変位を積分し推力モーメントを加算、
//!    燃焼終了時刻に離脱数を1増やす
//!
//! 時刻は整数ミリ秒で保持するため、発射・燃焼終了の判定は厳密な等値比較です。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use crate::simulation::SimulationEngine;
//! use crate::scenario::{ScenarioConfig, MAX_STEPS};
//!
//! let config = ScenarioConfig::default();
//! let mut engine = SimulationEngine::new(&config, 0).unwrap();
//! let report = engine.run().unwrap();
//! assert_eq!(report.snapshot_count, 10_001);
//! ```

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::models::{
    aerodynamics, integrate, step_seconds, MassBudget, PhysicalConstants, RocketEvent, RocketMotion,
    SignalRange, SimTime, SimulationState,
};
use crate::scenario::{ScenarioConfig, MAX_STEPS};

/// シミュレーション実行時エラー
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("ロケット {rocket} の半径テーブルが不足しています (経過 {elapsed_ms}ms, テーブル長 {len}): 燃焼時間とテーブル長が一致しません")]
    RadialTableExhausted {
        rocket: String,
        elapsed_ms: u64,
        len: usize,
    },
    #[error("質量が負になりました: {0}")]
    NegativeMass(String),
    #[error("CSV出力エラー: {0}")]
    Csv(#[from] csv::Error),
    #[error("出力エラー: {0}")]
    Io(#[from] std::io::Error),
}

/// 1ステップ進めた状態を計算する
///
/// `motions` は `rockets` と同じ並びのロケット運動状態で、燃焼窓内のものだけ更新される。
/// `rockets` は発射順に並んでいること（先頭 `launched_count` 発が離脱済み）。
pub fn advance(
    state: &SimulationState,
    constants: &PhysicalConstants,
    rockets: &[RocketEvent],
    motions: &mut [RocketMotion],
    step_ms: u64,
) -> Result<SimulationState, SimulationError> {
    let time = state.time.advanced_by(step_ms);
    let dt = step_seconds(step_ms);

    // 1. 慣性モーメント
    let launched = &rockets[..(state.launched_count as usize).min(rockets.len())];
    let budget = MassBudget::after_launches(constants, launched)?;
    let mut burning_inertia = 0.0;
    for rocket in rockets.iter().filter(|r| r.is_active(time)) {
        burning_inertia += rocket.inertia_contribution(constants, time)?;
    }
    let moment_of_inertia = budget.moment_of_inertia(constants, burning_inertia);

    // 2〜4. 角運動
    let angular_acceleration =
        aerodynamics::angular_acceleration(constants, state.aerodynamic_moment, moment_of_inertia);
    let angular_velocity = integrate(state.angular_velocity, angular_acceleration, dt);
    let attack_angle = integrate(state.attack_angle, angular_velocity, dt);

    // 5〜6. トリムと空力モーメント
    let elevator_angle = aerodynamics::trim_elevator_angle(constants, attack_angle);
    let mut aerodynamic_moment = aerodynamics::pitching_moment(constants, attack_angle, elevator_angle);

    // 7. 燃焼中ロケット
    let mut rocket_moment = 0.0;
    let mut rocket_velocity = 0.0;
    let mut rocket_displacement = 0.0;
    let mut launched_count = state.launched_count;
    for (rocket, motion) in rockets.iter().zip(motions.iter_mut()) {
        if !rocket.is_active(time) {
            continue;
        }
        motion.integrate(constants, dt);
        rocket_moment += motion.thrust_moment(rocket, constants);
        rocket_velocity += motion.velocity;
        rocket_displacement += motion.displacement;

        if time == rocket.burnout() {
            launched_count += 1;
        }
    }
    aerodynamic_moment += rocket_moment;

    Ok(SimulationState {
        time,
        moment_of_inertia,
        angular_acceleration,
        angular_velocity,
        attack_angle,
        elevator_angle,
        aerodynamic_moment,
        rocket_moment,
        rocket_velocity,
        rocket_displacement,
        launched_count,
    })
}

/// ロケット離脱記録
#[derive(Debug, Clone, PartialEq)]
pub struct BurnoutRecord {
    pub rocket_id: String,
    pub time: SimTime,
    pub moment_of_inertia: f64,
}

/// 実行結果の概要
#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot_count: usize,
    pub final_time: SimTime,
    pub launched_count: u32,
    pub burnouts: Vec<BurnoutRecord>,
    pub angular_acceleration: Option<SignalRange>,
    pub angular_velocity: Option<SignalRange>,
    pub attack_angle: Option<SignalRange>,
    pub elevator_angle: Option<SignalRange>,
}

impl RunReport {
    /// 概要をログに出力
    pub fn log_summary(&self) {
        info!("=== 実行結果 ===");
        info!("スナップショット数: {}", self.snapshot_count);
        info!("終了時刻: {}", self.final_time);
        info!("離脱ロケット数: {}", self.launched_count);
        for record in &self.burnouts {
            info!(
                "  {}: 離脱 {} (I = {:.4})",
                record.rocket_id, record.time, record.moment_of_inertia
            );
        }
        let signals = [
            ("epsilon", self.angular_acceleration),
            ("omega", self.angular_velocity),
            ("alpha", self.attack_angle),
            ("delta", self.elevator_angle),
        ];
        for (name, range) in signals {
            if let Some(r) = range {
                info!("  {}: min {:.6e}, max {:.6e}", name, r.min, r.max);
            }
        }
    }
}

pub struct SimulationEngine {
    pub step_ms: u64,
    pub end_time: SimTime,
    pub step_count: u64,

    pub constants: PhysicalConstants,
    pub rockets: Vec<RocketEvent>,
    pub motions: Vec<RocketMotion>,

    pub state: SimulationState,
    pub history: Vec<SimulationState>,
    pub burnouts: Vec<BurnoutRecord>,

    pub verbose_level: u8,
}

impl SimulationEngine {
    /// シナリオを検証してエンジンを作成
    pub fn new(scenario: &ScenarioConfig, verbose_level: u8) -> Result<Self, Box<dyn std::error::Error>> {
        scenario.validate()?;

        let constants = scenario.constants.clone();
        let rockets = scenario.rocket_events();
        let motions = vec![RocketMotion::default(); rockets.len()];

        let initial_inertia = MassBudget::after_launches(&constants, &[])?.moment_of_inertia(&constants, 0.0);
        let state = SimulationState::initial(&constants, scenario.sim.initial_attack_angle, initial_inertia);

        let step_count = scenario.sim.end_ms / scenario.sim.step_ms;
        let mut history = Vec::with_capacity(step_count.min(MAX_STEPS) as usize + 1);
        history.push(state);

        if verbose_level > 0 {
            info!("シミュレーションエンジンを初期化しました:");
            info!("  ロケット: {}発", rockets.len());
            info!("  初期慣性モーメント: {:.4}", initial_inertia);
            info!("  初期迎角: {}", state.attack_angle);
        }

        Ok(Self {
            step_ms: scenario.sim.step_ms,
            end_time: SimTime::from_millis(scenario.sim.end_ms),
            step_count: 0,
            constants,
            rockets,
            motions,
            state,
            history,
            burnouts: Vec::new(),
            verbose_level,
        })
    }

    /// 終了時刻まで積分する
    pub fn run(&mut self) -> Result<RunReport, SimulationError> {
        info!("=== シミュレーション実行開始 ===");

        let progress_interval = (1000 / self.step_ms).max(1);
        while self.state.time < self.end_time {
            self.step()?;

            if self.verbose_level > 2 {
                trace!(
                    "時刻: {} I={:.4} ε={:.6e} ω={:.6e} α={:.6} Mz={:.6e}",
                    self.state.time,
                    self.state.moment_of_inertia,
                    self.state.angular_acceleration,
                    self.state.angular_velocity,
                    self.state.attack_angle,
                    self.state.aerodynamic_moment
                );
            }

            if self.verbose_level > 0 && self.step_count % progress_interval == 0 {
                let progress = self.state.time.as_millis() as f64 / self.end_time.as_millis() as f64 * 100.0;
                info!("進行状況: {:.1}% ({})", progress, self.state.time);
            }
        }

        info!("=== シミュレーション完了 ===");
        info!("総ステップ数: {}", self.step_count);

        Ok(self.report())
    }

    /// 1ステップ進めて履歴に追加
    pub fn step(&mut self) -> Result<(), SimulationError> {
        let next = advance(
            &self.state,
            &self.constants,
            &self.rockets,
            &mut self.motions,
            self.step_ms,
        )?;

        for rocket in self.rockets.iter().filter(|r| r.launch == next.time) {
            debug!("ロケット発射: {} ({})", rocket.id, next.time);
        }
        if next.launched_count > self.state.launched_count {
            let rocket = &self.rockets[self.state.launched_count as usize];
            debug!(
                "ロケット離脱: {} ({}, 離脱数 {})",
                rocket.id, next.time, next.launched_count
            );
            self.burnouts.push(BurnoutRecord {
                rocket_id: rocket.id.clone(),
                time: next.time,
                moment_of_inertia: next.moment_of_inertia,
            });
        }

        self.state = next;
        self.history.push(next);
        self.step_count += 1;
        Ok(())
    }

    /// 蓄積したスナップショット列
    pub fn history(&self) -> &[SimulationState] {
        &self.history
    }

    pub fn report(&self) -> RunReport {
        let h = &self.history;
        RunReport {
            snapshot_count: h.len(),
            final_time: self.state.time,
            launched_count: self.state.launched_count,
            burnouts: self.burnouts.clone(),
            angular_acceleration: SignalRange::from_values(h.iter().map(|s| s.angular_acceleration)),
            angular_velocity: SignalRange::from_values(h.iter().map(|s| s.angular_velocity)),
            attack_angle: SignalRange::from_values(h.iter().map(|s| s.attack_angle)),
            elevator_angle: SignalRange::from_values(h.iter().map(|s| s.elevator_angle)),
        }
    }
}
