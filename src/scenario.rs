use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{MassBudget, PhysicalConstants, RocketEvent, SimTime};

/// シナリオメタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

impl Default for ScenarioMeta {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: "salvo_default".to_string(),
            description: "4秒・8秒に各1発を発射する2発斉射".to_string(),
        }
    }
}

/// シミュレーション設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 時間刻み[ms]
    pub step_ms: u64,
    /// 終了時刻[ms]
    pub end_ms: u64,
    /// 初期迎角（トリム状態）
    pub initial_attack_angle: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_ms: 1,
            end_ms: 10_000,
            initial_attack_angle: 4.0,
        }
    }
}

/// ロケット設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RocketConfig {
    pub id: String,
    pub launch_ms: u64,
    pub burn_ms: u64,
    pub mass_kg: f64,
    /// 発射後1msごとの半径距離[m]（長さは burn_ms + 1）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radial_table_m: Option<Vec<f64>>,
}

impl RocketConfig {
    fn to_event(&self) -> RocketEvent {
        let event = RocketEvent::new(
            self.id.clone(),
            SimTime::from_millis(self.launch_ms),
            self.burn_ms,
            self.mass_kg,
        );
        match &self.radial_table_m {
            Some(table) => event.with_radial_table(table.clone()),
            None => event,
        }
    }
}

/// 完全なシナリオ設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub meta: ScenarioMeta,
    #[serde(default)]
    pub sim: SimulationConfig,
    #[serde(default)]
    pub constants: PhysicalConstants,
    pub rockets: Vec<RocketConfig>,
}

impl Default for ScenarioConfig {
    /// 組み込みの2発斉射シナリオ
    fn default() -> Self {
        let rocket = |id: &str, launch_ms: u64| RocketConfig {
            id: id.to_string(),
            launch_ms,
            burn_ms: 15,
            mass_kg: 15.0,
            radial_table_m: None,
        };

        Self {
            meta: ScenarioMeta::default(),
            sim: SimulationConfig::default(),
            constants: PhysicalConstants::default(),
            rockets: vec![rocket("R1", 4000), rocket("R2", 8000)],
        }
    }
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        config.validate()?;

        Ok(config)
    }

    /// 設定の検証
    ///
    /// 積分ループに入る前に、時刻の整合性と質量収支をすべて確認する。
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let step = self.sim.step_ms;
        if step == 0 {
            return Err(invalid("step_ms must be positive".to_string()));
        }
        if self.sim.end_ms == 0 || self.sim.end_ms % step != 0 {
            return Err(invalid(format!(
                "end_ms {} must be a positive multiple of step_ms {}",
                self.sim.end_ms, step
            )));
        }

        if self.sim.end_ms / step > MAX_STEPS {
            return Err(invalid(format!(
                "end_ms {} / step_ms {} exceeds the limit of {} steps",
                self.sim.end_ms, step, MAX_STEPS
            )));
        }

        let c = &self.constants;
        if !c.m_part.is_finite() || c.m_part < 0.0 {
            return Err(invalid(format!("m_part {} must be finite and non-negative", c.m_part)));
        }
        if c.m_delta_z == 0.0 {
            return Err(invalid("m_delta_z must be non-zero".to_string()));
        }
        if c.gravity == 0.0 {
            return Err(invalid("gravity must be non-zero".to_string()));
        }

        let mut previous_burnout: Option<(&str, u64)> = None;
        for rocket in &self.rockets {
            if rocket.launch_ms == 0 || rocket.launch_ms % step != 0 || rocket.burn_ms % step != 0 {
                return Err(invalid(format!(
                    "Rocket {} launch {}ms / burn {}ms must be positive multiples of step_ms {}",
                    rocket.id, rocket.launch_ms, rocket.burn_ms, step
                )));
            }
            if !rocket.mass_kg.is_finite() || rocket.mass_kg < 0.0 {
                return Err(invalid(format!(
                    "Rocket {} mass {}kg must be finite and non-negative",
                    rocket.id, rocket.mass_kg
                )));
            }
            if rocket.mass_kg + c.m_part < 0.0 {
                return Err(invalid(format!(
                    "Rocket {} total mass {}kg must be non-negative",
                    rocket.id,
                    rocket.mass_kg + c.m_part
                )));
            }
            let burnout = rocket.launch_ms.checked_add(rocket.burn_ms).ok_or_else(|| {
                invalid(format!(
                    "Rocket {} launch {}ms + burn {}ms overflows",
                    rocket.id, rocket.launch_ms, rocket.burn_ms
                ))
            })?;
            if burnout > self.sim.end_ms {
                return Err(invalid(format!(
                    "Rocket {} burnout {}ms exceeds end_ms {}",
                    rocket.id, burnout, self.sim.end_ms
                )));
            }
            if let Some((prev_id, prev_burnout)) = previous_burnout {
                if rocket.launch_ms <= prev_burnout {
                    return Err(invalid(format!(
                        "Rocket {} launches at {}ms before {} burns out at {}ms (overlapping burn windows are not supported; launches must be sequential)",
                        rocket.id, rocket.launch_ms, prev_id, prev_burnout
                    )));
                }
            }
            if let Some(table) = &rocket.radial_table_m {
                let expected = rocket
                    .burn_ms
                    .checked_add(1)
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| invalid(format!("Rocket {} burn {}ms is too long", rocket.id, rocket.burn_ms)))?;
                if table.len() != expected {
                    return Err(invalid(format!(
                        "Rocket {} radial table has {} samples, burn of {}ms needs {}",
                        rocket.id,
                        table.len(),
                        rocket.burn_ms,
                        expected
                    )));
                }
            }
            if let Some(table) = &rocket.radial_table_m {
                if let Some(bad) = table.iter().position(|r| !r.is_finite()) {
                    return Err(invalid(format!(
                        "Rocket {} radial table sample {} is not finite",
                        rocket.id, bad
                    )));
                }
            }
            previous_burnout = Some((rocket.id.as_str(), burnout));
        }

        let events = self.rocket_events();
        let budget = MassBudget::after_launches(c, &events)
            .map_err(|e| invalid(e.to_string()))?;
        let full = MassBudget::after_launches(c, &[]).map_err(|e| invalid(e.to_string()))?;
        if full.moment_of_inertia(c, 0.0) <= 0.0 || budget.moment_of_inertia(c, 0.0) <= 0.0 {
            return Err(invalid("moment of inertia must stay positive".to_string()));
        }

        Ok(())
    }

    /// 発射順に並んだロケットイベント列
    pub fn rocket_events(&self) -> Vec<RocketEvent> {
        self.rockets.iter().map(RocketConfig::to_event).collect()
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== シミュレーション設定 ===");
        println!("時間刻み: {}ms", self.sim.step_ms);
        println!("終了時刻: {:.3}秒", self.sim.end_ms as f64 / 1000.0);
        println!("初期迎角: {}", self.sim.initial_attack_angle);
        println!();

        println!("=== 機体 ===");
        println!("機体質量: {:.1}kg", self.constants.m_all);
        println!("発射筒質量: {:.1}kg", self.constants.tube_mass);
        println!();

        println!("=== ロケット ===");
        println!("搭載数: {}発", self.rockets.len());
        let total_mass: f64 = self.rockets.iter().map(|r| r.mass_kg).sum();
        println!("総質量: {:.1}kg", total_mass);

        for rocket in &self.rockets {
            println!(
                "  {}: 発射 {:.3}秒, 燃焼 {}ms, {:.1}kg{}",
                rocket.id,
                rocket.launch_ms as f64 / 1000.0,
                rocket.burn_ms,
                rocket.mass_kg,
                if rocket.radial_table_m.is_some() { " (半径テーブルあり)" } else { "" }
            );
        }
    }
}

/// 1回の実行で積分するステップ数の上限（スナップショットは全件メモリに保持する）
pub const MAX_STEPS: u64 = 10_000_000;

fn invalid(msg: String) -> ScenarioError {
    ScenarioError::ValidationError(msg)
}

/// シナリオ読み込みエラー
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("シナリオファイルが見つかりません: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("ファイル読み込みエラー {}: {}", .0.display(), .1)]
    IoError(PathBuf, #[source] std::io::Error),
    #[error("YAML解析エラー {}: {}", .0.display(), .1)]
    ParseError(PathBuf, #[source] serde_yaml::Error),
    #[error("設定検証エラー: {0}")]
    ValidationError(String),
}
