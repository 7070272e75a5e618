// 時刻表現と数値積分ユーティリティ
pub mod common;

// 出力先インターフェース（trait）定義
pub mod traits;

// 物理モデル
pub mod constants;
pub mod aerodynamics;
pub mod mass;
pub mod rocket;
pub mod state;

// 便利な re-export
pub use common::*;
pub use traits::*;
pub use constants::PhysicalConstants;
pub use mass::MassBudget;
pub use rocket::{RocketEvent, RocketMotion};
pub use state::SimulationState;
