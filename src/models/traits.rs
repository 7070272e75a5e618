use crate::models::state::SimulationState;
use crate::simulation::SimulationError;

/// スナップショット列の出力先インターフェース
pub trait ISnapshotSink {
    /// ヘッダ行と全スナップショットを書き込む
    fn write_snapshots(&mut self, snapshots: &[SimulationState]) -> Result<(), SimulationError>;

    /// バッファの書き出し
    fn flush(&mut self) -> Result<(), SimulationError>;
}
