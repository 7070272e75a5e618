//! セミコロン区切りの時系列出力
//!
//! ヘッダ1行と、スナップショットごとに1行を書き出す。区切り文字はクォートしない。
//! 時刻はここで初めて秒に変換される。

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::models::{ISnapshotSink, SimulationState};
use crate::simulation::SimulationError;

/// 出力列名
pub const HEADER: [&str; 11] = [
    "time_s",
    "moment_of_inertia",
    "angular_acceleration",
    "angular_velocity",
    "attack_angle",
    "elevator_angle",
    "aerodynamic_moment",
    "rocket_moment",
    "rocket_velocity",
    "rocket_displacement",
    "launched_count",
];

#[derive(Debug, Serialize)]
struct SnapshotRow {
    time_s: f64,
    moment_of_inertia: f64,
    angular_acceleration: f64,
    angular_velocity: f64,
    attack_angle: f64,
    elevator_angle: f64,
    aerodynamic_moment: f64,
    rocket_moment: f64,
    rocket_velocity: f64,
    rocket_displacement: f64,
    launched_count: u32,
}

impl From<&SimulationState> for SnapshotRow {
    fn from(s: &SimulationState) -> Self {
        Self {
            time_s: s.time.as_seconds(),
            moment_of_inertia: s.moment_of_inertia,
            angular_acceleration: s.angular_acceleration,
            angular_velocity: s.angular_velocity,
            attack_angle: s.attack_angle,
            elevator_angle: s.elevator_angle,
            aerodynamic_moment: s.aerodynamic_moment,
            rocket_moment: s.rocket_moment,
            rocket_velocity: s.rocket_velocity,
            rocket_displacement: s.rocket_displacement,
            launched_count: s.launched_count,
        }
    }
}

/// CSV出力先
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .quote_style(csv::QuoteStyle::Never)
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    /// 書き込み先を取り出す
    pub fn into_inner(self) -> Result<W, SimulationError> {
        self.writer
            .into_inner()
            .map_err(|e| SimulationError::Io(e.into_error()))
    }
}

impl<W: Write> ISnapshotSink for CsvSink<W> {
    fn write_snapshots(&mut self, snapshots: &[SimulationState]) -> Result<(), SimulationError> {
        self.writer.write_record(HEADER)?;
        for snapshot in snapshots {
            self.writer.serialize(SnapshotRow::from(snapshot))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SimulationError> {
        self.writer.flush()?;
        Ok(())
    }
}
