mod logging;
mod models;
mod output;
mod scenario;
mod simulation;

use clap::{Arg, Command};
use models::ISnapshotSink;
use std::process::ExitCode;
use output::CsvSink;
use scenario::ScenarioConfig;
use simulation::SimulationEngine;
use tracing::{error, info};

fn main() -> ExitCode {
    let matches = Command::new("pitchsim")
        .version("0.1.0")
        .about("ロケット斉射時の機体縦系運動シミュレーション")
        .long_about("発射筒に格納したロケットを順次発射する機体のピッチ運動を\n\
                     1ms刻みで積分し、時系列をセミコロン区切りで出力します。")
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
                .long_help("実行するシナリオファイル(.yaml)のパスを指定します。\n\
                           指定しない場合、組み込みの2発斉射シナリオで実行されます。")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .default_value("results.csv")
                .help("出力ファイルのパス")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 進行状況, -vv: 発射イベント, -vvv: 全ステップ)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .default_value("console")
                .value_parser(|s: &str| s.parse::<logging::LogOutput>())
                .help("ログ出力先 (console, file, both)")
        )
        .get_matches();

    let verbose_level = matches.get_count("verbose");

    let log_config = logging::LogConfig {
        level: matches
            .get_one::<String>("log-level")
            .map(|s| logging::parse_log_level(s))
            .unwrap_or_else(|| logging::level_for_verbosity(verbose_level)),
        output: matches
            .get_one::<logging::LogOutput>("log-output")
            .copied()
            .unwrap_or(logging::LogOutput::Console),
        ..logging::LogConfig::default()
    };
    let guard = match logging::init_logging(log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ログ初期化エラー: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let scenario_path = matches.get_one::<String>("scenario").map(String::as_str);
    let output_path = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("results.csv");

    let code = match run(scenario_path, output_path, matches.get_flag("info"), verbose_level) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("エラー: {}", e);
            ExitCode::FAILURE
        }
    };

    // 非同期ログを書き切ってから終了する
    drop(guard);
    code
}

/// シナリオを読み込んで実行
fn run(
    scenario_path: Option<&str>,
    output_path: &str,
    info_only: bool,
    verbose_level: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = match scenario_path {
        Some(path) => {
            let scenario = ScenarioConfig::from_file(path)?;
            info!("シナリオファイル読み込み完了: {}", path);
            scenario
        }
        None => ScenarioConfig::default(),
    };

    if info_only {
        scenario.print_summary();
        return Ok(());
    }

    if verbose_level > 0 {
        scenario.print_summary();
        println!();
    }

    let mut simulation = SimulationEngine::new(&scenario, verbose_level)?;
    let report = simulation.run()?;

    let mut sink = CsvSink::from_path(output_path)?;
    sink.write_snapshots(simulation.history())?;
    sink.flush()?;
    sink.into_inner()?;
    info!("結果を書き出しました: {} ({}行)", output_path, report.snapshot_count);

    report.log_summary();

    Ok(())
}
