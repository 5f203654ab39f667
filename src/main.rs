use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use video_frame_extractor::cli::Cli;
use video_frame_extractor::component::BatchFrameExtractor;
use video_frame_extractor::config::{Config, save_settings};
use video_frame_extractor::init;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init::init_logger(cli.verbose);

    let mut config = Config::load(cli.settings.as_deref())?;
    cli.apply_to(&mut config);

    if let Some(path) = &cli.write_settings {
        save_settings(&config.settings, path)?;
        info!("已寫入設定檔: {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let options = cli.extraction_options(&config)?;

    info!("開始影格擷取流程...");
    info!("輸入路徑: {}", options.input_dir.display());
    info!("輸出路徑: {}", options.output_dir.display());
    info!("使用 {} 個平行 worker", options.num_processes);

    let extractor = BatchFrameExtractor::new(config, options);
    let summary = extractor.run()?;

    if cli.fail_on_error && summary.failed() > 0 {
        error!("{} 個影片擷取失敗", summary.failed());
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
