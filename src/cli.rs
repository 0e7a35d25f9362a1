use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::convert::run_conversion;
use crate::interactive::process_interactive_mode;
use crate::models::conversion::{BatchOptions, BatchSummary, OutputFormat, ResizeLimits};
use crate::utils::setup_logging;

pub const QUALITY_RANGE: (u8, u8) = (1, 100);
pub const DIMENSION_RANGE: (u32, u32) = (100, 4000);

#[derive(Parser)]
#[command(
    name = "heic_to_image",
    about = "將 HEIC/HEIF 照片批次轉換為一般圖片格式並打包為 ZIP",
    long_about = "一個將 HEIC/HEIF 照片批次轉換為 PNG、JPEG、WEBP 或 BMP 的工具，可選擇等比例縮小，結果打包為單一 ZIP 壓縮檔。單一檔案失敗不會中止整批轉換。\n不帶參數執行會進入互動模式。使用 `--help` 查看詳細用法。"
)]
pub struct Cli {
    /// HEIC 檔案或目錄路徑
    pub input: String,
    #[arg(short, long, default_value = "output")]
    pub output: String,
    #[arg(long, value_enum, default_value = "png")]
    pub format: OutputFormat,
    /// JPEG 品質（1 到 100），其他格式忽略
    #[arg(long, default_value_t = 95)]
    pub quality: u8,
    /// 啟用等比例縮小
    #[arg(long, default_value_t = false)]
    pub resize: bool,
    #[arg(long, default_value_t = 1920)]
    pub max_width: u32,
    #[arg(long, default_value_t = 1080)]
    pub max_height: u32,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["info", "warn", "error"])]
    pub log_level: String,
}

pub fn process_args(args: Vec<String>) -> io::Result<String> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<String> {
    let cli = Cli::parse();
    validate_cli_args(&cli)?;
    setup_logging(&cli.log_level)?;

    let resize = if cli.resize {
        Some(ResizeLimits {
            max_width: cli.max_width,
            max_height: cli.max_height,
        })
    } else {
        None
    };

    let options = BatchOptions {
        input_path: PathBuf::from(&cli.input),
        output_dir: cli.output.clone(),
        format: cli.format,
        quality: cli.quality,
        resize,
        no_progress: cli.no_progress,
    };

    log::info!(
        "開始批次轉換，輸入路徑：{}，輸出目錄：{}，格式：{}",
        cli.input,
        cli.output,
        cli.format.label()
    );
    let summary = run_conversion(&options)?;
    report_summary(&summary);
    Ok(summary.archive_path)
}

pub fn report_summary(summary: &BatchSummary) {
    println!(
        "成功 {} 個，失敗 {} 個",
        summary.succeeded.len(),
        summary.failed.len()
    );
    for (file_name, error) in &summary.failed {
        println!("轉換失敗：{}：{}", file_name, error);
    }
}

pub fn validate_cli_args(cli: &Cli) -> io::Result<()> {
    validate_input_path(&cli.input)?;
    validate_quality(cli.quality)?;
    if cli.resize {
        validate_dimension(cli.max_width, "寬度")?;
        validate_dimension(cli.max_height, "高度")?;
    }
    Ok(())
}

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input),
        ));
    }
    Ok(path)
}

pub fn validate_quality(quality: u8) -> io::Result<()> {
    let (min, max) = QUALITY_RANGE;
    if quality < min || quality > max {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("品質必須介於 {} 到 {} 之間，目前為 {}", min, max, quality),
        ));
    }
    Ok(())
}

pub fn validate_dimension(value: u32, label: &str) -> io::Result<()> {
    let (min, max) = DIMENSION_RANGE;
    if value < min || value > max {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}上限必須介於 {} 到 {} 之間，目前為 {}", label, min, max, value),
        ));
    }
    Ok(())
}
