use std::io;
use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use crate::cli::{report_summary, validate_input_path, DIMENSION_RANGE, QUALITY_RANGE};
use crate::convert::run_conversion;
use crate::models::conversion::{BatchOptions, OutputFormat, ResizeLimits};
use crate::utils::setup_logging;

fn prompt_err(e: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("互動輸入失敗: {}", e))
}

/// 不帶參數執行時的互動流程，逐項詢問後走與 CLI 相同的轉換路徑
pub fn process_interactive_mode() -> io::Result<String> {
    println!("HEIC 批次轉換工具（互動模式）");

    let input: String = Input::new()
        .with_prompt("請輸入 HEIC 檔案或目錄路徑")
        .validate_with(|value: &String| -> Result<(), String> {
            if std::path::Path::new(value).exists() {
                Ok(())
            } else {
                Err(format!("路徑 '{}' 不存在", value))
            }
        })
        .interact_text()
        .map_err(prompt_err)?;
    validate_input_path(&input)?;

    let output: String = Input::new()
        .with_prompt("請輸入輸出目錄")
        .default("output".to_string())
        .interact_text()
        .map_err(prompt_err)?;

    let formats = [
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::Webp,
        OutputFormat::Bmp,
    ];
    let labels: Vec<&str> = formats.iter().map(|f| f.label()).collect();
    let selected = Select::new()
        .with_prompt("選擇輸出格式")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let format = formats[selected];

    let quality = if format == OutputFormat::Jpeg {
        let (min, max) = QUALITY_RANGE;
        Input::<u8>::new()
            .with_prompt(format!("JPEG 品質（{} 到 {}）", min, max))
            .default(95)
            .validate_with(move |value: &u8| -> Result<(), String> {
                if *value >= min && *value <= max {
                    Ok(())
                } else {
                    Err(format!("品質必須介於 {} 到 {} 之間", min, max))
                }
            })
            .interact_text()
            .map_err(prompt_err)?
    } else {
        95
    };

    let resize = Confirm::new()
        .with_prompt("是否等比例縮小影像？")
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    let limits = if resize {
        Some(ResizeLimits {
            max_width: prompt_dimension("最大寬度", 1920)?,
            max_height: prompt_dimension("最大高度", 1080)?,
        })
    } else {
        None
    };

    setup_logging("info")?;

    let options = BatchOptions {
        input_path: PathBuf::from(&input),
        output_dir: output,
        format,
        quality,
        resize: limits,
        no_progress: false,
    };
    let summary = run_conversion(&options)?;
    report_summary(&summary);
    Ok(summary.archive_path)
}

fn prompt_dimension(label: &str, default: u32) -> io::Result<u32> {
    let (min, max) = DIMENSION_RANGE;
    Input::<u32>::new()
        .with_prompt(format!("{}（{} 到 {}）", label, min, max))
        .default(default)
        .validate_with(move |value: &u32| -> Result<(), String> {
            if *value >= min && *value <= max {
                Ok(())
            } else {
                Err(format!("尺寸上限必須介於 {} 到 {} 之間", min, max))
            }
        })
        .interact_text()
        .map_err(prompt_err)
}
