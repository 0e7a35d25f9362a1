use std::io;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();
    Ok(())
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}")
                    .unwrap()
                    .progress_chars("##-"),
            );
            pb
        };
        ProgressManager { pb, no_progress }
    }

    pub fn item_done(&self, file_name: &str, succeeded: bool) {
        if self.no_progress {
            return;
        }
        let state = if succeeded { "完成" } else { "失敗" };
        self.pb.set_message(format!("{}：{}", state, file_name));
        self.pb.inc(1);
    }

    pub fn finish(&self, succeeded: usize, failed: usize) {
        if self.no_progress {
            return;
        }
        self.pb
            .finish_with_message(format!("處理完成，成功 {} 個，失敗 {} 個", succeeded, failed));
    }
}

pub fn format_file_size(size: usize) -> String {
    if size < 1024 * 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    }
}

/// 輸出壓縮檔名稱，附帶當下時間戳
pub fn archive_file_name() -> String {
    format!(
        "converted_images_{}.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}
