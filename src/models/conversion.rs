use std::path::PathBuf;

use clap::ValueEnum;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Bmp,
}

impl OutputFormat {
    /// 輸出檔案的副檔名（小寫）
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Webp => "WEBP",
            OutputFormat::Bmp => "BMP",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeLimits {
    pub max_width: u32,
    pub max_height: u32,
}

#[derive(Clone, Debug)]
pub struct ConversionRequest {
    pub format: OutputFormat,
    /// JPEG 品質，1 到 100，其他格式忽略
    pub quality: u8,
    pub resize: Option<ResizeLimits>,
}

#[derive(Debug)]
pub enum ConversionResult {
    Converted { file_name: String, data: Vec<u8> },
    Failed { file_name: String, error: String },
}

impl ConversionResult {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionResult::Converted { .. })
    }

    pub fn file_name(&self) -> &str {
        match self {
            ConversionResult::Converted { file_name, .. } => file_name,
            ConversionResult::Failed { file_name, .. } => file_name,
        }
    }
}

#[derive(Debug)]
pub struct BatchOutput {
    /// 每個輸入對應一筆結果，順序與輸入相同
    pub results: Vec<ConversionResult>,
    /// 全部失敗時為 None
    pub archive: Option<Vec<u8>>,
}

#[derive(Clone)]
pub struct BatchOptions {
    pub input_path: PathBuf,
    pub output_dir: String,
    pub format: OutputFormat,
    pub quality: u8,
    pub resize: Option<ResizeLimits>,
    pub no_progress: bool,
}

impl BatchOptions {
    pub fn request(&self) -> ConversionRequest {
        ConversionRequest {
            format: self.format,
            quality: self.quality,
            resize: self.resize,
        }
    }
}

#[derive(Debug)]
pub struct BatchSummary {
    pub archive_path: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// 以目標格式的副檔名取代原始副檔名，無副檔名時直接附加
pub fn output_file_name(input_name: &str, format: OutputFormat) -> String {
    let stem = match input_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => input_name,
    };
    format!("{}.{}", stem, format.extension())
}
