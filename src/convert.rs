use std::fs;
use std::io;
use std::path::Path;

use log::{error, info, warn};
use rayon::prelude::*;

use crate::decode::decode_image;
use crate::encode::{encode_image, shrink_to_fit};
use crate::error::ConvertError;
use crate::models::conversion::{
    output_file_name, BatchOptions, BatchOutput, BatchSummary, ConversionRequest,
    ConversionResult,
};
use crate::models::image::InputImage;
use crate::utils::{archive_file_name, format_file_size, ProgressManager};
use crate::zip::ArchiveBuilder;

/// 轉換單一影像：解碼、選擇性縮小、編碼，回傳輸出檔名與編碼位元組
pub fn convert_single(
    input: &InputImage,
    request: &ConversionRequest,
) -> Result<(String, Vec<u8>), ConvertError> {
    let mut image = decode_image(&input.data)?;
    if let Some(limits) = &request.resize {
        image = shrink_to_fit(image, limits);
    }
    let data = encode_image(&image, request.format, request.quality)?;
    Ok((output_file_name(&input.file_name, request.format), data))
}

/// 批次轉換核心。每個輸入恰好產生一筆結果，順序與輸入相同；
/// 單一檔案失敗不會中止其餘檔案。全部失敗時 archive 為 None。
pub fn convert_batch(
    inputs: &[InputImage],
    request: &ConversionRequest,
    progress: &ProgressManager,
) -> BatchOutput {
    // 項目彼此獨立，平行轉換；collect 保持輸入順序
    let converted: Vec<Result<(String, Vec<u8>), ConvertError>> = inputs
        .par_iter()
        .map(|input| {
            let outcome = convert_single(input, request);
            progress.item_done(&input.file_name, outcome.is_ok());
            outcome
        })
        .collect();

    // ZIP 寫入維持循序，不需要鎖
    let mut builder = ArchiveBuilder::new();
    let mut results = Vec::with_capacity(inputs.len());
    for (input, outcome) in inputs.iter().zip(converted) {
        let result = match outcome {
            Ok((out_name, data)) => match builder.add_entry(&out_name, &data) {
                Ok(final_name) => ConversionResult::Converted {
                    file_name: final_name,
                    data,
                },
                Err(e) => ConversionResult::Failed {
                    file_name: input.file_name.clone(),
                    error: e.to_string(),
                },
            },
            Err(e) => ConversionResult::Failed {
                file_name: input.file_name.clone(),
                error: e.to_string(),
            },
        };
        results.push(result);
    }

    let archive = match builder.finish() {
        Ok(archive) => archive,
        Err(e) => {
            error!("壓縮檔收尾失敗：{}", e);
            None
        }
    };

    BatchOutput { results, archive }
}

/// CLI 層的完整流程：收集檔案、讀取、批次轉換、寫出 ZIP
pub fn run_conversion(options: &BatchOptions) -> io::Result<BatchSummary> {
    let files = crate::file::collect_heic_files(&options.input_path)?;
    if files.is_empty() {
        warn!("無符合條件的檔案可處理");
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "在 '{}' 找不到 HEIC/HEIF 檔案",
                options.input_path.display()
            ),
        ));
    }

    let inputs = crate::file::read_input_images(&files)?;
    let request = options.request();
    info!(
        "正在處理 {} 個檔案，輸出格式：{}",
        inputs.len(),
        request.format.label()
    );

    let progress = ProgressManager::new(inputs.len() as u64, options.no_progress);
    let output = convert_batch(&inputs, &request, &progress);

    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for (input, result) in inputs.iter().zip(&output.results) {
        match result {
            ConversionResult::Converted { file_name, data } => {
                info!(
                    "轉換成功：{} -> {}（{}）",
                    input.file_name,
                    file_name,
                    format_file_size(data.len())
                );
                succeeded.push(file_name.clone());
            }
            ConversionResult::Failed { file_name, error } => {
                error!("轉換失敗：{}：{}", file_name, error);
                failed.push((file_name.clone(), error.clone()));
            }
        }
    }
    progress.finish(succeeded.len(), failed.len());

    let archive = output.archive.ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "沒有任何檔案轉換成功")
    })?;

    fs::create_dir_all(&options.output_dir)?;
    let archive_path = Path::new(&options.output_dir).join(archive_file_name());
    fs::write(&archive_path, &archive)?;
    info!(
        "寫入壓縮檔：{}，大小：{}",
        archive_path.display(),
        format_file_size(archive.len())
    );

    Ok(BatchSummary {
        archive_path: archive_path.to_string_lossy().to_string(),
        succeeded,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversion::{OutputFormat, ResizeLimits};
    use std::io::Cursor;
    use zip::ZipArchive;

    fn png_input(name: &str, width: u32, height: u32) -> InputImage {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([50, 100, 150, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        InputImage::new(name, buf)
    }

    fn corrupt_input(name: &str) -> InputImage {
        InputImage::new(name, b"not an image at all".to_vec())
    }

    fn request(format: OutputFormat) -> ConversionRequest {
        ConversionRequest {
            format,
            quality: 95,
            resize: None,
        }
    }

    fn hidden_progress(total: usize) -> ProgressManager {
        ProgressManager::new(total as u64, true)
    }

    #[test]
    fn every_input_yields_exactly_one_result_in_order() {
        let inputs = vec![
            png_input("a.heic", 4, 4),
            corrupt_input("broken.heic"),
            png_input("c.heic", 4, 4),
        ];
        let output = convert_batch(&inputs, &request(OutputFormat::Png), &hidden_progress(3));

        assert_eq!(output.results.len(), 3);
        assert_eq!(output.results[0].file_name(), "a.png");
        assert!(!output.results[1].is_converted());
        assert_eq!(output.results[1].file_name(), "broken.heic");
        assert_eq!(output.results[2].file_name(), "c.png");
    }

    #[test]
    fn corrupt_input_does_not_abort_the_batch() {
        let inputs = vec![corrupt_input("x.heic"), png_input("y.heic", 2, 2)];
        let output = convert_batch(&inputs, &request(OutputFormat::Png), &hidden_progress(2));

        assert!(!output.results[0].is_converted());
        assert!(output.results[1].is_converted());

        let archive = output.archive.expect("一個成功項目應產生壓縮檔");
        let zip = ZipArchive::new(Cursor::new(archive)).unwrap();
        assert_eq!(zip.len(), 1);
    }

    #[test]
    fn all_failed_batch_has_no_archive() {
        let inputs = vec![corrupt_input("a.heic"), corrupt_input("b.heic")];
        let output = convert_batch(&inputs, &request(OutputFormat::Jpeg), &hidden_progress(2));

        assert!(output.archive.is_none());
        assert!(output.results.iter().all(|r| !r.is_converted()));
    }

    #[test]
    fn colliding_output_names_are_deduplicated() {
        let inputs = vec![png_input("photo.heic", 2, 2), png_input("photo.heic", 2, 2)];
        let output = convert_batch(&inputs, &request(OutputFormat::Png), &hidden_progress(2));

        assert_eq!(output.results[0].file_name(), "photo.png");
        assert_eq!(output.results[1].file_name(), "photo_1.png");

        let archive = output.archive.unwrap();
        let zip = ZipArchive::new(Cursor::new(archive)).unwrap();
        assert_eq!(zip.len(), 2);
    }

    #[test]
    fn resize_limits_apply_during_conversion() {
        let inputs = vec![png_input("big.heic", 400, 300)];
        let req = ConversionRequest {
            format: OutputFormat::Png,
            quality: 95,
            resize: Some(ResizeLimits {
                max_width: 100,
                max_height: 100,
            }),
        };
        let output = convert_batch(&inputs, &req, &hidden_progress(1));

        match &output.results[0] {
            ConversionResult::Converted { data, .. } => {
                let decoded = image::load_from_memory(data).unwrap();
                assert_eq!((decoded.width(), decoded.height()), (100, 75));
            }
            ConversionResult::Failed { error, .. } => panic!("轉換不應失敗：{}", error),
        }
    }

    #[test]
    fn run_conversion_writes_archive_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        // 內容為 PNG 位元組的 .heic 檔案會經由解碼 fallback 成功
        let input = png_input("sample.heic", 4, 4);
        std::fs::write(dir.path().join("sample.heic"), &input.data).unwrap();

        let options = BatchOptions {
            input_path: dir.path().to_path_buf(),
            output_dir: out_dir.path().to_string_lossy().to_string(),
            format: OutputFormat::Png,
            quality: 95,
            resize: None,
            no_progress: true,
        };
        let summary = run_conversion(&options).unwrap();

        assert_eq!(summary.succeeded, vec!["sample.png"]);
        assert!(summary.failed.is_empty());
        assert!(Path::new(&summary.archive_path).exists());
    }

    #[test]
    fn run_conversion_fails_when_nothing_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junk.heic"), b"garbage").unwrap();

        let options = BatchOptions {
            input_path: dir.path().to_path_buf(),
            output_dir: out_dir.path().to_string_lossy().to_string(),
            format: OutputFormat::Png,
            quality: 95,
            resize: None,
            no_progress: true,
        };
        assert!(run_conversion(&options).is_err());
    }

    #[test]
    fn run_conversion_errors_on_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let options = BatchOptions {
            input_path: dir.path().to_path_buf(),
            output_dir: "output".to_string(),
            format: OutputFormat::Png,
            quality: 95,
            resize: None,
            no_progress: true,
        };
        let err = run_conversion(&options).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
