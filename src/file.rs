use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;

use crate::models::image::InputImage;

const HEIC_EXTENSIONS: [&str; 2] = ["heic", "heif"];

pub fn is_heic_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            HEIC_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 收集輸入檔案。目錄會遞迴掃描並僅保留 .heic/.heif，
/// 明確指定的單一檔案則直接交給解碼器判斷
pub fn collect_heic_files(input_path: &Path) -> io::Result<Vec<PathBuf>> {
    if input_path.is_file() {
        if !is_heic_file(input_path) {
            warn!("輸入檔案非 .heic/.heif 副檔名：{}", input_path.display());
        }
        return Ok(vec![input_path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input_path).sort_by_file_name() {
        let entry =
            entry.map_err(|e| io::Error::new(io::ErrorKind::Other, format!("掃描目錄失敗: {}", e)))?;
        if entry.file_type().is_file() && is_heic_file(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    info!("共收集 {} 個 HEIC/HEIF 檔案", files.len());
    Ok(files)
}

pub fn read_file_content(file_path: &Path) -> io::Result<(Vec<u8>, usize)> {
    let file = File::open(file_path)?;
    let file_size = file.metadata()?.len() as usize;
    let mut data = Vec::with_capacity(file_size);
    let mut reader = io::BufReader::with_capacity(4 * 1024 * 1024, file);
    reader.read_to_end(&mut data)?;
    Ok((data, file_size))
}

pub fn read_input_images(paths: &[PathBuf]) -> io::Result<Vec<InputImage>> {
    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        let (data, file_size) = read_file_content(path)?;
        info!("讀取檔案：{}，原始大小：{} 位元組", path.display(), file_size);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "image.heic".to_string());
        inputs.push(InputImage::new(file_name, data));
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn directory_scan_keeps_only_heic_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.HEIF"), b"x").unwrap();
        fs::write(dir.path().join("a.heic"), b"x").unwrap();
        fs::write(dir.path().join("c.txt"), b"x").unwrap();
        fs::write(dir.path().join("d.jpg"), b"x").unwrap();

        let files = collect_heic_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.heic", "b.HEIF"]);
    }

    #[test]
    fn explicit_file_is_accepted_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        fs::write(&path, b"x").unwrap();

        let files = collect_heic_files(&path).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn nested_directories_are_scanned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("x.heic"), b"x").unwrap();

        let files = collect_heic_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn reads_bytes_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.heic");
        fs::write(&path, b"hello").unwrap();

        let (data, size) = read_file_content(&path).unwrap();
        assert_eq!(data, b"hello");
        assert_eq!(size, 5);
    }
}
