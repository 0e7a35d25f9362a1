use std::collections::HashSet;
use std::io::{Cursor, Write};

use log::info;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::ConvertError;

/// 在記憶體中累積轉換成功的項目並輸出單一 ZIP。
/// 項目名稱重複時附加數字後綴，不會靜默覆蓋。
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    used_names: HashSet<String>,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        ArchiveBuilder {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            used_names: HashSet::new(),
            entries: 0,
        }
    }

    /// 寫入一個項目，回傳實際使用的項目名稱（可能帶後綴）
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<String, ConvertError> {
        let final_name = self.unique_name(name);
        if final_name != name {
            info!("輸出檔名重複：{}，改用：{}", name, final_name);
        }
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(5));
        self.writer
            .start_file(final_name.clone(), options)
            .map_err(|e| ConvertError::Archive(e.to_string()))?;
        self.writer
            .write_all(data)
            .map_err(|e| ConvertError::Archive(e.to_string()))?;
        self.used_names.insert(final_name.clone());
        self.entries += 1;
        Ok(final_name)
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// 完成壓縮檔，沒有任何項目時回傳 None
    pub fn finish(self) -> Result<Option<Vec<u8>>, ConvertError> {
        if self.entries == 0 {
            return Ok(None);
        }
        let cursor = self
            .writer
            .finish()
            .map_err(|e| ConvertError::Archive(e.to_string()))?;
        let buffer = cursor.into_inner();
        info!("生成 ZIP 壓縮檔，共 {} 個項目，大小：{} 位元組", self.entries, buffer.len());
        Ok(Some(buffer))
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.used_names.contains(name) {
            return name.to_string();
        }
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, ext),
            _ => (name, ""),
        };
        let mut n = 1;
        loop {
            let candidate = if ext.is_empty() {
                format!("{}_{}", stem, n)
            } else {
                format!("{}_{}.{}", stem, n, ext)
            };
            if !self.used_names.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
