use thiserror::Error;

/// 單一檔案轉換過程中的錯誤，於項目邊界攔截後轉為 Failed 結果
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 輸入資料損壞或編碼器不支援
    #[error("解碼失敗：{0}")]
    Decode(String),

    /// 目標格式無法編碼該像素資料或參數
    #[error("編碼失敗：{0}")]
    Encode(String),

    /// 寫入 ZIP 項目失敗
    #[error("寫入壓縮檔失敗：{0}")]
    Archive(String),
}
