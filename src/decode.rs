use image::{DynamicImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

use crate::error::ConvertError;

/// ISO-BMFF ftyp 品牌，涵蓋常見 HEIC/HEIF 變體
const HEIF_BRANDS: [&[u8; 4]; 9] = [
    b"heic", b"heix", b"heim", b"heis", b"hevc", b"hevx", b"heif", b"mif1", b"msf1",
];

/// 檢查位元組開頭是否為 HEIF 容器（偏移 4 處的 ftyp box 與已知品牌）
pub fn is_heif_data(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }
    let brand = &data[8..12];
    HEIF_BRANDS.iter().any(|b| brand == *b)
}

/// 將輸入位元組解碼為像素影像。HEIF 容器走 libheif，
/// 其餘格式交給 image crate 判斷（與來源工具接受任意可讀影像的行為一致）
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, ConvertError> {
    if is_heif_data(data) {
        decode_heif(data)
    } else {
        image::load_from_memory(data).map_err(|e| ConvertError::Decode(e.to_string()))
    }
}

fn decode_heif(data: &[u8]) -> Result<DynamicImage, ConvertError> {
    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data).map_err(|e| ConvertError::Decode(e.to_string()))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| ConvertError::Decode(e.to_string()))?;

    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
        .map_err(|e| ConvertError::Decode(e.to_string()))?;
    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| ConvertError::Decode("HEIF 影像缺少交錯像素平面".to_string()))?;

    let width = plane.width;
    let height = plane.height;
    let row_bytes = width as usize * 4;
    let mut buf = Vec::with_capacity(row_bytes * height as usize);
    // stride 可能大於列寬，逐列複製
    for y in 0..height as usize {
        let start = y * plane.stride;
        let row = plane
            .data
            .get(start..start + row_bytes)
            .ok_or_else(|| ConvertError::Decode("HEIF 像素資料長度不足".to_string()))?;
        buf.extend_from_slice(row);
    }

    let rgba = RgbaImage::from_raw(width, height, buf)
        .ok_or_else(|| ConvertError::Decode("HEIF 像素資料無法組成影像".to_string()))?;
    Ok(DynamicImage::ImageRgba8(rgba))
}
