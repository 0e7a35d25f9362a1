use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::error::ConvertError;
use crate::models::conversion::{OutputFormat, ResizeLimits};

/// 計算等比例縮小後的尺寸，影像已在範圍內時回傳 None（不放大）
pub fn shrink_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> Option<(u32, u32)> {
    if width <= max_width && height <= max_height {
        return None;
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let w = ((width as f64 * ratio).round() as u32).clamp(1, max_width);
    let h = ((height as f64 * ratio).round() as u32).clamp(1, max_height);
    Some((w, h))
}

pub fn shrink_to_fit(image: DynamicImage, limits: &ResizeLimits) -> DynamicImage {
    match shrink_dimensions(
        image.width(),
        image.height(),
        limits.max_width,
        limits.max_height,
    ) {
        Some((w, h)) => image.resize_exact(w, h, FilterType::Triangle),
        None => image,
    }
}

/// 將帶透明度的影像合成到不透明白色背景上（JPEG 不支援 alpha）
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        for c in 0..3 {
            dst[c] = ((src[c] as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        }
    }
    rgb
}

/// 以目標格式編碼影像。JPEG 先壓平透明度並套用品質參數，
/// 其他格式使用編碼器預設（無損）設定
pub fn encode_image(
    image: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let rgb = flatten_onto_white(image);
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
            DynamicImage::ImageRgb8(rgb)
                .write_with_encoder(encoder)
                .map_err(|e| ConvertError::Encode(e.to_string()))?;
        }
        OutputFormat::Png | OutputFormat::Webp | OutputFormat::Bmp => {
            to_encodable(image)
                .write_to(&mut Cursor::new(&mut buf), image_format(format))
                .map_err(|e| ConvertError::Encode(e.to_string()))?;
        }
    }
    Ok(buf)
}

fn image_format(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Jpeg => ImageFormat::Jpeg,
        OutputFormat::Webp => ImageFormat::WebP,
        OutputFormat::Bmp => ImageFormat::Bmp,
    }
}

// WEBP 與 BMP 編碼器只接受 8 位元 RGB/RGBA，其他色彩型別先轉換
fn to_encodable(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        _ if image.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}
