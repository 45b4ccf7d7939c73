//! Snapshot encoding, recording format probing and attachment mime types

use super::slots::EncodedMedia;
use crate::error::DeviceError;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::path::Path;

/// Container format handed to the video recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VideoFormat {
    /// Mime type including codec parameters, as probed
    pub(crate) mime: &'static str,
    /// Mime type of the resulting blob
    pub(crate) container: &'static str,
}

pub(crate) const MP4_AVC1: VideoFormat = VideoFormat {
    mime: "video/mp4; codecs=avc1",
    container: "video/mp4",
};

pub(crate) const WEBM: VideoFormat = VideoFormat {
    mime: "video/webm",
    container: "video/webm",
};

/// Formats in order of preference
const VIDEO_FORMATS: [VideoFormat; 2] = [MP4_AVC1, WEBM];

/// Pick the first recording format the platform supports
pub(crate) fn select_video_format<F>(is_supported: F) -> Result<VideoFormat, DeviceError>
where
    F: Fn(&str) -> bool,
{
    VIDEO_FORMATS
        .iter()
        .copied()
        .find(|format| is_supported(format.mime))
        .ok_or_else(|| {
            let tried: Vec<_> = VIDEO_FORMATS.iter().map(|f| f.mime).collect();
            DeviceError::UnsupportedFormat(tried.join(", "))
        })
}

/// Encode a frame as a quality-reduced JPEG data URL
pub(crate) fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<EncodedMedia, DeviceError> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    frame.write_with_encoder(encoder)?;
    Ok(EncodedMedia::from_bytes("image/jpeg", &bytes))
}

/// Mime type for an attached file, from its extension
pub(crate) fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}
