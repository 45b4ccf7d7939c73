//! Camera/microphone capability traits
//!
//! Mirrors the shape of a media-devices API: request a stream under
//! constraints, probe recorder formats, grab frames and record video.

use super::encoding::VideoFormat;
use super::session::StreamConstraints;
use crate::error::DeviceError;
use async_trait::async_trait;
use image::RgbImage;

#[async_trait]
pub(crate) trait MediaDevices: Send + Sync {
    /// Request a combined camera/microphone stream
    async fn get_user_media(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError>;

    /// Whether the recorder can produce `mime`
    fn is_type_supported(&self, mime: &str) -> bool;
}

/// A live stream holding camera (and usually microphone) tracks
pub(crate) trait MediaStream: Send + Sync {
    fn id(&self) -> &str;

    /// At least one track is still live
    fn is_active(&self) -> bool;

    /// Frames are flowing and a snapshot can be taken
    fn is_ready(&self) -> bool;

    fn grab_frame(&self) -> Result<RgbImage, DeviceError>;

    /// New stream with a cloned video track plus this stream's audio tracks
    fn clone_video_with_audio(&self) -> Result<Box<dyn MediaStream>, DeviceError>;

    fn start_recording(&self, format: VideoFormat) -> Result<Box<dyn VideoRecorder>, DeviceError>;

    /// Stop every track, releasing the hardware; idempotent
    fn stop_tracks(&mut self);
}

#[async_trait]
pub(crate) trait VideoRecorder: Send + Sync {
    /// Stop and hand back the encoded chunks in order
    async fn stop(self: Box<Self>) -> Result<Vec<Vec<u8>>, DeviceError>;
}
