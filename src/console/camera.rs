//! Console camera serving still images as its video tracks
//!
//! Each facing mode can be bound to an image file. An exact request for a
//! facing mode without an image fails, so the relaxed fallback kicks in and
//! gets a generated test pattern. No recorder format is offered; videos are
//! attached from files instead.

use crate::config::CaptureSettings;
use crate::error::DeviceError;
use crate::media::{
    FacingMode, MediaDevices, MediaStream, StreamConstraints, VideoConstraint, VideoFormat,
    VideoRecorder,
};
use async_trait::async_trait;
use image::{Rgb, RgbImage};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

const PATTERN_WIDTH: u32 = 640;
const PATTERN_HEIGHT: u32 = 480;

pub(crate) struct StillImageDevices {
    environment: Option<PathBuf>,
    user: Option<PathBuf>,
    next_id: AtomicUsize,
}

impl StillImageDevices {
    pub(crate) fn new(environment: Option<PathBuf>, user: Option<PathBuf>) -> Self {
        Self {
            environment,
            user,
            next_id: AtomicUsize::new(1),
        }
    }

    pub(crate) fn from_settings(settings: &CaptureSettings) -> Self {
        Self::new(
            settings.still_image(FacingMode::Environment),
            settings.still_image(FacingMode::User),
        )
    }

    fn image_for(&self, facing: FacingMode) -> Option<&Path> {
        match facing {
            FacingMode::Environment => self.environment.as_deref(),
            FacingMode::User => self.user.as_deref(),
        }
    }

    async fn load(path: &Path) -> Result<RgbImage, DeviceError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| read_error(path, e))?;
        Ok(image::load_from_memory(&bytes)?.to_rgb8())
    }
}

fn read_error(path: &Path, e: io::Error) -> DeviceError {
    let message = format!("{}: {}", path.display(), e);
    match e.kind() {
        io::ErrorKind::PermissionDenied => DeviceError::PermissionDenied(message),
        io::ErrorKind::NotFound => DeviceError::NotFound,
        _ => DeviceError::Other(message),
    }
}

/// Gradient frame used when no image is configured
fn test_pattern() -> RgbImage {
    RgbImage::from_fn(PATTERN_WIDTH, PATTERN_HEIGHT, |x, y| {
        Rgb([
            (x * 255 / PATTERN_WIDTH) as u8,
            (y * 255 / PATTERN_HEIGHT) as u8,
            128,
        ])
    })
}

#[async_trait]
impl MediaDevices for StillImageDevices {
    async fn get_user_media(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        let frame = match constraints.video {
            VideoConstraint::Exact(facing) => {
                let path = self.image_for(facing).ok_or(DeviceError::NotFound)?;
                Self::load(path).await?
            }
            VideoConstraint::Any => {
                match self.environment.as_deref().or(self.user.as_deref()) {
                    Some(path) => Self::load(path).await?,
                    None => test_pattern(),
                }
            }
        };

        let id = format!("still-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        info!(stream = %id, width = frame.width(), height = frame.height(), "Still image camera opened");
        Ok(Box::new(StillImageStream {
            id,
            frame: Arc::new(frame),
            live: true,
        }))
    }

    fn is_type_supported(&self, _mime: &str) -> bool {
        false
    }
}

struct StillImageStream {
    id: String,
    frame: Arc<RgbImage>,
    live: bool,
}

impl MediaStream for StillImageStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.live
    }

    fn is_ready(&self) -> bool {
        self.live
    }

    fn grab_frame(&self) -> Result<RgbImage, DeviceError> {
        Ok(self.frame.as_ref().clone())
    }

    fn clone_video_with_audio(&self) -> Result<Box<dyn MediaStream>, DeviceError> {
        Ok(Box::new(StillImageStream {
            id: format!("{}-clone", self.id),
            frame: self.frame.clone(),
            live: true,
        }))
    }

    fn start_recording(&self, format: VideoFormat) -> Result<Box<dyn VideoRecorder>, DeviceError> {
        Err(DeviceError::UnsupportedFormat(format.mime.to_string()))
    }

    fn stop_tracks(&mut self) {
        if self.live {
            debug!(stream = %self.id, "Still image tracks stopped");
        }
        self.live = false;
    }
}
