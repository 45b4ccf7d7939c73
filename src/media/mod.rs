//! Media capture management
//!
//! Owns the live camera/microphone session and the photo/video slot
//! collections. Snapshots, recordings and file attachments all append a slot
//! and render exactly one new thumbnail.
//!
//! # Resource discipline
//! There is at most one `CaptureSession`. Activating a new one drops the old
//! session first, which stops its hardware tracks.

mod devices;
mod encoding;
mod session;
mod slots;

pub(crate) use devices::{MediaDevices, MediaStream, VideoRecorder};
pub(crate) use encoding::VideoFormat;
pub(crate) use session::{CaptureSession, FacingMode, StreamConstraints, VideoConstraint};
pub(crate) use slots::{EncodedMedia, SlotCollection, SlotIndex};

#[cfg(test)]
pub(crate) use encoding::{MP4_AVC1, WEBM};

use crate::error::{AttachError, DeviceError};
use crate::platform::PlatformFamily;
use crate::recording_state::{RecordingRejected, RecordingState};
use crate::view::{CaptureLayout, FormView, Notice};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

const CAMERA_DENIED: &str =
    "No se pudo acceder a la cámara. Por favor, revisa los permisos del dispositivo.";
const CAMERA_NOT_READY: &str = "La cámara no está lista. Espere un momento.";
const STREAM_NOT_ACTIVE: &str = "El stream de la cámara no está activo.";
const NO_VIDEO_FORMAT: &str = "Ni MP4 ni WebM son soportados en este dispositivo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MediaKind {
    Photo,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Why a video recording did not start
#[derive(Debug, thiserror::Error)]
pub(crate) enum VideoStartError {
    #[error(transparent)]
    Rejected(#[from] RecordingRejected),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// An in-flight video recording
struct ActiveRecording {
    recorder: Box<dyn VideoRecorder>,
    format: VideoFormat,
    /// Cloned stream recorded instead of the live one; stopped with the recorder
    cloned: Option<Box<dyn MediaStream>>,
}

pub(crate) struct MediaCaptureManager {
    session: Option<CaptureSession>,
    facing: FacingMode,
    initial_facing: FacingMode,
    photos: SlotCollection,
    videos: SlotCollection,
    recording: Option<ActiveRecording>,
    photo_quality: u8,
}

impl MediaCaptureManager {
    pub(crate) fn new(facing: FacingMode, photo_quality: u8) -> Self {
        Self {
            session: None,
            facing,
            initial_facing: facing,
            photos: SlotCollection::default(),
            videos: SlotCollection::default(),
            recording: None,
            photo_quality,
        }
    }

    pub(crate) fn facing(&self) -> FacingMode {
        self.facing
    }

    pub(crate) fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub(crate) fn photos(&self) -> &SlotCollection {
        &self.photos
    }

    pub(crate) fn videos(&self) -> &SlotCollection {
        &self.videos
    }

    pub(crate) fn collection(&self, kind: MediaKind) -> &SlotCollection {
        match kind {
            MediaKind::Photo => &self.photos,
            MediaKind::Video => &self.videos,
        }
    }

    fn collection_mut(&mut self, kind: MediaKind) -> &mut SlotCollection {
        match kind {
            MediaKind::Photo => &mut self.photos,
            MediaKind::Video => &mut self.videos,
        }
    }

    /// Acquire camera + microphone with `facing`, falling back once to any camera
    #[instrument(skip(self, devices, view))]
    pub(crate) async fn activate_session(
        &mut self,
        devices: &dyn MediaDevices,
        view: &mut dyn FormView,
        facing: FacingMode,
    ) -> Result<(), DeviceError> {
        // Tear down the previous stream before asking for a new one
        self.release_session();

        let (stream, relaxed) = match devices
            .get_user_media(&StreamConstraints::exact(facing))
            .await
        {
            Ok(stream) => (stream, false),
            Err(e) => {
                warn!(error = %e, %facing, "Camera request with exact facing mode failed, retrying unconstrained");
                match devices.get_user_media(&StreamConstraints::relaxed()).await {
                    Ok(stream) => (stream, true),
                    Err(e) => {
                        error!(error = %e, "No camera could be opened");
                        view.show_layout(CaptureLayout::Inactive);
                        view.notify(Notice::error(CAMERA_DENIED));
                        return Err(e);
                    }
                }
            }
        };

        view.bind_preview(stream.id());
        view.show_layout(CaptureLayout::Active);
        info!(stream = %stream.id(), %facing, relaxed, "Capture session active");

        self.facing = facing;
        self.session = Some(CaptureSession::new(stream, facing, relaxed));
        Ok(())
    }

    /// Flip between front and rear camera and re-acquire the stream
    pub(crate) async fn switch_facing(
        &mut self,
        devices: &dyn MediaDevices,
        view: &mut dyn FormView,
    ) -> Result<(), DeviceError> {
        let next = self.facing.flipped();
        info!(from = %self.facing, to = %next, "Switching camera");
        self.activate_session(devices, view, next).await
    }

    /// Snapshot the current frame into the next photo slot
    pub(crate) fn capture_photo(&mut self, view: &mut dyn FormView) -> Result<SlotIndex, DeviceError> {
        let Some(session) = self.session.as_ref().filter(|s| s.is_ready()) else {
            warn!("Photo requested without a ready camera");
            view.notify(Notice::error(CAMERA_NOT_READY));
            return Err(DeviceError::NotReady);
        };

        let encoded = match session
            .stream()
            .grab_frame()
            .and_then(|frame| encoding::encode_jpeg(&frame, self.photo_quality))
        {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "Failed to capture photo");
                view.notify(Notice::error(format!("No se pudo tomar la foto: {}", e)));
                return Err(e);
            }
        };

        let index = self.photos.push(encoded);
        if let Some(photo) = self.photos.get(index) {
            view.add_thumbnail(MediaKind::Photo, index, photo.as_data_url());
            info!(slot = index, mime = photo.mime(), bytes = photo.byte_len(), "Photo captured");
        }
        Ok(index)
    }

    /// Tombstone a slot and remove its thumbnail; false if nothing was there
    pub(crate) fn delete_media(
        &mut self,
        kind: MediaKind,
        index: SlotIndex,
        view: &mut dyn FormView,
    ) -> bool {
        if !self.collection_mut(kind).tombstone(index) {
            warn!(%kind, slot = index, "Delete requested for an empty slot");
            return false;
        }
        view.remove_thumbnail(kind, index);
        info!(
            %kind,
            slot = index,
            remaining = self.collection(kind).live_count(),
            "Media deleted"
        );
        true
    }

    /// Start recording the live stream
    ///
    /// On Apple mobile devices the recorder gets a cloned video track plus the
    /// original audio, since recording the previewed track freezes the preview.
    #[instrument(skip(self, devices, recording, view))]
    pub(crate) fn start_video_recording(
        &mut self,
        devices: &dyn MediaDevices,
        family: PlatformFamily,
        recording: &mut RecordingState,
        view: &mut dyn FormView,
    ) -> Result<VideoFormat, VideoStartError> {
        let Some(session) = self.session.as_ref().filter(|s| s.stream().is_active()) else {
            warn!("Video requested without an active camera stream");
            view.notify(Notice::error(STREAM_NOT_ACTIVE));
            return Err(DeviceError::NotReady.into());
        };

        if let Err(rejected) = recording.begin_video() {
            warn!(%rejected, "Video recording rejected");
            return Err(rejected.into());
        }

        match Self::open_recorder(session, devices, family) {
            Ok(active) => {
                let format = active.format;
                info!(mime = format.mime, cloned = active.cloned.is_some(), "Video recording started");
                self.recording = Some(active);
                view.show_layout(CaptureLayout::Recording);
                Ok(format)
            }
            Err(e) => {
                recording.finish_video();
                error!(error = %e, "Failed to start video recording");
                let message = match e {
                    DeviceError::UnsupportedFormat(_) => NO_VIDEO_FORMAT.to_string(),
                    ref other => format!("Error al iniciar grabación: {}", other),
                };
                view.notify(Notice::error(message));
                Err(e.into())
            }
        }
    }

    fn open_recorder(
        session: &CaptureSession,
        devices: &dyn MediaDevices,
        family: PlatformFamily,
    ) -> Result<ActiveRecording, DeviceError> {
        let format = encoding::select_video_format(|mime| devices.is_type_supported(mime))?;

        if family.is_apple_mobile() {
            let mut cloned = session.stream().clone_video_with_audio()?;
            match cloned.start_recording(format) {
                Ok(recorder) => Ok(ActiveRecording {
                    recorder,
                    format,
                    cloned: Some(cloned),
                }),
                Err(e) => {
                    cloned.stop_tracks();
                    Err(e)
                }
            }
        } else {
            let recorder = session.stream().start_recording(format)?;
            Ok(ActiveRecording {
                recorder,
                format,
                cloned: None,
            })
        }
    }

    /// Stop the running recording and append it as a video slot
    ///
    /// Returns `Ok(None)` when no video recording was running.
    pub(crate) async fn stop_video_recording(
        &mut self,
        recording: &mut RecordingState,
        view: &mut dyn FormView,
    ) -> Result<Option<SlotIndex>, DeviceError> {
        let Some(active) = self.recording.take() else {
            info!("Stop requested with no video recording running");
            return Ok(None);
        };
        recording.finish_video();
        if self.session.is_some() {
            view.show_layout(CaptureLayout::Active);
        }

        let ActiveRecording {
            recorder,
            format,
            cloned,
        } = active;
        let chunks = recorder.stop().await;
        if let Some(mut cloned) = cloned {
            cloned.stop_tracks();
        }

        let chunks = match chunks {
            Ok(chunks) => chunks,
            Err(e) => {
                error!(error = %e, "Video recorder failed");
                view.notify(Notice::error(format!("Error al grabar el video: {}", e)));
                return Err(e);
            }
        };

        let video = EncodedMedia::from_chunks(format.container, &chunks);
        let index = self.videos.push(video);
        if let Some(video) = self.videos.get(index) {
            view.add_thumbnail(MediaKind::Video, index, video.as_data_url());
            info!(
                slot = index,
                mime = video.mime(),
                chunks = chunks.len(),
                bytes = video.byte_len(),
                "Video recorded"
            );
        }
        Ok(Some(index))
    }

    /// Read picked image files into photo slots, one thumbnail each
    pub(crate) async fn attach_photos(
        &mut self,
        files: &[PathBuf],
        view: &mut dyn FormView,
    ) -> Vec<SlotIndex> {
        let mut attached = Vec::with_capacity(files.len());
        for path in files {
            match self.attach(MediaKind::Photo, path, view).await {
                Ok(index) => attached.push(index),
                Err(e) => {
                    error!(error = %e, "Photo attachment failed");
                    view.notify(Notice::error(format!("No se pudo adjuntar la foto: {}", e)));
                }
            }
        }
        attached
    }

    /// Read a picked video file into the next video slot
    pub(crate) async fn attach_video(
        &mut self,
        path: &Path,
        view: &mut dyn FormView,
    ) -> Result<SlotIndex, AttachError> {
        let result = self.attach(MediaKind::Video, path, view).await;
        if let Err(e) = &result {
            error!(error = %e, "Video attachment failed");
            view.notify(Notice::error(format!("No se pudo adjuntar el video: {}", e)));
        }
        result
    }

    async fn attach(
        &mut self,
        kind: MediaKind,
        path: &Path,
        view: &mut dyn FormView,
    ) -> Result<SlotIndex, AttachError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| AttachError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if bytes.is_empty() {
            return Err(AttachError::Empty {
                path: path.to_path_buf(),
            });
        }

        let media = EncodedMedia::from_bytes(encoding::mime_for_path(path), &bytes);
        let collection = self.collection_mut(kind);
        let index = collection.push(media);
        if let Some(media) = collection.get(index) {
            view.add_thumbnail(kind, index, media.as_data_url());
            info!(%kind, slot = index, path = ?path, mime = media.mime(), bytes = bytes.len(), "File attached");
        }
        Ok(index)
    }

    /// Drop every photo and video along with their thumbnails
    pub(crate) fn clear_collections(&mut self, view: &mut dyn FormView) {
        self.photos.clear();
        self.videos.clear();
        view.clear_thumbnails(MediaKind::Photo);
        view.clear_thumbnails(MediaKind::Video);
    }

    fn release_session(&mut self) {
        // Dropping the session stops its tracks
        self.session = None;
    }

    /// Back to the freshly loaded state: no camera, empty collections with
    /// slot numbering restarted, initial facing mode
    pub(crate) fn reset(&mut self) {
        self.release();
        self.photos = SlotCollection::default();
        self.videos = SlotCollection::default();
        self.facing = self.initial_facing;
    }

    /// Abandon any recording and release all hardware
    pub(crate) fn release(&mut self) {
        if let Some(mut active) = self.recording.take() {
            warn!("Discarding unfinished video recording");
            if let Some(cloned) = active.cloned.as_mut() {
                cloned.stop_tracks();
            }
        }
        self.release_session();
    }
}

impl Drop for MediaCaptureManager {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDevices, RecordingView, ViewEvent};
    use std::io::Write;

    fn manager() -> MediaCaptureManager {
        MediaCaptureManager::new(FacingMode::Environment, 70)
    }

    #[tokio::test]
    async fn test_activate_with_exact_facing() {
        let devices = FakeDevices::default();
        let mut view = RecordingView::default();
        let mut media = manager();

        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();

        let session = media.session().unwrap();
        assert!(!session.is_relaxed());
        assert_eq!(session.facing(), FacingMode::Environment);
        assert_eq!(
            devices.requests(),
            vec![StreamConstraints::exact(FacingMode::Environment)]
        );
        assert!(view.log().contains(&ViewEvent::Layout(CaptureLayout::Active)));
        assert!(view.log().notices().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_after_denied_exact_request() {
        let devices = FakeDevices {
            deny_exact: true,
            ..FakeDevices::default()
        };
        let mut view = RecordingView::default();
        let mut media = manager();

        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();

        assert!(media.session().unwrap().is_relaxed());
        assert_eq!(
            devices.requests(),
            vec![
                StreamConstraints::exact(FacingMode::Environment),
                StreamConstraints::relaxed()
            ]
        );
        assert!(view.log().contains(&ViewEvent::Layout(CaptureLayout::Active)));
        assert!(view.log().notices().is_empty());
    }

    #[tokio::test]
    async fn test_both_requests_denied() {
        let devices = FakeDevices {
            deny_exact: true,
            deny_relaxed: true,
            ..FakeDevices::default()
        };
        let mut view = RecordingView::default();
        let mut media = manager();

        let err = media
            .activate_session(&devices, &mut view, FacingMode::User)
            .await
            .unwrap_err();

        assert!(matches!(err, DeviceError::PermissionDenied(_)));
        assert!(media.session().is_none());
        let log = view.log();
        assert_eq!(log.notices(), vec![Notice::error(CAMERA_DENIED)]);
        assert!(log.contains(&ViewEvent::Layout(CaptureLayout::Inactive)));
    }

    #[tokio::test]
    async fn test_switch_releases_previous_stream() {
        let devices = FakeDevices::default();
        let mut view = RecordingView::default();
        let mut media = manager();

        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();
        media.switch_facing(&devices, &mut view).await.unwrap();

        assert_eq!(media.facing(), FacingMode::User);
        assert_eq!(devices.opened(), 2);
        assert_eq!(devices.live_streams(), 1);

        media.release();
        assert_eq!(devices.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_photo_requires_ready_camera() {
        let mut view = RecordingView::default();
        let mut media = manager();

        assert!(matches!(
            media.capture_photo(&mut view),
            Err(DeviceError::NotReady)
        ));
        assert_eq!(view.log().notices(), vec![Notice::error(CAMERA_NOT_READY)]);
        assert_eq!(media.photos().next_index(), 0);
    }

    #[tokio::test]
    async fn test_photo_waits_for_stalled_stream() {
        let devices = FakeDevices {
            stalled: true,
            ..FakeDevices::default()
        };
        let mut view = RecordingView::default();
        let mut media = manager();
        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();
        assert!(media.session().is_some());

        assert!(matches!(
            media.capture_photo(&mut view),
            Err(DeviceError::NotReady)
        ));

        let log = view.log();
        assert_eq!(log.notices(), vec![Notice::error(CAMERA_NOT_READY)]);
        assert!(log.thumbnails(MediaKind::Photo).is_empty());
        assert_eq!(media.photos().next_index(), 0);
    }

    #[tokio::test]
    async fn test_photos_append_and_delete_without_renumbering() {
        let devices = FakeDevices::default();
        let mut view = RecordingView::default();
        let mut media = manager();
        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();

        let first = media.capture_photo(&mut view).unwrap();
        let second = media.capture_photo(&mut view).unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(media.photos().get(0).unwrap().mime(), "image/jpeg");

        assert!(media.delete_media(MediaKind::Photo, first, &mut view));
        assert!(!media.delete_media(MediaKind::Photo, first, &mut view));
        assert_eq!(media.capture_photo(&mut view).unwrap(), 2);

        let log = view.log();
        assert_eq!(log.thumbnails(MediaKind::Photo), vec![1, 2]);
        assert_eq!(
            log.count(|e| matches!(e, ViewEvent::RemoveThumbnail(MediaKind::Photo, 0))),
            1
        );
    }

    #[tokio::test]
    async fn test_video_recording_round() {
        let devices = FakeDevices::default();
        let mut view = RecordingView::default();
        let mut media = manager();
        let mut recording = RecordingState::default();
        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();

        let format = media
            .start_video_recording(&devices, PlatformFamily::Other, &mut recording, &mut view)
            .unwrap();
        assert_eq!(format, MP4_AVC1);
        assert!(recording.is_recording_video());
        assert!(view.log().contains(&ViewEvent::Layout(CaptureLayout::Recording)));

        let slot = media
            .stop_video_recording(&mut recording, &mut view)
            .await
            .unwrap();
        assert_eq!(slot, Some(0));
        assert!(recording.is_idle());
        let video = media.videos().get(0).unwrap();
        assert_eq!(video, &EncodedMedia::from_bytes("video/mp4", b"chunk-0chunk-1"));
        assert_eq!(view.log().thumbnails(MediaKind::Video), vec![0]);
        assert_eq!(devices.cloned(), 0);
    }

    #[tokio::test]
    async fn test_apple_mobile_records_cloned_track() {
        let devices = FakeDevices {
            supported: vec![WEBM.mime],
            ..FakeDevices::default()
        };
        let mut view = RecordingView::default();
        let mut media = manager();
        let mut recording = RecordingState::default();
        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();

        let format = media
            .start_video_recording(&devices, PlatformFamily::AppleMobile, &mut recording, &mut view)
            .unwrap();
        assert_eq!(format, WEBM);
        assert_eq!(devices.cloned(), 1);
        assert_eq!(devices.live_streams(), 2);

        media
            .stop_video_recording(&mut recording, &mut view)
            .await
            .unwrap();
        // The clone is released, the preview stream stays live
        assert_eq!(devices.live_streams(), 1);
        assert_eq!(media.videos().get(0).unwrap().mime(), "video/webm");
    }

    #[tokio::test]
    async fn test_no_supported_video_format() {
        let devices = FakeDevices {
            supported: Vec::new(),
            ..FakeDevices::default()
        };
        let mut view = RecordingView::default();
        let mut media = manager();
        let mut recording = RecordingState::default();
        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();

        let err = media
            .start_video_recording(&devices, PlatformFamily::Other, &mut recording, &mut view)
            .unwrap_err();
        assert!(matches!(err, VideoStartError::Device(DeviceError::UnsupportedFormat(_))));
        assert!(recording.is_idle());
        assert_eq!(view.log().notices(), vec![Notice::error(NO_VIDEO_FORMAT)]);
    }

    #[tokio::test]
    async fn test_video_requires_active_stream() {
        let devices = FakeDevices::default();
        let mut view = RecordingView::default();
        let mut media = manager();
        let mut recording = RecordingState::default();

        let err = media
            .start_video_recording(&devices, PlatformFamily::Other, &mut recording, &mut view)
            .unwrap_err();
        assert!(matches!(err, VideoStartError::Device(DeviceError::NotReady)));
        assert_eq!(view.log().notices(), vec![Notice::error(STREAM_NOT_ACTIVE)]);
    }

    #[tokio::test]
    async fn test_second_video_start_is_rejected() {
        let devices = FakeDevices::default();
        let mut view = RecordingView::default();
        let mut media = manager();
        let mut recording = RecordingState::default();
        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();
        media
            .start_video_recording(&devices, PlatformFamily::Other, &mut recording, &mut view)
            .unwrap();
        let before = view.log().len();

        let err = media
            .start_video_recording(&devices, PlatformFamily::Other, &mut recording, &mut view)
            .unwrap_err();
        assert!(matches!(err, VideoStartError::Rejected(_)));
        assert_eq!(view.log().len(), before);
    }

    #[tokio::test]
    async fn test_stop_without_recording_is_noop() {
        let mut view = RecordingView::default();
        let mut media = manager();
        let mut recording = RecordingState::default();
        let slot = media
            .stop_video_recording(&mut recording, &mut view)
            .await
            .unwrap();
        assert_eq!(slot, None);
        assert!(view.log().is_empty());
    }

    #[tokio::test]
    async fn test_attach_multiple_photos_and_a_video() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for name in ["a.jpg", "b.png"] {
            let path = dir.path().join(name);
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(name.as_bytes()).unwrap();
            paths.push(path);
        }
        let video_path = dir.path().join("clip.mp4");
        std::fs::write(&video_path, b"not really mp4").unwrap();

        let mut view = RecordingView::default();
        let mut media = manager();

        let attached = media.attach_photos(&paths, &mut view).await;
        assert_eq!(attached, vec![0, 1]);
        assert_eq!(media.photos().get(1).unwrap().mime(), "image/png");

        let slot = media.attach_video(&video_path, &mut view).await.unwrap();
        assert_eq!(slot, 0);
        assert_eq!(media.videos().get(0).unwrap().mime(), "video/mp4");
        assert_eq!(view.log().thumbnails(MediaKind::Photo), vec![0, 1]);
        assert_eq!(view.log().thumbnails(MediaKind::Video), vec![0]);
    }

    #[tokio::test]
    async fn test_reset_restarts_numbering_and_facing() {
        let devices = FakeDevices::default();
        let mut view = RecordingView::default();
        let mut media = manager();
        media
            .activate_session(&devices, &mut view, FacingMode::Environment)
            .await
            .unwrap();
        media.switch_facing(&devices, &mut view).await.unwrap();
        media.capture_photo(&mut view).unwrap();

        media.reset();

        assert!(media.session().is_none());
        assert_eq!(devices.live_streams(), 0);
        assert_eq!(media.facing(), FacingMode::Environment);
        assert_eq!(media.photos().next_index(), 0);
    }

    #[tokio::test]
    async fn test_attach_missing_file_notifies() {
        let mut view = RecordingView::default();
        let mut media = manager();
        let attached = media
            .attach_photos(&[PathBuf::from("/definitely/not/here.jpg")], &mut view)
            .await;
        assert!(attached.is_empty());
        assert_eq!(view.log().notices().len(), 1);
        assert_eq!(media.photos().live_count(), 0);
    }
}
