//! Test doubles for the platform providers, the form view and the backend
//!
//! Every fake is `Clone` and shares its state through `Arc`, so a test can
//! hand one copy to the code under test and inspect the other.

use crate::backend::{
    ListEntryReply, RecordBackend, Respuestas, SaveRecordReply, SubmissionPayload,
    TranscriptionReply,
};
use crate::error::{BackendError, DeviceError, SpeechError};
use crate::media::{
    MediaDevices, MediaKind, MediaStream, SlotIndex, StreamConstraints, VideoConstraint,
    VideoFormat, VideoRecorder, MP4_AVC1, WEBM,
};
use crate::platform::{Platform, PlatformFamily};
use crate::speech::{AudioClip, Microphone, SpeechRecognizer, SpeechSynthesizer};
use crate::view::{CaptureLayout, FormView, Notice};
use async_trait::async_trait;
use image::{Rgb, RgbImage};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub(crate) struct FakeSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl FakeSynthesizer {
    pub(crate) fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn speak(&self, text: &str, _locale: &str) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Recognizer replaying a fixed list of results; `Ok(None)` once exhausted
#[derive(Clone)]
pub(crate) struct ScriptedRecognizer {
    supported: bool,
    script: Arc<Mutex<VecDeque<Result<Option<String>, SpeechError>>>>,
    calls: Arc<AtomicUsize>,
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ScriptedRecognizer {
    pub(crate) fn new(results: Vec<Result<Option<String>, SpeechError>>) -> Self {
        Self {
            supported: true,
            script: Arc::new(Mutex::new(results.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn answering(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| Ok(Some(a.to_string()))).collect())
    }

    pub(crate) fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn recognize(&self, _locale: &str) -> Result<Option<String>, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.supported {
            return Err(SpeechError::Unsupported);
        }
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeMicrophone {
    clips: Arc<AtomicUsize>,
    fail_next: Arc<AtomicBool>,
}

impl FakeMicrophone {
    pub(crate) fn clips(&self) -> usize {
        self.clips.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Microphone for FakeMicrophone {
    async fn record_clip(&self, _duration: Duration) -> Result<AudioClip, SpeechError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SpeechError::Microphone("permission denied".to_string()));
        }
        self.clips.fetch_add(1, Ordering::SeqCst);
        Ok(AudioClip::wav(b"RIFF\0\0\0\0WAVE".to_vec()))
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct DeviceLog {
    requests: Vec<StreamConstraints>,
    opened: usize,
    cloned: usize,
}

/// Media devices handing out in-memory streams
#[derive(Clone)]
pub(crate) struct FakeDevices {
    pub(crate) deny_exact: bool,
    pub(crate) deny_relaxed: bool,
    /// Streams never report ready frames
    pub(crate) stalled: bool,
    pub(crate) supported: Vec<&'static str>,
    pub(crate) log: Arc<Mutex<DeviceLog>>,
    pub(crate) live: Arc<AtomicUsize>,
}

impl Default for FakeDevices {
    fn default() -> Self {
        Self {
            deny_exact: false,
            deny_relaxed: false,
            stalled: false,
            supported: vec![MP4_AVC1.mime, WEBM.mime],
            log: Arc::default(),
            live: Arc::default(),
        }
    }
}

impl FakeDevices {
    pub(crate) fn requests(&self) -> Vec<StreamConstraints> {
        self.log.lock().unwrap().requests.clone()
    }

    pub(crate) fn opened(&self) -> usize {
        self.log.lock().unwrap().opened
    }

    pub(crate) fn cloned(&self) -> usize {
        self.log.lock().unwrap().cloned
    }

    /// Streams whose tracks have not been stopped
    pub(crate) fn live_streams(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn open_stream(&self, id: String) -> FakeStream {
        self.live.fetch_add(1, Ordering::SeqCst);
        FakeStream {
            id,
            live: true,
            ready: !self.stalled,
            devices: self.clone(),
        }
    }
}

#[async_trait]
impl MediaDevices for FakeDevices {
    async fn get_user_media(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        let opened = {
            let mut log = self.log.lock().unwrap();
            log.requests.push(*constraints);
            let denied = match constraints.video {
                VideoConstraint::Exact(_) => self.deny_exact,
                VideoConstraint::Any => self.deny_relaxed,
            };
            if denied {
                return Err(DeviceError::PermissionDenied("camera blocked".to_string()));
            }
            log.opened += 1;
            log.opened
        };
        Ok(Box::new(self.open_stream(format!("stream-{}", opened))))
    }

    fn is_type_supported(&self, mime: &str) -> bool {
        self.supported.contains(&mime)
    }
}

pub(crate) struct FakeStream {
    id: String,
    live: bool,
    ready: bool,
    devices: FakeDevices,
}

impl MediaStream for FakeStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.live
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn grab_frame(&self) -> Result<RgbImage, DeviceError> {
        Ok(RgbImage::from_pixel(8, 8, Rgb([200, 120, 40])))
    }

    fn clone_video_with_audio(&self) -> Result<Box<dyn MediaStream>, DeviceError> {
        self.devices.log.lock().unwrap().cloned += 1;
        Ok(Box::new(
            self.devices.open_stream(format!("{}-clone", self.id)),
        ))
    }

    fn start_recording(&self, _format: VideoFormat) -> Result<Box<dyn VideoRecorder>, DeviceError> {
        Ok(Box::new(FakeRecorder))
    }

    fn stop_tracks(&mut self) {
        if std::mem::replace(&mut self.live, false) {
            self.devices.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

pub(crate) struct FakeRecorder;

#[async_trait]
impl VideoRecorder for FakeRecorder {
    async fn stop(self: Box<Self>) -> Result<Vec<Vec<u8>>, DeviceError> {
        Ok(vec![b"chunk-0".to_vec(), b"chunk-1".to_vec()])
    }
}

// ---------------------------------------------------------------------------
// Platform bundle
// ---------------------------------------------------------------------------

/// Fakes for every provider, kept so tests can inspect them after `build`
#[derive(Clone)]
pub(crate) struct FakePlatform {
    pub(crate) family: PlatformFamily,
    pub(crate) synthesizer: FakeSynthesizer,
    pub(crate) recognizer: ScriptedRecognizer,
    pub(crate) microphone: FakeMicrophone,
    pub(crate) devices: FakeDevices,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            family: PlatformFamily::Other,
            synthesizer: FakeSynthesizer::default(),
            recognizer: ScriptedRecognizer::default(),
            microphone: FakeMicrophone::default(),
            devices: FakeDevices::default(),
        }
    }
}

impl FakePlatform {
    pub(crate) fn with_recognizer(recognizer: ScriptedRecognizer) -> Self {
        Self {
            recognizer,
            ..Self::default()
        }
    }

    pub(crate) fn build(&self) -> Platform {
        Platform {
            family: self.family,
            synthesizer: Box::new(self.synthesizer.clone()),
            recognizer: Box::new(self.recognizer.clone()),
            microphone: Box::new(self.microphone.clone()),
            devices: Box::new(self.devices.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewEvent {
    SetAnswer(usize, String),
    ClearAnswers,
    Notify(Notice),
    Layout(CaptureLayout),
    BindPreview(String),
    AddThumbnail(MediaKind, SlotIndex),
    RemoveThumbnail(MediaKind, SlotIndex),
    ClearThumbnails(MediaKind),
    ClearDrawingSurface,
    SubmitEnabled(bool),
    Reload,
}

/// Form view that records every call
#[derive(Clone, Default)]
pub(crate) struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub(crate) fn log(&self) -> ViewLog {
        ViewLog(self.events.lock().unwrap().clone())
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl FormView for RecordingView {
    fn set_answer(&mut self, index: usize, text: &str) {
        self.push(ViewEvent::SetAnswer(index, text.to_string()));
    }

    fn clear_answers(&mut self) {
        self.push(ViewEvent::ClearAnswers);
    }

    fn notify(&mut self, notice: Notice) {
        self.push(ViewEvent::Notify(notice));
    }

    fn show_layout(&mut self, layout: CaptureLayout) {
        self.push(ViewEvent::Layout(layout));
    }

    fn bind_preview(&mut self, stream_id: &str) {
        self.push(ViewEvent::BindPreview(stream_id.to_string()));
    }

    fn add_thumbnail(&mut self, kind: MediaKind, slot: SlotIndex, _data_url: &str) {
        self.push(ViewEvent::AddThumbnail(kind, slot));
    }

    fn remove_thumbnail(&mut self, kind: MediaKind, slot: SlotIndex) {
        self.push(ViewEvent::RemoveThumbnail(kind, slot));
    }

    fn clear_thumbnails(&mut self, kind: MediaKind) {
        self.push(ViewEvent::ClearThumbnails(kind));
    }

    fn clear_drawing_surface(&mut self) {
        self.push(ViewEvent::ClearDrawingSurface);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.push(ViewEvent::SubmitEnabled(enabled));
    }

    fn reload(&mut self) {
        self.push(ViewEvent::Reload);
    }
}

/// Snapshot of the calls a `RecordingView` received
#[derive(Debug, Clone)]
pub(crate) struct ViewLog(Vec<ViewEvent>);

impl ViewLog {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        self.0.clone()
    }

    pub(crate) fn contains(&self, event: &ViewEvent) -> bool {
        self.0.contains(event)
    }

    pub(crate) fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&ViewEvent) -> bool,
    {
        self.0.iter().filter(|e| predicate(e)).count()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.0
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Notify(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    /// Thumbnails of `kind` currently on screen, replaying adds and removals
    pub(crate) fn thumbnails(&self, kind: MediaKind) -> Vec<SlotIndex> {
        let mut shown = Vec::new();
        for event in &self.0 {
            match event {
                ViewEvent::AddThumbnail(k, slot) if *k == kind => shown.push(*slot),
                ViewEvent::RemoveThumbnail(k, slot) if *k == kind => {
                    shown.retain(|s| s != slot)
                }
                ViewEvent::ClearThumbnails(k) if *k == kind => shown.clear(),
                ViewEvent::Reload => shown.clear(),
                _ => {}
            }
        }
        shown
    }

    /// Current text of each answer field
    pub(crate) fn answer(&self, index: usize) -> Option<String> {
        let mut text = None;
        for event in &self.0 {
            match event {
                ViewEvent::SetAnswer(i, value) if *i == index => text = Some(value.clone()),
                ViewEvent::ClearAnswers | ViewEvent::Reload => text = None,
                _ => {}
            }
        }
        text
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct BackendState {
    saved: Vec<SubmissionPayload>,
    listed: Vec<Respuestas>,
    transcribed: usize,
    save_replies: VecDeque<Result<SaveRecordReply, BackendError>>,
    list_replies: VecDeque<Result<ListEntryReply, BackendError>>,
    transcripts: VecDeque<Result<TranscriptionReply, BackendError>>,
}

/// Backend recording requests and replaying queued replies
///
/// With nothing queued, records are saved, list entries get id 1 and
/// transcriptions come back empty.
#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub(crate) fn reply_to_save(&self, reply: Result<SaveRecordReply, BackendError>) {
        self.state.lock().unwrap().save_replies.push_back(reply);
    }

    pub(crate) fn reply_to_list(&self, reply: Result<ListEntryReply, BackendError>) {
        self.state.lock().unwrap().list_replies.push_back(reply);
    }

    pub(crate) fn transcribe_with(&self, reply: Result<TranscriptionReply, BackendError>) {
        self.state.lock().unwrap().transcripts.push_back(reply);
    }

    pub(crate) fn saved(&self) -> Vec<SubmissionPayload> {
        self.state.lock().unwrap().saved.clone()
    }

    pub(crate) fn listed(&self) -> Vec<Respuestas> {
        self.state.lock().unwrap().listed.clone()
    }

    pub(crate) fn transcribed(&self) -> usize {
        self.state.lock().unwrap().transcribed
    }
}

#[async_trait]
impl RecordBackend for FakeBackend {
    async fn save_record(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SaveRecordReply, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.saved.push(payload.clone());
        state.save_replies.pop_front().unwrap_or_else(|| {
            Ok(SaveRecordReply {
                success: Some(serde_json::Value::Bool(true)),
                ..SaveRecordReply::default()
            })
        })
    }

    async fn save_list_entry(
        &self,
        respuestas: &Respuestas,
    ) -> Result<ListEntryReply, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.listed.push(respuestas.clone());
        state.list_replies.pop_front().unwrap_or_else(|| {
            Ok(ListEntryReply {
                id_registro: Some(serde_json::json!(1)),
                error: None,
            })
        })
    }

    async fn transcribe_audio(&self, _clip: &AudioClip) -> Result<TranscriptionReply, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.transcribed += 1;
        state
            .transcripts
            .pop_front()
            .unwrap_or_else(|| Ok(TranscriptionReply::default()))
    }
}
