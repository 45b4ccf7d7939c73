//! Microphone clip capture using cpal
//!
//! Records a fixed-length clip from the default input device on a dedicated
//! thread (cpal streams are not `Send`), mixes it to mono, resamples it to
//! 16 kHz and frames it as WAV for the transcription upload.

mod resampler;
mod types;
mod wav;

pub(crate) use types::{AudioCaptureError, CapturedAudio};

use crate::error::SpeechError;
use crate::speech::{AudioClip, Microphone};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use resampler::{f32_to_i16, resample, to_mono};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// Sample rate of uploaded clips
pub(crate) const CLIP_SAMPLE_RATE: u32 = 16000;

/// Microphone backed by the default cpal input device
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CpalMicrophone;

#[async_trait]
impl Microphone for CpalMicrophone {
    async fn record_clip(&self, duration: Duration) -> Result<AudioClip, SpeechError> {
        let (clip_tx, clip_rx) = oneshot::channel();

        thread::Builder::new()
            .name("microphone-capture".to_string())
            .spawn(move || {
                let result = capture_clip(duration).and_then(encode_clip);
                if clip_tx.send(result).is_err() {
                    warn!("Clip finished after the requester went away");
                }
            })
            .map_err(|e| {
                SpeechError::Microphone(AudioCaptureError::Thread(e.to_string()).to_string())
            })?;

        let wav = clip_rx
            .await
            .map_err(|_| AudioCaptureError::Thread("capture thread exited".to_string()))
            .and_then(|result| result)
            .map_err(|e| {
                error!("Audio capture error: {}", e);
                SpeechError::Microphone(e.to_string())
            })?;
        Ok(AudioClip::wav(wav))
    }
}

/// Resample to the upload rate and frame as WAV
fn encode_clip(captured: CapturedAudio) -> Result<Vec<u8>, AudioCaptureError> {
    let samples = resample(&captured.samples, captured.sample_rate, CLIP_SAMPLE_RATE)?;
    Ok(wav::encode(&samples, CLIP_SAMPLE_RATE))
}

/// Record `duration` of mono audio on the current thread (blocking)
pub(crate) fn capture_clip(duration: Duration) -> Result<CapturedAudio, AudioCaptureError> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or(AudioCaptureError::NoInputDevice)?;

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    info!("Using audio input device: {}", device_name);

    let supported_configs = device
        .supported_input_configs()
        .map_err(|e| AudioCaptureError::ConfigError(e.to_string()))?;

    // Prefer a config that can run at the clip rate; otherwise resample later
    let mut best_config = None;
    for config in supported_configs {
        if config.channels() == 0 {
            continue;
        }
        if config.min_sample_rate().0 <= CLIP_SAMPLE_RATE
            && config.max_sample_rate().0 >= CLIP_SAMPLE_RATE
        {
            best_config = Some(config.with_sample_rate(cpal::SampleRate(CLIP_SAMPLE_RATE)));
            break;
        } else if best_config.is_none() {
            best_config = Some(config.with_max_sample_rate());
        }
    }
    let supported_config = best_config.ok_or(AudioCaptureError::NoSupportedConfig)?;

    let sample_format = supported_config.sample_format();
    let config: cpal::StreamConfig = supported_config.into();
    let sample_rate = config.sample_rate.0;
    let channels = config.channels as usize;
    if sample_rate != CLIP_SAMPLE_RATE {
        warn!(
            "{}Hz not supported, recording at {}Hz",
            CLIP_SAMPLE_RATE, sample_rate
        );
    }
    info!("Audio config: {} channels, {} Hz", channels, sample_rate);

    let expected = (sample_rate as f64 * duration.as_secs_f64()).ceil() as usize;
    let buffer: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::with_capacity(expected)));

    let err_callback = |err| {
        error!("Audio stream error: {}", err);
    };

    let stream = match sample_format {
        SampleFormat::I16 => {
            let buffer = buffer.clone();
            device.build_input_stream(
                &config,
                move |data: &[i16], _| append(&buffer, &to_mono(data, channels)),
                err_callback,
                None,
            )?
        }
        SampleFormat::F32 => {
            let buffer = buffer.clone();
            device.build_input_stream(
                &config,
                move |data: &[f32], _| {
                    let samples: Vec<i16> = data.iter().map(|&s| f32_to_i16(s)).collect();
                    append(&buffer, &to_mono(&samples, channels));
                },
                err_callback,
                None,
            )?
        }
        sample_format => {
            return Err(AudioCaptureError::UnsupportedFormat(format!(
                "{:?}",
                sample_format
            )));
        }
    };

    stream.play()?;
    info!(?duration, "Recording clip");
    thread::sleep(duration);
    drop(stream);

    let samples = std::mem::take(&mut *buffer.lock().unwrap_or_else(|e| e.into_inner()));
    let captured = CapturedAudio {
        samples,
        sample_rate,
    };
    info!(
        samples = captured.samples.len(),
        seconds = captured.duration_secs(),
        "Clip captured"
    );
    Ok(captured)
}

fn append(buffer: &Mutex<Vec<i16>>, samples: &[i16]) {
    if let Ok(mut buf) = buffer.lock() {
        buf.extend_from_slice(samples);
    }
}
