//! Channel mixing and offline resampling of captured clips

use super::types::AudioCaptureError;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Frames fed to the resampler per call
const CHUNK_SIZE: usize = 1024;

/// Average interleaved frames down to one channel
pub(crate) fn to_mono(data: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

pub(crate) fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Resample a whole mono clip from `from_rate` to `to_rate`
///
/// The tail is zero-padded to a full chunk and the resampler's delay is
/// trimmed, so the output holds exactly `len * to_rate / from_rate` samples.
pub(crate) fn resample(
    samples: &[i16],
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<i16>, AudioCaptureError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
        .map_err(|e| AudioCaptureError::Resample(e.to_string()))?;

    let expected = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let input: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let mut output: Vec<f32> = Vec::with_capacity(expected + delay + CHUNK_SIZE);
    let mut position = 0;
    while output.len() < expected + delay {
        let mut chunk = vec![0.0f32; CHUNK_SIZE];
        if position < input.len() {
            let end = (position + CHUNK_SIZE).min(input.len());
            chunk[..end - position].copy_from_slice(&input[position..end]);
        }
        position += CHUNK_SIZE;

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| AudioCaptureError::Resample(e.to_string()))?;
        output.extend_from_slice(&resampled[0]);
    }

    Ok(output[delay..delay + expected]
        .iter()
        .map(|&s| f32_to_i16(s))
        .collect())
}
