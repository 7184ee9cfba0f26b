//! Waveform peak extraction
//!
//! Decimates raw audio samples into interleaved (min,max) pairs, one pair
//! per window of `samples_per_pixel` frames, quantized to a signed integer
//! of the requested width. The renderer draws one vertical line per pair.
//!
//! Extraction is a pure function of its inputs: identical buffer, cue range
//! and resolution always produce an identical `PeakSet`, so callers may
//! cache the result and skip redraws when nothing changed.

use crate::error::{Error, Result};

/// Default decimation window when the caller does not care
pub const DEFAULT_SAMPLES_PER_PIXEL: usize = 10000;

/// Default quantization width in bits
pub const DEFAULT_BITS: u32 = 8;

/// Interleaved (min,max) peak values for one channel, in the requested
/// integer width
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeakData {
    Bits8(Vec<i8>),
    Bits16(Vec<i16>),
    Bits32(Vec<i32>),
}

impl PeakData {
    /// Number of stored values (twice the number of peaks)
    pub fn len(&self) -> usize {
        match self {
            PeakData::Bits8(v) => v.len(),
            PeakData::Bits16(v) => v.len(),
            PeakData::Bits32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`, widened to i32
    pub fn get(&self, index: usize) -> i32 {
        match self {
            PeakData::Bits8(v) => v[index] as i32,
            PeakData::Bits16(v) => v[index] as i32,
            PeakData::Bits32(v) => v[index],
        }
    }
}

/// Decimated peak representation of a cue range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakSet {
    /// Number of (min,max) pairs per channel
    pub length: usize,

    /// One interleaved array per channel (a single entry after a mono fold)
    pub data: Vec<PeakData>,

    /// Quantization width the values were converted to
    pub bits: u32,
}

/// Find the extrema of one decimation window
///
/// A plain indexed scan is measurably faster here than iterator chains;
/// this is the hot loop of every waveform redraw.
fn find_min_max(window: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;

    for &sample in window {
        if min > sample {
            min = sample;
        }
        if max < sample {
            max = sample;
        }
    }

    (min, max)
}

/// Quantize a float extremum into a `bits`-wide two's complement integer
///
/// v = n*2^(bits-1) for negative n, n*2^(bits-1) - 1 otherwise, clamped to
/// the representable range and truncated toward zero.
fn convert(n: f32, bits: u32) -> i32 {
    let max = 2f64.powi(bits as i32 - 1);
    let n = n as f64;
    let v = if n < 0.0 { n * max } else { n * max - 1.0 };

    v.clamp(-max, max - 1.0) as i32
}

/// Extract interleaved (min,max) peaks from one channel slice
fn extract_channel(channel: &[f32], samples_per_pixel: usize, bits: u32) -> Vec<i32> {
    let len = channel.len();
    let num_peaks = len.div_ceil(samples_per_pixel);
    let mut peaks = vec![0i32; num_peaks * 2];

    for i in 0..num_peaks {
        let start = i * samples_per_pixel;
        let end = ((i + 1) * samples_per_pixel).min(len);

        let (min, max) = find_min_max(&channel[start..end]);
        peaks[i * 2] = convert(min, bits);
        peaks[i * 2 + 1] = convert(max, bits);
    }

    peaks
}

/// Fold per-channel peaks into one channel by equal-weighted averaging
fn make_mono(channel_peaks: &[Vec<i32>]) -> Vec<i32> {
    let weight = 1.0 / channel_peaks.len() as f64;
    let len = channel_peaks[0].len();
    let mut peaks = vec![0i32; len];

    for (i, out) in peaks.iter_mut().enumerate() {
        let mut acc = 0.0f64;

        for channel in channel_peaks {
            acc += weight * channel[i] as f64;
        }

        *out = acc as i32;
    }

    peaks
}

fn into_peak_data(values: Vec<i32>, bits: u32) -> PeakData {
    match bits {
        8 => PeakData::Bits8(values.into_iter().map(|v| v as i8).collect()),
        16 => PeakData::Bits16(values.into_iter().map(|v| v as i16).collect()),
        _ => PeakData::Bits32(values),
    }
}

/// Extract peaks for the `[cue_in, cue_out)` sample range of every channel
///
/// # Arguments
///
/// * `channels` - decoded sample buffers, one slice per channel
/// * `samples_per_pixel` - decimation window size (the last window of a
///   channel may be shorter)
/// * `mono` - fold all channels into one by equal-weighted averaging
/// * `cue_in` / `cue_out` - sample indices bounding the extraction
/// * `bits` - quantization width; only 8, 16 and 32 are representable
///
/// # Errors
///
/// `InvalidBitDepth` for any width other than 8, 16 or 32.
pub fn extract_peaks(
    channels: &[&[f32]],
    samples_per_pixel: usize,
    mono: bool,
    cue_in: usize,
    cue_out: usize,
    bits: u32,
) -> Result<PeakSet> {
    if ![8, 16, 32].contains(&bits) {
        return Err(Error::InvalidBitDepth(bits));
    }

    let mut peaks: Vec<Vec<i32>> = Vec::with_capacity(channels.len());

    for channel in channels {
        let end = cue_out.min(channel.len());
        let start = cue_in.min(end);

        peaks.push(extract_channel(
            &channel[start..end],
            samples_per_pixel,
            bits,
        ));
    }

    if mono && peaks.len() > 1 {
        peaks = vec![make_mono(&peaks)];
    }

    let length = peaks.first().map_or(0, |p| p.len() / 2);

    Ok(PeakSet {
        length,
        data: peaks.into_iter().map(|p| into_peak_data(p, bits)).collect(),
        bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32 / len as f32).collect()
    }

    #[test]
    fn test_peak_count_matches_ceiling() {
        let channel = ramp(1050);

        for bits in [8u32, 16, 32] {
            let set = extract_peaks(&[&channel], 100, true, 0, channel.len(), bits).unwrap();
            // 1050 samples / 100 per window rounds up to 11 windows.
            assert_eq!(set.length, 11);
            assert_eq!(set.data[0].len(), 22);
            assert_eq!(set.bits, bits);
        }
    }

    #[test]
    fn test_values_within_quantized_range() {
        let channel: Vec<f32> = vec![-1.0, -0.5, 0.0, 0.5, 1.0, 1.5, -1.5];

        for bits in [8u32, 16, 32] {
            let set = extract_peaks(&[&channel], 2, true, 0, channel.len(), bits).unwrap();
            let max = 2i64.pow(bits - 1);

            for i in 0..set.data[0].len() {
                let v = set.data[0].get(i) as i64;
                assert!(v >= -max && v <= max - 1, "{} out of range for {} bits", v, bits);
            }
        }
    }

    #[test]
    fn test_full_scale_quantization() {
        let channel = vec![-1.0f32, 1.0];
        let set = extract_peaks(&[&channel], 2, true, 0, 2, 8).unwrap();

        assert_eq!(set.length, 1);
        assert_eq!(set.data[0].get(0), -128);
        assert_eq!(set.data[0].get(1), 127);
    }

    #[test]
    fn test_invalid_bit_depth() {
        let channel = ramp(16);
        let result = extract_peaks(&[&channel], 4, true, 0, 16, 12);

        assert_eq!(result, Err(Error::InvalidBitDepth(12)));
    }

    #[test]
    fn test_mono_fold_of_identical_channels_is_identity() {
        let channel = ramp(4000);
        let copies: Vec<&[f32]> = vec![&channel, &channel, &channel];

        let folded = extract_peaks(&copies, 512, true, 0, channel.len(), 16).unwrap();
        let single = extract_peaks(&[&channel[..]], 512, true, 0, channel.len(), 16).unwrap();

        assert_eq!(folded.data.len(), 1);
        assert_eq!(folded, single);
    }

    #[test]
    fn test_stereo_kept_separate_without_fold() {
        let left = vec![0.5f32; 300];
        let right = vec![-0.5f32; 300];

        let set = extract_peaks(&[&left, &right], 100, false, 0, 300, 8).unwrap();

        assert_eq!(set.data.len(), 2);
        // Constant channels decimate to constant pairs.
        assert_eq!(set.data[0].get(0), set.data[0].get(1));
        assert!(set.data[1].get(0) < 0);
    }

    #[test]
    fn test_cue_range_slices_before_decimation() {
        let mut channel = vec![0.0f32; 1000];
        channel[0] = 1.0; // outside the cue range, must not appear

        let set = extract_peaks(&[&channel], 100, true, 500, 1000, 8).unwrap();

        assert_eq!(set.length, 5);
        for i in 0..set.data[0].len() {
            assert_eq!(set.data[0].get(i), -1); // convert(0.0) = -1
        }
    }

    #[test]
    fn test_empty_cue_range() {
        let channel = ramp(100);
        let set = extract_peaks(&[&channel], 10, true, 50, 50, 8).unwrap();

        assert_eq!(set.length, 0);
        assert!(set.data[0].is_empty());
    }

    #[test]
    fn test_last_window_may_be_short() {
        let channel = vec![0.25f32; 105];
        let set = extract_peaks(&[&channel], 50, true, 0, 105, 16).unwrap();

        assert_eq!(set.length, 3);
        // The 5-sample tail window still yields a valid pair.
        let last_max = set.data[0].get(5);
        assert_eq!(last_max, (0.25 * 32768.0 - 1.0) as i32);
    }

    #[test]
    fn test_determinism() {
        let channel = ramp(2048);
        let a = extract_peaks(&[&channel], 256, true, 0, 2048, 8).unwrap();
        let b = extract_peaks(&[&channel], 256, true, 0, 2048, 8).unwrap();

        assert_eq!(a, b);
    }
}
