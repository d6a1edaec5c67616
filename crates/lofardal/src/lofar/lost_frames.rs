//! Detection of frames the TBB boards failed to deliver.
//!
//! A lost frame shows up in a dipole dataset as a frame-aligned block of
//! all-zero samples.

use tracing::{debug, info};

use crate::error::Result;

use super::tbb::{Dipole, TbbFile};

/// Frames read per slice while scanning a dipole.
const FRAMES_PER_READ: u64 = 64;

const DEFAULT_SAMPLES_PER_FRAME: u32 = 1024;

/// Indices of the whole frames of `frame_len` samples that are entirely zero.
///
/// A trailing partial frame is not checked.
pub fn lost_frames<T: Copy + Default + PartialEq>(samples: &[T], frame_len: usize) -> Vec<u64> {
    if frame_len == 0 {
        return Vec::new();
    }
    let zero = T::default();
    samples
        .chunks_exact(frame_len)
        .enumerate()
        .filter(|(_, frame)| frame.iter().all(|s| *s == zero))
        .map(|(i, _)| i as u64)
        .collect()
}

/// Scan result for one dipole.
#[derive(Debug, Clone, PartialEq)]
pub struct DipoleFrames {
    pub station: String,
    pub dipole: String,
    pub total_samples: u64,
    pub samples_per_frame: u32,
    pub lost_frames: Vec<u64>,
}

impl DipoleFrames {
    pub fn lost_samples(&self) -> u64 {
        self.lost_frames.len() as u64 * u64::from(self.samples_per_frame)
    }
}

/// Scan result for a whole file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LostFrameReport {
    pub dipoles: Vec<DipoleFrames>,
    pub total_samples: u64,
    pub lost_samples: u64,
}

impl LostFrameReport {
    /// Lost samples over total samples; 0 for an empty file.
    pub fn loss_fraction(&self) -> f64 {
        if self.total_samples == 0 {
            0.0
        } else {
            self.lost_samples as f64 / self.total_samples as f64
        }
    }
}

/// Scan every dipole of every station of `file`.
pub fn scan_lost_frames(file: &TbbFile) -> Result<LostFrameReport> {
    let mut report = LostFrameReport::default();
    for station in file.stations() {
        for dipole in station.dipoles() {
            let frames = scan_dipole(station.station_name(), &dipole)?;
            report.total_samples += frames.total_samples;
            report.lost_samples += frames.lost_samples();
            report.dipoles.push(frames);
        }
    }
    info!(
        dipoles = report.dipoles.len(),
        total = report.total_samples,
        lost = report.lost_samples,
        "lost frame scan finished"
    );
    Ok(report)
}

fn scan_dipole(station: &str, dipole: &Dipole) -> Result<DipoleFrames> {
    let samples_per_frame = match dipole.samples_per_frame().get_or_default()? {
        0 => DEFAULT_SAMPLES_PER_FRAME,
        n => n,
    };
    let frame = u64::from(samples_per_frame);
    let total = dipole.dims()?.first().copied().unwrap_or(0);
    let whole_frames = total / frame;

    let mut lost = Vec::new();
    let mut first = 0;
    while first < whole_frames {
        let count = FRAMES_PER_READ.min(whole_frames - first);
        let block = dipole.get_1d(first * frame, (count * frame) as usize)?;
        lost.extend(
            lost_frames(&block, samples_per_frame as usize)
                .into_iter()
                .map(|i| first + i),
        );
        first += count;
    }
    debug!(path = dipole.path(), total, lost = lost.len(), "scanned dipole");

    Ok(DipoleFrames {
        station: station.to_string(),
        dipole: dipole.name().to_string(),
        total_samples: total,
        samples_per_frame,
        lost_frames: lost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileCreateOptions;
    use tempfile::TempDir;

    fn signal(len: usize) -> Vec<i16> {
        (0..len).map(|i| (i % 7) as i16 + 1).collect()
    }

    #[test]
    fn reports_zeroed_frame() {
        let mut samples = signal(10_000);
        samples[2048..3072].fill(0);
        assert_eq!(lost_frames(&samples, 1024), vec![2]);
    }

    #[test]
    fn short_zero_run_is_not_a_frame() {
        let mut samples = signal(10_000);
        samples[2048..3000].fill(0);
        samples[4000..4900].fill(0);
        assert!(lost_frames(&samples, 1024).is_empty());
    }

    #[test]
    fn unaligned_run_covering_a_frame() {
        let mut samples = signal(10_000);
        samples[4000..5200].fill(0);
        assert_eq!(lost_frames(&samples, 1024), vec![4]);
    }

    #[test]
    fn trailing_partial_frame_ignored() {
        let mut samples = signal(2500);
        samples[2048..].fill(0);
        assert!(lost_frames(&samples, 1024).is_empty());
        assert!(lost_frames(&samples, 0).is_empty());
    }

    #[test]
    fn scans_every_dipole() {
        let dir = TempDir::new().unwrap();
        let file = TbbFile::create(dir.path().join("scan.h5"), &FileCreateOptions::new()).unwrap();
        let station = file.station("CS001");
        station.create().unwrap();

        let mut samples = signal(4096);
        samples[1024..2048].fill(0);
        for rcu in 0..2 {
            let dipole = station.dipole(0, rcu).unwrap();
            dipole.create(4096, 4096, None).unwrap();
            dipole.samples_per_frame().set(1024).unwrap();
            dipole.set_1d(0, &samples).unwrap();
        }

        let report = scan_lost_frames(&file).unwrap();
        assert_eq!(report.dipoles.len(), 2);
        assert_eq!(report.dipoles[0].lost_frames, vec![1]);
        assert_eq!(report.total_samples, 8192);
        assert_eq!(report.lost_samples, 2048);
        assert!((report.loss_fraction() - 0.25).abs() < 1e-12);
    }
}
