//! Gadget-2 snapshot positions.
//!
//! Reads the labelled ("SnapFormat 2") variant of the Gadget-2 N-body snapshot
//! format: a sequence of little-endian Fortran records, each data block preceded
//! by an 8-byte label record holding a 4-character name and the size of the
//! next block.
//!
//! ```text
//! [8]["HEAD"][next][8]  [256][header .......][256]
//! [8]["POS "][next][8]  [n][x y z x y z ... f32][n]
//! ...
//! ```
//!
//! Only what friends-of-friends needs is decoded: the header and the `POS `
//! block for one particle type.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::points::PointSet;

const HEADER_LEN: usize = 256;

/// Particle type of dark-matter particles in Gadget-2 conventions.
pub const DARK_MATTER: usize = 1;

/// Decoded snapshot header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Particles of each type in this file.
    pub npart: [u32; 6],
    /// Mass of each particle type (0 when masses are stored per particle).
    pub mass: [f64; 6],
    /// Scale factor (cosmological runs) or time.
    pub time: f64,
    /// Redshift.
    pub redshift: f64,
    /// Particles of each type across all files, including the high words.
    pub npart_total: [u64; 6],
    /// Number of files the snapshot is split into.
    pub num_files: u32,
    /// Comoving box side length.
    pub box_size: f64,
    /// Matter density parameter.
    pub omega0: f64,
    /// Dark-energy density parameter.
    pub omega_lambda: f64,
    /// Dimensionless Hubble parameter.
    pub hubble: f64,
}

impl Header {
    fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() != HEADER_LEN {
            return Err(Error::snapshot(format!(
                "header block is {} bytes, expected {HEADER_LEN}",
                buf.len()
            )));
        }

        let mut npart = [0u32; 6];
        let mut mass = [0f64; 6];
        let mut npart_total = [0u64; 6];
        for t in 0..6 {
            npart[t] = le_u32(buf, 4 * t);
            mass[t] = le_f64(buf, 24 + 8 * t);
            let low = le_u32(buf, 96 + 4 * t) as u64;
            let high = le_u32(buf, 168 + 4 * t) as u64;
            npart_total[t] = (high << 32) | low;
        }

        Ok(Self {
            npart,
            mass,
            time: le_f64(buf, 72),
            redshift: le_f64(buf, 80),
            npart_total,
            num_files: le_u32(buf, 124),
            box_size: le_f64(buf, 128),
            omega0: le_f64(buf, 136),
            omega_lambda: le_f64(buf, 144),
            hubble: le_f64(buf, 152),
        })
    }

    /// Whether the run has particles whose masses are stored individually
    /// (which in practice means a hydrodynamic run).
    pub fn has_individual_masses(&self) -> bool {
        self.npart
            .iter()
            .zip(self.mass.iter())
            .any(|(&n, &m)| n > 0 && m == 0.0)
    }

    /// Particles in this file, all types.
    pub fn particles_in_file(&self) -> usize {
        self.npart.iter().map(|&n| n as usize).sum()
    }
}

/// Options for [`read_positions`].
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Which particle type to load (0..6).
    pub particle_type: usize,
    /// Divide coordinates by the box size, mapping the box onto `[0, 1)`.
    pub normalize: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            particle_type: DARK_MATTER,
            normalize: false,
        }
    }
}

/// Read the header and one particle type's positions from a snapshot stream.
pub fn read_positions<R: Read>(reader: R, options: ReadOptions) -> Result<(Header, PointSet)> {
    if options.particle_type >= 6 {
        return Err(Error::InvalidParameter {
            name: "particle_type",
            message: "must be in 0..6",
        });
    }

    let mut snap = Records { inner: reader };

    let Some((label, _)) = snap.label()? else {
        return Err(Error::snapshot("empty file"));
    };
    if &label != b"HEAD" {
        return Err(Error::snapshot(format!(
            "first block is {:?}, expected \"HEAD\"",
            String::from_utf8_lossy(&label)
        )));
    }
    let header = Header::parse(&snap.record()?)?;
    debug!(
        npart = ?header.npart,
        box_size = header.box_size,
        redshift = header.redshift,
        "read snapshot header"
    );

    loop {
        let Some((label, next)) = snap.label()? else {
            return Err(Error::snapshot("no POS block found"));
        };
        if &label == b"POS " {
            break;
        }
        trace!(block = %String::from_utf8_lossy(&label), bytes = next, "skipping block");
        snap.skip_record()?;
    }

    let payload = snap.record()?;
    let total = header.particles_in_file();
    if payload.len() != total * 3 * 4 {
        return Err(Error::snapshot(format!(
            "POS block is {} bytes, expected {} for {total} particles",
            payload.len(),
            total * 3 * 4
        )));
    }

    let skip: usize = header.npart[..options.particle_type]
        .iter()
        .map(|&n| n as usize)
        .sum();
    let count = header.npart[options.particle_type] as usize;
    let scale = if options.normalize {
        if header.box_size.is_nan() || header.box_size <= 0.0 {
            return Err(Error::snapshot("cannot normalize: box size is not positive"));
        }
        1.0 / header.box_size
    } else {
        1.0
    };

    let coords: Vec<f64> = payload[skip * 12..(skip + count) * 12]
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64 * scale)
        .collect();
    let points = PointSet::from_flat(&coords, 3)?;
    Ok((header, points))
}

/// Open and read a snapshot file.
pub fn open(path: impl AsRef<Path>, options: ReadOptions) -> Result<(Header, PointSet)> {
    let file = File::open(path)?;
    read_positions(BufReader::new(file), options)
}

/// Fortran-record reader.
struct Records<R> {
    inner: R,
}

impl<R: Read> Records<R> {
    fn marker(&mut self) -> Result<usize> {
        let mut b = [0u8; 4];
        self.inner.read_exact(&mut b).map_err(truncated)?;
        Ok(u32::from_le_bytes(b) as usize)
    }

    fn record(&mut self) -> Result<Vec<u8>> {
        let len = self.marker()?;
        self.payload(len)
    }

    fn payload(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| Error::snapshot(format!("record of {len} bytes is too large")))?;
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(truncated)?;
        if buf.len() != len {
            return Err(Error::snapshot("unexpected end of file"));
        }
        self.close(len)?;
        Ok(buf)
    }

    fn skip_record(&mut self) -> Result<()> {
        let len = self.marker()?;
        let copied = io::copy(&mut (&mut self.inner).take(len as u64), &mut io::sink())?;
        if copied != len as u64 {
            return Err(Error::snapshot("unexpected end of file"));
        }
        self.close(len)
    }

    fn close(&mut self, len: usize) -> Result<()> {
        let end = self.marker()?;
        if end != len {
            return Err(Error::snapshot(format!(
                "record markers disagree: {len} vs {end}"
            )));
        }
        Ok(())
    }

    /// Next block label, or `None` at a clean end of file.
    fn label(&mut self) -> Result<Option<([u8; 4], usize)>> {
        let mut b = [0u8; 4];
        let mut filled = 0;
        while filled < b.len() {
            match self.inner.read(&mut b[filled..]) {
                Ok(0) => break,
                Ok(k) => filled += k,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        match filled {
            0 => return Ok(None),
            4 => {}
            _ => return Err(Error::snapshot("unexpected end of file")),
        }

        let rec = self.payload(u32::from_le_bytes(b) as usize)?;
        if rec.len() != 8 {
            return Err(Error::snapshot(format!(
                "block label record is {} bytes, expected 8",
                rec.len()
            )));
        }
        Ok(Some(([rec[0], rec[1], rec[2], rec[3]], le_u32(&rec, 4) as usize)))
    }
}

fn truncated(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::snapshot("unexpected end of file")
    } else {
        Error::Io(e)
    }
}

#[inline]
fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline]
fn le_f64(buf: &[u8], at: usize) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[at..at + 8]);
    f64::from_le_bytes(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record(out: &mut Vec<u8>, payload: &[u8]) {
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    }

    fn block(out: &mut Vec<u8>, name: &[u8; 4], payload: &[u8]) {
        let mut label = name.to_vec();
        label.extend_from_slice(&(payload.len() as u32 + 8).to_le_bytes());
        record(out, &label);
        record(out, payload);
    }

    fn header_bytes(npart: [u32; 6], box_size: f64) -> Vec<u8> {
        let mut h = vec![0u8; HEADER_LEN];
        for (t, &n) in npart.iter().enumerate() {
            h[4 * t..4 * t + 4].copy_from_slice(&n.to_le_bytes());
            h[96 + 4 * t..100 + 4 * t].copy_from_slice(&n.to_le_bytes());
        }
        h[24 + 8..32 + 8].copy_from_slice(&0.5f64.to_le_bytes());
        h[80..88].copy_from_slice(&1.25f64.to_le_bytes());
        h[124..128].copy_from_slice(&1u32.to_le_bytes());
        h[128..136].copy_from_slice(&box_size.to_le_bytes());
        h[152..160].copy_from_slice(&0.7f64.to_le_bytes());
        h
    }

    fn positions(coords: &[f32]) -> Vec<u8> {
        coords.iter().flat_map(|c| c.to_le_bytes()).collect()
    }

    /// One gas particle followed by two dark-matter particles, with a velocity
    /// block in front of the positions.
    fn snapshot() -> Vec<u8> {
        let mut snap = Vec::new();
        block(&mut snap, b"HEAD", &header_bytes([1, 2, 0, 0, 0, 0], 100.0));
        block(&mut snap, b"VEL ", &positions(&[9.0; 9]));
        block(
            &mut snap,
            b"POS ",
            &positions(&[1.0, 1.0, 1.0, 10.0, 20.0, 30.0, 50.0, 60.0, 70.0]),
        );
        snap
    }

    #[test]
    fn test_reads_dark_matter_positions() {
        let (header, points) = read_positions(&snapshot()[..], ReadOptions::default()).unwrap();
        assert_eq!(header.npart, [1, 2, 0, 0, 0, 0]);
        assert_eq!(header.npart_total[1], 2);
        assert_eq!(header.mass[1], 0.5);
        assert_eq!(header.redshift, 1.25);
        assert_eq!(header.box_size, 100.0);
        assert_eq!(header.hubble, 0.7);
        assert!(header.has_individual_masses());

        assert_eq!(points.len(), 2);
        assert_eq!(points.dim(), 3);
        assert_eq!(points.point(0), &[10.0, 20.0, 30.0]);
        assert_eq!(points.point(1), &[50.0, 60.0, 70.0]);
    }

    #[test]
    fn test_normalize_and_type_selection() {
        let options = ReadOptions {
            particle_type: 0,
            normalize: true,
        };
        let (_, points) = read_positions(&snapshot()[..], options).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points.point(0), &[0.01, 0.01, 0.01]);

        let options = ReadOptions {
            particle_type: 4,
            normalize: false,
        };
        let (_, points) = read_positions(&snapshot()[..], options).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_missing_pos_block() {
        let mut snap = Vec::new();
        block(&mut snap, b"HEAD", &header_bytes([0, 1, 0, 0, 0, 0], 1.0));
        block(&mut snap, b"VEL ", &positions(&[0.0; 3]));
        let err = read_positions(&snap[..], ReadOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Snapshot);
        assert!(err.to_string().contains("no POS block"));
    }

    #[test]
    fn test_truncated_label_is_not_missing_block() {
        let mut snap = Vec::new();
        block(&mut snap, b"HEAD", &header_bytes([0, 1, 0, 0, 0, 0], 1.0));
        let full = snap.len();
        block(&mut snap, b"POS ", &positions(&[0.0; 3]));

        // Cut inside the second label record, and inside its leading marker.
        for cut in [full + 6, full + 2] {
            let err = read_positions(&snap[..cut], ReadOptions::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Snapshot);
            assert!(err.to_string().contains("unexpected end of file"), "{err}");
        }

        let err = read_positions(&[][..], ReadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("empty file"));
    }

    #[test]
    fn test_marker_mismatch() {
        let mut snap = snapshot();
        // Corrupt the trailing marker of the HEAD label record.
        snap[12] = 7;
        let err = read_positions(&snap[..], ReadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("markers disagree"));
    }

    #[test]
    fn test_wrong_first_block() {
        let mut snap = Vec::new();
        block(&mut snap, b"POS ", &positions(&[0.0; 3]));
        let err = read_positions(&snap[..], ReadOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Snapshot);
    }

    #[test]
    fn test_invalid_particle_type() {
        let options = ReadOptions {
            particle_type: 6,
            normalize: false,
        };
        let err = read_positions(&snapshot()[..], options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
