//! Streaming reader for binary particle list files

// standard library
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::list::{
    Header, Packed, ParticleList, Precision, COUNT_OFFSET, HEADER_LIMIT, MAGIC, VERSION,
};
use crate::particle::ParticleRecord;

// external crates
use bincode::Options;
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, trace};

/// Read a full particle list into memory
///
/// Convenience wrapper around [ParticleReader] with the progress bar
/// disabled. Prefer the reader directly for very large files.
///
/// ```rust, no_run
/// # use mcpost_particles::read_particle_list;
/// let list = read_particle_list("./source.plst").unwrap();
/// println!("{list}");
/// ```
pub fn read_particle_list<P: AsRef<Path>>(path: P) -> Result<ParticleList> {
    let mut reader = ParticleReader::open(path)?;
    reader.disable_progress();

    let header = reader.header().clone();
    let particles = reader.collect::<Result<Vec<ParticleRecord>>>()?;

    Ok(ParticleList { header, particles })
}

/// Iterates over the particles in a particle list file
///
/// Opening the file validates the magic bytes and version, then reads the
/// particle count and the [Header]. Records are decoded one at a time as the
/// reader is iterated, so memory use does not depend on the file size.
///
/// ```rust, no_run
/// # use mcpost_particles::{ParticleReader, Result};
/// let mut reader = ParticleReader::open("./source.plst").unwrap();
/// reader.disable_progress();
///
/// println!("{} particles from {}", reader.len(), reader.header().source_name);
///
/// let total: f64 = reader
///     .map(|p| p.map(|p| p.weight))
///     .sum::<Result<f64>>()
///     .unwrap();
/// ```
///
/// A file that ends before the declared number of particles yields
/// [Error::TruncatedRecord] and iteration stops.
pub struct ParticleReader {
    reader: BufReader<File>,
    header: Header,
    count: u64,
    index: u64,
    disable_progress: bool,
    progress_bar: Option<Bar>,
}

impl ParticleReader {
    /// Open a particle list and read everything up to the first record
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let mut buffer = [0u8; std::mem::size_of::<u32>()];
        reader.read_exact(&mut buffer)?;
        let version = u32::from_le_bytes(buffer);
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let mut buffer = [0u8; std::mem::size_of::<u64>()];
        reader.read_exact(&mut buffer)?;
        let count = u64::from_le_bytes(buffer);

        let header = read_header(&mut reader, file_size)?;
        debug!(
            "Opened {} ({count} particles, {:?} precision)",
            path.display(),
            header.precision
        );

        Ok(Self {
            reader,
            header,
            count,
            index: 0,
            disable_progress: false,
            progress_bar: None,
        })
    }

    /// Metadata read from the file
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of particles declared by the file
    pub fn len(&self) -> u64 {
        self.count
    }

    /// True if the file declares no particles
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of particles not yet read
    pub fn remaining(&self) -> u64 {
        self.count - self.index
    }

    /// Do not print the tqdm progress indicators
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    fn init_progress_bar(&self) -> Result<Bar> {
        BarBuilder::default()
            .total(self.count as usize)
            .unit(" particles")
            .unit_scale(true)
            .disable(self.disable_progress)
            .bar_format("{count}/{total} particles [{rate} particles/s]   ")
            .build()
            .map_err(Error::ProgressBar)
    }

    fn read_record(&mut self) -> Result<ParticleRecord> {
        let record = match self.header.precision {
            Precision::Single => bincode::deserialize_from::<_, Packed<f32>>(&mut self.reader)
                .map(ParticleRecord::from),
            Precision::Double => bincode::deserialize_from::<_, Packed<f64>>(&mut self.reader)
                .map(ParticleRecord::from),
        };

        record.map_err(|e| {
            let eof = matches!(
                &*e,
                bincode::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof
            );
            if eof {
                Error::TruncatedRecord {
                    index: self.index,
                    expected: self.count,
                }
            } else {
                Error::Binary(e)
            }
        })
    }

    fn advance(&mut self) -> Result<ParticleRecord> {
        if self.progress_bar.is_none() {
            let mut bar = self.init_progress_bar()?;
            if !self.disable_progress {
                bar.refresh()?;
            }
            self.progress_bar = Some(bar);
        }

        let record = self.read_record()?;
        self.index += 1;

        if let Some(bar) = self.progress_bar.as_mut() {
            bar.update(1)?;
        }

        Ok(record)
    }
}

/// Decode the header without trusting its length prefixes
///
/// Nothing larger than the rest of the file, or [HEADER_LIMIT], is ever
/// allocated.
fn read_header(reader: &mut BufReader<File>, file_size: u64) -> Result<Header> {
    let limit = file_size
        .saturating_sub(COUNT_OFFSET + std::mem::size_of::<u64>() as u64)
        .min(HEADER_LIMIT);

    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(limit)
        .deserialize_from(reader)
        .map_err(|e| {
            if matches!(&*e, bincode::ErrorKind::SizeLimit) {
                Error::OversizedHeader { limit }
            } else {
                Error::Binary(e)
            }
        })
}

impl Iterator for ParticleReader {
    type Item = Result<ParticleRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            // need an extra line for clean spacing if the progress bar is printed
            if self.progress_bar.take().is_some() && !self.disable_progress {
                eprintln!()
            }
            return None;
        }

        match self.advance() {
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                trace!("Stopping at particle {} of {}", self.index, self.count);
                self.index = self.count;
                self.progress_bar = None;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (0, Some(remaining))
    }
}

impl std::fmt::Debug for ParticleReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleReader")
            .field("header", &self.header)
            .field("count", &self.count)
            .field("index", &self.index)
            .field("disable_progress", &self.disable_progress)
            .finish()
    }
}
