//! Write operations for particle lists

// standard library
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::list::{Header, Packed, ParticleList, Precision, COUNT_OFFSET, MAGIC, VERSION};
use crate::particle::ParticleRecord;

// external crates
use log::debug;
use mcpost_utils::ValueExt;

/// Incrementally write particles to a new particle list file
///
/// The header is written on creation with a placeholder count, which is
/// patched by [ParticleWriter::finish()] once every particle has been added.
/// A writer dropped without calling `finish()` leaves a file that declares
/// zero particles.
///
/// ```rust, no_run
/// # use mcpost_particles::{Header, ParticleRecord, ParticleWriter};
/// let mut writer = ParticleWriter::create("./out.plst", &Header::default()).unwrap();
/// writer.add(&ParticleRecord { pdgcode: 22, energy: 1.0, weight: 1.0, ..Default::default() }).unwrap();
/// assert_eq!(writer.finish().unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct ParticleWriter {
    writer: BufWriter<File>,
    precision: Precision,
    count: u64,
}

impl ParticleWriter {
    /// Create the output file and write the header
    pub fn create<P: AsRef<Path>>(path: P, header: &Header) -> Result<Self> {
        let mut writer = init_writer(path)?;

        writer.write_all(&MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?;
        bincode::serialize_into(&mut writer, header)?;

        Ok(Self {
            writer,
            precision: header.precision,
            count: 0,
        })
    }

    /// Append a single particle
    pub fn add(&mut self, record: &ParticleRecord) -> Result<()> {
        match self.precision {
            Precision::Single => {
                bincode::serialize_into(&mut self.writer, &Packed::<f32>::from(record))?
            }
            Precision::Double => {
                bincode::serialize_into(&mut self.writer, &Packed::<f64>::from(record))?
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Number of particles added so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Record the final particle count and flush everything to disk
    pub fn finish(mut self) -> Result<u64> {
        self.writer.seek(SeekFrom::Start(COUNT_OFFSET))?;
        self.writer.write_all(&self.count.to_le_bytes())?;
        self.writer.flush()?;
        debug!("Wrote {} particles", self.count);
        Ok(self.count)
    }
}

/// Write a full [ParticleList] to a binary particle list file
///
/// Returns the number of particles written.
///
/// ```rust, no_run
/// # use mcpost_particles::{read_particle_list, write_particle_list};
/// let list = read_particle_list("./source.plst").unwrap();
/// write_particle_list(&list, "./copy.plst").unwrap();
/// ```
pub fn write_particle_list<P: AsRef<Path>>(list: &ParticleList, path: P) -> Result<u64> {
    let mut writer = ParticleWriter::create(path, &list.header)?;
    for particle in &list.particles {
        writer.add(particle)?;
    }
    writer.finish()
}

/// Write a [ParticleList] to a JSON file
///
/// Direct serialisation of the header and every particle, useful for
/// inspecting small lists or passing them to other tools.
pub fn write_json<P: AsRef<Path>>(list: &ParticleList, path: P) -> Result<()> {
    let writer = init_writer(path)?;
    serde_json::to_writer_pretty(writer, list)?;
    Ok(())
}

/// Write a [ParticleList] to a human readable text file
///
/// Header metadata is written first with the comments wrapped to 80
/// characters, followed by one row per particle in scientific notation.
///
/// ```rust, no_run
/// # use mcpost_particles::{read_particle_list, write_ascii_pretty};
/// let list = read_particle_list("./source.plst").unwrap();
/// write_ascii_pretty(&list, "./source.txt").unwrap();
/// ```
pub fn write_ascii_pretty<P: AsRef<Path>>(list: &ParticleList, path: P) -> Result<()> {
    let mut writer = init_writer(path)?;

    writeln!(writer, "Source: {}", list.header.source_name)?;
    writeln!(writer, "Precision: {:?}", list.header.precision)?;
    writeln!(writer, "Particles: {}", list.len())?;

    for comment in &list.header.comments {
        writeln!(writer, "\n{}", textwrap::fill(comment, 80))?;
    }

    writeln!(
        writer,
        "\n{:>8} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
        "pdgcode", "x", "y", "z", "ux", "uy", "uz", "time", "energy", "weight"
    )?;

    for particle in &list.particles {
        write!(writer, "{:>8}", particle.pdgcode)?;
        for value in &particle.to_array()[1..] {
            write!(writer, " {:>11}", value.sci(4, 2))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
