// crate modules
use crate::particle::{ParticleKind, ParticleRecord};

// external crates
use serde::{Deserialize, Serialize};

/// Magic bytes at the start of every particle list file
pub(crate) const MAGIC: [u8; 4] = *b"PLST";

/// Current version of the file layout
pub(crate) const VERSION: u32 = 1;

/// Byte offset of the particle count, straight after the magic and version
pub(crate) const COUNT_OFFSET: u64 = 8;

/// Upper bound on the encoded size of the [Header]
pub(crate) const HEADER_LIMIT: u64 = 1 << 24;

/// Floating point precision of the stored records
///
/// Single precision halves the file size. Values are rounded to the nearest
/// `f32` on write and widened back to `f64` on read.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    Single,
    #[default]
    Double,
}

impl Precision {
    /// Size of one particle record in bytes
    ///
    /// ```rust
    /// # use mcpost_particles::Precision;
    /// assert_eq!(Precision::Single.record_size(), 40);
    /// assert_eq!(Precision::Double.record_size(), 76);
    /// ```
    pub fn record_size(&self) -> usize {
        let float = match self {
            Self::Single => std::mem::size_of::<f32>(),
            Self::Double => std::mem::size_of::<f64>(),
        };
        std::mem::size_of::<i32>() + 9 * float
    }
}

/// Metadata stored ahead of the particle records
///
/// The source name and comments are free text, used to record where a list
/// came from and what has been done to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Name of the program or process that made the list
    pub source_name: String,
    /// Free-text comments, e.g. a history of transformations
    pub comments: Vec<String>,
    /// Precision of the stored records
    pub precision: Precision,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            source_name: "mcpost".to_string(),
            comments: Vec::new(),
            precision: Precision::default(),
        }
    }
}

impl Header {
    /// Copy of the header with an extra comment appended
    ///
    /// Used to carry metadata from an input list over to a transformed
    /// output.
    ///
    /// ```rust
    /// # use mcpost_particles::Header;
    /// let header = Header::default().with_comment("translated by (-120, 0, 0) cm");
    /// assert_eq!(header.comments.len(), 1);
    /// ```
    pub fn with_comment(&self, comment: &str) -> Self {
        let mut header = self.clone();
        header.comments.push(comment.to_string());
        header
    }
}

/// Full content of a particle list file
///
/// For large files that do not need to be held in memory at once, see
/// [ParticleReader](crate::ParticleReader).
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ParticleList {
    /// File metadata
    pub header: Header,
    /// Every particle in file order
    pub particles: Vec<ParticleRecord>,
}

impl ParticleList {
    /// Number of particles in the list
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if there are no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles of a single kind
    pub fn of_kind(&self, kind: ParticleKind) -> impl Iterator<Item = &ParticleRecord> {
        self.particles
            .iter()
            .filter(move |p| p.pdgcode == kind.pdgcode())
    }
}

impl std::fmt::Display for ParticleList {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "ParticleList {{")?;
        writeln!(f, "    source: {}", self.header.source_name)?;
        writeln!(f, "    precision: {:?}", self.header.precision)?;
        writeln!(f, "    comments: {}", self.header.comments.len())?;
        for kind in ParticleKind::ALL {
            writeln!(f, "    {kind}s: {}", self.of_kind(kind).count())?;
        }
        write!(f, "    total: {}\n}}", self.len())
    }
}

/// On-disk form of a single record at a given float precision
///
/// Serialised with bincode's fixed-width little-endian encoding, so a record
/// is always [Precision::record_size] bytes.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Packed<T> {
    pdgcode: i32,
    position: [T; 3],
    direction: [T; 3],
    time: T,
    energy: T,
    weight: T,
}

impl<T: Into<f64> + Copy> From<Packed<T>> for ParticleRecord {
    fn from(packed: Packed<T>) -> Self {
        let [x, y, z] = packed.position.map(Into::into);
        let [ux, uy, uz] = packed.direction.map(Into::into);
        Self {
            pdgcode: packed.pdgcode,
            x,
            y,
            z,
            ux,
            uy,
            uz,
            time: packed.time.into(),
            energy: packed.energy.into(),
            weight: packed.weight.into(),
        }
    }
}

impl From<&ParticleRecord> for Packed<f64> {
    fn from(record: &ParticleRecord) -> Self {
        Self {
            pdgcode: record.pdgcode,
            position: record.position(),
            direction: record.direction(),
            time: record.time,
            energy: record.energy,
            weight: record.weight,
        }
    }
}

impl From<&ParticleRecord> for Packed<f32> {
    fn from(record: &ParticleRecord) -> Self {
        Self {
            pdgcode: record.pdgcode,
            position: record.position().map(|v| v as f32),
            direction: record.direction().map(|v| v as f32),
            time: record.time as f32,
            energy: record.energy as f32,
            weight: record.weight as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_size_matches_precision() {
        let record = ParticleRecord {
            pdgcode: 2112,
            energy: 14.1,
            ..Default::default()
        };

        let single = bincode::serialize(&Packed::<f32>::from(&record)).unwrap();
        assert_eq!(single.len(), Precision::Single.record_size());

        let double = bincode::serialize(&Packed::<f64>::from(&record)).unwrap();
        assert_eq!(double.len(), Precision::Double.record_size());
    }

    #[test]
    fn comments_are_appended() {
        let header = Header::default()
            .with_comment("first")
            .with_comment("second");
        assert_eq!(header.comments, vec!["first", "second"]);
        assert_eq!(header.source_name, "mcpost");
    }
}
