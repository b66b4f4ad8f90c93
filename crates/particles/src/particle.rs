//! Particle records and PDG particle designators

// crate modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Particle kinds with dedicated handling
///
/// Particle lists identify particles by their PDG code. Only neutrons and
/// photons are classified, and any other code fails to convert with
/// [Error::UnrecognisedParticle] so callers decide what to do with them.
///
/// ```rust
/// # use mcpost_particles::ParticleKind;
/// // From the PDG code
/// assert_eq!(ParticleKind::Neutron, ParticleKind::try_from(2112).unwrap());
/// assert!(ParticleKind::try_from(11).is_err());
///
/// // From a name or symbol
/// assert_eq!(ParticleKind::Photon, ParticleKind::try_from("gamma").unwrap());
/// assert_eq!(ParticleKind::Neutron, ParticleKind::try_from("n").unwrap());
/// ```
///
/// | PDG code | Name    | Symbols                    |
/// | -------- | ------- | -------------------------- |
/// | 2112     | neutron | `n`, `neutron`             |
/// | 22       | photon  | `p`, `g`, `photon`, `gamma`|
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Photon = 22,
    Neutron = 2112,
}

impl ParticleKind {
    /// Every classified particle kind
    pub const ALL: [ParticleKind; 2] = [ParticleKind::Neutron, ParticleKind::Photon];

    /// PDG code of the particle, an alternative to `kind as i32`
    ///
    /// ```rust
    /// # use mcpost_particles::ParticleKind;
    /// assert_eq!(ParticleKind::Photon.pdgcode(), 22);
    /// ```
    #[inline]
    pub fn pdgcode(&self) -> i32 {
        *self as i32
    }

    /// Lowercase name of the particle
    pub fn name(&self) -> &'static str {
        match self {
            Self::Neutron => "neutron",
            Self::Photon => "photon",
        }
    }
}

impl std::fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Convert from a PDG code
impl TryFrom<i32> for ParticleKind {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            2112 => Ok(Self::Neutron),
            22 => Ok(Self::Photon),
            _ => Err(Error::UnrecognisedParticle(code)),
        }
    }
}

/// Convert from a PDG code, name, or symbol
impl TryFrom<&str> for ParticleKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "2112" | "n" | "neutron" => Ok(Self::Neutron),
            "22" | "p" | "g" | "photon" | "gamma" => Ok(Self::Photon),
            _ => Err(Error::FailedToInferParticle(s.to_string())),
        }
    }
}

/// Coordinate axis
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let axis = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        write!(f, "{axis}")
    }
}

/// State of a single particle in a particle list
///
/// Fields are stored in the same order as the file records:
///
/// ```text
/// pdgcode x y z ux uy uz time energy weight
/// ```
///
/// Positions are in cm, time in ms, and kinetic energy in MeV. The direction
/// is a unit vector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// PDG particle code
    pub pdgcode: i32,
    /// Position x (cm)
    pub x: f64,
    /// Position y (cm)
    pub y: f64,
    /// Position z (cm)
    pub z: f64,
    /// Direction cosine along x
    pub ux: f64,
    /// Direction cosine along y
    pub uy: f64,
    /// Direction cosine along z
    pub uz: f64,
    /// Time (ms)
    pub time: f64,
    /// Kinetic energy (MeV)
    pub energy: f64,
    /// Statistical weight
    pub weight: f64,
}

impl ParticleRecord {
    /// Classified particle kind
    ///
    /// ```rust
    /// # use mcpost_particles::{ParticleKind, ParticleRecord};
    /// let record = ParticleRecord { pdgcode: 2112, ..Default::default() };
    /// assert_eq!(record.kind().unwrap(), ParticleKind::Neutron);
    /// ```
    pub fn kind(&self) -> Result<ParticleKind> {
        ParticleKind::try_from(self.pdgcode)
    }

    /// Position vector (cm)
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Direction unit vector
    pub fn direction(&self) -> [f64; 3] {
        [self.ux, self.uy, self.uz]
    }

    /// Position along a single axis (cm)
    pub fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Flatten to the 10 numeric columns of a particle list
    ///
    /// ```rust
    /// # use mcpost_particles::ParticleRecord;
    /// let record = ParticleRecord { pdgcode: 22, weight: 0.5, ..Default::default() };
    /// assert_eq!(record.to_array()[0], 22.0);
    /// assert_eq!(record.to_array()[9], 0.5);
    /// ```
    pub fn to_array(&self) -> [f64; 10] {
        [
            f64::from(self.pdgcode),
            self.x,
            self.y,
            self.z,
            self.ux,
            self.uy,
            self.uz,
            self.time,
            self.energy,
            self.weight,
        ]
    }

    /// Build from the 10 numeric columns of a particle list
    ///
    /// Fails with [Error::InvalidPdgCode] if the first column is not an
    /// integer within `i32` range.
    ///
    /// ```rust
    /// # use mcpost_particles::ParticleRecord;
    /// let columns = [2112.0, 1.0, 2.0, 3.0, 0.1, 0.2, 0.97, 5.0, 14.1, 1.0];
    /// let record = ParticleRecord::from_array(columns).unwrap();
    /// assert_eq!(record.pdgcode, 2112);
    /// assert_eq!(record.energy, 14.1);
    ///
    /// assert!(ParticleRecord::from_array([22.5; 10]).is_err());
    /// ```
    pub fn from_array(columns: [f64; 10]) -> Result<Self> {
        let [code, x, y, z, ux, uy, uz, time, energy, weight] = columns;

        let in_range = code >= f64::from(i32::MIN) && code <= f64::from(i32::MAX);
        if code.fract() != 0.0 || !in_range {
            return Err(Error::InvalidPdgCode(code));
        }

        Ok(Self {
            pdgcode: code as i32,
            x,
            y,
            z,
            ux,
            uy,
            uz,
            time,
            energy,
            weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdg_codes() {
        for kind in ParticleKind::ALL {
            assert_eq!(ParticleKind::try_from(kind.pdgcode()).unwrap(), kind);
        }
        assert!(matches!(
            ParticleKind::try_from(-11),
            Err(Error::UnrecognisedParticle(-11))
        ));
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(
            ParticleKind::try_from(" Neutron ").unwrap(),
            ParticleKind::Neutron
        );
        assert_eq!(ParticleKind::try_from("PHOTON").unwrap(), ParticleKind::Photon);
        assert!(ParticleKind::try_from("electron").is_err());
    }

    #[test]
    fn non_finite_pdg_code() {
        let mut columns = [0.0; 10];
        columns[0] = f64::NAN;
        assert!(ParticleRecord::from_array(columns).is_err());
        columns[0] = 1e12;
        assert!(ParticleRecord::from_array(columns).is_err());
    }
}
