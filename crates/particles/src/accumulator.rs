//! Running weight totals over particle records

// crate modules
use crate::error::{Error, Result};
use crate::particle::{ParticleKind, ParticleRecord};

// external crates
use log::trace;
use rayon::prelude::*;

/// Count and summed weight for a single particle kind
#[derive(Debug, Default, Copy, Clone, PartialEq)]
struct Bucket {
    count: u64,
    weight: f64,
}

impl Bucket {
    fn add(&mut self, weight: f64) {
        self.count += 1;
        self.weight += weight;
    }

    fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            weight: self.weight + other.weight,
        }
    }
}

/// Summed particle counts and weights, in total and per particle kind
///
/// Every record contributes to the totals. Records with a classified PDG
/// code also contribute to their kind, and anything else is counted as
/// unrecognised rather than treated as an error.
///
/// ```rust
/// # use mcpost_particles::{ParticleKind, ParticleRecord, WeightAccumulator};
/// let particles = [
///     ParticleRecord { pdgcode: 2112, weight: 1.0, ..Default::default() },
///     ParticleRecord { pdgcode: 2112, weight: 0.5, ..Default::default() },
///     ParticleRecord { pdgcode: 22, weight: 2.0, ..Default::default() },
/// ];
///
/// let summary: WeightAccumulator = particles.iter().collect();
/// assert_eq!(summary.total_count(), 3);
/// assert_eq!(summary.total_weight(), 3.5);
/// assert_eq!(summary.average_weight(ParticleKind::Neutron).unwrap(), 0.75);
/// ```
///
/// Accumulators over disjoint sets of records may be combined with
/// [WeightAccumulator::merge()], which is how
/// [par_accumulate()](WeightAccumulator::par_accumulate) works.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WeightAccumulator {
    total: Bucket,
    neutron: Bucket,
    photon: Bucket,
    unrecognised_count: u64,
}

impl WeightAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a slice of records in parallel
    pub fn par_accumulate(records: &[ParticleRecord]) -> Self {
        records
            .par_iter()
            .fold(Self::new, |mut acc, record| {
                acc.add(record);
                acc
            })
            .reduce(Self::new, Self::merge)
    }

    /// Add a single record
    pub fn add(&mut self, record: &ParticleRecord) {
        self.total.add(record.weight);
        match ParticleKind::try_from(record.pdgcode) {
            Ok(kind) => self.bucket_mut(kind).add(record.weight),
            Err(_) => {
                trace!("Unrecognised particle type {}", record.pdgcode);
                self.unrecognised_count += 1;
            }
        }
    }

    /// Combine with another accumulator
    pub fn merge(self, other: Self) -> Self {
        Self {
            total: self.total.merge(other.total),
            neutron: self.neutron.merge(other.neutron),
            photon: self.photon.merge(other.photon),
            unrecognised_count: self.unrecognised_count + other.unrecognised_count,
        }
    }

    /// Number of records of every type
    pub fn total_count(&self) -> u64 {
        self.total.count
    }

    /// Summed weight of every type
    pub fn total_weight(&self) -> f64 {
        self.total.weight
    }

    /// Number of records of one kind
    pub fn count(&self, kind: ParticleKind) -> u64 {
        self.bucket(kind).count
    }

    /// Summed weight of one kind
    pub fn weight(&self, kind: ParticleKind) -> f64 {
        self.bucket(kind).weight
    }

    /// Number of records with an unclassified PDG code
    pub fn unrecognised_count(&self) -> u64 {
        self.unrecognised_count
    }

    /// Mean weight of one kind
    ///
    /// Fails with [Error::DivisionByZero] if there are no particles of that
    /// kind.
    pub fn average_weight(&self, kind: ParticleKind) -> Result<f64> {
        average(self.bucket(kind))
    }

    /// Mean weight over every record
    pub fn total_average_weight(&self) -> Result<f64> {
        average(&self.total)
    }

    fn bucket(&self, kind: ParticleKind) -> &Bucket {
        match kind {
            ParticleKind::Neutron => &self.neutron,
            ParticleKind::Photon => &self.photon,
        }
    }

    fn bucket_mut(&mut self, kind: ParticleKind) -> &mut Bucket {
        match kind {
            ParticleKind::Neutron => &mut self.neutron,
            ParticleKind::Photon => &mut self.photon,
        }
    }
}

fn average(bucket: &Bucket) -> Result<f64> {
    if bucket.count == 0 {
        return Err(Error::DivisionByZero {
            quantity: "average weight",
            denominator: "particle count",
        });
    }
    Ok(bucket.weight / bucket.count as f64)
}

impl<'a> FromIterator<&'a ParticleRecord> for WeightAccumulator {
    fn from_iter<I: IntoIterator<Item = &'a ParticleRecord>>(iter: I) -> Self {
        let mut accumulator = Self::new();
        accumulator.extend(iter);
        accumulator
    }
}

impl<'a> Extend<&'a ParticleRecord> for WeightAccumulator {
    fn extend<I: IntoIterator<Item = &'a ParticleRecord>>(&mut self, iter: I) {
        for record in iter {
            self.add(record);
        }
    }
}

impl std::fmt::Display for WeightAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let average = |result: Result<f64>| {
            result.map_or_else(|_| "undefined".to_string(), |v| format!("{v:.6}"))
        };

        writeln!(f, "Total particles       : {}", self.total_count())?;
        writeln!(f, "Total weight          : {:.6}", self.total_weight())?;
        writeln!(
            f,
            "Average weight        : {}",
            average(self.total_average_weight())
        )?;
        for kind in ParticleKind::ALL {
            writeln!(f, "{:<22}: {}", format!("Total {kind}s"), self.count(kind))?;
            writeln!(
                f,
                "{:<22}: {:.6}",
                format!("Total {kind} weight"),
                self.weight(kind)
            )?;
            writeln!(
                f,
                "{:<22}: {}",
                format!("Average {kind} weight"),
                average(self.average_weight(kind))
            )?;
        }
        write!(f, "Unrecognised particles: {}", self.unrecognised_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(pdgcode: i32, weight: f64) -> ParticleRecord {
        ParticleRecord {
            pdgcode,
            weight,
            ..Default::default()
        }
    }

    #[test]
    fn neutron_and_photon_totals() {
        let records = [particle(2112, 1.0), particle(2112, 0.5), particle(22, 2.0)];
        let acc: WeightAccumulator = records.iter().collect();

        assert_eq!(acc.total_count(), 3);
        assert_eq!(acc.total_weight(), 3.5);
        assert_eq!(acc.count(ParticleKind::Neutron), 2);
        assert_eq!(acc.weight(ParticleKind::Neutron), 1.5);
        assert_eq!(acc.average_weight(ParticleKind::Neutron).unwrap(), 0.75);
        assert_eq!(acc.count(ParticleKind::Photon), 1);
        assert_eq!(acc.average_weight(ParticleKind::Photon).unwrap(), 2.0);
    }

    #[test]
    fn unrecognised_codes_count_towards_totals_only() {
        let records = [particle(2112, 1.0), particle(11, 4.0)];
        let acc: WeightAccumulator = records.iter().collect();

        assert_eq!(acc.total_count(), 2);
        assert_eq!(acc.total_weight(), 5.0);
        assert_eq!(acc.unrecognised_count(), 1);
        assert_eq!(acc.weight(ParticleKind::Neutron), 1.0);
    }

    #[test]
    fn empty_kind_average_is_an_error() {
        let acc: WeightAccumulator = [particle(22, 1.0)].iter().collect();
        assert!(matches!(
            acc.average_weight(ParticleKind::Neutron),
            Err(Error::DivisionByZero { .. })
        ));
        assert!(WeightAccumulator::new().total_average_weight().is_err());
        assert!(acc.to_string().contains("undefined"));
    }

    #[test]
    fn order_independent() {
        let records = vec![
            particle(2112, 0.25),
            particle(22, 2.0),
            particle(2112, 1.0),
            particle(11, 0.5),
            particle(22, 0.125),
        ];
        let forward: WeightAccumulator = records.iter().collect();
        let reverse: WeightAccumulator = records.iter().rev().collect();
        let rotated: WeightAccumulator =
            records[2..].iter().chain(records[..2].iter()).collect();

        assert_eq!(forward, reverse);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn parallel_matches_sequential() {
        let records = (0..1000)
            .map(|i| particle(if i % 3 == 0 { 22 } else { 2112 }, 0.5))
            .collect::<Vec<ParticleRecord>>();

        let sequential: WeightAccumulator = records.iter().collect();
        let parallel = WeightAccumulator::par_accumulate(&records);
        assert_eq!(sequential, parallel);
    }
}
