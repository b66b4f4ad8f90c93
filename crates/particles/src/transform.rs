//! Source biasing and geometric transformations of particle records
//!
//! A [RuleSet] re-weights particles into a biased source, and a
//! [Translation] shifts particles that fall inside a spatial window.
//! Both are plain values applied independently to each record, so the same
//! input may be run through any number of rule sets without interference.

// standard library
use std::collections::BTreeMap;

// crate modules
use crate::error::{Error, Result};
use crate::particle::{Axis, ParticleKind, ParticleRecord};

// external crates
use itertools::Itertools;
use log::trace;
use serde::{Deserialize, Serialize};

/// Energy and weight assigned to every particle of one type
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Kinetic energy (MeV)
    pub energy: f64,
    /// Statistical weight
    pub weight: f64,
}

/// What to do with a particle that has no rule for its PDG code
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnmappedPolicy {
    /// Fail with [Error::UnmappedParticle]
    #[default]
    Reject,
    /// Keep the particle's own energy and weight
    Retain,
    /// Drop the particle from the output
    Skip,
}

/// Per-particle-type energy and weight assignments
///
/// Applying a rule set moves every particle to the origin at time zero,
/// keeps its type and direction, and replaces its energy and weight with the
/// values assigned to its PDG code.
///
/// ```rust
/// # use mcpost_particles::{ParticleKind, ParticleRecord, RuleSet};
/// let rules = RuleSet::new()
///     .with_kind(ParticleKind::Neutron, 2.0, 0.25)
///     .with_kind(ParticleKind::Photon, 1.0, 0.5);
///
/// let source = ParticleRecord {
///     pdgcode: 2112,
///     x: 1.0,
///     uz: 1.0,
///     energy: 14.1,
///     weight: 1.0,
///     ..Default::default()
/// };
///
/// let biased = rules.apply(&source).unwrap().unwrap();
/// assert_eq!(biased.x, 0.0);
/// assert_eq!(biased.uz, 1.0);
/// assert_eq!(biased.energy, 2.0);
/// assert_eq!(biased.weight, 0.25);
/// ```
///
/// Rule sets are serde types and may be stored alongside a job as JSON.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Assignments keyed by PDG code
    pub rules: BTreeMap<i32, Assignment>,
    /// Handling of particles without a rule
    #[serde(default)]
    pub policy: UnmappedPolicy,
}

impl RuleSet {
    /// Empty rule set that rejects every particle
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for an arbitrary PDG code
    pub fn with_rule(mut self, pdgcode: i32, energy: f64, weight: f64) -> Self {
        self.rules.insert(pdgcode, Assignment { energy, weight });
        self
    }

    /// Add or replace the rule for a known particle kind
    pub fn with_kind(self, kind: ParticleKind, energy: f64, weight: f64) -> Self {
        self.with_rule(kind.pdgcode(), energy, weight)
    }

    /// Set the handling of unmapped particles
    pub fn with_policy(mut self, policy: UnmappedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Assignment for a PDG code, if any
    pub fn get(&self, pdgcode: i32) -> Option<&Assignment> {
        self.rules.get(&pdgcode)
    }

    /// Transform a single record
    ///
    /// Returns `Ok(None)` only for an unmapped particle under
    /// [UnmappedPolicy::Skip].
    pub fn apply(&self, record: &ParticleRecord) -> Result<Option<ParticleRecord>> {
        let (energy, weight) = match (self.get(record.pdgcode), self.policy) {
            (Some(a), _) => (a.energy, a.weight),
            (None, UnmappedPolicy::Retain) => (record.energy, record.weight),
            (None, UnmappedPolicy::Skip) => {
                trace!("Skipping unmapped particle {}", record.pdgcode);
                return Ok(None);
            }
            (None, UnmappedPolicy::Reject) => {
                return Err(Error::UnmappedParticle(record.pdgcode))
            }
        };

        Ok(Some(ParticleRecord {
            pdgcode: record.pdgcode,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            ux: record.ux,
            uy: record.uy,
            uz: record.uz,
            time: 0.0,
            energy,
            weight,
        }))
    }

    /// Transform every record, stopping at the first error
    pub fn apply_all<'a, I>(&self, records: I) -> Result<Vec<ParticleRecord>>
    where
        I: IntoIterator<Item = &'a ParticleRecord>,
    {
        records
            .into_iter()
            .filter_map(|r| self.apply(r).transpose())
            .collect()
    }

    /// Short description, used as a provenance comment
    ///
    /// ```rust
    /// # use mcpost_particles::{ParticleKind, RuleSet};
    /// let rules = RuleSet::new().with_kind(ParticleKind::Neutron, 2.0, 0.25);
    /// assert_eq!(
    ///     rules.describe(),
    ///     "re-weighted (2112: 2 MeV x 0.25), unmapped Reject"
    /// );
    /// ```
    pub fn describe(&self) -> String {
        let rules = self
            .rules
            .iter()
            .map(|(code, a)| format!("{code}: {} MeV x {}", a.energy, a.weight))
            .join(", ");
        format!("re-weighted ({rules}), unmapped {:?}", self.policy)
    }
}

/// Open interval along one axis
///
/// Bounds are exclusive, so a particle exactly on `min` or `max` is outside
/// the window.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Axis the window is defined along
    pub axis: Axis,
    /// Lower bound (cm)
    pub min: f64,
    /// Upper bound (cm)
    pub max: f64,
}

impl Window {
    /// True if the particle lies strictly inside the window
    pub fn contains(&self, record: &ParticleRecord) -> bool {
        let value = record.coordinate(self.axis);
        value > self.min && value < self.max
    }
}

/// Shift particle positions by a fixed offset
///
/// Without a window every particle is moved. With a window, only particles
/// strictly inside it are moved and the rest pass through untouched.
///
/// ```rust
/// # use mcpost_particles::{Axis, ParticleRecord, Translation};
/// let translation = Translation::new([-120.0, 0.0, 0.0]).within(Axis::Z, -10.0, 10.0);
///
/// let inside = ParticleRecord { x: 100.0, z: 5.0, ..Default::default() };
/// let outside = ParticleRecord { x: 100.0, z: 50.0, ..Default::default() };
///
/// assert_eq!(translation.apply(&inside).x, -20.0);
/// assert_eq!(translation.apply(&outside).x, 100.0);
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// Offset added to x, y, z (cm)
    pub offset: [f64; 3],
    /// Optional region the translation is restricted to
    pub window: Option<Window>,
}

impl Translation {
    /// Translation applied to every particle
    pub fn new(offset: [f64; 3]) -> Self {
        Self {
            offset,
            window: None,
        }
    }

    /// Restrict the translation to `min < coordinate < max` along `axis`
    pub fn within(mut self, axis: Axis, min: f64, max: f64) -> Self {
        self.window = Some(Window { axis, min, max });
        self
    }

    /// True if the particle would be moved
    pub fn applies_to(&self, record: &ParticleRecord) -> bool {
        self.window.map_or(true, |w| w.contains(record))
    }

    /// Translated copy of the record
    pub fn apply(&self, record: &ParticleRecord) -> ParticleRecord {
        if !self.applies_to(record) {
            return *record;
        }

        let [dx, dy, dz] = self.offset;
        ParticleRecord {
            x: record.x + dx,
            y: record.y + dy,
            z: record.z + dz,
            ..*record
        }
    }

    /// Short description, used as a provenance comment
    pub fn describe(&self) -> String {
        let [dx, dy, dz] = self.offset;
        match self.window {
            Some(w) => format!(
                "translated by ({dx}, {dy}, {dz}) cm where {} < {} < {} cm",
                w.min, w.axis, w.max
            ),
            None => format!("translated by ({dx}, {dy}, {dz}) cm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_neutron() -> ParticleRecord {
        ParticleRecord::from_array([2112.0, 1.0, 2.0, 3.0, 0.1, 0.2, 0.97, 5.0, 14.1, 1.0])
            .unwrap()
    }

    #[test]
    fn reweight_neutron() {
        let rules = RuleSet::new().with_kind(ParticleKind::Neutron, 2.0, 0.25);
        let result = rules.apply(&source_neutron()).unwrap().unwrap();

        assert_eq!(
            result.to_array(),
            [2112.0, 0.0, 0.0, 0.0, 0.1, 0.2, 0.97, 0.0, 2.0, 0.25]
        );
    }

    #[test]
    fn unmapped_policies() {
        let photon = ParticleRecord {
            pdgcode: 22,
            x: 4.0,
            energy: 0.5,
            weight: 0.8,
            ..Default::default()
        };
        let rules = RuleSet::new().with_kind(ParticleKind::Neutron, 2.0, 0.25);

        assert!(matches!(
            rules.apply(&photon),
            Err(Error::UnmappedParticle(22))
        ));

        let retained = rules
            .clone()
            .with_policy(UnmappedPolicy::Retain)
            .apply(&photon)
            .unwrap()
            .unwrap();
        assert_eq!(retained.energy, 0.5);
        assert_eq!(retained.weight, 0.8);
        assert_eq!(retained.x, 0.0);

        let skipped = rules.with_policy(UnmappedPolicy::Skip).apply(&photon);
        assert_eq!(skipped.unwrap(), None);
    }

    #[test]
    fn unmapped_never_inherits_previous_values() {
        let rules = RuleSet::new()
            .with_kind(ParticleKind::Neutron, 2.0, 0.25)
            .with_policy(UnmappedPolicy::Retain);
        let electron = ParticleRecord {
            pdgcode: 11,
            energy: 0.1,
            weight: 3.0,
            ..Default::default()
        };

        let out = rules.apply_all([&source_neutron(), &electron]).unwrap();
        assert_eq!(out[0].energy, 2.0);
        assert_eq!(out[1].energy, 0.1);
        assert_eq!(out[1].weight, 3.0);
    }

    #[test]
    fn independent_rule_sets() {
        let input = [source_neutron(); 3];
        let low = RuleSet::new().with_kind(ParticleKind::Neutron, 1.0, 0.5);
        let high = RuleSet::new().with_kind(ParticleKind::Neutron, 10.0, 0.05);

        let a = low.apply_all(&input).unwrap();
        let b = high.apply_all(&input).unwrap();

        assert!(a.iter().all(|p| p.energy == 1.0 && p.weight == 0.5));
        assert!(b.iter().all(|p| p.energy == 10.0 && p.weight == 0.05));
        assert_eq!(input[0].energy, 14.1);
    }

    #[test]
    fn rules_from_json() {
        let json = r#"{"rules": {"22": {"energy": 1.0, "weight": 0.5}}}"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(rules.policy, UnmappedPolicy::Reject);
        assert_eq!(rules.get(22).unwrap().weight, 0.5);
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let translation = Translation::new([1.0, 1.0, 1.0]).within(Axis::X, 0.0, 10.0);
        let on_edge = ParticleRecord {
            x: 10.0,
            ..Default::default()
        };
        assert!(!translation.applies_to(&on_edge));
        assert_eq!(translation.apply(&on_edge), on_edge);
    }

    #[test]
    fn unwindowed_translation_moves_everything() {
        let translation = Translation::new([0.0, -5.0, 2.5]);
        let moved = translation.apply(&source_neutron());
        assert_eq!(moved.position(), [1.0, -3.0, 5.5]);
        assert_eq!(moved.energy, 14.1);
        assert_eq!(translation.describe(), "translated by (0, -5, 2.5) cm");
    }
}
