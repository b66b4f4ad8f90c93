//! Particle list I/O, source biasing and weight summaries
//!
//! Particle lists record the state of every particle crossing a surface,
//! and are commonly re-used as the source for a follow-on calculation. This
//! crate reads and writes them, re-weights them into biased sources, and
//! summarises their weights.
//!
//! - [ParticleRecord] - Named-field state of a single particle
//! - [ParticleReader] / [ParticleWriter] - Streaming binary I/O
//! - [RuleSet] - Energy and weight assignments by particle type
//! - [Translation] - Shift particles inside a spatial window
//! - [WeightAccumulator] - Counts and weights per particle type
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use mcpost_particles::{inspect_weights, reweight_file, ParticleKind, RuleSet, UnmappedPolicy};
//! // Neutrons at 2 MeV and photons at 1 MeV, dropping anything else
//! let rules = RuleSet::new()
//!     .with_kind(ParticleKind::Neutron, 2.0, 0.25)
//!     .with_kind(ParticleKind::Photon, 1.0, 0.5)
//!     .with_policy(UnmappedPolicy::Skip);
//!
//! reweight_file("./source.plst", "./biased.plst", &rules).unwrap();
//!
//! // Check the weights of the new source
//! let summary = inspect_weights("./biased.plst").unwrap();
//! println!("{summary}");
//! ```
//!
//! # Particle types
//!
//! Particles are identified by PDG code. Only neutrons (2112) and photons
//! (22) are classified as a [ParticleKind], and re-weighting rules may be
//! given for any code with [RuleSet::with_rule()].

// Split into subfiles for development, but anything important is re-exported
mod accumulator;
mod error;
mod list;
mod particle;
mod pipeline;
mod reader;
mod transform;
mod writer;

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use accumulator::WeightAccumulator;

#[doc(inline)]
pub use list::{Header, ParticleList, Precision};

#[doc(inline)]
pub use particle::{Axis, ParticleKind, ParticleRecord};

#[doc(inline)]
pub use pipeline::{inspect_weights, reweight_file, translate_file};

#[doc(inline)]
pub use reader::{read_particle_list, ParticleReader};

#[doc(inline)]
pub use transform::{Assignment, RuleSet, Translation, UnmappedPolicy, Window};

#[doc(inline)]
pub use writer::{write_ascii_pretty, write_json, write_particle_list, ParticleWriter};
