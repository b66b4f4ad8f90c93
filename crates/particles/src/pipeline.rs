//! File-to-file operations on particle lists

// standard library
use std::path::Path;

// crate modules
use crate::accumulator::WeightAccumulator;
use crate::error::Result;
use crate::list::Header;
use crate::particle::ParticleRecord;
use crate::reader::ParticleReader;
use crate::transform::{RuleSet, Translation};
use crate::writer::ParticleWriter;

// external crates
use log::{debug, info};

/// Re-weight every particle in `input` and write the result to `output`
///
/// Every record is transformed in memory before the output file is created,
/// so an unmapped particle under [UnmappedPolicy::Reject] fails the whole
/// run without leaving a partial file behind. The input header is carried
/// over with a comment describing the rule set.
///
/// Returns the number of particles written, which is smaller than the input
/// only under [UnmappedPolicy::Skip].
///
/// ```rust, no_run
/// # use mcpost_particles::{reweight_file, ParticleKind, RuleSet};
/// let rules = RuleSet::new()
///     .with_kind(ParticleKind::Neutron, 2.0, 0.25)
///     .with_kind(ParticleKind::Photon, 1.0, 0.5);
///
/// let n = reweight_file("./source.plst", "./biased.plst", &rules).unwrap();
/// ```
///
/// [UnmappedPolicy::Reject]: crate::UnmappedPolicy::Reject
/// [UnmappedPolicy::Skip]: crate::UnmappedPolicy::Skip
pub fn reweight_file<P, Q>(input: P, output: Q, rules: &RuleSet) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    info!("Re-weighting {}", input.as_ref().display());
    let mut reader = ParticleReader::open(input)?;
    let header = reader.header().with_comment(&rules.describe());

    // the declared count is untrusted until every record has been read
    let mut transformed = Vec::new();
    for record in reader.by_ref() {
        if let Some(r) = rules.apply(&record?)? {
            transformed.push(r);
        }
    }
    debug!("{} of {} particles kept", transformed.len(), reader.len());

    write_records(output, &header, &transformed)
}

/// Translate particles in `input` and write the result to `output`
///
/// Records are streamed one at a time. Those outside the translation window
/// are written unchanged.
///
/// ```rust, no_run
/// # use mcpost_particles::{translate_file, Axis, Translation};
/// let translation = Translation::new([-120.0, 0.0, 0.0]).within(Axis::X, 100.0, 200.0);
/// translate_file("./source.plst", "./moved.plst", &translation).unwrap();
/// ```
pub fn translate_file<P, Q>(input: P, output: Q, translation: &Translation) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    info!("Translating {}", input.as_ref().display());
    let reader = ParticleReader::open(input)?;
    let header = reader.header().with_comment(&translation.describe());

    let mut writer = ParticleWriter::create(&output, &header)?;
    let mut moved = 0u64;
    for record in reader {
        let record = record?;
        if translation.applies_to(&record) {
            moved += 1;
        }
        writer.add(&translation.apply(&record))?;
    }

    let n = writer.finish()?;
    debug!("{moved} of {n} particles translated");
    info!("Written to {}", output.as_ref().display());
    Ok(n)
}

/// Accumulate weight totals over every particle in a file
///
/// ```rust, no_run
/// # use mcpost_particles::inspect_weights;
/// let summary = inspect_weights("./biased.plst").unwrap();
/// println!("{summary}");
/// ```
pub fn inspect_weights<P: AsRef<Path>>(input: P) -> Result<WeightAccumulator> {
    info!("Inspecting {}", input.as_ref().display());
    let reader = ParticleReader::open(input)?;

    let mut accumulator = WeightAccumulator::new();
    for record in reader {
        accumulator.add(&record?);
    }
    Ok(accumulator)
}

fn write_records<Q: AsRef<Path>>(
    output: Q,
    header: &Header,
    records: &[ParticleRecord],
) -> Result<u64> {
    let mut writer = ParticleWriter::create(&output, header)?;
    for record in records {
        writer.add(record)?;
    }
    let n = writer.finish()?;
    info!("Written to {}", output.as_ref().display());
    Ok(n)
}
