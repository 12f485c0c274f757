use crate::core::models::collection::RangeCollection;
use crate::core::models::element::Element;
use crate::core::models::ion::Ion;
use crate::core::models::range::Range;
use crate::engine::config::RangingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

const PROGRESS_CHUNK: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct IonCount {
    pub ion: Ion,
    pub count: u64,
    /// Share of all ranged hits.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementCount {
    pub element: Element,
    /// Atoms contributed by every ranged hit (hit count times stoichiometry).
    pub count: u64,
    /// Atomic fraction among all decomposed atoms.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangingResult {
    pub total: usize,
    pub excluded: usize,
    pub ranged: usize,
    pub unranged: usize,
    /// Every ion of the collection, in ion order, including those with no hits.
    pub ions: Vec<IonCount>,
    /// Empty unless decomposition was requested.
    pub elements: Vec<ElementCount>,
}

impl RangingResult {
    pub fn ion_count(&self, ion: &Ion) -> Option<&IonCount> {
        self.ions.iter().find(|c| &c.ion == ion)
    }

    pub fn element_count(&self, symbol: &str) -> Option<&ElementCount> {
        self.elements.iter().find(|c| c.element.symbol() == symbol)
    }
}

#[instrument(skip_all, name = "ranging_workflow")]
pub fn run(
    masses: &[f64],
    collection: &RangeCollection,
    config: &RangingConfig,
    reporter: &ProgressReporter,
) -> Result<RangingResult, EngineError> {
    config.validate()?;
    reporter.report(Progress::PhaseStart { name: "Ranging" });
    info!(
        masses = masses.len(),
        ranges = collection.len(),
        "Assigning mass-to-charge values to ranges."
    );

    let sorted = collection.sorted_ranges();
    let mut hits: BTreeMap<&Ion, u64> = collection.iter().map(|r| (r.ion(), 0)).collect();
    let mut excluded = 0usize;
    let mut ranged = 0usize;

    reporter.report(Progress::TaskStart {
        total_steps: masses.len() as u64,
    });
    for (chunk_idx, chunk) in masses.chunks(PROGRESS_CHUNK).enumerate() {
        let ranged_before = ranged;
        for (offset, &mass) in chunk.iter().enumerate() {
            if !mass.is_finite() {
                return Err(EngineError::InvalidMass {
                    index: chunk_idx * PROGRESS_CHUNK + offset,
                    value: mass,
                });
            }
            if !config.in_window(mass) {
                excluded += 1;
                continue;
            }
            if let Some(range) = locate(&sorted, mass) {
                *hits.entry(range.ion()).or_insert(0) += 1;
                ranged += 1;
            }
        }
        reporter.report(Progress::TaskAdvance {
            steps: chunk.len() as u64,
            ranged: (ranged - ranged_before) as u64,
        });
    }
    reporter.report(Progress::TaskFinish);

    if let Some((min, max)) = config.mass_window.filter(|_| excluded > 0) {
        reporter.report(Progress::Message(format!(
            "{excluded} value(s) outside the mass window [{min}, {max}) were excluded"
        )));
    }

    let unranged = masses.len() - excluded - ranged;
    let ions: Vec<IonCount> = hits
        .iter()
        .map(|(&ion, &count)| IonCount {
            ion: ion.clone(),
            count,
            fraction: ratio(count, ranged as u64),
        })
        .collect();

    let elements = if config.decompose {
        decompose(&ions)
    } else {
        Vec::new()
    };

    info!(
        ranged,
        unranged, excluded, "Ranging complete for {} value(s).", masses.len()
    );
    reporter.report(Progress::PhaseFinish);

    Ok(RangingResult {
        total: masses.len(),
        excluded,
        ranged,
        unranged,
        ions,
        elements,
    })
}

/// Binary search over ranges sorted by lower bound; at most one can contain `mass`.
fn locate<'a>(sorted: &[&'a Range], mass: f64) -> Option<&'a Range> {
    let idx = sorted.partition_point(|r| r.lower() <= mass);
    let candidate = *sorted.get(idx.checked_sub(1)?)?;
    candidate.contains(mass).then_some(candidate)
}

fn decompose(ions: &[IonCount]) -> Vec<ElementCount> {
    let mut atoms: BTreeMap<&Element, u64> = BTreeMap::new();
    for ion_count in ions {
        for (element, &n) in ion_count.ion.composition() {
            *atoms.entry(element).or_insert(0) += ion_count.count * u64::from(n);
        }
    }
    let total_atoms: u64 = atoms.values().sum();
    debug!(
        "Decomposed ranged hits into {} atom(s) of {} element(s)",
        total_atoms,
        atoms.len()
    );

    atoms
        .into_iter()
        .map(|(element, count)| ElementCount {
            element: element.clone(),
            count,
            fraction: ratio(count, total_atoms),
        })
        .collect()
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
