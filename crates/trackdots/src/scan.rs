//! Page-level scan: search every region for every selected pattern, validate,
//! vote and decode.

use log::{debug, info, trace};
use rand::Rng;

use trackdots_core::{BitGrid, RegionMeta};
use trackdots_patterns::{AnonymizationMask, Aligner, MaskKind, PatternId, Tdm};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{AnonymizeError, ScanConfigError};
use crate::params::ScanParams;
use crate::region::PageRegion;
use crate::report::{PageScanReport, PatternReading};
use crate::vote::majority;

/// Anonymization overlay for an accepted reading.
#[derive(Clone, Debug)]
pub struct Anonymized {
    pub mask: AnonymizationMask,
    /// Accepted instance with the mask applied.
    pub masked: Tdm,
    /// `masked` expanded to the full grid in the source orientation.
    pub grid: BitGrid,
}

/// Scanner for a fixed configuration.
#[derive(Clone, Debug)]
pub struct PageScanner {
    params: ScanParams,
}

impl PageScanner {
    pub fn new(params: ScanParams) -> Result<Self, ScanConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, regions), fields(regions = regions.len()))
    )]
    pub fn scan(&self, regions: &[PageRegion]) -> PageScanReport {
        let mut grids: Vec<(RegionMeta, BitGrid)> = Vec::with_capacity(regions.len());
        let mut skipped = 0;
        for region in regions {
            match region.grid.to_bit_grid() {
                Ok(Some(bits)) => grids.push((region.meta, bits)),
                Ok(None) => skipped += 1,
                Err(e) => {
                    debug!("dropping malformed region at {:?}: {e}", region.meta.position());
                    skipped += 1;
                }
            }
        }

        let readings = self
            .params
            .patterns
            .iter()
            .map(|&id| self.scan_pattern(id, &grids))
            .collect();
        let report = PageScanReport {
            regions: regions.len(),
            skipped_regions: skipped,
            readings,
        };
        match report.best() {
            Some(best) => info!(
                "pattern {} accepted with {} valid instance(s)",
                best.pattern, best.valid
            ),
            None => info!("no tracking-dot pattern accepted"),
        }
        report
    }

    fn scan_pattern(&self, id: PatternId, grids: &[(RegionMeta, BitGrid)]) -> PatternReading {
        let aligner = Aligner::new(id);
        let shape = aligner.definition().grid_shape();
        let candidates: Vec<&(RegionMeta, BitGrid)> = grids
            .iter()
            .filter(|(_, g)| g.shape() == shape || g.shape() == [shape[1], shape[0]])
            .collect();

        let aligned = align_regions(&aligner, &candidates, self.params.parallel);
        let valid: Vec<Tdm> = aligned.iter().filter(|t| t.check()).cloned().collect();
        let outcome = majority(&valid, self.params.min_count_for(id));
        debug!(
            "pattern {id}: {} region(s), {} aligned, {} valid, accepted={}",
            candidates.len(),
            aligned.len(),
            valid.len(),
            outcome.is_accepted()
        );

        let (record, decode_error) = match outcome.winner().map(Tdm::decode) {
            Some(Ok(record)) => (Some(record), None),
            Some(Err(e)) => (None, Some(e.to_string())),
            None => (None, None),
        };
        PatternReading {
            pattern: id,
            regions_searched: candidates.len(),
            aligned: aligned.len(),
            valid: valid.len(),
            outcome,
            record,
            decode_error,
        }
    }

    /// Build the anonymization overlay for an accepted reading.
    pub fn anonymize<R: Rng + ?Sized>(
        reading: &PatternReading,
        kind: MaskKind,
        rng: &mut R,
    ) -> Result<Anonymized, AnonymizeError> {
        let winner = reading
            .winner()
            .ok_or(AnonymizeError::NoAcceptedReading {
                pattern: reading.pattern,
            })?;
        let mask = winner.mask(kind, rng)?;
        let masked = mask.apply(winner).map_err(|e| AnonymizeError::Mask(e.into()))?;
        let grid = masked.materialize();
        Ok(Anonymized { mask, masked, grid })
    }
}

fn align_region(aligner: &Aligner, meta: &RegionMeta, grid: &BitGrid) -> Vec<Tdm> {
    match aligner.align(grid, Some(*meta)) {
        Ok(found) => found,
        Err(e) => {
            trace!("pattern {}: region skipped: {e}", aligner.pattern());
            Vec::new()
        }
    }
}

#[cfg(feature = "rayon")]
fn align_regions(
    aligner: &Aligner,
    regions: &[&(RegionMeta, BitGrid)],
    parallel: bool,
) -> Vec<Tdm> {
    use rayon::prelude::*;

    if parallel {
        regions
            .par_iter()
            .flat_map_iter(|(meta, grid)| align_region(aligner, meta, grid))
            .collect()
    } else {
        regions
            .iter()
            .flat_map(|(meta, grid)| align_region(aligner, meta, grid))
            .collect()
    }
}

#[cfg(not(feature = "rayon"))]
fn align_regions(
    aligner: &Aligner,
    regions: &[&(RegionMeta, BitGrid)],
    _parallel: bool,
) -> Vec<Tdm> {
    regions
        .iter()
        .flat_map(|(meta, grid)| align_region(aligner, meta, grid))
        .collect()
}
