use log::LevelFilter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use trackdots::patterns::{Field, Transformation};
use trackdots::{
    AnonymizeError, BitGrid, ExtractedCell, ExtractedGrid, LogConfig, MaskKind, MinCount,
    PageRegion, PageScanReport, PageScanner, PatternId, RegionMeta, ScanParams, Tdm, VoteOutcome,
};

fn family4(serial: &str, rotation: u8) -> Tdm {
    let mut tdm = Tdm::blank(PatternId::Four);
    tdm.set(Field::Raw, &"0".repeat(28)).unwrap();
    for (field, value) in [
        (Field::Year, "18"),
        (Field::Month, "06"),
        (Field::Day, "12"),
        (Field::Hour, "15"),
        (Field::Minutes, "55"),
        (Field::Serial, serial),
        (Field::Manufacturer, "Epson"),
    ] {
        tdm.set(field, value).unwrap();
    }
    let t = Transformation {
        rotation,
        ..Transformation::IDENTITY
    };
    Tdm::new(PatternId::Four, tdm.bits(), t).unwrap()
}

fn region_at(x: i64, bits: &BitGrid) -> PageRegion {
    PageRegion::from_bits(
        RegionMeta {
            crop_x: x,
            ..RegionMeta::default()
        },
        bits,
    )
}

fn page() -> Vec<PageRegion> {
    let a = family4("-111111-", 0);
    let b = family4("-222222-", 0);
    let mut regions: Vec<PageRegion> = (0..3)
        .map(|i| region_at(100 * i, &a.materialize()))
        .collect();
    regions.push(region_at(400, &b.materialize()));

    let mut ambiguous = ExtractedGrid::from_bits(&a.materialize());
    ambiguous.cells[5] = ExtractedCell::Ambiguous;
    regions.push(PageRegion::new(RegionMeta::default(), ambiguous));
    regions.push(region_at(500, &BitGrid::zeros(16, 32)));
    regions
}

const DEBUG_LOG: LogConfig = LogConfig {
    level: LevelFilter::Debug,
    format: trackdots::LogFormat::Compact,
};

fn scan(params: ScanParams) -> PageScanReport {
    trackdots::init_logging(&DEBUG_LOG).unwrap();
    PageScanner::new(params).unwrap().scan(&page())
}

#[test]
fn majority_reading_wins() {
    let report = scan(ScanParams::default());
    assert_eq!(trackdots::core::installed_config(), Some(DEBUG_LOG));
    assert_eq!(report.regions, 6);
    assert_eq!(report.skipped_regions, 2);

    let best = report.best().expect("accepted reading");
    assert_eq!(best.pattern, PatternId::Four);
    assert_eq!(best.regions_searched, 4);
    assert!(best.valid >= 4);
    assert_eq!(best.winner(), Some(&family4("-111111-", 0)));

    let record = best.record.as_ref().expect("decoded");
    assert_eq!(record.text("serial"), Some("-111111-"));
    assert_eq!(record.manufacturer(), "Epson");

    for id in [PatternId::One2, PatternId::Two, PatternId::Three] {
        let r = report.reading(id).unwrap();
        assert_eq!(r.regions_searched, 0);
        assert_eq!(r.outcome, VoteOutcome::NoValidInstance);
    }
}

#[test]
fn sequential_and_parallel_agree() {
    let parallel = scan(ScanParams::default());
    let sequential = scan(ScanParams {
        parallel: false,
        ..ScanParams::default()
    });
    assert_eq!(parallel, sequential);
}

#[test]
fn unanimity_requirement_rejects_mixed_page() {
    let report = scan(ScanParams {
        patterns: vec![PatternId::Four],
        min_count: Some(MinCount::All),
        parallel: true,
    });
    assert!(report.best().is_none());
    assert!(matches!(
        report.readings[0].outcome,
        VoteOutcome::Disagreement { .. }
    ));
}

#[test]
fn rotated_regions_are_found() {
    let a = family4("-333333-", 1);
    let regions = vec![region_at(0, &a.materialize())];
    assert_eq!(regions[0].grid.rows, 32);
    let report = PageScanner::new(ScanParams::default()).unwrap().scan(&regions);
    let best = report.best().expect("accepted reading");
    assert_eq!(best.record.as_ref().unwrap().text("serial"), Some("-333333-"));
}

#[test]
fn report_serializes_to_json() {
    let report = scan(ScanParams {
        patterns: vec![PatternId::Four],
        ..ScanParams::default()
    });
    let json = report.to_json_string().unwrap();
    assert!(json.contains("\"status\": \"accepted\""));
    let back: PageScanReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn anonymizing_accepted_reading() {
    let report = scan(ScanParams::default());
    let best = report.best().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let out = PageScanner::anonymize(best, MaskKind::Strategic, &mut rng).unwrap();
    assert_eq!(out.grid.shape(), [16, 32]);
    assert!(out.mask.bits().count_ones() > 0);
    assert_eq!(out.masked.transformation(), best.winner().unwrap().transformation());
    let winner = best.winner().unwrap();
    for [r, c] in winner.bits().ones() {
        assert!(out.masked.bits().is_set(r, c));
    }

    let rejected = report.reading(PatternId::Two).unwrap();
    assert!(matches!(
        PageScanner::anonymize(rejected, MaskKind::Full, &mut rng),
        Err(AnonymizeError::NoAcceptedReading {
            pattern: PatternId::Two
        })
    ));
}
