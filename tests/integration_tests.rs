use incident_report::analyzers::types::{Strength, Trend};
use incident_report::config::PipelineConfig;
use incident_report::dataset::UNKNOWN_LINE;
use incident_report::loader::SheetOutcome;
use incident_report::pipeline::{PipelineOutcome, run_with_workbook};
use incident_report::workbook::{Cell, MemoryWorkbook};

fn row(cells: &[Cell]) -> Vec<Cell> {
    cells.to_vec()
}

/// Five year sheets with drifting headers, one of them unusable, plus a gender sheet.
fn workbook() -> MemoryWorkbook {
    MemoryWorkbook::new()
        .with_sheet(
            "2020",
            vec![
                row(&["Línea".into(), "Estación".into(), "Alcaldía".into(), "Robos".into()]),
                row(&["LÍNEA 1".into(), "Pantitlán".into(), "Iztacalco".into(), Cell::Number(40.0)]),
                row(&["Línea 2".into(), "Zócalo".into(), "Cuauhtémoc".into(), Cell::Number(10.0)]),
            ],
        )
        .with_sheet(
            "2021",
            vec![
                row(&[
                    " ESTACION ".into(),
                    "ALCALDIA".into(),
                    "LINEA".into(),
                    "Total de reportes".into(),
                ]),
                row(&["Pantitlán".into(), "Iztacalco".into(), " L1 ".into(), "abc".into()]),
                row(&["Tacubaya".into(), "Miguel Hidalgo".into(), "Linea 7".into(), Cell::Number(60.0)]),
                row(&["Sin alcaldía".into(), Cell::Empty, "L7".into(), Cell::Number(99.0)]),
            ],
        )
        .with_sheet(
            "2022",
            vec![
                row(&["Nombre".into(), "Cantidad".into()]),
                row(&["Pantitlán".into(), Cell::Number(500.0)]),
            ],
        )
        .with_sheet(
            "2023",
            vec![
                row(&["Estación del metro".into(), "Alcaldía".into(), "Número de robos".into()]),
                row(&["Zócalo".into(), "Cuauhtémoc".into(), Cell::Number(90.0)]),
            ],
        )
        .with_sheet(
            "2024",
            vec![
                row(&["Estacion".into(), "Alcaldia".into(), "Linea".into(), "Robos".into()]),
                row(&["Pantitlán".into(), "Iztacalco".into(), "1".into(), Cell::Number(100.0)]),
            ],
        )
        .with_sheet(
            "Hoja1",
            vec![
                row(&["Genero".into(), "Frecuencia".into()]),
                row(&["Mujer".into(), Cell::Number(120.0)]),
                row(&["Hombre".into(), Cell::Number(80.0)]),
            ],
        )
}

#[test]
fn test_full_pipeline() {
    let outcome = run_with_workbook(&mut workbook(), &PipelineConfig::default());
    let PipelineOutcome::Report(bundle) = outcome else {
        panic!("expected a report");
    };
    let agg = &bundle.aggregates;

    // 2022 has neither a count nor a station column
    assert_eq!(bundle.sheets.len(), 5);
    assert!(matches!(bundle.sheets[2].outcome, SheetOutcome::Skipped { .. }));
    assert_eq!(
        bundle.sheets[1].outcome,
        SheetOutcome::Loaded {
            rows_read: 3,
            rows_kept: 2,
            rows_dropped: 1,
            coerced_counts: 1,
        }
    );

    // Conservation: 50 + 60 + 90 + 100
    assert_eq!(agg.summary.grand_total, 300.0);
    let yearly_sum: f64 = agg.yearly.iter().map(|y| y.total).sum();
    assert_eq!(yearly_sum, agg.summary.grand_total);

    let years: Vec<i32> = agg.yearly.iter().map(|y| y.year).collect();
    assert_eq!(years, vec![2020, 2021, 2023, 2024]);
    assert_eq!(agg.summary.first_year, 2020);
    assert_eq!(agg.summary.last_year, 2024);

    // Pantitlán 40 + 0 + 100, Zócalo 10 + 90, Tacubaya 60
    let stations: Vec<(&str, f64)> = agg
        .top_stations
        .iter()
        .map(|s| (s.key.as_str(), s.total))
        .collect();
    assert_eq!(
        stations,
        vec![("Pantitlán", 140.0), ("Zócalo", 100.0), ("Tacubaya", 60.0)]
    );
    let share_sum: f64 = agg.top_stations.iter().map(|s| s.share).sum();
    assert!((share_sum - 1.0).abs() < 1e-9);

    // The 2023 sheet has no line column, so its row is unknown and left out
    assert!(agg.lines.iter().all(|l| l.key != UNKNOWN_LINE));
    let lines: Vec<(&str, f64)> = agg.lines.iter().map(|l| (l.key.as_str(), l.total)).collect();
    assert_eq!(lines, vec![("L1", 140.0), ("L7", 60.0), ("L2", 10.0)]);

    // 50, 60, 90, 100 rises steadily
    assert_eq!(agg.correlation.trend, Trend::Increasing);
    assert_eq!(agg.correlation.strength, Strength::Strong);

    let gender = bundle.gender.as_ref().expect("gender sheet present");
    assert_eq!(gender.total, 200.0);
    assert_eq!(gender.get("Mujer"), Some(120.0));
}

#[test]
fn test_all_sheets_malformed_is_no_data() {
    let mut workbook = MemoryWorkbook::new()
        .with_sheet("2020", vec![row(&["foo".into(), "bar".into()])])
        .with_sheet("2021", vec![]);

    match run_with_workbook(&mut workbook, &PipelineConfig::default()) {
        PipelineOutcome::NoData { sheets } => {
            assert_eq!(sheets.len(), 5);
            assert!(sheets.iter().all(|s| !s.is_loaded()));
        }
        PipelineOutcome::Report(_) => panic!("expected no data"),
    }
}

#[test]
fn test_single_year_is_insufficient_for_trend() {
    let mut workbook = MemoryWorkbook::new().with_sheet(
        "2024",
        vec![
            row(&["estacion".into(), "alcaldia".into(), "robos".into()]),
            row(&["Hidalgo".into(), "Cuauhtémoc".into(), Cell::Number(5.0)]),
        ],
    );

    let PipelineOutcome::Report(bundle) =
        run_with_workbook(&mut workbook, &PipelineConfig::default())
    else {
        panic!("expected a report");
    };

    assert_eq!(bundle.aggregates.correlation.trend, Trend::InsufficientData);
    assert_eq!(bundle.aggregates.correlation.coefficient, 0.0);
    assert!(bundle.gender.is_none());
}
