use crate::prelude::{HourlyResult, Ionex, ResultTable};
use std::path::PathBuf;

/// Regional IONEX covering western Europe, 2011-10-20
pub const REGIONAL_IONEX: &str = "IONEX/V1/REGG2930.11I";

/// Reference predictions for 3C196, seen from Exloo on 2011-10-20
pub const REGIONAL_3C196: &str = "CSV/IonRM_REGG2930_3C196.csv";

/// Returns full path to this test resource
pub fn test_resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_resources")
        .join(name)
}

/// Parses the regional IONEX test resource
pub fn regional_ionex() -> Ionex {
    let path = test_resource(REGIONAL_IONEX);
    Ionex::from_file(&path)
        .unwrap_or_else(|e| panic!("failed to parse \"{}\": {}", path.display(), e))
}

/// Tests two values are within relative tolerance
pub fn assert_close(lhs: f64, rhs: f64, rel_tol: f64, context: &str) {
    let err = (lhs - rhs).abs();
    let scale = lhs.abs().max(rhs.abs());
    assert!(
        err <= rel_tol * scale,
        "{}: {} != {} (rel err {:e})",
        context,
        lhs,
        rhs,
        if scale > 0.0 { err / scale } else { err },
    );
}

fn assert_row_close(dut: &HourlyResult, model: &HourlyResult, rel_tol: f64) {
    assert_eq!(dut.hour, model.hour);
    let ctx = |field: &str| format!("{:02}h {}", dut.hour, field);
    assert_close(dut.tec_path, model.tec_path, rel_tol, &ctx("tec_path"));
    assert_close(dut.tot_field, model.tot_field, rel_tol, &ctx("tot_field"));
    assert_close(dut.ifr, model.ifr, rel_tol, &ctx("ifr"));
    assert_close(dut.rms_ifr, model.rms_ifr, rel_tol, &ctx("rms_ifr"));
}

/// Compares [ResultTable] to reference CSV table, row by row
pub fn compare_with_reference(dut: &ResultTable, reference: &str, rel_tol: f64) {
    let model = ResultTable::from_csv_path(test_resource(reference))
        .unwrap_or_else(|e| panic!("failed to parse \"{}\": {}", reference, e));

    assert_eq!(dut.hours(), model.hours(), "reported hours differ");

    for (dut, model) in dut.iter().zip(model.iter()) {
        assert_row_close(dut, model, rel_tol);
    }
}
