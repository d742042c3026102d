//! Re-running the pass over unchanged data must not write anything.

use anyhow::Result;
use fqc_report::FailureCollector;
use fqc_runtime::run_qc_pass;
use fqc_schemas::AttrValue;
use fqc_testkit::{feature, run_options, FakePortal, TEST_QC_LAYER_TITLE};

#[test]
fn unchanged_failure_is_a_noop_on_the_second_pass() -> Result<()> {
    let portal = FakePortal::new();
    portal.add_layer("qc", TEST_QC_LAYER_TITLE);
    portal.add_layer("toby", "Toby Locations");
    portal.add_map("map-1", "Area_North_OLT7", &["qc", "toby"]);
    portal.set_features(
        "toby",
        vec![feature(
            1,
            "{T-1}",
            &[("toby_type", AttrValue::Null), ("status", AttrValue::Int(1))],
        )],
    );

    let mut collector = FailureCollector::new();
    let first = run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;
    assert_eq!(first.creates, 1);
    assert_eq!(portal.edit_count("qc"), 1);

    // Fresh run, fresh run id: the stored issue carries the same failure
    // text, so nothing is written.
    let mut collector = FailureCollector::new();
    let second = run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;
    assert_eq!(second.creates, 0);
    assert_eq!(second.updates, 0);
    assert_eq!(second.resolves, 0);
    assert_eq!(second.noops, 1);
    assert_eq!(portal.edit_count("qc"), 1, "no new edits on second pass");
    Ok(())
}

#[test]
fn changed_failure_text_updates_the_stored_issue() -> Result<()> {
    let portal = FakePortal::new();
    portal.add_layer("qc", TEST_QC_LAYER_TITLE);
    portal.add_layer("toby", "Toby Locations");
    portal.add_map("map-1", "Area_North_OLT7", &["qc", "toby"]);
    portal.set_features(
        "toby",
        vec![feature(
            1,
            "{T-1}",
            &[("toby_type", AttrValue::Null), ("status", AttrValue::Int(1))],
        )],
    );

    let mut collector = FailureCollector::new();
    run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;

    // The surveyor fixed the toby type but blanked the status: a different
    // rule now fires, so the stored description must be refreshed.
    portal.set_features(
        "toby",
        vec![feature(
            1,
            "{T-1}",
            &[
                ("toby_type", AttrValue::Text("Standard".into())),
                ("status", AttrValue::Null),
            ],
        )],
    );
    let mut collector = FailureCollector::new();
    let second = run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;
    assert_eq!(second.updates, 1);
    assert_eq!(second.creates, 0);

    let issue = &portal.features("qc")[0];
    assert_eq!(
        issue.attr("updated_error"),
        Some(&AttrValue::Text("2 - 'Status' can not be blank".into()))
    );
    assert_eq!(issue.attr("QC_Status"), Some(&AttrValue::Int(5)));
    Ok(())
}
