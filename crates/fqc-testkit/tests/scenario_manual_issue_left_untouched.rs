//! Issues the automation does not own are never updated or resolved.

use anyhow::Result;
use fqc_report::FailureCollector;
use fqc_runtime::run_qc_pass;
use fqc_schemas::AttrValue;
use fqc_testkit::{feature, run_options, FakePortal, TEST_OWNING_TAG, TEST_QC_LAYER_TITLE};

fn portal_with_seeded_issue(qc_user: &str, error_type: i64) -> FakePortal {
    let portal = FakePortal::new();
    portal.add_layer("qc", TEST_QC_LAYER_TITLE);
    portal.add_layer("toby", "Toby Locations");
    portal.add_map("map-1", "Area_North_OLT7", &["qc", "toby"]);
    portal.set_features(
        "qc",
        vec![feature(
            900,
            "{QC-900}",
            &[
                ("related_gid", AttrValue::Text("{T-1}".into())),
                ("error_type", AttrValue::Int(error_type)),
                ("QC_Status", AttrValue::Int(5)),
                ("qc_priority", AttrValue::Int(5)),
                (
                    "error_description",
                    AttrValue::Text("manually entered note".into()),
                ),
                ("QC_User", AttrValue::Text(qc_user.into())),
            ],
        )],
    );
    // The feature now passes every toby rule.
    portal.set_features(
        "toby",
        vec![feature(
            1,
            "{T-1}",
            &[
                ("toby_type", AttrValue::Text("Standard".into())),
                ("status", AttrValue::Int(1)),
            ],
        )],
    );
    portal
}

#[test]
fn manually_entered_issue_is_not_auto_resolved() -> Result<()> {
    let portal = portal_with_seeded_issue("Jane Planner", 11);
    let mut collector = FailureCollector::new();

    let stats = run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;
    assert_eq!(stats.resolves, 0);
    assert_eq!(stats.noops, 1);
    assert_eq!(portal.edit_count("qc"), 0, "foreign issue never written");

    let issue = &portal.features("qc")[0];
    assert_eq!(issue.attr("QC_Status"), Some(&AttrValue::Int(5)));
    Ok(())
}

#[test]
fn issue_under_a_different_error_type_is_not_touched() -> Result<()> {
    // Owned by the automation, but recorded under another type's lineage.
    let portal = portal_with_seeded_issue(TEST_OWNING_TAG, 3);
    let mut collector = FailureCollector::new();

    let stats = run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;
    assert_eq!(stats.resolves, 0);
    assert_eq!(stats.noops, 1);
    assert_eq!(portal.edit_count("qc"), 0);
    Ok(())
}
