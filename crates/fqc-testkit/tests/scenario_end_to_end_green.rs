//! Full pass over a fake portal: one failing feature becomes a QC issue,
//! one passing feature produces nothing.

use anyhow::Result;
use fqc_report::FailureCollector;
use fqc_runtime::run_qc_pass;
use fqc_schemas::AttrValue;
use fqc_testkit::{feature, run_options, FakePortal, TEST_OWNING_TAG, TEST_QC_LAYER_TITLE};

fn portal_with_tobys() -> FakePortal {
    let portal = FakePortal::new();
    portal.add_layer("qc", TEST_QC_LAYER_TITLE);
    portal.add_layer("toby", "Toby Locations");
    portal.add_map("map-1", "Area_North_OLT7", &["qc", "toby"]);
    portal.set_features(
        "toby",
        vec![
            // Fails rule 1: blank toby type.
            feature(
                1,
                "{T-1}",
                &[("toby_type", AttrValue::Null), ("status", AttrValue::Int(1))],
            ),
            // Passes both rules.
            feature(
                2,
                "{T-2}",
                &[
                    ("toby_type", AttrValue::Text("Standard".into())),
                    ("status", AttrValue::Int(1)),
                ],
            ),
        ],
    );
    portal
}

#[test]
fn failing_feature_creates_a_qc_issue() -> Result<()> {
    let portal = portal_with_tobys();
    let mut collector = FailureCollector::new();

    let stats = run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;

    assert_eq!(stats.maps, 1);
    assert_eq!(stats.layers, 1);
    assert_eq!(stats.features, 2);
    assert_eq!(stats.creates, 1);
    assert_eq!(stats.noops, 1);
    assert_eq!(stats.failures, 0);
    assert!(collector.is_empty());

    let rows = portal.features("qc");
    assert_eq!(rows.len(), 1);
    let issue = &rows[0];
    assert_eq!(issue.attr("related_gid"), Some(&AttrValue::Text("{T-1}".into())));
    assert_eq!(issue.attr("QC_Status"), Some(&AttrValue::Int(5)));
    assert_eq!(issue.attr("error_type"), Some(&AttrValue::Int(11)));
    assert_eq!(issue.attr("qc_priority"), Some(&AttrValue::Int(5)));
    assert_eq!(issue.attr("Number_of_errors"), Some(&AttrValue::Int(1)));
    assert_eq!(
        issue.attr("error_description"),
        Some(&AttrValue::Text("1 - 'Toby Type' can not be blank".into()))
    );
    assert_eq!(
        issue.attr("QC_User"),
        Some(&AttrValue::Text(TEST_OWNING_TAG.into()))
    );
    assert_eq!(issue.attr("Creator"), Some(&AttrValue::Text("qc_bot".into())));
    assert_eq!(
        issue.attr("resolver_name"),
        Some(&AttrValue::Text("surveyor_a".into()))
    );
    Ok(())
}

#[test]
fn created_issue_anchors_on_the_feature_point() -> Result<()> {
    let portal = portal_with_tobys();
    let mut collector = FailureCollector::new();
    run_qc_pass(&portal, &run_options(&["map-1"]), &mut collector)?;

    let edits = portal.edits("qc");
    assert_eq!(edits.len(), 1);
    let geom = edits[0].adds[0].geometry.as_ref().expect("create has geometry");
    assert_eq!((geom.x, geom.y), (-0.1275, 51.5072));
    assert_eq!(geom.spatial_reference.wkid, 102_100);
    assert_eq!(geom.spatial_reference.latest_wkid, 3_857);
    Ok(())
}
