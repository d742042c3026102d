//! The hand-authored rule sets, one per feature type.
//!
//! Tags, severities, message text and evaluation order are a compatibility
//! surface: stored QC descriptions are diffed verbatim against the text
//! produced here, so any change re-flags every open issue of that type.
//! Tag gaps come from retired rules and are never renumbered.

use fqc_schemas::FeatureType;

use crate::rule::{req, Rule, RuleSet};

pub fn rule_set(feature_type: FeatureType) -> RuleSet {
    match feature_type {
        FeatureType::Poles => poles(),
        FeatureType::PowerLines => power_lines(),
        FeatureType::ElectricalCrossing => electrical_crossing(),
        FeatureType::ExclusionZone => exclusion_zone(),
        FeatureType::ExistingAerialSpan => existing_aerial_span(),
        FeatureType::ExistingBtDucts => existing_bt_ducts(),
        FeatureType::ProposedUgRoute => proposed_ug_route(),
        FeatureType::Chambers => chambers(),
        FeatureType::ProposedAerialSpan => proposed_aerial_span(),
        FeatureType::ArmouredCablesFed => armoured_cables_fed(),
        FeatureType::TobyLocation => toby_location(),
        FeatureType::NewDemandPoints => new_demand_points(),
        FeatureType::Mdu => mdu(),
        FeatureType::Cabinets => cabinets(),
        FeatureType::NewConstructions => new_constructions(),
        FeatureType::Loc => loc(),
        FeatureType::PlannerAwareness => planner_awareness(),
        FeatureType::DesignRisk => design_risk(),
        FeatureType::Sed => sed(),
        FeatureType::PlannedRoute => planned_route(),
        FeatureType::ProposedAlternativeUgRoute => proposed_alternative_ug_route(),
    }
}

// ---------------------------------------------------------------------------
// Shared rule shapes
// ---------------------------------------------------------------------------

/// "'{label}' can not be blank"
fn blank(tag: u32, severity: i32, field: &'static str, label: &str) -> Rule {
    Rule::new(
        tag,
        severity,
        format!("'{label}' can not be blank"),
        move |f, _| Ok(req(f, field)?.is_null()),
    )
}

/// "If '{cond_label}' is '{cond_value}' then '{label}' can not be blank"
fn blank_if_text(
    tag: u32,
    severity: i32,
    cond_field: &'static str,
    cond_label: &str,
    cond_value: &'static str,
    field: &'static str,
    label: &str,
) -> Rule {
    Rule::new(
        tag,
        severity,
        format!("If '{cond_label}' is '{cond_value}' then '{label}' can not be blank"),
        move |f, _| Ok(req(f, cond_field)?.eq_text(cond_value) && req(f, field)?.is_null()),
    )
}

/// "If '{cond_label}' is blank then '{label}' can not be blank"
fn blank_if_blank(
    tag: u32,
    severity: i32,
    cond_field: &'static str,
    cond_label: &str,
    field: &'static str,
    label: &str,
) -> Rule {
    Rule::new(
        tag,
        severity,
        format!("If '{cond_label}' is blank then '{label}' can not be blank"),
        move |f, _| Ok(req(f, cond_field)?.is_null() && req(f, field)?.is_null()),
    )
}

/// Photographic-evidence rule: fires when the feature has no attachment.
fn attachments_missing(tag: u32, severity: i32) -> Rule {
    Rule::with_attachments(tag, severity, "Attachments missing", |_, ctx| {
        Ok(!ctx.has_attachment)
    })
}

// ---------------------------------------------------------------------------
// Poles (error type 1)
// ---------------------------------------------------------------------------

/// "If 'Status' is 'Planned' (0) then '{label}' can not be blank"
fn pole_planned_blank(tag: u32, field: &'static str, label: &str) -> Rule {
    Rule::new(
        tag,
        5,
        format!("If 'Status' is 'Planned' (0) then '{label}' can not be blank"),
        move |f, _| Ok(req(f, "status")?.eq_code(0) && req(f, field)?.is_null()),
    )
}

/// "If 'Status' is not 'Planned' and 'Surveyed' is 'Yes' then '{label}' can not be blank"
fn pole_surveyed_blank(tag: u32, field: &'static str, label: &str) -> Rule {
    Rule::new(
        tag,
        5,
        format!("If 'Status' is not 'Planned' and 'Surveyed' is 'Yes' then '{label}' can not be blank"),
        move |f, _| {
            Ok(!req(f, "status")?.eq_code(0)
                && req(f, "surveyed")?.eq_code(1)
                && req(f, field)?.is_null())
        },
    )
}

fn poles() -> RuleSet {
    RuleSet::new(
        FeatureType::Poles,
        vec![
            pole_planned_blank(2, "surface", "Surface"),
            pole_planned_blank(3, "private_land", "Private Land"),
            pole_planned_blank(
                4,
                "np_7m_from_lv",
                "New proposed pole 7m away from LV electric pole/wire",
            ),
            pole_planned_blank(
                5,
                "np_7m_from_hv",
                "New proposed pole 7m away from HV electric pole/wire",
            ),
            Rule::new(
                6,
                5,
                "If 'Status' is 'Planned' (0) then 'Surveyed' must be 'Yes'",
                |f, _| Ok(req(f, "status")?.eq_code(0) && !req(f, "surveyed")?.eq_code(1)),
            ),
            pole_surveyed_blank(7, "plant_item", "Plant Item"),
            Rule::new(
                8,
                5,
                "If 'Status' is not 'Planned' and 'Surveyed' is 'Yes' then 'Owner' can not be 'CityFibre'",
                |f, _| {
                    Ok(!req(f, "status")?.eq_code(0)
                        && req(f, "surveyed")?.eq_code(1)
                        && req(f, "owner")?.eq_code(0))
                },
            ),
            pole_surveyed_blank(9, "pole_age", "Pole Age"),
            pole_surveyed_blank(10, "test_date", "Test Date"),
            pole_surveyed_blank(11, "bt_id", "BT ID"),
            pole_surveyed_blank(12, "pole_a1024", "Pole A1024"),
            pole_surveyed_blank(13, "hazards", "Hazards"),
            pole_surveyed_blank(14, "capping", "Capping"),
            pole_surveyed_blank(15, "exist_wire", "Existing Wire count"),
            pole_surveyed_blank(16, "ring_head", "Ring head present"),
            pole_surveyed_blank(17, "wires_ringhead", "Wires hosted on ringhead"),
            pole_surveyed_blank(18, "radial", "Radial distribution"),
            pole_surveyed_blank(19, "free_space", "Space to host an ASN"),
            pole_surveyed_blank(
                20,
                "free_space_dist",
                "Space to host a distribution joint at lower envelope",
            ),
            pole_surveyed_blank(21, "p2p_spans", "Existing span count"),
            pole_surveyed_blank(22, "los", "LOS"),
            pole_surveyed_blank(23, "existing_lowdrop_wires", "Existing low drop wires"),
            blank(25, 5, "comments", "Comments"),
            pole_surveyed_blank(26, "road_edge", "1m from edge of road to front of pole achieved"),
            pole_surveyed_blank(27, "mewp_access", "MEWP access"),
            pole_surveyed_blank(28, "pole_stay", "Pole stay"),
            pole_surveyed_blank(29, "surface", "Surface"),
            pole_surveyed_blank(30, "private_land", "Private Land"),
            pole_surveyed_blank(31, "access_issue", "Accessibility issue?"),
            pole_surveyed_blank(32, "foliage", "Foliage on pole?"),
            pole_surveyed_blank(35, "space_unb_joint", "Space for unbundling Joint?"),
            Rule::new(36, 5, "'Surveyed' must be 'Yes'", |f, _| {
                Ok(!req(f, "surveyed")?.eq_code(1))
            }),
            Rule::with_attachments(37, 5, "Attachments missing", |f, ctx| {
                Ok(!req(f, "status")?.eq_code(0)
                    && req(f, "surveyed")?.eq_code(1)
                    && !ctx.has_attachment)
            }),
        ],
    )
}

// ---------------------------------------------------------------------------
// Power Lines (error type 2)
// ---------------------------------------------------------------------------

fn power_lines() -> RuleSet {
    RuleSet::new(
        FeatureType::PowerLines,
        vec![
            blank_if_blank(1, 5, "voltage", "Voltage", "comments", "Comments"),
            attachments_missing(2, 3),
        ],
    )
}

// ---------------------------------------------------------------------------
// Electrical Crossing (error type 3)
// ---------------------------------------------------------------------------

fn electrical_crossing() -> RuleSet {
    RuleSet::new(
        FeatureType::ElectricalCrossing,
        vec![
            blank(1, 5, "status", "Status"),
            blank(2, 5, "voltage", "Voltage"),
            Rule::new(
                3,
                5,
                "If 'Status' is 'Measured by Survey' then 'Clearance' can not be blank",
                |f, _| Ok(req(f, "status")?.eq_code(2) && req(f, "clearance")?.is_null()),
            ),
            blank_if_text(
                4,
                5,
                "sur_status",
                "Survey Status",
                "Unable to measure",
                "comments",
                "Comments",
            ),
            Rule::new(
                5,
                5,
                "If 'Status' is 'Measured by Survey' then 'Redesign Required' can not be blank",
                |f, _| Ok(req(f, "redesign_req")?.is_null() && req(f, "status")?.eq_code(2)),
            ),
        ],
    )
}

// ---------------------------------------------------------------------------
// Exclusion Zone (error type 4)
// ---------------------------------------------------------------------------

fn exclusion_zone() -> RuleSet {
    RuleSet::new(
        FeatureType::ExclusionZone,
        vec![
            blank(1, 5, "status", "Status"),
            blank(2, 5, "excl_zone", "Exclusion Zone"),
            blank_if_text(3, 5, "excl_zone", "Exclusion Zone", "Unknown", "comments", "Comments"),
            blank(6, 5, "p_infrig", "Planned Infrastructure"),
            blank_if_text(
                7,
                5,
                "excl_zone",
                "Exclusion Zone",
                "BT Pole <11KV-33KV-3m",
                "ladder_mewp_360",
                "Ladder/MEWP 360",
            ),
            blank(8, 5, "sur_status", "Survey Status"),
            // The doubled space in the status literal is faithful to the
            // source domain value; a single-space spelling never matches.
            Rule::new(
                9,
                5,
                "If 'Status' is 'Measured by Survey' then 'Redesign Required' can not be blank",
                |f, _| {
                    Ok(req(f, "status")?.eq_text("Measured  by Survey")
                        && req(f, "rede_req")?.is_null())
                },
            ),
            attachments_missing(10, 3),
        ],
    )
}

// ---------------------------------------------------------------------------
// Existing Aerial Span (error type 5)
// ---------------------------------------------------------------------------

fn existing_aerial_span() -> RuleSet {
    RuleSet::new(
        FeatureType::ExistingAerialSpan,
        vec![
            blank(1, 5, "cable_count", "Number of cables"),
            blank(3, 5, "hv_crossing", "HV Crossing"),
            blank(4, 5, "lv_network", "LV Network with 1m below/above?"),
            blank(5, 5, "span_bellow_abowe", "Span Above/Below LV?"),
        ],
    )
}

// ---------------------------------------------------------------------------
// Existing BT Ducts (error type 6)
// ---------------------------------------------------------------------------

fn existing_bt_ducts() -> RuleSet {
    RuleSet::new(
        FeatureType::ExistingBtDucts,
        vec![
            blank(1, 5, "duct_cap", "Duct Capacity"),
            blank(2, 5, "num_ways", "Number of Ways"),
            blank(3, 5, "remspace_bt", "Remaining Space for BT"),
            blank(5, 5, "status", "Status"),
        ],
    )
}

// ---------------------------------------------------------------------------
// Proposed UG Route (error type 8)
// ---------------------------------------------------------------------------

fn proposed_ug_route() -> RuleSet {
    RuleSet::new(
        FeatureType::ProposedUgRoute,
        vec![
            blank(1, 2, "comments", "Comments"),
            blank(2, 5, "surface_type", "Surface Type"),
            attachments_missing(3, 5),
        ],
    )
}

// ---------------------------------------------------------------------------
// Chambers (error type 7)
// ---------------------------------------------------------------------------

/// "If 'Surveyed' is 'Yes' then '{label}' can not be blank"
fn chamber_surveyed_blank(tag: u32, severity: i32, field: &'static str, label: &str) -> Rule {
    Rule::new(
        tag,
        severity,
        format!("If 'Surveyed' is 'Yes' then '{label}' can not be blank"),
        move |f, _| Ok(req(f, "surveyed")?.eq_code(1) && req(f, field)?.is_null()),
    )
}

fn chambers() -> RuleSet {
    RuleSet::new(
        FeatureType::Chambers,
        vec![
            blank(1, 5, "surveyed", "Surveyed"),
            chamber_surveyed_blank(2, 3, "chamber_loc", "Chamber Location"),
            blank(3, 5, "status", "Status"),
            blank(4, 3, "owner", "Owner"),
            chamber_surveyed_blank(5, 5, "space_cf", "Space to host CF joint"),
            chamber_surveyed_blank(6, 5, "hole_type", "Chamber Type"),
            chamber_surveyed_blank(7, 5, "mobra_fit", "MOBRA fitted"),
            chamber_surveyed_blank(8, 5, "surface", "Surface"),
            blank_if_blank(9, 5, "data_collection", "Data Collection", "comments", "Comments"),
            attachments_missing(11, 5),
        ],
    )
}

// ---------------------------------------------------------------------------
// Proposed Aerial Span (error type 9)
// ---------------------------------------------------------------------------

fn proposed_aerial_span() -> RuleSet {
    RuleSet::new(
        FeatureType::ProposedAerialSpan,
        vec![
            blank(2, 5, "tree_len", "Tree Length"),
            attachments_missing(3, 5),
        ],
    )
}

// ---------------------------------------------------------------------------
// Armoured Cables Fed (error type 10)
// ---------------------------------------------------------------------------

fn armoured_cables_fed() -> RuleSet {
    RuleSet::new(
        FeatureType::ArmouredCablesFed,
        vec![attachments_missing(2, 5)],
    )
}

// ---------------------------------------------------------------------------
// Toby Locations (error type 11)
// ---------------------------------------------------------------------------

fn toby_location() -> RuleSet {
    RuleSet::new(
        FeatureType::TobyLocation,
        vec![
            blank(1, 5, "toby_type", "Toby Type"),
            blank(2, 5, "status", "Status"),
        ],
    )
}

// ---------------------------------------------------------------------------
// New Demand Points (error type 12)
// ---------------------------------------------------------------------------

fn new_demand_points() -> RuleSet {
    RuleSet::new(
        FeatureType::NewDemandPoints,
        vec![
            blank_if_blank(1, 4, "home_count", "Home Count", "comments", "Comments"),
            blank_if_blank(2, 4, "property_type", "Property Type", "comments", "Comments"),
            blank_if_blank(3, 4, "street_name", "Street Name", "comments", "Comments"),
            attachments_missing(4, 5),
        ],
    )
}

// ---------------------------------------------------------------------------
// MDU (error type 13)
// ---------------------------------------------------------------------------

fn mdu() -> RuleSet {
    RuleSet::new(
        FeatureType::Mdu,
        vec![
            blank(1, 5, "unit_type", "Unit Type"),
            blank(2, 5, "mdu_type", "MDU Type"),
            blank(3, 5, "unit_count", "Unit Count"),
            attachments_missing(5, 5),
        ],
    )
}

// ---------------------------------------------------------------------------
// Cabinets (error type 14)
// ---------------------------------------------------------------------------

fn cabinets() -> RuleSet {
    RuleSet::new(
        FeatureType::Cabinets,
        vec![
            blank(1, 5, "cab_type", "Cabinet Type"),
            blank(2, 5, "surface", "Surface"),
            blank_if_text(3, 5, "surface", "Surface", "Footway", "footway_width", "Footway Width"),
            blank_if_text(
                4,
                5,
                "surface",
                "Surface",
                "Grass verge",
                "grassverge_width",
                "Grass verge Width",
            ),
            // 17 before 16: source order, part of the description contract.
            blank(17, 3, "comments", "Comments"),
            attachments_missing(16, 5),
        ],
    )
}

// ---------------------------------------------------------------------------
// New Constructions (error type 15)
// ---------------------------------------------------------------------------

fn new_constructions() -> RuleSet {
    RuleSet::new(
        FeatureType::NewConstructions,
        vec![
            blank(1, 2, "comments", "Comments"),
            blank(2, 5, "cons_type", "Construction Type"),
            attachments_missing(3, 5),
        ],
    )
}

// ---------------------------------------------------------------------------
// LOC (error type 16)
// ---------------------------------------------------------------------------

fn loc() -> RuleSet {
    RuleSet::new(
        FeatureType::Loc,
        vec![
            blank(1, 5, "loc_reason", "LOC Reason"),
            blank_if_text(2, 4, "loc_reason", "LOC Reason", "Other", "comments", "Comments"),
        ],
    )
}

// ---------------------------------------------------------------------------
// Planner Awareness Data (error type 17)
// ---------------------------------------------------------------------------

fn planner_awareness() -> RuleSet {
    RuleSet::new(
        FeatureType::PlannerAwareness,
        vec![
            blank(8, 3, "notes", "Notes"),
            blank_if_text(9, 5, "notes", "Notes", "Other Notes", "comments", "Comments"),
        ],
    )
}

// ---------------------------------------------------------------------------
// Design Risk (error type 18)
// ---------------------------------------------------------------------------

fn design_risk() -> RuleSet {
    RuleSet::new(
        FeatureType::DesignRisk,
        vec![
            blank(1, 5, "hazard_type", "Hazard type"),
            blank_if_text(3, 5, "hazard_type", "Hazard type", "Other", "comments", "Comments"),
        ],
    )
}

// ---------------------------------------------------------------------------
// SED (error type 19): checks not yet authored; layer routed but inert.
// ---------------------------------------------------------------------------

fn sed() -> RuleSet {
    RuleSet::new(FeatureType::Sed, Vec::new())
}

// ---------------------------------------------------------------------------
// Planned Route (error type 20)
// ---------------------------------------------------------------------------

/// "'{label}' can not be blank if Owner is 'BT Openreach'" (owner code 10)
fn openreach_blank(tag: u32, field: &'static str, label: &str) -> Rule {
    Rule::new(
        tag,
        5,
        format!("'{label}' can not be blank if Owner is 'BT Openreach'"),
        move |f, _| Ok(req(f, field)?.is_null() && req(f, "owner")?.eq_code(10)),
    )
}

fn planned_route() -> RuleSet {
    RuleSet::new(
        FeatureType::PlannedRoute,
        vec![
            openreach_blank(1, "enough_cap", "Enough Capacity"),
            openreach_blank(2, "num_ways", "Number of Ways"),
            openreach_blank(3, "rem_space", "Remaining space in BT duct"),
        ],
    )
}

// ---------------------------------------------------------------------------
// Proposed Alternative UG Route (error type 21)
// ---------------------------------------------------------------------------

fn proposed_alternative_ug_route() -> RuleSet {
    RuleSet::new(
        FeatureType::ProposedAlternativeUgRoute,
        vec![
            blank(1, 2, "comments", "Comments"),
            blank(2, 5, "surface_type", "Surface Type"),
            attachments_missing(3, 5),
        ],
    )
}
