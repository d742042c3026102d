use serde::{Deserialize, Serialize};

/// Fixed asset categories, each with its own rule set and error-type code.
///
/// The numeric codes and layer titles are load-bearing: historical QC data
/// is keyed by these codes and webmaps route by these titles. Codes must
/// never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureType {
    Poles,
    PowerLines,
    ElectricalCrossing,
    ExclusionZone,
    ExistingAerialSpan,
    ExistingBtDucts,
    ProposedUgRoute,
    Chambers,
    ProposedAerialSpan,
    ArmouredCablesFed,
    TobyLocation,
    NewDemandPoints,
    Mdu,
    Cabinets,
    NewConstructions,
    Loc,
    PlannerAwareness,
    DesignRisk,
    Sed,
    PlannedRoute,
    ProposedAlternativeUgRoute,
}

impl FeatureType {
    /// Every feature type, in webmap processing order.
    pub const ALL: [FeatureType; 21] = [
        FeatureType::Poles,
        FeatureType::PowerLines,
        FeatureType::ElectricalCrossing,
        FeatureType::ExclusionZone,
        FeatureType::ExistingAerialSpan,
        FeatureType::ExistingBtDucts,
        FeatureType::ProposedUgRoute,
        FeatureType::Chambers,
        FeatureType::ProposedAerialSpan,
        FeatureType::ArmouredCablesFed,
        FeatureType::TobyLocation,
        FeatureType::NewDemandPoints,
        FeatureType::Mdu,
        FeatureType::Cabinets,
        FeatureType::NewConstructions,
        FeatureType::Loc,
        FeatureType::PlannerAwareness,
        FeatureType::DesignRisk,
        FeatureType::Sed,
        FeatureType::PlannedRoute,
        FeatureType::ProposedAlternativeUgRoute,
    ];

    /// Stable error-type code written into every QC issue of this type.
    pub fn error_code(&self) -> i32 {
        match self {
            FeatureType::Poles => 1,
            FeatureType::PowerLines => 2,
            FeatureType::ElectricalCrossing => 3,
            FeatureType::ExclusionZone => 4,
            FeatureType::ExistingAerialSpan => 5,
            FeatureType::ExistingBtDucts => 6,
            FeatureType::Chambers => 7,
            FeatureType::ProposedUgRoute => 8,
            FeatureType::ProposedAerialSpan => 9,
            FeatureType::ArmouredCablesFed => 10,
            FeatureType::TobyLocation => 11,
            FeatureType::NewDemandPoints => 12,
            FeatureType::Mdu => 13,
            FeatureType::Cabinets => 14,
            FeatureType::NewConstructions => 15,
            FeatureType::Loc => 16,
            FeatureType::PlannerAwareness => 17,
            FeatureType::DesignRisk => 18,
            FeatureType::Sed => 19,
            FeatureType::PlannedRoute => 20,
            FeatureType::ProposedAlternativeUgRoute => 21,
        }
    }

    /// Snake-case identifier used in logs and diagnostics.
    pub fn key(&self) -> &'static str {
        match self {
            FeatureType::Poles => "poles",
            FeatureType::PowerLines => "power_lines",
            FeatureType::ElectricalCrossing => "electrical_crossing",
            FeatureType::ExclusionZone => "exclusion_zone",
            FeatureType::ExistingAerialSpan => "existing_aerial_span",
            FeatureType::ExistingBtDucts => "existing_bt_ducts",
            FeatureType::Chambers => "chambers",
            FeatureType::ProposedUgRoute => "proposed_ug_route",
            FeatureType::ProposedAerialSpan => "proposed_aerial_span",
            FeatureType::ArmouredCablesFed => "armoured_cables_fed",
            FeatureType::TobyLocation => "toby_location",
            FeatureType::NewDemandPoints => "new_demand_points",
            FeatureType::Mdu => "mdu",
            FeatureType::Cabinets => "cabinets",
            FeatureType::NewConstructions => "new_constructions",
            FeatureType::Loc => "loc",
            FeatureType::PlannerAwareness => "planner_awareness",
            FeatureType::DesignRisk => "design_risk",
            FeatureType::Sed => "sed",
            FeatureType::PlannedRoute => "planned_route",
            FeatureType::ProposedAlternativeUgRoute => "proposed_alternative_ug_route",
        }
    }

    /// Display title of the corresponding webmap layer.
    pub fn layer_title(&self) -> &'static str {
        match self {
            FeatureType::Poles => "Poles",
            FeatureType::PowerLines => "Power Lines",
            FeatureType::ElectricalCrossing => "Electrical Crossing",
            FeatureType::ExclusionZone => "Exclusion Zone",
            FeatureType::ExistingAerialSpan => "Existing Aerial Span",
            FeatureType::ExistingBtDucts => "Existing BT Ducts",
            FeatureType::ProposedUgRoute => "Proposed UG Route",
            FeatureType::Chambers => "Chambers",
            FeatureType::ProposedAerialSpan => "Proposed Aerial Span",
            FeatureType::ArmouredCablesFed => "Armoured Cables Fed",
            FeatureType::TobyLocation => "Toby Locations",
            FeatureType::NewDemandPoints => "New Demand Points",
            FeatureType::Mdu => "MDU",
            FeatureType::Cabinets => "Cabinets",
            FeatureType::NewConstructions => "New Constructions",
            FeatureType::Loc => "LOC",
            FeatureType::PlannerAwareness => "Planner Awareness Data",
            FeatureType::DesignRisk => "Design Risk",
            FeatureType::Sed => "SED",
            FeatureType::PlannedRoute => "Planned Route",
            FeatureType::ProposedAlternativeUgRoute => "Proposed Alternative UG Route",
        }
    }

    /// Reverse routing: webmap layer title -> feature type.
    pub fn from_layer_title(title: &str) -> Option<FeatureType> {
        FeatureType::ALL.iter().copied().find(|t| t.layer_title() == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_the_historical_table() {
        // Spot checks against the compatibility table; full coverage via ALL.
        assert_eq!(FeatureType::Poles.error_code(), 1);
        assert_eq!(FeatureType::Chambers.error_code(), 7);
        assert_eq!(FeatureType::ProposedAlternativeUgRoute.error_code(), 21);

        let mut seen: Vec<i32> = FeatureType::ALL.iter().map(|t| t.error_code()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=21).collect::<Vec<i32>>());
    }

    #[test]
    fn layer_title_round_trips() {
        for t in FeatureType::ALL {
            assert_eq!(FeatureType::from_layer_title(t.layer_title()), Some(t));
        }
        assert_eq!(FeatureType::from_layer_title("Unknown Layer"), None);
    }
}
