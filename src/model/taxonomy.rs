//! Census geography taxonomy.
//!
//! Every geography the service can return is a [`GeographyType`]. Each type
//! has three names:
//!
//! - a human label (`"Census Tract"`)
//! - the category key used in `geographies` payloads (`"Census Tracts"`)
//! - the slot name on [`GeographyCollection`] (`tracts`)
//!
//! The single table in this module is the source of all three, so the
//! category ↔ slot ↔ type mapping is one-to-one by construction.

use std::fmt;

use serde_json::Value;

use super::collection::GeographyCollection;
use super::geography::GeographicArea;
use super::ModelError;

macro_rules! geography_types {
    (@base) => { None };
    (@base $base:ident) => { Some(GeographyType::$base) };
    ($(
        $variant:ident {
            label: $label:literal,
            category: $category:literal,
            slot: $slot:ident
            $(, base: $base:ident)? $(,)?
        }
    ),+ $(,)?) => {
        /// A kind of Census geography.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum GeographyType {
            $( $variant, )+
        }

        impl GeographyType {
            /// All types, in payload order.
            pub const ALL: &'static [GeographyType] = &[ $( GeographyType::$variant, )+ ];

            /// Human-readable name of a single geography of this type.
            pub fn label(self) -> &'static str {
                match self { $( Self::$variant => $label, )+ }
            }

            /// Key of this type in a `geographies` payload.
            pub fn category(self) -> &'static str {
                match self { $( Self::$variant => $category, )+ }
            }

            /// Name of this type's slot on [`GeographyCollection`].
            pub fn slot(self) -> &'static str {
                match self { $( Self::$variant => stringify!($slot), )+ }
            }

            /// The type a vintage-specific type refines, if any.
            pub fn base(self) -> Option<GeographyType> {
                match self { $( Self::$variant => geography_types!(@base $($base)?), )+ }
            }
        }

        impl GeographyCollection {
            $(
                #[doc = concat!("All `", $category, "` in the collection.")]
                pub fn $slot(&self) -> &[GeographicArea] {
                    self.get(GeographyType::$variant)
                }
            )+
        }
    };
}

geography_types! {
    Puma2010 {
        label: "2010 Census Public Use Microdata Area",
        category: "2010 Census Public Use Microdata Areas",
        slot: pumas_2010,
        base: Puma,
    },
    Puma {
        label: "Public Use Microdata Area",
        category: "Public Use Microdata Areas",
        slot: pumas,
    },
    CensusRegion {
        label: "Region",
        category: "Census Regions",
        slot: regions,
    },
    CensusDivision {
        label: "Division",
        category: "Census Divisions",
        slot: divisions,
    },
    State {
        label: "State",
        category: "States",
        slot: states,
    },
    County {
        label: "County",
        category: "Counties",
        slot: counties,
    },
    CountySubdivision {
        label: "County Sub-division",
        category: "County Subdivisions",
        slot: county_subdivisions,
    },
    TribalSubdivision {
        label: "Tribal Sub-division",
        category: "Tribal Subdivisions",
        slot: tribal_subdivisions,
    },
    MetropolitanDivision {
        label: "Metropolitan Division",
        category: "Metropolitan Divisions",
        slot: metropolitan_divisions,
    },
    Zcta2010 {
        label: "2010 Census ZIP Code Tabulation Area",
        category: "2010 Census ZIP Code Tabulation Areas",
        slot: zcta_2010,
        base: Zcta5,
    },
    Zcta2020 {
        label: "2020 Census ZIP Code Tabulation Area",
        category: "2020 ZIP code Tabulation Areas",
        slot: zcta_2020,
        base: Zcta5,
    },
    Zcta5 {
        label: "Zip Code Tabulation Area",
        category: "ZIP Code Tabulation Areas",
        slot: zcta5,
    },
    UnifiedSchoolDistrict {
        label: "Unified School District",
        category: "Unified School Districts",
        slot: unified_school_districts,
    },
    SecondarySchoolDistrict {
        label: "Secondary School District",
        category: "Secondary School Districts",
        slot: secondary_school_districts,
    },
    ElementarySchoolDistrict {
        label: "Elementary School District",
        category: "Elementary School Districts",
        slot: elementary_school_districts,
    },
    VotingDistrict {
        label: "Voting District",
        category: "Voting Districts",
        slot: voting_districts,
    },
    StateLegislativeDistrictUpper {
        label: "State Legislative District - Upper",
        category: "State Legislative Districts - Upper",
        slot: state_legislative_districts_upper,
    },
    StateLegislativeDistrictLower {
        label: "State Legislative District - Lower",
        category: "State Legislative Districts - Lower",
        slot: state_legislative_districts_lower,
    },
    StateLegislativeDistrictUpper2018 {
        label: "2018 State Legislative District - Upper",
        category: "2018 State Legislative Districts - Upper",
        slot: state_legislative_districts_upper_2018,
        base: StateLegislativeDistrictUpper,
    },
    StateLegislativeDistrictLower2018 {
        label: "2018 State Legislative District - Lower",
        category: "2018 State Legislative Districts - Lower",
        slot: state_legislative_districts_lower_2018,
        base: StateLegislativeDistrictLower,
    },
    StateLegislativeDistrictUpper2016 {
        label: "2016 State Legislative District - Upper",
        category: "2016 State Legislative Districts - Upper",
        slot: state_legislative_districts_upper_2016,
        base: StateLegislativeDistrictUpper,
    },
    StateLegislativeDistrictLower2016 {
        label: "2016 State Legislative District - Lower",
        category: "2016 State Legislative Districts - Lower",
        slot: state_legislative_districts_lower_2016,
        base: StateLegislativeDistrictLower,
    },
    StateLegislativeDistrictUpper2012 {
        label: "2012 State Legislative District - Upper",
        category: "2012 State Legislative Districts - Upper",
        slot: state_legislative_districts_upper_2012,
        base: StateLegislativeDistrictUpper,
    },
    StateLegislativeDistrictLower2012 {
        label: "2012 State Legislative District - Lower",
        category: "2012 State Legislative Districts - Lower",
        slot: state_legislative_districts_lower_2012,
        base: StateLegislativeDistrictLower,
    },
    StateLegislativeDistrictUpper2010 {
        label: "2010 State Legislative District - Upper",
        category: "2010 State Legislative Districts - Upper",
        slot: state_legislative_districts_upper_2010,
        base: StateLegislativeDistrictUpper,
    },
    StateLegislativeDistrictLower2010 {
        label: "2010 State Legislative District - Lower",
        category: "2010 State Legislative Districts - Lower",
        slot: state_legislative_districts_lower_2010,
        base: StateLegislativeDistrictLower,
    },
    CongressionalDistrict {
        label: "Congressional District",
        category: "Congressional Districts",
        slot: congressional_districts,
    },
    CongressionalDistrict116 {
        label: "116th Congressional District",
        category: "116th Congressional Districts",
        slot: congressional_districts_116,
        base: CongressionalDistrict,
    },
    CongressionalDistrict115 {
        label: "115th Congressional District",
        category: "115th Congressional Districts",
        slot: congressional_districts_115,
        base: CongressionalDistrict,
    },
    CongressionalDistrict113 {
        label: "113th Congressional District",
        category: "113th Congressional Districts",
        slot: congressional_districts_113,
        base: CongressionalDistrict,
    },
    CongressionalDistrict111 {
        label: "111th Congressional District",
        category: "111th Congressional Districts",
        slot: congressional_districts_111,
        base: CongressionalDistrict,
    },
    CombinedStatisticalArea {
        label: "Combined Statistical Area",
        category: "Combined Statistical Areas",
        slot: csa,
    },
    MetropolitanStatisticalArea {
        label: "Metropolitan Statistical Area",
        category: "Metropolitan Statistical Areas",
        slot: msa,
    },
    MicropolitanStatisticalArea {
        label: "Micropolitan Statistical Area",
        category: "Micropolitan Statistical Areas",
        slot: micropolitan_statistical_areas,
    },
    CensusBlockGroup {
        label: "Census Block Group",
        category: "Census Block Groups",
        slot: block_groups,
    },
    TribalCensusBlockGroup {
        label: "Tribal Census Block Group",
        category: "Tribal Census Block Groups",
        slot: tribal_block_groups,
    },
    CensusBlock {
        label: "Census Block",
        category: "Census Blocks",
        slot: blocks,
    },
    CensusBlock2020 {
        label: "2020 Census Block",
        category: "2020 Census Blocks",
        slot: blocks_2020,
        base: CensusBlock,
    },
    TribalCensusTract {
        label: "Tribal Census Tract",
        category: "Tribal Census Tracts",
        slot: tribal_tracts,
    },
    CensusTract {
        label: "Census Tract",
        category: "Census Tracts",
        slot: tracts,
    },
    CensusDesignatedPlace {
        label: "Census Designated Place",
        category: "Census Designated Places",
        slot: census_designated_places,
    },
    Estate {
        label: "Estate",
        category: "Estates",
        slot: estates,
    },
    Subbarrio {
        label: "Subbarrio",
        category: "Subbarrios",
        slot: subbarrios,
    },
    ConsolidatedCity {
        label: "Consolidated City",
        category: "Consolidated Cities",
        slot: consolidated_cities,
    },
    IncorporatedPlace {
        label: "Incorporated Place",
        category: "Incorporated Places",
        slot: incorporated_places,
    },
    AlaskaNativeRegionalCorporation {
        label: "Alaska Native Regional Corporation",
        category: "Alaska Native Regional Corporations",
        slot: anrc,
    },
    FederalAmericanIndianReservation {
        label: "Federal American Indian Reservation",
        category: "Federal American Indian Reservations",
        slot: federal_american_indian_reservations,
    },
    OffReservationTrustLand {
        label: "Off-Reservation Trust Land",
        category: "Off-Reservation Trust Lands",
        slot: off_reservation_trust_lands,
    },
    StateAmericanIndianReservation {
        label: "State American Indian Reservation",
        category: "State American Indian Reservations",
        slot: state_american_indian_reservations,
    },
    HawaiianHomeLand {
        label: "Hawaiian Home Land",
        category: "Hawaiian Home Lands",
        slot: hawaiian_home_lands,
    },
    AlaskaNativeVillageStatisticalArea {
        label: "Alaska Native Village Statistical Area",
        category: "Alaska Native Village Statistical Areas",
        slot: anvsa,
    },
    OklahomaTribalStatisticalArea {
        label: "Oklahoma Tribal Statistical Area",
        category: "Oklahoma Tribal Statistical Areas",
        slot: otsa,
    },
    StateDesignatedTribalStatisticalArea {
        label: "State Designated Tribal Statistical Area",
        category: "State Designated Tribal Statistical Areas",
        slot: sdtsa,
    },
    TribalDesignatedStatisticalArea {
        label: "Tribal Designated Statistical Area",
        category: "Tribal Designated Statistical Areas",
        slot: tdsa,
    },
    AmericanIndianJointUseArea {
        label: "American Indian Joint-Use Area",
        category: "American Indian Joint-Use Areas",
        slot: american_indian_joint_use_areas,
    },
    CombinedNecta {
        label: "Combined New England City and Town Area",
        category: "Combined New England City and Town Areas",
        slot: combined_nectas,
    },
    NectaDivision {
        label: "New England City and Town Area Division",
        category: "New England City and Town Area Divisions",
        slot: necta_divisions,
    },
    MetropolitanNecta {
        label: "Metropolitan New England City and Town Area",
        category: "Metropolitan New England City and Town Areas",
        slot: metropolitan_nectas,
    },
    MicropolitanNecta {
        label: "Micropolitan New England City and Town Area",
        category: "Micropolitan New England City and Town Areas",
        slot: micropolitan_nectas,
    },
    UrbanGrowthArea {
        label: "Urban Growth Area",
        category: "Urban Growth Areas",
        slot: urban_growth_areas,
    },
    UrbanizedArea {
        label: "Urbanized Area",
        category: "Urbanized Areas",
        slot: urbanized_areas,
    },
    UrbanizedArea2010 {
        label: "2010 Census Urbanized Area",
        category: "2010 Census Urbanized Areas",
        slot: urbanized_areas_2010,
        base: UrbanizedArea,
    },
    UrbanCluster {
        label: "Urban Cluster",
        category: "Urban Clusters",
        slot: urban_clusters,
    },
    UrbanCluster2010 {
        label: "2010 Census Urban Cluster",
        category: "2010 Census Urban Clusters",
        slot: urban_clusters_2010,
        base: UrbanCluster,
    },
    TrafficAnalysisDistrict {
        label: "Traffic Analysis District",
        category: "Traffic Analysis Districts",
        slot: traffic_analysis_districts,
    },
    TrafficAnalysisZone {
        label: "Traffic Analysis Zone",
        category: "Traffic Analysis Zones",
        slot: traffic_analysis_zones,
    },
}

impl GeographyType {
    /// Type for a payload category key.
    pub fn from_category(category: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.category() == category)
    }

    /// Type for a collection slot name.
    pub fn from_slot(slot: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.slot() == slot)
    }

    /// Position of this type in [`GeographyType::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Whether this type is `other` or refines it.
    pub fn is_a(self, other: GeographyType) -> bool {
        self == other || self.base().is_some_and(|base| base.is_a(other))
    }

    /// Parse one geography of this type from its wire shape.
    pub fn parse(self, value: &Value) -> Result<GeographicArea, ModelError> {
        GeographicArea::from_dict(self, value)
    }
}

impl fmt::Display for GeographyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
