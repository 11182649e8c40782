//! Grade table and the `OctaneRating` value object.
//!
//! Every RON in the system (overall, per-domain, per-scenario) is graded
//! through [`GRADE_TABLE`]. Bands are ordered descending and lower bounds are
//! inclusive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest RON any rating can carry.
pub const RON_FLOOR: f64 = 70.0;
/// Highest RON any rating can carry.
pub const RON_CEILING: f64 = 100.0;

/// Fuel grade derived from a RON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Regular,
    RegularPlus,
    Premium,
    PremiumPlus,
    RacingFuel,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::RacingFuel => "racing_fuel",
            Grade::PremiumPlus => "premium_plus",
            Grade::Premium => "premium",
            Grade::RegularPlus => "regular_plus",
            Grade::Regular => "regular",
        }
    }

    /// The table band for this grade.
    pub fn band(&self) -> &'static GradeBand {
        GRADE_TABLE
            .iter()
            .find(|band| band.grade == *self)
            .unwrap_or(&GRADE_TABLE[GRADE_TABLE.len() - 1])
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color marker attached to a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTag {
    #[serde(rename = "🔥 RED")]
    Red,
    #[serde(rename = "🟠 ORANGE")]
    Orange,
    #[serde(rename = "🟡 YELLOW")]
    Yellow,
    #[serde(rename = "🟢 GREEN")]
    Green,
    #[serde(rename = "🔵 BLUE")]
    Blue,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Red => "🔥 RED",
            ColorTag::Orange => "🟠 ORANGE",
            ColorTag::Yellow => "🟡 YELLOW",
            ColorTag::Green => "🟢 GREEN",
            ColorTag::Blue => "🔵 BLUE",
        }
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the grade table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBand {
    /// Inclusive lower bound
    pub min_ron: f64,
    pub grade: Grade,
    pub description: &'static str,
    pub color: ColorTag,
}

/// Descending grade bands. The last band catches everything below 80.
pub const GRADE_TABLE: [GradeBand; 5] = [
    GradeBand {
        min_ron: 95.0,
        grade: Grade::RacingFuel,
        description: "Ultimate performance for extreme workloads",
        color: ColorTag::Red,
    },
    GradeBand {
        min_ron: 90.0,
        grade: Grade::PremiumPlus,
        description: "High performance for demanding applications",
        color: ColorTag::Orange,
    },
    GradeBand {
        min_ron: 85.0,
        grade: Grade::Premium,
        description: "Good performance for most applications",
        color: ColorTag::Yellow,
    },
    GradeBand {
        min_ron: 80.0,
        grade: Grade::RegularPlus,
        description: "Standard performance for regular use",
        color: ColorTag::Green,
    },
    GradeBand {
        min_ron: RON_FLOOR,
        grade: Grade::Regular,
        description: "Basic performance for light workloads",
        color: ColorTag::Blue,
    },
];

/// Look up the band a RON falls in.
pub fn band_for(ron: f64) -> &'static GradeBand {
    GRADE_TABLE
        .iter()
        .find(|band| ron >= band.min_ron)
        .unwrap_or(&GRADE_TABLE[GRADE_TABLE.len() - 1])
}

/// Force a RON onto the finite [70, 100] scale.
///
/// NaN and negative infinity land on the floor, positive infinity on the ceiling.
pub fn sanitize_ron(ron: f64) -> f64 {
    if ron.is_nan() {
        return RON_FLOOR;
    }
    ron.clamp(RON_FLOOR, RON_CEILING)
}

/// Research-octane-style rating: a RON plus the grade, description and color
/// derived from it.
///
/// Only [`OctaneRating::from_ron`] builds one, so the derived fields always
/// agree with the RON. Deserialization re-derives them and rejects documents
/// where they disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RatingDocument")]
pub struct OctaneRating {
    ron: f64,
    grade: Grade,
    description: String,
    color: ColorTag,
}

impl OctaneRating {
    pub fn from_ron(ron: f64) -> Self {
        let ron = sanitize_ron(ron);
        let band = band_for(ron);
        OctaneRating {
            ron,
            grade: band.grade,
            description: band.description.to_string(),
            color: band.color,
        }
    }

    pub fn ron(&self) -> f64 {
        self.ron
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn color(&self) -> ColorTag {
        self.color
    }
}

impl fmt::Display for OctaneRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RON {:.1} ({}, {})", self.ron, self.grade, self.color)
    }
}

/// Wire form of a rating, validated on the way in.
#[derive(Deserialize)]
struct RatingDocument {
    ron: f64,
    grade: Grade,
    description: String,
    color: ColorTag,
}

impl TryFrom<RatingDocument> for OctaneRating {
    type Error = String;

    fn try_from(doc: RatingDocument) -> Result<Self, Self::Error> {
        if !doc.ron.is_finite() || doc.ron < RON_FLOOR || doc.ron > RON_CEILING {
            return Err(format!("ron {} outside [70, 100]", doc.ron));
        }
        let rating = OctaneRating::from_ron(doc.ron);
        if rating.grade != doc.grade || rating.color != doc.color || rating.description != doc.description {
            return Err(format!(
                "grade '{}' / color '{}' do not match ron {}",
                doc.grade, doc.color, doc.ron
            ));
        }
        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(OctaneRating::from_ron(95.0).grade(), Grade::RacingFuel);
        assert_eq!(OctaneRating::from_ron(94.999).grade(), Grade::PremiumPlus);
        assert_eq!(OctaneRating::from_ron(90.0).grade(), Grade::PremiumPlus);
        assert_eq!(OctaneRating::from_ron(89.999).grade(), Grade::Premium);
        assert_eq!(OctaneRating::from_ron(85.0).grade(), Grade::Premium);
        assert_eq!(OctaneRating::from_ron(84.999).grade(), Grade::RegularPlus);
        assert_eq!(OctaneRating::from_ron(80.0).grade(), Grade::RegularPlus);
        assert_eq!(OctaneRating::from_ron(79.999).grade(), Grade::Regular);
        assert_eq!(OctaneRating::from_ron(70.0).grade(), Grade::Regular);
    }

    #[test]
    fn test_descriptions_and_colors() {
        let top = OctaneRating::from_ron(100.0);
        assert_eq!(top.description(), "Ultimate performance for extreme workloads");
        assert_eq!(top.color(), ColorTag::Red);

        let low = OctaneRating::from_ron(72.0);
        assert_eq!(low.description(), "Basic performance for light workloads");
        assert_eq!(low.color().as_str(), "🔵 BLUE");
    }

    #[test]
    fn test_non_finite_ron_is_sanitized() {
        assert_eq!(OctaneRating::from_ron(f64::NAN).ron(), RON_FLOOR);
        assert_eq!(OctaneRating::from_ron(f64::NEG_INFINITY).ron(), RON_FLOOR);
        assert_eq!(OctaneRating::from_ron(f64::INFINITY).ron(), RON_CEILING);
        assert_eq!(OctaneRating::from_ron(12.0).ron(), RON_FLOOR);
        assert_eq!(OctaneRating::from_ron(140.0).ron(), RON_CEILING);
    }

    #[test]
    fn test_grade_band_lookup() {
        for band in GRADE_TABLE.iter() {
            assert_eq!(band.grade.band(), band);
        }
    }

    #[test]
    fn test_json_shape() {
        let rating = OctaneRating::from_ron(91.25);
        let value = serde_json::to_value(&rating).expect("serialize");
        assert_eq!(value["ron"], 91.25);
        assert_eq!(value["grade"], "premium_plus");
        assert_eq!(value["description"], "High performance for demanding applications");
        assert_eq!(value["color"], "🟠 ORANGE");
    }

    #[test]
    fn test_json_round_trip() {
        for ron in [70.0, 79.99, 80.0, 84.123456789, 88.8, 90.0, 94.5, 95.0, 99.999] {
            let rating = OctaneRating::from_ron(ron);
            let json = serde_json::to_string(&rating).expect("serialize");
            let back: OctaneRating = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, rating);
            assert_eq!(back.ron().to_bits(), rating.ron().to_bits());
        }
    }

    #[test]
    fn test_inconsistent_document_rejected() {
        let json = r#"{"ron": 72.0, "grade": "racing_fuel",
            "description": "Ultimate performance for extreme workloads", "color": "🔥 RED"}"#;
        assert!(serde_json::from_str::<OctaneRating>(json).is_err());

        let out_of_range = r#"{"ron": 101.0, "grade": "racing_fuel",
            "description": "Ultimate performance for extreme workloads", "color": "🔥 RED"}"#;
        assert!(serde_json::from_str::<OctaneRating>(out_of_range).is_err());
    }
}
