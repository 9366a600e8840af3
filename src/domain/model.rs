use crate::utils::error::{Result, SurveyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Planar position in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub northing: f64,
    pub easting: f64,
}

impl Coordinate {
    pub fn new(northing: f64, easting: f64) -> Self {
        Self { northing, easting }
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        (self.northing - other.northing).hypot(self.easting - other.easting)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.northing, self.easting)
    }
}

/// A corner, quarter corner or the center of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CornerTag {
    Northwest,
    Northeast,
    Southwest,
    Southeast,
    North,
    South,
    East,
    West,
    Center,
}

impl CornerTag {
    pub const ALL: [CornerTag; 9] = [
        CornerTag::Northwest,
        CornerTag::Northeast,
        CornerTag::Southwest,
        CornerTag::Southeast,
        CornerTag::North,
        CornerTag::South,
        CornerTag::East,
        CornerTag::West,
        CornerTag::Center,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CornerTag::Northwest => "NW",
            CornerTag::Northeast => "NE",
            CornerTag::Southwest => "SW",
            CornerTag::Southeast => "SE",
            CornerTag::North => "N",
            CornerTag::South => "S",
            CornerTag::East => "E",
            CornerTag::West => "W",
            CornerTag::Center => "C",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CornerTag::Northwest => "NW corner",
            CornerTag::Northeast => "NE corner",
            CornerTag::Southwest => "SW corner",
            CornerTag::Southeast => "SE corner",
            CornerTag::North => "North ¼ corner",
            CornerTag::South => "South ¼ corner",
            CornerTag::East => "East ¼ corner",
            CornerTag::West => "West ¼ corner",
            CornerTag::Center => "Center",
        }
    }

    pub fn is_center(&self) -> bool {
        matches!(self, CornerTag::Center)
    }

    /// Lenient lookup for free-form labels. Unknown text resolves to the
    /// section center.
    pub fn from_label(text: &str) -> CornerTag {
        text.parse().unwrap_or_else(|_| {
            tracing::warn!("Unrecognized corner tag '{}', falling back to center", text);
            CornerTag::Center
        })
    }
}

impl FromStr for CornerTag {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_uppercase()
            .replace(['¼', ' ', '_', '-'], "")
            .replace("1/4", "")
            .replace("QUARTER", "");

        let tag = match normalized.as_str() {
            "NW" | "NORTHWEST" => CornerTag::Northwest,
            "NE" | "NORTHEAST" => CornerTag::Northeast,
            "SW" | "SOUTHWEST" => CornerTag::Southwest,
            "SE" | "SOUTHEAST" => CornerTag::Southeast,
            "N" | "NORTH" => CornerTag::North,
            "S" | "SOUTH" => CornerTag::South,
            "E" | "EAST" => CornerTag::East,
            "W" | "WEST" => CornerTag::West,
            "C" | "CENTER" | "CENTRE" => CornerTag::Center,
            _ => {
                return Err(SurveyError::invalid_input(
                    "corner",
                    s,
                    "expected one of NW, NE, SW, SE, N, S, E, W, C",
                ))
            }
        };
        Ok(tag)
    }
}

impl TryFrom<String> for CornerTag {
    type Error = SurveyError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CornerTag> for String {
    fn from(tag: CornerTag) -> Self {
        tag.label().to_string()
    }
}

impl fmt::Display for CornerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionAddress {
    pub section: u8,
    pub corner: CornerTag,
}

impl SectionAddress {
    pub fn new(section: u8, corner: CornerTag) -> Self {
        Self { section, corner }
    }
}

impl fmt::Display for SectionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of Sec. {}", self.corner.description(), self.section)
    }
}

/// A known corner tagged with the role it plays in a restoration
/// (`A`..`D`, `SW`/`SE`/`NW`/`NE`, or any caller-chosen id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub role: String,
    pub coordinate: Coordinate,
}

impl ControlPoint {
    pub fn new(role: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            role: role.into(),
            coordinate,
        }
    }
}

/// Known corners keyed by upper-cased role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    points: BTreeMap<String, Coordinate>,
}

impl ControlPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: &str, coordinate: Coordinate) -> Self {
        self.insert(role, coordinate);
        self
    }

    pub fn insert(&mut self, role: &str, coordinate: Coordinate) {
        self.points
            .insert(role.trim().to_ascii_uppercase(), coordinate);
    }

    pub fn get(&self, role: &str) -> Option<Coordinate> {
        self.points.get(&role.trim().to_ascii_uppercase()).copied()
    }

    pub fn require(&self, role: &str, mode: RestorationMode) -> Result<Coordinate> {
        self.get(role).ok_or_else(|| SurveyError::MissingCornerError {
            role: role.to_string(),
            mode: mode.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ControlPoint> + '_ {
        self.points
            .iter()
            .map(|(role, coordinate)| ControlPoint::new(role.clone(), *coordinate))
    }
}

impl FromIterator<ControlPoint> for ControlPoints {
    fn from_iter<I: IntoIterator<Item = ControlPoint>>(iter: I) -> Self {
        let mut points = ControlPoints::new();
        for point in iter {
            points.insert(&point.role, point.coordinate);
        }
        points
    }
}

/// Record (platted) and measured distance for one line, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionInput {
    pub record: f64,
    pub measured: f64,
}

impl ProportionInput {
    pub fn new(record: f64, measured: f64) -> Self {
        Self { record, measured }
    }
}

/// Distance pairs for a restoration. Single proportion reads `ns`/`ew`;
/// double proportion reads the four directional pairs, each measured from the
/// lost corner toward the known corners on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProportionInputs {
    pub ns: Option<ProportionInput>,
    pub ew: Option<ProportionInput>,
    pub north: Option<ProportionInput>,
    pub south: Option<ProportionInput>,
    pub east: Option<ProportionInput>,
    pub west: Option<ProportionInput>,
}

impl ProportionInputs {
    pub fn single(ns: ProportionInput, ew: ProportionInput) -> Self {
        Self {
            ns: Some(ns),
            ew: Some(ew),
            ..Self::default()
        }
    }

    pub fn double(
        north: ProportionInput,
        south: ProportionInput,
        east: ProportionInput,
        west: ProportionInput,
    ) -> Self {
        Self {
            north: Some(north),
            south: Some(south),
            east: Some(east),
            west: Some(west),
            ..Self::default()
        }
    }

    pub fn require(&self, line: &str) -> Result<ProportionInput> {
        let input = match line {
            "ns" => self.ns,
            "ew" => self.ew,
            "north" => self.north,
            "south" => self.south,
            "east" => self.east,
            "west" => self.west,
            _ => None,
        };
        input.ok_or_else(|| {
            SurveyError::invalid_input(line, "<missing>", "record and measured distances required")
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestorationMode {
    #[serde(alias = "single-proportion", alias = "single_proportion")]
    Single,
    #[serde(alias = "double-proportion", alias = "double_proportion")]
    Double,
}

impl fmt::Display for RestorationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestorationMode::Single => f.write_str("single proportion"),
            RestorationMode::Double => f.write_str("double proportion"),
        }
    }
}

impl FromStr for RestorationMode {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "single" | "singleproportion" => Ok(RestorationMode::Single),
            "double" | "doubleproportion" => Ok(RestorationMode::Double),
            _ => Err(SurveyError::invalid_input(
                "mode",
                s,
                "expected 'single' or 'double'",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardinalDirection::North => "north",
            CardinalDirection::South => "south",
            CardinalDirection::East => "east",
            CardinalDirection::West => "west",
        };
        f.write_str(name)
    }
}

/// Non-fatal findings that accompany a successful restoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    Orientation {
        corner: String,
        expected: CardinalDirection,
        reference: String,
    },
    ImplausibleSpan {
        line: String,
        span: f64,
        tolerance: f64,
    },
    ExcessiveDistance {
        line: String,
        chains: f64,
        limit: f64,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::Orientation {
                corner,
                expected,
                reference,
            } => write!(f, "{} should be {} of {}", corner, expected, reference),
            ValidationWarning::ImplausibleSpan {
                line,
                span,
                tolerance,
            } => write!(
                f,
                "{} span ({:.2} ft) is not within ±{} ft of a valid section multiple",
                line, span, tolerance
            ),
            ValidationWarning::ExcessiveDistance {
                line,
                chains,
                limit,
            } => write!(
                f,
                "{} distance ({:.2} ch) exceeds {} chains; confirm this is a fractional section",
                line, chains, limit
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationResult {
    pub mode: RestorationMode,
    pub coordinate: Coordinate,
    pub ns_ratio: f64,
    pub ew_ratio: f64,
    pub trace: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

impl RestorationResult {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
