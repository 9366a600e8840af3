use crate::core::addressing::{SectionGrid, GRID_SIZE, NOMINAL_SECTION_FEET, SECTION_COUNT};
use crate::core::diagnostics::DiagnosticsConfig;
use crate::core::engine::RestorationSession;
use crate::domain::model::{
    ControlPoint, ControlPoints, Coordinate, CornerTag, ProportionInput, ProportionInputs,
    RestorationMode, SectionAddress,
};
use crate::utils::error::{Result, SurveyError};
use crate::utils::units::parse_distance;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// A restoration described in a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub session: SessionInfo,
    pub grid: Option<GridConfig>,
    #[serde(default)]
    pub control_points: Vec<ControlPointConfig>,
    #[serde(default)]
    pub inputs: InputsConfig,
    pub diagnostics: Option<DiagnosticsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub description: Option<String>,
    pub mode: RestorationMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub origin: Coordinate,
    /// Default side length for rows and columns not listed explicitly.
    pub section_size: Option<DistanceValue>,
    pub row_spacing: Option<Vec<DistanceValue>>,
    pub col_spacing: Option<Vec<DistanceValue>>,
}

/// A known corner, either at a literal position or at a section address
/// resolved through the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlPointConfig {
    pub role: String,
    pub section: Option<u8>,
    pub corner: Option<String>,
    pub northing: Option<f64>,
    pub easting: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistancePair {
    pub record: DistanceValue,
    pub measured: DistanceValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputsConfig {
    pub ns: Option<DistancePair>,
    pub ew: Option<DistancePair>,
    pub north: Option<DistancePair>,
    pub south: Option<DistancePair>,
    pub east: Option<DistancePair>,
    pub west: Option<DistancePair>,
}

/// Feet as a number, or text such as `"40 ch"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistanceValue {
    Feet(f64),
    Text(String),
}

impl DistanceValue {
    pub fn to_feet(&self, field_name: &str) -> Result<f64> {
        match self {
            DistanceValue::Feet(feet) => {
                crate::utils::validation::validate_finite(field_name, *feet)?;
                Ok(*feet)
            }
            DistanceValue::Text(text) => parse_distance(field_name, text),
        }
    }
}

impl DistancePair {
    fn to_input(&self, line: &str) -> Result<ProportionInput> {
        Ok(ProportionInput::new(
            self.record.to_feet(&format!("inputs.{}.record", line))?,
            self.measured.to_feet(&format!("inputs.{}.measured", line))?,
        ))
    }
}

impl GridConfig {
    fn spacing(
        &self,
        name: &str,
        values: &Option<Vec<DistanceValue>>,
        default: f64,
    ) -> Result<[f64; GRID_SIZE]> {
        let mut spacing = [default; GRID_SIZE];
        if let Some(values) = values {
            if values.len() != GRID_SIZE {
                return Err(SurveyError::ConfigError {
                    message: format!(
                        "grid.{} must list exactly {} values, found {}",
                        name,
                        GRID_SIZE,
                        values.len()
                    ),
                });
            }
            for (i, value) in values.iter().enumerate() {
                spacing[i] = value.to_feet(&format!("grid.{}[{}]", name, i))?;
            }
        }
        Ok(spacing)
    }

    pub fn to_grid(&self) -> Result<SectionGrid> {
        let default = match &self.section_size {
            Some(size) => size.to_feet("grid.section_size")?,
            None => NOMINAL_SECTION_FEET,
        };
        SectionGrid::new(
            self.origin,
            self.spacing("row_spacing", &self.row_spacing, default)?,
            self.spacing("col_spacing", &self.col_spacing, default)?,
        )
    }
}

impl ControlPointConfig {
    /// The section address, when both `section` and `corner` are given.
    pub fn address(&self) -> Option<SectionAddress> {
        match (self.section, self.corner.as_deref()) {
            (Some(section), Some(corner)) => {
                Some(SectionAddress::new(section, CornerTag::from_label(corner)))
            }
            _ => None,
        }
    }

    fn check_fields(&self) -> Result<()> {
        let problem = match (self.section, &self.corner) {
            (Some(_), None) => Some("has a section but no corner"),
            (None, Some(_)) => Some("has a corner but no section"),
            _ => None,
        };
        match problem {
            Some(problem) => Err(SurveyError::ConfigError {
                message: format!("control point '{}' {}", self.role, problem),
            }),
            None => Ok(()),
        }
    }

    pub fn resolve(&self, grid: &SectionGrid) -> Result<ControlPoint> {
        let coordinate = match (self.address(), self.northing, self.easting) {
            (Some(address), None, None) => grid.resolve(&address)?,
            (None, Some(northing), Some(easting)) => Coordinate::new(northing, easting),
            _ => {
                return Err(SurveyError::ConfigError {
                    message: format!(
                        "control point '{}' needs either section/corner or northing/easting",
                        self.role
                    ),
                })
            }
        };
        Ok(ControlPoint::new(self.role.clone(), coordinate))
    }
}

impl SessionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SurveyError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SurveyError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn grid(&self) -> Result<SectionGrid> {
        match &self.grid {
            Some(grid) => grid.to_grid(),
            None => Ok(SectionGrid::default()),
        }
    }

    pub fn diagnostics(&self) -> DiagnosticsConfig {
        self.diagnostics.unwrap_or_default()
    }

    pub fn control_points(&self) -> Result<ControlPoints> {
        let grid = self.grid()?;
        self.control_points
            .iter()
            .map(|point| point.resolve(&grid))
            .collect::<Result<Vec<_>>>()
            .map(ControlPoints::from_iter)
    }

    pub fn inputs(&self) -> Result<ProportionInputs> {
        let convert = |pair: &Option<DistancePair>, line: &str| -> Result<Option<ProportionInput>> {
            pair.as_ref().map(|p| p.to_input(line)).transpose()
        };
        Ok(ProportionInputs {
            ns: convert(&self.inputs.ns, "ns")?,
            ew: convert(&self.inputs.ew, "ew")?,
            north: convert(&self.inputs.north, "north")?,
            south: convert(&self.inputs.south, "south")?,
            east: convert(&self.inputs.east, "east")?,
            west: convert(&self.inputs.west, "west")?,
        })
    }

    pub fn to_session(&self) -> Result<RestorationSession> {
        let session = RestorationSession::new(
            self.session.mode,
            self.control_points()?,
            self.inputs()?,
        )
        .with_diagnostics(self.diagnostics());
        session.validate()?;
        Ok(session)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("session.name", &self.session.name)?;

        let mut roles = BTreeSet::new();
        for point in &self.control_points {
            validate_non_empty_string("control_points.role", &point.role)?;
            if !roles.insert(point.role.trim().to_ascii_uppercase()) {
                return Err(SurveyError::ConfigError {
                    message: format!("control point '{}' is listed more than once", point.role),
                });
            }
            if let Some(section) = point.section {
                validate_range("control_points.section", section, 1, SECTION_COUNT)?;
            }
            point.check_fields()?;
        }

        self.grid()?;
        self.diagnostics().validate()?;
        Ok(())
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOUBLE_SESSION: &str = r#"
[session]
name = "sec-15-center"
mode = "double"

[grid]
origin = { northing = 31680.0, easting = 0.0 }

[[control_points]]
role = "SW"
section = 15
corner = "SW"

[[control_points]]
role = "SE"
section = 15
corner = "SE"

[[control_points]]
role = "NW"
section = 15
corner = "NW"

[[control_points]]
role = "NE"
northing = 21120
easting = 21120

[inputs]
north = { record = "40 ch", measured = 2640 }
south = { record = "40 ch", measured = 2640 }
east = { record = 2640, measured = "40 chains" }
west = { record = 2640, measured = 2640.0 }
"#;

    #[test]
    fn test_parse_double_session() {
        let config = SessionConfig::from_toml_str(DOUBLE_SESSION).unwrap();
        assert_eq!(config.session.mode, RestorationMode::Double);
        assert!(config.validate().is_ok());

        let points = config.control_points().unwrap();
        // section 15 is row 2, column 3
        assert_eq!(points.get("SW"), Some(Coordinate::new(15840.0, 15840.0)));
        assert_eq!(points.get("NE"), Some(Coordinate::new(21120.0, 21120.0)));

        let result = config.to_session().unwrap().restore().unwrap();
        assert_eq!(result.coordinate, Coordinate::new(18480.0, 18480.0));
    }

    #[test]
    fn test_irregular_grid_spacing() {
        let grid = GridConfig {
            origin: Coordinate::new(0.0, 0.0),
            section_size: Some(DistanceValue::Text("80 ch".to_string())),
            row_spacing: None,
            col_spacing: Some(vec![
                DistanceValue::Feet(5280.0),
                DistanceValue::Feet(5280.0),
                DistanceValue::Feet(5280.0),
                DistanceValue::Feet(5280.0),
                DistanceValue::Feet(5280.0),
                DistanceValue::Text("79.5 ch".to_string()),
            ]),
        };
        let grid = grid.to_grid().unwrap();
        assert_eq!(grid.col_spacing()[5], 79.5 * 66.0);
        assert_eq!(grid.row_spacing()[0], 5280.0);
    }

    #[test]
    fn test_wrong_spacing_count() {
        let grid = GridConfig {
            origin: Coordinate::new(0.0, 0.0),
            section_size: None,
            row_spacing: Some(vec![DistanceValue::Feet(5280.0)]),
            col_spacing: None,
        };
        assert!(matches!(grid.to_grid(), Err(SurveyError::ConfigError { .. })));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLSS_TEST_SESSION_NAME", "from-env");

        let toml_content = r#"
[session]
name = "${PLSS_TEST_SESSION_NAME}"
mode = "single"

[[control_points]]
role = "A"
northing = 5280
easting = 0

[inputs]
ns = { record = 5280, measured = 2640 }
"#;

        let config = SessionConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.session.name, "from-env");

        std::env::remove_var("PLSS_TEST_SESSION_NAME");
    }

    #[test]
    fn test_ambiguous_control_point() {
        let toml_content = r#"
[session]
name = "bad"
mode = "single"

[[control_points]]
role = "A"
section = 3
corner = "NE"
northing = 100

[inputs]
"#;
        let config = SessionConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.control_points(),
            Err(SurveyError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_section_out_of_range_fails_validation() {
        let toml_content = r#"
[session]
name = "bad"
mode = "single"

[[control_points]]
role = "A"
section = 40
corner = "NE"

[inputs]
"#;
        let config = SessionConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    fn control_point_error(points: &str) -> String {
        let toml_content = format!(
            "[session]\nname = \"bad\"\nmode = \"single\"\n{}\n[inputs]\n",
            points
        );
        let config = SessionConfig::from_toml_str(&toml_content).unwrap();
        match config.validate() {
            Err(SurveyError::ConfigError { message }) => message,
            other => panic!("expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_address_fails_validation() {
        let corner_only = control_point_error(
            "[[control_points]]\nrole = \"A\"\ncorner = \"NE\"\nnorthing = 5280\neasting = 0\n",
        );
        assert!(corner_only.contains("corner but no section"));

        let section_only =
            control_point_error("[[control_points]]\nrole = \"A\"\nsection = 12\n");
        assert!(section_only.contains("section but no corner"));
    }

    #[test]
    fn test_duplicate_role_fails_validation() {
        let message = control_point_error(
            "[[control_points]]\nrole = \"A\"\nsection = 12\ncorner = \"NE\"\n\n\
             [[control_points]]\nrole = \"a\"\nnorthing = 5280\neasting = 0\n",
        );
        assert!(message.contains("more than once"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(DOUBLE_SESSION.as_bytes()).unwrap();

        let config = SessionConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.session.name, "sec-15-center");
    }
}
