//! Section numbering and corner addressing inside a single 6x6 township.
//!
//! The grid `origin` is the northwest corner of the township, which is the
//! northwest corner of section 6 (row 0, column 0). Rows count southward and
//! columns eastward from there.

use crate::domain::model::{Coordinate, CornerTag, SectionAddress};
use crate::utils::error::{Result, SurveyError};
use crate::utils::validation::validate_positive;
use serde::Serialize;

pub const GRID_SIZE: usize = 6;
pub const SECTION_COUNT: u8 = 36;

/// Nominal section side: 80 chains, one mile.
pub const NOMINAL_SECTION_FEET: f64 = 80.0 * 66.0;

/// Serpentine PLSS numbering: row 0 runs 6..1 west to east, row 1 runs 7..12,
/// and so on down to 31..36.
pub fn section_number(row: usize, col: usize) -> Result<u8> {
    if row >= GRID_SIZE {
        return Err(SurveyError::out_of_range("row", row, "0-5"));
    }
    if col >= GRID_SIZE {
        return Err(SurveyError::out_of_range("column", col, "0-5"));
    }

    let within_row = if row % 2 == 0 { GRID_SIZE - col } else { col + 1 };
    Ok((GRID_SIZE * row + within_row) as u8)
}

pub fn row_col(section: u8) -> Result<(usize, usize)> {
    if section == 0 || section > SECTION_COUNT {
        return Err(SurveyError::out_of_range("section", section, "1-36"));
    }

    let index = (section - 1) as usize;
    let row = index / GRID_SIZE;
    let within_row = index % GRID_SIZE;
    let col = if row % 2 == 0 {
        GRID_SIZE - 1 - within_row
    } else {
        within_row
    };
    Ok((row, col))
}

/// Offset `(dx, dy)` from a section's southwest corner, `dx` east and `dy`
/// north.
pub fn corner_offset(tag: CornerTag, width: f64, height: f64) -> (f64, f64) {
    match tag {
        CornerTag::Northwest => (0.0, height),
        CornerTag::Northeast => (width, height),
        CornerTag::Southwest => (0.0, 0.0),
        CornerTag::Southeast => (width, 0.0),
        CornerTag::North => (width / 2.0, height),
        CornerTag::South => (width / 2.0, 0.0),
        CornerTag::East => (width, height / 2.0),
        CornerTag::West => (0.0, height / 2.0),
        CornerTag::Center => (width / 2.0, height / 2.0),
    }
}

pub fn resolve(address: &SectionAddress, grid: &SectionGrid) -> Result<Coordinate> {
    let (row, col) = row_col(address.section)?;
    let rows = grid.row_lines();
    let cols = grid.col_lines();

    // Unit offsets pick a bounding line or the midpoint between the two, so a
    // corner shared by neighbouring sections comes out bit-identical.
    let (fx, fy) = corner_offset(address.corner, 1.0, 1.0);
    let coordinate = Coordinate::new(
        between(rows[row + 1], rows[row], fy),
        between(cols[col], cols[col + 1], fx),
    );
    tracing::debug!("Resolved {} to {}", address, coordinate);
    Ok(coordinate)
}

fn between(start: f64, end: f64, fraction: f64) -> f64 {
    if fraction == 0.0 {
        start
    } else if fraction == 1.0 {
        end
    } else {
        (start + end) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapSuggestion {
    pub address: SectionAddress,
    pub coordinate: Coordinate,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionGrid {
    origin: Coordinate,
    row_spacing: [f64; GRID_SIZE],
    col_spacing: [f64; GRID_SIZE],
}

impl SectionGrid {
    pub fn new(
        origin: Coordinate,
        row_spacing: [f64; GRID_SIZE],
        col_spacing: [f64; GRID_SIZE],
    ) -> Result<Self> {
        crate::utils::validation::validate_finite("grid.origin.northing", origin.northing)?;
        crate::utils::validation::validate_finite("grid.origin.easting", origin.easting)?;
        for (i, spacing) in row_spacing.iter().enumerate() {
            validate_positive(&format!("grid.row_spacing[{}]", i), *spacing)?;
        }
        for (i, spacing) in col_spacing.iter().enumerate() {
            validate_positive(&format!("grid.col_spacing[{}]", i), *spacing)?;
        }

        Ok(Self {
            origin,
            row_spacing,
            col_spacing,
        })
    }

    pub fn uniform(origin: Coordinate, spacing: f64) -> Result<Self> {
        Self::new(origin, [spacing; GRID_SIZE], [spacing; GRID_SIZE])
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn row_spacing(&self) -> &[f64; GRID_SIZE] {
        &self.row_spacing
    }

    pub fn col_spacing(&self) -> &[f64; GRID_SIZE] {
        &self.col_spacing
    }

    pub fn height(&self) -> f64 {
        self.row_spacing.iter().sum()
    }

    pub fn width(&self) -> f64 {
        self.col_spacing.iter().sum()
    }

    /// Northings of the east-west section lines, north to south.
    fn row_lines(&self) -> [f64; GRID_SIZE + 1] {
        let mut lines = [self.origin.northing; GRID_SIZE + 1];
        for (i, spacing) in self.row_spacing.iter().enumerate() {
            lines[i + 1] = lines[i] - spacing;
        }
        lines
    }

    /// Eastings of the north-south section lines, west to east.
    fn col_lines(&self) -> [f64; GRID_SIZE + 1] {
        let mut lines = [self.origin.easting; GRID_SIZE + 1];
        for (i, spacing) in self.col_spacing.iter().enumerate() {
            lines[i + 1] = lines[i] + spacing;
        }
        lines
    }

    pub fn resolve(&self, address: &SectionAddress) -> Result<Coordinate> {
        resolve(address, self)
    }

    /// Section containing `point`, or `None` outside the township.
    pub fn locate(&self, point: &Coordinate) -> Option<u8> {
        let rows = self.row_lines();
        let cols = self.col_lines();

        if !(rows[GRID_SIZE]..=rows[0]).contains(&point.northing)
            || !(cols[0]..=cols[GRID_SIZE]).contains(&point.easting)
        {
            return None;
        }

        let row = (0..GRID_SIZE).find(|&r| point.northing >= rows[r + 1])?;
        let col = (0..GRID_SIZE)
            .find(|&c| point.easting < cols[c + 1])
            .unwrap_or(GRID_SIZE - 1);

        section_number(row, col).ok()
    }

    /// Nearest corner or quarter corner within `tolerance` feet. Section
    /// centers are never snap targets.
    pub fn snap(&self, point: &Coordinate, tolerance: f64) -> Option<SnapSuggestion> {
        let mut best: Option<SnapSuggestion> = None;

        for section in 1..=SECTION_COUNT {
            for corner in CornerTag::ALL.iter().filter(|tag| !tag.is_center()) {
                let address = SectionAddress::new(section, *corner);
                let Ok(coordinate) = self.resolve(&address) else {
                    continue;
                };
                let distance = coordinate.distance_to(point);
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(SnapSuggestion {
                        address,
                        coordinate,
                        distance,
                    });
                }
            }
        }

        best.filter(|suggestion| suggestion.distance <= tolerance)
    }
}

impl Default for SectionGrid {
    fn default() -> Self {
        Self {
            origin: Coordinate::default(),
            row_spacing: [NOMINAL_SECTION_FEET; GRID_SIZE],
            col_spacing: [NOMINAL_SECTION_FEET; GRID_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SectionGrid {
        SectionGrid::uniform(Coordinate::new(31680.0, 0.0), 5280.0).unwrap()
    }

    #[test]
    fn test_serpentine_spot_checks() {
        assert_eq!(section_number(0, 0).unwrap(), 6);
        assert_eq!(section_number(0, 5).unwrap(), 1);
        assert_eq!(section_number(1, 0).unwrap(), 7);
        assert_eq!(section_number(2, 0).unwrap(), 18);
        assert_eq!(section_number(5, 0).unwrap(), 31);
        assert_eq!(section_number(5, 5).unwrap(), 36);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(section_number(6, 0), Err(SurveyError::OutOfRangeError { .. })));
        assert!(matches!(section_number(0, 6), Err(SurveyError::OutOfRangeError { .. })));
        assert!(matches!(row_col(0), Err(SurveyError::OutOfRangeError { .. })));
        assert!(matches!(row_col(37), Err(SurveyError::OutOfRangeError { .. })));
    }

    #[test]
    fn test_corner_offsets() {
        assert_eq!(corner_offset(CornerTag::Southwest, 10.0, 20.0), (0.0, 0.0));
        assert_eq!(corner_offset(CornerTag::Northeast, 10.0, 20.0), (10.0, 20.0));
        assert_eq!(corner_offset(CornerTag::East, 10.0, 20.0), (10.0, 10.0));
        assert_eq!(corner_offset(CornerTag::Center, 10.0, 20.0), (5.0, 10.0));
    }

    #[test]
    fn test_resolve_section_six_is_at_origin() {
        let nw = grid()
            .resolve(&SectionAddress::new(6, CornerTag::Northwest))
            .unwrap();
        assert_eq!(nw, Coordinate::new(31680.0, 0.0));

        let se36 = grid()
            .resolve(&SectionAddress::new(36, CornerTag::Southeast))
            .unwrap();
        assert_eq!(se36, Coordinate::new(0.0, 31680.0));
    }

    #[test]
    fn test_resolve_irregular_spacing() {
        let grid = SectionGrid::new(
            Coordinate::new(1000.0, 2000.0),
            [5000.0, 5280.0, 5280.0, 5280.0, 5280.0, 5400.0],
            [5280.0, 5280.0, 5280.0, 5280.0, 5280.0, 5100.0],
        )
        .unwrap();

        // Section 1 is the northeast section: row 0, column 5.
        let ne = grid.resolve(&SectionAddress::new(1, CornerTag::Northeast)).unwrap();
        assert_eq!(ne, Coordinate::new(1000.0, 2000.0 + 5.0 * 5280.0 + 5100.0));

        let s = grid.resolve(&SectionAddress::new(1, CornerTag::South)).unwrap();
        assert_eq!(s, Coordinate::new(1000.0 - 5000.0, 2000.0 + 5.0 * 5280.0 + 2550.0));
    }

    #[test]
    fn test_rejects_non_positive_spacing() {
        let mut rows = [5280.0; GRID_SIZE];
        rows[3] = 0.0;
        assert!(SectionGrid::new(Coordinate::default(), rows, [5280.0; GRID_SIZE]).is_err());
        assert!(SectionGrid::uniform(Coordinate::default(), f64::NAN).is_err());
    }

    #[test]
    fn test_locate() {
        let grid = grid();
        assert_eq!(grid.locate(&Coordinate::new(31000.0, 100.0)), Some(6));
        assert_eq!(grid.locate(&Coordinate::new(31000.0, 31000.0)), Some(1));
        assert_eq!(grid.locate(&Coordinate::new(100.0, 100.0)), Some(31));
        // township corners belong to the outer sections
        assert_eq!(grid.locate(&Coordinate::new(31680.0, 31680.0)), Some(1));
        assert_eq!(grid.locate(&Coordinate::new(0.0, 0.0)), Some(31));
        // the line between sections 6 and 7 is the south line of 6
        assert_eq!(grid.locate(&Coordinate::new(26400.0, 100.0)), Some(6));
        assert_eq!(grid.locate(&Coordinate::new(26399.0, 100.0)), Some(7));
        assert_eq!(grid.locate(&Coordinate::new(-1.0, 100.0)), None);
        assert_eq!(grid.locate(&Coordinate::new(100.0, 31681.0)), None);
    }

    #[test]
    fn test_snap() {
        let grid = grid();
        let suggestion = grid.snap(&Coordinate::new(31670.0, 2650.0), 50.0).unwrap();
        assert_eq!(suggestion.address, SectionAddress::new(6, CornerTag::North));
        assert_eq!(suggestion.coordinate, Coordinate::new(31680.0, 2640.0));

        // shared corner resolves to the lowest section number
        let shared = grid.snap(&Coordinate::new(26400.0, 5280.0), 1.0).unwrap();
        assert_eq!(shared.address.section, 5);

        assert!(grid.snap(&Coordinate::new(29040.0, 1320.0), 100.0).is_none());
    }

    #[test]
    fn test_shared_corners_are_identical_on_surveyed_spacing() {
        let grid = SectionGrid::new(
            Coordinate::new(31681.3, 1022.7),
            [5280.37, 5279.91, 5281.13, 5278.66, 5280.02, 5279.48],
            [5279.83, 5280.41, 5281.07, 5278.94, 5280.55, 5279.12],
        )
        .unwrap();
        let at = |row: usize, col: usize, corner: CornerTag| {
            let section = section_number(row, col).unwrap();
            grid.resolve(&SectionAddress::new(section, corner)).unwrap()
        };

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if col + 1 < GRID_SIZE {
                    assert_eq!(
                        at(row, col, CornerTag::Northeast),
                        at(row, col + 1, CornerTag::Northwest)
                    );
                    assert_eq!(
                        at(row, col, CornerTag::East),
                        at(row, col + 1, CornerTag::West)
                    );
                }
                if row + 1 < GRID_SIZE {
                    assert_eq!(
                        at(row, col, CornerTag::Southwest),
                        at(row + 1, col, CornerTag::Northwest)
                    );
                    assert_eq!(
                        at(row, col, CornerTag::South),
                        at(row + 1, col, CornerTag::North)
                    );
                }
                if row + 1 < GRID_SIZE && col + 1 < GRID_SIZE {
                    assert_eq!(
                        at(row, col, CornerTag::Southeast),
                        at(row + 1, col + 1, CornerTag::Northwest)
                    );
                }
            }
        }
    }
}
