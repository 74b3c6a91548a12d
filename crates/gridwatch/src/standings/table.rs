//! Point tables built from session classifications.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::ResultRow;

/// A driver's accumulated championship points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverStanding {
    /// Driver full name (the key).
    pub name: String,
    /// Team from the most recent result.
    pub team: String,
    /// Driver code from the most recent result.
    pub abbreviation: Option<String>,
    /// Car number from the most recent result.
    pub number: String,
    /// Points summed over every processed event.
    pub points: f64,
}

/// A team's accumulated championship points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorStanding {
    /// Team name (the key).
    pub name: String,
    /// Team colour from the most recent result.
    pub color: Option<String>,
    /// Points summed over every processed event.
    pub points: f64,
}

/// The mutable state of one aggregation run.
///
/// Entries are kept in first-seen order; ranking is a stable sort on
/// points, so tied entries stay in the order they first appeared.
#[derive(Debug, Default)]
pub struct StandingsRun {
    drivers: Vec<DriverStanding>,
    driver_index: HashMap<String, usize>,
    constructors: Vec<ConstructorStanding>,
    constructor_index: HashMap<String, usize>,
}

impl StandingsRun {
    /// Create an empty run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every row of one event's classification into the tables.
    pub fn record(&mut self, rows: &[ResultRow]) {
        for row in rows {
            self.record_row(row);
        }
    }

    /// Fold a single result row into the tables.
    ///
    /// Points add up; team, code, number and colour are overwritten with the
    /// row's values.
    pub fn record_row(&mut self, row: &ResultRow) {
        let points = row.points;

        match self.driver_index.get(&row.full_name) {
            Some(&idx) => {
                let driver = &mut self.drivers[idx];
                driver.points += points;
                driver.team.clone_from(&row.team_name);
                driver.abbreviation.clone_from(&row.abbreviation);
                driver.number.clone_from(&row.driver_number);
            }
            None => {
                self.driver_index
                    .insert(row.full_name.clone(), self.drivers.len());
                self.drivers.push(DriverStanding {
                    name: row.full_name.clone(),
                    team: row.team_name.clone(),
                    abbreviation: row.abbreviation.clone(),
                    number: row.driver_number.clone(),
                    points,
                });
            }
        }

        match self.constructor_index.get(&row.team_name) {
            Some(&idx) => {
                let constructor = &mut self.constructors[idx];
                constructor.points += points;
                constructor.color.clone_from(&row.team_color);
            }
            None => {
                self.constructor_index
                    .insert(row.team_name.clone(), self.constructors.len());
                self.constructors.push(ConstructorStanding {
                    name: row.team_name.clone(),
                    color: row.team_color.clone(),
                    points,
                });
            }
        }
    }

    /// Whether no rows have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Drivers ranked by points, highest first.
    #[must_use]
    pub fn driver_standings(&self) -> Vec<DriverStanding> {
        let mut ranked = self.drivers.clone();
        ranked.sort_by(|a, b| b.points.total_cmp(&a.points));
        ranked
    }

    /// Constructors ranked by points, highest first.
    #[must_use]
    pub fn constructor_standings(&self) -> Vec<ConstructorStanding> {
        let mut ranked = self.constructors.clone();
        ranked.sort_by(|a, b| b.points.total_cmp(&a.points));
        ranked
    }
}
