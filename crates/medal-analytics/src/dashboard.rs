//! Tables and chart views backing the medals dashboard.
//!
//! [`DashboardData`] loads the three startup tables once and derives every
//! view from them on request:
//! - medals by `Year`, and by `Year` and `Season`, for one country's records
//! - the top attributes (sport, event, ...) by total medals
//! - medals per NOC and year with ISO codes, optionally for one sport
//! - top attributes within one region, and athlete subsets by region and sex

use crate::aggregator::{count_medals, count_medals_n};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::io::{ReadOptions, read_table};
use crate::queries::{
    ALL_REGIONS, ALL_SPORTS, REGION_COLUMN, Selection, apply_selection, dropdown_options,
    drop_missing, join_iso_codes, top_n, year_bounds,
};
use crate::types::MedalColumn;
use polars::prelude::*;
use tracing::info;

/// Number of rows shown in the dashboard's top-N bar charts.
pub const TOP_N: usize = 10;

/// The dashboard's in-memory tables.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Result records of the featured country.
    pub athletes: DataFrame,
    /// Result records of every country, with `region` and `notes` attached.
    pub athlete_regions: DataFrame,
    /// NOC to ISO code and country name lookup.
    pub noc_iso: DataFrame,
}

impl DashboardData {
    /// Read the three tables named by `config`.
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        let options = ReadOptions::default();

        let data = Self {
            athletes: read_table(&config.athletes_path, options)?,
            athlete_regions: read_table(&config.athlete_regions_path, options)?,
            noc_iso: read_table(&config.noc_iso_path, options)?,
        };

        info!(
            "Dashboard data loaded: {} featured records, {} world records",
            data.athletes.height(),
            data.athlete_regions.height()
        );
        Ok(data)
    }

    /// Medal counts of the featured country per Olympic year.
    pub fn medals_by_year(&self) -> Result<DataFrame> {
        count_medals_n(&self.athletes, "Year", &[])
    }

    /// Medal counts of the featured country per year and season.
    pub fn medals_by_year_and_season(&self) -> Result<DataFrame> {
        count_medals_n(&self.athletes, "Year", &["Season"])
    }

    /// The `n` values of `attribute` with the most medals for the featured country.
    pub fn top_attribute(&self, attribute: &str, n: usize) -> Result<DataFrame> {
        let summary = count_medals_n(&self.athletes, attribute, &[])?;
        top_n(&summary, MedalColumn::Total, n)
    }

    /// Featured-country records for one sex, or all of them.
    pub fn athletes_by_sex(&self, sex: &Selection) -> Result<DataFrame> {
        apply_selection(&self.athletes, "Sex", sex)
    }

    /// Medals per NOC and year with ISO codes, for one sport or all sports.
    pub fn world_medals(&self, sport: &Selection) -> Result<DataFrame> {
        let records = apply_selection(&self.athlete_regions, "Sport", sport)?;
        let summary = count_medals(&records, &["NOC", "Year"])?;
        join_iso_codes(&summary, &self.noc_iso)
    }

    /// World records of one region, or of every region. Records without a
    /// region are left out.
    pub fn region_records(&self, region: &Selection) -> Result<DataFrame> {
        let located = drop_missing(&self.athlete_regions, REGION_COLUMN)?;
        apply_selection(&located, REGION_COLUMN, region)
    }

    /// The `n` values of `attribute` with the most medals within a region.
    pub fn region_top_attribute(
        &self,
        region: &Selection,
        attribute: &str,
        n: usize,
    ) -> Result<DataFrame> {
        let records = self.region_records(region)?;
        let summary = count_medals_n(&records, attribute, &[])?;
        top_n(&summary, MedalColumn::Total, n)
    }

    /// Records of a region narrowed to one sex.
    pub fn region_athletes(&self, region: &Selection, sex: &Selection) -> Result<DataFrame> {
        let records = self.region_records(region)?;
        apply_selection(&records, "Sex", sex)
    }

    pub fn sport_options(&self) -> Result<Vec<String>> {
        dropdown_options(&self.athlete_regions, "Sport", ALL_SPORTS)
    }

    pub fn region_options(&self) -> Result<Vec<String>> {
        dropdown_options(&self.athlete_regions, REGION_COLUMN, ALL_REGIONS)
    }

    /// First and last year present in the world records.
    pub fn year_range(&self) -> Result<Option<(i64, i64)>> {
        year_bounds(&self.athlete_regions, "Year")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::BOTH_SEXES;
    use pretty_assertions::assert_eq;

    fn sample() -> DashboardData {
        let athletes = df!(
            "Sex" => &["M", "F", "F", "M"],
            "Year" => &[2000i64, 2000, 2004, 2004],
            "Season" => &["Summer", "Winter", "Summer", "Summer"],
            "Sport" => &["Rowing", "Hockey", "Rowing", "Rowing"],
            "Medal" => &[Some("Gold"), Some("Silver"), None, Some("Bronze")]
        )
        .unwrap();

        let athlete_regions = df!(
            "Sex" => &["M", "F", "M", "F"],
            "NOC" => &["CAN", "NOR", "CAN", "XXX"],
            "Year" => &[2000i64, 2000, 2004, 2004],
            "Sport" => &["Rowing", "Skiing", "Rowing", "Skiing"],
            "Medal" => &[Some("Gold"), Some("Gold"), Some("Silver"), None],
            "region" => &[Some("Canada"), Some("Norway"), Some("Canada"), None]
        )
        .unwrap();

        let noc_iso = df!(
            "NOC" => &["CAN", "NOR"],
            "ISO" => &["CAN", "NOR"],
            "Country" => &["Canada", "Norway"]
        )
        .unwrap();

        DashboardData {
            athletes,
            athlete_regions,
            noc_iso,
        }
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::String)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_medals_by_year_and_season() {
        let data = sample();
        assert_eq!(data.medals_by_year().unwrap().height(), 2);

        let out = data.medals_by_year_and_season().unwrap();
        assert_eq!(out.height(), 3);
        assert_eq!(strings(&out, "Season"), vec!["Summer", "Winter", "Summer"]);
    }

    #[test]
    fn test_top_attribute() {
        let out = sample().top_attribute("Sport", TOP_N).unwrap();
        assert_eq!(strings(&out, "Sport"), vec!["Rowing", "Hockey"]);
    }

    #[test]
    fn test_world_medals_for_one_sport() {
        let data = sample();
        let out = data
            .world_medals(&Selection::from_widget("Rowing", ALL_SPORTS))
            .unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(strings(&out, "Country"), vec!["Canada", "Canada"]);

        let all = data
            .world_medals(&Selection::from_widget(ALL_SPORTS, ALL_SPORTS))
            .unwrap();
        assert_eq!(all.height(), 4);
        assert_eq!(all.column("Country").unwrap().null_count(), 1);
    }

    #[test]
    fn test_region_views_skip_unlocated_records() {
        let data = sample();
        let everywhere = data.region_records(&Selection::All).unwrap();
        assert_eq!(everywhere.height(), 3);

        let canada = data
            .region_top_attribute(&Selection::Only("Canada".into()), "Sport", TOP_N)
            .unwrap();
        assert_eq!(canada.height(), 1);

        let women = data
            .region_athletes(&Selection::All, &Selection::Only("F".into()))
            .unwrap();
        assert_eq!(women.height(), 1);
    }

    #[test]
    fn test_athletes_by_sex() {
        let data = sample();
        let both = data
            .athletes_by_sex(&Selection::from_widget(BOTH_SEXES, BOTH_SEXES))
            .unwrap();
        assert_eq!(both.height(), 4);
        let men = data.athletes_by_sex(&Selection::Only("M".into())).unwrap();
        assert_eq!(men.height(), 2);
    }

    #[test]
    fn test_options_and_years() {
        let data = sample();
        assert_eq!(
            data.sport_options().unwrap(),
            vec!["All Sports", "Rowing", "Skiing"]
        );
        assert_eq!(
            data.region_options().unwrap(),
            vec!["All regions", "Canada", "Norway"]
        );
        assert_eq!(data.year_range().unwrap(), Some((2000, 2004)));
    }
}
