//! Local financial-year residency estimate.
//!
//! This is an offline approximation. Authoritative results come from the
//! remote `/calculate` service.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::CalendarDate;

pub const MAX_YEARS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Residency {
    #[serde(rename = "RNOR")]
    Rnor,
    #[serde(rename = "NR")]
    Nr,
    #[serde(rename = "ROR")]
    Ror,
}

impl Residency {
    pub fn all() -> &'static [Residency] {
        &[Residency::Nr, Residency::Rnor, Residency::Ror]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Residency::Rnor => "RNOR",
            Residency::Nr => "NR",
            Residency::Ror => "ROR",
        }
    }

    /// Label shown to users; NR is presented as NRI.
    pub fn display_label(&self) -> &'static str {
        match self {
            Residency::Rnor => "RNOR",
            Residency::Nr => "NRI",
            Residency::Ror => "ROR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Residency::Rnor => "RNOR - Resident but Not Ordinarily Resident",
            Residency::Nr => "NRI - Non Resident Indian",
            Residency::Ror => "ROR - Resident and Ordinarily Resident",
        }
    }
}

impl fmt::Display for Residency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Residency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RNOR" => Ok(Residency::Rnor),
            "NR" | "NRI" => Ok(Residency::Nr),
            "ROR" => Ok(Residency::Ror),
            other => Err(format!("unknown residency status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub financial_year: String,
    pub status: Residency,
}

/// `FY 2021-22` for the financial year starting April 2021.
pub fn financial_year_label(year: i32) -> String {
    format!("FY {}-{:02}", year, (year + 1).rem_euclid(100))
}

/// April 1 of `year` through March 31 of `year + 1`.
pub fn financial_year_bounds(year: i32) -> Option<(CalendarDate, CalendarDate)> {
    Some((
        CalendarDate::from_ymd(year, 4, 1)?,
        CalendarDate::from_ymd(year + 1, 3, 31)?,
    ))
}

fn overlaps_financial_year(departure: CalendarDate, ret: CalendarDate, year: i32) -> bool {
    let key = |d: CalendarDate| (d.year(), d.month(), d.day());
    key(departure) <= (year + 1, 3, 31) && key(ret) >= (year, 4, 1)
}

/// Status from presence alone, before positional overrides.
pub fn base_status(
    departure: CalendarDate,
    ret: CalendarDate,
    avg_india_days: u32,
    year: i32,
) -> Residency {
    if !overlaps_financial_year(departure, ret, year) {
        return if avg_india_days > 182 {
            Residency::Ror
        } else {
            Residency::Rnor
        };
    }

    let days_in_india = avg_india_days.min(180);
    if days_in_india < 60 {
        Residency::Nr
    } else if days_in_india < 182 {
        Residency::Rnor
    } else {
        Residency::Ror
    }
}

/// Decides the years whose status is not fixed by position.
pub trait OverridePolicy {
    /// Years strictly between the departure and return years.
    fn intermediate(&mut self, base: Residency) -> Residency;

    /// The first year after the return year.
    fn year_after_return(&mut self, base: Residency) -> Residency;
}

/// Keeps the presence-based status abroad and RNOR right after return.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deterministic;

impl OverridePolicy for Deterministic {
    fn intermediate(&mut self, base: Residency) -> Residency {
        base
    }

    fn year_after_return(&mut self, _base: Residency) -> Residency {
        Residency::Rnor
    }
}

/// Weighted random overrides. Pass a seeded RNG for reproducible output.
pub struct Weighted<R: Rng> {
    rng: R,
}

impl<R: Rng> Weighted<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> OverridePolicy for Weighted<R> {
    fn intermediate(&mut self, _base: Residency) -> Residency {
        if self.rng.gen::<f64>() > 0.3 {
            if self.rng.gen::<f64>() > 0.6 {
                Residency::Nr
            } else {
                Residency::Rnor
            }
        } else {
            Residency::Ror
        }
    }

    fn year_after_return(&mut self, _base: Residency) -> Residency {
        if self.rng.gen::<f64>() > 0.5 {
            Residency::Rnor
        } else {
            Residency::Ror
        }
    }
}

pub fn classify(departure: CalendarDate, ret: CalendarDate, avg_india_days: u32) -> Vec<YearResult> {
    classify_with(departure, ret, avg_india_days, &mut Deterministic)
}

pub fn classify_with<P: OverridePolicy + ?Sized>(
    departure: CalendarDate,
    ret: CalendarDate,
    avg_india_days: u32,
    policy: &mut P,
) -> Vec<YearResult> {
    let start_year = departure.year();
    let end_year = ret.year();

    (start_year..=end_year + 1)
        .take(MAX_YEARS)
        .map(|year| {
            let base = base_status(departure, ret, avg_india_days, year);
            let status = if year == start_year {
                Residency::Ror
            } else if year < end_year {
                policy.intermediate(base)
            } else {
                match year - end_year {
                    0 => Residency::Rnor,
                    1 => policy.year_after_return(base),
                    _ => Residency::Ror,
                }
            };
            YearResult {
                financial_year: financial_year_label(year),
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn test_financial_year_label() {
        assert_eq!(financial_year_label(2020), "FY 2020-21");
        assert_eq!(financial_year_label(2008), "FY 2008-09");
        assert_eq!(financial_year_label(2099), "FY 2099-00");
    }

    #[test]
    fn test_financial_year_bounds() {
        let (start, end) = financial_year_bounds(2021).unwrap();
        assert_eq!(start, date(2021, 4, 1));
        assert_eq!(end, date(2022, 3, 31));
    }

    #[test]
    fn test_reference_scenario() {
        let results = classify(date(2020, 6, 15), date(2023, 9, 1), 100);
        assert_eq!(results.first().unwrap().financial_year, "FY 2020-21");
        assert_eq!(results.first().unwrap().status, Residency::Ror);
        assert_eq!(results.last().unwrap().financial_year, "FY 2024-25");
        assert_eq!(results.len(), 5);
        assert!(results.len() <= MAX_YEARS);
    }

    #[test]
    fn test_positional_overrides() {
        let results = classify(date(2020, 6, 15), date(2023, 9, 1), 100);
        let statuses: Vec<Residency> = results.iter().map(|r| r.status).collect();
        // 100 days abroad falls in the RNOR band for the intermediate years.
        assert_eq!(
            statuses,
            vec![
                Residency::Ror,
                Residency::Rnor,
                Residency::Rnor,
                Residency::Rnor,
                Residency::Rnor,
            ]
        );
    }

    #[test]
    fn test_low_presence_is_nr_abroad() {
        let results = classify(date(2018, 1, 10), date(2022, 2, 1), 30);
        assert_eq!(results[0].status, Residency::Ror);
        assert!(results[1..4].iter().all(|r| r.status == Residency::Nr));
        assert_eq!(results[4].status, Residency::Rnor);
    }

    #[test]
    fn test_base_status_bands() {
        let dep = date(2020, 6, 1);
        let ret = date(2022, 6, 1);
        assert_eq!(base_status(dep, ret, 59, 2021), Residency::Nr);
        assert_eq!(base_status(dep, ret, 60, 2021), Residency::Rnor);
        // Clamped to 180 while abroad, so never ROR through this branch.
        assert_eq!(base_status(dep, ret, 365, 2021), Residency::Rnor);
        // No overlap with FY 2025-26.
        assert_eq!(base_status(dep, ret, 183, 2025), Residency::Ror);
        assert_eq!(base_status(dep, ret, 182, 2025), Residency::Rnor);
    }

    #[test]
    fn test_overlap_boundaries() {
        // Return on April 1 touches the FY that starts that day.
        assert!(overlaps_financial_year(date(2020, 1, 1), date(2021, 4, 1), 2021));
        assert!(!overlaps_financial_year(date(2020, 1, 1), date(2021, 3, 31), 2021));
        // Departure on March 31 touches the FY ending that day.
        assert!(overlaps_financial_year(date(2021, 3, 31), date(2022, 1, 1), 2020));
        assert!(!overlaps_financial_year(date(2021, 4, 1), date(2022, 1, 1), 2020));
    }

    #[test]
    fn test_capped_at_eleven_years() {
        let results = classify(date(2000, 5, 1), date(2030, 5, 1), 20);
        assert_eq!(results.len(), MAX_YEARS);
        assert_eq!(results[10].financial_year, "FY 2010-11");
    }

    #[test]
    fn test_same_year_trip() {
        let results = classify(date(2022, 5, 1), date(2022, 11, 1), 20);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, Residency::Ror);
        assert_eq!(results[1].status, Residency::Rnor);
    }

    #[test]
    fn test_results_are_ascending() {
        let results = classify(date(2015, 7, 1), date(2019, 7, 1), 75);
        let labels: Vec<&str> = results.iter().map(|r| r.financial_year.as_str()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_weighted_policy_respects_fixed_positions() {
        for seed in 0..20 {
            let mut policy = Weighted::new(StdRng::seed_from_u64(seed));
            let results = classify_with(date(2016, 6, 1), date(2021, 6, 1), 90, &mut policy);
            assert_eq!(results.len(), 7);
            assert_eq!(results[0].status, Residency::Ror);
            assert_eq!(results[5].status, Residency::Rnor);
            assert_ne!(results[6].status, Residency::Nr);
        }
    }

    #[test]
    fn test_weighted_policy_is_reproducible_with_seed() {
        let run = |seed| {
            let mut policy = Weighted::new(StdRng::seed_from_u64(seed));
            classify_with(date(2010, 6, 1), date(2019, 6, 1), 90, &mut policy)
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_residency_codes_and_labels() {
        assert_eq!(Residency::Nr.code(), "NR");
        assert_eq!(Residency::Nr.display_label(), "NRI");
        assert_eq!("nri".parse::<Residency>(), Ok(Residency::Nr));
        assert!("XYZ".parse::<Residency>().is_err());
        assert_eq!(serde_json::to_string(&Residency::Rnor).unwrap(), "\"RNOR\"");
    }
}
