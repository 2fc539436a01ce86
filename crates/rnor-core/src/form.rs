//! Form state and submission flow shared by the TUI and the `calculate` command.

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{ApiError, CalculationRequest, CalculationService};
use crate::calendar::DateField;
use crate::classifier::{Residency, YearResult};
use crate::date::CalendarDate;
use crate::parser::{parse, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select both departure and return dates")]
    MissingDates,
    #[error("Please enter a non-negative number.")]
    NegativeNumber,
    #[error("Please fill all the fields correctly.")]
    InvalidNumber,
    #[error("Return date must be on or after the departure date")]
    ReturnBeforeDeparture,
    #[error("A calculation is already in progress")]
    Busy,
}

/// One date field: the text being typed and what it currently means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateInput {
    pub text: String,
    pub value: Option<CalendarDate>,
    pub error: Option<ParseError>,
}

impl DateInput {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        match parse(&self.text) {
            Ok(value) => {
                self.value = value;
                self.error = None;
            }
            Err(err) => {
                self.value = None;
                self.error = Some(err);
            }
        }
    }

    pub fn pick(&mut self, date: CalendarDate) {
        self.text.clear();
        self.value = Some(date);
        self.error = None;
    }

    /// What the field shows: the typed text, else the committed date.
    pub fn display_text(&self) -> String {
        if !self.text.is_empty() {
            return self.text.clone();
        }
        self.value.map(|d| d.display_long()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEntry {
    pub financial_year: String,
    pub status: Residency,
    pub label: &'static str,
}

impl From<YearResult> for DisplayEntry {
    fn from(result: YearResult) -> Self {
        DisplayEntry {
            label: result.status.display_label(),
            financial_year: result.financial_year,
            status: result.status,
        }
    }
}

impl DisplayEntry {
    /// `FY 2021-22 → NRI`
    pub fn line(&self) -> String {
        format!("{} → {}", self.financial_year, self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub message: String,
    pub rnor_years: Vec<String>,
    pub legend: Vec<&'static str>,
}

pub fn summarize(entries: &[DisplayEntry]) -> ResultsSummary {
    let rnor_years: Vec<String> = entries
        .iter()
        .filter(|e| e.status == Residency::Rnor)
        .map(|e| e.financial_year.clone())
        .collect();

    let message = if rnor_years.is_empty() {
        "You do NOT qualify as RNOR for any of the following years.".to_string()
    } else {
        format!("You qualify as RNOR for {}", rnor_years.join(", "))
    };

    let legend = Residency::all()
        .iter()
        .filter(|s| entries.iter().any(|e| e.status == **s))
        .map(|s| s.description())
        .collect();

    ResultsSummary {
        message,
        rnor_years,
        legend,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub departure: DateInput,
    pub return_date: DateInput,
    pub avg_days: String,
    pub passive_income: String,
    pub ctc: String,
    pub error: Option<String>,
    pub results: Vec<DisplayEntry>,
    pub calculating: bool,
}

/// Empty text is `None`; anything else must be a whole number.
fn parse_amount(text: &str) -> Result<Option<i64>, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidNumber)
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_input(&self, field: DateField) -> &DateInput {
        match field {
            DateField::Departure => &self.departure,
            DateField::Return => &self.return_date,
        }
    }

    pub fn date_input_mut(&mut self, field: DateField) -> &mut DateInput {
        match field {
            DateField::Departure => &mut self.departure,
            DateField::Return => &mut self.return_date,
        }
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn summary(&self) -> ResultsSummary {
        summarize(&self.results)
    }

    pub fn validate(&self) -> Result<CalculationRequest, ValidationError> {
        let (Some(departure), Some(return_date)) = (self.departure.value, self.return_date.value)
        else {
            return Err(ValidationError::MissingDates);
        };

        let avg_days = parse_amount(&self.avg_days);
        let passive_income = parse_amount(&self.passive_income);
        let ctc = parse_amount(&self.ctc);

        let amounts = [&avg_days, &passive_income, &ctc];
        if amounts.iter().any(|a| matches!(a, Ok(Some(n)) if *n < 0)) {
            return Err(ValidationError::NegativeNumber);
        }

        let avg_days = avg_days?.ok_or(ValidationError::InvalidNumber)?;
        let avg_days = u32::try_from(avg_days).map_err(|_| ValidationError::InvalidNumber)?;
        let to_u64 = |n: Option<i64>| n.and_then(|v| u64::try_from(v).ok());
        let passive_income = to_u64(passive_income?);
        let ctc = to_u64(ctc?);

        if return_date < departure {
            return Err(ValidationError::ReturnBeforeDeparture);
        }

        Ok(CalculationRequest::new(departure, return_date, avg_days).with_extras(ctc, passive_income))
    }

    /// Validates and marks the form busy. The returned request is the snapshot to send.
    pub fn begin_submit(&mut self) -> Result<CalculationRequest, ValidationError> {
        if self.calculating {
            return Err(ValidationError::Busy);
        }
        match self.validate() {
            Ok(request) => {
                self.error = None;
                self.calculating = true;
                debug!(?request, "submitting calculation");
                Ok(request)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<Vec<YearResult>, ApiError>) {
        self.calculating = false;
        match result {
            Ok(results) => {
                self.error = None;
                self.results = results.into_iter().map(DisplayEntry::from).collect();
            }
            Err(err) => {
                warn!(error = %err, "calculation failed");
                self.error = Some(err.user_message());
            }
        }
    }

    pub async fn submit<S>(&mut self, service: &S) -> Result<(), ValidationError>
    where
        S: CalculationService + ?Sized,
    {
        let request = self.begin_submit()?;
        let result = service.calculate(&request).await;
        self.finish_submit(result);
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
