#![deny(clippy::all)]

pub mod api;
pub mod calendar;
pub mod classifier;
pub mod date;
pub mod form;
pub mod parser;

pub use api::{
    ApiClient, ApiError, CalculationRequest, CalculationService, LocalClassifier, SeededClassifier,
};
pub use calendar::{month_grid, CalendarNav, DateField, NavAction, NavigationCursor};
pub use classifier::{classify, classify_with, Residency, YearResult};
pub use date::CalendarDate;
pub use form::{DateInput, DisplayEntry, FormState, ResultsSummary, ValidationError};
pub use parser::{parse, ParseError};

pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
