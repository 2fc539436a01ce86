mod settings;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use rnor_core::calendar::{month_grid, month_name, NavigationCursor};
use rnor_core::date::{MAX_YEAR, MIN_YEAR};
use rnor_core::{
    parse, ApiClient, CalendarDate, FormState, LocalClassifier, Residency, SeededClassifier,
};

use settings::Settings;

#[derive(Parser)]
#[command(name = "rnor")]
#[command(author, version, about = "RNOR residency status calculator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true, help = "Color theme (teal, blue, green, orange, monochrome)")]
    theme: Option<String>,

    #[arg(long, global = true, help = "Base URL of the calculation service")]
    api_url: Option<String>,

    #[arg(long, global = true, help = "Enable debug logging")]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Open the interactive calculator (default)")]
    Tui {
        #[arg(long, help = "Classify locally instead of calling the service")]
        local: bool,
    },
    #[command(about = "Calculate residency status per financial year")]
    Calculate {
        #[arg(long, help = "Departure date (DD/MM/YYYY or YYYY-MM-DD)")]
        departure: String,
        #[arg(long = "return", help = "Return date (DD/MM/YYYY or YYYY-MM-DD)")]
        return_date: String,
        #[arg(long, allow_hyphen_values = true, help = "Average days spent in India per year")]
        avg_days: String,
        #[arg(long, allow_hyphen_values = true, help = "Annual CTC")]
        ctc: Option<String>,
        #[arg(long, allow_hyphen_values = true, help = "Annual passive income")]
        passive_income: Option<String>,
        #[arg(long, help = "Classify locally instead of calling the service")]
        local: bool,
        #[arg(long, requires = "local", help = "Use weighted random overrides with this seed")]
        seed: Option<u64>,
        #[arg(long, help = "Output as JSON")]
        json: bool,
        #[arg(long, help = "Disable spinner")]
        no_spinner: bool,
    },
    #[command(about = "Check how a typed date is understood")]
    Parse {
        text: String,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "List sheets known to the calculation service")]
    Sheets {
        #[arg(long, help = "Output as JSON")]
        json: bool,
        #[arg(long, help = "Disable spinner")]
        no_spinner: bool,
    },
    #[command(about = "Print a month grid")]
    Calendar {
        #[arg(long, help = "Year (1900-2100)")]
        year: Option<i32>,
        #[arg(long, help = "Month (1-12)")]
        month: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();
    let api_url = settings.resolve_api_url(cli.api_url.as_deref());

    match cli.command {
        None => tui::run(cli.theme.as_deref(), &api_url, false, cli.debug),
        Some(Commands::Tui { local }) => tui::run(cli.theme.as_deref(), &api_url, local, cli.debug),
        Some(Commands::Calculate {
            departure,
            return_date,
            avg_days,
            ctc,
            passive_income,
            local,
            seed,
            json,
            no_spinner,
        }) => {
            init_logging(cli.debug);
            let input = CalculateInput {
                departure,
                return_date,
                avg_days,
                ctc: ctc.unwrap_or_default(),
                passive_income: passive_income.unwrap_or_default(),
            };
            let backend = match (local, seed) {
                (true, Some(seed)) => Backend::Seeded(seed),
                (true, None) => Backend::Local,
                (false, _) => Backend::Remote(api_url),
            };
            run_calculate(input, backend, json, no_spinner || json)
        }
        Some(Commands::Parse { text, json }) => {
            init_logging(cli.debug);
            run_parse(&text, json)
        }
        Some(Commands::Sheets { json, no_spinner }) => {
            init_logging(cli.debug);
            run_sheets(&api_url, json, no_spinner || json)
        }
        Some(Commands::Calendar { year, month }) => {
            init_logging(cli.debug);
            run_calendar(year, month)
        }
    }
}

/// Logs go to stderr. `--debug` forces debug level, otherwise `RUST_LOG` decides.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct CalculateInput {
    departure: String,
    return_date: String,
    avg_days: String,
    ctc: String,
    passive_income: String,
}

impl CalculateInput {
    fn into_form(self) -> FormState {
        let mut form = FormState::new();
        form.departure.set_text(self.departure);
        form.return_date.set_text(self.return_date);
        form.avg_days = self.avg_days;
        form.ctc = self.ctc;
        form.passive_income = self.passive_income;
        form
    }
}

enum Backend {
    Remote(String),
    Local,
    Seeded(u64),
}

fn run_calculate(input: CalculateInput, backend: Backend, json: bool, no_spinner: bool) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use tokio::runtime::Runtime;

    let mut form = input.into_form();

    for (label, field) in [("Departure", &form.departure), ("Return", &form.return_date)] {
        if let Some(ref err) = field.error {
            fail(json, &format!("{}: {}", label, err));
        }
    }

    let spinner = if no_spinner {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner());
        pb.set_message(match backend {
            Backend::Remote(ref url) => format!("Calculating via {}...", url),
            _ => "Classifying locally...".to_string(),
        });
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    };

    let rt = Runtime::new()?;
    let submitted = rt.block_on(async {
        match backend {
            Backend::Remote(url) => form.submit(&ApiClient::new(url)).await,
            Backend::Local => form.submit(&LocalClassifier).await,
            Backend::Seeded(seed) => form.submit(&SeededClassifier::new(seed)).await,
        }
    });

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if let Err(err) = submitted {
        fail(json, &err.to_string());
    }
    if let Some(ref err) = form.error {
        fail(json, err);
    }

    let summary = form.summary();

    if json {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct CalculateOutput<'a> {
            results: &'a [rnor_core::DisplayEntry],
            summary: &'a rnor_core::ResultsSummary,
        }

        let output = CalculateOutput {
            results: &form.results,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    use comfy_table::{Cell, ContentArrangement, Table};

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Financial Year", "Status"]);

    for entry in &form.results {
        table.add_row(vec![
            Cell::new(&entry.financial_year),
            Cell::new(entry.label).fg(status_table_color(entry.status)),
        ]);
    }

    println!("\n  {}\n", "RNOR Status Results".bold());
    println!("{table}");
    println!("\n  {}", summary.message.bold());
    for line in &summary.legend {
        println!("  {}", line.bright_black());
    }
    println!();

    Ok(())
}

fn status_table_color(status: Residency) -> comfy_table::Color {
    use comfy_table::Color;
    match status {
        Residency::Rnor => Color::Rgb { r: 30, g: 225, b: 194 },
        Residency::Nr => Color::Rgb { r: 140, g: 140, b: 140 },
        Residency::Ror => Color::Rgb { r: 253, g: 176, b: 79 },
    }
}

fn fail(json: bool, message: &str) -> ! {
    if json {
        #[derive(serde::Serialize)]
        struct ErrorOutput<'a> {
            error: &'a str,
        }
        if let Ok(body) = serde_json::to_string_pretty(&ErrorOutput { error: message }) {
            println!("{}", body);
        }
    } else {
        println!("\n  {}\n", message.red());
    }
    std::process::exit(1);
}

fn run_parse(text: &str, json: bool) -> Result<()> {
    let parsed = parse(text);

    if json {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ParseOutput<'a> {
            input: &'a str,
            date: Option<String>,
            error: Option<String>,
        }

        let output = ParseOutput {
            input: text,
            date: parsed.as_ref().ok().copied().flatten().map(|d| d.to_iso_string()),
            error: parsed.as_ref().err().map(|e| e.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        if parsed.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }

    match parsed {
        Ok(Some(date)) => {
            println!("\n  {} ({})\n", date.display_long().bold(), date.to_iso_string());
        }
        Ok(None) => {
            println!("\n  {}\n", "No date entered".bright_black());
        }
        Err(err) => {
            println!("\n  {}\n", err.to_string().red());
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run_sheets(api_url: &str, json: bool, no_spinner: bool) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use tokio::runtime::Runtime;

    let spinner = if no_spinner {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner());
        pb.set_message(format!("Fetching sheets from {}...", api_url));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    };

    let client = ApiClient::new(api_url);
    let rt = Runtime::new()?;
    let result = rt.block_on(client.list_sheets());

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let sheets = match result {
        Ok(sheets) => sheets,
        Err(err) => fail(json, &format!("Failed to fetch sheets: {}", err)),
    };

    if json {
        #[derive(serde::Serialize)]
        struct SheetsOutput {
            sheets: Vec<String>,
        }
        println!("{}", serde_json::to_string_pretty(&SheetsOutput { sheets })?);
        return Ok(());
    }

    if sheets.is_empty() {
        println!("\n  {}\n", "No sheets available".bright_black());
    } else {
        println!();
        for sheet in &sheets {
            println!("  {}", sheet);
        }
        println!();
    }
    Ok(())
}

fn run_calendar(year: Option<i32>, month: Option<u32>) -> Result<()> {
    let today = CalendarDate::today();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        anyhow::bail!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR);
    }
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be between 1 and 12");
    }

    print!("{}", render_month(NavigationCursor { year, month0: month - 1 }, today));
    Ok(())
}

fn render_month(cursor: NavigationCursor, today: CalendarDate) -> String {
    let mut out = format!("\n  {} {}\n  Su Mo Tu We Th Fr Sa\n", month_name(cursor.month0), cursor.year);
    let is_current = today.year() == cursor.year && today.month() == cursor.month0 + 1;

    for week in month_grid(cursor) {
        out.push(' ');
        for cell in week {
            match cell {
                Some(day) if is_current && day == today.day() => {
                    out.push_str(&format!(" {}", format!("{:>2}", day).reversed()));
                }
                Some(day) => out.push_str(&format!(" {:>2}", day)),
                None => out.push_str("   "),
            }
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_month_layout() {
        let cursor = NavigationCursor { year: 2024, month0: 1 };
        let today = CalendarDate::from_ymd(1999, 1, 1).unwrap();
        let out = render_month(cursor, today);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "  February 2024");
        assert_eq!(lines[2], "  Su Mo Tu We Th Fr Sa");
        // Feb 1 2024 is a Thursday.
        assert_eq!(lines[3], format!("{}1  2  3", " ".repeat(15)));
        assert!(out.contains("29"));
        assert!(!out.contains("30"));
    }

    #[test]
    fn test_calculate_input_fills_form() {
        let form = CalculateInput {
            departure: "15/06/2020".into(),
            return_date: "2023-09-01".into(),
            avg_days: "100".into(),
            ctc: String::new(),
            passive_income: "5000".into(),
        }
        .into_form();

        let request = form.validate().unwrap();
        assert_eq!(request.departure, "2020-06-15");
        assert_eq!(request.return_date, "2023-09-01");
        assert_eq!(request.passive_income, Some(5000));
        assert_eq!(request.ctc, None);
    }

    #[test]
    fn test_cli_parses_negative_amounts() {
        let cli = Cli::try_parse_from([
            "rnor",
            "calculate",
            "--departure",
            "01/04/2021",
            "--return",
            "01/04/2022",
            "--avg-days",
            "-3",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Calculate { avg_days, .. }) => assert_eq!(avg_days, "-3"),
            _ => panic!("expected calculate"),
        }
    }
}
