use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rnor_core::{
    ApiClient, ApiError, CalculationService, CalendarDate, DateField, FormState, LocalClassifier,
    YearResult,
};
use tokio::runtime::Runtime;
use tracing::debug;

use super::event::Event;
use super::themes::{Theme, ThemeName};
use super::ui::dialog::{DatePickerDialog, DialogStack};
use crate::settings::Settings;

/// Configuration for TUI initialization
pub struct TuiConfig {
    pub theme: Option<String>,
    pub api_url: String,
    pub local: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Departure,
    Return,
    AvgDays,
    PassiveIncome,
    Ctc,
    Calculate,
}

impl Focus {
    pub fn all() -> &'static [Focus] {
        &[
            Focus::Departure,
            Focus::Return,
            Focus::AvgDays,
            Focus::PassiveIncome,
            Focus::Ctc,
            Focus::Calculate,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Focus::Departure => DateField::Departure.label(),
            Focus::Return => DateField::Return.label(),
            Focus::AvgDays => "Average days in India",
            Focus::PassiveIncome => "Passive income",
            Focus::Ctc => "CTC",
            Focus::Calculate => "Calculate",
        }
    }

    pub fn date_field(&self) -> Option<DateField> {
        match self {
            Focus::Departure => Some(DateField::Departure),
            Focus::Return => Some(DateField::Return),
            _ => None,
        }
    }

    pub fn next(self) -> Focus {
        let all = Self::all();
        let idx = all.iter().position(|&f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Focus {
        let all = Self::all();
        let idx = all.iter().position(|&f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Picker selection handed back from the dialog.
pub type PickedDate = Rc<RefCell<Option<(DateField, CalendarDate)>>>;

pub struct App {
    pub should_quit: bool,
    pub theme: Theme,
    pub settings: Settings,
    pub form: FormState,
    pub focus: Focus,
    pub dialogs: DialogStack,
    pub local: bool,

    picked: PickedDate,
    client: ApiClient,
    runtime: Runtime,
    events: mpsc::Sender<Event>,

    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub terminal_width: u16,
    pub terminal_height: u16,

    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: TuiConfig, events: mpsc::Sender<Event>) -> Result<Self> {
        let settings = Settings::load();
        let theme_name: ThemeName = config
            .theme
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_else(|| settings.theme_name());
        let theme = Theme::from_name(theme_name);

        Ok(Self {
            should_quit: false,
            dialogs: DialogStack::new(theme.clone()),
            theme,
            settings,
            form: FormState::new(),
            focus: Focus::Departure,
            local: config.local,
            picked: Rc::new(RefCell::new(None)),
            client: ApiClient::new(config.api_url),
            runtime: Runtime::new()?,
            events,
            status_message: None,
            status_message_time: None,
            terminal_width: 80,
            terminal_height: 24,
            spinner_frame: 0,
        })
    }

    pub fn api_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 20;

        if let Some(status_time) = self.status_message_time {
            if status_time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }

        if self.dialogs.is_active() {
            self.dialogs.handle_key(key.code);
            self.apply_picked_date();
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
            }
            KeyCode::Enter => match self.focus.date_field() {
                Some(field) => self.open_date_picker(field),
                None => self.submit(),
            },
            KeyCode::F(2) => {
                if let Some(field) = self.focus.date_field() {
                    self.open_date_picker(field);
                }
            }
            KeyCode::Char('c') => self.submit(),
            KeyCode::Char('p') => self.cycle_theme(),
            KeyCode::Char('r') => self.reset_form(),
            KeyCode::Char('l') => self.toggle_local(),
            KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '/' || ch == '-' => {
                self.edit_focused(|text| text.push(ch));
            }
            KeyCode::Backspace => {
                self.edit_focused(|text| {
                    text.pop();
                });
            }
            KeyCode::Delete => {
                self.edit_focused(String::clear);
            }
            _ => {}
        }
        false
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
    }

    pub fn on_calculated(&mut self, result: Result<Vec<YearResult>, ApiError>) {
        self.form.finish_submit(result);
        if self.form.error.is_none() {
            let count = self.form.results.len();
            self.set_status(&format!("Calculated {} financial years", count));
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        if let Some(field) = self.focus.date_field() {
            let mut text = self.form.date_input(field).display_text();
            edit(&mut text);
            self.form.date_input_mut(field).set_text(text);
            return;
        }

        let buffer = match self.focus {
            Focus::AvgDays => &mut self.form.avg_days,
            Focus::PassiveIncome => &mut self.form.passive_income,
            Focus::Ctc => &mut self.form.ctc,
            _ => return,
        };
        edit(buffer);
    }

    fn open_date_picker(&mut self, field: DateField) {
        let selected = self.form.date_input(field).value;
        let dialog = DatePickerDialog::new(field, selected, CalendarDate::today(), self.picked.clone());
        self.dialogs.show(Box::new(dialog));
    }

    fn apply_picked_date(&mut self) {
        let picked = self.picked.borrow_mut().take();
        if let Some((field, date)) = picked {
            self.form.date_input_mut(field).pick(date);
            self.set_status(&format!("{}: {}", field.label(), date.display_long()));
        }
    }

    fn submit(&mut self) {
        let request = match self.form.begin_submit() {
            Ok(request) => request,
            Err(err) => {
                self.set_status(&err.to_string());
                return;
            }
        };

        let tx = self.events.clone();
        let client = self.client.clone();
        let local = self.local;
        debug!(local, "dispatching calculation");

        self.runtime.spawn(async move {
            let result = if local {
                LocalClassifier.calculate(&request).await
            } else {
                client.calculate(&request).await
            };
            let _ = tx.send(Event::Calculated(result));
        });
    }

    fn reset_form(&mut self) {
        if self.form.calculating {
            self.set_status("Wait for the calculation to finish");
            return;
        }
        self.form.reset();
        self.focus = Focus::Departure;
        self.set_status("Form cleared");
    }

    fn toggle_local(&mut self) {
        self.local = !self.local;
        if self.local {
            self.set_status("Mode: local estimate");
        } else {
            let message = format!("Mode: {}", self.api_url());
            self.set_status(&message);
        }
    }

    fn cycle_theme(&mut self) {
        let new_theme = self.theme.name.next();
        self.theme = Theme::from_name(new_theme);
        self.dialogs.set_theme(self.theme.clone());
        self.settings.set_theme(new_theme);
        if let Err(e) = self.settings.save() {
            self.set_status(&format!(
                "Theme: {} (save failed: {})",
                new_theme.as_str(),
                e
            ));
        } else {
            self.set_status(&format!("Theme: {}", new_theme.as_str()));
        }
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_message_time = Some(Instant::now());
    }

    pub fn is_narrow(&self) -> bool {
        self.terminal_width < 90
    }
}
