use crossterm::event::KeyCode;
use ratatui::{layout::Rect, Frame};

use crate::tui::themes::Theme;

use super::{overlay, DialogContent, DialogResult};

/// Open dialogs, topmost last. Only the top one is drawn and receives keys.
pub struct DialogStack {
    stack: Vec<Box<dyn DialogContent>>,
    theme: Theme,
}

impl DialogStack {
    pub fn new(theme: Theme) -> Self {
        Self {
            stack: Vec::new(),
            theme,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn show(&mut self, dialog: Box<dyn DialogContent>) {
        self.stack.push(dialog);
    }

    pub fn close(&mut self) {
        self.stack.pop();
    }

    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn render(&self, frame: &mut Frame, viewport: Rect) {
        let Some(top) = self.stack.last() else {
            return;
        };

        overlay::render_backdrop(frame, viewport);

        let (width, height) = top.desired_size(viewport);
        let area = overlay::centered_rect(viewport, width, height);

        overlay::render_dialog_surface(frame, area, &self.theme);
        top.render(frame, area, &self.theme);
    }

    /// Returns true if a dialog consumed the key.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if key == KeyCode::Esc && self.is_active() {
            self.close();
            return true;
        }

        let Some(top) = self.stack.last_mut() else {
            return false;
        };
        match top.handle_key(key) {
            DialogResult::None => {}
            DialogResult::Close => self.close(),
        }
        true
    }
}
