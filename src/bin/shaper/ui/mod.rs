//! TUI module for shaper
//!
//! A keyboard-driven curve editor: one chart of the live transfer function
//! plus a status line for the selected vertex and the curve-wide modes.

mod curve_view;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use std::time::Duration;

use shaper_dsp::curve::WarpType;
use shaper_dsp::rt::CurveEditor;

use curve_view::render_curve;

/// Vertical nudge per keypress, in curve units.
const Y_STEP: f32 = 0.05;
/// Horizontal nudge per keypress, in curve units.
const X_STEP: f32 = 0.02;
/// Tension change per keypress.
const TENSION_STEP: f32 = 10.0;
/// Warp amount change per keypress.
const WARP_STEP: f32 = 0.05;

/// UI application state
pub struct UiApp {
    editor: CurveEditor,
    /// Index of the selected vertex
    selected: usize,
    /// Outcome of the last edit, shown in the status bar
    status: String,
    should_quit: bool,
}

impl UiApp {
    pub fn new(editor: CurveEditor) -> Self {
        Self {
            editor,
            selected: 0,
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn editor(&self) -> &CurveEditor {
        &self.editor
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        self.status.clear();

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Right => {
                let last = self.editor.curve().vertex_count() - 1;
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Up => self.nudge_selected(0.0, Y_STEP),
            KeyCode::Down => self.nudge_selected(0.0, -Y_STEP),
            KeyCode::Char('h') => self.nudge_selected(-X_STEP, 0.0),
            KeyCode::Char('l') => self.nudge_selected(X_STEP, 0.0),
            KeyCode::Char('a') => self.insert_midpoint(),
            KeyCode::Char('d') | KeyCode::Delete => {
                match self.editor.remove_vertex(self.selected) {
                    Ok(()) => self.selected = self.selected.saturating_sub(1),
                    Err(e) => self.status = e.to_string(),
                }
            }
            KeyCode::Char('[') => self.adjust_tension(-TENSION_STEP),
            KeyCode::Char(']') => self.adjust_tension(TENSION_STEP),
            KeyCode::Char('w') => {
                let next = next_warp_type(self.editor.warp().kind);
                self.editor.set_warp_type(next);
            }
            KeyCode::Char('-') => self.adjust_warp_amount(-WARP_STEP),
            KeyCode::Char('=') => self.adjust_warp_amount(WARP_STEP),
            KeyCode::Char('b') => {
                let bipolar = !self.editor.curve().bipolar_mode();
                self.editor.set_bipolar_mode(bipolar);
            }
            KeyCode::Char('r') => {
                self.editor.reset();
                self.selected = 0;
            }
            _ => {}
        }
    }

    fn nudge_selected(&mut self, dx: f32, dy: f32) {
        let warp = self.editor.warp();
        let Some(vertex) = self.editor.curve().vertex_at(self.selected).copied() else {
            return;
        };

        let x = vertex.reported_x(warp) + dx;
        let y = vertex.reported_y(warp) + dy;

        if let Err(e) = self.editor.set_vertex_position(self.selected, x, y) {
            self.status = e.to_string();
        }
    }

    /// Insert a vertex halfway along the segment to the right of the
    /// selection, on the current curve.
    fn insert_midpoint(&mut self) {
        let curve = self.editor.curve();
        let warp = self.editor.warp();

        let segment = self.selected.min(curve.vertex_count() - 2);
        let left = curve.vertex_at(segment).map(|v| v.reported_x(warp));
        let right = curve.vertex_at(segment + 1).map(|v| v.reported_x(warp));

        let (Some(left), Some(right)) = (left, right) else {
            return;
        };

        let x = (left + right) / 2.0;
        let y = curve.evaluate(x);

        if let Err(e) = self.editor.insert_vertex(x, y) {
            self.status = e.to_string();
        }
    }

    fn adjust_tension(&mut self, delta: f32) {
        let Some(vertex) = self.editor.curve().vertex_at(self.selected) else {
            return;
        };

        // The engine stores tension as given; the editor owns the clamp.
        let tension = (vertex.tension + delta).clamp(-100.0, 100.0);
        if let Err(e) = self.editor.set_tension(self.selected, tension) {
            self.status = e.to_string();
        }
    }

    fn adjust_warp_amount(&mut self, delta: f32) {
        let amount = (self.editor.warp().amount + delta).clamp(0.0, 1.0);
        self.editor.set_warp_amount(amount);
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(10),   // Curve chart
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(self.status_line()).style(Style::default().fg(Color::White)),
            chunks[0],
        );

        render_curve(frame, chunks[1], self.editor.curve(), self.selected);

        let help = Paragraph::new(
            " [Q] Quit  [<-/->] Select  [Up/Down/H/L] Move  [A] Add  [D] Delete  \
             [[/]] Tension  [W/-/=] Warp  [B] Bipolar  [R] Reset",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }

    fn status_line(&self) -> String {
        if !self.status.is_empty() {
            return format!(" {}", self.status);
        }

        let curve = self.editor.curve();
        let warp = self.editor.warp();
        let vertex = curve.vertex_at(self.selected);

        match vertex {
            Some(v) => format!(
                " vertex {}/{}  x {:.3}  y {:.3}  tension {:.0}  |  warp {:?} {:.2}  |  {}",
                self.selected + 1,
                curve.vertex_count(),
                v.reported_x(warp),
                v.reported_y(warp),
                v.tension,
                warp.kind,
                warp.amount,
                if curve.bipolar_mode() {
                    "bipolar"
                } else {
                    "unipolar"
                },
            ),
            None => String::from(" no vertex selected"),
        }
    }
}

fn next_warp_type(kind: WarpType) -> WarpType {
    match kind {
        WarpType::None => WarpType::BendPlus,
        WarpType::BendPlus => WarpType::BendMinus,
        WarpType::BendMinus => WarpType::BendPlusMinus,
        WarpType::BendPlusMinus => WarpType::SkewPlus,
        WarpType::SkewPlus => WarpType::SkewMinus,
        WarpType::SkewMinus => WarpType::SkewPlusMinus,
        WarpType::SkewPlusMinus => WarpType::None,
    }
}
