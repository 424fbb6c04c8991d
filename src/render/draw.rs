use super::layout::{GridGeometry, SceneLayout, ScreenPosition, PANEL_HEIGHT, PANEL_WIDTH};
use super::terminal::TerminalError;
use crate::{
    animation::{Color, Frame, WaveSnapshot},
    config::ThemeConfig,
    controls::{Command, KeyBindingsConfig},
};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate},
};
use std::io::Write;
use strum::IntoEnumIterator;
use unicode_width::UnicodeWidthStr;

const PANEL_LABEL: &str = "BOUNCES";
const TOO_SMALL_NOTICE: &str = "terminal too small";

/// Draws animation frames into a terminal.
///
/// Only the cells that changed since the previous frame are redrawn, unless the screen was
/// invalidated by a resize.
pub struct GridRenderer {
    theme: ThemeConfig,
    controls: String,
    layout: SceneLayout,
    last_cells: Vec<Option<Color>>,
    last_bounces: Option<u64>,
    last_speed: Option<f32>,
    invalidated: bool,
}

impl GridRenderer {
    pub fn new(theme: ThemeConfig, bindings: &KeyBindingsConfig, layout: SceneLayout) -> Self {
        Self {
            theme,
            controls: control_bar_text(bindings),
            layout,
            last_cells: Vec::new(),
            last_bounces: None,
            last_speed: None,
            invalidated: true,
        }
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Use a new layout. The next draw repaints the whole screen.
    pub fn relayout(&mut self, layout: SceneLayout) {
        self.layout = layout;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.invalidated = true;
        self.last_cells.clear();
        self.last_bounces = None;
        self.last_speed = None;
    }

    pub fn draw<W: Write>(&mut self, out: &mut W, frame: &Frame, snapshot: &WaveSnapshot) -> Result<(), TerminalError> {
        queue!(out, BeginSynchronizedUpdate)?;
        if self.invalidated {
            queue!(out, ResetColor, Clear(ClearType::All))?;
        }
        match self.layout.grid {
            Some(geometry) => {
                if self.invalidated {
                    self.draw_surface(out, &geometry)?;
                }
                self.draw_cells(out, &geometry, frame)?;
            }
            None if self.invalidated => self.draw_notice(out)?,
            None => (),
        };
        if let Some(origin) = self.layout.panel_origin {
            if self.invalidated {
                self.draw_panel_border(out, origin)?;
            }
            if self.last_bounces != Some(snapshot.bounces) {
                self.draw_panel_count(out, origin, snapshot.bounces)?;
                self.last_bounces = Some(snapshot.bounces);
            }
        }
        if self.last_speed != Some(snapshot.speed) {
            self.draw_control_bar(out, snapshot)?;
            self.last_speed = Some(snapshot.speed);
        }
        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()?;
        self.invalidated = false;
        Ok(())
    }

    fn draw_surface<W: Write>(&self, out: &mut W, geometry: &GridGeometry) -> Result<(), TerminalError> {
        let origin = self.layout.grid_origin;
        let blank = " ".repeat(geometry.width as usize);
        queue!(out, SetBackgroundColor(self.theme.surface.into()))?;
        for row in 0..geometry.height {
            queue!(out, MoveTo(origin.column, origin.row + row), Print(&blank))?;
        }
        Ok(())
    }

    fn draw_cells<W: Write>(
        &mut self,
        out: &mut W,
        geometry: &GridGeometry,
        frame: &Frame,
    ) -> Result<(), TerminalError> {
        let total = frame.columns() * frame.rows();
        if self.last_cells.len() != total {
            self.last_cells = vec![None; total];
        }
        let origin = self.layout.grid_origin;
        let fill = " ".repeat(geometry.fill_width as usize);
        let mut current_color = None;
        for (x, y, cell) in frame.iter() {
            let color = cell.resolve(self.theme.background, self.theme.surface);
            let index = y * frame.columns() + x;
            if self.last_cells[index] == Some(color) {
                continue;
            }
            self.last_cells[index] = Some(color);
            if current_color != Some(color) {
                queue!(out, SetBackgroundColor(color.into()))?;
                current_color = Some(color);
            }
            let column = origin.column + x as u16 * geometry.cell_width;
            let row = origin.row + y as u16 * geometry.cell_height;
            for offset in 0..geometry.fill_height {
                queue!(out, MoveTo(column, row + offset), Print(&fill))?;
            }
        }
        Ok(())
    }

    fn draw_notice<W: Write>(&self, out: &mut W) -> Result<(), TerminalError> {
        let window = self.layout.window;
        let text = truncate(TOO_SMALL_NOTICE, window.columns as usize);
        let column = centered_offset(&text, window.columns as usize) as u16;
        let row = self.layout.control_bar_row / 2;
        queue!(out, MoveTo(column, row), SetForegroundColor(self.theme.label.into()), Print(text))?;
        Ok(())
    }

    fn draw_panel_border<W: Write>(&self, out: &mut W, origin: ScreenPosition) -> Result<(), TerminalError> {
        let inner = (PANEL_WIDTH - 2) as usize;
        let horizontal = "─".repeat(inner);
        let blank = " ".repeat(inner);
        queue!(
            out,
            SetBackgroundColor(self.theme.surface.into()),
            SetForegroundColor(self.theme.background.into()),
            MoveTo(origin.column, origin.row),
            Print(format!("┌{horizontal}┐")),
        )?;
        for row in 1..PANEL_HEIGHT - 1 {
            queue!(out, MoveTo(origin.column, origin.row + row), Print(format!("│{blank}│")))?;
        }
        queue!(out, MoveTo(origin.column, origin.row + PANEL_HEIGHT - 1), Print(format!("└{horizontal}┘")))?;

        let label_column = origin.column + 1 + centered_offset(PANEL_LABEL, inner) as u16;
        queue!(
            out,
            SetForegroundColor(self.theme.label.into()),
            MoveTo(label_column, origin.row + 1),
            Print(PANEL_LABEL)
        )?;
        Ok(())
    }

    fn draw_panel_count<W: Write>(
        &self,
        out: &mut W,
        origin: ScreenPosition,
        bounces: u64,
    ) -> Result<(), TerminalError> {
        let inner = (PANEL_WIDTH - 2) as usize;
        let count = truncate(&bounces.to_string(), inner);
        let offset = centered_offset(&count, inner);
        let line = format!("{:offset$}{count}{:rest$}", "", "", rest = inner - offset - count.width());
        queue!(
            out,
            SetBackgroundColor(self.theme.surface.into()),
            SetForegroundColor(self.theme.text.into()),
            SetAttribute(Attribute::Bold),
            MoveTo(origin.column + 1, origin.row + 3),
            Print(line),
            SetAttribute(Attribute::Reset),
        )?;
        Ok(())
    }

    fn draw_control_bar<W: Write>(&self, out: &mut W, snapshot: &WaveSnapshot) -> Result<(), TerminalError> {
        let window = self.layout.window;
        if window.rows == 0 {
            return Ok(());
        }
        let text = format!("{}   speed {:.2}", self.controls, snapshot.speed);
        let text = truncate(&text, window.columns as usize);
        let column = centered_offset(&text, window.columns as usize) as u16;
        queue!(
            out,
            ResetColor,
            MoveTo(0, self.layout.control_bar_row),
            Clear(ClearType::CurrentLine),
            MoveTo(column, self.layout.control_bar_row),
            SetForegroundColor(self.theme.label.into()),
            Print(text)
        )?;
        Ok(())
    }
}

fn control_bar_text(bindings: &KeyBindingsConfig) -> String {
    Command::iter()
        .filter_map(|command| {
            let keys: Vec<String> = bindings.bindings(command).iter().map(ToString::to_string).collect();
            if keys.is_empty() { None } else { Some(format!("[{}] {command}", keys.join("/"))) }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn centered_offset(text: &str, width: usize) -> usize {
    width.saturating_sub(text.width()) / 2
}

fn truncate(text: &str, width: usize) -> String {
    let mut output = String::new();
    for c in text.chars() {
        let mut next = output.clone();
        next.push(c);
        if next.width() > width {
            break;
        }
        output = next;
    }
    output
}
