//! Screen: owns the real terminal and flushes frames to it.
//!
//! Keeps the last presented frame and writes only glyphs that changed.
//! Encoding is split from writing so it can be tested without a terminal.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::frame::{Frame, Rgb, Style};

pub struct Screen {
    out: io::Stdout,
    shown: Option<Frame>,
    buf: Vec<u8>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            shown: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.flush()
    }

    /// Undo [`Screen::enter`]. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Terminal size in cells.
    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    /// Forget the last frame so the next present redraws everything.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    pub fn present(&mut self, frame: &Frame) -> Result<()> {
        self.buf.clear();
        let same_size = self
            .shown
            .as_ref()
            .is_some_and(|s| s.width() == frame.width() && s.height() == frame.height());
        match self.shown.as_mut() {
            Some(shown) if same_size => {
                encode_changes(shown, frame, &mut self.buf)?;
                shown.clone_from(frame);
            }
            _ => {
                encode_all(frame, &mut self.buf)?;
                self.shown = Some(frame.clone());
            }
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a full redraw of `frame` into `out`.
pub fn encode_all(frame: &Frame, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style = None;
    for y in 0..frame.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..frame.width() {
            let g = frame.get(x, y).unwrap_or_default();
            set_style(out, &mut style, g.style)?;
            out.queue(Print(g.ch))?;
        }
    }
    out.queue(ResetColor)?;
    Ok(())
}

/// Encode only the glyphs that differ between `prev` and `next`.
///
/// Both frames must have the same size. Returns the number of glyphs
/// written.
pub fn encode_changes(prev: &Frame, next: &Frame, out: &mut Vec<u8>) -> Result<usize> {
    let mut style = None;
    let mut written = 0;
    for y in 0..next.height() {
        // Cursor is already in place while a run of changes continues.
        let mut in_run = false;
        for x in 0..next.width() {
            let g = next.get(x, y).unwrap_or_default();
            if prev.get(x, y) == Some(g) {
                in_run = false;
                continue;
            }
            if !in_run {
                out.queue(cursor::MoveTo(x, y))?;
                in_run = true;
            }
            set_style(out, &mut style, g.style)?;
            out.queue(Print(g.ch))?;
            written += 1;
        }
    }
    if written > 0 {
        out.queue(ResetColor)?;
    }
    Ok(written)
}

fn set_style(out: &mut Vec<u8>, current: &mut Option<Style>, style: Style) -> Result<()> {
    if *current == Some(style) {
        return Ok(());
    }
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(color(style.fg)))?;
    out.queue(SetBackgroundColor(color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    *current = Some(style);
    Ok(())
}

fn color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}
