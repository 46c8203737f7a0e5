/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::sim::session::DisplaySink;
use crate::sim::view::{Glyph, RenderModel};
use crate::sim::world::{Outcome, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::Reset, bg: Color::Reset, bold: false };

    /// Differs from any real cell, so every position gets diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta, bold: false };

    fn new(ch: char, fg: Color, bg: Color, bold: bool) -> Self {
        Cell { ch, fg, bg, bold }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, Color::Reset, bold));
        }
    }
}

// ── Renderer ──

/// Each board cell = 2 terminal columns, so the grid looks square-ish.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MAP_COL: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const FRAME_FG: Color = Color::DarkGrey;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    /// Printed on the normal screen after cleanup.
    farewell: Vec<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(8192, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            farewell: vec![],
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.writer, terminal::EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        self.sync_size(true)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        for line in self.farewell.drain(..) {
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()
    }

    /// Track terminal size; force a full repaint when it changed.
    fn sync_size(&mut self, force: bool) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if force || tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate()?;
        }
        Ok(())
    }

    fn invalidate(&mut self) -> io::Result<()> {
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, ResetColor, Clear(ClearType::All))
    }

    /// Diff `front` against `back`, emit, swap.
    fn present(&mut self) -> io::Result<()> {
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::Reset;
        let mut last_bg = Color::Reset;
        let mut last_bold = false;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.bold != last_bold {
                    // Attribute::Reset also drops colours; re-apply below
                    let attr = if cell.bold { Attribute::Bold } else { Attribute::Reset };
                    queue!(self.writer, SetAttribute(attr))?;
                    if !cell.bold {
                        last_fg = Color::Reset;
                        last_bg = Color::Reset;
                        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;
                    }
                    last_bold = cell.bold;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, m: &RenderModel) {
        let buf_w = self.front.width;

        // ── HUD row ──
        let hearts: String = (0..m.max_hp).map(|i| if i < m.hp { '♥' } else { '·' }).collect();
        let hud = format!(
            " Level {}   HP {} {}/{}   Score {}/{}   Steps {} ",
            m.level, hearts, m.hp, m.max_hp, m.score, m.coin_target, m.step_count,
        );
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG, false));
        }
        for (i, ch) in hud.chars().enumerate() {
            self.front.set(i, HUD_ROW, Cell::new(ch, Color::White, HUD_BG, false));
        }

        // ── Board with frame ──
        let inner_w = m.width * CELL_W;
        let top = MAP_ROW;
        let bottom = MAP_ROW + m.height + 1;
        let left = MAP_COL;
        let right = MAP_COL + inner_w + 1;

        self.front.set(left, top, Cell::new('┌', FRAME_FG, Color::Reset, false));
        self.front.set(right, top, Cell::new('┐', FRAME_FG, Color::Reset, false));
        self.front.set(left, bottom, Cell::new('└', FRAME_FG, Color::Reset, false));
        self.front.set(right, bottom, Cell::new('┘', FRAME_FG, Color::Reset, false));
        for x in left + 1..right {
            self.front.set(x, top, Cell::new('─', FRAME_FG, Color::Reset, false));
            self.front.set(x, bottom, Cell::new('─', FRAME_FG, Color::Reset, false));
        }
        for gy in 0..m.height {
            let row = top + 1 + gy;
            self.front.set(left, row, Cell::new('│', FRAME_FG, Color::Reset, false));
            self.front.set(right, row, Cell::new('│', FRAME_FG, Color::Reset, false));
            for gx in 0..m.width {
                self.compose_cell(m.glyph(gx, gy), left + 1 + gx * CELL_W, row);
            }
        }

        // ── Message bar ──
        let msg_row = bottom + 1;
        if !m.message.is_empty() {
            let fg = match m.phase {
                Phase::GameOverPrompt => Color::Red,
                Phase::LevelAdvance => Color::Green,
                _ => Color::Yellow,
            };
            self.front.put_str(1, msg_row, &m.message, fg, true);
        }

        // ── Help bar ──
        let help = match m.phase {
            Phase::GameOverPrompt => " y: Restart   any other key: Quit",
            _ => " w/a/s/d: Move   r: Restart   q: Quit",
        };
        self.front.put_str(0, msg_row + 2, help, Color::DarkGrey, false);
    }

    /// Write the visual for one board cell at (col, row).
    fn compose_cell(&mut self, glyph: Glyph, col: usize, row: usize) {
        let (fg, bg, bold) = match glyph {
            Glyph::Player => (Color::Black, Color::Green, true),
            Glyph::Hazard => (Color::Red, Color::Reset, true),
            Glyph::Item => (Color::Blue, Color::Reset, true),
            Glyph::Coin => (Color::Yellow, Color::Reset, true),
            Glyph::Empty => (Color::Reset, Color::Reset, false),
        };
        self.front.set(col, row, Cell::new(glyph.symbol(), fg, bg, bold));
        self.front.set(col + 1, row, Cell::new(' ', Color::Reset, bg, false));
    }

    fn compose_instructions(&mut self) {
        let white = Color::White;
        let dim = Color::Grey;
        let title = Color::Rgb { r: 255, g: 220, b: 50 };

        self.front.put_str(2, 1, "Welcome to the Coin Collector Game!", title, true);
        self.front.put_str(2, 3, "Objective: Collect coins to advance levels while avoiding fires.", white, false);
        self.front.put_str(2, 5, "Controls:", white, true);
        let controls = [
            "  - Move Up: W",
            "  - Move Left: A",
            "  - Move Down: S",
            "  - Move Right: D",
            "  - Quit Game: Q",
            "  - Restart Game: R",
        ];
        for (i, line) in controls.iter().enumerate() {
            self.front.put_str(2, 6 + i, line, dim, false);
        }

        self.front.put_str(2, 13, "Symbols:", white, true);
        let symbols = [
            (Glyph::Player, "Player"),
            (Glyph::Hazard, "Fire"),
            (Glyph::Item, "Healing Item"),
            (Glyph::Coin, "Coin"),
        ];
        for (i, (glyph, label)) in symbols.iter().enumerate() {
            let row = 14 + i;
            self.front.put_str(2, row, "  - ", dim, false);
            self.compose_cell(*glyph, 6, row);
            self.front.put_str(8, row, &format!(": {label}"), dim, false);
        }

        self.front.put_str(2, 19, "Press any key to start the game...", Color::Green, false);
    }
}

impl DisplaySink for Renderer {
    fn show_instructions(&mut self) -> io::Result<()> {
        self.sync_size(false)?;
        self.front.clear();
        self.compose_instructions();
        self.present()
    }

    fn render(&mut self, model: &RenderModel) -> io::Result<()> {
        self.sync_size(false)?;

        // Phase change (or level change) → clean repaint
        if self.last_phase != Some(model.phase) {
            self.invalidate()?;
            self.last_phase = Some(model.phase);
        }

        self.front.clear();
        self.compose_game(model);
        self.present()
    }

    fn finish(&mut self, model: &RenderModel, outcome: Outcome) -> io::Result<()> {
        self.farewell = farewell_lines(model, outcome);
        Ok(())
    }
}

fn farewell_lines(m: &RenderModel, outcome: Outcome) -> Vec<String> {
    let headline = match outcome {
        Outcome::Quit => "Exiting the game...",
        Outcome::Victory => "Congratulations! You have completed all levels.",
        Outcome::GameOver => "Game Over! You ran out of HP.",
    };
    vec![
        headline.to_string(),
        format!("Your total score: {}", m.score),
        format!("Reached level {} in {} steps.", m.level, m.step_count),
    ]
}
