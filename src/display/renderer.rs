use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::Print;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{term_width, theme};
use crate::catalog::IndustryCatalog;
use crate::protocol::types::StrategyRequest;
use crate::session::state::ResultState;

/// Prints result snapshots as they arrive.
///
/// Snapshots carry the whole strategy so far. The renderer remembers what it
/// already printed and only writes the new tail, falling back to a full
/// reprint when the backend rewrites earlier text.
pub struct Renderer<W: Write = io::Stdout> {
    /// Strategy text already on screen.
    printed: String,
    /// Last status line shown.
    status: Option<String>,
    /// Whether the terminal block was printed for the current submission.
    finished: bool,
    out: W,
}

impl Default for Renderer<io::Stdout> {
    fn default() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Renderer<io::Stdout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Write> Renderer<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            printed: String::new(),
            status: None,
            finished: false,
            out: writer,
        }
    }

    pub fn render_header(&mut self, request: &StrategyRequest) {
        let title = format!("Sales strategy for {} ({})", request.client, request.region);
        queue!(
            self.out,
            Print(theme::heading().apply(title)),
            Print("\n"),
            Print(theme::dim().apply(&request.industry)),
            Print("\n\n"),
        )
        .ok();
        self.out.flush().ok();
    }

    pub fn render_industries(&mut self, catalog: &IndustryCatalog) {
        let label_width = catalog.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
        let default = catalog.default_selection();
        for (label, id) in catalog.iter() {
            let marker = if Some(id) == default { "*" } else { " " };
            let pad = " ".repeat(label_width.saturating_sub(label.width()));
            let row = format!("{marker} {label}{pad}  ");
            let room = term_width().saturating_sub(row.width());
            queue!(
                self.out,
                Print(&row),
                Print(theme::dim().apply(truncate_to_width(id, room))),
                Print("\n"),
            )
            .ok();
        }
        self.out.flush().ok();
    }

    /// Render one snapshot. Snapshots after the terminal one are ignored.
    pub fn render(&mut self, state: &ResultState) {
        if self.finished {
            return;
        }
        if !state.success {
            self.render_failure(state.error.as_deref().unwrap_or_default());
            return;
        }
        if state.status != self.status {
            if let Some(status) = state.status.as_deref()
                && self.printed.is_empty()
            {
                let line = truncate_to_width(&format!("… {status}"), term_width());
                queue!(self.out, Print(theme::dim().apply(line)), Print("\n")).ok();
            }
            self.status.clone_from(&state.status);
        }
        if let Some(text) = state.strategy.as_deref()
            && !text.is_empty()
        {
            self.render_text(text);
        }
        if state.is_terminal() {
            self.render_done(state.elapsed_secs);
        }
        self.out.flush().ok();
    }

    fn render_text(&mut self, text: &str) {
        if text == self.printed {
            return;
        }
        if let Some(tail) = text.strip_prefix(self.printed.as_str()) {
            queue!(self.out, Print(tail)).ok();
        } else {
            self.end_line();
            queue!(
                self.out,
                Print(theme::dim().apply("--- revised ---")),
                Print("\n"),
                Print(text),
            )
            .ok();
        }
        self.printed.clear();
        self.printed.push_str(text);
    }

    fn render_done(&mut self, elapsed_secs: u64) {
        self.end_line();
        queue!(
            self.out,
            Print("\n"),
            Print(theme::result_line().apply("Done")),
            Print(theme::dim().apply(format!(" · {elapsed_secs}s"))),
            Print("\n"),
        )
        .ok();
        self.finished = true;
    }

    fn render_failure(&mut self, message: &str) {
        self.end_line();
        if !self.printed.is_empty() {
            queue!(self.out, Print("\n")).ok();
        }
        queue!(
            self.out,
            Print(theme::error_heading().apply("Guardrail Triggered")),
            Print("\n"),
            Print(theme::error().apply(message)),
            Print("\n"),
        )
        .ok();
        self.finished = true;
        self.out.flush().ok();
    }

    /// Terminate a partially printed line.
    fn end_line(&mut self) {
        if !self.printed.is_empty() && !self.printed.ends_with('\n') {
            queue!(self.out, Print("\n")).ok();
        }
    }

    pub fn render_warning(&mut self, warning: &str) {
        self.end_line();
        queue!(
            self.out,
            Print(theme::dim().apply(format!("[warn] {warning}"))),
            Print("\n"),
        )
        .ok();
        self.out.flush().ok();
    }

    pub fn render_interrupted(&mut self) {
        self.end_line();
        queue!(
            self.out,
            Print("\n"),
            Print(theme::dim().apply("[interrupted]")),
            Print("\n"),
        )
        .ok();
        self.finished = true;
        self.out.flush().ok();
    }
}

/// Truncate a string to fit within `max_width` display columns, appending `...` if truncated.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let ellipsis_width = 3; // "..."
    let mut width = 0;
    let mut cut_pos = 0;
    let mut result = String::new();
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            if max_width >= ellipsis_width {
                result.truncate(cut_pos);
                result.push_str("...");
            } else {
                result.clear();
            }
            return result;
        }
        result.push(ch);
        width += ch_width;
        if width <= max_width.saturating_sub(ellipsis_width) {
            cut_pos = result.len();
        }
    }
    result
}
