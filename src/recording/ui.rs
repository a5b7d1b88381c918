//! Terminal user interface for the voice memo screen.
//!
//! Renders the three session screens - idle, recording with the scrolling bar
//! visualization, and playing with the position readout - and translates key
//! presses into screen commands for the record loop.

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::Paragraph,
};
use std::error::Error;
use std::io::{stdout, Stdout};
use std::time::Duration;

use crate::config::VisualizationConfig;
use crate::recording::visualizations::{bar_height, BarBuffer};

const BAR_COLOR: Color = Color::Rgb(206, 224, 220);
const AGGREGATE_COLOR: Color = Color::Rgb(120, 140, 136);
const HINT_COLOR: Color = Color::Rgb(185, 207, 212);

/// User input command on the memo screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenCommand {
    /// Continue (no key pressed)
    Continue,
    /// Advance the session: start, stop or reset depending on state (Space/Enter)
    Advance,
    /// Pause/resume playback ('p')
    TogglePause,
    /// Seek backwards while playing (Left arrow)
    SeekBack,
    /// Seek forwards while playing (Right arrow)
    SeekForward,
    /// Exit the screen (Escape, 'q' or Ctrl+C)
    Quit,
}

/// Terminal UI for the voice memo screen.
pub struct RecorderTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    viz: VisualizationConfig,
}

impl RecorderTui {
    /// Creates a new TUI instance and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new(viz: VisualizationConfig) -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(RecorderTui { terminal, viz })
    }

    /// Renders the idle screen: the armed record control.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_idle(&mut self) -> Result<(), Box<dyn Error>> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            let (content_area, footer_area) = split_footer(area);

            let body = Paragraph::new(vec![
                Line::from(Span::styled("vmemo", Style::default().fg(BAR_COLOR))),
                Line::from(""),
                Line::from(Span::styled(
                    "press space to record",
                    Style::default().fg(HINT_COLOR),
                )),
            ])
            .alignment(Alignment::Center);

            let centered = Rect {
                x: content_area.x,
                y: content_area.y + content_area.height / 2,
                width: content_area.width,
                height: content_area.height.saturating_sub(content_area.height / 2),
            };
            frame.render_widget(body, centered);

            render_footer(frame, footer_area, "space: record  /  q: quit");
        })?;

        Ok(())
    }

    /// Renders the recording screen: the scrolling bar visualization and the
    /// elapsed-time footer.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_recording(
        &mut self,
        bars: &BarBuffer,
        offset: f32,
        elapsed: Duration,
    ) -> Result<(), Box<dyn Error>> {
        // Copy geometry before the draw closure to avoid borrow issues
        let viz = self.viz.clone();

        self.terminal.draw(|frame| {
            let area = frame.area();
            let (content_area, footer_area) = split_footer(area);

            render_bars(frame, content_area, &viz, bars, offset);

            let elapsed_secs = elapsed.as_secs();
            let indicator = Span::styled("● ", Style::default().fg(Color::Red));
            let duration_span = Span::raw(format!("{}:{:02}", elapsed_secs / 60, elapsed_secs % 60));
            let hint_span = Span::raw("  /  space: stop  /  q: quit");
            let footer = Paragraph::new(Line::from(vec![indicator, duration_span, hint_span]))
                .style(Style::default().fg(HINT_COLOR).bg(Color::Rgb(0, 0, 0)));
            frame.render_widget(footer, footer_area);
        })?;

        Ok(())
    }

    /// Renders the playing screen: the position readout and the reset control.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_playing(
        &mut self,
        readout: &str,
        paused: bool,
        finished: bool,
    ) -> Result<(), Box<dyn Error>> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            let (content_area, footer_area) = split_footer(area);

            let status = if finished {
                "done"
            } else if paused {
                "paused"
            } else {
                "playing"
            };

            let body = Paragraph::new(vec![
                Line::from(Span::styled(status, Style::default().fg(HINT_COLOR))),
                Line::from(""),
                Line::from(Span::styled(
                    readout.to_string(),
                    Style::default()
                        .fg(BAR_COLOR)
                        .add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center);

            let centered = Rect {
                x: content_area.x,
                y: content_area.y + content_area.height / 2,
                width: content_area.width,
                height: content_area.height.saturating_sub(content_area.height / 2),
            };
            frame.render_widget(body, centered);

            render_footer(
                frame,
                footer_area,
                "space: reset  /  p: pause  /  ← →: seek  /  q: quit",
            );
        })?;

        Ok(())
    }

    /// Processes user input and returns the appropriate screen command.
    ///
    /// # Returns
    /// - `Continue` if no key or an unrecognized key was pressed
    /// - `Advance` if Space or Enter was pressed
    /// - `TogglePause` / `SeekBack` / `SeekForward` for playback controls
    /// - `Quit` if Escape, 'q' or Ctrl+C was pressed
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> Result<ScreenCommand, Box<dyn Error>> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        tracing::debug!("Space/Enter pressed: advancing session");
                        ScreenCommand::Advance
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: quitting");
                        ScreenCommand::Quit
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: quitting");
                        ScreenCommand::Quit
                    }
                    KeyCode::Char('p') => ScreenCommand::TogglePause,
                    KeyCode::Left => ScreenCommand::SeekBack,
                    KeyCode::Right => ScreenCommand::SeekForward,
                    _ => ScreenCommand::Continue,
                });
            }
        }
        Ok(ScreenCommand::Continue)
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> Result<(), Box<dyn Error>> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Splits the terminal area into content and a one-line footer.
fn split_footer(area: Rect) -> (Rect, Rect) {
    let footer_height = 1;
    let content = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.saturating_sub(footer_height),
    };
    let footer = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(footer_height),
        width: area.width,
        height: footer_height,
    };
    (content, footer)
}

fn render_footer(frame: &mut Frame, area: Rect, text: &str) {
    let footer = Paragraph::new(Line::from(Span::raw(text.to_string())))
        .style(Style::default().fg(HINT_COLOR).bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(footer, area);
}

/// Paints the bar strip into a window centered in the content area.
///
/// The strip is laid out left to right in chronological order and shifted
/// left by the animation offset; the leading aggregate bar is widened by the
/// folded width so it absorbs everything scrolled off. Cells outside the
/// window are clipped, which is what makes the strip appear to scroll.
fn render_bars(
    frame: &mut Frame,
    area: Rect,
    viz: &VisualizationConfig,
    bars: &BarBuffer,
    offset: f32,
) {
    if area.height == 0 || area.width == 0 || bars.is_empty() {
        return;
    }

    let window_width = viz.display_width.min(area.width);
    let window_x = area.x + (area.width - window_width) / 2;

    let max_height = area.height as f32;
    let mid_height = max_height / 2.0;
    let min_height = 1.0;

    // Strip coordinates: x positions relative to the window's left edge
    let mut x = -(offset.round() as i32);
    for bar in bars.bars() {
        let fill_width = if bar.aggregate {
            viz.bar_width + bars.aggregate_width()
        } else {
            viz.bar_width
        };

        let height = bar_height(bar.level, min_height, mid_height, max_height).round() as u16;
        let height = height.clamp(1, area.height);
        let top = area.y + (area.height - height) / 2;

        let color = if bar.aggregate {
            AGGREGATE_COLOR
        } else {
            BAR_COLOR
        };
        let style = Style::default().fg(color).bg(Color::Rgb(0, 0, 0));

        for column in x..x + fill_width as i32 {
            if column < 0 || column >= window_width as i32 {
                continue;
            }
            let cell_x = window_x + column as u16;
            for row in top..top + height {
                frame.buffer_mut().set_string(cell_x, row, "█", style);
            }
        }

        x += (fill_width + viz.bar_gap) as i32;
    }
}
