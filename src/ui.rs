pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::clock::Remaining;
use crate::engine::Snapshot;
use crate::scoring::{Mark, WordOutcome};
use crate::session::{FinishReason, SessionState, TestMode};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Lines of already-typed text kept above the active line
const LINES_ABOVE_CURSOR: usize = 1;

struct Styles {
    bold: Style,
    correct: Style,
    wrong: Style,
    pending: Style,
    cursor: Style,
    hint: Style,
}

impl Styles {
    fn new() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let pending = Style::default().patch(bold).add_modifier(Modifier::DIM);
        Self {
            bold,
            correct: Style::default().patch(bold).fg(Color::Green),
            wrong: Style::default().patch(bold).fg(Color::Red),
            cursor: Style::default()
                .patch(pending)
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            pending,
            hint: Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        }
    }
}

impl Widget for &Snapshot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let styles = Styles::new();

        match self.state {
            SessionState::Finished(reason) if reason != FinishReason::UserQuit => {
                render_results(self, reason, &styles, area, buf)
            }
            _ => render_typing(self, &styles, area, buf),
        }
    }
}

fn header_text(snapshot: &Snapshot) -> String {
    let mode = snapshot.mode.name().to_uppercase();
    let left = match snapshot.remaining {
        Remaining::Time(left) => format!("{:02}s left", left.as_secs()),
        Remaining::Words(left) => format!("{left} words left"),
    };
    format!("Mode: {mode} | {left} | ESC quit, TAB restart")
}

fn stats_text(snapshot: &Snapshot) -> String {
    format!(
        "WPM: {:.1} | Acc: {:.0}% | Time: {:02}s",
        snapshot.wpm,
        snapshot.accuracy,
        snapshot.elapsed.as_secs()
    )
}

fn render_typing(snapshot: &Snapshot, styles: &Styles, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // live stats
            Constraint::Length(1), // padding
            Constraint::Min(1),    // words
            Constraint::Length(1), // hint
        ])
        .split(area);

    Paragraph::new(Span::styled(header_text(snapshot), styles.bold)).render(chunks[0], buf);
    Paragraph::new(stats_text(snapshot)).render(chunks[1], buf);

    let width = chunks[3].width as usize;
    let (lines, current_line) = wrap_words(word_cells(snapshot, styles), width);
    let first = current_line.saturating_sub(LINES_ABOVE_CURSOR);
    let visible: Vec<Line> = lines
        .into_iter()
        .skip(first)
        .take(chunks[3].height as usize)
        .collect();
    Paragraph::new(visible).render(chunks[3], buf);

    if snapshot.state == SessionState::Created {
        Paragraph::new(Span::styled("Start typing to begin...", styles.hint))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

/// One word of the running text, pre-styled
struct WordCell<'a> {
    spans: Vec<Span<'a>>,
    width: usize,
    is_current: bool,
}

fn word_cells<'a>(snapshot: &'a Snapshot, styles: &Styles) -> Vec<WordCell<'a>> {
    let mut cells: Vec<WordCell> = snapshot
        .history
        .iter()
        .map(|outcome| submitted_word(outcome, styles))
        .collect();

    if !snapshot.state.is_finished() {
        cells.push(current_word(snapshot, styles));
    }

    cells.extend(snapshot.upcoming.iter().map(|word| WordCell {
        spans: vec![Span::styled(word.as_str(), styles.pending)],
        width: word.width(),
        is_current: false,
    }));

    cells
}

fn submitted_word<'a>(outcome: &WordOutcome, styles: &Styles) -> WordCell<'a> {
    let typed: Vec<char> = outcome.typed.chars().collect();
    let target: Vec<char> = outcome.target.chars().collect();

    let mut spans: Vec<Span> = target
        .iter()
        .enumerate()
        .map(|(i, &expected)| {
            let style = match typed.get(i) {
                Some(&c) if c == expected => styles.correct,
                Some(_) => styles.wrong,
                None => styles.pending,
            };
            Span::styled(expected.to_string(), style)
        })
        .collect();
    spans.extend(
        typed
            .iter()
            .skip(target.len())
            .map(|c| Span::styled(c.to_string(), styles.wrong)),
    );

    WordCell {
        width: spans.iter().map(|s| s.content.width()).sum(),
        spans,
        is_current: false,
    }
}

fn current_word<'a>(snapshot: &Snapshot, styles: &Styles) -> WordCell<'a> {
    let target: Vec<char> = snapshot.current_word.chars().collect();
    let typed: Vec<char> = snapshot.typed.chars().collect();

    let mut spans: Vec<Span> = target
        .iter()
        .enumerate()
        .map(|(i, &expected)| {
            let style = match snapshot.marks.get(i) {
                Some(Mark::Correct) => styles.correct,
                Some(Mark::Incorrect) => styles.wrong,
                None if i == snapshot.marks.len() => styles.cursor,
                None => styles.pending,
            };
            Span::styled(expected.to_string(), style)
        })
        .collect();
    spans.extend(
        typed
            .iter()
            .skip(target.len())
            .map(|c| Span::styled(c.to_string(), styles.wrong)),
    );
    if typed.len() >= target.len() {
        // cursor sits on the separator
        spans.push(Span::styled(" ", styles.cursor));
    }

    WordCell {
        width: spans.iter().map(|s| s.content.width()).sum(),
        spans,
        is_current: true,
    }
}

/// Greedy word wrap. Returns the lines and the index of the line holding
/// the active word.
fn wrap_words(cells: Vec<WordCell<'_>>, width: usize) -> (Vec<Line<'_>>, usize) {
    let mut lines: Vec<Line> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0;
    let mut current_line = 0;

    for cell in cells {
        let gap = usize::from(used > 0);
        if used > 0 && used + gap + cell.width > width {
            lines.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        } else if gap > 0 {
            spans.push(Span::raw(" "));
            used += 1;
        }
        if cell.is_current {
            current_line = lines.len();
        }
        used += cell.width;
        spans.extend(cell.spans);
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }

    (lines, current_line)
}

fn render_results(
    snapshot: &Snapshot,
    reason: FinishReason,
    styles: &Styles,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // char counts
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let title = match reason {
        FinishReason::TimeUp => "Time's up",
        _ => "Done",
    };
    Paragraph::new(Span::styled(title, styles.bold))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let limit_secs = match snapshot.mode {
        TestMode::Time { seconds } => seconds as f64,
        TestMode::Words { .. } => snapshot.elapsed.as_secs_f64(),
    };
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(&snapshot.wpm_series, limit_secs);

    let tuples: Vec<(f64, f64)> = snapshot
        .wpm_series
        .iter()
        .map(|&p| <(f64, f64)>::from(p))
        .collect();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", styles.bold),
                    Span::styled(charting::format_label(overall_duration), styles.bold),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", styles.bold),
                    Span::styled(charting::format_label(highest_wpm), styles.bold),
                ]),
        )
        .render(chunks[1], buf);

    let consistency = snapshot
        .consistency
        .map_or_else(|| "-".to_string(), |sd| format!("{sd:.2}"));
    Paragraph::new(Span::styled(
        format!(
            "Results: WPM {:.1} | Acc {:.0}% | {} sd | {} words in {:.1}s",
            snapshot.wpm,
            snapshot.accuracy,
            consistency,
            snapshot.stats.words_completed,
            snapshot.elapsed.as_secs_f64()
        ),
        styles.bold,
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Line::from(vec![
        Span::styled(snapshot.stats.correct_chars.to_string(), styles.correct),
        Span::raw(" correct / "),
        Span::styled(snapshot.stats.incorrect_chars.to_string(), styles.wrong),
        Span::raw(" incorrect chars"),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "Press TAB to restart or ESC to quit",
        styles.hint,
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}
