//! Drawing the estimator with ratatui.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};

use estimator_core::WizardStep;
use estimator_core::wizard::IndicatorState;

use super::screen::Screen;
use crate::view::WizardView;

struct Colors;

impl Colors {
    const PRIMARY: Color = Color::Cyan;
    const ACCENT: Color = Color::Yellow;
    const SUCCESS: Color = Color::Green;
    const MUTED: Color = Color::DarkGray;
    const HIGHLIGHT_BG: Color = Color::Rgb(40, 40, 60);
}

const STEP_LABELS: [&str; 3] = ["1 Service", "2 Amount", "3 Location"];

const HELP: &str = "↑/↓ choose  Enter select  ←/→ or drag to swipe  1-3 jump  r reset  q quit";

pub fn draw(
    f: &mut Frame,
    screen: &mut Screen,
) {
    let view = screen.view();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // indicators
            Constraint::Length(3), // progress
            Constraint::Length(3), // title
            Constraint::Min(6),    // choices or result
            Constraint::Length(view.summary.len() as u16 + 2),
            Constraint::Length(1), // status
            Constraint::Length(1), // help
        ])
        .split(f.area());

    render_indicators(f, chunks[0], &view);
    render_progress(f, chunks[1], view.progress_percent);
    render_title(f, chunks[2], view.title);

    match view.result.as_deref() {
        Some(total) => render_result(f, chunks[3], total),
        None => render_choices(f, chunks[3], &view, screen),
    }
    screen.set_layout(chunks[0], chunks[3]);

    render_summary(f, chunks[4], &view);
    render_status(f, chunks[5], screen.status());
    let help = Paragraph::new(HELP)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Colors::MUTED));
    f.render_widget(help, chunks[6]);
}

fn indicator_style(state: IndicatorState) -> Style {
    match state {
        IndicatorState::Pending => Style::default().fg(Colors::MUTED),
        IndicatorState::Active => Style::default()
            .fg(Colors::ACCENT)
            .add_modifier(Modifier::BOLD),
        IndicatorState::Completed => Style::default().fg(Colors::SUCCESS),
    }
}

fn render_indicators(
    f: &mut Frame,
    area: Rect,
    view: &WizardView,
) {
    let block = Block::default().borders(Borders::ALL).title("Estimate");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(inner);

    for ((label, state), column) in STEP_LABELS.iter().zip(view.indicators).zip(columns.iter()) {
        let marker = match state {
            IndicatorState::Completed => "✓ ",
            IndicatorState::Active => "● ",
            IndicatorState::Pending => "○ ",
        };
        let line = Line::from(vec![
            Span::styled(marker, indicator_style(state)),
            Span::styled(*label, indicator_style(state)),
        ]);
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), *column);
    }
}

fn render_progress(
    f: &mut Frame,
    area: Rect,
    percent: u16,
) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Colors::PRIMARY))
        .percent(percent.min(100));
    f.render_widget(gauge, area);
}

fn render_title(
    f: &mut Frame,
    area: Rect,
    title: &str,
) {
    let title = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Colors::PRIMARY));
    f.render_widget(title, area);
}

fn render_choices(
    f: &mut Frame,
    area: Rect,
    view: &WizardView,
    screen: &mut Screen,
) {
    let width = usize::from(area.width.saturating_sub(8));
    let items: Vec<ListItem> = view
        .choices
        .iter()
        .map(|choice| {
            let marker = if choice.selected { "✓" } else { " " };
            let label_width = width.saturating_sub(choice.detail.len() + 2);
            let style = if choice.selected {
                Style::default().fg(Colors::SUCCESS)
            } else {
                Style::default()
            };
            ListItem::new(format!(
                "{marker} {:<label_width$}{}",
                choice.label, choice.detail
            ))
            .style(style)
        })
        .collect();

    let step_name = match view.step {
        WizardStep::SelectService => "Service",
        WizardStep::SelectAmount => "Amount",
        WizardStep::SelectLocation => "Location",
        WizardStep::Result => "Result",
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(step_name))
        .highlight_style(
            Style::default()
                .bg(Colors::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, screen.list_state_mut());
}

fn render_result(
    f: &mut Frame,
    area: Rect,
    total: &str,
) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Estimated price", Style::default().fg(Colors::MUTED))),
        Line::from(Span::styled(
            total.to_string(),
            Style::default()
                .fg(Colors::SUCCESS)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to start over",
            Style::default().fg(Colors::MUTED),
        )),
    ];
    let result = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Result"))
        .alignment(Alignment::Center);
    f.render_widget(result, area);
}

fn render_summary(
    f: &mut Frame,
    area: Rect,
    view: &WizardView,
) {
    let lines: Vec<Line> = view
        .summary
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<10}"), Style::default().fg(Colors::MUTED)),
                Span::raw(value.clone()),
            ])
        })
        .collect();
    let summary = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Your answers"))
        .wrap(Wrap { trim: true });
    f.render_widget(summary, area);
}

fn render_status(
    f: &mut Frame,
    area: Rect,
    status: Option<&str>,
) {
    if let Some(status) = status {
        let status = Paragraph::new(status)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Colors::ACCENT));
        f.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use estimator_core::{Catalog, CatalogEntry, EntryKind};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::config::AppConfig;

    fn screen() -> Screen {
        let catalog = Catalog::from_entries(&[
            CatalogEntry::new(EntryKind::Service, "single-item", "Single Item", "50", 1),
            CatalogEntry::new(EntryKind::Amount, "small-load", "Small Load", "1.5", 1),
            CatalogEntry::new(EntryKind::Location, "downtown", "Downtown", "20", 1),
        ])
        .unwrap();
        Screen::new(catalog, &AppConfig::default())
    }

    fn rendered(screen: &mut Screen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|f| draw(f, screen)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn draws_first_step() {
        let mut screen = screen();

        let text = rendered(&mut screen);

        assert!(text.contains("What do you need removed?"));
        assert!(text.contains("Single Item"));
        assert!(text.contains("$50"));
    }

    #[test]
    fn draw_records_choice_area_for_clicks() {
        use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

        let mut screen = screen();
        rendered(&mut screen);

        // Layout: indicators 0-2, progress 3-5, title 6-8, choices from row 9.
        for kind in [
            MouseEventKind::Down(MouseButton::Left),
            MouseEventKind::Up(MouseButton::Left),
        ] {
            screen.handle_mouse(MouseEvent {
                kind,
                column: 5,
                row: 10,
                modifiers: KeyModifiers::NONE,
            });
        }

        assert_eq!(screen.wizard().state().current_step, WizardStep::SelectAmount);
    }
}
