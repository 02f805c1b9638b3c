//! Window layout. Pure projection of [`AppState`] onto ratatui widgets.

use aeolus_core::{ForecastEntry, WeatherRecord};
use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

use crate::{
    app::{AppState, Notice},
    theme::Theme,
};

pub fn draw(f: &mut Frame, state: &AppState, theme: &Theme, today: NaiveDate) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

    let [body, footer] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [left, right] =
        Layout::horizontal([Constraint::Ratio(5, 6), Constraint::Ratio(1, 6)]).areas(body);

    render_main_panel(f, left, state, theme, today);
    render_forecast(f, right, state, theme);
    render_footer(f, footer, state, theme);

    if let Some(buffer) = &state.search {
        render_search(f, area, buffer, theme);
    }
    if let Some(notice) = &state.notice {
        render_notice(f, area, notice, theme);
    }
}

fn placeholder(state: &AppState) -> &'static str {
    if state.loading.is_some() { "Loading..." } else { "--" }
}

fn render_main_panel(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, today: NaiveDate) {
    f.render_widget(Block::default().style(Style::default().bg(theme.panel)), area);

    let inner = area.inner(Margin::new(2, 1));
    let [header, _, card, stats] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(5),
    ])
    .areas(inner);

    render_header(f, header, state, theme);
    render_card(f, card, state, theme, today);
    render_stats(f, stats, state.record.as_ref(), theme);
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [left, center, right] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(area);
    let base = Style::default().bg(theme.panel).fg(theme.text);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[/]", base.add_modifier(Modifier::BOLD)),
            Span::raw(" Search"),
        ]))
        .style(base),
        left,
    );

    let (city, country) = match &state.record {
        Some(record) => (record.city.as_str(), record.country.as_str()),
        None => (placeholder(state), placeholder(state)),
    };
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(city, base.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(country, base.fg(theme.muted))),
        ])
        .alignment(Alignment::Center)
        .style(base),
        center,
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[m]", base.add_modifier(Modifier::BOLD)),
            Span::raw(format!(" {}", theme.mode)),
        ]))
        .alignment(Alignment::Right)
        .style(base),
        right,
    );
}

fn render_card(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, today: NaiveDate) {
    let style = Style::default().bg(theme.card).fg(theme.card_text);
    let block = Block::bordered().border_type(BorderType::Rounded).style(style);

    let mut lines = vec![Line::from(format!("Today, {}", today.format("%b %-d"))), Line::default()];

    if let Some(icon) = &state.icon {
        lines.extend(icon.rows().iter().map(|row| Line::from(row.clone())));
        lines.push(Line::default());
    }

    match &state.record {
        Some(record) => {
            lines.push(Line::from(Span::styled(
                format!("{}°C", record.temperature),
                style.add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(record.description.clone()));
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!(
                    "  ↓ {}°C  |  ↑ {}°C  ",
                    record.temperature_min, record.temperature_max
                ),
                style.bg(theme.card_inset),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                placeholder(state),
                style.add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("  ↓ --°  |  ↑ --°  ", style.bg(theme.card_inset))));
        }
    }

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_stats(f: &mut Frame, area: Rect, record: Option<&WeatherRecord>, theme: &Theme) {
    let columns: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).spacing(1).areas(area);

    let values = match record {
        Some(r) => [
            format!("{}%", r.humidity),
            format!("{} m/s", r.wind_speed),
            format!("{}°C", r.real_feel),
        ],
        None => ["--%".to_string(), "-- m/s".to_string(), "--°C".to_string()],
    };
    let labels = ["Humidity", "Wind Speed", "Real Feel"];

    let style = Style::default().bg(theme.stat_card).fg(theme.text);
    for ((column, label), value) in columns.into_iter().zip(labels).zip(values) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(label, style.fg(theme.muted))),
            Line::from(Span::styled(value, style.add_modifier(Modifier::BOLD))),
        ])
        .alignment(Alignment::Center)
        .block(Block::bordered().border_type(BorderType::Rounded).style(style));
        f.render_widget(card, column);
    }
}

fn forecast_lines<'a>(entries: &'a [ForecastEntry], theme: &Theme) -> Vec<Line<'a>> {
    let base = Style::default().bg(theme.stat_card).fg(theme.text);
    let mut lines = Vec::with_capacity(entries.len() * 4);

    for entry in entries {
        lines.push(Line::from(Span::styled(
            entry.date_time.format("%a %H:%M").to_string(),
            base.add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("{}°C {}", entry.temperature, entry.description)));
        lines.push(Line::from(Span::styled(
            format!("↓ {}°  ↑ {}°", entry.temperature_min, entry.temperature_max),
            base.fg(theme.muted),
        )));
        lines.push(Line::default());
    }

    lines
}

fn render_forecast(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let style = Style::default().bg(theme.stat_card).fg(theme.text);
    let block = Block::bordered().title(" Forecast ").style(style);

    let lines = match &state.forecast {
        Some(entries) if !entries.is_empty() => forecast_lines(entries, theme),
        Some(_) => vec![Line::from("No forecast data")],
        None if state.record.is_some() => {
            vec![Line::from(Span::styled("Unavailable", style.fg(theme.muted)))]
        }
        None => vec![Line::from(placeholder(state))],
    };

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let base = Style::default().bg(theme.background).fg(theme.muted);
    let key = base.fg(theme.text).add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" /", key),
        Span::raw(" search  "),
        Span::styled("m", key),
        Span::raw(" light/dark  "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ];

    if let Some(city) = &state.loading {
        spans.push(Span::raw(format!("   Loading {city}...")));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_search(f: &mut Frame, area: Rect, buffer: &str, theme: &Theme) {
    let popup = centered(area, 44, 5);
    let style = Style::default().bg(theme.stat_card).fg(theme.text);

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(format!("> {buffer}_")),
            Line::default(),
            Line::from(Span::styled("Enter search · Esc close", style.fg(theme.muted))),
        ])
        .block(Block::bordered().border_type(BorderType::Rounded).title(" Search city ").style(style)),
        popup,
    );
}

fn render_notice(f: &mut Frame, area: Rect, notice: &Notice, theme: &Theme) {
    let popup = centered(area, 64, 8);
    let style = Style::default().bg(theme.stat_card).fg(theme.text);

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(notice.message.clone()),
            Line::default(),
            Line::from(Span::styled("[ OK ]", style.add_modifier(Modifier::BOLD)))
                .alignment(Alignment::Center),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(format!(" {} ", notice.title))
                .border_style(style.fg(theme.error))
                .style(style),
        ),
        popup,
    );
}
