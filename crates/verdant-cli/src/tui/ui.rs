//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │ 🌱 Verdant   mode: mock   every 5s   #42                 │
//! ├────────────┬────────────┬────────────┬───────────────────┤
//! │ Temp 21.5  │ Hum 51.0 % │ Soil 47 %  │ Light 820 lx      │
//! ├────────────┴──────────┬─┴────────────┴───────────────────┤
//! │ ╭ history ────────────│  [soil gauge     47%]            │
//! │ │ ~~~~/\~~~ temp      │  [light gauge   820 lx]          │
//! │ │ ___/  \__ humidity  │  source: mock generator          │
//! ├───────────────────────┴──────────────────────────────────┤
//! │ Growth advice: Soil too dry — consider watering soon.    │
//! ├──────────────────────────────────────────────────────────┤
//! │ q quit  f fetch  p pause  m mock/live  +/- interval      │
//! └──────────────────────────────────────────────────────────┘

use ratatui::{prelude::*, widgets::*};

use verdant_core::{Condition, DashboardSnapshot, METRICS, Metric, SampleOrigin};

use crate::commands::sample::format_value;

pub fn draw(f: &mut Frame, snap: &DashboardSnapshot, paused: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // readout tiles
            Constraint::Min(8),    // chart + gauges
            Constraint::Length(8), // advice
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], snap, paused);
    draw_tiles(f, rows[1], snap);
    draw_middle(f, rows[2], snap);
    draw_advice(f, rows[3], snap);
    draw_keys(f, rows[4]);
}

fn draw_title(f: &mut Frame, area: Rect, snap: &DashboardSnapshot, paused: bool) {
    let mode = if snap.use_mock {
        "mock".to_string()
    } else if snap.endpoint_url.is_empty() {
        "live (no endpoint)".to_string()
    } else {
        format!("live · {}", snap.endpoint_url)
    };
    let secs = snap.poll_interval.as_secs_f64();
    let state = if paused { "  ⏸ paused" } else { "" };

    let origin = snap
        .latest
        .as_ref()
        .map(|s| s.origin.label())
        .unwrap_or("waiting");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(Line::from(vec![
            Span::styled(" 🌱 Verdant ", Style::default().bold().fg(Color::Green)),
            Span::raw(format!(" mode: {mode}  every {secs:.0}s ")),
            Span::styled(
                format!(" {origin}  #{}{state} ", snap.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_tiles(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let reading = snap.latest.as_ref().map(|s| &s.reading);
    for (metric, col) in METRICS.into_iter().zip(cols.iter()) {
        let value = reading.and_then(|r| r.metric(metric));
        let condition = snap.advisory.as_ref().and_then(|a| a.condition(metric));

        let text = format_value(value, metric);
        let tile = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().bold().fg(condition_color(condition)),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(metric.label()));
        f.render_widget(tile, *col);
    }
}

fn draw_middle(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_chart(f, cols[0], snap);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(cols[1]);

    draw_gauge(f, right[0], snap, Metric::Soil, 100.0);
    draw_gauge(f, right[1], snap, Metric::Light, 2000.0);
    draw_source_info(f, right[2], snap);
}

/// Temperature and humidity share the rolling line chart; gaps in a
/// series simply contribute no point.
fn draw_chart(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let temp_points = chart_points(snap.series(Metric::Temperature));
    let hum_points = chart_points(snap.series(Metric::Humidity));
    let (y_lo, y_hi) = y_bounds(&temp_points, &hum_points);

    let datasets = vec![
        Dataset::default()
            .name("temp °C")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightRed))
            .data(&temp_points),
        Dataset::default()
            .name("humidity %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightBlue))
            .data(&hum_points),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" history · last {} polls ", snap.capacity)),
        )
        .x_axis(Axis::default().bounds([0.0, snap.capacity.saturating_sub(1).max(1) as f64]))
        .y_axis(
            Axis::default()
                .bounds([y_lo, y_hi])
                .labels([format!("{y_lo:.0}"), format!("{y_hi:.0}")]),
        );
    f.render_widget(chart, area);
}

fn draw_gauge(f: &mut Frame, area: Rect, snap: &DashboardSnapshot, metric: Metric, scale: f64) {
    let value = snap
        .latest
        .as_ref()
        .and_then(|s| s.reading.metric(metric));
    let condition = snap.advisory.as_ref().and_then(|a| a.condition(metric));

    let ratio = value.map(|v| (v / scale).clamp(0.0, 1.0)).unwrap_or(0.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(metric.label()))
        .gauge_style(Style::default().fg(condition_color(condition)))
        .ratio(ratio)
        .label(format_value(value, metric));
    f.render_widget(gauge, area);
}

fn draw_source_info(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let source = match snap.latest.as_ref().map(|s| &s.origin) {
        None => "waiting for first poll".to_string(),
        Some(SampleOrigin::Live) => "live sensor".to_string(),
        Some(SampleOrigin::Mock) => "mock generator".to_string(),
        Some(SampleOrigin::Fallback(reason)) => {
            format!("mock fallback — {}", reason.describe())
        }
    };
    let info = Paragraph::new(vec![
        Line::from(format!("source: {source}")),
        Line::from(format!("polls: {}", snap.tick_count)),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL).title("Session"));
    f.render_widget(info, area);
}

/// Tips shown are capped at 4; the engine's full list stays available to
/// other renderers.
const MAX_TIPS_SHOWN: usize = 4;

fn draw_advice(f: &mut Frame, area: Rect, snap: &DashboardSnapshot) {
    let mut lines: Vec<Line> = Vec::new();

    match &snap.advisory {
        None => lines.push(Line::from(Span::styled(
            "Waiting for the first reading...",
            Style::default().fg(Color::DarkGray),
        ))),
        Some(advisory) => {
            let headline_color = if advisory.is_nominal() {
                Color::Green
            } else {
                worst_condition_color(advisory.conditions.values().copied())
            };
            lines.push(Line::from(Span::styled(
                advisory.headline.clone(),
                Style::default().bold().fg(headline_color),
            )));
            for tip in advisory.tips.iter().take(MAX_TIPS_SHOWN) {
                lines.push(Line::from(format!("• {tip}")));
            }
        }
    }

    if let Some(sample) = &snap.latest
        && let SampleOrigin::Fallback(reason) = sample.origin
    {
        lines.push(Line::from(Span::styled(
            format!("using mock values — {}", reason.describe()),
            Style::default().fg(Color::Yellow),
        )));
    }

    let advice = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Growth advice "));
    f.render_widget(advice, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let keys = Paragraph::new(" q quit   f fetch now   p pause   m mock/live   +/- interval   i presets")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(keys, area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn chart_points(series: &[Option<f64>]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

fn y_bounds(a: &[(f64, f64)], b: &[(f64, f64)]) -> (f64, f64) {
    let values: Vec<f64> = a.iter().chain(b).map(|&(_, y)| y).collect();
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo - 2.0, hi + 2.0)
}

fn condition_color(condition: Option<Condition>) -> Color {
    match condition {
        Some(Condition::Good) => Color::Green,
        Some(Condition::Watch) => Color::Yellow,
        Some(Condition::Alert) => Color::Red,
        None => Color::DarkGray,
    }
}

fn worst_condition_color(conditions: impl Iterator<Item = Condition>) -> Color {
    let mut worst = Color::Green;
    for condition in conditions {
        match condition {
            Condition::Alert => return Color::Red,
            Condition::Watch => worst = Color::Yellow,
            Condition::Good => {}
        }
    }
    worst
}
