//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`, plus
//! the layout maths the runtime needs to map mouse clicks back to widgets.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, format_time};
use crate::lyrics::scroll_offset;
use crate::player::Controller;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space", "play/pause");
    map.insert("n/p", "next/prev");
    map.insert("m", "play mode");
    map.insert("+/-", "volume");
    map.insert("0-9", "jump");
    map.insert("tab", "playlist");
    map.insert("/", "search");
    map.insert("o", "import folder");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["space", "n/p", "h/l", "+/-", "0-9", "m", "tab", "/", "o", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "h/l" {
                Some(format!("[h/l] seek -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub now_playing: Rect,
    pub progress: Rect,
    pub lyrics: Rect,
    pub playlist: Option<Rect>,
    pub footer: Rect,
}

pub fn areas(area: Rect, drawer_open: bool) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);

    let (lyrics, playlist) = if drawer_open {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[3]);
        (cols[0], Some(cols[1]))
    } else {
        (chunks[3], None)
    };

    Areas {
        header: chunks[0],
        now_playing: chunks[1],
        progress: chunks[2],
        lyrics,
        playlist,
        footer: chunks[4],
    }
}

/// Fraction of the progress bar at `column`, if the click landed on it.
pub fn seek_fraction_at(progress: Rect, column: u16, row: u16) -> Option<f64> {
    let inner = Block::default().borders(Borders::ALL).inner(progress);
    if inner.width == 0
        || row < inner.y
        || row >= inner.y + inner.height
        || column < inner.x
        || column >= inner.x + inner.width
    {
        return None;
    }
    let offset = (column - inner.x) as f64;
    let span = (inner.width.saturating_sub(1)).max(1) as f64;
    Some((offset / span).clamp(0.0, 1.0))
}

/// Visible window of a list of `total` rows in `height` lines, centred on
/// `selected` when possible. Returns `(start, end)`.
fn list_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Catalog index of the playlist row at screen `row`, if any.
pub fn playlist_hit(area: Rect, visible: &[usize], selected: usize, row: u16) -> Option<usize> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if row < inner.y || row >= inner.y + inner.height {
        return None;
    }
    let sel_pos = visible.iter().position(|&i| i == selected).unwrap_or(0);
    let (start, end) = list_window(visible.len(), inner.height as usize, sel_pos);
    let index = start + (row - inner.y) as usize;
    (index < end).then(|| visible[index])
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, player: &Controller, seek_seconds: u64) {
    let areas = areas(frame.area(), app.drawer_open);
    let palette = app.palette;
    let themed = Style::default()
        .bg(palette.primary())
        .fg(palette.foreground());

    // Header
    let header = Paragraph::new(app.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().bg(palette.secondary()).fg(palette.foreground()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" dreamplay ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    // Now playing
    let (title, artist) = match player.current_track() {
        Some(t) => (t.title.as_str(), t.artist.as_str()),
        None => ("Nothing playing", ""),
    };
    let state = if player.is_idle() {
        "Idle"
    } else if player.is_playing() {
        "Playing"
    } else {
        "Paused"
    };
    let mut info = vec![
        Span::raw(format!("MODE: {}", player.mode().label())),
        Span::raw(" • "),
        Span::raw(format!("VOL: {:.0}%", player.volume() * 100.0)),
        Span::raw(" • "),
        Span::raw(state),
    ];
    if let Some(dir) = &app.current_dir {
        info.push(Span::raw(" • "));
        info.push(Span::raw(format!("Dir: {}", dir.display())));
    }
    let now_playing = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(if artist.is_empty() { "" } else { " - " }),
            Span::raw(artist),
        ]),
        Line::from(info),
    ])
    .style(themed)
    .block(Block::bordered().padding(left_pad()).title(" now playing "))
    .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, areas.now_playing);

    // Progress
    let elapsed = format_time(player.position());
    let total = player.duration().map(format_time).unwrap_or_else(|| "-:--".to_string());
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(palette.primary()).bg(palette.secondary()))
        .ratio(player.progress().unwrap_or(0.0))
        .label(format!("{elapsed} / {total}"));
    frame.render_widget(gauge, areas.progress);

    draw_lyrics(frame, app, areas.lyrics);

    if let Some(area) = areas.playlist {
        draw_playlist(frame, app, player, area);
    }

    // Footer
    let mut footer_lines = vec![Line::from(controls_text(seek_seconds))];
    if let Some(status) = &app.status {
        footer_lines.push(Line::from(status.as_str().italic()));
    }
    let footer = Paragraph::new(footer_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);

    if let Some(input) = &app.import_input {
        let popup = centered_rect_sized(64, 3, frame.area());
        frame.render_widget(Clear, popup);
        let prompt = Paragraph::new(format!("{input}_")).block(
            Block::default()
                .borders(Borders::ALL)
                .padding(left_pad())
                .title(" import folder (enter confirms, esc cancels) "),
        );
        frame.render_widget(prompt, popup);
    }
}

fn draw_lyrics(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" lyrics ");
    let Some(lyrics) = app.lyrics.lyrics() else {
        let placeholder = Paragraph::new(app.lyrics_placeholder.as_str())
            .alignment(Alignment::Center)
            .dim()
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let active = app.lyrics.active();
    let lines: Vec<Line> = lyrics
        .cues()
        .iter()
        .enumerate()
        .map(|(i, cue)| {
            if Some(i) == active {
                Line::from(cue.text.as_str().bold().fg(app.palette.foreground()))
                    .style(Style::default().bg(app.palette.primary()))
            } else if lyrics.is_static() {
                Line::from(cue.text.as_str())
            } else {
                Line::from(cue.text.as_str().dim())
            }
        })
        .collect();

    let viewport = block.inner(area).height as usize;
    let offset = scroll_offset(active, viewport, lines.len());
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .scroll((offset.min(u16::MAX as usize) as u16, 0))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_playlist(frame: &mut Frame, app: &App, player: &Controller, area: Rect) {
    let display = app.visible_indices();
    let q = app.filter_query.trim();
    let title = if app.filter_mode || !q.is_empty() {
        format!(
            " search: {}{} ({}/{}) ",
            q,
            if app.filter_mode { "_" } else { "" },
            display.len(),
            app.track_count()
        )
    } else {
        format!(" playlist ({}) ", display.len())
    };

    // Only build ListItems for the visible window (avoid allocating the entire list).
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = list_window(display.len(), list_height, sel_pos);
    let tracks = player.catalog();

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .filter_map(|&i| tracks.get(i).map(|t| (i, t)))
        .map(|(i, track)| {
            let marker = if player.current() == Some(i) { "♪ " } else { "  " };
            let line = Line::from(vec![
                Span::raw(marker),
                Span::raw(track.title.as_str()),
                Span::raw(" - ").dim(),
                Span::raw(track.artist.as_str()).dim(),
            ]);
            if player.current() == Some(i) {
                ListItem::new(line).style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !display.is_empty() && display.contains(&app.selected) {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
