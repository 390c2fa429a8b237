use binday_core::model::{BinType, LookupResult};
use chrono::{Local, NaiveDate};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new(format!(
        "binday – {} bin collections",
        app.service.council().name
    ))
    .block(Block::default().borders(Borders::ALL).title("binday"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::PostcodeEntry | Screen::AddressEntry => draw_entry(frame, app, *content_area),
        Screen::ScheduleView => draw_schedule_view(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::PostcodeEntry => "Type postcode · Enter next · Tab debug · Esc/Ctrl-C quit",
        Screen::AddressEntry => {
            "Type part of the address (optional) · Enter look up · Tab debug · Esc back · Ctrl-C quit"
        }
        Screen::ScheduleView => "Esc/←/b back · q/Ctrl-C quit",
    };
    let debug_flag = if app.debug { "debug on · " } else { "" };

    let status_text = if app.is_loading {
        format!("Looking up… · {debug_flag}{nav_hint}")
    } else if let Some(msg) = app.error_message.as_ref().filter(|_| app.screen != Screen::ScheduleView) {
        format!("{msg} · {debug_flag}{nav_hint}")
    } else {
        format!("{debug_flag}{nav_hint}")
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_entry(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // postcode
            Constraint::Length(3), // address hint
            Constraint::Min(0),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [postcode_area, address_area, _rest] = chunks else {
        return;
    };

    let focused = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let style_for = |screen: Screen| {
        if app.screen == screen {
            focused
        } else {
            Style::default()
        }
    };

    let postcode = Paragraph::new(app.postcode_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Postcode (e.g. BT1 1AA)"),
        )
        .style(style_for(Screen::PostcodeEntry));
    frame.render_widget(postcode, *postcode_area);

    let address = Paragraph::new(app.address_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Address (house number and street, optional)"),
        )
        .style(style_for(Screen::AddressEntry));
    frame.render_widget(address, *address_area);
}

fn draw_schedule_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    if let Some(message) = &app.error_message {
        let paragraph = Paragraph::new(message.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Lookup failed (Esc/←/b to go back)"),
            )
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    let Some(result) = &app.result else {
        return;
    };

    let title = format!(
        "Collections for {} (Esc/←/b to go back) · {}",
        result.address,
        app.service.council().portal
    );

    if result.is_empty() {
        let paragraph = Paragraph::new("No upcoming collections listed for this address.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let table = schedule_table(result, Local::now().date_naive())
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn schedule_table(result: &LookupResult, today: NaiveDate) -> Table<'static> {
    let rows = result.collections.iter().map(|collection| {
        let date = collection.date.format("%d/%m/%y").to_string();
        let weekday = collection.date.format("%a").to_string();
        let relative = relative_day_label(collection.date, today);

        let mut style = Style::default().fg(bin_color(&collection.bin_type));
        if collection.date <= today {
            style = style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(date),
            Cell::from(weekday),
            Cell::from(relative),
            Cell::from(collection.bin_type.to_string()),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(12),
    ];

    Table::new(rows.collect::<Vec<_>>(), column_widths)
        .header(
            Row::new(vec!["Date", "Day", "In", "Bin"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .column_spacing(1)
}

fn bin_color(bin_type: &BinType) -> Color {
    match bin_type {
        BinType::General => Color::Gray,
        BinType::Recycling => Color::Blue,
        BinType::Compost => Color::Green,
        BinType::Other(_) => Color::Magenta,
    }
}

fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    let delta = (date - today).num_days();
    match delta {
        0 => "today".to_owned(),
        1 => "tomorrow".to_owned(),
        days if days > 1 => format!("in {days} days"),
        -1 => "yesterday".to_owned(),
        days => format!("{} days ago", days.abs()),
    }
}
