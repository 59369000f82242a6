use super::app::{App, Focus, GalleryItem};
use super::color::hex_or;
use super::theme::Palette;
use aether_cli::gallery::{PLUGIN_MODAL_ID, ToastLevel};
use aether_cli::shell::Route;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use std::time::Instant;

const SIDEBAR_WIDTH: u16 = 22;
const TOAST_WIDTH: u16 = 48;

pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.shell().theme());
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.screen()), area);

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)]).split(area);
    render_status_bar(frame, rows[0], app, &palette);

    let columns = Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)]).split(rows[1]);
    render_sidebar(frame, columns[0], app, &palette);
    render_content(frame, columns[1], app, &palette);
    render_help(frame, rows[2], &palette);

    if app.gallery().is_modal_open() {
        render_plugin_modal(frame, area, app, &palette);
    }
    render_toasts(frame, area, app, &palette);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let shell = app.shell();
    let (dot, label) = if shell.server_online() {
        (Span::styled("● ", Style::default().fg(palette.green)), "online")
    } else {
        (Span::styled("● ", Style::default().fg(palette.red)), "offline")
    };
    let case = shell
        .current_case()
        .map(|case| case.display_name())
        .unwrap_or_else(|| "no case selected".to_string());

    let mut spans = vec![
        Span::styled(" AetherOne ", Style::default().fg(palette.mauve).add_modifier(Modifier::BOLD)),
        dot,
        Span::raw(label),
        Span::styled("  │  ", palette.muted()),
        Span::raw(case),
        Span::styled("  │  ", palette.muted()),
        Span::raw(format!("{} theme", shell.theme())),
    ];
    if shell.mobile_mode() {
        spans.push(Span::styled("  │  mobile", palette.muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(palette.bar()), area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let items: Vec<ListItem> = app
        .shell()
        .links()
        .iter()
        .map(|link| {
            let style = if link.active {
                Style::default()
                    .bg(hex_or(&link.background_color, palette.surface1))
                    .fg(hex_or(&link.color, palette.text))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.subtext0)
            };
            ListItem::new(format!(" {}", link.name)).style(style)
        })
        .collect();

    let focused = app.focus() == Focus::Sidebar;
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).border_style(palette.border(focused)).title(" Menu "))
        .highlight_symbol("›")
        .highlight_style(if focused { palette.highlight() } else { Style::default() });

    let mut state = ListState::default().with_selected(Some(app.sidebar_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_content(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let route = app.shell().current_route();
    let focused = app.focus() == Focus::Content;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .title(format!(" {} ", route.title()));

    match route {
        Route::Apps => render_gallery(frame, area, app, palette, block),
        Route::Cases => render_cases(frame, area, app, palette, block),
        _ => {
            let paragraph = Paragraph::new(screen_text(route, app, palette))
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
    }
}

fn render_gallery(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, block: Block) {
    let gallery = app.gallery();
    let mut items: Vec<ListItem> = Vec::new();

    for index in 0..gallery.apps().len() + gallery.plugins().len() {
        let item = match app.gallery_item(index) {
            Some(GalleryItem::App(i)) => {
                let entry = &gallery.apps()[i];
                let mut lines = vec![Line::from(vec![
                    Span::styled("app  ", Style::default().fg(palette.peach)),
                    Span::styled(entry.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ])];
                if let Some(description) = &entry.description {
                    lines.push(Line::styled(format!("     {}", description), palette.muted()));
                }
                ListItem::new(lines)
            }
            Some(GalleryItem::Plugin(i)) => {
                let plugin = &gallery.plugins()[i];
                let mut lines = vec![Line::from(vec![
                    Span::styled("plug ", Style::default().fg(palette.blue)),
                    Span::styled(plugin.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ])];
                if let Some(description) = plugin.description() {
                    lines.push(Line::styled(format!("     {}", description), palette.muted()));
                }
                ListItem::new(lines)
            }
            None => continue,
        };
        items.push(item);
    }

    if !gallery.plugins_loaded() {
        items.push(ListItem::new(Line::styled("     loading plugins…", palette.muted())));
    }

    let focused = app.focus() == Focus::Content;
    let list = List::new(items)
        .block(block)
        .highlight_symbol("›")
        .highlight_style(if focused { palette.highlight() } else { Style::default() });
    let mut state = ListState::default().with_selected(focused.then_some(app.content_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_cases(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, block: Block) {
    if app.cases().is_empty() {
        let text = if app.cases_loading() { "Loading cases…" } else { "No cases stored" };
        frame.render_widget(Paragraph::new(Line::styled(text, palette.muted())).block(block), area);
        return;
    }

    let current_id = app.shell().current_case().and_then(|case| case.id);
    let items: Vec<ListItem> = app
        .cases()
        .iter()
        .map(|case| {
            let marker = if case.id.is_some() && case.id == current_id { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(palette.green)),
                Span::raw(case.display_name()),
            ]))
        })
        .collect();

    let focused = app.focus() == Focus::Content;
    let list = List::new(items)
        .block(block)
        .highlight_style(if focused { palette.highlight() } else { Style::default() });
    let mut state = ListState::default().with_selected(focused.then_some(app.content_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn screen_text<'a>(route: Route, app: &'a App, palette: &Palette) -> Vec<Line<'a>> {
    let shell = app.shell();
    match route {
        Route::Dashboard | Route::Mobile => {
            let status = shell.liveness();
            let checked = status
                .last_checked
                .map(|at| at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "never".to_string());
            vec![
                Line::styled("Welcome to AetherOne", Style::default().fg(palette.mauve).add_modifier(Modifier::BOLD)),
                Line::raw(""),
                Line::raw(format!("Server: {}", if status.online { "online" } else { "offline" })),
                Line::raw(format!("Last check: {} ({} probes)", checked, status.probes)),
                Line::raw(format!(
                    "Current case: {}",
                    shell.current_case().map(|c| c.display_name()).unwrap_or_else(|| "none".to_string())
                )),
                Line::raw(format!("Cases: {}   Plugins: {}", app.cases().len(), app.gallery().plugins().len())),
            ]
        }
        Route::Manual => vec![
            Line::styled("Keys", Style::default().add_modifier(Modifier::BOLD)),
            Line::raw(""),
            Line::raw("↑/↓      move selection"),
            Line::raw("Tab      switch between menu and screen"),
            Line::raw("Enter    open the selected entry"),
            Line::raw("t        switch light/dark theme"),
            Line::raw("r        reload cases and plugins"),
            Line::raw("Esc      close plugin or dismiss notification"),
            Line::raw("q        quit"),
        ],
        Route::Settings => {
            let origin = app.origin().map(|url| url.to_string()).unwrap_or_else(|| "-".to_string());
            vec![
                Line::raw(format!("Server:   {}", origin)),
                Line::raw(format!("Theme:    {}", shell.theme())),
                Line::raw(format!("Device:   {}", if shell.mobile_mode() { "mobile" } else { "desktop" })),
            ]
        }
        Route::RadionicsDeviceBase44 | Route::Cards => {
            let entry = app.apps().iter().find(|entry| entry.route == route);
            let mut lines = vec![Line::styled(
                entry.map(|e| e.name.clone()).unwrap_or_else(|| route.title().to_string()),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(description) = entry.and_then(|e| e.description.clone()) {
                lines.push(Line::raw(description));
            }
            lines.push(Line::raw(""));
            lines.push(Line::styled("This app runs in the web client.", palette.muted()));
            lines
        }
        Route::Apps | Route::Cases => Vec::new(),
    }
}

fn render_help(frame: &mut Frame, area: Rect, palette: &Palette) {
    let help = " ↑/↓ move  Tab focus  Enter open  t theme  r reload  Esc close  q quit";
    frame.render_widget(Paragraph::new(help).style(palette.bar()), area);
}

fn render_plugin_modal(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let gallery = app.gallery();
    let Some(plugin) = gallery.selected_plugin() else { return };

    let width = area.width.saturating_sub(8).min(72);
    let height = 8.min(area.height);
    let modal = centered(area, width, height);

    let relative = gallery.selected_url().map(|url| url.to_string()).unwrap_or_default();
    let absolute = match (gallery.selected_url(), app.origin()) {
        (Some(url), Some(origin)) => url.resolve(origin).map(|u| u.to_string()).unwrap_or_else(|e| e.to_string()),
        _ => relative.clone(),
    };

    let lines = vec![
        Line::styled(plugin.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::raw(format!("Path: {}", relative)),
        Line::raw(format!("Open: {}", absolute)),
        Line::raw(""),
        Line::styled("Esc to close", palette.muted()),
    ];

    frame.render_widget(Clear, modal);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.blue))
                    .title(format!(" {} ", PLUGIN_MODAL_ID)),
            )
            .style(palette.screen())
            .wrap(Wrap { trim: true }),
        modal,
    );
}

fn render_toasts(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let now = Instant::now();
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y + 1;

    for toast in app.toasts().visible(now) {
        if y + 4 > area.bottom() {
            break;
        }
        let color = match toast.level {
            ToastLevel::Info => palette.blue,
            ToastLevel::Success => palette.green,
            ToastLevel::Warning => palette.yellow,
            ToastLevel::Error => palette.red,
        };
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, 4);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(toast.message.clone())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color))
                        .title(format!(" {} ", toast.title)),
                )
                .style(palette.screen())
                .wrap(Wrap { trim: true }),
            rect,
        );
        y += 4;
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered(area, 60, 10);
        assert_eq!(rect, Rect::new(20, 15, 60, 10));

        let small = centered(Rect::new(0, 0, 10, 4), 60, 10);
        assert_eq!((small.x, small.y), (0, 0));
    }
}
