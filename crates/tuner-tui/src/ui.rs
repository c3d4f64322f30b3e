//! Screen renderer.
//!
//! ```text
//!  ──────────────────────────────────────
//!  tuner         github.com/jcheng8/goradio
//!  ──────────────────────────────────────
//!  ▶ WBEZ 91.5
//!    WGN                                    ← cursor row, highlighted
//!  ──────────────────────────────────────
//!  <latest player status line>
//! ```
//!
//! `render` depends only on its arguments and rewrites every row, so it is
//! simply called again after a resize.

use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Widget,
};

use tuner_proto::catalog::StationCatalog;

use crate::theme::{
    style_cursor, style_default, style_muted, style_playing, style_secondary, style_separator,
};

pub const TITLE: &str = "tuner";
pub const HEADER_LINK: &str = "github.com/jcheng8/goradio";

const PLAYING_MARKER: &str = "▶ ";
const IDLE_MARKER: &str = "  ";

/// Rows above the station list (rule, header, rule).
const LIST_TOP: u16 = 3;
/// Rows taken by chrome: three rules, header, footer.
const CHROME_ROWS: u16 = 5;

/// Everything the renderer reads.
pub struct View<'a> {
    pub catalog: &'a StationCatalog,
    pub cursor: usize,
    /// Station currently playing, marked in the list.
    pub playing: Option<usize>,
    pub status: &'a str,
}

/// Which catalog indices are visible in `height` rows.
///
/// Keeps the cursor on the last row once it passes the first screenful;
/// otherwise shows the top of the list.
pub fn station_window(len: usize, cursor: usize, height: usize) -> Range<usize> {
    if height == 0 || len == 0 {
        0..0
    } else if len <= height {
        0..len
    } else if cursor >= height {
        let end = cursor.min(len - 1) + 1;
        end - height..end
    } else {
        0..height
    }
}

pub fn render(area: Rect, buf: &mut Buffer, view: &View) {
    if area.width < 3 || area.height == 0 {
        return;
    }
    let row = |offset: u16| Rect::new(area.x + 1, area.y + offset, area.width - 2, 1);
    let footer = row(area.height - 1);

    if area.height < CHROME_ROWS {
        draw_footer(footer, buf, view.status);
        return;
    }

    draw_rule(row(0), buf);
    draw_header(row(1), buf);
    draw_rule(row(2), buf);

    let list_height = area.height - CHROME_ROWS;
    let window = station_window(view.catalog.len(), view.cursor, list_height as usize);
    for (offset, idx) in window.enumerate() {
        let Some(station) = view.catalog.get(idx) else {
            break;
        };
        let line_area = row(LIST_TOP + offset as u16);
        let base = if idx == view.cursor {
            style_cursor()
        } else {
            style_default()
        };
        buf.set_style(line_area, base);

        let marker = if view.playing == Some(idx) {
            Span::styled(PLAYING_MARKER, base.patch(style_playing()))
        } else {
            Span::styled(IDLE_MARKER, base)
        };
        Line::from(vec![marker, Span::styled(station.name.as_str(), base)]).render(line_area, buf);
    }

    draw_rule(row(area.height - 2), buf);
    draw_footer(footer, buf, view.status);
}

fn draw_rule(area: Rect, buf: &mut Buffer) {
    Line::from(Span::styled(
        "─".repeat(area.width as usize),
        style_separator(),
    ))
    .render(area, buf);
}

fn draw_header(area: Rect, buf: &mut Buffer) {
    Line::from(Span::styled(
        TITLE,
        style_default().add_modifier(Modifier::BOLD),
    ))
    .render(area, buf);
    // The title wins when the terminal is too narrow for both.
    let title_width = TITLE.len() as u16 + 1;
    if area.width > title_width {
        let link_area = Rect {
            x: area.x + title_width,
            width: area.width - title_width,
            ..area
        };
        Line::from(Span::styled(HEADER_LINK, style_muted()))
            .alignment(Alignment::Right)
            .render(link_area, buf);
    }
}

fn draw_footer(area: Rect, buf: &mut Buffer, status: &str) {
    // Paint the whole row so a shorter message replaces a longer one.
    buf.set_style(area, style_secondary());
    buf.set_stringn(area.x, area.y, status, area.width as usize, style_secondary());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{C_ACCENT, C_PLAYING, C_SELECTION_BG};
    use tuner_proto::station::Station;

    fn catalog(n: usize) -> StationCatalog {
        StationCatalog::new(
            (0..n)
                .map(|i| Station::new(format!("Station {i}"), format!("http://radio.test/{i}.mp3")))
                .collect(),
        )
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    fn draw(width: u16, height: u16, view: &View) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, view);
        buf
    }

    #[test]
    fn test_window_shows_everything_when_it_fits() {
        assert_eq!(station_window(3, 2, 4), 0..3);
        assert_eq!(station_window(4, 3, 4), 0..4);
        assert_eq!(station_window(0, 0, 4), 0..0);
        assert_eq!(station_window(5, 0, 0), 0..0);
    }

    #[test]
    fn test_window_follows_cursor_past_first_screen() {
        assert_eq!(station_window(10, 0, 4), 0..4);
        assert_eq!(station_window(10, 3, 4), 0..4);
        assert_eq!(station_window(10, 4, 4), 1..5);
        assert_eq!(station_window(10, 7, 4), 4..8);
        assert_eq!(station_window(10, 9, 4), 6..10);
    }

    #[test]
    fn test_layout_rows() {
        let catalog = catalog(2);
        let view = View {
            catalog: &catalog,
            cursor: 1,
            playing: Some(0),
            status: "Starting playback...",
        };
        let buf = draw(50, 8, &view);

        assert_eq!(row_text(&buf, 0).trim(), "─".repeat(48));
        let header = row_text(&buf, 1);
        assert!(header.starts_with(" tuner "));
        assert!(header.trim_end().ends_with(HEADER_LINK));
        assert_eq!(buf[(48, 1)].symbol(), "o");
        assert_eq!(row_text(&buf, 2).trim(), "─".repeat(48));
        assert!(row_text(&buf, 3).starts_with(" ▶ Station 0"));
        assert!(row_text(&buf, 4).starts_with("   Station 1"));
        assert_eq!(row_text(&buf, 5).trim(), "");
        assert_eq!(row_text(&buf, 6).trim(), "─".repeat(48));
        assert_eq!(row_text(&buf, 7).trim(), "Starting playback...");
    }

    #[test]
    fn test_cursor_and_playing_styles() {
        let catalog = catalog(3);
        let view = View {
            catalog: &catalog,
            cursor: 2,
            playing: Some(2),
            status: "",
        };
        let buf = draw(30, 10, &view);

        // Cursor row is highlighted across the full inner width.
        for x in 1..29 {
            assert_eq!(buf[(x, 5)].bg, C_SELECTION_BG);
        }
        assert_eq!(buf[(3, 5)].fg, C_ACCENT);
        assert_eq!(buf[(1, 5)].fg, C_PLAYING);
        assert_ne!(buf[(3, 3)].fg, C_ACCENT);
    }

    #[test]
    fn test_scrolled_list() {
        let catalog = catalog(10);
        let view = View {
            catalog: &catalog,
            cursor: 7,
            playing: None,
            status: "",
        };
        // 9 rows leave 4 for stations.
        let buf = draw(30, 9, &view);
        let names: Vec<String> = (3..7).map(|y| row_text(&buf, y).trim().to_string()).collect();
        assert_eq!(names, vec!["Station 4", "Station 5", "Station 6", "Station 7"]);
    }

    #[test]
    fn test_tiny_terminal_only_draws_footer() {
        let catalog = catalog(3);
        let view = View {
            catalog: &catalog,
            cursor: 0,
            playing: None,
            status: "Playing stopped",
        };
        let buf = draw(20, 2, &view);
        assert_eq!(row_text(&buf, 0).trim(), "");
        assert_eq!(row_text(&buf, 1).trim(), "Playing stopped");
    }
}
