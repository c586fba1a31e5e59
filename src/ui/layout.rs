use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Below this width the inspector moves under the account list
const NARROW_WIDTH: u16 = 90;

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub list: Rect,
    pub details: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let [header, body, footer] = split(
        size,
        Direction::Vertical,
        [Constraint::Length(3), Constraint::Min(0), Constraint::Length(2)],
    );

    let [list, details] = if size.width < NARROW_WIDTH {
        split(
            body,
            Direction::Vertical,
            [Constraint::Min(6), Constraint::Length(9)],
        )
    } else {
        split(
            body,
            Direction::Horizontal,
            [Constraint::Percentage(58), Constraint::Percentage(42)],
        )
    };

    let [status_line, command_line] = split(
        footer,
        Direction::Vertical,
        [Constraint::Length(1), Constraint::Length(1)],
    );

    UiAreas {
        size,
        header,
        list,
        details,
        status_line,
        command_line,
    }
}

/// Popup rectangle taking the given share of `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_y = (100 - percent_y.min(100)) / 2;
    let margin_x = (100 - percent_x.min(100)) / 2;
    let [_, middle, _] = split(
        area,
        Direction::Vertical,
        [
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ],
    );
    let [_, popup, _] = split(
        middle,
        Direction::Horizontal,
        [
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ],
    );
    popup
}

fn split<const N: usize>(
    area: Rect,
    direction: Direction,
    constraints: [Constraint; N],
) -> [Rect; N] {
    let chunks = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);
    std::array::from_fn(|index| chunks.get(index).copied().unwrap_or_default())
}
