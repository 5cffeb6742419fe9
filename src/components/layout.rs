//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub table: Rect,
    pub comments: Option<Rect>,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Popup sized as a share of the screen, for dialogs with long content
pub fn proportional_popup(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let width = area.width.saturating_mul(width_pct) / 100;
    let height = area.height.saturating_mul(height_pct) / 100;
    centered_popup(area, width, height)
}

/// Calculate main screen layout
pub fn calculate_main_layout(area: Rect, has_status: bool, show_comments: bool) -> MainLayout {
    // Vertical: header + content + (optional status) + help bar
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(0)];
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // Discussion panel takes a fixed share on the right
    let (table_area, comments_area) = if show_comments {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(main_chunks[1]);
        (horizontal[0], Some(horizontal[1]))
    } else {
        (main_chunks[1], None)
    };

    let (status_area, help_area) = if has_status {
        (Some(main_chunks[2]), main_chunks[3])
    } else {
        (None, main_chunks[2])
    };

    MainLayout {
        header: main_chunks[0],
        table: table_area,
        comments: comments_area,
        status: status_area,
        help: help_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_is_clamped() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_popup(area, 60, 6);
        assert_eq!(popup.width, 40);
        assert_eq!(popup.y, 2);
    }

    #[test]
    fn test_comments_column_only_when_open() {
        let area = Rect::new(0, 0, 100, 40);
        let closed = calculate_main_layout(area, false, false);
        assert!(closed.comments.is_none());
        assert!(closed.status.is_none());
        assert_eq!(closed.table.width, 100);

        let open = calculate_main_layout(area, true, true);
        let comments = open.comments.unwrap();
        assert_eq!(open.table.width + comments.width, 100);
        assert_eq!(open.status.unwrap().height, 1);
    }
}
