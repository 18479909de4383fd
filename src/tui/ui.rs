//! Stateless rendering of the board and its dialogs.

use game2048_engine::{GameState, Position, SIZE, Tile};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

use super::app::{App, FormState, GameOverDialog, Overlay};
use crate::leaderboard::Leaderboard;

const TILE_WIDTH: u16 = 8;
const TILE_HEIGHT: u16 = 3;

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + score
            Constraint::Min(TILE_HEIGHT * SIZE as u16 + 2),
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(area);

    draw_header(frame, chunks[0], app.session().state(), *app.best_score());
    draw_board(frame, chunks[1], app.session().state());

    let status = Paragraph::new(app.status_message().as_str())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let undo_hint = if app.session().state().can_undo() {
        "u: Undo"
    } else {
        "u: (no undo)"
    };
    let help = Paragraph::new(format!(
        "←↑↓→ / wasd / drag: Move | {} | n: New | l: Leaderboard | q: Quit",
        undo_hint
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);

    match app.overlay() {
        Overlay::None => {}
        Overlay::GameOver(dialog) => draw_game_over(frame, area, dialog),
        Overlay::Leaderboard { board, .. } => draw_leaderboard(frame, area, board),
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &GameState, best: u64) {
    let line = Line::from(vec![
        Span::styled(
            "2048",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Score: "),
        Span::styled(
            state.score().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Best: "),
        Span::raw(best.max(state.score()).to_string()),
    ]);
    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_board(frame: &mut Frame, area: Rect, state: &GameState) {
    let board_area = center_rect(
        area,
        TILE_WIDTH * SIZE as u16 + 2,
        TILE_HEIGHT * SIZE as u16 + 2,
    );
    let border_style = if state.game_over() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(TILE_HEIGHT); SIZE])
        .split(inner);

    for (row, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(TILE_WIDTH); SIZE])
            .split(*row_area);
        for (col, cell_area) in cols.iter().enumerate() {
            let tile = state.grid().get(Position { row, col });
            draw_tile(frame, *cell_area, tile);
        }
    }
}

fn draw_tile(frame: &mut Frame, area: Rect, tile: Option<&Tile>) {
    let Some(tile) = tile else {
        let empty = Paragraph::new("·")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let mut style = Style::default()
        .bg(tile_color(tile.value))
        .fg(if tile.value <= 4 { Color::Black } else { Color::White })
        .add_modifier(Modifier::BOLD);
    if tile.merged {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if tile.is_new {
        style = style.add_modifier(Modifier::ITALIC);
    }

    // Vertically centre the number inside the tile.
    let text = vec![Line::from(""), Line::from(tile.value.to_string())];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);
    frame.render_widget(paragraph, area);
}

fn tile_color(value: u32) -> Color {
    match value {
        2 => Color::Rgb(238, 228, 218),
        4 => Color::Rgb(237, 224, 200),
        8 => Color::Rgb(242, 177, 121),
        16 => Color::Rgb(245, 149, 99),
        32 => Color::Rgb(246, 124, 95),
        64 => Color::Rgb(246, 94, 59),
        128 => Color::Rgb(237, 207, 114),
        256 => Color::Rgb(237, 204, 97),
        512 => Color::Rgb(237, 200, 80),
        1024 => Color::Rgb(237, 197, 63),
        2048 => Color::Rgb(237, 194, 46),
        _ => Color::Rgb(60, 58, 50),
    }
}

fn draw_game_over(frame: &mut Frame, area: Rect, dialog: &GameOverDialog) {
    let popup = center_rect(area, 48, 11);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Game Over")
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    let score = Paragraph::new(format!("Final score: {}", dialog.final_score()))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(score, chunks[0]);

    match dialog.form() {
        FormState::Editing => {
            let input = Paragraph::new(dialog.name().as_str())
                .block(Block::default().borders(Borders::ALL).title("Your name"));
            frame.render_widget(input, chunks[1]);

            let error = Paragraph::new(dialog.error().as_deref().unwrap_or(""))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            frame.render_widget(error, chunks[2]);

            let help = Paragraph::new("Enter: Save score | Esc: Skip")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(help, chunks[3]);
        }
        FormState::Saved { rank } => {
            let message = match rank {
                Some(rank) => format!("Score saved! You are #{} on the leaderboard.", rank),
                None => "Score saved, but it did not make the top 10.".to_string(),
            };
            let saved = Paragraph::new(message)
                .style(Style::default().fg(Color::Green))
                .alignment(Alignment::Center);
            frame.render_widget(saved, chunks[1]);
            draw_dialog_help(frame, chunks[3]);
        }
        FormState::Skipped => draw_dialog_help(frame, chunks[3]),
    }
}

fn draw_dialog_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("r: Play again | l: Leaderboard | q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}

fn draw_leaderboard(frame: &mut Frame, area: Rect, board: &Leaderboard) {
    let popup = center_rect(area, 56, 16);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Leaderboard (Esc to close)")
        .border_style(Style::default().fg(Color::Cyan));

    if board.is_empty() {
        let empty = Paragraph::new("No scores yet. Finish a game to get on the board!")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, popup);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Name").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Score").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Date").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = board
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Row::new(vec![
                Cell::from((index + 1).to_string()),
                Cell::from(entry.name().as_str()),
                Cell::from(entry.score().to_string()),
                Cell::from(entry.date_label()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(45),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, popup);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
