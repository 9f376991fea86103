use std::fmt::Write;

use arcade_core::{CellView, Coord, MinesweeperState, Position, SnakeState, TicTacToeState};

pub(crate) fn snake_board(state: &SnakeState) -> String {
    let mut out = String::new();
    let head = state.head();

    for y in 0..state.height() {
        for x in 0..state.width() {
            let pos = Position::new(x, y);
            let ch = if pos == head {
                '@'
            } else if state.segments().contains(&pos) {
                'o'
            } else if pos == state.food() {
                '*'
            } else {
                '.'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    let _ = write!(out, "Score: {}", state.score());
    out
}

pub(crate) fn minefield(state: &MinesweeperState) -> String {
    let (x_end, y_end) = state.size();
    let mut out = String::from("   ");

    for x in 0..x_end {
        let _ = write!(out, "{}", x % 10);
    }
    out.push('\n');

    for y in 0..y_end {
        let _ = write!(out, "{y:>2} ");
        for x in 0..x_end {
            out.push(cell_char(state, (x, y)));
        }
        out.push('\n');
    }
    let _ = write!(
        out,
        "Revealed: {}  Mines left: {}",
        state.revealed_count(),
        state.mines_left()
    );
    out
}

fn cell_char(state: &MinesweeperState, coords: (Coord, Coord)) -> char {
    match state.cell_at(coords) {
        Some(CellView::Hidden) | None => '#',
        Some(CellView::Flagged) => 'F',
        Some(CellView::Mine) if state.triggered_mine() == Some(coords) => 'X',
        Some(CellView::Mine) => '*',
        Some(CellView::Revealed(0)) => '.',
        Some(CellView::Revealed(count)) => char::from(b'0' + count),
    }
}

pub(crate) fn tictactoe_board(state: &TicTacToeState) -> String {
    let rows: Vec<String> = state
        .board()
        .chunks(3)
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Some(player) => player.symbol(),
                    // cells are numbered 1-9 for input
                    None => char::from(b'1' + (row * 3 + col) as u8),
                })
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();
    rows.join("\n--+---+--\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::{Direction, MineLayout};

    #[test]
    fn snake_board_marks_head_body_and_food() {
        let state = SnakeState::from_parts(
            (4, 2),
            [Position::new(2, 0), Position::new(1, 0)],
            Direction::Right,
            Position::new(0, 1),
        )
        .unwrap();

        assert_eq!(snake_board(&state), ".o@.\n*...\nScore: 0");
    }

    #[test]
    fn minefield_shows_counts_and_hidden_cells() {
        let mut state = MinesweeperState::new(MineLayout::from_mine_coords((3, 1), &[(2, 0)]).unwrap());
        state.reveal((0, 0));

        assert_eq!(minefield(&state), "   012\n 0 .1#\nRevealed: 2  Mines left: 1");
    }

    #[test]
    fn lost_minefield_marks_triggered_mine() {
        let layout = MineLayout::from_mine_coords((3, 1), &[(0, 0), (2, 0)]).unwrap();
        let mut state = MinesweeperState::new(layout);
        state.reveal((2, 0));

        assert_eq!(cell_char(&state, (2, 0)), 'X');
        assert_eq!(cell_char(&state, (0, 0)), '*');
        assert_eq!(cell_char(&state, (1, 0)), '#');
    }

    #[test]
    fn tictactoe_board_numbers_free_cells() {
        let mut state = TicTacToeState::new();
        state.make_move(0);
        state.make_move(4);

        assert_eq!(
            tictactoe_board(&state),
            "X | 2 | 3\n--+---+--\n4 | O | 6\n--+---+--\n7 | 8 | 9"
        );
    }
}
