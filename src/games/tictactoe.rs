use std::fmt::Display;

use smallvec::SmallVec;

use crate::{
    game::{Game, Move, State},
    player::PlayerId,
};

/// Board side length.
pub const SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicTacToeError {
    #[error("consecutive moves by the same player: {0}")]
    ConsecutiveMoves(PlayerId),
    #[error("cell {row},{col} is already occupied")]
    Occupied { row: usize, col: usize },
    #[error("cell {row},{col} is outside the board")]
    OutsideBoard { row: usize, col: usize },
    #[error("the game is already over")]
    GameOver,
    #[error("malformed grid line: {0:?}")]
    MalformedGrid(String),
}

/// 3×3 tic-tac-toe. `PlayerFirst` plays X and opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicTacToe;

impl Game for TicTacToe {
    type State = TicTacToeState;

    fn opener(&self) -> PlayerId {
        PlayerId::PlayerFirst
    }

    fn start(&self) -> TicTacToeState {
        TicTacToeState {
            cells: Default::default(),
            last_mover: self.opener().opposite(),
        }
    }
}

/// Place the player's mark at `row`,`col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicTacToeMove {
    pub player: PlayerId,
    pub row: usize,
    pub col: usize,
}

impl Move for TicTacToeMove {
    fn player(&self) -> PlayerId {
        self.player
    }
}

impl Display for TicTacToeMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {},{}", self.player, self.row, self.col)
    }
}

/// A tic-tac-toe position: the grid contents plus who moved last.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicTacToeState {
    cells: [[Option<PlayerId>; SIZE]; SIZE],
    last_mover: PlayerId,
}

impl TicTacToeState {
    /// Parses a grid of `X`, `O` (or `0`), and `.` tokens, one row per
    /// line, whitespace-separated.
    pub fn parse(grid: &str, last_mover: PlayerId) -> Result<Self, TicTacToeError> {
        let malformed = |line: &str| TicTacToeError::MalformedGrid(line.to_string());
        let mut cells = [[None; SIZE]; SIZE];
        let lines: Vec<&str> = grid.lines().collect();
        if lines.len() != SIZE {
            return Err(malformed(grid));
        }
        for (row, line) in lines.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != SIZE {
                return Err(malformed(line));
            }
            for (col, token) in tokens.iter().enumerate() {
                cells[row][col] = match *token {
                    "X" | "x" => Some(PlayerId::PlayerFirst),
                    "O" | "o" | "0" => Some(PlayerId::PlayerSecond),
                    "." => None,
                    _ => return Err(malformed(line)),
                };
            }
        }
        Ok(Self { cells, last_mover })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (row, line) in self.cells.iter().enumerate() {
            if row > 0 {
                out.push('\n');
            }
            for (col, cell) in line.iter().enumerate() {
                if col > 0 {
                    out.push(' ');
                }
                out.push(match cell {
                    Some(player) => player.select(('X', 'O')),
                    None => '.',
                });
            }
        }
        out
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<PlayerId> {
        self.cells[row][col]
    }

    fn full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    fn line_owner(&self, line: [(usize, usize); SIZE]) -> Option<PlayerId> {
        let [a, b, c] = line.map(|(row, col)| self.cells[row][col]);
        (a.is_some() && a == b && b == c).then(|| a.expect("line_owner: checked"))
    }
}

const LINES: [[(usize, usize); SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

impl State for TicTacToeState {
    type Move = TicTacToeMove;
    type Moves = SmallVec<[TicTacToeMove; 9]>;
    type Error = TicTacToeError;

    fn last_mover(&self) -> PlayerId {
        self.last_mover
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.full()
    }

    fn winner(&self) -> Option<PlayerId> {
        LINES.iter().find_map(|&line| self.line_owner(line))
    }

    fn moves(&self, player: PlayerId) -> Result<Self::Moves, TicTacToeError> {
        if player == self.last_mover {
            return Err(TicTacToeError::ConsecutiveMoves(player));
        }
        let mut result = SmallVec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if self.cells[row][col].is_none() {
                    result.push(TicTacToeMove { player, row, col });
                }
            }
        }
        Ok(result)
    }

    fn next(&self, mv: TicTacToeMove) -> Result<Self, TicTacToeError> {
        if self.is_terminal() {
            return Err(TicTacToeError::GameOver);
        }
        if mv.player == self.last_mover {
            return Err(TicTacToeError::ConsecutiveMoves(mv.player));
        }
        let TicTacToeMove { row, col, .. } = mv;
        if row >= SIZE || col >= SIZE {
            return Err(TicTacToeError::OutsideBoard { row, col });
        }
        if self.cells[row][col].is_some() {
            return Err(TicTacToeError::Occupied { row, col });
        }
        let mut cells = self.cells;
        cells[row][col] = Some(mv.player);
        Ok(Self {
            cells,
            last_mover: mv.player,
        })
    }
}
