//! Sliding-tile puzzle gate.
//!
//! The engine owns a [`Grid`], keeps it solvable by only ever shuffling with
//! legal moves, and fires a one-shot win notifier when the grid returns to the
//! identity snapshot taken at construction. Rendering is left to whoever reads
//! [`Puzzle::view`].

mod grid;
mod rng;

pub use grid::{Grid, SIZE, TileBackground, TileView, is_adjacent};
pub use rng::SimpleRng;

/// Random legal moves applied by [`Puzzle::shuffle`].
pub const SHUFFLE_MOVES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PuzzleState {
    Shuffled,
    InProgress,
    Solved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not adjacent to the blank, or the puzzle is already solved.
    Ignored,
    Moved,
    Solved,
}

/// Zero-argument callback run once per solve.
pub type WinNotifier = Box<dyn FnMut()>;

pub struct Puzzle {
    grid: Grid,
    state: PuzzleState,
    rng: SimpleRng,
    shuffle_moves: usize,
    notifier: Option<WinNotifier>,
    win_fired: bool,
}

impl Puzzle {
    pub fn new(size: usize, rng: SimpleRng) -> Self {
        Self {
            grid: Grid::new(size),
            state: PuzzleState::Shuffled,
            rng,
            shuffle_moves: SHUFFLE_MOVES,
            notifier: None,
            win_fired: false,
        }
    }

    pub fn with_shuffle_moves(mut self, moves: usize) -> Self {
        self.shuffle_moves = moves;
        self
    }

    pub fn set_win_notifier(&mut self, notifier: impl FnMut() + 'static) {
        self.notifier = Some(Box::new(notifier));
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn view(&self) -> Vec<TileView> {
        self.grid.describe()
    }

    /// Reseed from the identity and walk the blank through random legal moves.
    /// Re-arms the win notifier.
    pub fn shuffle(&mut self) {
        self.grid.reset();
        for _ in 0..self.shuffle_moves {
            let neighbors = self.grid.blank_neighbors();
            let pick = neighbors[self.rng.next_index(neighbors.len())];
            let blank = self.grid.blank_slot();
            self.grid.swap(blank, pick);
        }
        self.state = PuzzleState::Shuffled;
        self.win_fired = false;
    }

    /// Slide the tile at `slot` into the blank if they touch.
    pub fn move_tile(&mut self, slot: usize) -> MoveOutcome {
        if self.state == PuzzleState::Solved {
            return MoveOutcome::Ignored;
        }
        let blank = self.grid.blank_slot();
        if !is_adjacent(self.grid.size(), slot, blank) {
            return MoveOutcome::Ignored;
        }
        self.grid.swap(slot, blank);
        if self.grid.is_solved() {
            self.state = PuzzleState::Solved;
            self.fire_win();
            MoveOutcome::Solved
        } else {
            self.state = PuzzleState::InProgress;
            MoveOutcome::Moved
        }
    }

    /// Skip play: snap to the identity and mark solved without notifying.
    /// Returns true if a win notification is still owed for this solve; the
    /// caller delivers it with [`Puzzle::fire_win`] after its own delay.
    pub fn give_up(&mut self) -> bool {
        self.grid.reset();
        self.state = PuzzleState::Solved;
        !self.win_fired
    }

    /// Run the win notifier unless it already ran for this solve.
    pub fn fire_win(&mut self) -> bool {
        if self.state != PuzzleState::Solved || self.win_fired {
            return false;
        }
        self.win_fired = true;
        if let Some(notify) = self.notifier.as_mut() {
            notify();
        }
        true
    }

    /// Load an explicit arrangement (mid-game). Ignored unless `tiles` is a
    /// permutation of the right length.
    pub fn arrange(&mut self, tiles: &[usize]) -> bool {
        if !self.grid.set_tiles(tiles) {
            return false;
        }
        self.state = PuzzleState::InProgress;
        self.win_fired = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_puzzle(tiles: &[usize]) -> (Puzzle, Rc<Cell<u32>>) {
        let wins = Rc::new(Cell::new(0));
        let mut p = Puzzle::new(SIZE, SimpleRng::new(9));
        let w = wins.clone();
        p.set_win_notifier(move || w.set(w.get() + 1));
        assert!(p.arrange(tiles));
        (p, wins)
    }

    #[test]
    fn shuffle_keeps_permutation() {
        for seed in 1..50 {
            let mut p = Puzzle::new(SIZE, SimpleRng::new(seed));
            p.shuffle();
            let mut sorted = p.grid().tiles().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..9).collect::<Vec<_>>());
            assert_eq!(p.state(), PuzzleState::Shuffled);
        }
    }

    #[test]
    fn shuffle_with_zero_moves_is_identity() {
        let mut p = Puzzle::new(4, SimpleRng::new(3)).with_shuffle_moves(0);
        p.shuffle();
        assert!(p.grid().is_solved());
    }

    #[test]
    fn non_adjacent_move_is_noop() {
        let (mut p, wins) = counting_puzzle(&[0, 1, 2, 3, 4, 5, 6, 8, 7]);
        let before = p.grid().tiles().to_vec();
        // blank sits in slot 7; slot 0 and slot 2 are far away
        assert_eq!(p.move_tile(0), MoveOutcome::Ignored);
        assert_eq!(p.move_tile(2), MoveOutcome::Ignored);
        assert_eq!(p.move_tile(7), MoveOutcome::Ignored);
        assert_eq!(p.grid().tiles(), before.as_slice());
        assert_eq!(wins.get(), 0);
    }

    #[test]
    fn move_then_inverse_restores_grid() {
        let (mut p, _) = counting_puzzle(&[0, 1, 2, 3, 8, 5, 6, 7, 4]);
        let before = p.grid().tiles().to_vec();
        assert_eq!(p.move_tile(1), MoveOutcome::Moved);
        let diff = before
            .iter()
            .zip(p.grid().tiles())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(diff, 2);
        assert_eq!(p.move_tile(4), MoveOutcome::Moved);
        assert_eq!(p.grid().tiles(), before.as_slice());
    }

    #[test]
    fn solving_move_fires_once() {
        let (mut p, wins) = counting_puzzle(&[0, 1, 2, 3, 4, 5, 6, 8, 7]);
        assert_eq!(p.move_tile(8), MoveOutcome::Solved);
        assert_eq!(p.grid().tiles(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(p.state(), PuzzleState::Solved);
        assert_eq!(wins.get(), 1);
        // terminal: further input and repeat fires do nothing
        assert_eq!(p.move_tile(7), MoveOutcome::Ignored);
        assert!(!p.fire_win());
        assert_eq!(wins.get(), 1);
    }

    #[test]
    fn give_up_defers_notification_to_caller() {
        let (mut p, wins) = counting_puzzle(&[1, 0, 2, 3, 4, 5, 6, 8, 7]);
        assert!(p.give_up());
        assert!(p.grid().is_solved());
        assert_eq!(p.state(), PuzzleState::Solved);
        assert_eq!(wins.get(), 0);
        assert!(p.fire_win());
        assert!(!p.fire_win());
        assert_eq!(wins.get(), 1);
        // already notified: giving up again owes nothing
        assert!(!p.give_up());
    }

    #[test]
    fn reshuffle_rearms_notifier() {
        let (mut p, wins) = counting_puzzle(&[0, 1, 2, 3, 4, 5, 6, 8, 7]);
        p.move_tile(8);
        p.shuffle();
        assert!(p.give_up());
        assert!(p.fire_win());
        assert_eq!(wins.get(), 2);
    }

    #[test]
    fn fire_win_requires_solved_state() {
        let (mut p, wins) = counting_puzzle(&[0, 1, 2, 3, 4, 5, 6, 8, 7]);
        assert!(!p.fire_win());
        assert_eq!(wins.get(), 0);
    }
}
