//! Grid model: a row-major permutation of tile identities on an N×N board.
//! Slot index = physical position, value = the tile's home identity.

/// Default board edge length.
pub const SIZE: usize = 3;

/// True iff the two slots are one orthogonal step apart on an `size`×`size` board.
pub fn is_adjacent(size: usize, a: usize, b: usize) -> bool {
    let (r1, c1) = (a / size, a % size);
    let (r2, c2) = (b / size, b % size);
    r1.abs_diff(r2) + c1.abs_diff(c2) == 1
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    tiles: Vec<usize>,
    // Snapshot of the starting identity permutation; the solved target never
    // gets recomputed after construction.
    solved: Vec<usize>,
}

impl Grid {
    /// Identity permutation on a `size`×`size` board. Panics if `size < 2`.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "grid size must be at least 2");
        let tiles: Vec<usize> = (0..size * size).collect();
        Self {
            size,
            solved: tiles.clone(),
            tiles,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile identity reserved for the empty space.
    pub fn blank_tile(&self) -> usize {
        self.tiles.len() - 1
    }

    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    pub fn tile_at(&self, slot: usize) -> usize {
        self.tiles[slot]
    }

    /// Slot currently holding the blank.
    pub fn blank_slot(&self) -> usize {
        let blank = self.blank_tile();
        // A permutation always contains the blank.
        self.tiles.iter().position(|&t| t == blank).unwrap_or(blank)
    }

    /// Slots a tile could slide in from, in ascending order.
    pub fn blank_neighbors(&self) -> Vec<usize> {
        let blank = self.blank_slot();
        (0..self.tiles.len())
            .filter(|&idx| is_adjacent(self.size, idx, blank))
            .collect()
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.tiles.swap(a, b);
    }

    pub fn is_solved(&self) -> bool {
        self.tiles == self.solved
    }

    /// Restore the construction-time snapshot.
    pub fn reset(&mut self) {
        self.tiles.clone_from(&self.solved);
    }

    /// Replace the arrangement. Returns false (and changes nothing) when
    /// `tiles` is not a permutation of the right length.
    pub fn set_tiles(&mut self, tiles: &[usize]) -> bool {
        if tiles.len() != self.solved.len() {
            return false;
        }
        let mut seen = vec![false; tiles.len()];
        for &t in tiles {
            if t >= seen.len() || seen[t] {
                return false;
            }
            seen[t] = true;
        }
        self.tiles.clear();
        self.tiles.extend_from_slice(tiles);
        true
    }

    /// Visual description for every slot, in slot order.
    pub fn describe(&self) -> Vec<TileView> {
        let n = self.size;
        let blank = self.blank_tile();
        self.tiles
            .iter()
            .enumerate()
            .map(|(slot, &tile)| {
                if tile == blank {
                    return TileView {
                        slot,
                        tile,
                        background: None,
                    };
                }
                let col = tile % n;
                let row = tile / n;
                let span = (n - 1) as f64;
                TileView {
                    slot,
                    tile,
                    background: Some(TileBackground {
                        size_pct: (n * 100) as f64,
                        x_pct: col as f64 / span * 100.0,
                        y_pct: row as f64 / span * 100.0,
                    }),
                }
            })
            .collect()
    }
}

/// Background crop of the shared source image for one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileBackground {
    /// Background size on both axes, in percent of the tile.
    pub size_pct: f64,
    pub x_pct: f64,
    pub y_pct: f64,
}

impl TileBackground {
    pub fn css_size(&self) -> String {
        format!("{}% {}%", self.size_pct, self.size_pct)
    }

    pub fn css_position(&self) -> String {
        format!("{}% {}%", self.x_pct, self.y_pct)
    }
}

/// What the renderer paints into one slot. `background == None` is the blank.
#[derive(Clone, Debug, PartialEq)]
pub struct TileView {
    pub slot: usize,
    pub tile: usize,
    pub background: Option<TileBackground>,
}

impl TileView {
    pub fn is_blank(&self) -> bool {
        self.background.is_none()
    }
}
