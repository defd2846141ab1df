use crate::{Grid, GridError, GridResult};

/// Maximum rows/cols accepted by the generator. A resource cap, not a
/// mathematical limit: the array-wide relabel scan below is
/// O(rows * cols^2) worst case, which is fine at this size. Union-find
/// is the natural upgrade if the cap is ever raised.
pub const MAX_DIM: usize = 50;

/// Perfect-maze generator (Eller's algorithm).
///
/// Builds the maze one row at a time, tracking which cells of the
/// active row are already connected via transient region labels. The
/// random choices only pick which spanning tree comes out; the
/// structural checks guarantee that the result is always connected
/// and acyclic.
pub struct Generator {
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Generate a perfect maze. Fails with `InvalidSize` if either
    /// dimension is outside [1, MAX_DIM].
    pub fn generate(&mut self, rows: usize, cols: usize) -> GridResult<Grid> {
        if rows < 1 || cols < 1 || rows > MAX_DIM || cols > MAX_DIM {
            return Err(GridError::InvalidSize { rows, cols });
        }

        let mut run = RowMerge {
            grid: Grid::new(rows, cols)?,
            // 0 means "not yet in a region"; fresh labels start at 1.
            labels: vec![0u32; cols],
            next_label: 1,
            active_row: 0,
        };

        for _ in 0..rows {
            run.assign_labels();
            run.place_right_walls(&mut self.rng);
            run.place_bottom_walls(&mut self.rng);
            run.advance_row();
        }
        run.close_final_row();

        Ok(run.grid)
    }
}

/// Per-run generation state: the grid under construction plus the
/// region labels of the active row. Labels are discarded when the run
/// finishes; they are never part of the grid.
struct RowMerge {
    grid: Grid,
    labels: Vec<u32>,
    next_label: u32,
    active_row: usize,
}

impl RowMerge {
    /// Step 1: every unlabeled cell of the active row gets a fresh,
    /// globally unique label.
    fn assign_labels(&mut self) {
        for label in self.labels.iter_mut() {
            if *label == 0 {
                *label = self.next_label;
                self.next_label += 1;
            }
        }
    }

    /// Step 2: coin-flip the right wall of each adjacent pair. Cells
    /// already in the same region must stay separated (carving would
    /// close a cycle); carving merges the two regions. The rightmost
    /// wall is always closed.
    fn place_right_walls(&mut self, rng: &mut SimpleRng) {
        let cols = self.grid.cols;
        for col in 0..cols - 1 {
            if rng.coin() || self.labels[col] == self.labels[col + 1] {
                let idx = self.grid.idx(self.active_row, col);
                self.grid.right_walls[idx] = true;
            } else {
                self.merge(col);
            }
        }
        let idx = self.grid.idx(self.active_row, cols - 1);
        self.grid.right_walls[idx] = true;
    }

    /// Relabel every cell holding the right-hand cell's label to the
    /// left-hand cell's label (array-wide scan, see MAX_DIM note).
    fn merge(&mut self, col: usize) {
        let absorbed = self.labels[col + 1];
        let into = self.labels[col];
        for label in self.labels.iter_mut() {
            if *label == absorbed {
                *label = into;
            }
        }
    }

    /// Step 3: coin-flip the bottom wall of each cell, but never close
    /// the last open bottom of a region; a region with no downward
    /// opening left would be cut off from the rest of generation.
    fn place_bottom_walls(&mut self, rng: &mut SimpleRng) {
        for col in 0..self.grid.cols {
            let wanted = rng.coin();
            if wanted && self.region_keeps_an_opening(col) {
                let idx = self.grid.idx(self.active_row, col);
                self.grid.bottom_walls[idx] = true;
            }
        }
    }

    /// Whether some other cell of `col`'s region still has an open
    /// bottom wall in the active row.
    fn region_keeps_an_opening(&self, col: usize) -> bool {
        let label = self.labels[col];
        for other in 0..self.grid.cols {
            if other != col
                && self.labels[other] == label
                && !self.grid.bottom_at(self.active_row, other)
            {
                return true;
            }
        }
        false
    }

    /// Step 4: labels flow down through open bottom walls; cells under
    /// a closed bottom wall start the next row unlabeled.
    fn advance_row(&mut self) {
        if self.active_row == self.grid.rows - 1 {
            return;
        }
        for col in 0..self.grid.cols {
            if self.grid.bottom_at(self.active_row, col) {
                self.labels[col] = 0;
            }
        }
        self.active_row += 1;
    }

    /// Step 5: in the final row, force-merge every adjacent pair still
    /// in different regions and close the whole bottom boundary. This
    /// is what guarantees a single connected region.
    fn close_final_row(&mut self) {
        let row = self.active_row;
        let cols = self.grid.cols;
        for col in 0..cols - 1 {
            let idx = self.grid.idx(row, col);
            self.grid.bottom_walls[idx] = true;
            if self.labels[col] != self.labels[col + 1] {
                self.grid.right_walls[idx] = false;
                self.merge(col);
            }
        }
        let idx = self.grid.idx(row, cols - 1);
        self.grid.bottom_walls[idx] = true;
        self.grid.right_walls[idx] = true;
    }
}

/// Simple PRNG, seeded via getrandom for WASM compatibility.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        let seed = u64::from_le_bytes(seed_bytes);
        Self::with_seed(seed)
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    /// Unbiased coin flip.
    fn coin(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}
