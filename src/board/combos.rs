//! Winning line enumeration
//!
//! A [`WinCombo`] is one run of `win_length` contiguous squares in a row,
//! column or diagonal. [`Geometry`] bundles every combo for one
//! (size, win length) pair together with a per-square index so that
//! callers only ever generate the lines once per decision.

/// Direction vectors in enumeration order
const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // Horizontal →
    (1, 0),  // Vertical ↓
    (1, 1),  // Diagonal ↘
    (1, -1), // Diagonal ↙
];

/// Board indices of one candidate winning line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WinCombo(Vec<usize>);

impl WinCombo {
    #[inline]
    pub fn cells(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Enumerate every winning line for a `size x size` board.
///
/// Order: all rows, then all columns, then ↘ diagonals, then ↙ diagonals.
/// Columns are walked column by column (top to bottom within a column);
/// every other orientation is ordered by its starting square, row-major.
/// `win_length == 0` or `win_length > size` yields no lines.
#[must_use]
pub fn generate_win_combos(size: usize, win_length: usize) -> Vec<WinCombo> {
    let mut combos = Vec::new();
    if win_length == 0 || win_length > size {
        return combos;
    }

    #[allow(clippy::cast_possible_wrap)]
    let (n, len) = (size as isize, win_length as isize);

    for &(dr, dc) in &DIRECTIONS {
        let column_major = (dr, dc) == (1, 0);
        for outer in 0..n {
            for inner in 0..n {
                let (row, col) = if column_major { (inner, outer) } else { (outer, inner) };
                let end_row = row + dr * (len - 1);
                let end_col = col + dc * (len - 1);
                if end_row < 0 || end_row >= n || end_col < 0 || end_col >= n {
                    continue;
                }
                #[allow(clippy::cast_sign_loss)]
                let line = (0..len)
                    .map(|i| ((row + dr * i) * n + (col + dc * i)) as usize)
                    .collect();
                combos.push(WinCombo(line));
            }
        }
    }

    combos
}

/// All winning lines for one (size, win length) pair.
#[derive(Debug, Clone)]
pub struct Geometry {
    size: usize,
    win_length: usize,
    combos: Vec<WinCombo>,
    /// `through[square]` = indices into `combos` of lines containing `square`
    through: Vec<Vec<usize>>,
}

impl Geometry {
    #[must_use]
    pub fn new(size: usize, win_length: usize) -> Self {
        let combos = generate_win_combos(size, win_length);
        let mut through = vec![Vec::new(); size * size];
        for (ci, combo) in combos.iter().enumerate() {
            for &idx in combo.cells() {
                through[idx].push(ci);
            }
        }
        Self {
            size,
            win_length,
            combos,
            through,
        }
    }

    /// Standard 3x3, three in a row
    #[must_use]
    pub fn classic() -> Self {
        Self::new(3, 3)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    #[inline]
    pub fn combos(&self) -> &[WinCombo] {
        &self.combos
    }

    /// Lines passing through `index`, in generation order
    pub fn combos_through(&self, index: usize) -> impl Iterator<Item = &WinCombo> + '_ {
        self.through
            .get(index)
            .into_iter()
            .flatten()
            .map(move |&ci| &self.combos[ci])
    }
}
