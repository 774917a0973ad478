//! Mutable puzzle state: candidate masks, weak links, and regions.

use std::collections::HashSet;

use im::HashSet as WeakLinkSet;
use tracing::trace;

use crate::solver::{
    cells::{cell_name, CellIndex},
    constraint::ConstraintResult,
    masks::{self, ValueMask, MAX_SIZE},
    region::{Region, RegionKind},
};

/// The shared mutable state every constraint operates on.
///
/// Masks are packed: bit `size` marks a cell as given. Call sites never
/// touch the packing directly — `is_given`, `value`, and `keep_cell_mask`
/// isolate the bit math. The ownership contract is single-threaded and
/// strict: exactly one propagation loop mutates the board at a time, and
/// constraints request narrowing only through [`Board::keep_cell_mask`].
///
/// Weak links live in persistent sets so cloning a board for the search
/// driver shares the (setup-time frozen) graph instead of copying it.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<ValueMask>,
    given_bit: ValueMask,
    all_values: ValueMask,
    weak_links: Vec<WeakLinkSet<CellIndex>>,
    regions: Vec<Region>,
    modified: Vec<CellIndex>,
}

impl Board {
    /// An empty board with the standard row, column, and (for square
    /// sizes) box regions registered.
    ///
    /// # Panics
    ///
    /// Panics when `size` is outside `2..=31`; the mask representation has
    /// no room for larger boards.
    pub fn new(size: usize) -> Self {
        assert!(
            (2..=MAX_SIZE).contains(&size),
            "board size {size} out of range"
        );
        let all_values = masks::all_values(size);
        let mut board = Self {
            size,
            cells: vec![all_values; size * size],
            given_bit: 1 << size,
            all_values,
            weak_links: vec![WeakLinkSet::new(); size * size],
            regions: Vec::new(),
            modified: Vec::new(),
        };
        board.add_standard_regions();
        board
    }

    fn add_standard_regions(&mut self) {
        let size = self.size;
        for row in 0..size {
            let cells = (0..size).map(|col| row * size + col).collect();
            self.push_standard_region(format!("Row {}", row + 1), cells, RegionKind::Row);
        }
        for col in 0..size {
            let cells = (0..size).map(|row| row * size + col).collect();
            self.push_standard_region(format!("Column {}", col + 1), cells, RegionKind::Col);
        }

        let box_size = (size as f64).sqrt() as usize;
        if box_size * box_size != size {
            return;
        }
        for band in 0..box_size {
            for stack in 0..box_size {
                let mut cells = Vec::with_capacity(size);
                for row in 0..box_size {
                    for col in 0..box_size {
                        cells.push((band * box_size + row) * size + stack * box_size + col);
                    }
                }
                self.push_standard_region(
                    format!("Box {}", band * box_size + stack + 1),
                    cells,
                    RegionKind::Box,
                );
            }
        }
    }

    fn push_standard_region(&mut self, name: String, cells: Vec<CellIndex>, kind: RegionKind) {
        self.regions.push(Region {
            name,
            cells,
            kind,
            description: "standard region".to_string(),
            owner: None,
        });
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The mask with every value of this board's domain set.
    pub fn all_values(&self) -> ValueMask {
        self.all_values
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Candidates still possible in a cell, given bit stripped.
    pub fn cell_mask(&self, cell: CellIndex) -> ValueMask {
        self.cells[cell] & !self.given_bit
    }

    /// Whether the cell's value was supplied by the puzzle author.
    pub fn is_given(&self, cell: CellIndex) -> bool {
        self.cells[cell] & self.given_bit != 0
    }

    /// The cell's value once it has settled (given or narrowed to a single
    /// candidate), else `None`.
    pub fn value(&self, cell: CellIndex) -> Option<u32> {
        let mask = self.cell_mask(cell);
        (masks::popcount(mask) == 1).then(|| masks::min_value(mask))
    }

    /// Whether every cell has settled on exactly one value.
    pub fn is_solved(&self) -> bool {
        (0..self.cells.len()).all(|cell| masks::popcount(self.cell_mask(cell)) == 1)
    }

    /// Fixes a cell to an author-supplied value. Setup only; given cells
    /// are immutable during propagation.
    pub fn set_given(&mut self, cell: CellIndex, value: u32) {
        self.cells[cell] = masks::value_bit(value) | self.given_bit;
        self.modified.push(cell);
    }

    /// Narrows a cell to the intersection of its mask with `keep`.
    ///
    /// This is the single mutation primitive: masks only ever shrink, and
    /// only through here. A given cell is never altered — the call reports
    /// `Invalid` when `keep` excludes the given value and `Unchanged`
    /// otherwise. A non-given cell that empties reports `Invalid`.
    pub fn keep_cell_mask(&mut self, cell: CellIndex, keep: ValueMask) -> ConstraintResult {
        let current = self.cell_mask(cell);
        let kept = current & keep & self.all_values;
        if self.is_given(cell) {
            return if kept == 0 {
                ConstraintResult::Invalid
            } else {
                ConstraintResult::Unchanged
            };
        }
        if kept == current {
            return ConstraintResult::Unchanged;
        }
        self.cells[cell] = kept;
        if kept == 0 {
            return ConstraintResult::Invalid;
        }
        trace!(
            cell = %cell_name(cell, self.size),
            removed = %masks::mask_to_string(current & !kept, self.size),
            "narrowed"
        );
        self.modified.push(cell);
        ConstraintResult::Changed
    }

    /// Drains the cells narrowed since the last call.
    pub(crate) fn take_modified(&mut self) -> Vec<CellIndex> {
        std::mem::take(&mut self.modified)
    }

    /// Declares that two cells can never share a value, beyond whatever
    /// the standard geometry already forbids. Idempotent and symmetric;
    /// no-op for a self link. Setup-time only — the graph is read-only
    /// once propagation starts.
    pub fn add_weak_link(&mut self, a: CellIndex, b: CellIndex) {
        if a == b {
            return;
        }
        self.weak_links[a].insert(b);
        self.weak_links[b].insert(a);
    }

    pub fn has_weak_link(&self, a: CellIndex, b: CellIndex) -> bool {
        self.weak_links[a].contains(&b)
    }

    /// Every cell that can never share a value with `cell`: peers in any
    /// region plus weak links. Never contains `cell` itself.
    pub fn seen_cells(&self, cell: CellIndex) -> HashSet<CellIndex> {
        let mut seen: HashSet<CellIndex> = self.weak_links[cell].iter().copied().collect();
        for region in &self.regions {
            if region.cells.contains(&cell) {
                seen.extend(region.cells.iter().copied());
            }
        }
        seen.remove(&cell);
        seen
    }

    /// After forcing `a` and `b` equal, every exclusion of one must also
    /// apply to the other. Both neighborhoods are snapshotted before any
    /// link is added, so the transfer is symmetric.
    pub fn add_clone_weak_links(&mut self, a: CellIndex, b: CellIndex) {
        let seen_a: Vec<CellIndex> = self.seen_cells(a).into_iter().collect();
        let seen_b: Vec<CellIndex> = self.seen_cells(b).into_iter().collect();
        for cell in seen_a {
            self.add_weak_link(b, cell);
        }
        for cell in seen_b {
            self.add_weak_link(a, cell);
        }
    }

    /// Registers a distinctness region declared by a constraint.
    ///
    /// A region needs at least two cells; anything smaller is a
    /// constraint-authoring bug and is ignored rather than surfaced.
    pub fn add_region(
        &mut self,
        name: &str,
        cells: &[CellIndex],
        description: &str,
        owner: &str,
    ) {
        if cells.len() < 2 {
            return;
        }
        self.regions.push(Region {
            name: name.to_string(),
            cells: cells.to_vec(),
            kind: RegionKind::Extra,
            description: description.to_string(),
            owner: Some(owner.to_string()),
        });
    }

    /// Compact diagnostic rendering of a value set and the cells it
    /// concerns, e.g. `35R1C5` or `7R3C1,R4C2`.
    pub fn compact_name(&self, cells: &[CellIndex], mask: ValueMask) -> String {
        let values = masks::mask_to_string(mask, self.size);
        if cells.is_empty() {
            return values;
        }

        let separator = if self.size >= 10 { "," } else { "" };
        let rows: Vec<usize> = cells.iter().map(|&cell| cell / self.size).collect();
        let cols: Vec<usize> = cells.iter().map(|&cell| cell % self.size).collect();
        let group = if rows.iter().all(|&row| row == rows[0]) {
            let cols = cols
                .iter()
                .map(|&col| (col + 1).to_string())
                .collect::<Vec<_>>()
                .join(separator);
            format!("R{}C{}", rows[0] + 1, cols)
        } else if cols.iter().all(|&col| col == cols[0]) {
            let rows = rows
                .iter()
                .map(|&row| (row + 1).to_string())
                .collect::<Vec<_>>()
                .join(separator);
            format!("R{}C{}", rows, cols[0] + 1)
        } else {
            cells
                .iter()
                .map(|&cell| cell_name(cell, self.size))
                .collect::<Vec<_>>()
                .join(",")
        };
        format!("{values}{group}")
    }
}
