// Overlap resolver - Removes overlaps between cells after an edit
// Later cells are pushed right; durations are never shortened

use crate::sequencer::cell::RhythmCell;

/// Return an overlap-free copy of `cells`, ordered by position
///
/// Cells are stably sorted by position (the earlier index wins a tie), then
/// each cell that starts before the end of its predecessor is moved to that
/// end. Durations are kept, so the total extent can grow.
pub fn resolve_overlaps(cells: &[RhythmCell]) -> Vec<RhythmCell> {
    let mut resolved = cells.to_vec();
    resolve_overlaps_in_place(&mut resolved);
    resolved
}

/// In-place variant of [`resolve_overlaps`]
///
/// Returns the number of cells that had to be moved.
pub fn resolve_overlaps_in_place(cells: &mut Vec<RhythmCell>) -> usize {
    // sort_by is stable
    cells.sort_by(|a, b| a.position().total_cmp(&b.position()));

    let mut moved = 0;
    let mut previous_end: Option<f64> = None;
    for cell in cells.iter_mut() {
        if let Some(end) = previous_end
            && cell.position() < end
        {
            cell.set_position(end);
            moved += 1;
        }
        previous_end = Some(cell.end());
    }

    moved
}

/// Check that no two cells overlap (in position order)
pub fn is_overlap_free(cells: &[RhythmCell]) -> bool {
    let mut ordered: Vec<&RhythmCell> = cells.iter().collect();
    ordered.sort_by(|a, b| a.position().total_cmp(&b.position()));
    ordered
        .windows(2)
        .all(|pair| !pair[0].overlaps(pair[1]))
}
