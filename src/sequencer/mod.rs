// Sequencer module
// Rhythm cells, the musical grid, and the pure timeline algorithms
// (overlap resolution, quantization, rangehead snapping, tap recording)

pub mod cell;
pub mod overlap;
pub mod quantize;
pub mod rangehead;
pub mod recorder;
pub mod timeline;

pub use cell::{
    Arp, ArpPattern, CellId, Ratchet, RhythmCell, Strum, StrumDirection, generate_cell_id,
    reserve_cell_ids,
};
pub use overlap::{is_overlap_free, resolve_overlaps, resolve_overlaps_in_place};
pub use quantize::{QuantizeLevel, Quantizer, quantize};
pub use rangehead::{SNAP_POINT_COUNT, SnapPoint, snap_to_grid, snap_to_last_cell};
pub use recorder::TapRecorder;
pub use timeline::{BEAT, MusicalTime, SUBBEAT, Tempo};
