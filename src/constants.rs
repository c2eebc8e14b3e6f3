//! Core Constants
//!
//! Centralized tunables for the coordination core.

/// Maximum number of events queued during a re-entrant dispatch cycle.
/// Events beyond this are dropped and counted, never delivered.
pub const EVENT_QUEUE_CAPACITY: usize = 50;

/// Minimum gap between accepted scene picks, in milliseconds.
/// Absorbs duplicate pointer events from a single physical click.
pub const PICK_DEBOUNCE_MS: u64 = 50;

/// Default config file name under the application data directory
pub const CONFIG_FILE_NAME: &str = "meshview-core.json";
