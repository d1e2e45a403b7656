// Adapters layer: concrete implementations of the store ports and the
// JSON state file the CLI persists between invocations.

pub mod memory;
pub mod state_file;
