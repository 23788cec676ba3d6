// beatlight_cli: file-level commands for the `beatlight` binary.
//
// - `songs.rs`:    beats/ and effects/ folder conventions, song discovery.
// - `commands.rs`: predict / validate / compare, config overrides.
// - `report.rs`:   console rendering of stats, findings and comparisons.
//
// The binary in `main.rs` only parses arguments, installs logging and maps
// results to an exit status.

pub mod commands;
pub mod report;
pub mod songs;
