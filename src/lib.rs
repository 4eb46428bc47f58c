// Library root
// -----------
// This crate exposes the movie catalog as a library; the binary
// (`main.rs`) wires the pieces together and runs the interactive menu.
//
// Module responsibilities:
// - `movie`: the record type and the ordered, title-keyed `Catalog`.
// - `storage`: the `MovieStorage` contract and its JSON and CSV backends.
// - `lookup`: the `MetadataLookup` trait and the OMDb HTTP client.
// - `app`: `MovieApp`, the menu operations as plain methods.
// - `stats` / `site`: rating statistics and static page generation.
// - `config`: command-line flags with environment fallbacks.
// - `ui`: the terminal menu and prompts, delegating to `app`.
pub mod app;
pub mod config;
pub mod error;
pub mod lookup;
pub mod movie;
pub mod site;
pub mod stats;
pub mod storage;
pub mod ui;
