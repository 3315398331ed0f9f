// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive tag manager.
//
// Module responsibilities:
// - `config`: Runtime settings read from the environment (`.env` honored).
// - `auth`: Credential provider returning the capability token used to
//   authorize remote calls, backed by an on-disk token cache.
// - `tags`: Codec between the remote `"tags"` property string and a
//   structured, ordered tag set.
// - `api`: Wire types and the blocking HTTP client for the remote file
//   store, behind the `FileStore` trait.
// - `manager`: Tag operations (list/add/remove/search) composed from the
//   store and the codec.
// - `ui`: Terminal menu loop, table rendering and ordinal selection.
//
// Keeping this separation makes it easier to test the tag logic against an
// in-memory store or replace the UI in the future.
pub mod api;
pub mod auth;
pub mod config;
pub mod manager;
pub mod tags;
pub mod ui;
