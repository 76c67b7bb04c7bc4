// src/source/mod.rs
// =============================================================================
// Where the URLs come from.
//
// The pool only needs a stream of strings. Today that stream is a text file
// with one URL per line; nothing here validates the URLs - a bad line turns
// into a request build failure inside the worker.
// =============================================================================

mod file;

pub use file::open_url_file;
