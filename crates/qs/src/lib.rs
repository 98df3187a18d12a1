//! qs: boolean query strings from the command line.
//!
//! `qs` wraps the `qs-query` parser so queries can be parsed, checked and
//! tokenized from a shell. Settings come from `.qs.toml` files discovered by
//! `qs-config`.

#![warn(missing_docs)]

pub mod cli;
