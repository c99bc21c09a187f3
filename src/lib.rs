//! Static file server with single byte-range support
//!
//! Serves a directory tree over HTTP/1.1. `GET` requests carrying a
//! satisfiable `Range: bytes=a-b` header receive `206 Partial Content`,
//! unsatisfiable ranges receive `416`, and anything else falls back to the
//! whole file. Every response carries a permissive CORS header.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
