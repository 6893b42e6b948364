//! Course material tooling for the CS32 codespace environment.
//!
//! Three binaries share this library: `grab32` fetches chapter repos,
//! pset zips, or the one-time codespace setup; `grabchapter` is the
//! legacy numbered-chapter fetcher; `strip-notes` removes presenter-only
//! cells from Jupyter notebooks before they go out to students.

pub mod archive;
pub mod chapter;
pub mod error;
pub mod fetch;
pub mod grab;
pub mod notebook;
pub mod resource;
pub mod workspace;
