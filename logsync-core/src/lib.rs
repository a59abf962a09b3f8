//! # logsync-core
//!
//! Core library for converting Logseq pages into Hugo content.
//!
//! A page is read from the Logseq repository, passed through a fixed chain
//! of optional text transforms selected by its mapping options, and
//! prefixed with a `+++` front matter block. Saving the result and any git
//! work around it is left to the caller.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod pipeline;
pub mod slug;
pub mod transform;

pub use config::{ConfigError, DocumentOptions, Mapping, ResolvedRoots, SyncConfig};
pub use error::PageError;
pub use frontmatter::{Clock, FixedClock, SystemClock};
pub use pipeline::{Page, PipelineContext};
pub use slug::slugify;
pub use transform::{build_chain, RecursionRequest, Transform, TransformContext};
