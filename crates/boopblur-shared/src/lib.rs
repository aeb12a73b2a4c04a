//! # boopblur-shared
//!
//! Domain types and pure logic shared by every boopblur crate: the artifact
//! data model, calendar keys, decay classification, retention decisions and
//! the vibe-pack catalog. Nothing in here touches the filesystem or a clock.

pub mod constants;
pub mod decay;
pub mod error;
pub mod retention;
pub mod temporal;
pub mod types;
pub mod vibe;

pub use decay::{DecayState, DecayTable};
pub use error::{DecayTableError, ParsePolicyError};
pub use retention::expired_ids;
pub use types::{Artifact, ArtifactKind, DeletionPolicy, Settings, Trace};
pub use vibe::{SparkLine, VibeCatalog, VibePack};
