//! Regex driven text inspection and mutation for CodeManager.
//!
//! A document, either a file on disk or an in-memory string, is decomposed
//! around regular-expression matches into an ordered sequence of segments. The
//! caller receives handles to the matched segments, edits them in place or
//! inserts new text around them, and commits. Committing concatenates the
//! segments back into one document and, for files, writes it to disk.
//!
//! - [`Inspector`] arbitrates access to files: any number of readers, or a
//!   single writer, per path.
//! - [`Inspection`] owns one decomposition at a time. Read-only sessions commit
//!   implicitly when the next query arrives; read-write sessions must commit or
//!   cancel first.
//! - [`SegmentHandle`] values carry the generation they were issued in, so a
//!   handle kept across a commit or cancel is rejected instead of addressing the
//!   wrong text.
//!
//! # Example
//!
//! ```
//! use codemanager_inspector::Inspector;
//!
//! let inspector = Inspector::new();
//! let mut inspection = inspector.inspect_text("Hey dear Neighbours");
//!
//! let dear = inspection.find("dear")?.expect("match");
//! inspection.set_text(dear, "beloved")?;
//! inspection.commit()?;
//!
//! assert_eq!(inspection.document(), "Hey beloved Neighbours");
//! # Ok::<(), codemanager_inspector::InspectionError>(())
//! ```

mod cutter;
mod error;
mod handle;
mod line_ending;
mod registry;
mod segment;
mod session;
mod settings;
mod store;

pub use cutter::{Piece, PieceKind, cut_all, cut_single};
pub use error::{ErrorCategory, InspectionError};
pub use handle::{SegmentHandle, SessionId};
pub use line_ending::{HOST_NEWLINE, normalize_line_endings, normalize_line_endings_to};
pub use registry::{Inspector, LockMode};
pub use segment::{CapturedGroup, LineStats, MatchCaptures, Segment, SegmentOrigin};
pub use session::{CommitOutcome, Inspection, InspectionMode, SessionState, Source};
pub use settings::{InspectionSettings, RegexOptions};

#[cfg(test)]
mod tests;
