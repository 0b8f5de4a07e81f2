//! Editing files in place
//!
//! [`FileEditSession`] owns the read-modify-write cycle and its concurrent
//! modification guard. The other modules are the edits built on top of it:
//! relabeling rows, merging two files, wrapping raw text into line groups and
//! normalizing accents.

pub mod accent;
pub mod fingerprint;
pub mod merge;
pub mod relabel;
pub mod session;
pub mod wrap;

pub use accent::convert_session;
pub use fingerprint::Fingerprint;
pub use merge::{merge, MergeSpec, MergedDocument};
pub use relabel::{check_target_alignment, parse_mapping, relabel_session, LabelMapping};
pub use session::{FileEditSession, FinishReport, SessionOptions};
pub use wrap::wrap_text;
