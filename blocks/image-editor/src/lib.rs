//! Ordered image set editor for marketplace listings.
//!
//! DESIGN
//! ======
//! Two phases, never interleaved: local mutations of the working list
//! (`add_image`, `remove_image`, `move_image`) and `commit`, which uploads
//! pending files and reconciles with the server through a minimal diff.
//! The editor is identity-agnostic; credentials live in the `ListingImageApi`
//! and `UploadGateway` implementations handed to it.

mod commit;
pub mod diff;
pub mod drag;
pub mod editor;
pub mod error;
pub mod ports;
pub mod report;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use diff::{compute_diff, ImageDiff, PlannedCreate, PlannedUpdate};
pub use drag::{hover_move, SlotBounds};
pub use editor::{Collaborators, ImageSetEditor};
pub use error::{CommitError, EditorError, FailurePhase, OpenError, RemoteError};
pub use ports::{ImageCompressor, ListingImageApi, NewListingImage, UploadDestination, UploadGateway};
pub use report::{AppliedOperation, CommitReport, FailedOperation, ImageOperation};
pub use types::{
    BaselineImage, CompressionOptions, EditorConfig, EntrySource, ImageEntry, PendingContent, RawImageFile,
};
