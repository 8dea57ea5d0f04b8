//! User-facing reporting besides the CSV output itself.

mod progress;

pub use progress::{
    NoopListener, ProgressEvent, ProgressListener, ProgressTracker, create_listener,
};
