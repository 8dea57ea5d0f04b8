//! Resumable row streaming.

mod enricher;
mod output;
mod pool;
mod reader;
mod resumer;
mod selection;
mod sink;
mod writer;

pub use enricher::{EnrichSummary, Enricher, EnricherBuilder};
pub use output::{OutputMode, ResolvedOutput};
pub use pool::OrderedPool;
pub use reader::{Row, RowReader};
pub use resumer::{ResumeState, ResumeStrategy, Resumer};
pub use selection::{ColumnRef, Selection};
pub use sink::OutputSink;
pub use writer::RowWriter;
