//! Assembly, page numbering and the merge run that ties them together.

pub mod assembler;
pub mod pipeline;
pub mod progress;
pub mod stamper;

pub use assembler::{AssembledSource, Assembly, PdfAssembler};
pub use pipeline::{
    ArtifactOrigin, MergePhase, MergePipeline, MergeRequest, MergeStatistics, TemporaryArtifact,
};
pub use progress::{ChannelProgress, NoProgress, PhaseSpan, ProgressSink};
pub use stamper::{PageNumberStamper, page_label};
