mod analysis;
mod post;

pub use analysis::{AnalysisResult, AnalysisStatus, ReviewAnalysis};
pub use post::{BlogPost, NewBlogPost, SearchPage, SortMode};
