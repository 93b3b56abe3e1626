pub mod discovery;
pub mod output;
pub mod segmenter;
pub mod stats;

// Re-export main types for convenient access
pub use segmenter::{Segmentation, Segmenter, SegmenterOptions};
pub use stats::{format_stats, text_stats, TextStats};

// Re-export document output utilities
pub use output::{
    read_document_record, segments_file_exists, segments_file_path, write_document_record,
    DocumentRecord,
};
