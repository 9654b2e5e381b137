// Resume scoring: PDF upload → text → ATS analysis.

pub mod handlers;
pub mod pdf;

pub use pdf::{DocumentError, DocumentExtractor, PdfTextExtractor};
