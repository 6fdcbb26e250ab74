pub mod catalog;
pub mod exam_year;
pub mod filename;
pub mod paper;
pub mod paths;

pub use catalog::{Catalog, CatalogError};
pub use exam_year::{ExamYear, parse_exam_year};
pub use paper::{ExamType, PaperRecord};
