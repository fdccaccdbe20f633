mod address;
pub use address::*;

mod country;
pub use country::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod fit;
pub use fit::*;

mod font;
pub use self::font::*;

mod grid;
pub use grid::*;

mod info;
pub use info::*;

mod page;
pub use page::*;

mod rect;
pub use rect::*;

mod sheet;
pub use sheet::*;

mod spec;
pub use spec::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
