//! PDF document outline (bookmarks) support.
//!
//! Read the outline of a [`PdfDocument`](crate::document::PdfDocument) into
//! an owned tree of [`OutlineItem`]s, edit it freely, then write it back:
//!
//! ```
//! use pdf_outline::config::OutlineOptions;
//! use pdf_outline::document::PdfDocument;
//! use pdf_outline::outline::{OutlineItem, PageLocation};
//!
//! let mut pdf = PdfDocument::new();
//! for _ in 0..3 {
//!     pdf.add_page();
//! }
//!
//! let mut outline = pdf.open_outline(OutlineOptions::default());
//! let chapter = OutlineItem::with_page("Chapter 1", 0)
//!     .with_child(
//!         OutlineItem::with_page("Section 1.1", 1)
//!             .with_page_location(PageLocation::FitH)
//!             .with_location_args([("top", 700.0)])?,
//!     )
//!     .with_closed(true);
//! outline.root_mut()?.push(chapter);
//! outline.save()?;
//! # Ok::<(), pdf_outline::error::Error>(())
//! ```

mod destination;
mod item;
pub mod text;
mod tree;

pub use destination::{make_page_destination, LocationArg, LocationArgs, PageLocation};
pub use item::{Destination, OutlineItem, OutlineTarget};
pub use tree::{Outline, OutlineSession};
