//! # PDF Outline
//!
//! Read, edit and write the document outline ("bookmarks") of a PDF.
//!
//! ## Core Features
//!
//! - **Owned tree editing**: the outline's linked dictionaries are read into
//!   plain [`OutlineItem`]s that can be inserted, removed and reordered freely
//! - **In-place write-back**: saving rebuilds `/First`, `/Last`, `/Prev`,
//!   `/Next`, `/Parent` and `/Count` while reusing the original dictionaries
//!   and keeping entries this crate does not manage (`/C`, `/F`, ...)
//! - **Open/closed state**: collapsed items round-trip through the sign of
//!   `/Count` (ISO 32000-1:2008, Section 12.3.3)
//! - **Destinations**: page numbers resolve to explicit destinations with any
//!   of the eight location types (`/XYZ`, `/Fit`, `/FitH`, ...)
//! - **Robustness**: reference loops are repaired (lenient) or reported
//!   (strict); nesting depth is bounded
//!
//! ## Quick Start
//!
//! ```
//! use pdf_outline::config::OutlineOptions;
//! use pdf_outline::document::PdfDocument;
//! use pdf_outline::outline::OutlineItem;
//!
//! # fn main() -> Result<(), pdf_outline::Error> {
//! let mut pdf = PdfDocument::new();
//! pdf.add_page();
//! pdf.add_page();
//!
//! let mut outline = pdf.open_outline(OutlineOptions::default());
//! outline.edit(|outline| {
//!     let root = outline.root_mut()?;
//!     root.push(OutlineItem::with_page("Cover", 0));
//!     root.push(OutlineItem::with_page("Contents", 1));
//!     Ok(())
//! })?;
//!
//! let mut outline = pdf.open_outline(OutlineOptions::strict());
//! assert_eq!(outline.root()?.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Document object model
pub mod document;
pub mod object;

// Document structure
pub mod outline;

// Configuration
pub mod config;

// Re-exports
pub use config::OutlineOptions;
pub use document::PdfDocument;
pub use error::{Error, Result};
pub use outline::{Destination, Outline, OutlineItem, OutlineSession, OutlineTarget, PageLocation};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
