//! A single node of the document outline.

use super::destination::{make_page_destination, LocationArgs, PageLocation};
use super::text::{decode_text_string, encode_text_string};
use crate::document::PdfDocument;
use crate::error::Result;
use crate::object::{Dictionary, Object, ObjectRef};
use std::fmt;

/// Where an outline item jumps to.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Zero-based page number, resolved to a destination array when the item
    /// is written to a document.
    PageIndex(usize),
    /// Any destination object: an explicit array, a named destination, or a
    /// reference to either.
    Explicit(Object),
}

impl Destination {
    /// Check whether this destination is already a document object.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Destination::Explicit(_))
    }
}

impl From<usize> for Destination {
    fn from(page_index: usize) -> Self {
        Destination::PageIndex(page_index)
    }
}

impl From<Object> for Destination {
    fn from(obj: Object) -> Self {
        Destination::Explicit(obj)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::PageIndex(page) => write!(f, "{}", page),
            Destination::Explicit(obj) => write!(f, "{}", obj),
        }
    }
}

/// Target of an outline item: a destination or an action, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineTarget {
    /// Written as `/Dest`
    Destination(Destination),
    /// Action dictionary (or reference to one), written as `/A`
    Action(Object),
}

/// A single item in a document outline, including nested items.
///
/// The item knows nothing about its parent or siblings; that linkage is
/// produced by [`Outline`](super::Outline) when saving.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem {
    /// Title shown in the bookmark panel
    pub title: String,

    /// Destination or action performed when the item is clicked
    pub target: Option<OutlineTarget>,

    /// Location type used when a [`Destination::PageIndex`] is resolved
    pub page_location: Option<PageLocation>,

    /// Arguments for `page_location`
    pub location_args: LocationArgs,

    /// Children hidden in the viewer (negative `/Count`)
    pub is_closed: bool,

    /// Nested items
    pub children: Vec<OutlineItem>,

    /// Outline dictionary this item was read from or last written to.
    /// Existing objects are modified in place and keep their other entries.
    pub obj: Option<ObjectRef>,
}

impl OutlineItem {
    /// Create an item with a title and no target.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target: None,
            page_location: None,
            location_args: LocationArgs::new(),
            is_closed: false,
            children: Vec::new(),
            obj: None,
        }
    }

    /// Create an item jumping to a zero-based page number.
    pub fn with_page(title: impl Into<String>, page_index: usize) -> Self {
        Self::with_destination(title, Destination::PageIndex(page_index))
    }

    /// Create an item with any destination.
    pub fn with_destination(title: impl Into<String>, destination: impl Into<Destination>) -> Self {
        let mut item = Self::new(title);
        item.set_destination(destination);
        item
    }

    /// Create an item performing an action.
    pub fn with_action(title: impl Into<String>, action: Object) -> Self {
        let mut item = Self::new(title);
        item.set_action(action);
        item
    }

    /// Set the location type used for a page-number destination.
    pub fn with_page_location(mut self, location: PageLocation) -> Self {
        self.page_location = Some(location);
        self
    }

    /// Set the location type by name, e.g. `"FitH"`.
    pub fn with_page_location_name(mut self, location: &str) -> Result<Self> {
        self.page_location = Some(location.parse()?);
        Ok(self)
    }

    /// Set location arguments by keyword (`left`, `top`, `bottom`, `right`,
    /// `zoom`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::error::Error::InvalidArgument) naming
    /// the first unknown keyword; the item is not modified.
    pub fn with_location_args<I, K>(mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let args = LocationArgs::from_pairs(pairs)?;
        for (arg, value) in args.iter() {
            self.location_args.set(arg, value);
        }
        Ok(self)
    }

    /// Mark the item closed (children collapsed).
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.is_closed = closed;
        self
    }

    /// Append a child item.
    pub fn add_child(&mut self, child: OutlineItem) {
        self.children.push(child);
    }

    /// Builder variant of [`OutlineItem::add_child`].
    pub fn with_child(mut self, child: OutlineItem) -> Self {
        self.add_child(child);
        self
    }

    /// Replace the target with a destination, dropping any action.
    pub fn set_destination(&mut self, destination: impl Into<Destination>) {
        self.target = Some(OutlineTarget::Destination(destination.into()));
    }

    /// Replace the target with an action, dropping any destination.
    pub fn set_action(&mut self, action: Object) {
        self.target = Some(OutlineTarget::Action(action));
    }

    /// The destination, if the target is one.
    pub fn destination(&self) -> Option<&Destination> {
        match &self.target {
            Some(OutlineTarget::Destination(dest)) => Some(dest),
            _ => None,
        }
    }

    /// The action, if the target is one.
    pub fn action(&self) -> Option<&Object> {
        match &self.target {
            Some(OutlineTarget::Action(action)) => Some(action),
            _ => None,
        }
    }

    /// Create an item from an outline dictionary. Nested items are not read.
    ///
    /// When a malformed dictionary carries both `/Dest` and `/A`, the
    /// destination is kept, matching the precedence used when writing.
    pub fn from_dictionary_object(doc: &PdfDocument, obj_ref: ObjectRef) -> Result<Self> {
        let dict = doc.get_dict(obj_ref)?;

        let title = dict
            .get("Title")
            .map(|t| resolve(doc, t))
            .and_then(Object::as_string)
            .map(decode_text_string)
            .unwrap_or_default();

        let target = match (dict.get("Dest"), dict.get("A")) {
            (Some(dest), _) if !dest.is_null() => {
                Some(OutlineTarget::Destination(Destination::Explicit(dest.clone())))
            },
            (_, Some(action)) if !action.is_null() => Some(OutlineTarget::Action(action.clone())),
            _ => None,
        };

        Ok(Self {
            title,
            target,
            obj: Some(obj_ref),
            ..Self::new(String::new())
        })
    }

    /// Write this item's data to an outline dictionary and return its reference.
    ///
    /// The remembered object is updated in place unless `create_new` is set or
    /// there is none yet, in which case a new indirect dictionary is allocated
    /// and remembered. A page-number destination is resolved against `doc`
    /// and the resolved array replaces it on the item, so later writes reuse
    /// it. Writing `/Dest` removes `/A` and vice versa. Links to parent and
    /// siblings are left to the caller.
    pub fn to_dictionary_object(
        &mut self,
        doc: &mut PdfDocument,
        create_new: bool,
    ) -> Result<ObjectRef> {
        let entry = match &mut self.target {
            Some(OutlineTarget::Destination(dest)) => {
                if let Destination::PageIndex(page) = *dest {
                    let resolved =
                        make_page_destination(doc, page, self.page_location, &self.location_args)?;
                    log::debug!("Resolved page {} of '{}' to {}", page, self.title, resolved);
                    *dest = Destination::Explicit(resolved);
                }
                match dest {
                    Destination::Explicit(obj) => Some(("Dest", "A", obj.clone())),
                    Destination::PageIndex(_) => None,
                }
            },
            Some(OutlineTarget::Action(action)) => Some(("A", "Dest", action.clone())),
            None => None,
        };

        let obj_ref = match self.obj {
            Some(obj_ref) if !create_new => obj_ref,
            _ => {
                let obj_ref = doc.make_indirect(Object::Dictionary(Dictionary::new()));
                self.obj = Some(obj_ref);
                obj_ref
            },
        };

        let dict = doc.get_dict_mut(obj_ref)?;
        dict.insert("Title".to_string(), Object::String(encode_text_string(&self.title)));
        if let Some((key, stale, value)) = entry {
            dict.insert(key.to_string(), value);
            dict.remove(stale);
        }
        Ok(obj_ref)
    }
}

/// Follow a single indirect reference, leaving other objects as they are.
fn resolve<'a>(doc: &'a PdfDocument, obj: &'a Object) -> &'a Object {
    obj.as_reference()
        .and_then(|r| doc.get_object(r).ok())
        .unwrap_or(obj)
}

impl fmt::Display for OutlineItem {
    /// `[+] Title -> target` for a closed item with children, `[-]` for an
    /// open one and `[ ]` for a leaf.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indicator = match (self.children.is_empty(), self.is_closed) {
            (true, _) => "[ ]",
            (false, true) => "[+]",
            (false, false) => "[-]",
        };
        write!(f, "{} {} -> ", indicator, self.title)?;
        match &self.target {
            Some(OutlineTarget::Destination(dest)) => write!(f, "{}", dest),
            Some(OutlineTarget::Action(_)) => f.write_str("<Action>"),
            None => f.write_str("<None>"),
        }
    }
}
