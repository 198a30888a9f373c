//! PDF document model.
//!
//! An in-memory table of indirect objects together with the trailer, the
//! document catalog and a flattened page list. This is the object graph that
//! outline dictionaries live in; parsing and serialising files happens
//! elsewhere.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use indexmap::IndexMap;

/// US Letter media box used for pages added without an explicit size.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// PDF document.
///
/// This structure provides:
/// - Indirect object allocation and lookup by [`ObjectRef`]
/// - The document catalog (`/Root`)
/// - A zero-based page list whose entries are page object references
///
/// # Example
///
/// ```
/// use pdf_outline::document::PdfDocument;
///
/// let mut doc = PdfDocument::new();
/// doc.add_page();
/// doc.add_page();
/// assert_eq!(doc.page_count(), 2);
/// let first = doc.page_ref(0)?;
/// assert!(doc.get_dict(first)?.contains_key("MediaBox"));
/// # Ok::<(), pdf_outline::error::Error>(())
/// ```
#[derive(Clone)]
pub struct PdfDocument {
    /// PDF version (major, minor)
    version: (u8, u8),
    /// Indirect objects in allocation order
    objects: IndexMap<ObjectRef, Object>,
    /// Trailer dictionary
    trailer: Dictionary,
    /// Page tree root (`/Pages`)
    pages_ref: ObjectRef,
    /// Flattened page list
    pages: Vec<ObjectRef>,
    /// Next object number to hand out
    next_object_id: u32,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("version", &self.version)
            .field("objects", &self.objects.len())
            .field("pages", &self.pages.len())
            .finish_non_exhaustive()
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut doc = Self {
            version: (1, 7),
            objects: IndexMap::new(),
            trailer: Dictionary::new(),
            pages_ref: ObjectRef::new(0, 0),
            pages: Vec::new(),
            next_object_id: 1,
        };

        let mut pages = Dictionary::new();
        pages.insert("Type".to_string(), Object::name("Pages"));
        pages.insert("Kids".to_string(), Object::Array(Vec::new()));
        pages.insert("Count".to_string(), Object::Integer(0));
        doc.pages_ref = doc.make_indirect(Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.insert("Type".to_string(), Object::name("Catalog"));
        catalog.insert("Pages".to_string(), Object::Reference(doc.pages_ref));
        let catalog_ref = doc.make_indirect(Object::Dictionary(catalog));

        doc.trailer
            .insert("Root".to_string(), Object::Reference(catalog_ref));
        doc
    }

    /// Get the PDF version as (major, minor).
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// Get the trailer dictionary.
    pub fn trailer(&self) -> &Dictionary {
        &self.trailer
    }

    /// Number of indirect objects in the document.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Iterate over all indirect objects in allocation order.
    pub fn objects(&self) -> impl Iterator<Item = (&ObjectRef, &Object)> {
        self.objects.iter()
    }

    /// Register `obj` as a new indirect object and return its reference.
    pub fn make_indirect(&mut self, obj: Object) -> ObjectRef {
        let obj_ref = ObjectRef::new(self.allocate_object_id(), 0);
        log::debug!("Allocated object {} ({})", obj_ref, obj.type_name());
        self.objects.insert(obj_ref, obj);
        obj_ref
    }

    /// Replace (or create) the indirect object at `obj_ref`.
    pub fn set_object(&mut self, obj_ref: ObjectRef, obj: Object) {
        if obj_ref.id >= self.next_object_id {
            self.next_object_id = obj_ref.id + 1;
        }
        self.objects.insert(obj_ref, obj);
    }

    /// Check whether an indirect object exists.
    pub fn contains_object(&self, obj_ref: ObjectRef) -> bool {
        self.objects.contains_key(&obj_ref)
    }

    /// Look up an indirect object.
    pub fn get_object(&self, obj_ref: ObjectRef) -> Result<&Object> {
        self.objects
            .get(&obj_ref)
            .ok_or(Error::ObjectNotFound(obj_ref.id, obj_ref.gen))
    }

    /// Look up an indirect object for modification.
    pub fn get_object_mut(&mut self, obj_ref: ObjectRef) -> Result<&mut Object> {
        self.objects
            .get_mut(&obj_ref)
            .ok_or(Error::ObjectNotFound(obj_ref.id, obj_ref.gen))
    }

    /// Look up an indirect object that must be a dictionary (or stream).
    pub fn get_dict(&self, obj_ref: ObjectRef) -> Result<&Dictionary> {
        let obj = self.get_object(obj_ref)?;
        obj.as_dict().ok_or_else(|| Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: obj.type_name().to_string(),
        })
    }

    /// Mutable variant of [`PdfDocument::get_dict`].
    pub fn get_dict_mut(&mut self, obj_ref: ObjectRef) -> Result<&mut Dictionary> {
        let obj = self.get_object_mut(obj_ref)?;
        let found = obj.type_name();
        obj.as_dict_mut().ok_or_else(|| Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: found.to_string(),
        })
    }

    /// Reference to the document catalog.
    pub fn catalog_ref(&self) -> Result<ObjectRef> {
        self.trailer
            .get("Root")
            .and_then(Object::as_reference)
            .ok_or_else(|| Error::InvalidObjectType {
                expected: "Reference".to_string(),
                found: self
                    .trailer
                    .get("Root")
                    .map_or("Null", Object::type_name)
                    .to_string(),
            })
    }

    /// Get the document catalog dictionary.
    pub fn catalog(&self) -> Result<&Dictionary> {
        let root = self.catalog_ref()?;
        self.get_dict(root)
    }

    /// Get the document catalog dictionary for modification.
    pub fn catalog_mut(&mut self) -> Result<&mut Dictionary> {
        let root = self.catalog_ref()?;
        self.get_dict_mut(root)
    }

    /// Reference to the outline container (`/Root /Outlines`), if any.
    pub fn outlines_ref(&self) -> Result<Option<ObjectRef>> {
        Ok(self
            .catalog()?
            .get("Outlines")
            .and_then(Object::as_reference))
    }

    /// Point `/Root /Outlines` at `outlines`.
    pub fn set_outlines_ref(&mut self, outlines: ObjectRef) -> Result<()> {
        self.catalog_mut()?
            .insert("Outlines".to_string(), Object::Reference(outlines));
        Ok(())
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page object references in page order.
    pub fn pages(&self) -> &[ObjectRef] {
        &self.pages
    }

    /// Reference of the page at zero-based `index`.
    pub fn page_ref(&self, index: usize) -> Result<ObjectRef> {
        self.pages.get(index).copied().ok_or_else(|| {
            Error::invalid_argument(format!(
                "Page index {} out of range (document has {} pages)",
                index,
                self.pages.len()
            ))
        })
    }

    /// Zero-based index of the page object `page`, if it belongs to this document.
    pub fn page_index(&self, page: ObjectRef) -> Option<usize> {
        self.pages.iter().position(|&p| p == page)
    }

    /// Append a blank US Letter page and return its reference.
    pub fn add_page(&mut self) -> ObjectRef {
        let mut page = Dictionary::new();
        page.insert("Type".to_string(), Object::name("Page"));
        page.insert("Parent".to_string(), Object::Reference(self.pages_ref));
        page.insert(
            "MediaBox".to_string(),
            Object::Array(DEFAULT_MEDIA_BOX.iter().map(|&v| Object::number(v)).collect()),
        );
        let page_ref = self.make_indirect(Object::Dictionary(page));
        self.pages.push(page_ref);

        let count = self.pages.len() as i64;
        if let Some(tree) = self
            .objects
            .get_mut(&self.pages_ref)
            .and_then(Object::as_dict_mut)
        {
            if let Some(Object::Array(kids)) = tree.get_mut("Kids") {
                kids.push(Object::Reference(page_ref));
            }
            tree.insert("Count".to_string(), Object::Integer(count));
        }
        page_ref
    }

    /// Allocate a new object ID.
    fn allocate_object_id(&mut self) -> u32 {
        let id = self.next_object_id;
        self.next_object_id += 1;
        id
    }
}
