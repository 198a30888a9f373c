//! Reading and writing the document outline tree (ISO 32000-1:2008, Section 12.3.3).
//!
//! On disk every outline level is a doubly linked list of dictionaries
//! (`/Prev`, `/Next`) hanging off its parent (`/First`, `/Last`), each child
//! pointing back through `/Parent`. `/Count` holds the number of visible
//! descendants; a negative value marks an item whose children are collapsed.
//! In memory the same structure is an owned tree of [`OutlineItem`]s; the
//! linkage is only rebuilt when saving.

use super::item::OutlineItem;
use crate::config::OutlineOptions;
use crate::document::PdfDocument;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashSet;
use std::fmt;
use std::ops::{Deref, DerefMut};

impl PdfDocument {
    /// Open the document outline ("bookmarks") for editing.
    ///
    /// Changes are written back by [`Outline::save`], or by committing an
    /// [`OutlineSession`].
    ///
    /// # Example
    ///
    /// ```
    /// use pdf_outline::config::OutlineOptions;
    /// use pdf_outline::document::PdfDocument;
    /// use pdf_outline::outline::OutlineItem;
    ///
    /// let mut pdf = PdfDocument::new();
    /// pdf.add_page();
    ///
    /// let mut outline = pdf.open_outline(OutlineOptions::default());
    /// outline.edit(|outline| {
    ///     outline.root_mut()?.insert(0, OutlineItem::with_page("Intro", 0));
    ///     Ok(())
    /// })?;
    /// # Ok::<(), pdf_outline::error::Error>(())
    /// ```
    pub fn open_outline(&mut self, options: OutlineOptions) -> Outline<'_> {
        Outline::new(self, options)
    }
}

/// Editable view of a document outline.
///
/// The root items are read from the document on first use of
/// [`Outline::root`] / [`Outline::root_mut`], or explicitly with
/// [`Outline::load`], and cached until [`Outline::invalidate`].
#[derive(Debug)]
pub struct Outline<'a> {
    doc: &'a mut PdfDocument,
    root: Option<Vec<OutlineItem>>,
    options: OutlineOptions,
    updating: bool,
}

impl<'a> Outline<'a> {
    /// Bind an outline to `doc`. Nothing is read yet.
    pub fn new(doc: &'a mut PdfDocument, options: OutlineOptions) -> Self {
        Self {
            doc,
            root: None,
            options,
            updating: false,
        }
    }

    /// Traversal options.
    pub fn options(&self) -> OutlineOptions {
        self.options
    }

    /// The underlying document.
    pub fn document(&self) -> &PdfDocument {
        &*self.doc
    }

    /// The underlying document, e.g. to add pages while editing.
    pub fn document_mut(&mut self) -> &mut PdfDocument {
        &mut *self.doc
    }

    /// Check whether the root items have been read from the document.
    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    /// Check whether an edit session is open.
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Root items, reading them from the document first if needed.
    pub fn root(&mut self) -> Result<&[OutlineItem]> {
        let items = self.root_mut()?;
        Ok(items.as_slice())
    }

    /// Mutable root items, reading them from the document first if needed.
    pub fn root_mut(&mut self) -> Result<&mut Vec<OutlineItem>> {
        if self.root.is_none() {
            return self.load();
        }
        Ok(self.root.get_or_insert_with(Vec::new))
    }

    /// Read the root items from the document, replacing the cached ones.
    ///
    /// # Errors
    ///
    /// In strict mode, [`Error::OutlineStructure`] if an outline object
    /// occurs twice, or the lookup error of an outline entry that is not a
    /// dictionary. The cache is left untouched on error.
    pub fn load(&mut self) -> Result<&mut Vec<OutlineItem>> {
        let mut items = Vec::new();
        if let Some(first) = self.first_root_entry()? {
            let mut reader = LevelReader {
                doc: &*self.doc,
                options: self.options,
                visited: HashSet::new(),
            };
            reader.load_level(first, &mut items, 0)?;
            log::debug!(
                "Loaded {} root outline items ({} objects)",
                items.len(),
                reader.visited.len()
            );
        }
        Ok(self.root.insert(items))
    }

    /// Discard unsaved edits and read the root items again.
    pub fn reload(&mut self) -> Result<&mut Vec<OutlineItem>> {
        self.invalidate();
        self.load()
    }

    /// Drop the cached items; the next access reads them again.
    ///
    /// Unsaved edits are lost.
    pub fn invalidate(&mut self) {
        self.root = None;
    }

    /// Write the root items back to the document.
    ///
    /// Does nothing if the outline was never loaded. Otherwise makes sure
    /// `/Root /Outlines` exists and rebuilds every level's linkage and counts,
    /// updating the items' existing dictionaries in place.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if a page-number destination is out of range;
    /// in strict mode [`Error::OutlineStructure`] if two items share an object.
    pub fn save(&mut self) -> Result<()> {
        let Some(items) = self.root.as_mut() else {
            log::debug!("Outline was never loaded, nothing to save");
            return Ok(());
        };

        let container = outlines_container(self.doc)?;
        let mut writer = LevelWriter {
            doc: &mut *self.doc,
            options: self.options,
            visited: HashSet::new(),
        };
        writer.save_level(container, items, 0)?;
        log::debug!(
            "Saved {} root outline items to {} ({} objects)",
            items.len(),
            container,
            writer.visited.len()
        );
        Ok(())
    }

    /// Open a scoped edit session.
    ///
    /// [`OutlineSession::commit`] saves the outline; dropping the session or
    /// calling [`OutlineSession::abandon`] does not. Either way the edits stay
    /// in memory, so a failed session can still be saved manually.
    pub fn session(&mut self) -> OutlineSession<'_, 'a> {
        self.updating = true;
        OutlineSession { outline: self }
    }

    /// Run `f` in an edit session, saving if it succeeds.
    ///
    /// An error from `f` is returned unchanged and nothing is written.
    pub fn edit<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Outline<'a>) -> Result<T>,
    {
        let mut session = self.session();
        match f(&mut session) {
            Ok(value) => {
                session.commit()?;
                Ok(value)
            },
            Err(e) => {
                session.abandon();
                Err(e)
            },
        }
    }

    /// First root-level outline dictionary named by the outline container.
    fn first_root_entry(&self) -> Result<Option<ObjectRef>> {
        let container = match self.doc.catalog()?.get("Outlines") {
            Some(Object::Reference(r)) => match self.doc.get_dict(*r) {
                Ok(dict) => dict,
                Err(e) if self.options.strict => return Err(e),
                Err(e) => {
                    log::warn!("Ignoring unusable outline container {}: {}", r, e);
                    return Ok(None);
                },
            },
            Some(Object::Dictionary(dict)) => dict,
            _ => return Ok(None),
        };
        Ok(container.get("First").and_then(Object::as_reference))
    }
}

impl fmt::Display for Outline<'_> {
    /// Indented listing of the loaded items, one per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_level(
            f: &mut fmt::Formatter<'_>,
            items: &[OutlineItem],
            indent: usize,
        ) -> fmt::Result {
            for item in items {
                writeln!(f, "{:indent$}{}", "", item, indent = indent * 4)?;
                write_level(f, &item.children, indent + 1)?;
            }
            Ok(())
        }

        match &self.root {
            Some(items) => write_level(f, items, 0),
            None => f.write_str("<outline not loaded>"),
        }
    }
}

/// Scoped edit session on an [`Outline`].
///
/// Dereferences to the outline. Saving happens only through
/// [`OutlineSession::commit`]; the updating flag is cleared when the session
/// ends, whatever the outcome.
#[derive(Debug)]
pub struct OutlineSession<'s, 'a> {
    outline: &'s mut Outline<'a>,
}

impl OutlineSession<'_, '_> {
    /// End the session and write the outline to the document.
    pub fn commit(self) -> Result<()> {
        self.outline.save()
    }

    /// End the session without writing. Edits remain in memory.
    pub fn abandon(self) {
        log::debug!("Outline edit session abandoned, changes not saved");
    }
}

impl<'a> Deref for OutlineSession<'_, 'a> {
    type Target = Outline<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.outline
    }
}

impl DerefMut for OutlineSession<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.outline
    }
}

impl Drop for OutlineSession<'_, '_> {
    fn drop(&mut self) {
        self.outline.updating = false;
    }
}

/// Reuse the outline container referenced by the catalog, or create one.
///
/// A direct container dictionary is moved into a new indirect object so that
/// items can point back to it through `/Parent`.
fn outlines_container(doc: &mut PdfDocument) -> Result<ObjectRef> {
    let existing = doc.catalog()?.get("Outlines").cloned();
    if let Some(Object::Reference(r)) = existing {
        if doc.get_dict(r).is_ok() {
            return Ok(r);
        }
    }

    let mut dict = match existing {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    };
    dict.insert("Type".to_string(), Object::name("Outlines"));
    let container = doc.make_indirect(Object::Dictionary(dict));
    doc.set_outlines_ref(container)?;
    log::debug!("Created outline container {}", container);
    Ok(container)
}

/// Per-call state of a load traversal.
struct LevelReader<'d> {
    doc: &'d PdfDocument,
    options: OutlineOptions,
    visited: HashSet<ObjectRef>,
}

impl LevelReader<'_> {
    /// Read the sibling chain starting at `first` into `out`.
    fn load_level(
        &mut self,
        first: ObjectRef,
        out: &mut Vec<OutlineItem>,
        depth: usize,
    ) -> Result<()> {
        let doc = self.doc;
        let mut current = Some(first);
        while let Some(obj_ref) = current {
            if !self.visited.insert(obj_ref) {
                if self.options.strict {
                    return Err(Error::OutlineStructure(obj_ref));
                }
                log::warn!(
                    "Outline object {} reoccurred at depth {}, ignoring the rest of this level",
                    obj_ref,
                    depth
                );
                return Ok(());
            }

            let dict = match doc.get_dict(obj_ref) {
                Ok(dict) => dict,
                Err(e) if self.options.strict => return Err(e),
                Err(e) => {
                    log::warn!(
                        "Outline entry {} is unusable ({}), ignoring the rest of this level",
                        obj_ref,
                        e
                    );
                    return Ok(());
                },
            };

            let mut item = OutlineItem::from_dictionary_object(doc, obj_ref)?;
            if let Some(first_child) = dict.get("First").and_then(Object::as_reference) {
                if depth < self.options.max_depth {
                    self.load_level(first_child, &mut item.children, depth + 1)?;
                    let count = dict.get("Count").and_then(Object::as_integer);
                    if count.is_some_and(|c| c < 0) {
                        item.is_closed = true;
                    }
                }
            }
            out.push(item);
            current = dict.get("Next").and_then(Object::as_reference);
        }
        Ok(())
    }
}

/// Per-call state of a save traversal.
struct LevelWriter<'d> {
    doc: &'d mut PdfDocument,
    options: OutlineOptions,
    visited: HashSet<ObjectRef>,
}

impl LevelWriter<'_> {
    /// Write `items` as the children of `parent`, rebuilding sibling links
    /// and setting `parent`'s `/First`, `/Last` and `/Count`.
    fn save_level(
        &mut self,
        parent: ObjectRef,
        items: &mut [OutlineItem],
        depth: usize,
    ) -> Result<()> {
        let mut count: i64 = 0;
        let mut first: Option<ObjectRef> = None;
        let mut prev: Option<ObjectRef> = None;

        for item in items.iter_mut() {
            // An object already written elsewhere in this save is left as it is
            // and the item gets a fresh one.
            let duplicate = item.obj.filter(|r| self.visited.contains(r));
            if let Some(dup) = duplicate {
                if self.options.strict {
                    return Err(Error::OutlineStructure(dup));
                }
                log::warn!(
                    "Outline object {} reoccurred in structure, writing '{}' to a new object",
                    dup,
                    item.title
                );
            }
            let obj_ref = item.to_dictionary_object(self.doc, duplicate.is_some())?;
            self.visited.insert(obj_ref);

            let dict = self.doc.get_dict_mut(obj_ref)?;
            dict.insert("Parent".to_string(), Object::Reference(parent));
            match prev {
                Some(prev) => {
                    dict.insert("Prev".to_string(), Object::Reference(prev));
                },
                None => {
                    dict.remove("Prev");
                    first = Some(obj_ref);
                },
            }
            if let Some(prev) = prev {
                self.doc
                    .get_dict_mut(prev)?
                    .insert("Next".to_string(), Object::Reference(obj_ref));
            }
            count += 1;
            prev = Some(obj_ref);

            if depth < self.options.max_depth {
                self.save_level(obj_ref, &mut item.children, depth + 1)?;
            } else {
                self.save_level(obj_ref, &mut [], depth + 1)?;
            }

            let dict = self.doc.get_dict_mut(obj_ref)?;
            let descendants = dict.get("Count").and_then(Object::as_integer).unwrap_or(0);
            if item.is_closed {
                dict.insert("Count".to_string(), Object::Integer(-descendants));
            } else {
                count += descendants;
            }
        }

        if let Some(last) = prev {
            self.doc.get_dict_mut(last)?.remove("Next");
        }
        let dict = self.doc.get_dict_mut(parent)?;
        match (first, prev) {
            (Some(first), Some(last)) => {
                dict.insert("First".to_string(), Object::Reference(first));
                dict.insert("Last".to_string(), Object::Reference(last));
            },
            _ => {
                dict.remove("First");
                dict.remove("Last");
            },
        }
        dict.insert("Count".to_string(), Object::Integer(count));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Destination, LocationArg, OutlineTarget, PageLocation};

    fn doc_with_pages(n: usize) -> PdfDocument {
        let mut doc = PdfDocument::new();
        for _ in 0..n {
            doc.add_page();
        }
        doc
    }

    fn outline_dict(title: &str) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("Title".to_string(), Object::String(title.as_bytes().to_vec()));
        dict
    }

    fn set(doc: &mut PdfDocument, obj: ObjectRef, key: &str, value: Object) {
        doc.get_dict_mut(obj).unwrap().insert(key.to_string(), value);
    }

    /// Container with A, B at the root; B has children C, D and is closed.
    fn linked_document() -> (PdfDocument, [ObjectRef; 5]) {
        let mut doc = doc_with_pages(2);
        let outlines = doc.make_indirect(Object::Dictionary(Dictionary::new()));
        let a = doc.make_indirect(Object::Dictionary(outline_dict("A")));
        let b = doc.make_indirect(Object::Dictionary(outline_dict("B")));
        let c = doc.make_indirect(Object::Dictionary(outline_dict("C")));
        let d = doc.make_indirect(Object::Dictionary(outline_dict("D")));

        set(&mut doc, outlines, "Type", Object::name("Outlines"));
        set(&mut doc, outlines, "First", a.into());
        set(&mut doc, outlines, "Last", b.into());
        set(&mut doc, outlines, "Count", Object::Integer(2));
        set(&mut doc, a, "Next", b.into());
        set(&mut doc, b, "Prev", a.into());
        set(&mut doc, b, "First", c.into());
        set(&mut doc, b, "Last", d.into());
        set(&mut doc, b, "Count", Object::Integer(-2));
        set(&mut doc, c, "Next", d.into());
        set(&mut doc, d, "Prev", c.into());
        doc.set_outlines_ref(outlines).unwrap();
        (doc, [outlines, a, b, c, d])
    }

    fn count_of(doc: &PdfDocument, obj: ObjectRef) -> Option<i64> {
        doc.get_dict(obj).unwrap().get("Count").and_then(Object::as_integer)
    }

    fn titles(items: &[OutlineItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_no_outline_loads_empty() {
        let mut doc = doc_with_pages(1);
        let mut outline = doc.open_outline(OutlineOptions::default());
        assert!(!outline.is_loaded());
        assert!(outline.root().unwrap().is_empty());
        assert!(outline.is_loaded());
    }

    #[test]
    fn test_save_without_load_is_noop() {
        let mut doc = doc_with_pages(1);
        let before = doc.object_count();
        doc.open_outline(OutlineOptions::default()).save().unwrap();
        assert_eq!(doc.object_count(), before);
        assert!(doc.outlines_ref().unwrap().is_none());
    }

    #[test]
    fn test_load_linked_structure() {
        let (mut doc, [_, a, b, ..]) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::default());
        let root = outline.root().unwrap();

        assert_eq!(titles(root), vec!["A", "B"]);
        assert_eq!(root[0].obj, Some(a));
        assert!(!root[0].is_closed);
        assert_eq!(root[1].obj, Some(b));
        assert!(root[1].is_closed);
        assert_eq!(titles(&root[1].children), vec!["C", "D"]);
    }

    #[test]
    fn test_lax_load_truncates_cycle() {
        let (mut doc, [_, a, b, c, d]) = linked_document();
        // D -> C closes a loop on the child level, B -> A on the root level.
        set(&mut doc, d, "Next", c.into());
        set(&mut doc, b, "Next", a.into());

        let mut outline = doc.open_outline(OutlineOptions::lenient());
        let root = outline.root().unwrap();
        assert_eq!(titles(root), vec!["A", "B"]);
        assert_eq!(titles(&root[1].children), vec!["C", "D"]);
    }

    #[test]
    fn test_strict_load_reports_cycle() {
        let (mut doc, [_, a, b, ..]) = linked_document();
        set(&mut doc, b, "Next", a.into());

        let mut outline = doc.open_outline(OutlineOptions::strict());
        match outline.load() {
            Err(Error::OutlineStructure(obj)) => assert_eq!(obj, a),
            other => panic!("Expected OutlineStructure, got {:?}", other),
        }
        assert!(!outline.is_loaded());
    }

    #[test]
    fn test_child_pointing_to_ancestor() {
        let (mut doc, [_, a, _, _, d]) = linked_document();
        set(&mut doc, d, "First", a.into());

        let mut outline = doc.open_outline(OutlineOptions::lenient());
        let root = outline.root().unwrap();
        assert_eq!(titles(root), vec!["A", "B"]);
        assert!(root[1].children[1].children.is_empty());
    }

    #[test]
    fn test_dangling_entry() {
        let (mut doc, [_, _, _, c, _]) = linked_document();
        set(&mut doc, c, "Next", ObjectRef::new(999, 0).into());

        let mut outline = doc.open_outline(OutlineOptions::lenient());
        assert_eq!(titles(&outline.root().unwrap()[1].children), vec!["C"]);

        let mut outline = doc.open_outline(OutlineOptions::strict());
        assert!(matches!(outline.load(), Err(Error::ObjectNotFound(999, 0))));
    }

    #[test]
    fn test_load_respects_max_depth() {
        let (mut doc, _) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::new().with_max_depth(0));
        let root = outline.root().unwrap();
        assert_eq!(titles(root), vec!["A", "B"]);
        assert!(root[1].children.is_empty());
        // Closed state is only derived for items whose children were read.
        assert!(!root[1].is_closed);
    }

    #[test]
    fn test_save_builds_links_and_counts() {
        let mut doc = doc_with_pages(3);
        let mut outline = doc.open_outline(OutlineOptions::default());
        {
            let root = outline.root_mut().unwrap();
            root.push(
                OutlineItem::with_page("Chapter 1", 0)
                    .with_child(OutlineItem::with_page("1.1", 1))
                    .with_child(OutlineItem::with_page("1.2", 2)),
            );
            root.push(
                OutlineItem::with_page("Chapter 2", 2)
                    .with_closed(true)
                    .with_child(OutlineItem::with_page("2.1", 2)),
            );
        }
        outline.save().unwrap();
        let root: Vec<OutlineItem> = outline.root().unwrap().to_vec();
        drop(outline);

        let container = doc.outlines_ref().unwrap().unwrap();
        let container_dict = doc.get_dict(container).unwrap();
        assert_eq!(container_dict.get("Type"), Some(&Object::name("Outlines")));
        // Two root items plus the two visible children of Chapter 1.
        assert_eq!(count_of(&doc, container), Some(4));

        let ch1 = root[0].obj.unwrap();
        let ch2 = root[1].obj.unwrap();
        assert_eq!(container_dict.get("First"), Some(&Object::Reference(ch1)));
        assert_eq!(container_dict.get("Last"), Some(&Object::Reference(ch2)));
        assert_eq!(count_of(&doc, ch1), Some(2));
        assert_eq!(count_of(&doc, ch2), Some(-1));

        let ch1_dict = doc.get_dict(ch1).unwrap();
        assert_eq!(ch1_dict.get("Parent"), Some(&Object::Reference(container)));
        assert_eq!(ch1_dict.get("Next"), Some(&Object::Reference(ch2)));
        assert!(!ch1_dict.contains_key("Prev"));

        let ch2_dict = doc.get_dict(ch2).unwrap();
        assert_eq!(ch2_dict.get("Prev"), Some(&Object::Reference(ch1)));
        assert!(!ch2_dict.contains_key("Next"));

        let leaf = root[0].children[1].obj.unwrap();
        let leaf_dict = doc.get_dict(leaf).unwrap();
        assert_eq!(leaf_dict.get("Parent"), Some(&Object::Reference(ch1)));
        assert_eq!(count_of(&doc, leaf), Some(0));
        assert!(!leaf_dict.contains_key("First"));
    }

    #[test]
    fn test_save_reuses_objects_in_place() {
        let (mut doc, [outlines, a, b, c, d]) = linked_document();
        set(&mut doc, a, "C", Object::Array(vec![Object::Integer(1); 3]));
        let before = doc.object_count();

        let mut outline = doc.open_outline(OutlineOptions::default());
        outline.root_mut().unwrap()[0].title = "Renamed".to_string();
        outline.save().unwrap();
        drop(outline);

        assert_eq!(doc.object_count(), before);
        assert_eq!(doc.outlines_ref().unwrap(), Some(outlines));
        let a_dict = doc.get_dict(a).unwrap();
        assert_eq!(a_dict.get("Title"), Some(&Object::String(b"Renamed".to_vec())));
        assert!(a_dict.contains_key("C"));
        assert_eq!(count_of(&doc, b), Some(-2));
        assert_eq!(count_of(&doc, outlines), Some(2));
        assert_eq!(
            doc.get_dict(d).unwrap().get("Parent"),
            Some(&Object::Reference(b))
        );
        assert_eq!(
            doc.get_dict(c).unwrap().get("Next"),
            Some(&Object::Reference(d))
        );
    }

    #[test]
    fn test_removing_items_strips_stale_links() {
        let (mut doc, [outlines, a, b, c, _]) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::default());
        {
            let root = outline.root_mut().unwrap();
            root[1].children.clear();
            root.remove(0);
        }
        outline.save().unwrap();
        drop(outline);

        let container = doc.get_dict(outlines).unwrap();
        assert_eq!(container.get("First"), Some(&Object::Reference(b)));
        assert_eq!(container.get("Last"), Some(&Object::Reference(b)));
        let b_dict = doc.get_dict(b).unwrap();
        assert!(!b_dict.contains_key("Prev"));
        assert!(!b_dict.contains_key("First"));
        assert!(!b_dict.contains_key("Last"));
        assert_eq!(count_of(&doc, b), Some(0));
        // Orphans are left alone.
        assert!(doc.contains_object(a));
        assert!(doc.contains_object(c));
    }

    #[test]
    fn test_empty_root_clears_container() {
        let (mut doc, [outlines, ..]) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::default());
        outline.root_mut().unwrap().clear();
        outline.save().unwrap();
        drop(outline);

        let container = doc.get_dict(outlines).unwrap();
        assert!(!container.contains_key("First"));
        assert!(!container.contains_key("Last"));
        assert_eq!(count_of(&doc, outlines), Some(0));
    }

    #[test]
    fn test_lax_save_duplicates_shared_object() {
        let (mut doc, [_, a, ..]) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::lenient());
        {
            let root = outline.root_mut().unwrap();
            let mut copy = root[0].clone();
            copy.title = "Copy".to_string();
            root.push(copy);
        }
        outline.save().unwrap();
        let root = outline.root().unwrap().to_vec();
        drop(outline);

        assert_eq!(root[0].obj, Some(a));
        let copy = root[2].obj.unwrap();
        assert_ne!(copy, a);
        assert_eq!(
            doc.get_dict(a).unwrap().get("Title"),
            Some(&Object::String(b"A".to_vec()))
        );
        assert_eq!(
            doc.get_dict(copy).unwrap().get("Title"),
            Some(&Object::String(b"Copy".to_vec()))
        );
        assert_eq!(
            doc.get_dict(root[1].obj.unwrap()).unwrap().get("Next"),
            Some(&Object::Reference(copy))
        );
    }

    #[test]
    fn test_strict_save_rejects_shared_object() {
        let (mut doc, [_, a, ..]) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::strict());
        {
            let root = outline.root_mut().unwrap();
            let copy = root[0].clone();
            root.push(copy);
        }
        match outline.save() {
            Err(Error::OutlineStructure(obj)) => assert_eq!(obj, a),
            other => panic!("Expected OutlineStructure, got {:?}", other),
        }
    }

    #[test]
    fn test_save_drops_items_beyond_max_depth() {
        let mut doc = doc_with_pages(1);
        let mut outline = doc.open_outline(OutlineOptions::new().with_max_depth(1));
        outline.root_mut().unwrap().push(
            OutlineItem::with_page("L0", 0).with_child(
                OutlineItem::with_page("L1", 0).with_child(OutlineItem::with_page("L2", 0)),
            ),
        );
        outline.save().unwrap();
        let level1 = outline.root().unwrap()[0].children[0].obj.unwrap();
        let deep_obj = outline.root().unwrap()[0].children[0].children[0].obj;
        outline.invalidate();

        let root = outline.root().unwrap();
        assert_eq!(root[0].children.len(), 1);
        assert!(root[0].children[0].children.is_empty());
        assert!(deep_obj.is_none());
        drop(outline);
        assert_eq!(count_of(&doc, level1), Some(0));
    }

    #[test]
    fn test_direct_container_is_made_indirect() {
        let mut doc = doc_with_pages(1);
        let mut direct = Dictionary::new();
        direct.insert("Type".to_string(), Object::name("Outlines"));
        direct.insert("Custom".to_string(), Object::Boolean(true));
        doc.catalog_mut()
            .unwrap()
            .insert("Outlines".to_string(), Object::Dictionary(direct));

        let mut outline = doc.open_outline(OutlineOptions::default());
        outline.root_mut().unwrap().push(OutlineItem::with_page("Only", 0));
        outline.save().unwrap();
        drop(outline);

        let container = doc.outlines_ref().unwrap().unwrap();
        let dict = doc.get_dict(container).unwrap();
        assert_eq!(dict.get("Custom"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Count"), Some(&Object::Integer(1)));
    }

    #[test]
    fn test_resolves_location_arguments_on_save() {
        let mut doc = doc_with_pages(2);
        let page = doc.page_ref(1).unwrap();
        let mut outline = doc.open_outline(OutlineOptions::default());
        let item = OutlineItem::with_page("Zoomed", 1)
            .with_page_location(PageLocation::XYZ)
            .with_location_args([("left", 10.0), ("zoom", 1.5)])
            .unwrap();
        assert_eq!(item.location_args.get(LocationArg::Zoom), Some(1.5));
        outline.root_mut().unwrap().push(item);
        outline.save().unwrap();

        let item = &outline.root().unwrap()[0];
        assert_eq!(
            item.target,
            Some(OutlineTarget::Destination(Destination::Explicit(Object::Array(vec![
                Object::Reference(page),
                Object::name("XYZ"),
                Object::Integer(10),
                Object::Integer(0),
                Object::Real(1.5),
            ]))))
        );
    }

    #[test]
    fn test_session_commit_saves_and_clears_flag() {
        let mut doc = doc_with_pages(1);
        let mut outline = doc.open_outline(OutlineOptions::default());
        {
            let mut session = outline.session();
            assert!(session.is_updating());
            session.root_mut().unwrap().push(OutlineItem::with_page("Intro", 0));
            session.commit().unwrap();
        }
        assert!(!outline.is_updating());
        drop(outline);
        assert!(doc.outlines_ref().unwrap().is_some());
    }

    #[test]
    fn test_reload_discards_unsaved_edits() {
        let (mut doc, _) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::default());
        outline.root_mut().unwrap().clear();
        assert!(outline.root().unwrap().is_empty());
        let root = outline.reload().unwrap();
        assert_eq!(titles(root), vec!["A", "B"]);
    }

    #[test]
    fn test_dropped_session_does_not_save() {
        let mut doc = doc_with_pages(1);
        let mut outline = doc.open_outline(OutlineOptions::default());
        {
            let mut session = outline.session();
            session.root_mut().unwrap().push(OutlineItem::with_page("Intro", 0));
        }
        assert!(!outline.is_updating());
        // Edits survive in memory and can be flushed manually.
        assert_eq!(outline.root().unwrap().len(), 1);
        assert!(outline.document().outlines_ref().unwrap().is_none());
        outline.save().unwrap();
        assert!(outline.document().outlines_ref().unwrap().is_some());
    }

    #[test]
    fn test_edit_error_suppresses_save() {
        let mut doc = doc_with_pages(1);
        let mut outline = doc.open_outline(OutlineOptions::default());
        let result: Result<()> = outline.edit(|outline| {
            outline.root_mut()?.push(OutlineItem::with_page("Intro", 0));
            Err(Error::InvalidArgument("boom".to_string()))
        });
        assert!(matches!(result, Err(Error::InvalidArgument(msg)) if msg == "boom"));
        assert!(!outline.is_updating());
        assert!(outline.document().outlines_ref().unwrap().is_none());
    }

    #[test]
    fn test_edit_returns_closure_value() {
        let mut doc = doc_with_pages(2);
        let mut outline = doc.open_outline(OutlineOptions::default());
        let len = outline
            .edit(|outline| {
                let root = outline.root_mut()?;
                root.push(OutlineItem::with_page("One", 0));
                root.push(OutlineItem::with_page("Two", 1));
                Ok(root.len())
            })
            .unwrap();
        assert_eq!(len, 2);
        let container = outline.document().outlines_ref().unwrap().unwrap();
        assert_eq!(count_of(outline.document(), container), Some(2));
    }

    #[test]
    fn test_display() {
        let (mut doc, _) = linked_document();
        let mut outline = doc.open_outline(OutlineOptions::default());
        assert_eq!(outline.to_string(), "<outline not loaded>");
        outline.load().unwrap();
        assert_eq!(
            outline.to_string(),
            "[ ] A -> <None>\n[+] B -> <None>\n    [ ] C -> <None>\n    [ ] D -> <None>\n"
        );
    }
}
