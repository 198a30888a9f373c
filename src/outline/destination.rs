//! Explicit destinations (ISO 32000-1:2008, Section 12.3.2.2).
//!
//! A destination array names a page followed by a location type and the
//! numeric arguments that type requires:
//!
//! | Location       | Arguments                 |
//! |----------------|---------------------------|
//! | `/XYZ`         | left, top, zoom           |
//! | `/Fit` `/FitB` | none                      |
//! | `/FitH` `/FitBH` | top                     |
//! | `/FitV` `/FitBV` | left                    |
//! | `/FitR`        | left, bottom, right, top  |

use crate::document::PdfDocument;
use crate::error::{Error, Result};
use crate::object::Object;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Page location type of an explicit destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum PageLocation {
    /// Position (left, top) at the upper-left corner of the window, magnified by zoom
    XYZ,
    /// Fit the entire page in the window
    Fit,
    /// Fit the page width, top edge at `top`
    FitH,
    /// Fit the page height, left edge at `left`
    FitV,
    /// Fit the rectangle (left, bottom, right, top)
    FitR,
    /// Fit the bounding box of the page contents
    FitB,
    /// Fit bounding box width, top edge at `top`
    FitBH,
    /// Fit bounding box height, left edge at `left`
    FitBV,
}

impl PageLocation {
    /// All location types.
    pub const ALL: [PageLocation; 8] = [
        PageLocation::XYZ,
        PageLocation::Fit,
        PageLocation::FitH,
        PageLocation::FitV,
        PageLocation::FitR,
        PageLocation::FitB,
        PageLocation::FitBH,
        PageLocation::FitBV,
    ];

    /// PDF name of this location type (without the leading slash).
    pub fn name(self) -> &'static str {
        match self {
            PageLocation::XYZ => "XYZ",
            PageLocation::Fit => "Fit",
            PageLocation::FitH => "FitH",
            PageLocation::FitV => "FitV",
            PageLocation::FitR => "FitR",
            PageLocation::FitB => "FitB",
            PageLocation::FitBH => "FitBH",
            PageLocation::FitBV => "FitBV",
        }
    }

    /// Arguments this location type takes, in array order.
    pub fn args(self) -> &'static [LocationArg] {
        use LocationArg::*;
        match self {
            PageLocation::XYZ => &[Left, Top, Zoom],
            PageLocation::Fit | PageLocation::FitB => &[],
            PageLocation::FitH | PageLocation::FitBH => &[Top],
            PageLocation::FitV | PageLocation::FitBV => &[Left],
            PageLocation::FitR => &[Left, Bottom, Right, Top],
        }
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageLocation {
    type Err = Error;

    /// Parse a location name. Case is ignored and a leading `/` is allowed.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix('/').unwrap_or(s);
        PageLocation::ALL
            .into_iter()
            .find(|loc| loc.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                Error::invalid_argument(format!("Invalid or unsupported page location type {}", s))
            })
    }
}

/// Numeric argument of a page location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationArg {
    /// Left edge
    Left,
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
    /// Right edge
    Right,
    /// Magnification
    Zoom,
}

impl LocationArg {
    /// All argument names.
    pub const ALL: [LocationArg; 5] = [
        LocationArg::Left,
        LocationArg::Top,
        LocationArg::Bottom,
        LocationArg::Right,
        LocationArg::Zoom,
    ];

    /// Keyword name of this argument.
    pub fn name(self) -> &'static str {
        match self {
            LocationArg::Left => "left",
            LocationArg::Top => "top",
            LocationArg::Bottom => "bottom",
            LocationArg::Right => "right",
            LocationArg::Zoom => "zoom",
        }
    }
}

impl fmt::Display for LocationArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LocationArg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LocationArg::ALL
            .into_iter()
            .find(|arg| arg.name() == s)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid keyword argument {}", s)))
    }
}

/// Keyword arguments for a page location.
///
/// Any of the five argument names may be stored whatever location type is
/// eventually used; arguments the type does not take are ignored when the
/// destination is built, missing ones default to `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationArgs {
    values: BTreeMap<LocationArg, f64>,
}

impl LocationArgs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(keyword, value)` pairs, rejecting unknown keywords.
    ///
    /// Nothing is stored unless every keyword is valid.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let values = pairs
            .into_iter()
            .map(|(key, value)| key.as_ref().parse::<LocationArg>().map(|arg| (arg, value)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { values })
    }

    /// Set an argument.
    pub fn set(&mut self, arg: LocationArg, value: f64) {
        self.values.insert(arg, value);
    }

    /// Builder variant of [`LocationArgs::set`].
    pub fn with(mut self, arg: LocationArg, value: f64) -> Self {
        self.set(arg, value);
        self
    }

    /// Get an argument, if set.
    pub fn get(&self, arg: LocationArg) -> Option<f64> {
        self.values.get(&arg).copied()
    }

    /// Check if no argument is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the set arguments.
    pub fn iter(&self) -> impl Iterator<Item = (LocationArg, f64)> + '_ {
        self.values.iter().map(|(&arg, &value)| (arg, value))
    }
}

/// Create a destination array referencing the page at `page_index`.
///
/// Without a location the destination is `[page /Fit]`. With one, the
/// location name is followed by the arguments it takes, each read from `args`
/// or `0` when unset.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `page_index` is not a page of `doc`.
///
/// # Example
///
/// ```
/// use pdf_outline::document::PdfDocument;
/// use pdf_outline::object::Object;
/// use pdf_outline::outline::{make_page_destination, LocationArg, LocationArgs, PageLocation};
///
/// let mut doc = PdfDocument::new();
/// for _ in 0..4 {
///     doc.add_page();
/// }
/// let args = LocationArgs::new()
///     .with(LocationArg::Top, 100.0)
///     .with(LocationArg::Zoom, 2.0);
/// let dest = make_page_destination(&doc, 3, Some("XYZ".parse()?), &args)?;
/// assert_eq!(
///     dest,
///     Object::Array(vec![
///         Object::Reference(doc.page_ref(3)?),
///         Object::name("XYZ"),
///         Object::Integer(0),
///         Object::Integer(100),
///         Object::Integer(2),
///     ])
/// );
/// # Ok::<(), pdf_outline::error::Error>(())
/// ```
pub fn make_page_destination(
    doc: &PdfDocument,
    page_index: usize,
    location: Option<PageLocation>,
    args: &LocationArgs,
) -> Result<Object> {
    let page_ref = doc.page_ref(page_index)?;
    let location = location.unwrap_or(PageLocation::Fit);

    let mut arr = Vec::with_capacity(2 + location.args().len());
    arr.push(Object::Reference(page_ref));
    arr.push(Object::name(location.name()));
    arr.extend(
        location
            .args()
            .iter()
            .map(|&arg| Object::number(args.get(arg).unwrap_or(0.0))),
    );

    Ok(Object::Array(arr))
}
