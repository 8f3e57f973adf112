//! In-memory view of a netCDF dataset.
//!
//! The checker never reads netCDF files itself. A host opens the file with
//! whatever reader it has and fills a [`Dataset`], either through
//! [`DatasetBuilder`] or by handing over a JSON dump.

mod source;
mod value;
mod variable;

pub use source::{Dataset, DatasetBuilder};
pub use value::{AttrValue, Attribute, NcType};
pub use variable::{VarId, Variable};
