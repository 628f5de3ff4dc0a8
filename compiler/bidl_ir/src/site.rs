//! Declaration sites.

use std::fmt;

/// Where a type was declared: the IDL file and the 1-based line of its name.
///
/// Built-in types have no declaration site.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct DeclSite {
    pub file: String,
    pub line: u32,
}

impl DeclSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        DeclSite {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for DeclSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
