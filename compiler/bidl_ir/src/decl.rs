//! Declaration inputs produced by the IDL front end.
//!
//! The parser hands one of these to the type registry for every parcelable
//! and interface it sees. An empty `package` means the default package.

use crate::DeclSite;

/// A declared parcelable (user record).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParcelableDecl {
    pub package: String,
    pub name: String,
    /// Declared by the platform rather than by the user.
    pub built_in: bool,
    /// Whether values of this type may be written to a parcel.
    pub parcelable: bool,
    pub site: DeclSite,
}

impl ParcelableDecl {
    /// A user parcelable that can be written to a parcel.
    pub fn new(package: impl Into<String>, name: impl Into<String>, site: DeclSite) -> Self {
        ParcelableDecl {
            package: package.into(),
            name: name.into(),
            built_in: false,
            parcelable: true,
            site,
        }
    }

    #[must_use]
    pub fn built_in(mut self) -> Self {
        self.built_in = true;
        self
    }

    /// Mark the type as a reference-only declaration (no wire encoding).
    #[must_use]
    pub fn reference_only(mut self) -> Self {
        self.parcelable = false;
        self
    }
}

/// A declared interface.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InterfaceDecl {
    pub package: String,
    pub name: String,
    pub built_in: bool,
    /// All calls on the interface are one-way.
    pub oneway: bool,
    pub site: DeclSite,
}

impl InterfaceDecl {
    pub fn new(package: impl Into<String>, name: impl Into<String>, site: DeclSite) -> Self {
        InterfaceDecl {
            package: package.into(),
            name: name.into(),
            built_in: false,
            oneway: false,
            site,
        }
    }

    #[must_use]
    pub fn oneway(mut self) -> Self {
        self.oneway = true;
        self
    }

    #[must_use]
    pub fn built_in(mut self) -> Self {
        self.built_in = true;
        self
    }
}
