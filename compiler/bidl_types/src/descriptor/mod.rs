//! Type descriptors.
//!
//! A `TypeDescriptor` is the registry-owned record for one resolvable type:
//! its names, its kind, its marshalling capabilities, and the `Family` that
//! selects its wire encoding. Descriptors are immutable once registered.
//!
//! # Families
//!
//! Marshalling behavior is a closed sum type. Every emission in
//! `crate::marshal` is an exhaustive `match` over `Family`, so a family that
//! cannot perform an operation says so explicitly instead of falling through.

use bidl_ir::{DeclSite, InterfaceDecl, ParcelableDecl, TypeId};
use smallvec::SmallVec;

use crate::GenericTemplate;

/// Closed classification of a descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Primitive,
    BuiltIn,
    UserRecord,
    Interface,
    /// Compiler-synthesized companion of an interface (stub or proxy).
    Generated,
}

impl TypeKind {
    /// Primitives and platform types both count as built-in for the
    /// redefinition rule.
    #[inline]
    pub fn is_builtin(self) -> bool {
        matches!(self, TypeKind::Primitive | TypeKind::BuiltIn)
    }

    /// Article-prefixed description used in conflict diagnostics.
    pub fn human_readable(self) -> &'static str {
        match self {
            TypeKind::Primitive => "a primitive type",
            TypeKind::BuiltIn => "a built-in type",
            TypeKind::UserRecord => "a parcelable",
            TypeKind::Interface => "an interface",
            TypeKind::Generated => "a generated type",
        }
    }
}

/// The factory reference a type exposes to list marshalling.
///
/// Generic-list emission picks its wire path by which built-in the element's
/// creator equals. `IBinder` exposes no factory, so every creator-less
/// element shares its tag and travels as a binder list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Creator {
    /// No factory reference. Also the tag of `IBinder`.
    None,
    /// `Parcel.STRING_CREATOR`, shared by `String` and `CharSequence`.
    ParcelString,
    /// `Parcel.arrayListCreator`, exposed by list instantiations.
    ArrayList,
    /// `Foo.CREATOR` on a parcelable.
    Typed(TypeId),
}

/// Transport method names for one primitive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PrimitiveOps {
    pub write: &'static str,
    pub read: &'static str,
    pub write_array: &'static str,
    pub create_array: &'static str,
    pub read_array: &'static str,
}

impl PrimitiveOps {
    /// Build the operation table for a transport suffix such as `Int`.
    pub(crate) const fn new(
        write: &'static str,
        read: &'static str,
        write_array: &'static str,
        create_array: &'static str,
        read_array: &'static str,
    ) -> Self {
        PrimitiveOps {
            write,
            read,
            write_array,
            create_array,
            read_array,
        }
    }
}

/// Raw container templates.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ContainerKind {
    Map,
    List,
}

/// Wire-encoding family of a descriptor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Family {
    /// Return-type slot only.
    Void,
    /// byte, int, long, float, double.
    Primitive(PrimitiveOps),
    Boolean,
    Char,
    String,
    CharSequence,
    /// `android.os.IBinder`.
    Binder,
    /// Resolvable in signatures, never marshalled.
    Opaque,
    Parcelable,
    Interface { oneway: bool },
    Container(ContainerKind),
    /// `java.util.List<T>`.
    GenericList {
        element: TypeId,
        /// The element's creator, captured at instantiation.
        element_creator: Creator,
    },
}

/// Generic arguments of an instantiated descriptor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GenericInfo {
    /// Qualified name of the template, e.g. `java.util.List`.
    pub template: String,
    pub args: SmallVec<[TypeId; 2]>,
    /// `<java.lang.String>`
    pub arguments_text: String,
}

/// A resolvable type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeDescriptor {
    id: TypeId,
    package: String,
    name: String,
    qualified_name: String,
    kind: TypeKind,
    can_marshal: bool,
    can_be_out: bool,
    decl: Option<DeclSite>,
    family: Family,
    generic: Option<GenericInfo>,
}

impl TypeDescriptor {
    /// Shared constructor; capability flags are derived from `family`.
    fn with_family(
        package: impl Into<String>,
        name: impl Into<String>,
        kind: TypeKind,
        family: Family,
        decl: Option<DeclSite>,
    ) -> Self {
        let package = package.into();
        let name = name.into();
        let qualified_name = if package.is_empty() {
            name.clone()
        } else {
            format!("{package}.{name}")
        };
        let can_marshal = !matches!(family, Family::Void | Family::Opaque);
        let can_be_out = matches!(
            family,
            Family::Parcelable | Family::Container(_) | Family::GenericList { .. }
        );
        TypeDescriptor {
            id: TypeId::NONE,
            package,
            name,
            qualified_name,
            kind,
            can_marshal,
            can_be_out,
            decl,
            family,
            generic: None,
        }
    }

    /// A bootstrapped platform type.
    pub(crate) fn builtin(package: &str, name: &str, family: Family) -> Self {
        let kind = if package.is_empty() {
            TypeKind::Primitive
        } else {
            TypeKind::BuiltIn
        };
        Self::with_family(package, name, kind, family, None)
    }

    /// A declared parcelable. Reference-only declarations resolve but cannot
    /// be marshalled.
    pub fn parcelable(decl: &ParcelableDecl) -> Self {
        let kind = if decl.built_in {
            TypeKind::BuiltIn
        } else {
            TypeKind::UserRecord
        };
        let mut desc = Self::with_family(
            decl.package.as_str(),
            decl.name.as_str(),
            kind,
            Family::Parcelable,
            Some(decl.site.clone()),
        );
        desc.can_marshal = decl.parcelable;
        desc
    }

    pub fn interface(decl: &InterfaceDecl) -> Self {
        let kind = if decl.built_in {
            TypeKind::BuiltIn
        } else {
            TypeKind::Interface
        };
        Self::with_family(
            decl.package.as_str(),
            decl.name.as_str(),
            kind,
            Family::Interface {
                oneway: decl.oneway,
            },
            Some(decl.site.clone()),
        )
    }

    /// A stub or proxy companion of an interface.
    pub fn generated(package: &str, name: String, site: Option<DeclSite>) -> Self {
        Self::with_family(package, name, TypeKind::Generated, Family::Opaque, site)
    }

    /// `template<element>` for the one-argument list template.
    pub(crate) fn generic_list(
        template: &GenericTemplate,
        element: TypeId,
        element_desc: &TypeDescriptor,
    ) -> Self {
        let arguments_text = format!("<{}>", element_desc.qualified_name);
        let mut desc = Self::with_family(
            template.package.as_str(),
            template.name.as_str(),
            TypeKind::BuiltIn,
            Family::GenericList {
                element,
                element_creator: element_desc.creator(),
            },
            None,
        );
        desc.qualified_name = format!("{}{arguments_text}", template.qualified_name());
        desc.generic = Some(GenericInfo {
            template: template.qualified_name(),
            args: smallvec::smallvec![element],
            arguments_text,
        });
        desc
    }

    /// Stamp the handle assigned at registration.
    pub(crate) fn set_id(&mut self, id: TypeId) {
        self.id = id;
    }

    /// Handle of this descriptor, `TypeId::NONE` until registered.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Short name, without the package.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn family(&self) -> &Family {
        &self.family
    }

    pub fn decl_site(&self) -> Option<&DeclSite> {
        self.decl.as_ref()
    }

    pub fn human_readable_kind(&self) -> &'static str {
        self.kind.human_readable()
    }

    /// Whether a value of this type has a direct wire encoding.
    #[inline]
    pub fn can_marshal_directly(&self) -> bool {
        self.can_marshal
    }

    /// Whether the type may be an out or inout parameter, which requires
    /// reading into an existing value.
    #[inline]
    pub fn supports_out_parameter(&self) -> bool {
        self.can_be_out
    }

    /// Whether arrays of this type have a bulk wire encoding. Never true for
    /// a type that cannot be marshalled at all.
    pub fn supports_array_form(&self) -> bool {
        self.can_marshal
            && matches!(
                self.family,
                Family::Primitive(_)
                    | Family::Boolean
                    | Family::Char
                    | Family::String
                    | Family::Binder
                    | Family::Parcelable
            )
    }

    pub fn is_oneway(&self) -> bool {
        matches!(self.family, Family::Interface { oneway: true })
    }

    pub fn creator(&self) -> Creator {
        match self.family {
            Family::String | Family::CharSequence => Creator::ParcelString,
            Family::Parcelable => Creator::Typed(self.id),
            Family::GenericList { .. } => Creator::ArrayList,
            Family::Void
            | Family::Binder
            | Family::Primitive(_)
            | Family::Boolean
            | Family::Char
            | Family::Opaque
            | Family::Interface { .. }
            | Family::Container(_) => Creator::None,
        }
    }

    /// Name to import; generic instantiations import their template.
    pub fn import_type(&self) -> &str {
        match &self.generic {
            Some(info) => &info.template,
            None => &self.qualified_name,
        }
    }

    /// Concrete class to construct for a value of this type.
    pub fn instantiable_name(&self) -> String {
        match (&self.family, &self.generic) {
            (Family::Container(ContainerKind::List), _) => "java.util.ArrayList".to_string(),
            (Family::GenericList { .. }, Some(info)) => {
                format!("java.util.ArrayList{}", info.arguments_text)
            }
            _ => self.qualified_name.clone(),
        }
    }

    pub fn generic(&self) -> Option<&GenericInfo> {
        self.generic.as_ref()
    }

    /// Argument handles of an instantiation; empty otherwise.
    pub fn generic_args(&self) -> &[TypeId] {
        self.generic.as_ref().map_or(&[], |info| info.args.as_slice())
    }

    /// `<A,B>` text of an instantiation; empty otherwise.
    pub fn generic_arguments(&self) -> &str {
        self.generic
            .as_ref()
            .map_or("", |info| info.arguments_text.as_str())
    }
}
