//! Registry type handle.
//!
//! Every descriptor in the type registry is referenced by a `TypeId`.
//! Built-in types are bootstrapped in a fixed order, so each well-known
//! built-in has a constant handle that can be compared without a lookup.

use std::fmt;

/// A 32-bit index into the type registry.
///
/// Descriptor identity is handle identity: two references resolve to the
/// same type exactly when their `TypeId`s are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Primitives (indices 0-7) ===

    /// `void`, only valid as a return type.
    pub const VOID: Self = Self(0);
    pub const BOOLEAN: Self = Self(1);
    pub const BYTE: Self = Self(2);
    pub const CHAR: Self = Self(3);
    pub const INT: Self = Self(4);
    pub const LONG: Self = Self(5);
    pub const FLOAT: Self = Self(6);
    pub const DOUBLE: Self = Self(7);

    // === Built-in reference types (indices 8-23) ===

    /// `java.lang.String`.
    pub const STRING: Self = Self(8);
    /// `java.lang.Object`.
    pub const OBJECT: Self = Self(9);
    /// `java.lang.CharSequence`.
    pub const CHAR_SEQUENCE: Self = Self(10);
    /// `java.util.Map` (raw container).
    pub const MAP: Self = Self(11);
    /// `java.util.List` (raw container).
    pub const LIST: Self = Self(12);
    /// `android.text.TextUtils`, receiver for rich-text marshalling calls.
    pub const TEXT_UTILS: Self = Self(13);
    /// `android.os.RemoteException`.
    pub const REMOTE_EXCEPTION: Self = Self(14);
    /// `java.lang.RuntimeException`.
    pub const RUNTIME_EXCEPTION: Self = Self(15);
    /// `android.os.IBinder`, the binder handle.
    pub const IBINDER: Self = Self(16);
    /// `android.os.IInterface`, the interface-reference marker.
    pub const IINTERFACE: Self = Self(17);
    /// `android.os.Binder`, the native half of a binder.
    pub const BINDER_NATIVE: Self = Self(18);
    /// `android.os.BinderProxy`, the remote half of a binder.
    pub const BINDER_PROXY: Self = Self(19);
    /// `android.os.Parcel`, the transport.
    pub const PARCEL: Self = Self(20);
    /// `android.os.Parcelable`, the parcelable capability marker.
    pub const PARCELABLE: Self = Self(21);
    /// `android.content.Context`.
    pub const CONTEXT: Self = Self(22);
    /// `java.lang.ClassLoader`.
    pub const CLASS_LOADER: Self = Self(23);

    /// Number of bootstrapped built-in types.
    pub const BUILTIN_COUNT: u32 = 24;

    /// First index handed out to declared or instantiated types.
    pub const FIRST_DYNAMIC: u32 = Self::BUILTIN_COUNT;

    /// Sentinel for a descriptor that has not been registered yet.
    pub const NONE: Self = Self(u32::MAX);

    /// Create a handle from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as a `usize` for slice access.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Check if this handle refers to a bootstrapped built-in.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }

    /// Check if this is one of the eight primitive handles.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 <= Self::DOUBLE.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::VOID => write!(f, "TypeId::VOID"),
            Self::BOOLEAN => write!(f, "TypeId::BOOLEAN"),
            Self::CHAR => write!(f, "TypeId::CHAR"),
            Self::INT => write!(f, "TypeId::INT"),
            Self::STRING => write!(f, "TypeId::STRING"),
            Self::IBINDER => write!(f, "TypeId::IBINDER"),
            Self::NONE => write!(f, "TypeId::NONE"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

const _: () = assert!(std::mem::size_of::<TypeId>() == 4);
