//! Bootstrap table.
//!
//! Order matters: entry `i` receives `TypeId::from_raw(i)`, which is what the
//! well-known constants in `bidl_ir::TypeId` assume.

use bidl_ir::TypeId;

use crate::descriptor::{ContainerKind, Family, PrimitiveOps, TypeDescriptor};
use crate::GenericTemplate;

const BYTE_OPS: PrimitiveOps = PrimitiveOps::new(
    "writeByte",
    "readByte",
    "writeByteArray",
    "createByteArray",
    "readByteArray",
);
const INT_OPS: PrimitiveOps = PrimitiveOps::new(
    "writeInt",
    "readInt",
    "writeIntArray",
    "createIntArray",
    "readIntArray",
);
const LONG_OPS: PrimitiveOps = PrimitiveOps::new(
    "writeLong",
    "readLong",
    "writeLongArray",
    "createLongArray",
    "readLongArray",
);
const FLOAT_OPS: PrimitiveOps = PrimitiveOps::new(
    "writeFloat",
    "readFloat",
    "writeFloatArray",
    "createFloatArray",
    "readFloatArray",
);
const DOUBLE_OPS: PrimitiveOps = PrimitiveOps::new(
    "writeDouble",
    "readDouble",
    "writeDoubleArray",
    "createDoubleArray",
    "readDoubleArray",
);

/// Built-in descriptors in handle order.
pub(super) fn builtin_types() -> Vec<(TypeId, TypeDescriptor)> {
    use Family::{Binder, Boolean, Char, CharSequence, Container, Opaque, Primitive, Void};

    let entries = [
        (TypeId::VOID, "", "void", Void),
        (TypeId::BOOLEAN, "", "boolean", Boolean),
        (TypeId::BYTE, "", "byte", Primitive(BYTE_OPS)),
        (TypeId::CHAR, "", "char", Char),
        (TypeId::INT, "", "int", Primitive(INT_OPS)),
        (TypeId::LONG, "", "long", Primitive(LONG_OPS)),
        (TypeId::FLOAT, "", "float", Primitive(FLOAT_OPS)),
        (TypeId::DOUBLE, "", "double", Primitive(DOUBLE_OPS)),
        (TypeId::STRING, "java.lang", "String", Family::String),
        (TypeId::OBJECT, "java.lang", "Object", Opaque),
        (TypeId::CHAR_SEQUENCE, "java.lang", "CharSequence", CharSequence),
        (TypeId::MAP, "java.util", "Map", Container(ContainerKind::Map)),
        (TypeId::LIST, "java.util", "List", Container(ContainerKind::List)),
        (TypeId::TEXT_UTILS, "android.text", "TextUtils", Opaque),
        (TypeId::REMOTE_EXCEPTION, "android.os", "RemoteException", Opaque),
        (TypeId::RUNTIME_EXCEPTION, "java.lang", "RuntimeException", Opaque),
        (TypeId::IBINDER, "android.os", "IBinder", Binder),
        (TypeId::IINTERFACE, "android.os", "IInterface", Opaque),
        (TypeId::BINDER_NATIVE, "android.os", "Binder", Opaque),
        (TypeId::BINDER_PROXY, "android.os", "BinderProxy", Opaque),
        (TypeId::PARCEL, "android.os", "Parcel", Opaque),
        (TypeId::PARCELABLE, "android.os", "Parcelable", Opaque),
        (TypeId::CONTEXT, "android.content", "Context", Opaque),
        (TypeId::CLASS_LOADER, "java.lang", "ClassLoader", Opaque),
    ];

    entries
        .into_iter()
        .map(|(id, package, name, family)| (id, TypeDescriptor::builtin(package, name, family)))
        .collect()
}

/// Generic container shapes known to the resolver.
pub(super) fn builtin_templates() -> Vec<GenericTemplate> {
    vec![
        GenericTemplate::new("java.util", "List", 1),
        GenericTemplate::new("java.util", "Map", 2),
    ]
}
