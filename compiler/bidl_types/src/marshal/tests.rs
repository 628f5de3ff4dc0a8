#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use bidl_diagnostic::DiagnosticQueue;
use bidl_ir::{print_block, DeclSite, InterfaceDecl, ParcelableDecl};
use pretty_assertions::assert_eq;

fn registry() -> Registry {
    let mut registry = Registry::new();
    let mut diags = DiagnosticQueue::new();
    let site = DeclSite::new("pkg/Foo.aidl", 1);
    assert!(registry.register_parcelable(&ParcelableDecl::new("pkg", "Foo", site.clone()), &mut diags));
    assert!(registry.register_parcelable(
        &ParcelableDecl::new("pkg", "Handle", site.clone()).reference_only(),
        &mut diags
    ));
    assert!(registry.register_interface(&InterfaceDecl::new("pkg", "IBar", site), &mut diags));
    registry
}

fn parcel() -> Variable {
    Variable::new("data", TypeId::PARCEL)
}

fn write(registry: &Registry, ty: TypeId, flags: WriteFlags) -> Result<String, MarshalError> {
    let mut out = Block::new();
    registry
        .marshaller(ty)
        .emit_write(&mut out, &Variable::new("v", ty), &parcel(), flags)?;
    Ok(print_block(registry, &out))
}

fn read(registry: &Registry, ty: TypeId) -> Result<String, MarshalError> {
    let mut out = Block::new();
    let mut slot = ClassLoaderSlot::new();
    registry
        .marshaller(ty)
        .emit_read(&mut out, &Variable::new("v", ty), &parcel(), &mut slot)?;
    Ok(print_block(registry, &out))
}

fn read_into(registry: &Registry, ty: TypeId) -> Result<String, MarshalError> {
    let mut out = Block::new();
    let mut slot = ClassLoaderSlot::new();
    registry
        .marshaller(ty)
        .emit_read_into(&mut out, &Variable::new("v", ty), &parcel(), &mut slot)?;
    Ok(print_block(registry, &out))
}

/// write, create, and read-into for an array of `ty`.
fn arrays(registry: &Registry, ty: TypeId) -> Result<String, MarshalError> {
    let mut out = Block::new();
    let v = Variable::array("v", ty);
    let m = registry.marshaller(ty);
    m.emit_write_array(&mut out, &v, &parcel(), WriteFlags::empty())?;
    m.emit_read_array(&mut out, &v, &parcel())?;
    m.emit_read_array_into(&mut out, &v, &parcel())?;
    Ok(print_block(registry, &out))
}

fn id(registry: &mut Registry, text: &str) -> TypeId {
    registry.resolve(text).unwrap()
}

// === Scalar families ===

#[test]
fn test_primitive_round_trip() {
    let r = registry();
    assert_eq!(write(&r, TypeId::INT, WriteFlags::empty()).unwrap(), "data.writeInt(v);\n");
    assert_eq!(read(&r, TypeId::LONG).unwrap(), "v = data.readLong();\n");
    assert_eq!(
        arrays(&r, TypeId::DOUBLE).unwrap(),
        "data.writeDoubleArray(v);\nv = data.createDoubleArray();\ndata.readDoubleArray(v);\n"
    );
}

#[test]
fn test_boolean_uses_int_slot() {
    let r = registry();
    assert_eq!(
        write(&r, TypeId::BOOLEAN, WriteFlags::empty()).unwrap(),
        "data.writeInt((v ? 1 : 0));\n"
    );
    assert_eq!(read(&r, TypeId::BOOLEAN).unwrap(), "v = 0 != data.readInt();\n");
    assert_eq!(
        arrays(&r, TypeId::BOOLEAN).unwrap(),
        "data.writeBooleanArray(v);\nv = data.createBooleanArray();\ndata.readBooleanArray(v);\n"
    );
}

#[test]
fn test_char_narrows_on_read() {
    let r = registry();
    assert_eq!(
        write(&r, TypeId::CHAR, WriteFlags::empty()).unwrap(),
        "data.writeInt((int) v);\n"
    );
    assert_eq!(read(&r, TypeId::CHAR).unwrap(), "v = (char) data.readInt();\n");
    assert!(arrays(&r, TypeId::CHAR).unwrap().starts_with("data.writeCharArray(v);\n"));
}

#[test]
fn test_string_has_no_presence_flag() {
    let r = registry();
    let mut out = Block::new();
    let v = Variable::new("v", TypeId::STRING);
    let mut slot = ClassLoaderSlot::new();
    let m = r.marshaller(TypeId::STRING);
    m.emit_write(&mut out, &v, &parcel(), WriteFlags::empty()).unwrap();
    m.emit_read(&mut out, &v, &parcel(), &mut slot).unwrap();
    assert_eq!(
        print_block(&r, &out),
        "data.writeString(v);\nv = data.readString();\n"
    );
    assert!(!out.iter().any(|s| matches!(s, Stmt::If { .. })));
}

#[test]
fn test_char_sequence_is_nullable_without_array_form() {
    let r = registry();
    assert_eq!(
        write(&r, TypeId::CHAR_SEQUENCE, WriteFlags::empty()).unwrap(),
        "\
if (v != null) {
    data.writeInt(1);
    android.text.TextUtils.writeToParcel(v, data, 0);
} else {
    data.writeInt(0);
}
"
    );
    assert_eq!(
        read(&r, TypeId::CHAR_SEQUENCE).unwrap(),
        "\
if (0 != data.readInt()) {
    v = android.text.TextUtils.CHAR_SEQUENCE_CREATOR.createFromParcel(data);
} else {
    v = null;
}
"
    );
    assert!(matches!(
        arrays(&r, TypeId::CHAR_SEQUENCE),
        Err(MarshalError::NoArrayForm { .. })
    ));
}

#[test]
fn test_binder_handle() {
    let r = registry();
    assert_eq!(
        write(&r, TypeId::IBINDER, WriteFlags::empty()).unwrap(),
        "data.writeStrongBinder(v);\n"
    );
    assert_eq!(read(&r, TypeId::IBINDER).unwrap(), "v = data.readStrongBinder();\n");
    assert_eq!(
        arrays(&r, TypeId::IBINDER).unwrap(),
        "data.writeBinderArray(v);\nv = data.createBinderArray();\ndata.readBinderArray(v);\n"
    );
}

// === Parcelables ===

#[test]
fn test_parcelable_write_and_read() {
    let mut r = registry();
    let foo = id(&mut r, "pkg.Foo");
    assert_eq!(
        write(&r, foo, WriteFlags::empty()).unwrap(),
        "\
if (v != null) {
    data.writeInt(1);
    v.writeToParcel(data, 0);
} else {
    data.writeInt(0);
}
"
    );
    assert_eq!(
        read(&r, foo).unwrap(),
        "\
if (0 != data.readInt()) {
    v = pkg.Foo.CREATOR.createFromParcel(data);
} else {
    v = null;
}
"
    );
}

#[test]
fn test_parcelable_read_into_has_no_else() {
    let mut r = registry();
    let foo = id(&mut r, "pkg.Foo");
    assert_eq!(
        read_into(&r, foo).unwrap(),
        "if (0 != data.readInt()) {\n    v.readFromParcel(data);\n}\n"
    );
}

#[test]
fn test_parcelable_arrays_pass_creator() {
    let mut r = registry();
    let foo = id(&mut r, "pkg.Foo");
    assert_eq!(
        arrays(&r, foo).unwrap(),
        "\
data.writeTypedArray(v, 0);
v = data.createTypedArray(pkg.Foo.CREATOR);
data.readTypedArray(v, pkg.Foo.CREATOR);
"
    );
}

#[test]
fn test_return_value_flag() {
    let mut r = registry();
    let foo = id(&mut r, "pkg.Foo");
    let out = write(&r, foo, WriteFlags::RETURN_VALUE).unwrap();
    assert!(out.contains(
        "v.writeToParcel(data, android.os.Parcelable.PARCELABLE_WRITE_RETURN_VALUE);"
    ));
}

#[test]
fn test_unknown_flag_bits_degrade_to_zero() {
    assert_eq!(WriteFlags::from_bits_retain(0b100).to_expr(), Expr::int(0));
    assert_eq!(WriteFlags::empty().to_expr(), Expr::int(0));
}

#[test]
fn test_reference_only_parcelable_is_rejected() {
    let mut r = registry();
    let handle = id(&mut r, "pkg.Handle");
    assert_eq!(
        write(&r, handle, WriteFlags::empty()),
        Err(MarshalError::NotMarshallable {
            ty: "pkg.Handle".to_string()
        })
    );
}

// === Interfaces ===

#[test]
fn test_interface_goes_through_stub() {
    let mut r = registry();
    let bar = id(&mut r, "pkg.IBar");
    assert_eq!(
        write(&r, bar, WriteFlags::empty()).unwrap(),
        "data.writeStrongBinder((v != null ? v.asBinder() : null));\n"
    );
    assert_eq!(
        read(&r, bar).unwrap(),
        "v = pkg.IBar.Stub.asInterface(data.readStrongBinder());\n"
    );
    assert!(matches!(
        arrays(&r, bar),
        Err(MarshalError::NoArrayForm { .. })
    ));
}

#[test]
fn test_companions_are_capability_violations() {
    let mut r = registry();
    for name in ["pkg.IBar.Stub", "pkg.IBar.Stub.Proxy"] {
        let companion = id(&mut r, name);
        assert!(matches!(
            write(&r, companion, WriteFlags::empty()),
            Err(MarshalError::NotMarshallable { .. })
        ));
        assert!(matches!(
            read(&r, companion),
            Err(MarshalError::NotMarshallable { .. })
        ));
    }
}

// === Containers ===

#[test]
fn test_container_reads_share_one_class_loader() {
    let r = registry();
    let mut out = Block::new();
    let mut slot = ClassLoaderSlot::new();
    let map = Variable::new("m", TypeId::MAP);
    let list = Variable::new("l", TypeId::LIST);

    r.marshaller(TypeId::MAP)
        .emit_read(&mut out, &map, &parcel(), &mut slot)
        .unwrap();
    r.marshaller(TypeId::LIST)
        .emit_read_into(&mut out, &list, &parcel(), &mut slot)
        .unwrap();
    r.marshaller(TypeId::LIST)
        .emit_read(&mut out, &list, &parcel(), &mut slot)
        .unwrap();

    assert!(slot.is_populated());
    assert_eq!(
        print_block(&r, &out),
        "\
java.lang.ClassLoader cl = this.getClass().getClassLoader();
m = data.readHashMap(cl);
data.readList(l, cl);
l = data.readArrayList(cl);
"
    );
}

#[test]
fn test_container_write_needs_no_class_loader() {
    let r = registry();
    assert_eq!(write(&r, TypeId::MAP, WriteFlags::empty()).unwrap(), "data.writeMap(v);\n");
    assert_eq!(write(&r, TypeId::LIST, WriteFlags::empty()).unwrap(), "data.writeList(v);\n");
    assert!(matches!(
        arrays(&r, TypeId::LIST),
        Err(MarshalError::NoArrayForm { .. })
    ));
}

#[test]
fn test_map_read_into() {
    let r = registry();
    assert_eq!(
        read_into(&r, TypeId::MAP).unwrap(),
        "java.lang.ClassLoader cl = this.getClass().getClassLoader();\ndata.readMap(v, cl);\n"
    );
}

// === Generic lists ===

#[test]
fn test_string_list_path() {
    let mut r = registry();
    let list = id(&mut r, "List<String>");
    assert_eq!(write(&r, list, WriteFlags::empty()).unwrap(), "data.writeStringList(v);\n");
    assert_eq!(read(&r, list).unwrap(), "v = data.createStringArrayList();\n");
    assert_eq!(read_into(&r, list).unwrap(), "data.readStringList(v);\n");
}

#[test]
fn test_char_sequence_list_shares_string_path() {
    let mut r = registry();
    let list = id(&mut r, "List<CharSequence>");
    assert_eq!(read(&r, list).unwrap(), "v = data.createStringArrayList();\n");
}

#[test]
fn test_binder_list_path() {
    let mut r = registry();
    let list = id(&mut r, "List<IBinder>");
    assert_eq!(write(&r, list, WriteFlags::empty()).unwrap(), "data.writeBinderList(v);\n");
    assert_eq!(read(&r, list).unwrap(), "v = data.createBinderArrayList();\n");
    assert_eq!(read_into(&r, list).unwrap(), "data.readBinderList(v);\n");
}

#[test]
fn test_typed_list_path() {
    let mut r = registry();
    let list = id(&mut r, "List<pkg.Foo>");
    assert_eq!(write(&r, list, WriteFlags::empty()).unwrap(), "data.writeTypedList(v);\n");
    assert_eq!(
        read(&r, list).unwrap(),
        "v = data.createTypedArrayList(pkg.Foo.CREATOR);\n"
    );
    assert_eq!(
        read_into(&r, list).unwrap(),
        "data.readTypedList(v, pkg.Foo.CREATOR);\n"
    );
}

#[test]
fn test_nested_list_uses_array_list_creator() {
    let mut r = registry();
    let list = id(&mut r, "List<List<String>>");
    assert_eq!(
        read(&r, list).unwrap(),
        "v = data.createTypedArrayList(android.os.Parcel.arrayListCreator);\n"
    );
}

#[test]
fn test_list_of_creatorless_elements_uses_binder_path() {
    let mut r = registry();
    assert_eq!(r.get(TypeId::IBINDER).creator(), r.get(TypeId::INT).creator());
    for text in ["List<int>", "List<pkg.IBar>"] {
        let list = id(&mut r, text);
        assert_eq!(
            write(&r, list, WriteFlags::empty()).unwrap(),
            "data.writeBinderList(v);\n"
        );
        assert_eq!(read(&r, list).unwrap(), "v = data.createBinderArrayList();\n");
        assert_eq!(read_into(&r, list).unwrap(), "data.readBinderList(v);\n");
    }
}

// === Capability violations ===

#[test]
fn test_void_and_opaque_are_never_marshalled() {
    let r = registry();
    for ty in [TypeId::VOID, TypeId::OBJECT, TypeId::PARCEL, TypeId::REMOTE_EXCEPTION] {
        assert!(matches!(
            write(&r, ty, WriteFlags::empty()),
            Err(MarshalError::NotMarshallable { .. })
        ));
        assert!(matches!(read(&r, ty), Err(MarshalError::NotMarshallable { .. })));
    }
}

#[test]
fn test_read_into_requires_out_support() {
    let mut r = registry();
    let bar = id(&mut r, "pkg.IBar");
    for ty in [TypeId::STRING, TypeId::INT, bar] {
        assert!(matches!(
            read_into(&r, ty),
            Err(MarshalError::NoInPlaceRead { .. })
        ));
    }
}

#[test]
fn test_failed_read_leaves_block_and_slot_untouched() {
    let r = registry();
    let mut out = Block::new();
    out.push(Stmt::call(&parcel(), "enforceInterface", Vec::new()));
    let mut slot = ClassLoaderSlot::new();

    let err = r.marshaller(TypeId::OBJECT).emit_read(
        &mut out,
        &Variable::new("v", TypeId::OBJECT),
        &parcel(),
        &mut slot,
    );
    assert!(err.is_err());
    assert_eq!(out.len(), 1);
    assert!(!slot.is_populated());
}
