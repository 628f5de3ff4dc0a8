//! Per-family wire encodings.
//!
//! Every function matches exhaustively on `Family`. Arms that cannot support
//! the operation return the matching `MarshalError`; the public wrappers in
//! the parent module check capability flags first, so those arms only fire
//! for descriptors whose flags and family disagree.

use bidl_ir::{Block, Expr, Stmt, TypeId, Variable};

use super::{ClassLoaderSlot, MarshalError, Marshaller, WriteFlags};
use crate::descriptor::{ContainerKind, Creator, Family};

/// Wire path of a generic list, chosen by the element's creator.
enum ListPath {
    String,
    Binder,
    Typed(Expr),
}

/// Bulk array operations of an array-capable family.
struct ArrayOps {
    write: &'static str,
    create: &'static str,
    read: &'static str,
}

const BOOLEAN_ARRAY: ArrayOps = ArrayOps {
    write: "writeBooleanArray",
    create: "createBooleanArray",
    read: "readBooleanArray",
};
const CHAR_ARRAY: ArrayOps = ArrayOps {
    write: "writeCharArray",
    create: "createCharArray",
    read: "readCharArray",
};
const STRING_ARRAY: ArrayOps = ArrayOps {
    write: "writeStringArray",
    create: "createStringArray",
    read: "readStringArray",
};
const BINDER_ARRAY: ArrayOps = ArrayOps {
    write: "writeBinderArray",
    create: "createBinderArray",
    read: "readBinderArray",
};

fn call(parcel: &Variable, method: &str, args: Vec<Expr>) -> Expr {
    Expr::call(parcel, method, args)
}

fn read_int(parcel: &Variable) -> Expr {
    call(parcel, "readInt", Vec::new())
}

fn write_int(parcel: &Variable, value: i64) -> Stmt {
    Stmt::call(parcel, "writeInt", vec![Expr::int(value)])
}

/// `0 != parcel.readInt()`
fn present(parcel: &Variable) -> Expr {
    Expr::ne(Expr::int(0), read_int(parcel))
}

/// `Type.CREATOR`
fn creator_of(ty: TypeId) -> Expr {
    Expr::static_field(ty, "CREATOR")
}

/// Presence flag, then `payload` when the value is non-null.
fn write_nullable(out: &mut Block, value: &Variable, parcel: &Variable, payload: Stmt) {
    out.push(Stmt::If {
        cond: Expr::ne(Expr::var(value), Expr::NULL),
        then: vec![write_int(parcel, 1), payload].into(),
        otherwise: Some(vec![write_int(parcel, 0)].into()),
    });
}

/// Presence check, then `value = created`, else `value = null`.
fn read_nullable(out: &mut Block, value: &Variable, parcel: &Variable, created: Expr) {
    out.push(Stmt::If {
        cond: present(parcel),
        then: vec![Stmt::assign(value, created)].into(),
        otherwise: Some(vec![Stmt::assign(value, Expr::NULL)].into()),
    });
}

impl Marshaller<'_> {
    pub(super) fn write(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        flags: WriteFlags,
    ) -> Result<(), MarshalError> {
        self.require_marshallable()?;
        let v = Expr::var(value);
        let stmt = match self.desc.family() {
            Family::Primitive(ops) => Stmt::call(parcel, ops.write, vec![v]),
            Family::Boolean => Stmt::call(
                parcel,
                "writeInt",
                vec![Expr::ternary(v, Expr::int(1), Expr::int(0))],
            ),
            Family::Char => Stmt::call(parcel, "writeInt", vec![Expr::cast(TypeId::INT, v)]),
            Family::String => Stmt::call(parcel, "writeString", vec![v]),
            Family::CharSequence => {
                let payload = Stmt::call(
                    TypeId::TEXT_UTILS,
                    "writeToParcel",
                    vec![v, Expr::var(parcel), flags.to_expr()],
                );
                write_nullable(out, value, parcel, payload);
                return Ok(());
            }
            Family::Binder => Stmt::call(parcel, "writeStrongBinder", vec![v]),
            Family::Parcelable => {
                let payload =
                    Stmt::call(value, "writeToParcel", vec![Expr::var(parcel), flags.to_expr()]);
                write_nullable(out, value, parcel, payload);
                return Ok(());
            }
            Family::Interface { .. } => {
                let binder = Expr::ternary(
                    Expr::ne(v, Expr::NULL),
                    Expr::call(value, "asBinder", Vec::new()),
                    Expr::NULL,
                );
                Stmt::call(parcel, "writeStrongBinder", vec![binder])
            }
            Family::Container(ContainerKind::Map) => Stmt::call(parcel, "writeMap", vec![v]),
            Family::Container(ContainerKind::List) => Stmt::call(parcel, "writeList", vec![v]),
            Family::GenericList { element_creator, .. } => {
                let method = match self.list_path(*element_creator) {
                    ListPath::String => "writeStringList",
                    ListPath::Binder => "writeBinderList",
                    ListPath::Typed(_) => "writeTypedList",
                };
                Stmt::call(parcel, method, vec![v])
            }
            Family::Void | Family::Opaque => {
                return Err(MarshalError::NotMarshallable {
                    ty: self.type_name(),
                })
            }
        };
        out.push(stmt);
        Ok(())
    }

    pub(super) fn read(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        class_loader: &mut ClassLoaderSlot,
    ) -> Result<(), MarshalError> {
        self.require_marshallable()?;
        let created = match self.desc.family() {
            Family::Primitive(ops) => call(parcel, ops.read, Vec::new()),
            Family::Boolean => present(parcel),
            Family::Char => Expr::cast(TypeId::CHAR, read_int(parcel)),
            Family::String => call(parcel, "readString", Vec::new()),
            Family::CharSequence => {
                let creator = Expr::static_field(TypeId::TEXT_UTILS, "CHAR_SEQUENCE_CREATOR");
                let created = Expr::call(creator, "createFromParcel", vec![Expr::var(parcel)]);
                read_nullable(out, value, parcel, created);
                return Ok(());
            }
            Family::Binder => call(parcel, "readStrongBinder", Vec::new()),
            Family::Parcelable => {
                let created =
                    Expr::call(creator_of(value.ty), "createFromParcel", vec![Expr::var(parcel)]);
                read_nullable(out, value, parcel, created);
                return Ok(());
            }
            Family::Interface { .. } => {
                let stub_name = format!("{}.Stub", self.desc.qualified_name());
                let stub = self.registry.find_exact(&stub_name).ok_or_else(|| {
                    MarshalError::MissingStub {
                        ty: self.type_name(),
                    }
                })?;
                let binder = call(parcel, "readStrongBinder", Vec::new());
                Expr::call(stub, "asInterface", vec![binder])
            }
            Family::Container(kind) => {
                let cl = Expr::var(&class_loader.ensure(out));
                match kind {
                    ContainerKind::Map => call(parcel, "readHashMap", vec![cl]),
                    ContainerKind::List => call(parcel, "readArrayList", vec![cl]),
                }
            }
            Family::GenericList { element_creator, .. } => match self.list_path(*element_creator) {
                ListPath::String => call(parcel, "createStringArrayList", Vec::new()),
                ListPath::Binder => call(parcel, "createBinderArrayList", Vec::new()),
                ListPath::Typed(creator) => call(parcel, "createTypedArrayList", vec![creator]),
            },
            Family::Void | Family::Opaque => {
                return Err(MarshalError::NotMarshallable {
                    ty: self.type_name(),
                })
            }
        };
        out.push(Stmt::assign(value, created));
        Ok(())
    }

    pub(super) fn read_into(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        class_loader: &mut ClassLoaderSlot,
    ) -> Result<(), MarshalError> {
        self.require_out_parameter()?;
        let v = Expr::var(value);
        let stmt = match self.desc.family() {
            // Absent data leaves the existing value untouched.
            Family::Parcelable => Stmt::If {
                cond: present(parcel),
                then: vec![Stmt::call(value, "readFromParcel", vec![Expr::var(parcel)])].into(),
                otherwise: None,
            },
            Family::Container(kind) => {
                let cl = Expr::var(&class_loader.ensure(out));
                match kind {
                    ContainerKind::Map => Stmt::call(parcel, "readMap", vec![v, cl]),
                    ContainerKind::List => Stmt::call(parcel, "readList", vec![v, cl]),
                }
            }
            Family::GenericList { element_creator, .. } => match self.list_path(*element_creator) {
                ListPath::String => Stmt::call(parcel, "readStringList", vec![v]),
                ListPath::Binder => Stmt::call(parcel, "readBinderList", vec![v]),
                ListPath::Typed(creator) => Stmt::call(parcel, "readTypedList", vec![v, creator]),
            },
            Family::Void
            | Family::Primitive(_)
            | Family::Boolean
            | Family::Char
            | Family::String
            | Family::CharSequence
            | Family::Binder
            | Family::Opaque
            | Family::Interface { .. } => {
                return Err(MarshalError::NoInPlaceRead {
                    ty: self.type_name(),
                })
            }
        };
        out.push(stmt);
        Ok(())
    }

    pub(super) fn write_array(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        flags: WriteFlags,
    ) -> Result<(), MarshalError> {
        self.require_array_form()?;
        let v = Expr::var(value);
        let stmt = if matches!(self.desc.family(), Family::Parcelable) {
            Stmt::call(parcel, "writeTypedArray", vec![v, flags.to_expr()])
        } else {
            Stmt::call(parcel, self.array_ops()?.write, vec![v])
        };
        out.push(stmt);
        Ok(())
    }

    pub(super) fn create_array(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
    ) -> Result<(), MarshalError> {
        self.require_array_form()?;
        let created = if matches!(self.desc.family(), Family::Parcelable) {
            call(parcel, "createTypedArray", vec![creator_of(value.ty)])
        } else {
            call(parcel, self.array_ops()?.create, Vec::new())
        };
        out.push(Stmt::assign(value, created));
        Ok(())
    }

    pub(super) fn read_array(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
    ) -> Result<(), MarshalError> {
        self.require_array_form()?;
        let v = Expr::var(value);
        let stmt = if matches!(self.desc.family(), Family::Parcelable) {
            Stmt::call(parcel, "readTypedArray", vec![v, creator_of(value.ty)])
        } else {
            Stmt::call(parcel, self.array_ops()?.read, vec![v])
        };
        out.push(stmt);
        Ok(())
    }

    /// Bulk operations of the non-parcelable array families.
    fn array_ops(&self) -> Result<ArrayOps, MarshalError> {
        match self.desc.family() {
            Family::Primitive(ops) => Ok(ArrayOps {
                write: ops.write_array,
                create: ops.create_array,
                read: ops.read_array,
            }),
            Family::Boolean => Ok(BOOLEAN_ARRAY),
            Family::Char => Ok(CHAR_ARRAY),
            Family::String => Ok(STRING_ARRAY),
            Family::Binder => Ok(BINDER_ARRAY),
            Family::Void
            | Family::CharSequence
            | Family::Opaque
            | Family::Parcelable
            | Family::Interface { .. }
            | Family::Container(_)
            | Family::GenericList { .. } => Err(MarshalError::NoArrayForm {
                ty: self.type_name(),
            }),
        }
    }

    /// Pick the list wire path by which built-in the element's creator
    /// equals: the string built-in, the binder built-in, or neither.
    fn list_path(&self, creator: Creator) -> ListPath {
        if creator == self.registry.get(TypeId::STRING).creator() {
            return ListPath::String;
        }
        if creator == self.registry.get(TypeId::IBINDER).creator() {
            return ListPath::Binder;
        }
        match creator {
            Creator::Typed(ty) => ListPath::Typed(creator_of(ty)),
            Creator::ArrayList => {
                ListPath::Typed(Expr::static_field(TypeId::PARCEL, "arrayListCreator"))
            }
            // Both tags belong to the built-ins compared above.
            Creator::None => ListPath::Binder,
            Creator::ParcelString => ListPath::String,
        }
    }
}
