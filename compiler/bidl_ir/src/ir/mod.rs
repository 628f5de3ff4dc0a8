//! Output IR for generated marshalling code.
//!
//! Marshalling strategies append statements to a [`Block`]; nothing in the
//! type system reads them back. The node set is deliberately small: method
//! calls, assignments, declarations, `if`/`else`, comparisons, ternaries,
//! casts, static field accesses and literals.

mod printer;

pub use printer::{print_block, TypeNames};

use crate::TypeId;

/// Literal constants shared by every strategy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Null,
    This,
    Super,
    True,
    False,
    Int(i64),
}

/// A named local, parameter, or field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Variable {
    pub name: String,
    /// Declared type. For array variables this is the element type.
    pub ty: TypeId,
    pub array: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Variable {
            name: name.into(),
            ty,
            array: false,
        }
    }

    /// A one-dimensional array of `element`.
    pub fn array(name: impl Into<String>, element: TypeId) -> Self {
        Variable {
            name: name.into(),
            ty: element,
            array: true,
        }
    }
}

/// Comparison operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CmpOp {
    Eq,
    Ne,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        }
    }
}

/// The target of a method call: a value, or a type for static calls.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Receiver {
    Value(Expr),
    Type(TypeId),
}

impl From<Expr> for Receiver {
    fn from(expr: Expr) -> Self {
        Receiver::Value(expr)
    }
}

impl From<&Variable> for Receiver {
    fn from(var: &Variable) -> Self {
        Receiver::Value(Expr::Var(var.clone()))
    }
}

impl From<TypeId> for Receiver {
    fn from(ty: TypeId) -> Self {
        Receiver::Type(ty)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodCall {
    pub receiver: Receiver,
    pub method: String,
    pub args: Vec<Expr>,
}

/// An expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Expr {
    Literal(Literal),
    Var(Variable),
    /// `Owner.field`
    StaticField { owner: TypeId, field: String },
    Call(Box<MethodCall>),
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Compare {
        lhs: Box<Expr>,
        op: CmpOp,
        rhs: Box<Expr>,
    },
    Cast { ty: TypeId, expr: Box<Expr> },
}

impl Expr {
    pub const NULL: Expr = Expr::Literal(Literal::Null);
    pub const THIS: Expr = Expr::Literal(Literal::This);
    pub const SUPER: Expr = Expr::Literal(Literal::Super);
    pub const TRUE: Expr = Expr::Literal(Literal::True);
    pub const FALSE: Expr = Expr::Literal(Literal::False);

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    pub fn var(var: &Variable) -> Self {
        Expr::Var(var.clone())
    }

    pub fn static_field(owner: TypeId, field: impl Into<String>) -> Self {
        Expr::StaticField {
            owner,
            field: field.into(),
        }
    }

    pub fn call(
        receiver: impl Into<Receiver>,
        method: impl Into<String>,
        args: Vec<Expr>,
    ) -> Self {
        Expr::Call(Box::new(MethodCall {
            receiver: receiver.into(),
            method: method.into(),
            args,
        }))
    }

    pub fn ternary(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn compare(lhs: Expr, op: CmpOp, rhs: Expr) -> Self {
        Expr::Compare {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// `lhs != rhs`
    pub fn ne(lhs: Expr, rhs: Expr) -> Self {
        Self::compare(lhs, CmpOp::Ne, rhs)
    }

    pub fn cast(ty: TypeId, expr: Expr) -> Self {
        Expr::Cast {
            ty,
            expr: Box::new(expr),
        }
    }
}

/// A statement.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Stmt {
    /// An expression evaluated for its effect.
    Expr(Expr),
    Assign {
        target: Variable,
        value: Expr,
    },
    /// A new local, `Type name = init;`
    Declare {
        var: Variable,
        init: Expr,
    },
    If {
        cond: Expr,
        then: Block,
        otherwise: Option<Block>,
    },
}

impl Stmt {
    pub fn call(receiver: impl Into<Receiver>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Stmt::Expr(Expr::call(receiver, method, args))
    }

    pub fn assign(target: &Variable, value: Expr) -> Self {
        Stmt::Assign {
            target: target.clone(),
            value,
        }
    }
}

/// An ordered list of statements, used as the insertion cursor for emission.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Block {
    stmts: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Block { stmts: Vec::new() }
    }

    /// Append a statement at the end of the block.
    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    /// Move every statement of `other` to the end of this block.
    pub fn append(&mut self, other: Block) {
        self.stmts.extend(other.stmts);
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stmt> {
        self.stmts.iter()
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }
}
