//! Java-flavoured text rendering of the output IR.
//!
//! The printer is what tests and the CLI look at; the real output-program
//! layout belongs to whoever consumes the IR.

use std::fmt::Write;

use super::{Block, Expr, Literal, MethodCall, Receiver, Stmt};
use crate::TypeId;

/// Resolves type handles to qualified names for printing.
pub trait TypeNames {
    fn qualified_name(&self, id: TypeId) -> &str;
}

/// Render a block, one statement per line, four-space indentation.
pub fn print_block(names: &dyn TypeNames, block: &Block) -> String {
    let mut printer = Printer {
        names,
        indent: 0,
        output: String::with_capacity(256),
    };
    printer.block(block);
    printer.output
}

struct Printer<'a> {
    names: &'a dyn TypeNames,
    indent: usize,
    output: String,
}

impl Printer<'_> {
    fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn block(&mut self, block: &Block) {
        for stmt in block.iter() {
            self.stmt(stmt);
        }
    }

    fn nested(&mut self, block: &Block) {
        self.indent += 1;
        self.block(block);
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                let line = format!("{};", self.expr(expr));
                self.writeln(&line);
            }
            Stmt::Assign { target, value } => {
                let line = format!("{} = {};", target.name, self.expr(value));
                self.writeln(&line);
            }
            Stmt::Declare { var, init } => {
                let brackets = if var.array { "[]" } else { "" };
                let line = format!(
                    "{}{brackets} {} = {};",
                    self.names.qualified_name(var.ty),
                    var.name,
                    self.expr(init)
                );
                self.writeln(&line);
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                let line = format!("if ({}) {{", self.expr(cond));
                self.writeln(&line);
                self.nested(then);
                if let Some(otherwise) = otherwise {
                    self.writeln("} else {");
                    self.nested(otherwise);
                }
                self.writeln("}");
            }
        }
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => literal(*lit),
            Expr::Var(var) => var.name.clone(),
            Expr::StaticField { owner, field } => {
                format!("{}.{field}", self.names.qualified_name(*owner))
            }
            Expr::Call(call) => self.call(call),
            Expr::Ternary {
                cond,
                then,
                otherwise,
            } => format!(
                "({} ? {} : {})",
                self.expr(cond),
                self.expr(then),
                self.expr(otherwise)
            ),
            Expr::Compare { lhs, op, rhs } => {
                format!("{} {} {}", self.expr(lhs), op.as_str(), self.expr(rhs))
            }
            Expr::Cast { ty, expr } => {
                format!("({}) {}", self.names.qualified_name(*ty), self.expr(expr))
            }
        }
    }

    fn call(&self, call: &MethodCall) -> String {
        let mut out = match &call.receiver {
            Receiver::Value(expr) => self.expr(expr),
            Receiver::Type(ty) => self.names.qualified_name(*ty).to_string(),
        };
        let _ = write!(out, ".{}(", call.method);
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.expr(arg));
        }
        out.push(')');
        out
    }
}

fn literal(lit: Literal) -> String {
    match lit {
        Literal::Null => "null".to_string(),
        Literal::This => "this".to_string(),
        Literal::Super => "super".to_string(),
        Literal::True => "true".to_string(),
        Literal::False => "false".to_string(),
        Literal::Int(n) => n.to_string(),
    }
}
