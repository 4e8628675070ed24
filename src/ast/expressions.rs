use std::fmt::Display;

use crate::Position;

/// Binary operators, loosest-binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    LogicOr,
    LogicAnd,
    CompEq,
    CompNe,
    CompLt,
    CompGt,
    CompLeq,
    CompGeq,
    ArithPlus,
    ArithMinus,
    ArithTimes,
    ArithDivide,
    ArithModulus,
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::LogicOr => "Or",
            BinaryOp::LogicAnd => "And",
            BinaryOp::CompEq => "Eq",
            BinaryOp::CompNe => "Ne",
            BinaryOp::CompLt => "Lt",
            BinaryOp::CompGt => "Gt",
            BinaryOp::CompLeq => "Leq",
            BinaryOp::CompGeq => "Geq",
            BinaryOp::ArithPlus => "Plus",
            BinaryOp::ArithMinus => "Minus",
            BinaryOp::ArithTimes => "Times",
            BinaryOp::ArithDivide => "Divide",
            BinaryOp::ArithModulus => "Modulus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrDecrOp {
    Incr,
    Decr,
}

/// An expression node and the position of its leading token.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Assign {
        receiver: Option<Box<Expr>>,
        name: String,
        value: Box<Expr>,
    },
    ArrayAssign {
        receiver: Option<Box<Expr>>,
        name: String,
        index: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Instanceof {
        expr: Box<Expr>,
        type_name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `++`/`--`. A prefix form yields the updated value, a postfix form
    /// the original one.
    IncrDecr {
        op: IncrDecrOp,
        operand: Box<Expr>,
        postfix: bool,
    },
    New {
        type_name: String,
        array_size: Option<Box<Expr>>,
    },
    Cast {
        type_name: String,
        expr: Box<Expr>,
    },
    Var {
        receiver: Option<Box<Expr>>,
        name: String,
    },
    Array {
        receiver: Option<Box<Expr>>,
        name: String,
        index: Box<Expr>,
    },
    Dispatch {
        receiver: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
    ConstInt(i32),
    ConstString(String),
    ConstBool(bool),
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Expr { kind, position }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let position = left.position;
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            position,
        )
    }

    /// The receiver slot of member-style nodes, if the node has one.
    pub fn receiver(&self) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Assign { receiver, .. }
            | ExprKind::ArrayAssign { receiver, .. }
            | ExprKind::Var { receiver, .. }
            | ExprKind::Array { receiver, .. }
            | ExprKind::Dispatch { receiver, .. } => receiver.as_deref(),
            _ => None,
        }
    }
}

/// Frees the tree with an explicit work list. Receiver chains and operator
/// folds can be arbitrarily deep, and the derived drop would recurse once
/// per level.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(&mut self.kind, &mut pending);

        while let Some(mut expr) = pending.pop() {
            take_children(&mut expr.kind, &mut pending);
        }
    }
}

/// Moves the sub-expressions of `kind` onto `pending`, leaving a leaf behind.
fn take_children(kind: &mut ExprKind, pending: &mut Vec<Expr>) {
    if matches!(
        kind,
        ExprKind::ConstInt(_) | ExprKind::ConstString(_) | ExprKind::ConstBool(_)
    ) {
        return;
    }

    match std::mem::replace(kind, ExprKind::ConstBool(false)) {
        ExprKind::Assign { receiver, value, .. } => {
            pending.extend(receiver.map(|r| *r));
            pending.push(*value);
        }
        ExprKind::ArrayAssign {
            receiver,
            index,
            value,
            ..
        } => {
            pending.extend(receiver.map(|r| *r));
            pending.push(*index);
            pending.push(*value);
        }
        ExprKind::Binary { left, right, .. } => {
            pending.push(*left);
            pending.push(*right);
        }
        ExprKind::Instanceof { expr, .. } | ExprKind::Cast { expr, .. } => pending.push(*expr),
        ExprKind::Unary { operand, .. } | ExprKind::IncrDecr { operand, .. } => {
            pending.push(*operand)
        }
        ExprKind::New { array_size, .. } => pending.extend(array_size.map(|s| *s)),
        ExprKind::Var { receiver, .. } => pending.extend(receiver.map(|r| *r)),
        ExprKind::Array {
            receiver, index, ..
        } => {
            pending.extend(receiver.map(|r| *r));
            pending.push(*index);
        }
        ExprKind::Dispatch { receiver, args, .. } => {
            pending.extend(receiver.map(|r| *r));
            pending.extend(args);
        }
        ExprKind::ConstInt(_) | ExprKind::ConstString(_) | ExprKind::ConstBool(_) => {}
    }
}

fn write_qualified(
    f: &mut std::fmt::Formatter<'_>,
    receiver: &Option<Box<Expr>>,
    name: &str,
) -> std::fmt::Result {
    if let Some(receiver) = receiver {
        write!(f, "{}.", receiver)?;
    }
    write!(f, "{}", name)
}

/// Compact rendering used by diagnostics output and tests, e.g.
/// `Plus(1, Times(2, 3))` or `a.b.c()`.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Assign { receiver, name, value } => {
                write!(f, "Assign(")?;
                write_qualified(f, receiver, name)?;
                write!(f, ", {})", value)
            }
            ExprKind::ArrayAssign { receiver, name, index, value } => {
                write!(f, "Assign(")?;
                write_qualified(f, receiver, name)?;
                write!(f, "[{}], {})", index, value)
            }
            ExprKind::Binary { op, left, right } => {
                write!(f, "{}({}, {})", op.name(), left, right)
            }
            ExprKind::Instanceof { expr, type_name } => {
                write!(f, "Instanceof({}, {})", expr, type_name)
            }
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Neg => write!(f, "Neg({})", operand),
                UnaryOp::Not => write!(f, "Not({})", operand),
            },
            ExprKind::IncrDecr { op, operand, postfix } => {
                let fixity = if *postfix { "Post" } else { "Pre" };
                let name = match op {
                    IncrDecrOp::Incr => "Incr",
                    IncrDecrOp::Decr => "Decr",
                };
                write!(f, "{}{}({})", fixity, name, operand)
            }
            ExprKind::New { type_name, array_size: None } => write!(f, "New({})", type_name),
            ExprKind::New { type_name, array_size: Some(size) } => {
                write!(f, "NewArray({}, {})", type_name, size)
            }
            ExprKind::Cast { type_name, expr } => write!(f, "Cast({}, {})", type_name, expr),
            ExprKind::Var { receiver, name } => write_qualified(f, receiver, name),
            ExprKind::Array { receiver, name, index } => {
                write_qualified(f, receiver, name)?;
                write!(f, "[{}]", index)
            }
            ExprKind::Dispatch { receiver, method, args } => {
                write_qualified(f, receiver, method)?;
                let args = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>();
                write!(f, "({})", args.join(", "))
            }
            ExprKind::ConstInt(value) => write!(f, "{}", value),
            ExprKind::ConstString(value) => write!(f, "{:?}", value),
            ExprKind::ConstBool(value) => write!(f, "{}", value),
        }
    }
}
