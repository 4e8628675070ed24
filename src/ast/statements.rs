use std::slice::Iter;

use crate::Position;

use super::expressions::Expr;

/// `{ ... }`. An empty block has an empty `stmts` vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub position: Position,
}

impl Block {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.stmts.iter()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    If {
        condition: Expr,
        then_body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    Break,
    Return(Option<Expr>),
    Block(Block),
    Decl {
        name: String,
        init: Expr,
    },
    Expression(Expr),
}

impl Stmt {
    pub fn new(kind: StmtKind, position: Position) -> Self {
        Stmt { kind, position }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.kind {
            StmtKind::Block(block) => Some(block),
            _ => None,
        }
    }
}
