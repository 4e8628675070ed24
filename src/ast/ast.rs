use crate::Position;

use super::{expressions::Expr, statements::Block};

/// Root of the tree: every class of one source file, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub classes: Vec<Class>,
    pub position: Position,
}

impl Program {
    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|class| class.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    /// `None` when the class has no `extends` clause.
    pub parent: Option<String>,
    pub members: Vec<Member>,
    pub position: Position,
}

impl Class {
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) => Some(field),
            Member::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            Member::Field(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(Field),
    Method(Method),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(field) => &field.name,
            Member::Method(method) => &method.name,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Member::Field(field) => field.position,
            Member::Method(method) => method.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub type_name: String,
    pub name: String,
    pub init: Option<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Formal>,
    pub body: Block,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub type_name: String,
    pub name: String,
    pub position: Position,
}
