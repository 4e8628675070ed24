//! Unit tests for the parser module.
//!
//! This module contains tests for parsing Bantam Java constructs including:
//! - Classes, fields, methods and formals
//! - Statements and the dangling else
//! - Expression precedence and associativity
//! - Member chains and assignment targets
//! - Error recovery at every level

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::{
        ast::{Member, Program},
        expressions::{BinaryOp, ExprKind},
        statements::{Stmt, StmtKind},
    },
    errors::errors::{ErrorHandler, ErrorImpl, ErrorKind},
    Position,
};

fn parse_source(source: &str) -> (Program, ErrorHandler) {
    parse(source.to_string(), Rc::new("test.btm".to_string()))
}

/// Parses `body` as the body of `Main.main` and returns its statements.
fn parse_body(body: &str) -> (Vec<Stmt>, ErrorHandler) {
    let source = format!("class Main {{ void main() {{ {} }} }}", body);
    let (program, errors) = parse_source(&source);

    let method = program.classes[0]
        .methods()
        .next()
        .expect("main method")
        .clone();
    (method.body.stmts, errors)
}

/// Parses a single expression statement and renders its expression.
fn render_expr(expr: &str) -> String {
    let (stmts, errors) = parse_body(&format!("{};", expr));
    assert!(errors.is_empty(), "unexpected diagnostics: {:?}", errors);
    assert_eq!(stmts.len(), 1);

    match &stmts[0].kind {
        StmtKind::Expression(expr) => expr.to_string(),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_empty_program() {
    let (program, errors) = parse_source("");

    assert!(program.classes.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_parse_classes_in_order() {
    let (program, errors) = parse_source("class A {} class B extends A {} class C {}");

    assert!(errors.is_empty());
    let names: Vec<&str> = program.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(program.classes[0].parent, None);
    assert_eq!(program.classes[1].parent.as_deref(), Some("A"));
    assert!(program.find_class("C").is_some());
}

#[test]
fn test_parse_fields_and_methods() {
    let source = "class A {
        int x = 5;
        int[] arr;
        void m(int a, String[] b) { return; }
        boolean f() { return true; }
    }";
    let (program, errors) = parse_source(source);

    assert!(errors.is_empty());
    let class = &program.classes[0];
    assert_eq!(class.members.len(), 4);

    let fields: Vec<_> = class.fields().collect();
    assert_eq!(fields[0].type_name, "int");
    assert_eq!(fields[0].name, "x");
    assert_eq!(fields[0].init.as_ref().map(|e| e.to_string()), Some("5".to_string()));
    assert_eq!(fields[1].type_name, "int[]");
    assert!(fields[1].init.is_none());

    let methods: Vec<_> = class.methods().collect();
    assert_eq!(methods[0].return_type, "void");
    assert_eq!(methods[0].params.len(), 2);
    assert_eq!(methods[0].params[0].type_name, "int");
    assert_eq!(methods[0].params[1].type_name, "String[]");
    assert_eq!(methods[0].params[1].name, "b");
    assert_eq!(methods[1].name, "f");
    assert!(methods[1].params.is_empty());
}

#[test]
fn test_parse_positions() {
    let source = "class A {\n  void m() {\n    x = 1;\n  }\n}";
    let (program, errors) = parse_source(source);

    assert!(errors.is_empty());
    let class = &program.classes[0];
    assert_eq!(class.position, Position::new(1, 1));
    assert_eq!(class.members[0].position(), Position::new(2, 3));

    let method = class.methods().next().unwrap();
    assert_eq!(method.body.position, Position::new(2, 12));
    assert_eq!(method.body.stmts[0].position, Position::new(3, 5));
}

#[test]
fn test_parse_precedence() {
    assert_eq!(render_expr("1 + 2 * 3"), "Plus(1, Times(2, 3))");
    assert_eq!(render_expr("(1 + 2) * 3"), "Times(Plus(1, 2), 3)");
    assert_eq!(render_expr("a - b - c"), "Minus(Minus(a, b), c)");
    assert_eq!(render_expr("a / b % c"), "Modulus(Divide(a, b), c)");
    assert_eq!(render_expr("!a && b || c"), "Or(And(Not(a), b), c)");
    assert_eq!(render_expr("a || b || c"), "Or(Or(a, b), c)");
    assert_eq!(render_expr("-x * 3"), "Times(Neg(x), 3)");
    assert_eq!(render_expr("a < b + 1 == c"), "Eq(Lt(a, Plus(b, 1)), c)");
}

#[test]
fn test_parse_assignment_is_right_associative() {
    assert_eq!(render_expr("a = b = c"), "Assign(a, Assign(b, c))");
    assert_eq!(render_expr("a = b || c"), "Assign(a, Or(b, c))");
}

#[test]
fn test_parse_assignment_targets() {
    assert_eq!(render_expr("this.x = 5"), "Assign(this.x, 5)");
    assert_eq!(render_expr("a[1] = 2"), "Assign(a[1], 2)");
    assert_eq!(render_expr("o.arr[i] = s"), "Assign(o.arr[i], s)");

    let (stmts, _) = parse_body("a[i + 1] = 0;");
    match &stmts[0].kind {
        StmtKind::Expression(expr) => {
            assert!(matches!(expr.kind, ExprKind::ArrayAssign { .. }));
        }
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_any_assignment_target() {
    let (stmts, errors) = parse_body("f() = 1; x = 3;");

    assert!(errors.is_empty());
    assert_eq!(stmts.len(), 2);
    match &stmts[0].kind {
        StmtKind::Expression(expr) => assert_eq!(expr.to_string(), "Assign(f, 1)"),
        other => panic!("expected expression statement, got {:?}", other),
    }

    assert_eq!(render_expr("(x) = 3"), "Assign(x, 3)");
}

#[test]
fn test_parse_equality_does_not_chain() {
    let (stmts, errors) = parse_body("x = a == b == c; y = 1;");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.count(ErrorKind::Parse), 1);
    assert!(matches!(
        errors.diagnostics()[0].error.get_impl(),
        ErrorImpl::UnexpectedToken { token } if token == "=="
    ));

    // The broken statement is dropped, the next one survives.
    assert_eq!(stmts.len(), 1);
    match &stmts[0].kind {
        StmtKind::Expression(expr) => assert_eq!(expr.to_string(), "Assign(y, 1)"),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_relational_does_not_chain() {
    let (_, errors) = parse_body("x = a < b < c;");
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_parse_increment_decrement() {
    assert_eq!(render_expr("x++ + ++y"), "Plus(PostIncr(x), PreIncr(y))");
    assert_eq!(render_expr("--a"), "PreDecr(a)");
    assert_eq!(render_expr("a--"), "PostDecr(a)");
    assert_eq!(render_expr("-!x"), "Neg(Not(x))");
}

#[test]
fn test_parse_member_chain() {
    assert_eq!(render_expr("a.b.c()"), "a.b.c()");
    assert_eq!(render_expr("super.foo(1, 2)"), "super.foo(1, 2)");
    assert_eq!(render_expr("f(g(x), \"s\")"), "f(g(x), \"s\")");

    let (stmts, _) = parse_body("a.b.c();");
    let StmtKind::Expression(expr) = &stmts[0].kind else {
        panic!("expected expression statement");
    };

    match &expr.kind {
        ExprKind::Dispatch { receiver, method, args } => {
            assert_eq!(method, "c");
            assert!(args.is_empty());

            let b = receiver.as_deref().expect("receiver of c");
            match &b.kind {
                ExprKind::Var { receiver, name } => {
                    assert_eq!(name, "b");
                    let a = receiver.as_deref().expect("receiver of b");
                    assert!(
                        matches!(&a.kind, ExprKind::Var { receiver: None, name } if name == "a")
                    );
                }
                other => panic!("expected Var, got {:?}", other),
            }
        }
        other => panic!("expected Dispatch, got {:?}", other),
    }
}

#[test]
fn test_parse_new_cast_instanceof() {
    assert_eq!(render_expr("x = new A()"), "Assign(x, New(A))");
    assert_eq!(render_expr("x = new int[10]"), "Assign(x, NewArray(int, 10))");
    assert_eq!(render_expr("x = cast(A, b)"), "Assign(x, Cast(A, b))");
    assert_eq!(render_expr("x = cast(A[], b)"), "Assign(x, Cast(A[], b))");
    assert_eq!(render_expr("x = a instanceof A"), "Assign(x, Instanceof(a, A))");
    assert_eq!(render_expr("a = b.c instanceof A"), "Assign(a, Instanceof(b.c, A))");
}

#[test]
fn test_parse_literals() {
    assert_eq!(render_expr("s = \"hi\""), "Assign(s, \"hi\")");
    assert_eq!(render_expr("b = true && !false"), "Assign(b, And(true, Not(false)))");
    assert_eq!(render_expr("n = 2147483647"), "Assign(n, 2147483647)");
}

#[test]
fn test_parse_number_overflow() {
    let (stmts, errors) = parse_body("n = 2147483648;");

    assert_eq!(errors.count(ErrorKind::Lex), 1);
    assert_eq!(errors.count(ErrorKind::Parse), 0);
    assert!(stmts.is_empty());
}

#[test]
fn test_parse_empty_block() {
    let (stmts, errors) = parse_body("{}");

    assert!(errors.is_empty());
    let block = stmts[0].as_block().expect("block statement");
    assert!(block.is_empty());
}

#[test]
fn test_parse_dangling_else() {
    let (stmts, errors) = parse_body("if (a) if (b) x = 1; else x = 2;");

    assert!(errors.is_empty());
    match &stmts[0].kind {
        StmtKind::If { then_body, else_body, .. } => {
            assert!(else_body.is_none());
            assert!(matches!(
                &then_body.kind,
                StmtKind::If { else_body: Some(_), .. }
            ));
        }
        other => panic!("expected If, got {:?}", other),
    }
}

#[test]
fn test_parse_loops() {
    let (stmts, errors) =
        parse_body("for (;;) break; for (i = 0; i < n; i++) { s = s + i; } while (true) {}");

    assert!(errors.is_empty());
    assert_eq!(stmts.len(), 3);

    match &stmts[0].kind {
        StmtKind::For { init, condition, update, body } => {
            assert!(init.is_none() && condition.is_none() && update.is_none());
            assert_eq!(body.kind, StmtKind::Break);
        }
        other => panic!("expected For, got {:?}", other),
    }

    match &stmts[1].kind {
        StmtKind::For { init, condition, update, .. } => {
            assert_eq!(init.as_ref().unwrap().to_string(), "Assign(i, 0)");
            assert_eq!(condition.as_ref().unwrap().to_string(), "Lt(i, n)");
            assert_eq!(update.as_ref().unwrap().to_string(), "PostIncr(i)");
        }
        other => panic!("expected For, got {:?}", other),
    }

    assert!(matches!(stmts[2].kind, StmtKind::While { .. }));
}

#[test]
fn test_parse_return_and_decl() {
    let (stmts, errors) = parse_body("var x = 1 + 2; return; return x;");

    assert!(errors.is_empty());
    match &stmts[0].kind {
        StmtKind::Decl { name, init } => {
            assert_eq!(name, "x");
            assert_eq!(init.to_string(), "Plus(1, 2)");
        }
        other => panic!("expected Decl, got {:?}", other),
    }
    assert_eq!(stmts[1].kind, StmtKind::Return(None));
    assert!(matches!(&stmts[2].kind, StmtKind::Return(Some(_))));
}

#[test]
fn test_parse_missing_initializer() {
    let (stmts, errors) = parse_body("var x; y = 2;");

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors.diagnostics()[0].error.get_impl(),
        ErrorImpl::MissingInitializer { variable } if variable == "x"
    ));
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_reports_errors_in_order() {
    let source = "class A {\n  void m() {\n    x = ;\n    y = ;\n  }\n}";
    let (program, errors) = parse_source(source);

    assert_eq!(errors.len(), 2);
    assert_eq!(errors.diagnostics()[0].error.get_position().line, 3);
    assert_eq!(errors.diagnostics()[1].error.get_position().line, 4);
    assert_eq!(program.classes.len(), 1);
}

#[test]
fn test_parse_lex_error_recovery() {
    let (program, errors) = parse_source("class A { int x = 1; # int y; }");

    assert_eq!(errors.count(ErrorKind::Lex), 1);
    assert_eq!(errors.count(ErrorKind::Parse), 0);
    assert_eq!(program.classes[0].members.len(), 2);
}

#[test]
fn test_parse_missing_close_curly() {
    let (program, errors) = parse_source("class A { int x;");

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors.diagnostics()[0].error.get_impl(),
        ErrorImpl::ExpectedToken { .. }
    ));
    assert_eq!(program.classes.len(), 1);
    assert_eq!(program.classes[0].members.len(), 1);
}

#[test]
fn test_parse_class_level_recovery() {
    let (program, errors) = parse_source("int x; class A {}");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.classes.len(), 1);
    assert_eq!(program.classes[0].name, "A");
}

#[test]
fn test_parse_member_level_recovery() {
    let (program, errors) = parse_source("class A { int ; void m( { x = 1; } int y; }");

    assert_eq!(errors.len(), 2);
    let members = &program.classes[0].members;
    assert_eq!(members.len(), 1);
    assert!(matches!(&members[0], Member::Field(field) if field.name == "y"));
}

#[test]
fn test_parse_binary_op_shape() {
    let (stmts, _) = parse_body("a + b;");
    let StmtKind::Expression(expr) = &stmts[0].kind else {
        panic!("expected expression statement");
    };

    assert!(matches!(
        expr.kind,
        ExprKind::Binary { op: BinaryOp::ArithPlus, .. }
    ));
    assert_eq!(expr.position, Position::new(1, 28));
}

#[test]
fn test_parse_long_member_chain() {
    let mut source = String::from("class Main { void main() { a");
    for _ in 0..200_000 {
        source.push_str(".b");
    }
    source.push_str(".c(); } }");

    let (program, errors) = parse_source(&source);

    assert!(errors.is_empty());
    assert_eq!(program.classes[0].methods().next().unwrap().body.len(), 1);
    drop(program);
}

#[test]
fn test_parse_failed_if_skips_its_else() {
    let (stmts, errors) = parse_body("if (a) x = ; else y = 1; z = 2;");

    assert_eq!(errors.len(), 1);
    assert_eq!(stmts.len(), 1);
    match &stmts[0].kind {
        StmtKind::Expression(expr) => assert_eq!(expr.to_string(), "Assign(z, 2)"),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_failed_if_with_dangling_else_at_block_end() {
    let (program, errors) = parse_source("class A { void m() { if (a) x = ; else } int y; }");

    assert_eq!(errors.len(), 2);
    assert_eq!(program.classes[0].members.len(), 2);
}

#[test]
fn test_parse_stray_semicolon_keeps_next_stmt() {
    let (stmts, errors) = parse_body("; x = 1;");

    assert_eq!(errors.len(), 1);
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_member_recovery_counts_stray_open_curly() {
    let (program, errors) = parse_source("class A { { x = 1; } int y; } class B {}");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.classes.len(), 2);
    assert_eq!(program.classes[0].members.len(), 1);
    assert_eq!(program.classes[0].members[0].name(), "y");
}
