//! Property-based tests for the analysis, linking and emission passes
//!
//! These tests verify:
//! - Emitted expressions parse back to the tree they came from
//! - Dependency classification matches a straight-line reference model
//! - Linking is idempotent and covers every consumer input
//! - Reserved names never receive a stage prefix
//! - Compilation is deterministic

use proptest::prelude::*;

use stagelink::ast::{BinOp, Expr, ExprKind, FunctionDef, Literal, Spanned, Stmt, UnaryOp};
use stagelink::builder::{
    binary, boolean, call, field, float, index, int, member, unary, var, write_field,
    FunctionBuilder,
};
use stagelink::{
    find_deps, CompileOptions, ExternalLinks, FunctionLibrary, GlslEmitter, GlslType, Lexer,
    Parser, Stage,
};

const FIELDS: &[&str] = &["a", "b", "c", "d", "e"];

// ============================================================================
// Generators
// ============================================================================

fn arb_binop() -> impl Strategy<Value = BinOp> {
    prop_oneof![
        Just(BinOp::Add),
        Just(BinOp::Sub),
        Just(BinOp::Mul),
        Just(BinOp::Div),
        Just(BinOp::Mod),
        Just(BinOp::Eq),
        Just(BinOp::Neq),
        Just(BinOp::Lt),
        Just(BinOp::Gte),
        Just(BinOp::And),
        Just(BinOp::Or),
    ]
}

fn arb_leaf() -> BoxedStrategy<Expr> {
    prop_oneof![
        prop::sample::select(vec!["x", "y", "uv", "t"]).prop_map(|name| var(name)),
        (0i64..100).prop_map(int),
        (0u32..400).prop_map(|n| float(f64::from(n) / 4.0)),
        any::<bool>().prop_map(boolean),
    ]
    .boxed()
}

/// Receiver-free expressions, as the emitter sees them
fn arb_expr(depth: usize) -> BoxedStrategy<Expr> {
    if depth == 0 {
        return arb_leaf();
    }
    let sub = || arb_expr(depth - 1);
    prop_oneof![
        3 => arb_leaf(),
        2 => (arb_binop(), sub(), sub()).prop_map(|(op, l, r)| binary(op, l, r)),
        1 => (prop_oneof![Just(UnaryOp::Neg), Just(UnaryOp::Not)], sub())
            .prop_map(|(op, e)| unary(op, e)),
        1 => prop::collection::vec(sub(), 1..3).prop_map(|args| call("max", args)),
        1 => prop::sample::select(vec!["x", "xy", "rgb"]).prop_map(|m| member(var("v"), m)),
        1 => sub().prop_map(|i| index(var("w"), i)),
    ]
    .boxed()
}

/// One straight-line statement: `self.target = f(self.reads..)`
fn arb_assignment() -> impl Strategy<Value = (String, Vec<String>)> {
    let name = || prop::sample::select(FIELDS.to_vec()).prop_map(String::from);
    (name(), prop::collection::vec(name(), 0..4))
}

fn build_stage(name: &str, stmts: &[(String, Vec<String>)]) -> FunctionDef {
    FunctionBuilder::method(name)
        .stmts(stmts.iter().map(|(target, reads)| assignment(target, reads)))
        .build()
}

fn assignment(target: &str, reads: &[String]) -> Stmt {
    write_field(target, call("f", reads.iter().map(|r| field(r.as_str()))))
}

// ============================================================================
// Helpers
// ============================================================================

/// The same tree with every span cleared
fn unspan(expr: &Expr) -> Expr {
    let node = match &expr.node {
        ExprKind::Lit(_) | ExprKind::Var(_) | ExprKind::Field(_) => expr.node.clone(),
        ExprKind::Member { base, name } => ExprKind::Member {
            base: Box::new(unspan(base)),
            name: name.clone(),
        },
        ExprKind::Index { base, index } => ExprKind::Index {
            base: Box::new(unspan(base)),
            index: Box::new(unspan(index)),
        },
        ExprKind::Call { func, args } => ExprKind::Call {
            func: func.clone(),
            args: args.iter().map(unspan).collect(),
        },
        ExprKind::MethodCall { name, args } => ExprKind::MethodCall {
            name: name.clone(),
            args: args.iter().map(unspan).collect(),
        },
        ExprKind::Binary { op, left, right } => ExprKind::Binary {
            op: *op,
            left: Box::new(unspan(left)),
            right: Box::new(unspan(right)),
        },
        ExprKind::Unary { op, operand } => ExprKind::Unary {
            op: *op,
            operand: Box::new(unspan(operand)),
        },
    };
    Spanned::synthetic(node)
}

fn parse_expr(text: &str) -> Expr {
    let tokens = Lexer::new(text).tokenize().unwrap();
    Parser::new(tokens).parse_expr().unwrap()
}

/// Reference classification for straight-line assignment sequences
fn model_deps(stmts: &[(String, Vec<String>)]) -> (Vec<String>, Vec<String>) {
    let mut inputs: Vec<String> = Vec::new();
    let mut outputs: Vec<String> = Vec::new();
    for (target, reads) in stmts {
        for read in reads {
            if !outputs.contains(read) && !inputs.contains(read) {
                inputs.push(read.clone());
            }
        }
        if !outputs.contains(target) {
            outputs.push(target.clone());
        }
    }
    (inputs, outputs)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn emitted_expressions_parse_back(expr in arb_expr(3)) {
        let text = GlslEmitter::new().emit_expr(&expr).unwrap();
        prop_assert_eq!(unspan(&parse_expr(&text)), unspan(&expr), "emitted: {}", text);
    }

    #[test]
    fn classification_matches_model(stmts in prop::collection::vec(arb_assignment(), 0..8)) {
        let deps = find_deps(&build_stage("stage", &stmts));
        let (inputs, outputs) = model_deps(&stmts);
        prop_assert_eq!(deps.inputs.into_iter().collect::<Vec<_>>(), inputs);
        prop_assert_eq!(deps.outputs.into_iter().collect::<Vec<_>>(), outputs);
    }

    #[test]
    fn linking_is_idempotent_and_complete(
        upstream in prop::collection::vec(arb_assignment(), 0..5),
        downstream in prop::collection::vec(arb_assignment(), 0..5),
    ) {
        let mut producer = Stage::from_function(build_stage("vert_shader", &upstream));
        let consumer = Stage::from_function(build_stage("frag_shader", &downstream));

        producer.link(&consumer);
        let once = producer.clone();
        producer.link(&consumer);
        prop_assert_eq!(&producer, &once);

        let provided = producer.analyze().outputs;
        for needed in consumer.analyze().inputs {
            prop_assert!(provided.contains(&needed), "`{}` was not forwarded", needed);
        }
    }

    #[test]
    fn reserved_names_are_never_prefixed(
        stmts in prop::collection::vec(arb_assignment(), 0..8),
        prefix in "[a-z]{1,3}_",
    ) {
        let mut stmts = stmts;
        stmts.push(("gl_position".to_string(), vec!["gl_vertex_id".to_string()]));

        let links = ExternalLinks::new()
            .with_uniform("a", GlslType::FLOAT)
            .with_frag_output("b", GlslType::vec(4));
        let options = CompileOptions::default();
        let stage = Stage::from_function(build_stage("frag_shader", &stmts))
            .with_input_prefix(prefix.clone());

        let loads = stage.load_names(&links, &options);
        let stores = stage.store_names(&links, &options);
        for reserved in ["a", "b", "gl_position", "gl_vertex_id"] {
            prop_assert!(!loads.contains_key(reserved));
            prop_assert!(!stores.contains_key(reserved));
        }
        for (name, renamed) in &loads {
            prop_assert_eq!(renamed, &format!("{}{}", prefix, name));
        }
    }

    #[test]
    fn compilation_is_deterministic(stmts in prop::collection::vec(arb_assignment(), 0..8)) {
        let links = ExternalLinks::new().with_uniform("c", GlslType::FLOAT);
        let library = FunctionLibrary::new();
        let options = CompileOptions::default();

        let first = Stage::from_function(build_stage("frag_shader", &stmts));
        let second = first.clone();
        prop_assert_eq!(
            first.compile(&links, &library, &options).unwrap(),
            second.compile(&links, &library, &options).unwrap()
        );
    }
}

#[test]
fn literal_leaves_print_as_glsl() {
    let emitter = GlslEmitter::new();
    let lit = |l| Spanned::synthetic(ExprKind::Lit(l));
    assert_eq!(emitter.emit_expr(&lit(Literal::Float(2.0))).unwrap(), "2.0");
    assert_eq!(emitter.emit_expr(&lit(Literal::Bool(true))).unwrap(), "true");
}
