//! Black-box scenarios straight out of the seed suite: each one builds the
//! syntax tree a parser would have produced for the corresponding snippet
//! and checks the result `Engine::run` returns, exactly as a fixture file
//! feeding `boa`'s `run_test_actions` would, minus the parser.

use std::rc::Rc;

use sandjs::ast::{AssignOp, BinOp, DeclKind, Node, Param, UnaryOp};
use sandjs::value::{to_js_string, to_number, ValueExt};
use sandjs::{Engine, HostConfig};

fn no_params() -> Rc<Vec<Param>> {
    Rc::new(vec![])
}

fn param(name: &str) -> Param {
    Param { name: name.to_string(), default: None, rest: false }
}

fn ident(name: &str) -> Node {
    Node::Identifier(name.to_string())
}

fn run(program: Vec<Node>) -> sandjs::JsResult<sandjs::value::Value> {
    Engine::new(HostConfig::default()).run(&program)
}

/// 1. Hoisting & closure.
/// `var r; function f(){ return function(){ return x; }; } var x = 7; r = f()(); r`
#[test]
fn hoisting_and_closure() {
    let inner = Node::FunctionExpr {
        name: None,
        params: no_params(),
        body: Rc::new(vec![Node::Return(Some(Box::new(ident("x"))))]),
    };
    let program = vec![
        Node::VarDecl(vec![("r".to_string(), None)]),
        Node::FunctionDecl {
            name: "f".to_string(),
            params: no_params(),
            body: Rc::new(vec![Node::Return(Some(Box::new(inner)))]),
        },
        Node::VarDecl(vec![("x".to_string(), Some(Node::NumberLiteral(7.0)))]),
        Node::ExpressionStatement(Box::new(Node::Assign(
            AssignOp::Assign,
            Box::new(ident("r")),
            Box::new(Node::Call(
                Box::new(Node::Call(Box::new(ident("f")), vec![])),
                vec![],
            )),
        ))),
        Node::ExpressionStatement(Box::new(ident("r"))),
    ];
    let result = run(program).unwrap();
    assert_eq!(to_number(&result), 7.0);
}

/// 2. Constructor & prototype chain.
/// `function P(a){ this.a = a; } P.prototype.m = function(){ return this.a + 1; };
///  var p = new P(41); [p.a, p.m(), p instanceof P]`
#[test]
fn constructor_and_prototype_chain() {
    let ctor_body = vec![Node::ExpressionStatement(Box::new(Node::Assign(
        AssignOp::Assign,
        Box::new(Node::GetField(Box::new(Node::This), "a".to_string())),
        Box::new(ident("a")),
    )))];
    let method = Node::FunctionExpr {
        name: None,
        params: no_params(),
        body: Rc::new(vec![Node::Return(Some(Box::new(Node::BinOp(
            BinOp::Add,
            Box::new(Node::GetField(Box::new(Node::This), "a".to_string())),
            Box::new(Node::NumberLiteral(1.0)),
        ))))]),
    };
    let program = vec![
        Node::FunctionDecl { name: "P".to_string(), params: Rc::new(vec![param("a")]), body: Rc::new(ctor_body) },
        Node::ExpressionStatement(Box::new(Node::Assign(
            AssignOp::Assign,
            Box::new(Node::GetField(
                Box::new(Node::GetField(Box::new(ident("P")), "prototype".to_string())),
                "m".to_string(),
            )),
            Box::new(method),
        ))),
        Node::VarDecl(vec![(
            "p".to_string(),
            Some(Node::New(Box::new(ident("P")), vec![Node::NumberLiteral(41.0)])),
        )]),
        Node::ExpressionStatement(Box::new(Node::ArrayLiteral(vec![
            Node::GetField(Box::new(ident("p")), "a".to_string()),
            Node::Call(Box::new(Node::GetField(Box::new(ident("p")), "m".to_string())), vec![]),
            Node::BinOp(BinOp::InstanceOf, Box::new(ident("p")), Box::new(ident("P"))),
        ]))),
    ];
    let result = run(program).unwrap();
    let obj = result.as_object().unwrap().borrow();
    assert_eq!(to_number(&obj.get_own("0").unwrap()), 41.0);
    assert_eq!(to_number(&obj.get_own("1").unwrap()), 42.0);
    assert_eq!(to_js_string(&obj.get_own("2").unwrap()), "true");
}

/// 3. Try/catch/finally with throw.
/// `var log = []; try { log.push('a'); throw 'boom'; } catch(e){ log.push(e); } finally { log.push('f'); } log.join(',')`
#[test]
fn try_catch_finally() {
    let push = |what: Node| {
        Node::ExpressionStatement(Box::new(Node::Call(
            Box::new(Node::GetField(Box::new(ident("log")), "push".to_string())),
            vec![what],
        )))
    };
    let program = vec![
        Node::VarDecl(vec![("log".to_string(), Some(Node::ArrayLiteral(vec![])))]),
        Node::Try {
            block: vec![push(Node::StringLiteral("a".to_string())), Node::Throw(Box::new(Node::StringLiteral("boom".to_string())))],
            catch_param: Some("e".to_string()),
            catch_block: Some(vec![push(ident("e"))]),
            finally_block: Some(vec![push(Node::StringLiteral("f".to_string()))]),
        },
        Node::ExpressionStatement(Box::new(Node::Call(
            Box::new(Node::GetField(Box::new(ident("log")), "join".to_string())),
            vec![Node::StringLiteral(",".to_string())],
        ))),
    ];
    let result = run(program).unwrap();
    assert_eq!(to_js_string(&result), "a,boom,f");
}

/// 4. Array methods.
/// `[1,2,3,4].filter(function(x){return x%2;}).map(function(x){return x*10;}).reduce(function(a,b){return a+b;},0)`
#[test]
fn array_methods_chain() {
    let filter_fn = Node::FunctionExpr {
        name: None,
        params: Rc::new(vec![param("x")]),
        body: Rc::new(vec![Node::Return(Some(Box::new(Node::BinOp(
            BinOp::Mod,
            Box::new(ident("x")),
            Box::new(Node::NumberLiteral(2.0)),
        ))))]),
    };
    let map_fn = Node::FunctionExpr {
        name: None,
        params: Rc::new(vec![param("x")]),
        body: Rc::new(vec![Node::Return(Some(Box::new(Node::BinOp(
            BinOp::Mul,
            Box::new(ident("x")),
            Box::new(Node::NumberLiteral(10.0)),
        ))))]),
    };
    let reduce_fn = Node::FunctionExpr {
        name: None,
        params: Rc::new(vec![param("a"), param("b")]),
        body: Rc::new(vec![Node::Return(Some(Box::new(Node::BinOp(
            BinOp::Add,
            Box::new(ident("a")),
            Box::new(ident("b")),
        ))))]),
    };
    let array = Node::ArrayLiteral(vec![
        Node::NumberLiteral(1.0),
        Node::NumberLiteral(2.0),
        Node::NumberLiteral(3.0),
        Node::NumberLiteral(4.0),
    ]);
    let filtered = Node::Call(Box::new(Node::GetField(Box::new(array), "filter".to_string())), vec![filter_fn]);
    let mapped = Node::Call(Box::new(Node::GetField(Box::new(filtered), "map".to_string())), vec![map_fn]);
    let reduced = Node::Call(
        Box::new(Node::GetField(Box::new(mapped), "reduce".to_string())),
        vec![reduce_fn, Node::NumberLiteral(0.0)],
    );
    let program = vec![Node::ExpressionStatement(Box::new(reduced))];
    let result = run(program).unwrap();
    assert_eq!(to_number(&result), 40.0);
}

/// 5. Bitwise 32-bit semantics.
/// `[1 << 31, (1 << 31) >> 0, (1 << 31) >>> 0, 0xffffffff ^ 0]`
#[test]
fn bitwise_32bit_semantics() {
    let shl = Node::BinOp(BinOp::Shl, Box::new(Node::NumberLiteral(1.0)), Box::new(Node::NumberLiteral(31.0)));
    let shr = Node::BinOp(BinOp::Shr, Box::new(shl.clone()), Box::new(Node::NumberLiteral(0.0)));
    let ushr = Node::BinOp(BinOp::UShr, Box::new(shl.clone()), Box::new(Node::NumberLiteral(0.0)));
    let xor = Node::BinOp(BinOp::BitXor, Box::new(Node::NumberLiteral(4294967295.0)), Box::new(Node::NumberLiteral(0.0)));
    let program = vec![Node::ExpressionStatement(Box::new(Node::ArrayLiteral(vec![shl, shr, ushr, xor])))];
    let result = run(program).unwrap();
    let obj = result.as_object().unwrap().borrow();
    assert_eq!(to_number(&obj.get_own("0").unwrap()), -2147483648.0);
    assert_eq!(to_number(&obj.get_own("1").unwrap()), -2147483648.0);
    assert_eq!(to_number(&obj.get_own("2").unwrap()), 2147483648.0);
    assert_eq!(to_number(&obj.get_own("3").unwrap()), -1.0);
}

/// 6. Façade probes against a seed URL `https://example.com/foo`.
/// `[typeof window, window === globalThis, typeof navigator.userAgent, navigator.webdriver, location.protocol]`
#[test]
fn facade_probes() {
    let config = HostConfig { domain: "https://example.com/foo".to_string(), ..HostConfig::default() };
    let program = vec![Node::ExpressionStatement(Box::new(Node::ArrayLiteral(vec![
        Node::UnaryOp(UnaryOp::TypeOf, Box::new(ident("window"))),
        Node::BinOp(BinOp::StrictEq, Box::new(ident("window")), Box::new(ident("globalThis"))),
        Node::UnaryOp(
            UnaryOp::TypeOf,
            Box::new(Node::GetField(Box::new(ident("navigator")), "userAgent".to_string())),
        ),
        Node::GetField(Box::new(ident("navigator")), "webdriver".to_string()),
        Node::GetField(Box::new(ident("location")), "protocol".to_string()),
    ])))];
    let result = Engine::new(config).run(&program).unwrap();
    let obj = result.as_object().unwrap().borrow();
    assert_eq!(to_js_string(&obj.get_own("0").unwrap()), "object");
    assert_eq!(to_js_string(&obj.get_own("1").unwrap()), "true");
    assert_eq!(to_js_string(&obj.get_own("2").unwrap()), "string");
    assert_eq!(to_js_string(&obj.get_own("3").unwrap()), "false");
    assert_eq!(to_js_string(&obj.get_own("4").unwrap()), "https:");
}

/// §8 invariant: `(function(){ return typeof g; function g(){} })() === "function"`.
#[test]
fn function_hoisting_before_any_statement() {
    let iife_body = vec![
        Node::Return(Some(Box::new(Node::UnaryOp(UnaryOp::TypeOf, Box::new(ident("g")))))),
        Node::FunctionDecl { name: "g".to_string(), params: no_params(), body: Rc::new(vec![]) },
    ];
    let iife = Node::Call(
        Box::new(Node::FunctionExpr { name: None, params: no_params(), body: Rc::new(iife_body) }),
        vec![],
    );
    let program = vec![Node::ExpressionStatement(Box::new(iife))];
    let result = run(program).unwrap();
    assert_eq!(to_js_string(&result), "function");
}

/// §8 invariant: `f.prototype.constructor === f` for a user-defined callable.
#[test]
fn constructor_backreference_invariant() {
    let program = vec![
        Node::FunctionDecl { name: "F".to_string(), params: no_params(), body: Rc::new(vec![]) },
        Node::ExpressionStatement(Box::new(Node::BinOp(
            BinOp::StrictEq,
            Box::new(Node::GetField(
                Box::new(Node::GetField(Box::new(ident("F")), "prototype".to_string())),
                "constructor".to_string(),
            )),
            Box::new(ident("F")),
        ))),
    ];
    let result = run(program).unwrap();
    assert_eq!(to_js_string(&result), "true");
}

/// §8 round-trip: `atob(btoa(s)) === s` for ASCII `s`.
#[test]
fn atob_btoa_roundtrip() {
    let program = vec![Node::ExpressionStatement(Box::new(Node::Call(
        Box::new(ident("atob")),
        vec![Node::Call(Box::new(ident("btoa")), vec![Node::StringLiteral("hello, sandjs!".to_string())])],
    )))];
    let result = run(program).unwrap();
    assert_eq!(to_js_string(&result), "hello, sandjs!");
}

/// §8 round-trip: `decodeURIComponent(encodeURIComponent(s)) === s`.
#[test]
fn uri_component_roundtrip() {
    let program = vec![Node::ExpressionStatement(Box::new(Node::Call(
        Box::new(ident("decodeURIComponent")),
        vec![Node::Call(
            Box::new(ident("encodeURIComponent")),
            vec![Node::StringLiteral("a b/c?d=e&f#g".to_string())],
        )],
    )))];
    let result = run(program).unwrap();
    assert_eq!(to_js_string(&result), "a b/c?d=e&f#g");
}

/// §8 invariant: `JSON.parse(JSON.stringify(x)) ≡ x` for a nested record/list.
#[test]
fn json_roundtrip() {
    let value = Node::ObjectLiteral(vec![
        sandjs::ast::PropertyDef::KeyValue(sandjs::ast::PropKey::Ident("a".to_string()), Node::NumberLiteral(1.0)),
        sandjs::ast::PropertyDef::KeyValue(
            sandjs::ast::PropKey::Ident("b".to_string()),
            Node::ArrayLiteral(vec![Node::NumberLiteral(1.0), Node::BooleanLiteral(true), Node::Null]),
        ),
    ]);
    let stringified = Node::Call(
        Box::new(Node::GetField(Box::new(ident("JSON")), "stringify".to_string())),
        vec![value],
    );
    let parsed = Node::Call(
        Box::new(Node::GetField(Box::new(ident("JSON")), "parse".to_string())),
        vec![stringified],
    );
    let program = vec![Node::ExpressionStatement(Box::new(parsed))];
    let result = run(program).unwrap();
    let obj = result.as_object().unwrap().borrow();
    assert_eq!(to_number(&obj.get_own("a").unwrap()), 1.0);
    let list = obj.get_own("b").unwrap();
    let list_obj = list.as_object().unwrap().borrow();
    assert_eq!(to_number(&list_obj.get_own("0").unwrap()), 1.0);
    assert_eq!(to_js_string(&list_obj.get_own("1").unwrap()), "true");
}

/// §8: switch compares the discriminant via strict equality (the bug fix
/// relative to the interpreter this spec was distilled from).
#[test]
fn switch_compares_discriminant_not_context() {
    let program = vec![
        Node::VarDecl(vec![("x".to_string(), Some(Node::NumberLiteral(2.0)))]),
        Node::VarDecl(vec![("out".to_string(), Some(Node::StringLiteral(String::new())))]),
        Node::Switch {
            discriminant: Box::new(ident("x")),
            cases: vec![
                (
                    Some(Node::NumberLiteral(1.0)),
                    vec![
                        Node::ExpressionStatement(Box::new(Node::Assign(
                            AssignOp::Assign,
                            Box::new(ident("out")),
                            Box::new(Node::StringLiteral("one".to_string())),
                        ))),
                        Node::Break(None),
                    ],
                ),
                (
                    Some(Node::NumberLiteral(2.0)),
                    vec![
                        Node::ExpressionStatement(Box::new(Node::Assign(
                            AssignOp::Assign,
                            Box::new(ident("out")),
                            Box::new(Node::StringLiteral("two".to_string())),
                        ))),
                        Node::Break(None),
                    ],
                ),
            ],
        },
        Node::ExpressionStatement(Box::new(ident("out"))),
    ];
    let result = run(program).unwrap();
    assert_eq!(to_js_string(&result), "two");
}

/// §8: `for-in` iterates own keys of a record in insertion order.
#[test]
fn for_in_iterates_own_keys() {
    let obj_lit = Node::ObjectLiteral(vec![
        sandjs::ast::PropertyDef::KeyValue(sandjs::ast::PropKey::Ident("x".to_string()), Node::NumberLiteral(1.0)),
        sandjs::ast::PropertyDef::KeyValue(sandjs::ast::PropKey::Ident("y".to_string()), Node::NumberLiteral(2.0)),
    ]);
    let program = vec![
        Node::VarDecl(vec![("o".to_string(), Some(obj_lit))]),
        Node::VarDecl(vec![("keys".to_string(), Some(Node::ArrayLiteral(vec![])))]),
        Node::ForIn {
            decl_kind: Some(DeclKind::Var),
            binding: "k".to_string(),
            object: Box::new(ident("o")),
            body: Box::new(Node::ExpressionStatement(Box::new(Node::Call(
                Box::new(Node::GetField(Box::new(ident("keys")), "push".to_string())),
                vec![ident("k")],
            )))),
        },
        Node::ExpressionStatement(Box::new(Node::Call(
            Box::new(Node::GetField(Box::new(ident("keys")), "join".to_string())),
            vec![Node::StringLiteral(",".to_string())],
        ))),
    ];
    let result = run(program).unwrap();
    assert_eq!(to_js_string(&result), "x,y");
}

/// §8: unsigned typed-array wraparound — `a[i] = v` then `a[i] === v mod 2^W`.
#[test]
fn unsigned_byte_array_wraps_modulo_width() {
    let ctor = Node::GetField(Box::new(ident("window")), "Uint8Array".to_string());
    let array = Node::New(Box::new(ctor), vec![Node::NumberLiteral(4.0)]);
    let program = vec![
        Node::VarDecl(vec![("a".to_string(), Some(array))]),
        Node::ExpressionStatement(Box::new(Node::Assign(
            AssignOp::Assign,
            Box::new(Node::GetComputedField(Box::new(ident("a")), Box::new(Node::NumberLiteral(0.0)))),
            Box::new(Node::NumberLiteral(257.0)),
        ))),
        Node::ExpressionStatement(Box::new(Node::GetComputedField(
            Box::new(ident("a")),
            Box::new(Node::NumberLiteral(0.0)),
        ))),
    ];
    let result = run(program).unwrap();
    assert_eq!(to_number(&result), 1.0);
}
