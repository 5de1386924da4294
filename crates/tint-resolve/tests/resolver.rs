//! Integration tests: resolving small programs built with the builder DSL.

use tint_ir::*;
use tint_resolve::{ResolverOptions, resolve, resolve_program, resolve_with_options};

fn vertex() -> Vec<FunctionDecoration> {
    vec![FunctionDecoration::Stage(PipelineStage::Vertex)]
}

fn fragment() -> Vec<FunctionDecoration> {
    vec![FunctionDecoration::Stage(PipelineStage::Fragment)]
}

/// `name = value;` for a global or local `f32` variable.
fn store(b: &mut ProgramBuilder, name: &str, value: f32) -> Handle<Statement> {
    let lhs = b.ident(name);
    let rhs = b.lit_f32(value);
    b.assign(lhs, rhs)
}

fn call(b: &mut ProgramBuilder, name: &str) -> Handle<Statement> {
    let call = b.call(name, vec![]);
    b.call_stmt(call)
}

fn errors(b: &ProgramBuilder) -> Vec<String> {
    b.diagnostics()
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.message.clone())
        .collect()
}

#[test]
fn references_propagate_through_calls() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let gx = b.global_var("gx", StorageClass::Private, f32_ty, None, vec![]);
    let gy = b.global_var("gy", StorageClass::Private, f32_ty, None, vec![]);
    let gz = b.global_var("gz", StorageClass::Private, f32_ty, None, vec![]);

    let s = store(&mut b, "gz", 1.0);
    let c = b.function("c", vec![], void, vec![s], vec![]);
    let s1 = store(&mut b, "gy", 2.0);
    let s2 = call(&mut b, "c");
    let fb = b.function("b", vec![], void, vec![s1, s2], vec![]);
    let s1 = store(&mut b, "gx", 3.0);
    let s2 = call(&mut b, "b");
    let a = b.function("a", vec![], void, vec![s1, s2], vertex());

    assert!(resolve(&mut b), "{}", b.diagnostics());
    assert!(b.is_resolved());

    let a_sem = &b.func(a).sem;
    let local: Vec<_> = a_sem.local_referenced_module_variables.iter().copied().collect();
    let all: Vec<_> = a_sem.referenced_module_variables.iter().copied().collect();
    assert_eq!(local, vec![gx]);
    assert_eq!(all, vec![gx, gy, gz]);
    assert_eq!(a_sem.callees.iter().copied().collect::<Vec<_>>(), vec![fb]);

    let a_sym = b.func(a).symbol;
    assert!(b.func(fb).has_ancestor_entry_point(a_sym));
    assert!(b.func(c).has_ancestor_entry_point(a_sym));
    assert!(b.func(a).sem.ancestor_entry_points.is_empty());
    let c_all: Vec<_> = b.func(c).sem.referenced_module_variables.iter().copied().collect();
    assert_eq!(c_all, vec![gz]);
}

#[test]
fn shared_helper_lists_each_entry_point_once() {
    let mut b = ProgramBuilder::new();
    let void = b.types_mut().void();
    let helper = b.function("helper", vec![], void, vec![], vec![]);
    let s1 = call(&mut b, "helper");
    let s2 = call(&mut b, "helper");
    let ep1 = b.function("ep1", vec![], void, vec![s1, s2], vertex());
    let s1 = call(&mut b, "helper");
    let s2 = call(&mut b, "helper");
    let ep2 = b.function("ep2", vec![], void, vec![s1, s2], fragment());

    assert!(resolve(&mut b), "{}", b.diagnostics());
    let ancestors: Vec<_> = b.func(helper).sem.ancestor_entry_points.iter().copied().collect();
    assert_eq!(ancestors, vec![b.func(ep1).symbol, b.func(ep2).symbol]);
    assert_eq!(b.func(ep1).sem.callees.len(), 1);
}

fn switch_program(default_last: bool) -> ProgramBuilder {
    let mut b = ProgramBuilder::new();
    let void = b.types_mut().void();
    let i32_ty = b.types_mut().i32();
    let one = b.lit_i32(1);
    let x = b.local_var("x", i32_ty, Some(one));
    let decl = b.decl(x);
    let cond = b.ident("x");
    let brk = b.break_();
    let one = b.case(vec![Literal::Sint(1)], vec![brk]);
    let two = b.case(vec![Literal::Sint(2)], vec![]);
    let default = b.default_case(vec![]);
    let cases = if default_last {
        vec![one, two, default]
    } else {
        vec![one, default, two]
    };
    let sw = b.switch(cond, cases);
    b.function("main", vec![], void, vec![decl, sw], fragment());
    b
}

#[test]
fn switch_with_default_last() {
    let mut b = switch_program(true);
    assert!(resolve(&mut b), "{}", b.diagnostics());
}

#[test]
fn switch_default_must_be_last() {
    let mut b = switch_program(false);
    assert!(!resolve(&mut b));
    assert!(!b.is_resolved());
    assert!(b.diagnostics().contains_message("switch statement default case must be last"));
}

#[test]
fn switch_selector_rules() {
    let mut b = ProgramBuilder::new();
    let void = b.types_mut().void();
    let cond = b.lit_u32(3);
    let c1 = b.case(vec![Literal::Uint(1), Literal::Uint(2)], vec![]);
    let c2 = b.case(vec![Literal::Uint(2)], vec![]);
    let c3 = b.case(vec![Literal::Sint(4)], vec![]);
    let ft = b.fallthrough();
    let c4 = b.case(vec![Literal::Uint(5)], vec![ft]);
    let sw = b.switch(cond, vec![c1, c2, c3, c4]);
    b.function("main", vec![], void, vec![sw], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(
        errors(&b),
        vec![
            "a literal value must not appear more than once in the case selectors for a switch statement: '2u'",
            "the case selector values must have the same type as the selector expression",
            "a fallthrough statement must not appear as the last statement in last clause of a switch",
        ]
    );
}

#[test]
fn recursion_is_detected() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let g = b.global_var("g", StorageClass::Private, f32_ty, None, vec![]);
    let s = call(&mut b, "b");
    let fa = b.function("a", vec![], void, vec![s], vec![]);
    let s1 = store(&mut b, "g", 1.0);
    let s2 = call(&mut b, "a");
    let fb = b.function("b", vec![], void, vec![s1, s2], vec![]);
    let s = call(&mut b, "a");
    let main = b.function("main", vec![], void, vec![s], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(errors(&b), vec!["recursion is not allowed: 'a' -> 'b' -> 'a'"]);

    // Propagation still finishes over the acyclic part of the graph.
    let main_sym = b.func(main).symbol;
    assert!(b.func(fa).has_ancestor_entry_point(main_sym));
    assert!(b.func(fb).has_ancestor_entry_point(main_sym));
    assert!(b.func(main).sem.referenced_module_variables.contains(&g));
}

fn unreachable_program() -> ProgramBuilder {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    b.global_var("g", StorageClass::Private, f32_ty, None, vec![]);
    let ret = b.ret(None);
    let s1 = store(&mut b, "g", 1.0);
    let s2 = store(&mut b, "g", 2.0);
    b.function("main", vec![], void, vec![ret, s1, s2], fragment());
    b
}

#[test]
fn unreachable_code_warns_by_default() {
    let mut b = unreachable_program();
    assert!(resolve(&mut b), "{}", b.diagnostics());
    let warnings: Vec<_> = b
        .diagnostics()
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "code is unreachable");
}

#[test]
fn unreachable_code_as_error() {
    let mut b = unreachable_program();
    let options = ResolverOptions {
        unreachable_is_error: true,
    };
    assert!(!resolve_with_options(&mut b, options));
    assert_eq!(errors(&b), vec!["code is unreachable"]);
}

#[test]
fn undeclared_identifier_does_not_cascade() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let nope = b.ident("nope");
    let one = b.lit_f32(1.0);
    let sum = b.add(nope, one);
    let y = b.local_var("y", f32_ty, Some(sum));
    let decl = b.decl(y);
    b.function("main", vec![], void, vec![decl], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(errors(&b), vec!["identifier must be declared before use: nope"]);
    assert!(b.types().is_invalid(b.expr(sum).result_type.unwrap()));
}

#[test]
fn variables_are_references_and_constants_are_values() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    b.global_var("g", StorageClass::Private, f32_ty, None, vec![]);
    let init = b.lit_f32(2.0);
    b.global_const("k", f32_ty, init);
    let g_ref = b.ident("g");
    let k_ref = b.ident("k");
    let s = b.assign(g_ref, k_ref);
    b.function("main", vec![], void, vec![s], fragment());

    assert!(resolve(&mut b), "{}", b.diagnostics());
    let g_ty = b.expr(g_ref).result_type.unwrap();
    assert_eq!(
        b.types()[g_ty],
        Type::Pointer {
            pointee: f32_ty,
            storage_class: StorageClass::Private
        }
    );
    assert_eq!(b.expr(k_ref).result_type, Some(f32_ty));
}

#[test]
fn assignment_errors() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let init = b.lit_f32(2.0);
    b.global_const("k", f32_ty, init);
    b.global_var("g", StorageClass::Private, f32_ty, None, vec![]);
    let s1 = store(&mut b, "k", 1.0);
    let lhs = b.ident("g");
    let rhs = b.lit_i32(1);
    let s2 = b.assign(lhs, rhs);
    let lhs = b.lit_f32(1.0);
    let rhs = b.lit_f32(1.0);
    let s3 = b.assign(lhs, rhs);
    let init = b.lit_i32(1);
    let x = b.local_var("x", f32_ty, Some(init));
    let s4 = b.decl(x);
    b.function("main", vec![], void, vec![s1, s2, s3, s4], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(
        errors(&b),
        vec![
            "cannot assign to const 'k'",
            "invalid assignment: can't assign value of type 'i32' to 'f32'",
            "invalid assignment: left-hand side does not reference storage, found 'f32'",
            "variable 'x' of type 'f32' cannot be initialized with a value of type 'i32'",
        ]
    );
}

#[test]
fn member_access_and_swizzles() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let vec4 = b.types_mut().vec(VectorSize::Quad, f32_ty);
    let vec2 = b.types_mut().vec(VectorSize::Bi, f32_ty);
    let s = b.structure("Uniforms", vec![("v", vec4, 0)], true);
    b.global_var(
        "u",
        StorageClass::Uniform,
        s,
        None,
        vec![VariableDecoration::Group(0), VariableDecoration::Binding(0)],
    );
    let u = b.ident("u");
    let v = b.member(u, "v");
    let xy = b.member(v, "xy");
    let a = b.local_var("a", vec2, Some(xy));
    let decl_a = b.decl(a);
    let u2 = b.ident("u");
    let v2 = b.member(u2, "v");
    let w = b.member(v2, "w");
    let c = b.local_var("c", f32_ty, Some(w));
    let decl_c = b.decl(c);
    b.function("main", vec![], void, vec![decl_a, decl_c], fragment());

    assert!(resolve(&mut b), "{}", b.diagnostics());
    let v_ty = b.expr(v).result_type.unwrap();
    assert_eq!(
        b.types()[v_ty],
        Type::Pointer {
            pointee: vec4,
            storage_class: StorageClass::Uniform
        }
    );
    assert_eq!(b.expr(xy).result_type, Some(vec2));
    let referenced = b.func(b.module().functions[0]).referenced_uniform_variables(&b);
    assert_eq!(referenced.len(), 1);
}

#[test]
fn bad_swizzle_and_unknown_member() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let vec2 = b.types_mut().vec(VectorSize::Bi, f32_ty);
    let s = b.structure("S", vec![("v", vec2, 0)], false);
    b.global_var("p", StorageClass::Private, s, None, vec![]);
    let p = b.ident("p");
    let v = b.member(p, "v");
    let z = b.member(v, "z");
    let x = b.local_var("x", f32_ty, Some(z));
    let d1 = b.decl(x);
    let p = b.ident("p");
    let q = b.member(p, "q");
    let y = b.local_var("y", f32_ty, Some(q));
    let d2 = b.decl(y);
    b.function("main", vec![], void, vec![d1, d2], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(
        errors(&b),
        vec!["invalid vector swizzle member: z", "struct member q not found in 'S'"]
    );
}

#[test]
fn intrinsic_calls() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let vec3 = b.types_mut().vec(VectorSize::Tri, f32_ty);
    let zero = b.lit_f32(0.0);
    let v = b.construct(vec3, vec![zero]);
    let len = b.call("length", vec![v]);
    let l = b.local_var("l", f32_ty, Some(len));
    let d1 = b.decl(l);
    let flag = b.lit_bool(true);
    let bad = b.call("length", vec![flag]);
    let m = b.local_var("m", f32_ty, Some(bad));
    let d2 = b.decl(m);
    b.function("main", vec![], void, vec![d1, d2], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(b.expr(len).result_type, Some(f32_ty));
    assert_eq!(errors(&b), vec!["no matching call to length(bool)"]);
}

#[test]
fn function_calls_are_checked() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let x = b.param("x", f32_ty);
    let value = b.ident("x");
    let ret = b.ret(Some(value));
    b.function("square", vec![x], f32_ty, vec![ret], vec![]);

    let arg = b.lit_i32(1);
    let bad_type = b.call("square", vec![arg]);
    let s1 = b.call_stmt(bad_type);
    let no_args = b.call("square", vec![]);
    let s2 = b.call_stmt(no_args);
    let s3 = call(&mut b, "missing");
    let s4 = call(&mut b, "main");
    b.function("main", vec![], void, vec![s1, s2, s3, s4], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(
        errors(&b),
        vec![
            "type mismatch for argument 0 in call to 'square', expected 'f32', got 'i32'",
            "too few arguments in call to 'square', expected 1, got 0",
            "unable to find called function: missing",
            "entry point 'main' cannot be called",
        ]
    );
    assert_eq!(b.expr(bad_type).result_type, Some(f32_ty));
}

#[test]
fn control_flow_rules() {
    let mut b = ProgramBuilder::new();
    let void = b.types_mut().void();
    let brk = b.break_();
    let cont = b.continue_();
    let inner_cont = b.continue_();
    let brk_in_loop = b.break_();
    let lp = b.loop_(vec![brk_in_loop], Some(vec![inner_cont]));
    let cond = b.lit_i32(1);
    let iff = b.if_(cond, vec![], vec![]);
    b.function("main", vec![], void, vec![brk, cont, lp, iff], fragment());

    let options = ResolverOptions::default();
    assert!(!resolve_with_options(&mut b, options));
    assert_eq!(
        errors(&b),
        vec![
            "break statement must be in a loop or switch case",
            "continue statement must be in a loop",
            "continue statement must not be in a continuing block",
            "if statement condition must be bool, found 'i32'",
        ]
    );
}

#[test]
fn function_level_rules() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    b.function("no_return", vec![], f32_ty, vec![], vec![]);
    let value = b.lit_f32(1.0);
    let ret = b.ret(Some(value));
    b.function("ep", vec![], f32_ty, vec![ret], vertex());
    b.function("ep", vec![], void, vec![], fragment());

    assert!(!resolve(&mut b));
    assert_eq!(
        errors(&b),
        vec![
            "redeclared identifier 'ep'",
            "non-void function 'no_return' must end with a return statement",
            "entry point 'ep' must return void",
        ]
    );
}

#[test]
fn module_variable_rules() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let rt = b.types_mut().array(f32_ty, ArraySize::Runtime, Some(4));
    let sampler = b.types_mut().sampler(SamplerKind::Sampler);
    b.global_var("a", StorageClass::None, f32_ty, None, vec![]);
    b.global_var("s", StorageClass::Uniform, sampler, None, vec![]);
    b.global_var("a", StorageClass::Private, f32_ty, None, vec![]);
    b.global_var("ok", StorageClass::Storage, rt, None, vec![]);

    assert!(!resolve(&mut b));
    assert_eq!(
        errors(&b),
        vec![
            "module-scope variable 'a' must have a storage class",
            "variable 's' in uniform storage must have a host-shareable type, found 'sampler'",
            "redeclared identifier 'a'",
        ]
    );
}

#[test]
fn resolving_again_is_idempotent() {
    let mut b = switch_program(true);
    assert!(resolve(&mut b));
    let program = resolve_program(b.build());
    assert!(program.is_resolved());
    assert!(program.is_valid());
    assert_eq!(program.diagnostics().len(), 0);

    let mut b = unreachable_program();
    assert!(resolve(&mut b));
    assert_eq!(b.diagnostics().len(), 1);
    let program = resolve_program(resolve_program(b.build()));
    assert!(program.is_resolved());
    assert_eq!(program.diagnostics().len(), 1);
    assert!(program.diagnostics().contains_message("code is unreachable"));
}

#[test]
fn resolving_again_keeps_earlier_errors_once() {
    let mut b = switch_program(false);
    b.diagnostics_mut().add_error("unexpected token", Source::default());
    assert!(!resolve(&mut b));
    assert!(!resolve(&mut b));
    assert_eq!(
        errors(&b),
        vec!["unexpected token", "switch statement default case must be last"]
    );
}

#[test]
fn earlier_errors_block_resolution() {
    let mut b = switch_program(true);
    b.diagnostics_mut().add_error("unexpected token", Source::default());
    assert!(!resolve(&mut b));
    assert!(!b.is_resolved());
    assert_eq!(errors(&b), vec!["unexpected token"]);
}

#[test]
fn shared_identifier_counts_for_every_function() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let g = b.global_var("g", StorageClass::Private, f32_ty, None, vec![]);
    let target = b.ident("g");
    let one = b.lit_f32(1.0);
    let two = b.lit_f32(2.0);
    let s1 = b.assign(target, one);
    let s2 = b.assign(target, two);
    let f1 = b.function("f1", vec![], void, vec![s1], vec![]);
    let f2 = b.function("f2", vec![], void, vec![s2], vec![]);

    assert!(resolve(&mut b), "{}", b.diagnostics());
    for f in [f1, f2] {
        let local = &b.func(f).sem.local_referenced_module_variables;
        assert_eq!(local.iter().copied().collect::<Vec<_>>(), vec![g]);
    }
}

#[test]
fn shared_call_gives_ancestry_to_both_entry_points() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    let g = b.global_var("g", StorageClass::Private, f32_ty, None, vec![]);
    let s = store(&mut b, "g", 1.0);
    let helper = b.function("helper", vec![], void, vec![s], vec![]);
    let shared = b.call("helper", vec![]);
    let s1 = b.call_stmt(shared);
    let s2 = b.call_stmt(shared);
    let ep1 = b.function("ep1", vec![], void, vec![s1], vertex());
    let ep2 = b.function("ep2", vec![], void, vec![s2], fragment());

    assert!(resolve(&mut b), "{}", b.diagnostics());
    let ancestors: Vec<_> = b.func(helper).sem.ancestor_entry_points.iter().copied().collect();
    assert_eq!(ancestors, vec![b.func(ep1).symbol, b.func(ep2).symbol]);
    for ep in [ep1, ep2] {
        assert_eq!(b.func(ep).sem.callees.iter().copied().collect::<Vec<_>>(), vec![helper]);
        assert!(b.func(ep).sem.referenced_module_variables.contains(&g));
    }
}
