//! Integration test: AST debug dumps and structural validity.

use tint_ir::*;

#[test]
fn case_statement_to_str() {
    let mut b = ProgramBuilder::new();
    let brk = b.break_();
    let case = b.case(vec![Literal::Sint(1), Literal::Sint(2)], vec![brk]);
    let brk = b.break_();
    let default = b.default_case(vec![brk]);
    let program = b.build();

    assert_eq!(
        Node::Statement(case).to_str(&program, 0),
        "Case 1, 2{\n  Break{}\n}\n"
    );
    assert_eq!(
        Node::Statement(default).to_str(&program, 2),
        "  Default{\n    Break{}\n  }\n"
    );
}

#[test]
fn case_statement_default_and_validity() {
    let mut b = ProgramBuilder::new();
    let missing_body = b.create_stmt(StatementKind::Case(CaseStatement {
        selectors: vec![],
        body: None,
    }));
    let empty_body = b.default_case(vec![]);
    let program = b.build();

    let case = program.stmt(missing_body).as_case().unwrap();
    assert!(case.is_default());
    assert!(!Node::Statement(missing_body).is_valid(&program));
    assert_eq!(Node::Statement(missing_body).to_str(&program, 0), "Default{\n}\n");
    assert!(Node::Statement(empty_body).is_valid(&program));
}

#[test]
fn if_statement_to_str_with_else_arms() {
    let mut b = ProgramBuilder::new();
    let cond = b.ident("cond");
    let kill = b.discard();
    let ident = b.ident("ident");
    let else_if_kill = b.discard();
    let else_if = b.else_(Some(ident), vec![else_if_kill]);
    let else_kill = b.discard();
    let else_ = b.else_(None, vec![else_kill]);
    let stmt = b.if_(cond, vec![kill], vec![else_if, else_]);
    let program = b.build();

    assert!(Node::Statement(stmt).is_valid(&program));
    assert_eq!(
        Node::Statement(stmt).to_str(&program, 2),
        r"  If{
    (
      Identifier{cond}
    )
    {
      Discard{}
    }
  }
  Else{
    (
      Identifier{ident}
    )
    {
      Discard{}
    }
  }
  Else{
    {
      Discard{}
    }
  }
"
    );
}

#[test]
fn else_without_condition_must_be_last() {
    let mut b = ProgramBuilder::new();
    let cond = b.ident("cond");
    let first = b.else_(None, vec![]);
    let c2 = b.ident("other");
    let second = b.else_(Some(c2), vec![]);
    let stmt = b.if_(cond, vec![], vec![first, second]);
    let program = b.build();
    assert!(!Node::Statement(stmt).is_valid(&program));
}

#[test]
fn foreign_handles_are_invalid() {
    let mut other = ProgramBuilder::new();
    let foreign = other.ident("x");

    let mut b = ProgramBuilder::new();
    let ret = b.ret(Some(foreign));
    let program = b.build();
    assert!(!Node::Statement(ret).is_valid(&program));
    assert!(!Node::Expression(foreign).is_valid(&program));
}

#[test]
fn call_statement_requires_call_expression() {
    let mut b = ProgramBuilder::new();
    let not_a_call = b.ident("f");
    let bad = b.call_stmt(not_a_call);
    let call = b.call("f", vec![]);
    let good = b.call_stmt(call);
    let program = b.build();
    assert!(!Node::Statement(bad).is_valid(&program));
    assert!(Node::Statement(good).is_valid(&program));
}

#[test]
fn module_dump() {
    let mut b = ProgramBuilder::new();
    let f32_ty = b.types_mut().f32();
    let void = b.types_mut().void();
    b.structure("Uniforms", vec![("scale", f32_ty, 0)], true);
    b.global_var(
        "scale",
        StorageClass::Private,
        f32_ty,
        None,
        vec![],
    );
    let lhs = b.ident("scale");
    let rhs = b.lit_f32(2.0);
    let assign = b.assign(lhs, rhs);
    b.function(
        "main",
        vec![],
        void,
        vec![assign],
        vec![FunctionDecoration::Stage(PipelineStage::Fragment)],
    );
    let program = b.build();

    assert!(program.is_valid());
    assert_eq!(
        program.to_str(),
        r"Module{
  Struct Uniforms{
    [[block]]
    StructMember{[[ offset 0 ]] scale: f32}
  }
  Variable{
    scale
    private
    f32
  }
  Function main -> void
  StageDecoration{fragment}
  (
  )
  {
    Assignment{
      Identifier{scale}
      ScalarConstructor{2.0}
    }
  }
}
"
    );
}

#[test]
fn function_lookup() {
    let mut b = ProgramBuilder::new();
    let void = b.types_mut().void();
    let helper = b.function("helper", vec![], void, vec![], vec![]);
    let main = b.function(
        "main",
        vec![],
        void,
        vec![],
        vec![FunctionDecoration::Stage(PipelineStage::Vertex)],
    );
    let main_sym = b.sym("main");
    let program = b.build();

    assert_eq!(program.find_function(main_sym), Some(main));
    assert_eq!(
        program.find_function_in_stage(main_sym, PipelineStage::Vertex),
        Some(main)
    );
    assert_eq!(
        program.find_function_in_stage(main_sym, PipelineStage::Compute),
        None
    );
    assert!(program.has_stage(PipelineStage::Vertex));
    assert!(!program.has_stage(PipelineStage::Fragment));
    assert!(!program.func(helper).is_entry_point());
    assert_eq!(program.entry_points().collect::<Vec<_>>(), vec![main]);
    assert_eq!(program.func(main).workgroup_size(), (1, 1, 1));
}
