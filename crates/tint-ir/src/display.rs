//! Human-readable type names and the AST debug dump.
//!
//! The dump prints names through the symbol table and types by their
//! friendly spelling, never handle indices or resolved types, so a program
//! and its clone dump identically.

use crate::arena::Handle;
use crate::expr::{Expression, ExpressionKind};
use crate::func::Function;
use crate::program::Program;
use crate::stmt::{Statement, StatementKind};
use crate::types::{ArraySize, SamplerKind, TextureKind, Type};
use crate::variable::Variable;

/// Formats a type the way it would be spelled in shader source.
pub fn format_type(program: &Program, ty: Handle<Type>) -> String {
    let types = program.types();
    match &types[ty] {
        Type::Void => "void".into(),
        Type::Bool => "bool".into(),
        Type::I32 => "i32".into(),
        Type::U32 => "u32".into(),
        Type::F32 => "f32".into(),
        Type::Vector { size, elem } => {
            format!("vec{}<{}>", size.as_u32(), format_type(program, *elem))
        }
        Type::Matrix {
            columns,
            rows,
            elem,
        } => format!(
            "mat{}x{}<{}>",
            columns.as_u32(),
            rows.as_u32(),
            format_type(program, *elem)
        ),
        Type::Array { elem, size, stride } => {
            let elem = format_type(program, *elem);
            let base = match size {
                ArraySize::Sized(n) => format!("array<{elem}, {n}>"),
                ArraySize::Runtime => format!("array<{elem}>"),
            };
            match stride {
                Some(stride) => format!("[[stride({stride})]] {base}"),
                None => base,
            }
        }
        Type::Struct(s) => program.name_of(s.name).to_string(),
        Type::Alias { name, .. } => program.name_of(*name).to_string(),
        Type::Pointer {
            pointee,
            storage_class,
        } => format!("ptr<{storage_class}, {}>", format_type(program, *pointee)),
        Type::AccessControl { access, subtype } => {
            format!("[[access({access})]] {}", format_type(program, *subtype))
        }
        Type::Sampler(SamplerKind::Sampler) => "sampler".into(),
        Type::Sampler(SamplerKind::ComparisonSampler) => "sampler_comparison".into(),
        Type::Texture { dim, kind } => match kind {
            TextureKind::Sampled(t) => format!("texture_{dim}<{}>", format_type(program, *t)),
            TextureKind::Multisampled(t) => {
                format!("texture_multisampled_{dim}<{}>", format_type(program, *t))
            }
            TextureKind::Depth => format!("texture_depth_{dim}"),
            TextureKind::Storage { format, access } => {
                format!("[[access({access})]] texture_storage_{dim}<{format}>")
            }
        },
        Type::Invalid => "<invalid>".into(),
    }
}

pub(crate) fn write_expr(
    out: &mut String,
    program: &Program,
    handle: Handle<Expression>,
    indent: usize,
) {
    let pad = " ".repeat(indent);
    let name = |s| program.name_of(s);
    match &program.expr(handle).kind {
        ExpressionKind::Identifier(symbol) => {
            out.push_str(&format!("{pad}Identifier{{{}}}\n", name(*symbol)));
        }
        ExpressionKind::ScalarConstructor(lit) => {
            out.push_str(&format!("{pad}ScalarConstructor{{{lit}}}\n"));
        }
        ExpressionKind::TypeConstructor { ty, values } => {
            out.push_str(&format!("{pad}TypeConstructor{{\n"));
            out.push_str(&format!("{pad}  {}\n", format_type(program, *ty)));
            for &v in values {
                write_expr(out, program, v, indent + 2);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        ExpressionKind::Call { func, params } => {
            out.push_str(&format!("{pad}Call{{\n"));
            write_expr(out, program, *func, indent + 2);
            out.push_str(&format!("{pad}  (\n"));
            for &p in params {
                write_expr(out, program, p, indent + 4);
            }
            out.push_str(&format!("{pad}  )\n"));
            out.push_str(&format!("{pad}}}\n"));
        }
        ExpressionKind::MemberAccessor { structure, member } => {
            out.push_str(&format!("{pad}MemberAccessor{{\n"));
            write_expr(out, program, *structure, indent + 2);
            out.push_str(&format!("{pad}  Identifier{{{}}}\n", name(*member)));
            out.push_str(&format!("{pad}}}\n"));
        }
        ExpressionKind::ArrayAccessor { array, index } => {
            out.push_str(&format!("{pad}ArrayAccessor{{\n"));
            write_expr(out, program, *array, indent + 2);
            write_expr(out, program, *index, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
        }
        ExpressionKind::Binary { op, lhs, rhs } => {
            out.push_str(&format!("{pad}Binary{{\n"));
            write_expr(out, program, *lhs, indent + 2);
            out.push_str(&format!("{pad}  {op}\n"));
            write_expr(out, program, *rhs, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
        }
        ExpressionKind::Unary { op, expr } => {
            out.push_str(&format!("{pad}UnaryOp{{\n"));
            out.push_str(&format!("{pad}  {op}\n"));
            write_expr(out, program, *expr, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
        }
        ExpressionKind::Bitcast { ty, expr } => {
            out.push_str(&format!("{pad}Bitcast<{}>{{\n", format_type(program, *ty)));
            write_expr(out, program, *expr, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
        }
    }
}

/// Writes `{ ... }` around the statements of a body block.
fn write_body(out: &mut String, program: &Program, body: Handle<Statement>, indent: usize) {
    let pad = " ".repeat(indent);
    out.push_str(&format!("{pad}{{\n"));
    write_block_contents(out, program, body, indent + 2);
    out.push_str(&format!("{pad}}}\n"));
}

fn write_block_contents(
    out: &mut String,
    program: &Program,
    block: Handle<Statement>,
    indent: usize,
) {
    match &program.stmt(block).kind {
        StatementKind::Block(list) => {
            for &s in list {
                write_stmt(out, program, s, indent);
            }
        }
        _ => write_stmt(out, program, block, indent),
    }
}

pub(crate) fn write_stmt(
    out: &mut String,
    program: &Program,
    handle: Handle<Statement>,
    indent: usize,
) {
    let pad = " ".repeat(indent);
    match &program.stmt(handle).kind {
        StatementKind::Block(list) => {
            out.push_str(&format!("{pad}Block{{\n"));
            for &s in list {
                write_stmt(out, program, s, indent + 2);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Assignment { lhs, rhs } => {
            out.push_str(&format!("{pad}Assignment{{\n"));
            write_expr(out, program, *lhs, indent + 2);
            write_expr(out, program, *rhs, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Break => out.push_str(&format!("{pad}Break{{}}\n")),
        StatementKind::Continue => out.push_str(&format!("{pad}Continue{{}}\n")),
        StatementKind::Discard => out.push_str(&format!("{pad}Discard{{}}\n")),
        StatementKind::Fallthrough => out.push_str(&format!("{pad}Fallthrough{{}}\n")),
        StatementKind::Return { value } => match value {
            Some(v) => {
                out.push_str(&format!("{pad}Return{{\n"));
                write_expr(out, program, *v, indent + 2);
                out.push_str(&format!("{pad}}}\n"));
            }
            None => out.push_str(&format!("{pad}Return{{}}\n")),
        },
        StatementKind::If {
            condition,
            body,
            else_statements,
        } => {
            out.push_str(&format!("{pad}If{{\n"));
            out.push_str(&format!("{pad}  (\n"));
            write_expr(out, program, *condition, indent + 4);
            out.push_str(&format!("{pad}  )\n"));
            write_body(out, program, *body, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
            for &e in else_statements {
                write_stmt(out, program, e, indent);
            }
        }
        StatementKind::Else { condition, body } => {
            out.push_str(&format!("{pad}Else{{\n"));
            if let Some(c) = condition {
                out.push_str(&format!("{pad}  (\n"));
                write_expr(out, program, *c, indent + 4);
                out.push_str(&format!("{pad}  )\n"));
            }
            write_body(out, program, *body, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Loop { body, continuing } => {
            out.push_str(&format!("{pad}Loop{{\n"));
            write_block_contents(out, program, *body, indent + 2);
            if let Some(c) = continuing {
                out.push_str(&format!("{pad}  continuing {{\n"));
                write_block_contents(out, program, *c, indent + 4);
                out.push_str(&format!("{pad}  }}\n"));
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Switch { condition, cases } => {
            out.push_str(&format!("{pad}Switch{{\n"));
            write_expr(out, program, *condition, indent + 2);
            out.push_str(&format!("{pad}  {{\n"));
            for &c in cases {
                write_stmt(out, program, c, indent + 4);
            }
            out.push_str(&format!("{pad}  }}\n"));
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Case(case) => {
            if case.is_default() {
                out.push_str(&format!("{pad}Default{{\n"));
            } else {
                let selectors: Vec<String> = case.selectors.iter().map(|s| s.to_string()).collect();
                out.push_str(&format!("{pad}Case {}{{\n", selectors.join(", ")));
            }
            if let Some(body) = case.body {
                write_block_contents(out, program, body, indent + 2);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::VariableDecl(var) => {
            out.push_str(&format!("{pad}VariableDeclStatement{{\n"));
            write_var(out, program, *var, indent + 2);
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Call(expr) => write_expr(out, program, *expr, indent),
    }
}

pub(crate) fn write_var(
    out: &mut String,
    program: &Program,
    handle: Handle<Variable>,
    indent: usize,
) {
    let pad = " ".repeat(indent);
    let var = program.var(handle);
    let label = if var.is_const { "VariableConst" } else { "Variable" };
    out.push_str(&format!("{pad}{label}{{\n"));
    if !var.decorations.is_empty() {
        out.push_str(&format!("{pad}  Decorations{{\n"));
        for d in &var.decorations {
            out.push_str(&format!("{pad}    {d}\n"));
        }
        out.push_str(&format!("{pad}  }}\n"));
    }
    out.push_str(&format!("{pad}  {}\n", program.name_of(var.symbol)));
    out.push_str(&format!("{pad}  {}\n", var.storage_class));
    out.push_str(&format!("{pad}  {}\n", format_type(program, var.ty)));
    if let Some(ctor) = var.constructor {
        out.push_str(&format!("{pad}  {{\n"));
        write_expr(out, program, ctor, indent + 4);
        out.push_str(&format!("{pad}  }}\n"));
    }
    out.push_str(&format!("{pad}}}\n"));
}

pub(crate) fn write_func(
    out: &mut String,
    program: &Program,
    handle: Handle<Function>,
    indent: usize,
) {
    let pad = " ".repeat(indent);
    let func = program.func(handle);
    out.push_str(&format!(
        "{pad}Function {} -> {}\n",
        program.name_of(func.symbol),
        format_type(program, func.return_type)
    ));
    for d in &func.decorations {
        out.push_str(&format!("{pad}{d}\n"));
    }
    out.push_str(&format!("{pad}(\n"));
    for &p in &func.params {
        write_var(out, program, p, indent + 2);
    }
    out.push_str(&format!("{pad})\n"));
    write_body(out, program, func.body, indent);
}

fn write_constructed_type(out: &mut String, program: &Program, ty: Handle<Type>, indent: usize) {
    let pad = " ".repeat(indent);
    match &program.types()[ty] {
        Type::Struct(s) => {
            out.push_str(&format!("{pad}Struct {}{{\n", program.name_of(s.name)));
            if s.is_block {
                out.push_str(&format!("{pad}  [[block]]\n"));
            }
            for m in &s.members {
                out.push_str(&format!(
                    "{pad}  StructMember{{[[ offset {} ]] {}: {}}}\n",
                    m.offset,
                    program.name_of(m.name),
                    format_type(program, m.ty)
                ));
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        Type::Alias { name, subtype } => {
            out.push_str(&format!(
                "{pad}Alias {} -> {}\n",
                program.name_of(*name),
                format_type(program, *subtype)
            ));
        }
        _ => out.push_str(&format!("{pad}{}\n", format_type(program, ty))),
    }
}

impl Program {
    /// Debug dump of the whole module.
    pub fn to_str(&self) -> String {
        let mut out = String::from("Module{\n");
        for &ty in &self.module().constructed_types {
            write_constructed_type(&mut out, self, ty, 2);
        }
        for &var in &self.module().global_variables {
            write_var(&mut out, self, var, 2);
        }
        for &func in &self.module().functions {
            write_func(&mut out, self, func, 2);
        }
        out.push_str("}\n");
        out
    }
}
