use super::ast::*;
use crate::utils::pprint::*;

use itertools::Itertools;

impl PrettyPrint for ElemSize {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        let s = match self {
            ElemSize::Bool => "bool",
            ElemSize::I8 => "int8",
            ElemSize::I16 => "int16",
            ElemSize::I32 => "int32",
            ElemSize::I64 => "int64",
            ElemSize::U8 => "uint8",
            ElemSize::U16 => "uint16",
            ElemSize::U32 => "uint32",
            ElemSize::U64 => "uint64",
            ElemSize::F16 => "float16",
            ElemSize::F32 => "float32",
            ElemSize::F64 => "float64",
        };
        (env, s.to_string())
    }
}

impl PrettyPrint for Type {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        match self {
            Type::Scalar {sz} => sz.pprint(env),
            Type::Array {sz, shape, mem} => {
                let (env, sz) = sz.pprint(env);
                let shape_str = shape.iter()
                    .map(|s| s.to_string())
                    .join(", ");
                (env, format!("array<{sz};{shape_str}>@{0}", mem.0))
            }
        }
    }
}

impl PrettyPrint for UnOp {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        match self {
            UnOp::Sub => (env, "-".to_string()),
        }
    }
}

impl PrettyPrint for BinOp {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Leq => "<=",
            BinOp::Gt => ">",
            BinOp::Geq => ">=",
        };
        (env, s.to_string())
    }
}

impl PrettyPrint for Expr {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        match self {
            Expr::Var {id, ..} => id.pprint(env),
            Expr::Bool {v, ..} => (env, v.to_string()),
            Expr::Int {v, ..} => (env, v.to_string()),
            Expr::UnOp {op, arg, ..} => {
                let (env, op) = op.pprint(env);
                let (env, arg) = arg.pprint(env);
                (env, format!("({op}{arg})"))
            },
            Expr::BinOp {lhs, op, rhs, ..} => {
                let (env, lhs) = lhs.pprint(env);
                let (env, op) = op.pprint(env);
                let (env, rhs) = rhs.pprint(env);
                (env, format!("({lhs} {op} {rhs})"))
            },
            Expr::ArrayAccess {target, indices, ..} => {
                let (env, target) = target.pprint(env);
                let (env, indices) = pprint_iter(indices.iter(), env, ", ");
                (env, format!("{target}[{indices}]"))
            },
        }
    }
}

impl PrettyPrint for Stmt {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        let indent = env.print_indent();
        match self {
            Stmt::Definition {ty, id, expr, ..} => {
                let (env, ty) = ty.pprint(env);
                let (env, id) = id.pprint(env);
                let (env, expr) = expr.pprint(env);
                (env, format!("{indent}{ty} {id} = {expr};"))
            },
            Stmt::Assign {dst, expr, ..} => {
                let (env, dst) = dst.pprint(env);
                let (env, expr) = expr.pprint(env);
                (env, format!("{indent}{dst} = {expr};"))
            },
            Stmt::For {var, lo, hi, step, body, ..} => {
                let (env, var) = var.pprint(env);
                let (env, lo) = lo.pprint(env);
                let (env, hi) = hi.pprint(env);
                let env = env.incr_indent();
                let (env, body) = pprint_iter(body.iter(), env, "\n");
                let env = env.decr_indent();
                let s = format!(
                    "{0}for (int64_t {1} = {2}; {1} < {3}; {1} += {4}) {{\n{5}\n{0}}}",
                    indent, var, lo, hi, step, body
                );
                (env, s)
            },
            Stmt::If {cond, thn, els, ..} => {
                let (env, cond) = cond.pprint(env);
                let env = env.incr_indent();
                let (env, thn) = pprint_iter(thn.iter(), env, "\n");
                let (env, els) = pprint_iter(els.iter(), env, "\n");
                let env = env.decr_indent();
                (env, format!("{0}if ({cond}) {{\n{thn}\n{0}}} else {{\n{els}\n{0}}}", indent))
            },
            Stmt::Alloc {id, ty, ..} => {
                let (env, id) = id.pprint(env);
                let (env, ty) = ty.pprint(env);
                (env, format!("{indent}{id} = alloc[{ty}];"))
            },
            Stmt::TransferStart {src, dst, elems, tag, ..} => {
                let (env, src) = src.pprint(env);
                let (env, dst) = dst.pprint(env);
                let (env, elems) = elems.pprint(env);
                let (env, tag) = tag.pprint(env);
                (env, format!("{indent}transfer_start({src}, {dst}, {elems}, {tag});"))
            },
            Stmt::TransferWait {tag, elems, ..} => {
                let (env, tag) = tag.pprint(env);
                let (env, elems) = elems.pprint(env);
                (env, format!("{indent}transfer_wait({tag}, {elems});"))
            },
        }
    }
}

impl PrettyPrint for Param {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        let Param {id, ty, ..} = self;
        let (env, id) = id.pprint(env);
        let (env, ty) = ty.pprint(env);
        (env, format!("{ty} {id}"))
    }
}

impl PrettyPrint for FunDef {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        let FunDef {id, params, body, ..} = self;
        let (env, id) = id.pprint(env);
        let (env, params) = pprint_iter(params.iter(), env, ", ");
        let env = env.incr_indent();
        let (env, body) = pprint_iter(body.iter(), env, "\n");
        let env = env.decr_indent();
        (env, format!("def {id}({params}) {{\n{body}\n}}"))
    }
}

impl PrettyPrint for Ast {
    fn pprint(&self, env: PrettyPrintEnv) -> (PrettyPrintEnv, String) {
        pprint_iter(self.defs.iter(), env, "\n")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::ast_builder::*;
    use crate::utils::info::Info;

    #[test]
    fn print_array_type() {
        let ty = array_ty(vec![32, 16], MemSpace(1));
        assert_eq!(ty.pprint_default(), "array<float32;32, 16>@1");
    }

    #[test]
    fn print_access() {
        let e = array_access(
            slow_array("A", vec![8, 8]),
            vec![var("i", int_ty()), int(0)]
        );
        assert_eq!(e.pprint_default(), "A[i, 0]");
    }

    #[test]
    fn print_loop() {
        let s = for_loop(id("i"), int(0), int(8), 1, vec![
            assign(
                array_access(slow_array("A", vec![8]), vec![var("i", int_ty())]),
                int(0)
            )
        ]);
        assert_eq!(
            s.pprint_default(),
            "for (int64_t i = 0; i < 8; i += 1) {\n  A[i] = 0;\n}"
        );
    }

    #[test]
    fn print_transfer_pair() {
        let i = Info::default();
        let tag_access = array_access(
            var("t", array_ty_sz(ElemSize::I32, vec![1], MemSpace(0))),
            vec![int(0)]
        );
        let start = Stmt::TransferStart {
            src: array_access(slow_array("A", vec![8]), vec![int(0)]),
            dst: array_access(fast_array("buf", vec![8]), vec![int(0)]),
            elems: int(8),
            tag: tag_access.clone(),
            i: i.clone()
        };
        let wait = Stmt::TransferWait {tag: tag_access, elems: int(8), i};
        assert_eq!(
            start.pprint_default(),
            "transfer_start(A[0], buf[0], 8, t[0]);"
        );
        assert_eq!(wait.pprint_default(), "transfer_wait(t[0], 8);");
    }
}
