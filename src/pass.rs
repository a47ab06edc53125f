use crate::ir;
use crate::ir::ast::Ast;
use crate::memstage_name_error;
use crate::option::TransferOptions;
use crate::utils::debug::DebugEnv;
use crate::utils::err::*;

/// A named function-level transform of the program. Passes that only apply rewrites
/// opportunistically wrap their result in Ok, so the pipeline treats all passes uniformly.
pub struct Pass {
    name: String,
    run: Box<dyn Fn(Ast) -> CompileResult<Ast>>
}

impl Pass {
    pub fn new(name: &str, run: impl Fn(Ast) -> CompileResult<Ast> + 'static) -> Pass {
        Pass {name: name.to_string(), run: Box::new(run)}
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// Runs registered passes in registration order, printing the intermediate AST after each pass
// when debug printing is enabled.
pub struct Pipeline {
    passes: Vec<Pass>
}

impl Pipeline {
    pub fn new() -> Pipeline {
        Pipeline {passes: vec![]}
    }

    pub fn register(mut self, pass: Pass) -> CompileResult<Pipeline> {
        if self.passes.iter().any(|p| p.name == pass.name) {
            memstage_name_error!("A pass named {} is already registered", pass.name)
        } else {
            self.passes.push(pass);
            Ok(self)
        }
    }

    pub fn run(&self, ast: Ast, debug_env: &DebugEnv) -> CompileResult<Ast> {
        self.passes.iter()
            .try_fold(ast, |ast, pass| {
                let ast = (pass.run)(ast)?;
                debug_env.print(&format!("AST after {}", pass.name), &ast);
                Ok(ast)
            })
    }
}

// The default pipeline folds constants before generating transfers, so that loop bounds and
// indices are in the simplest form the footprint analysis can work with.
pub fn default_pipeline(opts: &TransferOptions) -> CompileResult<Pipeline> {
    let opts = opts.clone();
    Pipeline::new()
        .register(Pass::new("constant-fold", |ast| Ok(ir::fold(ast))))?
        .register(Pass::new("generate-transfers", move |ast| {
            Ok(ir::generate_transfers(ast, &opts))
        }))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::ast_builder::*;
    use crate::ir::ast::*;
    use crate::utils::name::Name;

    fn identity_pass(name: &str) -> Pass {
        Pass::new(name, Ok)
    }

    #[test]
    fn registering_duplicate_pass_name_fails() {
        let r = Pipeline::new()
            .register(identity_pass("a")).unwrap()
            .register(identity_pass("a"));
        assert!(r.is_err());
    }

    #[test]
    fn passes_run_in_registration_order() {
        let rename = |suffix: &'static str| move |ast: Ast| {
            let defs = ast.defs.into_iter()
                .map(|def| {
                    let id = Name::new(format!("{}{}", def.id.get_str(), suffix));
                    FunDef {id, ..def}
                })
                .collect();
            Ok(Ast {defs})
        };
        let pipeline = Pipeline::new()
            .register(Pass::new("a", rename("_a"))).unwrap()
            .register(Pass::new("b", rename("_b"))).unwrap();
        let opts = TransferOptions::default();
        let ast = ast(vec![], vec![]);
        let result = pipeline.run(ast, &DebugEnv::new(&opts)).unwrap();
        assert_eq!(result.defs[0].id.get_str(), "main_a_b");
    }

    #[test]
    fn default_pipeline_folds_before_generating_transfers() {
        let idx = binop(var("i", int_ty()), BinOp::Mul, var("i", int_ty()));
        let hi = binop(int(8), BinOp::Mul, int(4));
        let body = vec![for_loop(id("i"), int(0), hi, 1, vec![
            definition(
                scalar(ElemSize::F32),
                id("y"),
                array_access(slow_array("A", vec![128]), vec![idx])
            )
        ])];
        let opts = TransferOptions::default();
        let pipeline = default_pipeline(&opts).unwrap();
        let result = pipeline.run(ast(vec![], body), &DebugEnv::new(&opts)).unwrap();
        let body = &result.defs[0].body;
        // The non-affine index keeps the access on the slow array, so the loop comes out alone
        // with its bound folded to a constant.
        match &body[0] {
            Stmt::For {hi, ..} => assert_eq!(hi, &int(32)),
            s => panic!("expected a loop, found {:?}", s)
        };
    }
}
