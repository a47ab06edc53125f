pub mod ir;
pub mod option;
pub mod pass;
pub mod utils;

use crate::ir::ast::Ast;
use crate::utils::debug::DebugEnv;
use crate::utils::err::CompileResult;

pub use crate::option::TransferOptions;

/// Runs the default pipeline over a program: constants are folded, then accesses of slow-memory
/// arrays within counted loops are staged through fast-memory buffers with explicit transfers.
pub fn stage_transfers(ast: Ast, opts: &TransferOptions) -> CompileResult<Ast> {
    let debug_env = DebugEnv::new(opts);
    debug_env.print("Initial AST", &ast);
    let pipeline = pass::default_pipeline(opts)?;
    pipeline.run(ast, &debug_env)
}
