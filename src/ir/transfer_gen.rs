/// Promotes memory accesses of unit-stride counted loops from the slow memory space into
/// compiler-managed buffers in the fast memory space, bracketing each promoted loop with
/// asynchronous transfer-start/transfer-wait pairs. Accesses whose footprint cannot be derived,
/// is not a compile-time constant, or is empty are left on the slow array; the transform always
/// leaves the program in a valid state.
///
/// The transform works one candidate loop at a time. A loop with non-unit stride is never
/// processed directly; when its first statement is itself a counted loop, transfer generation
/// recurses into that loop instead, so transfers end up at the boundaries of exact iteration
/// tiles rather than at strided sampling loops.

use crate::ir::affine::AffineExpr;
use crate::ir::ast::*;
use crate::ir::region::*;
use crate::memstage_compile_error;
use crate::option::TransferOptions;
use crate::utils::err::*;
use crate::utils::info::*;
use crate::utils::name::Name;
use crate::utils::smap::*;

use log::debug;

use std::collections::BTreeMap;

// State scoped to the processing of one candidate loop: the buffers synthesized per source array
// and the statements to be inserted before and after the loop. A fresh context is created per
// loop, so no state can leak across loops.
struct LoopCtx {
    fast_buffers: BTreeMap<Name, (Name, Type)>,
    prologue: Vec<Stmt>,
    epilogue: Vec<Stmt>,
}

impl LoopCtx {
    fn new() -> LoopCtx {
        LoopCtx {
            fast_buffers: BTreeMap::new(),
            prologue: vec![],
            epilogue: vec![],
        }
    }
}

struct AccessSite {
    array: Name,
    arr_ty: Type,
    indices: Vec<Expr>,
    dir: AccessDir
}

fn access_site(target: &Expr, indices: &Vec<Expr>, dir: AccessDir) -> CompileResult<AccessSite> {
    match target {
        Expr::Var {id, ty, ..} => Ok(AccessSite {
            array: id.clone(), arr_ty: ty.clone(), indices: indices.clone(), dir
        }),
        _ => {
            memstage_compile_error!(target.get_info(), "Unexpected target of array access")
        }
    }
}

// Appends the region of one load or store to the accumulator, when its target array lives in the
// slow memory space and a region can be derived. Each qualifying access contributes its own
// region; regions of multiple accesses to the same array are not unioned.
fn collect_access(
    mut acc: Vec<Region>,
    target: &Expr,
    indices: &Vec<Expr>,
    dir: AccessDir,
    loops: &[LoopRange],
    opts: &TransferOptions
) -> Vec<Region> {
    let site = match access_site(target, indices, dir) {
        Ok(site) => site,
        Err(e) => {
            debug!("{}", e);
            return acc;
        }
    };
    if site.arr_ty.get_mem_space() != Some(opts.slow_mem) {
        return acc;
    }
    match compute_region(site.array, &site.arr_ty, &site.indices, site.dir, loops) {
        Ok(region) => acc.push(region),
        Err(e) => {
            debug!("error obtaining memory region: {}", e);
        }
    };
    acc
}

// Collects the regions of all loads in an expression.
fn collect_regions_expr(
    acc: Vec<Region>,
    e: &Expr,
    loops: &[LoopRange],
    opts: &TransferOptions
) -> Vec<Region> {
    match e {
        Expr::ArrayAccess {target, indices, ..} => {
            let acc = collect_access(acc, target.as_ref(), indices, AccessDir::Read, loops, opts);
            indices.sfold(acc, |acc, idx| collect_regions_expr(acc, idx, loops, opts))
        },
        _ => e.sfold(acc, |acc, e| collect_regions_expr(acc, e, loops, opts))
    }
}

fn collect_regions_stmt(
    acc: Vec<Region>,
    s: &Stmt,
    loops: &[LoopRange],
    opts: &TransferOptions
) -> Vec<Region> {
    match s {
        Stmt::Assign {dst: Expr::ArrayAccess {target, indices, ..}, expr, ..} => {
            let acc = collect_access(acc, target.as_ref(), indices, AccessDir::Write, loops, opts);
            let acc = indices.sfold(acc, |acc, idx| {
                collect_regions_expr(acc, idx, loops, opts)
            });
            collect_regions_expr(acc, expr, loops, opts)
        },
        Stmt::For {var, lo, hi, step, body, ..} => {
            let acc = collect_regions_expr(acc, lo, loops, opts);
            let acc = collect_regions_expr(acc, hi, loops, opts);
            let mut inner = loops.to_vec();
            inner.push(LoopRange {
                var: var.clone(), lo: lo.clone(), hi: hi.clone(), step: *step
            });
            body.sfold(acc, |acc, s| collect_regions_stmt(acc, s, &inner, opts))
        },
        Stmt::Definition {..} | Stmt::Assign {..} | Stmt::If {..} => {
            let acc = <Stmt as SFold<Expr>>::sfold(s, acc, |acc, e| {
                collect_regions_expr(acc, e, loops, opts)
            });
            <Stmt as SFold<Stmt>>::sfold(s, acc, |acc, s| {
                collect_regions_stmt(acc, s, loops, opts)
            })
        },
        // Transfer operations are neither loads nor stores; their operands never contribute
        // regions.
        Stmt::Alloc {..} | Stmt::TransferStart {..} | Stmt::TransferWait {..} => acc
    }
}

// Policy hook deciding where a wait lands relative to its start. The default policy waits
// immediately, so transfers never overlap with computation.
fn place_wait(block: &mut Vec<Stmt>, wait: Stmt) {
    block.push(wait);
}

fn int_expr(v: i64, i: &Info) -> Expr {
    Expr::Int {v, ty: Type::Scalar {sz: ElemSize::I64}, i: i.clone()}
}

// Materializes an offset as an index expression in the given block: constants directly, anything
// else through a definition of a fresh variable bound to the affine expression.
fn materialize_offset(offset: &AffineExpr, block: &mut Vec<Stmt>, i: &Info) -> Expr {
    match offset.get_constant() {
        Some(v) => int_expr(v, i),
        None => {
            let ty = Type::Scalar {sz: ElemSize::I64};
            let id = Name::sym_str("ofs");
            block.push(Stmt::Definition {
                ty: ty.clone(), id: id.clone(), expr: offset.to_expr(i), i: i.clone()
            });
            Expr::Var {id, ty, i: i.clone()}
        }
    }
}

fn access_expr(id: Name, ty: Type, indices: Vec<Expr>, i: &Info) -> Expr {
    let elem_ty = Type::Scalar {sz: *ty.get_elem_size()};
    let target = Expr::Var {id, ty, i: i.clone()};
    Expr::ArrayAccess {target: Box::new(target), indices, ty: elem_ty, i: i.clone()}
}

// The plan for rewriting uses of a promoted array within the candidate loop body.
struct Rewrite {
    array: Name,
    buf: Name,
    buf_ty: Type,
    offsets: Vec<AffineExpr>
}

// Synthesizes (or reuses) the fast buffer for a region and emits its transfer-start/wait pair,
// bracketing the candidate loop. Returns None when no transfer is generated; the caller must not
// rewrite any use in that case.
fn generate_transfer(
    region: &Region,
    ctx: &mut LoopCtx,
    opts: &TransferOptions,
    i: &Info
) -> Option<Rewrite> {
    let num_elems = match region.cst.constant_size() {
        Some(n) => n,
        None => {
            debug!("non-constant region size for array {}", region.array);
            return None;
        }
    };
    if num_elems == 0 {
        debug!("empty region for array {}; nothing to transfer", region.array);
        return None;
    }
    let shape = match region.cst.constant_shape() {
        Some(shape) => shape,
        None => {
            debug!("non-constant region shape for array {}", region.array);
            return None;
        }
    };
    let offsets = (0..region.rank)
        .map(|d| region.cst.lower_bound(d))
        .collect::<Option<Vec<AffineExpr>>>();
    let offsets = match offsets {
        Some(offsets) => offsets,
        None => {
            debug!("missing lower bound for a dimension of array {}", region.array);
            return None;
        }
    };

    // The buffer is allocated once per source array and loop; later regions of the same array
    // reuse it under the assumption that all accesses to one array within the loop have the same
    // footprint.
    let (buf, buf_ty) = match ctx.fast_buffers.get(&region.array) {
        Some((buf, buf_ty)) => (buf.clone(), buf_ty.clone()),
        None => {
            let buf = Name::sym_str("buf");
            let buf_ty = Type::Array {
                sz: *region.arr_ty.get_elem_size(),
                shape: shape.clone(),
                mem: opts.fast_mem
            };
            ctx.prologue.push(Stmt::Alloc {
                id: buf.clone(), ty: buf_ty.clone(), i: i.clone()
            });
            ctx.fast_buffers.insert(region.array.clone(), (buf.clone(), buf_ty.clone()));
            (buf, buf_ty)
        }
    };

    // A fresh single-element tag correlates this start with its wait; it is never shared across
    // transfers.
    let tag = Name::sym_str("tag");
    let tag_ty = Type::Array {sz: ElemSize::I32, shape: vec![1], mem: opts.slow_mem};
    ctx.prologue.push(Stmt::Alloc {id: tag.clone(), ty: tag_ty.clone(), i: i.clone()});

    // TODO: special-case transfers smaller than min_transfer_bytes.
    let bytes = num_elems * region.arr_ty.get_elem_size().size_bytes();
    debug!("transferring {} elements ({} bytes) for array {}", num_elems, bytes, region.array);

    let block = if region.dir.is_write() {
        &mut ctx.epilogue
    } else {
        &mut ctx.prologue
    };
    let src_indices = offsets.iter()
        .map(|ofs| materialize_offset(ofs, block, i))
        .collect::<Vec<Expr>>();
    let dst_indices = (0..region.rank).map(|_| int_expr(0, i)).collect::<Vec<Expr>>();

    let arr = access_expr(region.array.clone(), region.arr_ty.clone(), src_indices, i);
    let buf_access = access_expr(buf.clone(), buf_ty.clone(), dst_indices, i);
    let tag_access = access_expr(tag, tag_ty, vec![int_expr(0, i)], i);
    let elems = int_expr(num_elems, i);

    // The copy always flows toward the memory the loop body actually uses: into the buffer for
    // reads, back out to the slow array for writes.
    let (src, dst) = if region.dir.is_write() {
        (buf_access, arr)
    } else {
        (arr, buf_access)
    };
    block.push(Stmt::TransferStart {
        src, dst, elems: elems.clone(), tag: tag_access.clone(), i: i.clone()
    });
    place_wait(block, Stmt::TransferWait {tag: tag_access, elems, i: i.clone()});

    Some(Rewrite {array: region.array.clone(), buf, buf_ty, offsets})
}

// Remaps every index of an access by subtracting the per-dimension lower bound of the region.
// Returns None for an access with a non-affine index; no region was computed for such an access,
// so it must stay on the original array.
fn remap_indices(indices: &[Expr], offsets: &[AffineExpr]) -> Option<Vec<Expr>> {
    indices.iter()
        .zip(offsets.iter())
        .map(|(idx, ofs)| {
            let a = AffineExpr::from_expr(idx)?;
            if ofs.is_zero() {
                Some(idx.clone())
            } else {
                Some(a.sub(ofs).to_expr(&idx.get_info()))
            }
        })
        .collect()
}

fn rewrite_uses_expr(e: Expr, rw: &Rewrite) -> Expr {
    match e {
        Expr::ArrayAccess {target, indices, ty, i} => {
            let indices = indices.smap(|idx| rewrite_uses_expr(idx, rw));
            let promoted = matches!(target.as_ref(), Expr::Var {id, ..} if *id == rw.array);
            match remap_indices(&indices, &rw.offsets) {
                Some(indices) if promoted => {
                    let target = Expr::Var {
                        id: rw.buf.clone(), ty: rw.buf_ty.clone(), i: i.clone()
                    };
                    Expr::ArrayAccess {target: Box::new(target), indices, ty, i}
                },
                _ => Expr::ArrayAccess {target, indices, ty, i}
            }
        },
        _ => e.smap(|e| rewrite_uses_expr(e, rw))
    }
}

fn rewrite_uses_stmt(s: Stmt, rw: &Rewrite) -> Stmt {
    let s = <Stmt as SMapAccum<Expr>>::smap(s, |e| rewrite_uses_expr(e, rw));
    <Stmt as SMapAccum<Stmt>>::smap(s, |s| rewrite_uses_stmt(s, rw))
}

// Runs transfer generation for one top-level counted loop. A non-unit-stride loop is not
// processed itself; when its first statement is a counted loop, generation recurses into it and
// the generated transfers end up inside the strided loop's body.
fn run_on_loop(s: Stmt, depth: usize, opts: &TransferOptions) -> Vec<Stmt> {
    match s {
        Stmt::For {var, lo, hi, step, mut body, i} if step != 1 => {
            if let Some(Stmt::For {..}) = body.first() {
                let inner = body.remove(0);
                let mut expanded = run_on_loop(inner, depth + 1, opts);
                expanded.append(&mut body);
                body = expanded;
            }
            vec![Stmt::For {var, lo, hi, step, body, i}]
        },
        Stmt::For {var, lo, hi, step, body, i} => {
            debug!("generating transfers for loop {} at depth {}", var, depth);
            let candidate = LoopRange {
                var: var.clone(), lo: lo.clone(), hi: hi.clone(), step
            };
            let regions = body.sfold(vec![], |acc, s| {
                collect_regions_stmt(acc, s, &[candidate.clone()], opts)
            });
            let mut ctx = LoopCtx::new();
            let body = regions.iter()
                .fold(body, |body, region| {
                    match generate_transfer(region, &mut ctx, opts, &i) {
                        Some(rw) => body.smap(|s| rewrite_uses_stmt(s, &rw)),
                        None => body
                    }
                });
            let mut result = ctx.prologue;
            result.push(Stmt::For {var, lo, hi, step, body, i});
            result.append(&mut ctx.epilogue);
            result
        },
        _ => vec![s]
    }
}

fn run_on_fun_def(def: FunDef, opts: &TransferOptions) -> FunDef {
    let body = def.body.sflatten(vec![], |mut acc, s| {
        match s {
            Stmt::For {..} => {
                acc.append(&mut run_on_loop(s, 0, opts));
                acc
            },
            _ => {
                acc.push(s);
                acc
            }
        }
    });
    FunDef {body, ..def}
}

// Generates transfers for every function of the program. Transfers are inserted opportunistically
// where legal; the program is always left in a valid state, so this transform never fails from
// the pipeline's point of view.
pub fn apply(ast: Ast, opts: &TransferOptions) -> Ast {
    let defs = ast.defs.into_iter()
        .map(|def| run_on_fun_def(def, opts))
        .collect();
    Ast {defs}
}
