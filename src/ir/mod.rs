pub mod ast;
mod affine;
mod constant_fold;
mod constraints;
mod pprint;
mod region;
mod transfer_gen;

#[cfg(test)]
pub mod ast_builder;

pub use constant_fold::fold;
pub use transfer_gen::apply as generate_transfers;
