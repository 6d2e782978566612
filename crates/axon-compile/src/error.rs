use thiserror::Error;

/// Failures raised while turning an AST into bytecode (spec §4.3, §7).
///
/// All three variants are defensive: Rust's exhaustive `match` over
/// `Expr`/`Stmt`/`BinOpKind` already rules out `UnhandledNode` and
/// `UnknownOperator` at compile time, and `NonConstantForBound` became
/// unreachable once the for-loop end expression started being evaluated
/// at run time (spec §9 resolution). The variants stay defined so the
/// type still documents what the original design considered failure
/// modes, matching the teacher's habit of keeping a named-but-dead error
/// case over deleting it silently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("unhandled AST node: {0}")]
    UnhandledNode(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("for-loop end expression is not a constant: {0}")]
    NonConstantForBound(String),
}
