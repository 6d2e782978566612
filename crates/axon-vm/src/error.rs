use thiserror::Error;

/// Runtime failure kinds (spec §3, §7). Fatal for the current `run()`
/// invocation; the VM's `globals` survive so a REPL can keep going.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("NameError: {0}")]
    NameError(String),

    #[error("TypeError: {0}")]
    TypeError(String),

    #[error("StackUnderflow: {0}")]
    StackUnderflow(String),

    #[error("IndexError: {0}")]
    IndexError(String),

    #[error("LoopControlOutsideLoop: {0}")]
    LoopControlOutsideLoop(String),

    #[error("UnknownOpcode: {0}")]
    UnknownOpcode(String),

    #[error("ReturnOutsideFunction: {0}")]
    ReturnOutsideFunction(String),

    #[error("CallOfNonFunction: {0}")]
    CallOfNonFunction(String),
}
