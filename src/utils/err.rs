use std::error;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
enum ErrorKind {
    Compile,
    Name
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Compile => write!(f, "Memstage compilation error"),
            ErrorKind::Name => write!(f, "Memstage name error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompileError {
    msg: String,
    kind: ErrorKind
}

impl CompileError {
    pub fn compile_err(msg: String) -> Self {
        CompileError {msg, kind: ErrorKind::Compile}
    }

    pub fn name_err(msg: String) -> Self {
        CompileError {msg, kind: ErrorKind::Name}
    }
}

impl error::Error for CompileError {}
impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{0}: {1}", self.kind, &self.msg)
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

#[macro_export]
macro_rules! memstage_compile_error {
    ($i:expr,$($t:tt)*) => {{
        Err(CompileError::compile_err($i.error_msg(format!($($t)*))))
    }}
}

#[macro_export]
macro_rules! memstage_name_error {
    ($($t:tt)*) => {{
        Err(CompileError::name_err(format!($($t)*)))
    }}
}
