pub mod ast;
pub mod pragma;
pub mod span;
pub mod syntax;
