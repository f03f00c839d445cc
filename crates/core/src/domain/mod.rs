pub mod content;
pub mod draft;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod settings;
pub mod types;
pub mod validator;
