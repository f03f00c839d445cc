pub mod decode;
pub mod export;
pub mod output;
pub mod render;
pub mod storage;
