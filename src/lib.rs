pub mod cli;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod file;
pub mod interactive;
pub mod utils;
pub mod zip;

pub mod models {
    pub mod conversion;
    pub mod image;
}
