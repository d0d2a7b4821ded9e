pub mod export;
pub mod image_io;

pub use export::{default_file_name, encode_png, write_png};
pub use image_io::{decode_png, fit_to_size, gradient_source, load_png};
