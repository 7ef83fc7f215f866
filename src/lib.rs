pub mod disk;
pub mod fs;
pub mod payloads;
