pub mod import;
pub mod selection;
