pub mod blob;
pub mod folder;
pub mod paths;
pub mod settings;

pub use settings::AppSettings;
