// Adapters layer: concrete implementations for external inputs (documents on disk).

pub mod yaml;
