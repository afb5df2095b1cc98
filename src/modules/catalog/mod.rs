pub mod crud;
pub mod model;

pub use crud::CatalogCrud;
