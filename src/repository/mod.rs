//! Repository Layer
//!
//! Reading and writing basket documents.

mod basket_io;
mod traits;

#[cfg(test)]
mod tests;

pub use basket_io::{
    default_file_name, from_json, load, load_with_config, save, to_json, JsonBasketFile, LoadedBasket,
};
pub use traits::BasketRepository;
