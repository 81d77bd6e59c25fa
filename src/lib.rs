pub mod brand;
pub mod category;
pub mod codec;
pub mod convert;
pub mod dedup;
pub mod group;
pub mod model;
pub mod overpass;
pub mod rank;
pub mod spatial;
pub mod utils;

pub use category::Category;
