pub mod audit;
pub mod import;
pub mod normalize;
pub mod rules;
pub mod versions;
