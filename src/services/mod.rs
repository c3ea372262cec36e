pub mod columns;
pub mod grouper;
pub mod normalize;
pub mod overlay;
pub mod processor;
pub mod transforms;
