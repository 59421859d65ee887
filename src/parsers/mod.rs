pub mod blurbs;
pub mod html;


pub use blurbs::{Blurb, BlurbQueries, extract};
pub use html::parse;
