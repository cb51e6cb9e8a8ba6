// Terminal views

pub mod results;

pub use results::ResultsView;
