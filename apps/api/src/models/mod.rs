pub mod judgment;
