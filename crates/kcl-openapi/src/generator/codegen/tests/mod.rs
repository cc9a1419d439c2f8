mod checks;
mod types;
mod values;
mod writer;
