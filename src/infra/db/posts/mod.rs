mod read;
mod types;
mod write;
