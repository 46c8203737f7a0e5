pub mod board;
pub mod cell;
pub mod entity;
pub mod rules;
