mod creation;
mod ops;
