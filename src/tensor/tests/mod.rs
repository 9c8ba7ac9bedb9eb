mod mat_mul;
mod shape;
