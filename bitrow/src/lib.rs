pub mod bitvec;
pub mod block;
pub mod block_matrix;
pub mod matrix;

pub use bitvec::BitVec;
pub use block::{Block, BLOCK_BITS};
pub use block_matrix::BlockMatrix;
pub use matrix::BitMatrix;
