pub mod ci;
pub mod distribute;
