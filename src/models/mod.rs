mod contribution;
mod goal;

pub use contribution::Contribution;
pub use goal::Goal;
