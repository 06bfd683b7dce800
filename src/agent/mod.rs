pub mod encoder;
pub mod hyperparameters;
pub mod policy;
pub mod qtable;
pub mod trainer;

pub use encoder::{encode, StateKey};
pub use hyperparameters::Hyperparameters;
pub use policy::select_action;
pub use qtable::QTable;
