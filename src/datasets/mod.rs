/// The UCI Car Evaluation dataset
pub mod car;
