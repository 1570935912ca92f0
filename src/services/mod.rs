pub mod energy;
pub mod irradiance;
pub mod prediction;
pub mod prediction_file;
