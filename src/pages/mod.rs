mod home;
mod supplement;

pub use home::HomePage;
pub use supplement::SupplementPage;
