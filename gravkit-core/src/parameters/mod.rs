mod earth;
mod spherical_cap;

pub use earth::EarthParameters;
pub use spherical_cap::SphericalCapConfig;
